//! xlsxpdf - Pure-Rust XLSX to PDF table converter that keeps cell background colors
//!
//! ワークブックのアクティブシートを読み込み、セルのテキストと背景色を抽出して、
//! 枠線付き・中央揃えの1つの表としてPDFに描画します。
//!
//! 処理は2段階に分かれています。
//!
//! 1. **抽出**（`extract`）: セルのテキストグリッドと、同じ形状の背景色グリッドを生成
//! 2. **描画**（`render`）: グリッドを表としてPDFに書き出し、背景色を持つセルを塗りつぶす
//!
//! # Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let grid = xlsxpdf::extract("example.xlsx")?;
//!     let report = xlsxpdf::render("example.pdf", &grid)?;
//!
//!     println!("{} cells colored", report.background_cells);
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use xlsxpdf::{ConverterBuilder, DateFormat, Orientation, PageSize};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_page_size(PageSize::A4)
//!         .with_orientation(Orientation::Landscape)
//!         .with_font_size(9.0)
//!         .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
//!         .build()?;
//!
//!     converter.convert_file("example.xlsx", "example.pdf")?;
//!     Ok(())
//! }
//! ```
//!
//! # In-memory Conversion
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use xlsxpdf::ConverterBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = ConverterBuilder::new().build()?;
//! let excel_data: Vec<u8> = std::fs::read("example.xlsx")?;
//! let mut pdf_output = Vec::new();
//! converter.convert(Cursor::new(excel_data), &mut pdf_output)?;
//! # Ok(())
//! # }
//! ```
//!
//! # 背景色の解決
//!
//! セルの塗りつぶし（`<fgColor>`）は次の順で解決されます。
//!
//! 1. RGBの直接指定（`AARRGGBB`または`RRGGBB`、「塗りつぶしなし」コードを除く）
//! 2. 標準テーマカラー（インデックス0〜9、`tint`は反映しない）
//! 3. インデックスパレット参照は解決しない（色なし）
//!
//! 解決できない場合はエラーにならず、背景色なしになります。

mod api;
mod builder;
mod color;
mod error;
mod formatter;
mod grid;
mod output;
mod parser;
mod security;
mod types;

use std::path::Path;

// 公開API
pub use api::{DateFormat, FormulaMode, Orientation, PageSize};
pub use builder::{Converter, ConverterBuilder};
pub use color::{Color, ColorResolver, FillDescriptor};
pub use error::XlsxToPdfError;
pub use grid::{ColorGrid, SheetGrid, TextGrid};
pub use output::{
    HorizontalAlign, RenderReport, StyleCommand, StyleScope, TableStyle, VerticalAlign,
};
pub use types::{CellCoord, CellRange};

/// 既定の設定でワークブックのアクティブシートを抽出する
///
/// `ConverterBuilder::new().build()?.extract(path)`と同じです。
pub fn extract(path: impl AsRef<Path>) -> Result<SheetGrid, XlsxToPdfError> {
    ConverterBuilder::new().build()?.extract(path)
}

/// 既定の設定（US Letter、縦向き）でグリッドをPDFファイルに描画する
pub fn render(path: impl AsRef<Path>, grid: &SheetGrid) -> Result<RenderReport, XlsxToPdfError> {
    ConverterBuilder::new().build()?.render(path, grid)
}
