//! Output Module
//!
//! 抽出済みグリッドを、背景色付きの1つの表としてPDFに描画するモジュール。
//!
//! 描画は3段階で行われます。
//!
//! 1. `TableStyle`: グリッドからスタイルコマンドの列を構築
//! 2. `TableLayout`: 列幅・行高さ・ページ分割を計算
//! 3. `PdfTableWriter`: ドキュメント全体をメモリ上で生成
//!
//! ファイルへの書き込みは最後に一度だけ行います。

mod font;
mod layout;
mod pdf;
mod style;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::XlsxToPdfError;
use crate::grid::SheetGrid;

use layout::TableLayout;
use pdf::PdfTableWriter;

pub use style::{HorizontalAlign, StyleCommand, StyleScope, TableStyle, VerticalAlign};

/// 描画設定（寸法はすべてpt）
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RenderOptions {
    /// ページ幅（向き適用後）
    pub page_width: f32,
    /// ページ高さ（向き適用後）
    pub page_height: f32,
    /// 上下左右共通の余白
    pub margin: f32,
    /// フォントサイズ
    pub font_size: f32,
    /// 枠線の太さ
    pub grid_line_width: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 72.0,
            font_size: 10.0,
            grid_line_width: 1.0,
        }
    }
}

/// 描画結果の概要
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    /// 生成したページ数
    pub pages: usize,
    /// 背景色コマンドを適用したセル数
    pub background_cells: usize,
    /// 表の行数
    pub rows: usize,
    /// 表の列数（最大列数）
    pub cols: usize,
}

/// テーブルレンダラー
///
/// グリッドを1つの表としてPDFに描画します。状態を持たないため、
/// 同じインスタンスを複数の変換で使い回せます。
#[derive(Debug, Clone)]
pub(crate) struct TableRenderer {
    options: RenderOptions,
}

impl TableRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// グリッドに適用するスタイルコマンド列
    pub fn table_style(&self, grid: &SheetGrid) -> TableStyle {
        TableStyle::for_grid(grid, self.options.grid_line_width)
    }

    /// PDFドキュメントをメモリ上に生成する
    pub fn render_to_bytes(
        &self,
        grid: &SheetGrid,
    ) -> Result<(Vec<u8>, RenderReport), XlsxToPdfError> {
        let style = self.table_style(grid);
        let layout = TableLayout::compute(grid, &self.options);
        let cell_styles = style.resolve(grid.rows(), grid.cols());

        let bytes = PdfTableWriter::new(
            grid,
            &layout,
            &cell_styles,
            (self.options.page_width, self.options.page_height),
            self.options.font_size,
        )
        .write()?;

        let report = RenderReport {
            pages: layout.pages.len(),
            background_cells: style.background_count(),
            rows: grid.rows(),
            cols: grid.cols(),
        };

        log::info!(
            "Colors applied: {} cells with background, {} page(s)",
            report.background_cells,
            report.pages
        );

        Ok((bytes, report))
    }

    /// PDFドキュメントをライターに書き出す
    pub fn render_to_writer<W: Write>(
        &self,
        grid: &SheetGrid,
        mut writer: W,
    ) -> Result<RenderReport, XlsxToPdfError> {
        let (bytes, report) = self.render_to_bytes(grid)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(report)
    }

    /// PDFファイルを生成する（既存のファイルは上書き）
    pub fn render(&self, path: &Path, grid: &SheetGrid) -> Result<RenderReport, XlsxToPdfError> {
        let (bytes, report) = self.render_to_bytes(grid)?;
        write_output(path, &bytes)?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(report)
    }
}

/// バイト列をファイルに書き込む
///
/// 書き込みに失敗した場合は途中まで書かれたファイルを削除します。
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), XlsxToPdfError> {
    let mut file = File::create(path)?;

    if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            log::warn!(
                "failed to remove partial output {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(XlsxToPdfError::Io(e));
    }

    Ok(())
}
