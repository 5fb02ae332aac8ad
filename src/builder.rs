//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fmt::Write as _;
use std::io::{Read, Seek, Write};
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;

use crate::api::{DateFormat, FormulaMode, Orientation, PageSize};
use crate::color::ColorResolver;
use crate::error::XlsxToPdfError;
use crate::formatter::CellFormatter;
use crate::grid::SheetGrid;
use crate::output::{RenderOptions, RenderReport, TableRenderer, TableStyle};
use crate::parser::WorkbookParser;

/// フォントサイズの上限（pt）
const MAX_FONT_SIZE: f32 = 72.0;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConversionConfig {
    /// 用紙サイズ
    pub page_size: PageSize,

    /// 用紙の向き
    pub orientation: Orientation,

    /// フォントサイズ（pt）
    pub font_size: f32,

    /// 上下左右の余白（pt）
    pub margin: f32,

    /// 枠線の太さ（pt）
    pub grid_line_width: f32,

    /// 日付形式
    pub date_format: DateFormat,

    /// 数式出力モード
    pub formula_mode: FormulaMode,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            orientation: Orientation::Portrait,
            font_size: 10.0,
            margin: 72.0,
            grid_line_width: 1.0,
            date_format: DateFormat::Iso8601,
            formula_mode: FormulaMode::Formula,
        }
    }
}

impl ConversionConfig {
    /// 向きを適用したページ寸法
    fn page_dimensions(&self) -> (f32, f32) {
        self.orientation.apply(self.page_size.dimensions())
    }

    fn render_options(&self) -> RenderOptions {
        let (page_width, page_height) = self.page_dimensions();
        RenderOptions {
            page_width,
            page_height,
            margin: self.margin,
            font_size: self.font_size,
            grid_line_width: self.grid_line_width,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxpdf::{ConverterBuilder, Orientation, PageSize};
///
/// # fn main() -> Result<(), xlsxpdf::XlsxToPdfError> {
/// let converter = ConverterBuilder::new()
///     .with_page_size(PageSize::A4)
///     .with_orientation(Orientation::Landscape)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 用紙: US Letter、縦向き
    /// - フォントサイズ: 10pt
    /// - 余白: 72pt（1インチ）
    /// - 枠線: 1pt
    /// - 日付形式: ISO 8601 (YYYY-MM-DD)
    /// - 数式モード: 数式文字列を出力
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 用紙サイズを指定する
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// 用紙の向きを指定する
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    /// フォントサイズ（pt）を指定する
    ///
    /// `(0, 72]`の範囲外は`build()`でエラーになります。
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.config.font_size = font_size;
        self
    }

    /// 上下左右の余白（pt）を指定する
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.config.margin = margin;
        self
    }

    /// 枠線の太さ（pt）を指定する
    pub fn with_grid_line_width(mut self, width: f32) -> Self {
        self.config.grid_line_width = width;
        self
    }

    /// 日付の出力形式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxpdf::{ConverterBuilder, DateFormat};
    ///
    /// // ISO 8601形式（デフォルト）
    /// let builder = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Iso8601);
    ///
    /// // カスタム形式
    /// let builder = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()));
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// 数式セルの出力モードを指定する（デフォルト: 数式文字列）
    pub fn with_formula_mode(mut self, mode: FormulaMode) -> Self {
        self.config.formula_mode = mode;
        self
    }

    /// 設定を検証して`Converter`を構築する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)` - すべての設定が有効な場合
    /// * `Err(XlsxToPdfError::Config)` - 無効な設定が含まれる場合
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxpdf::ConverterBuilder;
    ///
    /// let result = ConverterBuilder::new().with_font_size(0.0).build();
    /// assert!(result.is_err());
    /// ```
    pub fn build(self) -> Result<Converter, XlsxToPdfError> {
        let config = &self.config;

        // 1. 用紙サイズの検証
        let (width, height) = config.page_dimensions();
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(XlsxToPdfError::Config(format!(
                "Invalid page size: {} x {}",
                width, height
            )));
        }

        // 2. フォントサイズ・枠線の検証
        if !(config.font_size > 0.0 && config.font_size <= MAX_FONT_SIZE) {
            return Err(XlsxToPdfError::Config(format!(
                "Font size must be in (0, {}]: {}",
                MAX_FONT_SIZE, config.font_size
            )));
        }

        if !(config.grid_line_width.is_finite() && config.grid_line_width > 0.0) {
            return Err(XlsxToPdfError::Config(format!(
                "Grid line width must be positive: {}",
                config.grid_line_width
            )));
        }

        // 3. 余白の検証（本文領域が残ること）
        if !(config.margin.is_finite() && config.margin >= 0.0)
            || width - 2.0 * config.margin <= 0.0
            || height - 2.0 * config.margin <= 0.0
        {
            return Err(XlsxToPdfError::Config(format!(
                "Margin {} leaves no printable area on a {} x {} page",
                config.margin, width, height
            )));
        }

        // 4. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = config.date_format {
            validate_date_format(format_str)?;
        }

        Ok(Converter::new(self.config))
    }
}

/// chronoの書式文字列として有効かどうかを検証する
fn validate_date_format(format_str: &str) -> Result<(), XlsxToPdfError> {
    let invalid = || XlsxToPdfError::Config(format!("Invalid date format string: '{}'", format_str));

    if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    // テスト用の日時でフォーマット試行
    let test_date = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| XlsxToPdfError::Config("Failed to create test date".to_string()))?;
    let mut formatted = String::new();
    write!(formatted, "{}", test_date.format(format_str)).map_err(|_| invalid())?;
    if formatted.is_empty() {
        return Err(invalid());
    }
    Ok(())
}

/// 変換処理のファサード
///
/// アクティブシートの抽出（`extract`）と、PDFへの描画（`render`）を提供します。
/// 構築後は不変で、スレッド間で共有できます。呼び出しごとに別の入出力パスを使ってください。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxpdf::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsxpdf::XlsxToPdfError> {
/// let converter = ConverterBuilder::new().build()?;
/// let grid = converter.extract("input.xlsx")?;
/// let report = converter.render("output.pdf", &grid)?;
/// println!("{} colored cells", report.background_cells);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    /// 背景色リゾルバー
    resolver: ColorResolver,

    /// テーブルレンダラー
    renderer: TableRenderer,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(),
            resolver: ColorResolver,
            renderer: TableRenderer::new(config.render_options()),
            config,
        }
    }

    /// ワークブックファイルのアクティブシートからグリッドを抽出する
    ///
    /// # 戻り値
    ///
    /// * `Ok(SheetGrid)` - テキストグリッドと色グリッド
    /// * `Err(XlsxToPdfError::WorkbookOpen)` - ファイルが存在しない、読めない、
    ///   またはXLSXとして解析できない場合
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<SheetGrid, XlsxToPdfError> {
        let path = path.as_ref();
        let mut parser = WorkbookParser::open_path(path)?;
        parser
            .extract_active_sheet(&self.config, &self.formatter, &self.resolver)
            .map_err(|e| {
                if e.is_open_failure() {
                    XlsxToPdfError::open_failure(path, e)
                } else {
                    e
                }
            })
    }

    /// リーダーからワークブックを読み込み、アクティブシートのグリッドを抽出する
    ///
    /// ```rust,no_run
    /// use std::io::Cursor;
    /// use xlsxpdf::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxpdf::XlsxToPdfError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let excel_data: Vec<u8> = std::fs::read("input.xlsx")?;
    /// let grid = converter.extract_from_reader(Cursor::new(excel_data))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn extract_from_reader<R: Read + Seek>(
        &self,
        input: R,
    ) -> Result<SheetGrid, XlsxToPdfError> {
        let mut parser = WorkbookParser::open(input)?;
        parser.extract_active_sheet(&self.config, &self.formatter, &self.resolver)
    }

    /// グリッドに適用されるスタイルコマンド列
    pub fn table_style(&self, grid: &SheetGrid) -> TableStyle {
        self.renderer.table_style(grid)
    }

    /// グリッドをPDFファイルに描画する（既存のファイルは上書き）
    pub fn render(
        &self,
        path: impl AsRef<Path>,
        grid: &SheetGrid,
    ) -> Result<RenderReport, XlsxToPdfError> {
        self.renderer.render(path.as_ref(), grid)
    }

    /// グリッドをPDFとしてライターに書き出す
    pub fn render_to_writer<W: Write>(
        &self,
        grid: &SheetGrid,
        output: W,
    ) -> Result<RenderReport, XlsxToPdfError> {
        self.renderer.render_to_writer(grid, output)
    }

    /// リーダーのワークブックをPDFに変換してライターに書き出す
    pub fn convert<R: Read + Seek, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<RenderReport, XlsxToPdfError> {
        let grid = self.extract_from_reader(input)?;
        self.render_to_writer(&grid, output)
    }

    /// ワークブックファイルをPDFファイルに変換する
    ///
    /// 抽出に失敗した場合、出力ファイルは作成されません。
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<RenderReport, XlsxToPdfError> {
        let grid = self.extract(input)?;
        self.render(output, &grid)
    }
}
