//! Workbook Parser Module
//!
//! calamineを使用したワークブックの読み込みと、アクティブシートのグリッド抽出。
//! セルの値はcalamineから、塗りつぶし情報はXlsxMetadataParserから取得します。

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};

use crate::builder::ConversionConfig;
use crate::color::{ColorResolver, FillDescriptor};
use crate::error::XlsxToPdfError;
use crate::formatter::CellFormatter;
use crate::grid::SheetGrid;
use crate::parser::XlsxMetadataParser;
use crate::security::SecurityConfig;

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
/// ワークブック全体をメモリに読み込み、抽出が終わると破棄されます。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
    /// XMLメタデータ（塗りつぶし、アクティブシート、エポック）
    metadata: XlsxMetadataParser,
}

impl WorkbookParser {
    /// ファイルパスからワークブックを開く
    ///
    /// どの段階で失敗しても`XlsxToPdfError::WorkbookOpen`に包んで返します。
    pub fn open_path(path: &Path) -> Result<Self, XlsxToPdfError> {
        log::debug!("opening workbook {}", path.display());

        File::open(path)
            .map_err(XlsxToPdfError::from)
            .and_then(Self::open)
            .map_err(|e| XlsxToPdfError::open_failure(path, e))
    }

    /// リーダーからワークブックを開く
    ///
    /// 入力全体をメモリに読み込み（サイズ上限あり）、メタデータとcalamineの
    /// 両方で解析します。
    pub fn open<R: Read>(reader: R) -> Result<Self, XlsxToPdfError> {
        let buffer = SecurityConfig::default().read_input(reader)?;

        // ZIPのセキュリティ検証を先に行う
        let metadata = XlsxMetadataParser::new(Cursor::new(buffer.as_slice()))?;

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(XlsxToPdfError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        Ok(Self { workbook, metadata })
    }

    /// アクティブシートの名前
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - アクティブシート（指定がなければ先頭シート）の名前
    /// * `Err(XlsxToPdfError::Config)` - ワークブックにシートが1つもない場合
    pub fn active_sheet_name(&self) -> Result<String, XlsxToPdfError> {
        self.metadata
            .active_sheet_name()
            .map(str::to_string)
            .or_else(|| self.workbook.sheet_names().first().cloned())
            .ok_or_else(|| XlsxToPdfError::Config("Workbook contains no worksheets".to_string()))
    }

    /// アクティブシートからテキストグリッドと色グリッドを抽出
    ///
    /// A1から使用範囲（値を持つセルとスタイルを持つセルの和）の右下までを
    /// 行優先で走査します。範囲内の空セルは空文字列・色なしになります。
    pub fn extract_active_sheet(
        &mut self,
        config: &ConversionConfig,
        formatter: &CellFormatter,
        resolver: &ColorResolver,
    ) -> Result<SheetGrid, XlsxToPdfError> {
        let sheet_name = self.active_sheet_name()?;
        log::debug!("extracting active sheet '{}'", sheet_name);

        // 1. 値と数式の取得
        let range = self
            .workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| XlsxToPdfError::Parse(e.into()))?;

        // 数式は必要な場合だけ、1回だけ取得して全セルで再利用する
        let formula_range = if config.formula_mode == crate::api::FormulaMode::Formula {
            self.workbook.worksheet_formula(&sheet_name).ok()
        } else {
            None
        };

        // 2. 走査範囲（A1起点）
        let (rows, cols) = self.used_extent(&range);
        let is_1904 = self.metadata.is_1904();

        // 3. セルごとのテキストと色
        let mut grid = SheetGrid::default();
        for row in 0..rows {
            let mut text_row = Vec::with_capacity(cols as usize);
            let mut color_row = Vec::with_capacity(cols as usize);

            for col in 0..cols {
                let value = range.get_value((row, col)).unwrap_or(&Data::Empty);
                let formula = formula_lookup(formula_range.as_ref(), row, col);
                text_row.push(formatter.format_cell(value, formula, config, is_1904));

                let fill = self
                    .metadata
                    .cell_fill(row, col)
                    .cloned()
                    .unwrap_or(FillDescriptor::Empty);
                color_row.push(resolver.resolve(&fill));
            }

            grid.push_row(text_row, color_row)?;
        }

        log::debug!(
            "extracted {} x {} grid from sheet '{}'",
            grid.rows(),
            grid.cols(),
            sheet_name
        );

        Ok(grid)
    }

    /// 使用範囲の行数と列数（A1起点、空シートは(0, 0)）
    fn used_extent(&self, range: &Range<Data>) -> (u32, u32) {
        let value_end = if range.is_empty() { None } else { range.end() };
        let styled_end = self.metadata.styled_extent().map(|c| (c.row, c.col));

        match (value_end, styled_end) {
            (Some((vr, vc)), Some((sr, sc))) => (vr.max(sr) + 1, vc.max(sc) + 1),
            (Some((r, c)), None) | (None, Some((r, c))) => (r + 1, c + 1),
            (None, None) => (0, 0),
        }
    }
}

fn formula_lookup(formula_range: Option<&Range<String>>, row: u32, col: u32) -> Option<&str> {
    formula_range?
        .get_value((row, col))
        .map(String::as_str)
        .filter(|f| !f.is_empty())
}

// 実際のXLSXファイルが必要なテストは統合テスト（tests/）で実装します。
