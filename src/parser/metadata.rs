//! XML Metadata Parser Module
//!
//! XLSX内部のXMLファイルから、calamineで取得不可能な情報を抽出するモジュール。
//! セルの塗りつぶし情報（`xl/styles.xml`）、アクティブシート（`xl/workbook.xml`）、
//! セルごとのスタイルID（`xl/worksheets/*.xml`）、1904年エポック判定を提供します。

use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::color::{ColorAttrs, FillDescriptor};
use crate::error::XlsxToPdfError;
use crate::security::{validate_zip_path, SecurityConfig};
use crate::types::CellCoord;

/// ワークブック内のシート定義（`<sheet>`要素）
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SheetEntry {
    /// シート名
    pub name: String,
    /// ZIP内のパーツパス（例: `xl/worksheets/sheet1.xml`）
    pub part: Option<String>,
}

/// `xl/workbook.xml`から得られる情報
#[derive(Debug, Default)]
struct WorkbookInfo {
    /// (シート名, リレーションID)
    sheets: Vec<(String, Option<String>)>,
    active_tab: usize,
    is_1904: bool,
}

/// アクティブシートのセルスタイル情報
#[derive(Debug, Clone, Default)]
struct SheetStyles {
    /// (行, 列) -> cellXfsインデックス
    cell_styles: HashMap<(u32, u32), u32>,
    /// スタイルIDが解釈できなかったセル
    unstyled: HashSet<(u32, u32)>,
    /// `<c>`要素が存在する最大の行・列（それぞれ独立に最大値）
    extent: Option<CellCoord>,
}

/// XLSXメタデータパーサー
///
/// XLSXファイル（ZIPアーカイブ）からXMLを直接解析し、
/// calamineで取得できない情報を抽出します。
#[derive(Debug, Clone)]
pub(crate) struct XlsxMetadataParser {
    /// fillId -> 塗りつぶし情報
    fills: Vec<FillDescriptor>,
    /// styleId（cellXfsインデックス）-> fillId
    cell_xf_fills: Vec<Option<u32>>,
    /// ワークブック順のシート一覧
    sheets: Vec<SheetEntry>,
    /// アクティブシートのインデックス
    active_tab: usize,
    /// 1904年エポックを使用するかどうか
    is_1904: bool,
    /// アクティブシートのセルスタイル
    active_styles: SheetStyles,
}

impl XlsxMetadataParser {
    /// XLSXファイル（ZIPアーカイブ）からメタデータを解析
    ///
    /// # 戻り値
    ///
    /// * `Ok(XlsxMetadataParser)` - メタデータの解析に成功した場合
    /// * `Err(XlsxToPdfError)` - ZIPが壊れている、セキュリティ制限に違反した、
    ///   またはワークブック定義が読めない場合
    pub fn new<R: Read + Seek>(xlsx_reader: R) -> Result<Self, XlsxToPdfError> {
        let security_config = SecurityConfig::default();

        let mut archive =
            ZipArchive::new(xlsx_reader).map_err(|e| XlsxToPdfError::Zip(format!("{}", e)))?;

        security_config.check_entry_count(archive.len())?;

        let mut total_decompressed_size = 0u64;
        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| XlsxToPdfError::Zip(format!("{}", e)))?;

            validate_zip_path(file.name()).map_err(|e| {
                XlsxToPdfError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;
            security_config.check_entry_size(file.name(), file.size(), &mut total_decompressed_size)?;
        }

        // 1. xl/styles.xml
        let (fills, cell_xf_fills) = match read_part(&mut archive, "xl/styles.xml")? {
            Some(xml) => Self::parse_styles(&xml)?,
            None => (Vec::new(), Vec::new()),
        };

        // 2. xl/workbook.xml と xl/_rels/workbook.xml.rels
        let workbook_xml = read_part(&mut archive, "xl/workbook.xml")?
            .ok_or_else(|| XlsxToPdfError::Xml("Missing part: xl/workbook.xml".to_string()))?;
        let info = Self::parse_workbook(&workbook_xml)?;

        let relationships = match read_part(&mut archive, "xl/_rels/workbook.xml.rels")? {
            Some(xml) => Self::parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let sheets: Vec<SheetEntry> = info
            .sheets
            .into_iter()
            .map(|(name, rel_id)| SheetEntry {
                part: rel_id
                    .and_then(|id| relationships.get(&id))
                    .map(|target| resolve_part_path(target)),
                name,
            })
            .collect();

        let active_tab = if info.active_tab < sheets.len() {
            info.active_tab
        } else {
            0
        };

        // 3. アクティブシートのセルスタイル
        let active_styles = match sheets.get(active_tab).and_then(|s| s.part.as_deref()) {
            Some(part) => match read_part(&mut archive, part)? {
                Some(xml) => Self::parse_sheet_styles(&xml)?,
                None => {
                    log::warn!("worksheet part '{}' not found in archive", part);
                    SheetStyles::default()
                }
            },
            None => SheetStyles::default(),
        };

        log::debug!(
            "parsed workbook metadata: {} fills, {} cell formats, {} sheets, active tab {}",
            fills.len(),
            cell_xf_fills.len(),
            sheets.len(),
            active_tab
        );

        Ok(Self {
            fills,
            cell_xf_fills,
            sheets,
            active_tab,
            is_1904: info.is_1904,
            active_styles,
        })
    }

    /// アクティブシートの名前
    pub fn active_sheet_name(&self) -> Option<&str> {
        self.sheets.get(self.active_tab).map(|s| s.name.as_str())
    }

    /// ワークブック順のシート一覧
    #[cfg(test)]
    pub fn sheets(&self) -> &[SheetEntry] {
        &self.sheets
    }

    /// アクティブシート上のセルの塗りつぶし情報を取得
    ///
    /// `s`属性を持たないセルはスタイル0（既定の書式）として扱います。
    /// `s`属性が解釈できないセルは塗りつぶしなしです。
    pub fn cell_fill(&self, row: u32, col: u32) -> Option<&FillDescriptor> {
        if self.active_styles.unstyled.contains(&(row, col)) {
            return None;
        }
        let style_id = self
            .active_styles
            .cell_styles
            .get(&(row, col))
            .copied()
            .unwrap_or(0);
        self.fill_for_style(style_id)
    }

    /// styleId（cellXfsインデックス）から塗りつぶし情報を取得
    pub fn fill_for_style(&self, style_id: u32) -> Option<&FillDescriptor> {
        let fill_id = self.cell_xf_fills.get(style_id as usize).copied().flatten()?;
        self.fills.get(fill_id as usize)
    }

    /// アクティブシートで`<c>`要素が存在する最大の行・列
    pub fn styled_extent(&self) -> Option<CellCoord> {
        self.active_styles.extent
    }

    /// 1904年エポックを使用するかどうか
    pub fn is_1904(&self) -> bool {
        self.is_1904
    }

    /// xl/styles.xml の解析（プライベート）
    ///
    /// `<fills>`と`<cellXfs>`を解析し、fillIdとstyleIdの対応を構築します。
    /// `<fgColor>`の属性が壊れている場合はその属性を無視します（色なし扱い）。
    fn parse_styles(
        xml: &[u8],
    ) -> Result<(Vec<FillDescriptor>, Vec<Option<u32>>), XlsxToPdfError> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut fills = Vec::new();
        let mut cell_xf_fills = Vec::new();
        let mut in_fills = false;
        let mut in_cell_xfs = false;
        let mut in_pattern_fill = false;
        let mut current_fill: Option<FillDescriptor> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"fills" => in_fills = true,
                    b"fill" if in_fills => current_fill = Some(FillDescriptor::Empty),
                    b"patternFill" if current_fill.is_some() => in_pattern_fill = true,
                    b"fgColor" if in_pattern_fill => current_fill = Some(parse_fg_color(&e)),
                    b"cellXfs" => in_cell_xfs = true,
                    // <xf fillId="2"><alignment .../></xf>
                    b"xf" if in_cell_xfs => cell_xf_fills.push(parse_fill_id(&e)),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"fill" if in_fills => fills.push(FillDescriptor::Empty),
                    // <fgColor rgb="FFFF0000"/>
                    b"fgColor" if in_pattern_fill => current_fill = Some(parse_fg_color(&e)),
                    b"xf" if in_cell_xfs => cell_xf_fills.push(parse_fill_id(&e)),
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"fills" => in_fills = false,
                    b"fill" => {
                        if let Some(fill) = current_fill.take() {
                            fills.push(fill);
                        }
                    }
                    b"patternFill" => in_pattern_fill = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(XlsxToPdfError::Xml(format!("styles.xml: {}", e)));
                }
                _ => {}
            }
            buf.clear();
        }

        Ok((fills, cell_xf_fills))
    }

    /// xl/workbook.xml の解析（プライベート）
    ///
    /// シート一覧、アクティブタブ、1904年エポックフラグを取得します。
    fn parse_workbook(xml: &[u8]) -> Result<WorkbookInfo, XlsxToPdfError> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut info = WorkbookInfo::default();
        let mut seen_view = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"workbookPr" => {
                        if let Some(value) = attr_value(&e, b"date1904")? {
                            info.is_1904 = value == "1" || value == "true";
                        }
                    }
                    // 複数のビューがある場合は最初のものだけを使う
                    b"workbookView" if !seen_view => {
                        seen_view = true;
                        if let Some(value) = attr_value(&e, b"activeTab")? {
                            info.active_tab = value.trim().parse().unwrap_or_else(|_| {
                                log::warn!("ignoring invalid activeTab '{}'", value);
                                0
                            });
                        }
                    }
                    b"sheet" => {
                        let name = attr_value(&e, b"name")?.ok_or_else(|| {
                            XlsxToPdfError::Xml("<sheet> element without name".to_string())
                        })?;
                        let rel_id = attr_value(&e, b"id")?;
                        info.sheets.push((name, rel_id));
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxToPdfError::Xml(format!("workbook.xml: {}", e))),
                _ => {}
            }
            buf.clear();
        }

        Ok(info)
    }

    /// リレーションシップファイル（*.rels）の解析（プライベート）
    ///
    /// リレーションID -> ターゲットパス のマッピングを返します。
    fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, XlsxToPdfError> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut relationships = HashMap::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        if let (Some(id), Some(target)) =
                            (attr_value(&e, b"Id")?, attr_value(&e, b"Target")?)
                        {
                            relationships.insert(id, target);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxToPdfError::Xml(format!("workbook.xml.rels: {}", e))),
                _ => {}
            }
            buf.clear();
        }

        Ok(relationships)
    }

    /// ワークシートXMLからセルのスタイルIDを収集（プライベート）
    ///
    /// `r`属性を省略したセル・行は直前の位置から連番で補います。
    fn parse_sheet_styles(xml: &[u8]) -> Result<SheetStyles, XlsxToPdfError> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut styles = SheetStyles::default();
        let mut in_sheet_data = false;
        let mut current_row: Option<u32> = None;
        let mut next_col: u32 = 0;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"sheetData" => in_sheet_data = true,
                    b"row" if in_sheet_data => {
                        let row = attr_value(&e, b"r")?
                            .and_then(|r| r.trim().parse::<u32>().ok())
                            .map(|r| r.saturating_sub(1))
                            .unwrap_or_else(|| current_row.map_or(0, |r| r + 1));
                        current_row = Some(row);
                        next_col = 0;
                    }
                    b"c" if in_sheet_data => {
                        let coord = attr_value(&e, b"r")?
                            .and_then(|reference| CellCoord::from_a1_notation(&reference))
                            .unwrap_or_else(|| CellCoord::new(current_row.unwrap_or(0), next_col));
                        next_col = coord.col + 1;

                        // 解釈できないスタイルIDは色なし（スタイル0にも落とさない）
                        if let Some(style) = attr_value(&e, b"s")? {
                            match style.trim().parse::<u32>() {
                                Ok(style_id) => {
                                    styles.cell_styles.insert((coord.row, coord.col), style_id);
                                }
                                Err(_) => {
                                    log::debug!(
                                        "ignoring invalid style id '{}' at {}",
                                        style,
                                        coord.to_a1_notation()
                                    );
                                    styles.unstyled.insert((coord.row, coord.col));
                                }
                            }
                        }

                        styles.extent = Some(match styles.extent {
                            Some(max) => {
                                CellCoord::new(max.row.max(coord.row), max.col.max(coord.col))
                            }
                            None => coord,
                        });
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => {
                    if e.local_name().as_ref() == b"sheetData" {
                        in_sheet_data = false;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxToPdfError::Xml(format!("worksheet: {}", e))),
                _ => {}
            }
            buf.clear();
        }

        Ok(styles)
    }
}

/// ZIP内のパーツを読み込む（存在しない場合は`None`）
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, XlsxToPdfError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(XlsxToPdfError::Zip(format!("{}", e))),
    };

    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(Some(content))
}

/// リレーションのターゲットをZIP内の絶対パスに変換
///
/// `worksheets/sheet1.xml` -> `xl/worksheets/sheet1.xml`、
/// `/xl/worksheets/sheet1.xml` -> `xl/worksheets/sheet1.xml`
fn resolve_part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// 要素から属性値を取得（名前空間プレフィックスは無視）
fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, XlsxToPdfError> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| XlsxToPdfError::Xml(format!("XML attribute error: {}", e)))?;
        if attr.key.local_name().as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| XlsxToPdfError::Xml(format!("XML attribute error: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// `<xf>`要素のfillId（解釈できない場合は`None`）
fn parse_fill_id(e: &BytesStart<'_>) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"fillId")
        .and_then(|attr| std::str::from_utf8(&attr.value).ok()?.trim().parse().ok())
}

/// `<fgColor>`要素から塗りつぶし情報を構築
///
/// 壊れた属性や数値として解釈できない値は無視され、最終的に色なしになります。
fn parse_fg_color(e: &BytesStart<'_>) -> FillDescriptor {
    let mut attrs = ColorAttrs::default();

    for attr in e.attributes().flatten() {
        let value = match attr.unescape_value() {
            Ok(value) => value,
            Err(_) => continue,
        };
        match attr.key.local_name().as_ref() {
            b"rgb" => attrs.rgb = Some(value.trim().to_string()),
            b"theme" => attrs.theme = value.trim().parse().ok(),
            b"tint" => attrs.tint = value.trim().parse().ok(),
            b"indexed" => attrs.indexed = value.trim().parse().ok(),
            _ => {}
        }
    }

    FillDescriptor::from_color_attrs(attrs)
}
