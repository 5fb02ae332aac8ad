//! PDF Writer Module
//!
//! レイアウト済みのテーブルをpdf-writerでPDFドキュメントに書き出すモジュール。
//! 作成日時などは埋め込まないため、同じ入力からは常に同じバイト列が得られます。

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::error::XlsxToPdfError;
use crate::grid::SheetGrid;
use crate::output::font;
use crate::output::layout::{cell_lines, TableLayout, PADDING_X, PADDING_Y};
use crate::output::style::{CellStyle, GridLine, HorizontalAlign, VerticalAlign};

/// ページリソース内のフォント名
const FONT_RESOURCE: Name<'static> = Name(b"F1");

/// i番目のページ（0始まり）のオブジェクトIDとコンテンツストリームID
fn page_refs(index: usize) -> Result<(Ref, Ref), XlsxToPdfError> {
    let base = i32::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(2))
        .and_then(|i| i.checked_add(4))
        .filter(|i| *i < i32::MAX - 1)
        .ok_or_else(|| XlsxToPdfError::Render(format!("Too many pages: {}", index + 1)))?;
    Ok((Ref::new(base), Ref::new(base + 1)))
}

/// 1つのテーブルをPDFに書き出す
pub(crate) struct PdfTableWriter<'a> {
    grid: &'a SheetGrid,
    layout: &'a TableLayout,
    styles: &'a [Vec<CellStyle>],
    page_width: f32,
    page_height: f32,
    font_size: f32,
}

impl<'a> PdfTableWriter<'a> {
    pub fn new(
        grid: &'a SheetGrid,
        layout: &'a TableLayout,
        styles: &'a [Vec<CellStyle>],
        (page_width, page_height): (f32, f32),
        font_size: f32,
    ) -> Self {
        Self {
            grid,
            layout,
            styles,
            page_width,
            page_height,
            font_size,
        }
    }

    /// PDFドキュメント全体をバイト列として生成する
    pub fn write(&self) -> Result<Vec<u8>, XlsxToPdfError> {
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let mut pdf = Pdf::new();

        let page_ids = (0..self.layout.pages.len())
            .map(|i| page_refs(i).map(|(page, _)| page))
            .collect::<Result<Vec<_>, _>>()?;
        let page_count = i32::try_from(page_ids.len())
            .map_err(|_| XlsxToPdfError::Render("Too many pages".to_string()))?;

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_count);
        pdf.type1_font(font_id)
            .base_font(Name(font::FONT_NAME))
            .encoding_predefined(Name(font::FONT_ENCODING));

        for (index, rows) in self.layout.pages.iter().enumerate() {
            let (page_id, content_id) = page_refs(index)?;

            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, self.page_width, self.page_height));
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources().fonts().pair(FONT_RESOURCE, font_id);
            page.finish();

            let content = self.page_content(rows.clone());
            pdf.stream(content_id, &content);
        }

        Ok(pdf.finish())
    }

    /// 1ページ分のコンテンツストリーム
    ///
    /// 背景、テキスト、枠線の順に描画します。
    fn page_content(&self, rows: std::ops::Range<usize>) -> Vec<u8> {
        let cells = self.page_cells(rows);
        let mut content = Content::new();

        // 1. 背景
        for cell in &cells {
            if let Some(color) = cell.style.background {
                content.set_fill_rgb(color.red(), color.green(), color.blue());
                content.rect(cell.x, cell.y_bottom(), cell.width, cell.height);
                content.fill_nonzero();
            }
        }

        // 2. テキスト（黒）
        let mut text_started = false;
        for cell in &cells {
            for (x, y, line) in self.text_lines(cell) {
                if !text_started {
                    content.set_fill_rgb(0.0, 0.0, 0.0);
                    content.begin_text();
                    content.set_font(FONT_RESOURCE, self.font_size);
                    text_started = true;
                }
                content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
                content.show(Str(&font::encode(line)));
            }
        }
        if text_started {
            content.end_text();
        }

        // 3. 枠線
        let mut current_line: Option<GridLine> = None;
        for cell in &cells {
            if let Some(line) = cell.style.grid {
                if current_line != Some(line) {
                    content.set_line_width(line.weight);
                    content.set_stroke_rgb(line.color.red(), line.color.green(), line.color.blue());
                    current_line = Some(line);
                }
                content.rect(cell.x, cell.y_bottom(), cell.width, cell.height);
                content.stroke();
            }
        }

        content.finish()
    }

    /// ページ上のセルを配置する（短い行も最大列数まで埋める）
    fn page_cells(&self, rows: std::ops::Range<usize>) -> Vec<PlacedCell<'a>> {
        let col_offsets = self.layout.col_offsets();
        let mut cells = Vec::new();
        let mut y_top = self.layout.y_top;

        for row in rows {
            let height = self.layout.row_heights[row];
            for (col, (x, width)) in col_offsets
                .iter()
                .zip(self.layout.col_widths.iter())
                .enumerate()
            {
                cells.push(PlacedCell {
                    text: self.grid.cell_text(row, col).unwrap_or(""),
                    style: self
                        .styles
                        .get(row)
                        .and_then(|r| r.get(col))
                        .copied()
                        .unwrap_or_default(),
                    x: *x,
                    y_top,
                    width: *width,
                    height,
                });
            }
            y_top -= height;
        }

        cells
    }

    /// セル内の各行の描画位置（ベースライン）
    fn text_lines<'c>(&self, cell: &PlacedCell<'c>) -> Vec<(f32, f32, &'c str)> {
        if cell.text.is_empty() {
            return Vec::new();
        }

        let leading = self.layout.leading;
        let lines: Vec<&str> = cell_lines(cell.text).collect();
        let block_height = lines.len() as f32 * leading;

        let inner_top = cell.y_top - PADDING_Y;
        let inner_bottom = cell.y_bottom() + PADDING_Y;
        let block_top = match cell.style.v_align {
            VerticalAlign::Top => inner_top,
            VerticalAlign::Middle => cell.y_top - cell.height / 2.0 + block_height / 2.0,
            VerticalAlign::Bottom => inner_bottom + block_height,
        };

        lines
            .into_iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(i, line)| {
                let line_width = font::text_width(line, self.font_size);
                let x = match cell.style.h_align {
                    HorizontalAlign::Left => cell.x + PADDING_X,
                    HorizontalAlign::Center => cell.x + (cell.width - line_width) / 2.0,
                    HorizontalAlign::Right => cell.x + cell.width - PADDING_X - line_width,
                };
                let y = block_top - self.font_size - i as f32 * leading;
                (x, y, line)
            })
            .collect()
    }
}

/// ページ上に配置されたセル
#[derive(Debug, Clone, Copy)]
struct PlacedCell<'a> {
    text: &'a str,
    style: CellStyle,
    x: f32,
    y_top: f32,
    width: f32,
    height: f32,
}

impl PlacedCell<'_> {
    fn y_bottom(&self) -> f32 {
        self.y_top - self.height
    }
}
