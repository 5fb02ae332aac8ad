//! Table Layout Module
//!
//! 列幅・行高さの計算と、行単位のページ分割。

use std::ops::Range;

use crate::grid::SheetGrid;
use crate::output::font;
use crate::output::RenderOptions;

/// セルの左右の余白（pt）
pub(crate) const PADDING_X: f32 = 6.0;

/// セルの上下の余白（pt）
pub(crate) const PADDING_Y: f32 = 3.0;

/// 行送り（フォントサイズの1.2倍）
pub(crate) fn leading(font_size: f32) -> f32 {
    font_size * 6.0 / 5.0
}

/// セルのテキストを行に分割する
pub(crate) fn cell_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// テーブル全体のレイアウト
///
/// 座標はPDFのユーザー空間（左下原点、pt単位）です。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableLayout {
    /// 列ごとの幅
    pub col_widths: Vec<f32>,
    /// 行ごとの高さ
    pub row_heights: Vec<f32>,
    /// テーブル左端のx座標
    pub x_origin: f32,
    /// テーブル上端のy座標（各ページ共通）
    pub y_top: f32,
    /// ページごとの行範囲
    pub pages: Vec<Range<usize>>,
    /// 行送り（pt）
    pub leading: f32,
}

impl TableLayout {
    /// グリッドと描画設定からレイアウトを計算する
    ///
    /// 足りない列（短い行）は空セルとして扱います。
    /// 空のグリッドでも空白ページが1ページ生成されます。
    pub fn compute(grid: &SheetGrid, options: &RenderOptions) -> Self {
        let font_size = options.font_size;
        let leading = leading(font_size);
        let cols = grid.cols();

        let mut col_widths = vec![0.0f32; cols];
        let mut row_heights = Vec::with_capacity(grid.rows());

        for row in grid.text() {
            let mut line_count = 1;
            for (col, text) in row.iter().enumerate() {
                let mut lines = 0;
                for line in cell_lines(text) {
                    lines += 1;
                    let width = font::text_width(line, font_size);
                    if width > col_widths[col] {
                        col_widths[col] = width;
                    }
                }
                line_count = line_count.max(lines);
            }
            row_heights.push(line_count as f32 * leading + 2.0 * PADDING_Y);
        }

        for width in &mut col_widths {
            *width += 2.0 * PADDING_X;
        }

        let frame_width = options.page_width - 2.0 * options.margin;
        let frame_height = options.page_height - 2.0 * options.margin;

        let table_width: f32 = col_widths.iter().sum();
        let x_origin = if table_width <= frame_width {
            options.margin + (frame_width - table_width) / 2.0
        } else {
            options.margin
        };

        let pages = if cols == 0 {
            vec![0..0]
        } else {
            paginate(&row_heights, frame_height)
        };

        Self {
            col_widths,
            row_heights,
            x_origin,
            y_top: options.page_height - options.margin,
            pages,
            leading,
        }
    }

    /// テーブルの幅
    pub fn table_width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    /// 各列の左端のx座標
    pub fn col_offsets(&self) -> Vec<f32> {
        self.col_widths
            .iter()
            .scan(self.x_origin, |x, width| {
                let left = *x;
                *x += width;
                Some(left)
            })
            .collect()
    }
}

/// 行をページに割り付ける
///
/// 枠に収まらなくなった時点で改ページします。
/// 枠より高い行は単独で1ページを占めます（はみ出した部分は切れます）。
fn paginate(row_heights: &[f32], frame_height: f32) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut used = 0.0f32;

    for (row, height) in row_heights.iter().enumerate() {
        if row > start && used + height > frame_height {
            pages.push(start..row);
            start = row;
            used = 0.0;
        }
        used += height;
    }

    if start < row_heights.len() || pages.is_empty() {
        pages.push(start..row_heights.len());
    }
    pages
}
