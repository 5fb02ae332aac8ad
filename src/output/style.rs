//! Table Style Module
//!
//! テーブルに適用するスタイルコマンドの列と、セルごとの解決済みスタイル。

use crate::color::Color;
use crate::grid::SheetGrid;
use crate::types::{CellCoord, CellRange};

/// 水平方向の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// 垂直方向の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// スタイルコマンドの適用範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleScope {
    /// テーブル全体
    Table,
    /// 指定範囲（両端を含む）
    Range(CellRange),
}

impl StyleScope {
    /// 単一セルだけを対象とする範囲
    pub fn cell(coord: CellCoord) -> Self {
        StyleScope::Range(CellRange::single(coord))
    }

    /// 行数・列数で切り詰めた対象範囲（行・列とも半開区間）
    fn bounds(&self, rows: usize, cols: usize) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        match self {
            StyleScope::Table => (0..rows, 0..cols),
            StyleScope::Range(range) => {
                let row_end = (range.end.row as usize + 1).min(rows);
                let col_end = (range.end.col as usize + 1).min(cols);
                (
                    (range.start.row as usize).min(row_end)..row_end,
                    (range.start.col as usize).min(col_end)..col_end,
                )
            }
        }
    }
}

/// 宣言的なスタイルコマンド
///
/// `TableStyle`に順番に蓄積され、描画前に一度だけまとめて適用されます。
/// 同じセルに複数のコマンドが当たる場合は後のコマンドが優先されます。
#[derive(Debug, Clone, PartialEq)]
pub enum StyleCommand {
    /// 各セルの枠線
    Grid {
        scope: StyleScope,
        /// 線の太さ（pt）
        weight: f32,
        color: Color,
    },
    /// 垂直方向の配置
    VAlign {
        scope: StyleScope,
        align: VerticalAlign,
    },
    /// 水平方向の配置
    Align {
        scope: StyleScope,
        align: HorizontalAlign,
    },
    /// 背景色
    Background { scope: StyleScope, color: Color },
}

impl StyleCommand {
    pub fn scope(&self) -> StyleScope {
        match self {
            StyleCommand::Grid { scope, .. }
            | StyleCommand::VAlign { scope, .. }
            | StyleCommand::Align { scope, .. }
            | StyleCommand::Background { scope, .. } => *scope,
        }
    }
}

/// スタイルコマンドの順序付きリスト
///
/// ```rust
/// use xlsxpdf::{Color, SheetGrid, StyleCommand, TableStyle};
///
/// let grid = SheetGrid::new(
///     vec![vec!["Name".into(), "Age".into()]],
///     vec![vec![Some(Color::from_hex("FF0000").unwrap()), None]],
/// )?;
/// let style = TableStyle::for_grid(&grid, 1.0);
///
/// assert_eq!(style.commands().len(), 4);
/// assert_eq!(style.background_count(), 1);
/// assert!(matches!(style.commands()[0], StyleCommand::Grid { .. }));
/// # Ok::<(), xlsxpdf::XlsxToPdfError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStyle {
    commands: Vec<StyleCommand>,
}

impl TableStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// グリッドから標準のスタイルを構築する
    ///
    /// コマンドの順序は固定です。
    ///
    /// 1. 全セルに黒の枠線（`line_width`pt）
    /// 2. 全体を垂直中央揃え
    /// 3. 全体を水平中央揃え
    /// 4. 背景色を持つセルごとに、そのセルだけを対象とした背景色（行優先順）
    pub fn for_grid(grid: &SheetGrid, line_width: f32) -> Self {
        let mut style = Self::new();
        style.push(StyleCommand::Grid {
            scope: StyleScope::Table,
            weight: line_width,
            color: Color::BLACK,
        });
        style.push(StyleCommand::VAlign {
            scope: StyleScope::Table,
            align: VerticalAlign::Middle,
        });
        style.push(StyleCommand::Align {
            scope: StyleScope::Table,
            align: HorizontalAlign::Center,
        });

        for (coord, color) in grid.colored_cells() {
            style.push(StyleCommand::Background {
                scope: StyleScope::cell(coord),
                color,
            });
        }
        style
    }

    /// コマンドを末尾に追加する
    pub fn push(&mut self, command: StyleCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[StyleCommand] {
        &self.commands
    }

    /// 背景色コマンドの数
    pub fn background_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, StyleCommand::Background { .. }))
            .count()
    }

    /// すべてのコマンドを順に適用し、セルごとのスタイルを求める
    pub(crate) fn resolve(&self, rows: usize, cols: usize) -> Vec<Vec<CellStyle>> {
        let mut cells = vec![vec![CellStyle::default(); cols]; rows];

        for command in &self.commands {
            let (row_range, col_range) = command.scope().bounds(rows, cols);
            for row in &mut cells[row_range] {
                for cell in &mut row[col_range.clone()] {
                    match command {
                        StyleCommand::Grid { weight, color, .. } => {
                            cell.grid = Some(GridLine {
                                weight: *weight,
                                color: *color,
                            })
                        }
                        StyleCommand::VAlign { align, .. } => cell.v_align = *align,
                        StyleCommand::Align { align, .. } => cell.h_align = *align,
                        StyleCommand::Background { color, .. } => cell.background = Some(*color),
                    }
                }
            }
        }

        cells
    }
}

/// 枠線の太さと色
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GridLine {
    pub weight: f32,
    pub color: Color,
}

/// 解決済みのセルスタイル（既定は左揃え・下揃え・背景なし・枠線なし）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct CellStyle {
    pub h_align: HorizontalAlign,
    pub v_align: VerticalAlign,
    pub background: Option<Color>,
    pub grid: Option<GridLine>,
}
