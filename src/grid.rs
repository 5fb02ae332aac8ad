//! Grid Module
//!
//! シートから抽出したテキストグリッドと色グリッドの組を保持するモジュール。
//! 2つのグリッドは常に同じ形状（行数・各行の列数）を持ちます。

use serde::Serialize;

use crate::color::Color;
use crate::error::XlsxToPdfError;
use crate::types::CellCoord;

/// テキストグリッド（行 × 列）
pub type TextGrid = Vec<Vec<String>>;

/// 色グリッド（行 × 列）。`None`は背景色なし
pub type ColorGrid = Vec<Vec<Option<Color>>>;

/// 抽出済みシートのグリッド
///
/// テキストと背景色を並行した2つのグリッドとして保持します。
/// 形状の一致はコンストラクタで検証されるため、以降の処理では常に成立します。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetGrid {
    text: TextGrid,
    colors: ColorGrid,
}

impl SheetGrid {
    /// テキストグリッドと色グリッドから生成
    ///
    /// # 戻り値
    ///
    /// * `Ok(SheetGrid)` - 両者の形状が一致する場合
    /// * `Err(XlsxToPdfError::GridShape)` - 行数または列数が一致しない場合
    pub fn new(text: TextGrid, colors: ColorGrid) -> Result<Self, XlsxToPdfError> {
        if text.len() != colors.len() {
            return Err(XlsxToPdfError::GridShape {
                row: text.len().min(colors.len()),
                text_len: text.get(colors.len()).map_or(0, Vec::len),
                color_len: colors.get(text.len()).map_or(0, Vec::len),
            });
        }

        if let Some((row, (t, c))) = text
            .iter()
            .zip(colors.iter())
            .enumerate()
            .find(|(_, (t, c))| t.len() != c.len())
        {
            return Err(XlsxToPdfError::GridShape {
                row,
                text_len: t.len(),
                color_len: c.len(),
            });
        }

        Ok(Self { text, colors })
    }

    /// 背景色なしのテキストだけのグリッドを生成
    pub fn from_text(text: TextGrid) -> Self {
        let colors = text.iter().map(|row| vec![None; row.len()]).collect();
        Self { text, colors }
    }

    /// 行を1つ追加する（抽出処理用）
    pub(crate) fn push_row(
        &mut self,
        text: Vec<String>,
        colors: Vec<Option<Color>>,
    ) -> Result<(), XlsxToPdfError> {
        if text.len() != colors.len() {
            return Err(XlsxToPdfError::GridShape {
                row: self.text.len(),
                text_len: text.len(),
                color_len: colors.len(),
            });
        }
        self.text.push(text);
        self.colors.push(colors);
        Ok(())
    }

    /// 行数
    pub fn rows(&self) -> usize {
        self.text.len()
    }

    /// 最大列数（行ごとの列数の最大値）
    pub fn cols(&self) -> usize {
        self.text.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// セルが1つも存在しないかどうか
    pub fn is_empty(&self) -> bool {
        self.cols() == 0
    }

    pub fn text(&self) -> &TextGrid {
        &self.text
    }

    pub fn colors(&self) -> &ColorGrid {
        &self.colors
    }

    /// 指定セルのテキスト（範囲外は`None`）
    pub fn cell_text(&self, row: usize, col: usize) -> Option<&str> {
        self.text.get(row)?.get(col).map(String::as_str)
    }

    /// 指定セルの背景色（範囲外または色なしは`None`）
    pub fn cell_color(&self, row: usize, col: usize) -> Option<Color> {
        self.colors.get(row)?.get(col).copied().flatten()
    }

    /// 背景色を持つセルを行優先順で列挙する
    pub fn colored_cells(&self) -> impl Iterator<Item = (CellCoord, Color)> + '_ {
        self.colors.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, color)| {
                color.map(|c| (CellCoord::new(row as u32, col as u32), c))
            })
        })
    }

    /// テキストグリッドと色グリッドに分解する
    pub fn into_parts(self) -> (TextGrid, ColorGrid) {
        (self.text, self.colors)
    }

    /// 診断用のJSON文字列に変換する
    ///
    /// 色は`"#RRGGBB"`、色なしは`null`として出力されます。
    pub fn to_json(&self) -> Result<String, XlsxToPdfError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| XlsxToPdfError::Render(format!("Failed to serialize grid: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::from_rgb8(255, 0, 0)
    }

    #[test]
    fn test_new_accepts_matching_shapes() {
        let grid = SheetGrid::new(
            vec![vec!["a".into(), "b".into()], vec!["c".into()]],
            vec![vec![Some(red()), None], vec![None]],
        )
        .unwrap();

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.cell_text(0, 1), Some("b"));
        assert_eq!(grid.cell_color(0, 0), Some(red()));
        assert_eq!(grid.cell_color(0, 1), None);
        assert_eq!(grid.cell_text(5, 0), None);
    }

    #[test]
    fn test_new_rejects_row_count_mismatch() {
        let result = SheetGrid::new(vec![vec!["a".into()], vec!["b".into()]], vec![vec![None]]);
        match result {
            Err(XlsxToPdfError::GridShape { row, .. }) => assert_eq!(row, 1),
            _ => panic!("Expected GridShape error"),
        }
    }

    #[test]
    fn test_new_rejects_column_count_mismatch() {
        let result = SheetGrid::new(
            vec![vec!["a".into()], vec!["b".into(), "c".into()]],
            vec![vec![None], vec![None]],
        );
        match result {
            Err(XlsxToPdfError::GridShape {
                row,
                text_len,
                color_len,
            }) => {
                assert_eq!(row, 1);
                assert_eq!(text_len, 2);
                assert_eq!(color_len, 1);
            }
            _ => panic!("Expected GridShape error"),
        }
    }

    #[test]
    fn test_push_row_keeps_invariant() {
        let mut grid = SheetGrid::default();
        grid.push_row(vec!["x".into()], vec![None]).unwrap();
        assert!(grid.push_row(vec!["y".into()], vec![]).is_err());
        assert_eq!(grid.rows(), 1);
    }

    #[test]
    fn test_colored_cells_row_major() {
        let blue = Color::from_rgb8(0, 0, 255);
        let grid = SheetGrid::new(
            vec![vec![String::new(); 2]; 2],
            vec![vec![None, Some(red())], vec![Some(blue), None]],
        )
        .unwrap();

        let cells: Vec<_> = grid.colored_cells().collect();
        assert_eq!(
            cells,
            vec![
                (CellCoord::new(0, 1), red()),
                (CellCoord::new(1, 0), blue)
            ]
        );
    }

    #[test]
    fn test_from_text_and_empty() {
        let grid = SheetGrid::from_text(vec![vec!["a".into(), "b".into()]]);
        assert_eq!(grid.colored_cells().count(), 0);
        assert!(!grid.is_empty());
        assert!(SheetGrid::default().is_empty());
    }

    #[test]
    fn test_to_json() {
        let grid = SheetGrid::new(vec![vec!["Name".into(), "Age".into()]], vec![vec![Some(red()), None]])
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&grid.to_json().unwrap()).unwrap();
        assert_eq!(json["text"][0][0], "Name");
        assert_eq!(json["colors"][0][0], "#FF0000");
        assert!(json["colors"][0][1].is_null());
    }
}
