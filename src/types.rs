//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

/// セル座標（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    pub fn to_a1_notation(self) -> String {
        format!("{}{}", Self::col_index_to_letter(self.col), self.row + 1)
    }

    /// A1形式の文字列から座標を生成（例: "B3" -> (2, 1)）
    ///
    /// `$`による絶対参照記号は無視します。列または行が欠けている場合は`None`を返します。
    pub fn from_a1_notation(reference: &str) -> Option<Self> {
        let mut col: u32 = 0;
        let mut row: u32 = 0;
        let mut seen_col = false;
        let mut seen_row = false;

        for ch in reference.chars().filter(|c| *c != '$') {
            if ch.is_ascii_alphabetic() && !seen_row {
                let digit = (ch.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
                col = col.checked_mul(26)?.checked_add(digit)?;
                seen_col = true;
            } else if ch.is_ascii_digit() && seen_col {
                row = row.checked_mul(10)?.checked_add(ch as u32 - '0' as u32)?;
                seen_row = true;
            } else {
                return None;
            }
        }

        if !seen_row || row == 0 {
            return None;
        }
        Some(Self::new(row - 1, col - 1))
    }

    /// 列インデックスを文字列に変換（0 -> "A", 25 -> "Z", 26 -> "AA"）
    fn col_index_to_letter(mut col: u32) -> String {
        let mut result = String::new();
        loop {
            let remainder = col % 26;
            result.insert(0, (b'A' + remainder as u8) as char);
            if col < 26 {
                break;
            }
            col = col / 26 - 1;
        }
        result
    }
}

/// セル範囲（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    /// 新しい範囲を生成
    pub fn new(start: CellCoord, end: CellCoord) -> Self {
        Self { start, end }
    }

    /// 単一セルだけを含む範囲を生成
    pub fn single(coord: CellCoord) -> Self {
        Self::new(coord, coord)
    }

    /// 指定された座標が範囲内にあるかを判定
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row >= self.start.row
            && coord.row <= self.end.row
            && coord.col >= self.start.col
            && coord.col <= self.end.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_coord_to_a1_notation() {
        assert_eq!(CellCoord::new(0, 0).to_a1_notation(), "A1");
        assert_eq!(CellCoord::new(9, 25).to_a1_notation(), "Z10");
        assert_eq!(CellCoord::new(0, 26).to_a1_notation(), "AA1");
        assert_eq!(CellCoord::new(99, 701).to_a1_notation(), "ZZ100");
        assert_eq!(CellCoord::new(0, 16383).to_a1_notation(), "XFD1");
    }

    #[test]
    fn test_cell_coord_from_a1_notation() {
        assert_eq!(CellCoord::from_a1_notation("A1"), Some(CellCoord::new(0, 0)));
        assert_eq!(CellCoord::from_a1_notation("B3"), Some(CellCoord::new(2, 1)));
        assert_eq!(CellCoord::from_a1_notation("AA10"), Some(CellCoord::new(9, 26)));
        assert_eq!(CellCoord::from_a1_notation("$C$5"), Some(CellCoord::new(4, 2)));
        assert_eq!(
            CellCoord::from_a1_notation("XFD1048576"),
            Some(CellCoord::new(1_048_575, 16_383))
        );
    }

    #[test]
    fn test_cell_coord_from_a1_notation_invalid() {
        assert_eq!(CellCoord::from_a1_notation(""), None);
        assert_eq!(CellCoord::from_a1_notation("A"), None);
        assert_eq!(CellCoord::from_a1_notation("12"), None);
        assert_eq!(CellCoord::from_a1_notation("A0"), None);
        assert_eq!(CellCoord::from_a1_notation("1A"), None);
        assert_eq!(CellCoord::from_a1_notation("A1B"), None);
    }

    #[test]
    fn test_a1_round_trip_for_wide_columns() {
        for col in [0, 25, 26, 51, 52, 701, 702, 16383] {
            let coord = CellCoord::new(4, col);
            assert_eq!(
                CellCoord::from_a1_notation(&coord.to_a1_notation()),
                Some(coord)
            );
        }
    }

    #[test]
    fn test_cell_range_contains() {
        let range = CellRange::new(CellCoord::new(1, 1), CellCoord::new(3, 2));
        assert!(range.contains(CellCoord::new(1, 1)));
        assert!(range.contains(CellCoord::new(3, 2)));
        assert!(range.contains(CellCoord::new(2, 2)));
        assert!(!range.contains(CellCoord::new(0, 1)));
        assert!(!range.contains(CellCoord::new(2, 3)));
    }

    #[test]
    fn test_cell_range_single() {
        let range = CellRange::single(CellCoord::new(4, 7));
        assert!(range.contains(CellCoord::new(4, 7)));
        assert!(!range.contains(CellCoord::new(4, 8)));
        assert!(!range.contains(CellCoord::new(5, 7)));
    }
}
