//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 用紙サイズ
///
/// 出力PDFのページサイズを指定します。寸法はポイント（1/72インチ）単位です。
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum PageSize {
    /// US Letter（612 × 792pt、デフォルト）
    Letter,

    /// A4（595.28 × 841.89pt）
    A4,

    /// US Legal（612 × 1008pt）
    Legal,

    /// 任意サイズ（幅, 高さ）をポイントで指定
    Custom(f32, f32),
}

impl PageSize {
    /// 縦向きでの寸法（幅, 高さ）をポイントで返す
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.276, 841.89),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom(width, height) => (*width, *height),
        }
    }
}

/// 用紙の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Orientation {
    /// 縦向き（デフォルト）
    Portrait,

    /// 横向き（幅と高さを入れ替える）
    Landscape,
}

impl Orientation {
    /// 縦向きの寸法に向きを適用する
    pub fn apply(&self, (width, height): (f32, f32)) -> (f32, f32) {
        match self {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }
}

/// 日付の出力形式
///
/// 日付書式のセルをテーブルのテキストに変換する際の形式を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式（YYYY-MM-DD）
    ///
    /// 時刻成分を持つ値は `YYYY-MM-DD HH:MM:SS` になります。
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// ```rust,no_run
    /// use xlsxpdf::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), xlsxpdf::XlsxToPdfError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%d.%m.%Y".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// 数式セルの出力モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormulaMode {
    /// キャッシュされた結果値を出力
    ///
    /// 例: `=SUM(A1:A10)` → `100`
    CachedValue,

    /// 数式文字列を出力（デフォルト）
    ///
    /// 例: `=SUM(A1:A10)` → `=SUM(A1:A10)`
    Formula,
}
