//! Color Resolution Module
//!
//! セルの塗りつぶし情報（fill descriptor）から背景色を解決するモジュール。
//! 直接指定（RGB）、テーマ参照、インデックスパレット参照の3種類の表現を扱います。

use serde::{Serialize, Serializer};

/// 正規化されたRGB色
///
/// 各チャンネルは`[0, 1]`の範囲に正規化されています。
/// 8ビット値またはHEX文字列からのみ生成されるため、範囲外の値を持つことはありません。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    red: f32,
    green: f32,
    blue: f32,
}

impl Color {
    /// 黒（罫線のデフォルト色）
    pub const BLACK: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
    };

    /// 8ビットのチャンネル値から色を生成
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f32::from(red) / 255.0,
            green: f32::from(green) / 255.0,
            blue: f32::from(blue) / 255.0,
        }
    }

    /// `0xRRGGBB`形式の整数から色を生成
    pub fn from_rgb_u32(rgb: u32) -> Self {
        Self::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// HEX文字列から色を生成
    ///
    /// 6文字（`RRGGBB`）または8文字（`AARRGGBB`、アルファは破棄）を受け付けます。
    /// それ以外の長さ、またはHEX以外の文字を含む場合は`None`を返します。
    ///
    /// ```rust
    /// use xlsxpdf::Color;
    ///
    /// let red = Color::from_hex("FFFF0000").unwrap();
    /// assert_eq!(red, Color::from_hex("FF0000").unwrap());
    /// assert!(Color::from_hex("FF00").is_none());
    /// ```
    pub fn from_hex(code: &str) -> Option<Self> {
        if !code.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let rgb = match code.len() {
            8 => &code[2..],
            6 => code,
            _ => return None,
        };

        let red = u8::from_str_radix(&rgb[0..2], 16).ok()?;
        let green = u8::from_str_radix(&rgb[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&rgb[4..6], 16).ok()?;
        Some(Self::from_rgb8(red, green, blue))
    }

    /// 赤チャンネル（0.0〜1.0）
    pub fn red(&self) -> f32 {
        self.red
    }

    /// 緑チャンネル（0.0〜1.0）
    pub fn green(&self) -> f32 {
        self.green
    }

    /// 青チャンネル（0.0〜1.0）
    pub fn blue(&self) -> f32 {
        self.blue
    }

    /// 8ビットのチャンネル値に戻す
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let quantize = |c: f32| (c * 255.0).round() as u8;
        (quantize(self.red), quantize(self.green), quantize(self.blue))
    }

    /// `#RRGGBB`形式の文字列に変換
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// 標準テーマカラー（Office 2007〜2010テーマ）
///
/// インデックス0〜9: dk1, lt1, dk2, lt2, accent1〜accent6
const THEME_COLORS: [u32; 10] = [
    0x000000, // dk1
    0xFFFFFF, // lt1
    0x1F497D, // dk2
    0xEEECE1, // lt2
    0x4F81BD, // accent1
    0xC0504D, // accent2
    0x9BBB59, // accent3
    0x8064A2, // accent4
    0x4BACC6, // accent5
    0xF79646, // accent6
];

/// 「塗りつぶしなし」を表す直接指定コード
const NO_FILL_CODES: [&str; 4] = ["00000000", "00", "", "None"];

/// セルの塗りつぶし情報
///
/// `xl/styles.xml`の`<fill><patternFill><fgColor .../></patternFill></fill>`から
/// 抽出時に一度だけ構築されます。
#[derive(Debug, Clone, PartialEq)]
pub enum FillDescriptor {
    /// RGBコードによる直接指定（`rgb="FFFF0000"`）
    DirectCode(String),

    /// テーマカラー参照（`theme="4" tint="0.4"`）
    ThemeRef {
        /// テーマカラーのインデックス
        index: u32,
        /// 明度調整係数（-1.0〜1.0）。受け付けるが色には反映しない
        tint: f64,
    },

    /// レガシーのインデックスパレット参照（`indexed="64"`）
    IndexedRef(u32),

    /// 塗りつぶし情報なし
    Empty,
}

impl FillDescriptor {
    /// `<fgColor>`要素の生の属性値から塗りつぶし情報を構築
    ///
    /// 解決順序: 有効な直接指定 → テーマ参照 → インデックス参照 → なし。
    /// 直接指定が不正（長さ違い、HEX以外の文字、「塗りつぶしなし」コード）の場合は
    /// 次の候補に進みます。
    pub(crate) fn from_color_attrs(attrs: ColorAttrs) -> Self {
        if let Some(code) = attrs.rgb {
            if decode_direct_code(&code).is_some() {
                return FillDescriptor::DirectCode(code);
            }
        }

        if let Some(index) = attrs.theme {
            return FillDescriptor::ThemeRef {
                index,
                tint: attrs.tint.unwrap_or(0.0),
            };
        }

        match attrs.indexed {
            Some(index) => FillDescriptor::IndexedRef(index),
            None => FillDescriptor::Empty,
        }
    }
}

impl Default for FillDescriptor {
    fn default() -> Self {
        FillDescriptor::Empty
    }
}

/// `<fgColor>`要素から読み取った属性値
///
/// 数値として解釈できない属性は`None`として保持されます。
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ColorAttrs {
    pub rgb: Option<String>,
    pub theme: Option<u32>,
    pub tint: Option<f64>,
    pub indexed: Option<u32>,
}

/// 塗りつぶし情報を背景色に解決するリゾルバー
///
/// 副作用を持たない純粋関数として動作し、どの入力に対しても失敗しません。
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorResolver;

impl ColorResolver {
    /// 塗りつぶし情報から背景色を解決する
    ///
    /// # 戻り値
    ///
    /// * `Some(Color)` - 直接指定または標準テーマカラーとして解決できた場合
    /// * `None` - 塗りつぶしなし、不正なコード、範囲外のテーマ、インデックス参照の場合
    ///
    /// テーマ参照の`tint`は現状では色に反映されません。
    ///
    /// ```rust
    /// use xlsxpdf::{Color, ColorResolver, FillDescriptor};
    ///
    /// let resolver = ColorResolver;
    /// let fill = FillDescriptor::ThemeRef { index: 4, tint: 0.4 };
    /// assert_eq!(resolver.resolve(&fill), Some(Color::from_hex("4F81BD").unwrap()));
    /// assert_eq!(resolver.resolve(&FillDescriptor::IndexedRef(10)), None);
    /// ```
    pub fn resolve(&self, fill: &FillDescriptor) -> Option<Color> {
        match fill {
            FillDescriptor::DirectCode(code) => decode_direct_code(code),
            FillDescriptor::ThemeRef { index, tint: _ } => theme_color(*index),
            FillDescriptor::IndexedRef(_) => None,
            FillDescriptor::Empty => None,
        }
    }
}

fn decode_direct_code(code: &str) -> Option<Color> {
    if NO_FILL_CODES.contains(&code) {
        return None;
    }
    Color::from_hex(code)
}

fn theme_color(index: u32) -> Option<Color> {
    THEME_COLORS
        .get(index as usize)
        .map(|rgb| Color::from_rgb_u32(*rgb))
}
