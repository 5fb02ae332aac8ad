//! Font Metrics Module
//!
//! PDF標準フォントHelveticaの文字幅（AFM、1000単位）とWinAnsiEncodingへの変換。

/// PDF上のフォント名
pub(crate) const FONT_NAME: &[u8] = b"Helvetica";

/// PDF上のエンコーディング名
pub(crate) const FONT_ENCODING: &[u8] = b"WinAnsiEncoding";

/// WinAnsiで表現できない文字の代替
const REPLACEMENT: u8 = b'?';

/// 0x20〜0x7E
#[rustfmt::skip]
const WIDTHS_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

/// 0x80〜0x9F（未定義の位置は0）
#[rustfmt::skip]
const WIDTHS_WIN_ANSI_EXTRA: [u16; 32] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
];

/// 0xA0〜0xFF（Latin-1）
#[rustfmt::skip]
const WIDTHS_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// 幅が不明なバイトの既定値
const DEFAULT_WIDTH: u16 = 556;

/// 1文字をWinAnsiEncodingの1バイトに変換する
pub(crate) fn encode_char(ch: char) -> u8 {
    match ch {
        '\t' => b' ',
        ' '..='~' => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        other => win_ansi_extra(other).unwrap_or(REPLACEMENT),
    }
}

/// 文字列をWinAnsiEncodingのバイト列に変換する
pub(crate) fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// エンコード済みバイトのグリフ幅（1000単位）
pub(crate) fn glyph_width(byte: u8) -> u16 {
    let width = match byte {
        0x20..=0x7E => WIDTHS_ASCII[(byte - 0x20) as usize],
        0x80..=0x9F => WIDTHS_WIN_ANSI_EXTRA[(byte - 0x80) as usize],
        0xA0..=0xFF => WIDTHS_LATIN1[(byte - 0xA0) as usize],
        _ => 0,
    };
    if width == 0 {
        DEFAULT_WIDTH
    } else {
        width
    }
}

/// 文字列を指定サイズで描画したときの幅（pt）
pub(crate) fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|ch| u32::from(glyph_width(encode_char(ch))))
        .sum();
    units as f32 * font_size / 1000.0
}

/// Latin-1の外にあるWinAnsi文字（0x80〜0x9F）
fn win_ansi_extra(ch: char) -> Option<u8> {
    let byte = match ch {
        '\u{20AC}' => 0x80, // €
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // …
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // •
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99, // ™
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}
