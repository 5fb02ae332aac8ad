//! Formatter Module
//!
//! calamineのセル値を、表に描画する文字列へ変換するモジュール。

use std::fmt::Write as _;

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::api::{DateFormat, FormulaMode};
use crate::builder::ConversionConfig;
use crate::error::XlsxToPdfError;

/// 1日の秒数
const SECONDS_PER_DAY: f64 = 86_400.0;

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,

    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// セル値をフォーマット
    ///
    /// # 引数
    ///
    /// * `value` - calamineから取得したセル値
    /// * `formula` - セルの数式（存在する場合、先頭の`=`なし）
    /// * `config` - 変換設定
    /// * `is_1904` - 1904年エポックを使用するかどうか
    ///
    /// 失敗しません。日付として表せないシリアル値（Excelでは`#####`表示）は
    /// 数値のまま出力します。値なしは空文字列です。
    pub fn format_cell(
        &self,
        value: &Data,
        formula: Option<&str>,
        config: &ConversionConfig,
        is_1904: bool,
    ) -> String {
        // 1. 数式モードの処理
        if config.formula_mode == FormulaMode::Formula {
            if let Some(formula) = formula.filter(|f| !f.is_empty()) {
                return format!("={}", formula);
            }
        }

        // 2. 値の種類に応じてフォーマット
        let formatted = match value {
            Data::Int(i) => i.to_string(),
            Data::Float(f) => self.number_formatter.format(*f),
            Data::String(s) => s.clone(),
            Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Data::DateTime(dt) => {
                if dt.is_duration() {
                    self.date_formatter.format_duration(dt.as_f64())
                } else {
                    let serial = dt.as_f64();
                    self.date_formatter
                        .format(serial, &config.date_format, is_1904)
                        .unwrap_or_else(|e| {
                            log::warn!("date value out of range, keeping number: {}", e);
                            self.number_formatter.format(serial)
                        })
                }
            }
            Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
            Data::Error(e) => e.to_string(),
            Data::Empty => String::new(),
        };

        formatted
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を文字列に変換します。
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// 日付値をフォーマット
    ///
    /// # エポックシステム
    ///
    /// - 1900年システム（デフォルト）: 1899年12月30日起算
    ///   - Excelの1900年うるう年バグ（存在しない1900-02-29）を考慮し、
    ///     シリアル値60未満は1日ずらして計算
    ///   - シリアル値1 = 1900年1月1日
    /// - 1904年システム: 1904年1月1日起算
    ///   - シリアル値0 = 1904年1月1日
    ///
    /// `DateFormat::Iso8601`では時刻部分がある場合のみ` HH:MM:SS`を付加します。
    /// 1未満のシリアル値（時刻のみ）は`HH:MM:SS`として出力します。
    pub fn format(
        &self,
        serial_value: f64,
        date_format: &DateFormat,
        is_1904: bool,
    ) -> Result<String, XlsxToPdfError> {
        let datetime = Self::to_datetime(serial_value, is_1904)?;
        let has_time = serial_value.fract().abs() > f64::EPSILON;

        let pattern = match date_format {
            DateFormat::Iso8601 if !is_1904 && (0.0..1.0).contains(&serial_value) => "%H:%M:%S",
            DateFormat::Iso8601 if has_time => "%Y-%m-%d %H:%M:%S",
            DateFormat::Iso8601 => "%Y-%m-%d",
            DateFormat::Custom(pattern) => pattern.as_str(),
        };

        let mut formatted = String::new();
        write!(formatted, "{}", datetime.format(pattern)).map_err(|_| {
            XlsxToPdfError::Config(format!("Invalid date format pattern: {}", pattern))
        })?;
        Ok(formatted)
    }

    /// 経過時間をフォーマット（`[h]:mm:ss`相当、24時間を超えても繰り上げない）
    pub fn format_duration(&self, serial_value: f64) -> String {
        let total_seconds = (serial_value.abs() * SECONDS_PER_DAY).round() as u64;
        let sign = if serial_value < 0.0 { "-" } else { "" };
        format!(
            "{}{}:{:02}:{:02}",
            sign,
            total_seconds / 3600,
            (total_seconds / 60) % 60,
            total_seconds % 60
        )
    }

    fn to_datetime(serial_value: f64, is_1904: bool) -> Result<NaiveDateTime, XlsxToPdfError> {
        let epoch = if is_1904 {
            NaiveDate::from_ymd_opt(1904, 1, 1)
        } else if serial_value < 60.0 {
            NaiveDate::from_ymd_opt(1899, 12, 31)
        } else {
            NaiveDate::from_ymd_opt(1899, 12, 30)
        }
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| XlsxToPdfError::Config("Invalid epoch date".to_string()))?;

        let overflow = || {
            XlsxToPdfError::Config(format!(
                "Date calculation overflow: serial_value={}, is_1904={}",
                serial_value, is_1904
            ))
        };

        if !serial_value.is_finite() || serial_value.abs() > 2_958_465.0 {
            return Err(overflow());
        }

        // 秒単位に丸めてから加算（0.99999...が翌日に繰り上がるように）
        let seconds = (serial_value * SECONDS_PER_DAY).round() as i64;
        epoch
            .checked_add_signed(Duration::seconds(seconds))
            .ok_or_else(overflow)
    }
}

/// 数値フォーマッター
///
/// 整数値の浮動小数点数は小数部なし（`30`）、それ以外は最短の往復可能表現（`3.5`）。
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    pub fn format(&self, value: f64) -> String {
        if value == 0.0 {
            // -0.0も"0"
            return "0".to_string();
        }
        value.to_string()
    }
}
