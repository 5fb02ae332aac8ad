//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// xlsxpdfクレート全体で使用するエラー型
///
/// ワークブックの読み込み、セルグリッドの抽出、PDFの描画・書き込み中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// 色の解決に失敗した場合はエラーにはなりません（背景色なしとして扱われます）。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxpdf::XlsxToPdfError;
///
/// match xlsxpdf::extract("missing.xlsx") {
///     Err(XlsxToPdfError::WorkbookOpen { path, .. }) => {
///         eprintln!("cannot open {}", path.display());
///     }
///     Err(e) => eprintln!("{}", e),
///     Ok(grid) => println!("{} rows", grid.rows()),
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxToPdfError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// XLSX内部XMLの解析エラー
    #[error("XML parse error: {0}")]
    Xml(String),

    /// ワークブックを開けなかったエラー
    ///
    /// ファイルが存在しない、読み込めない、破損している場合に発生します。
    /// 変換全体にとって致命的なエラーであり、出力は一切生成されません。
    #[error("Failed to open workbook '{}': {source}", path.display())]
    WorkbookOpen {
        /// 開こうとしたファイルのパス
        path: PathBuf,
        /// 根本原因
        #[source]
        source: Box<XlsxToPdfError>,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に無効な設定（負のフォントサイズ、
    /// ページに収まらない余白など）が検出された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// テキストグリッドと色グリッドの形状が一致しないエラー
    #[error("Grid shape mismatch at row {row}: {text_len} text cells vs {color_len} color cells")]
    GridShape {
        /// 不一致が見つかった行（0始まり）
        row: usize,
        /// テキストグリッド側の列数
        text_len: usize,
        /// 色グリッド側の列数
        color_len: usize,
    },

    /// PDFの描画または書き込みに失敗したエラー
    #[error("Render error: {0}")]
    Render(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb、パストラバーサル、ファイルサイズ制限などに違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl XlsxToPdfError {
    /// ワークブックを開く段階で失敗したかどうか
    ///
    /// パス指定の抽出では`WorkbookOpen`に包まれますが、リーダー経由の抽出では
    /// 解析系のエラーがそのまま返るため、両方を判定します。
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            XlsxToPdfError::WorkbookOpen { .. }
                | XlsxToPdfError::Parse(_)
                | XlsxToPdfError::Zip(_)
                | XlsxToPdfError::Xml(_)
                | XlsxToPdfError::SecurityViolation(_)
        )
    }

    pub(crate) fn open_failure(path: impl Into<PathBuf>, source: XlsxToPdfError) -> Self {
        XlsxToPdfError::WorkbookOpen {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: XlsxToPdfError = io_err.into();

        match error {
            XlsxToPdfError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_parse_error_display() {
        let parse_err = calamine::Error::Msg("Corrupted file");
        let error: XlsxToPdfError = parse_err.into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("Failed to parse Excel file"));
        assert!(error_msg.contains("Corrupted file"));
    }

    #[test]
    fn test_workbook_open_display_and_source() {
        let inner = XlsxToPdfError::Io(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        let error = XlsxToPdfError::open_failure("data/in.xlsx", inner);

        let msg = error.to_string();
        assert!(msg.starts_with("Failed to open workbook 'data/in.xlsx'"));
        assert!(msg.contains("no such file"));
        assert!(error.source().is_some());
        assert!(error.is_open_failure());
    }

    #[test]
    fn test_grid_shape_display() {
        let error = XlsxToPdfError::GridShape {
            row: 3,
            text_len: 2,
            color_len: 1,
        };
        assert_eq!(
            error.to_string(),
            "Grid shape mismatch at row 3: 2 text cells vs 1 color cells"
        );
        assert!(!error.is_open_failure());
    }

    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), XlsxToPdfError> {
            let _file = std::fs::File::open("nonexistent_file.xlsx")?;
            Ok(())
        }

        match io_operation() {
            Err(XlsxToPdfError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    #[test]
    fn test_all_error_formats() {
        let config_err = XlsxToPdfError::Config("test config".to_string());
        assert!(config_err.to_string().starts_with("Configuration error"));

        let render_err = XlsxToPdfError::Render("disk full".to_string());
        assert!(render_err.to_string().starts_with("Render error"));

        let xml_err = XlsxToPdfError::Xml("bad tag".to_string());
        assert!(xml_err.to_string().starts_with("XML parse error"));

        let security_err = XlsxToPdfError::SecurityViolation("too big".to_string());
        assert!(security_err.to_string().starts_with("Security violation"));
    }
}
