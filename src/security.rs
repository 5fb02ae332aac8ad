//! Security Module
//!
//! 入力ワークブックに対するセキュリティ対策を実装するモジュール。
//! ZIP bomb攻撃、パストラバーサル攻撃、巨大ファイルへの対策を提供します。

use std::io::Read;

use crate::error::XlsxToPdfError;

/// セキュリティ設定
///
/// ファイル処理時のセキュリティ制限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 展開後の最大サイズ（バイト）
    /// デフォルト: 1GB (1_073_741_824 bytes)
    pub max_decompressed_size: u64,
    /// ZIPアーカイブ内の最大ファイル数
    /// デフォルト: 10000
    pub max_file_count: usize,
    /// 単一ファイルの最大サイズ（バイト）
    /// デフォルト: 100MB (104_857_600 bytes)
    pub max_file_size: u64,
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 1_073_741_824, // 1GB
            max_file_count: 10_000,
            max_file_size: 104_857_600,         // 100MB
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 入力全体をメモリに読み込み、サイズ上限を検証する
    ///
    /// 上限+1バイトまでしか読み込まないため、巨大な入力でもメモリを使い切りません。
    pub fn read_input<R: Read>(&self, reader: R) -> Result<Vec<u8>, XlsxToPdfError> {
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(self.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        if bytes_read as u64 > self.max_input_file_size {
            return Err(XlsxToPdfError::SecurityViolation(format!(
                "Input file size exceeds maximum: more than {} bytes",
                self.max_input_file_size
            )));
        }

        Ok(buffer)
    }

    /// ZIPエントリ数の上限を検証する
    pub fn check_entry_count(&self, count: usize) -> Result<(), XlsxToPdfError> {
        if count > self.max_file_count {
            return Err(XlsxToPdfError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                count, self.max_file_count
            )));
        }
        Ok(())
    }

    /// 単一エントリのサイズを検証し、展開後サイズの累計を更新する
    pub fn check_entry_size(
        &self,
        name: &str,
        size: u64,
        total: &mut u64,
    ) -> Result<(), XlsxToPdfError> {
        if size > self.max_file_size {
            return Err(XlsxToPdfError::SecurityViolation(format!(
                "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                name, size, self.max_file_size
            )));
        }

        *total = total.checked_add(size).ok_or_else(|| {
            XlsxToPdfError::SecurityViolation(
                "Total decompressed size calculation overflow".to_string(),
            )
        })?;

        if *total > self.max_decompressed_size {
            return Err(XlsxToPdfError::SecurityViolation(format!(
                "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                total, self.max_decompressed_size
            )));
        }
        Ok(())
    }
}

/// ZIP内ファイルパスの検証
///
/// パストラバーサル攻撃を防ぐため、ファイルパスを検証します。
///
/// # 戻り値
///
/// * `Ok(())` - パスが安全な場合
/// * `Err(String)` - パスが危険な場合（`..`や絶対パスを含む）
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    // Windows形式の`C:\`やUnix形式の`/`で始まるパス
    if path.starts_with('/') || path.starts_with("C:\\") || path.starts_with("c:\\") {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.contains("..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_validate_zip_path_valid() {
        assert!(validate_zip_path("xl/workbook.xml").is_ok());
        assert!(validate_zip_path("xl/worksheets/sheet1.xml").is_ok());
        assert!(validate_zip_path("xl/styles.xml").is_ok());
    }

    #[test]
    fn test_validate_zip_path_rejects_unsafe() {
        assert!(validate_zip_path("").is_err());
        assert!(validate_zip_path("/etc/passwd").is_err());
        assert!(validate_zip_path("C:\\Windows\\system32").is_err());
        assert!(validate_zip_path("xl/../../etc/passwd").is_err());
        assert!(validate_zip_path("xl\\workbook.xml").is_err());
    }

    #[test]
    fn test_read_input_within_limit() {
        let config = SecurityConfig {
            max_input_file_size: 8,
            ..SecurityConfig::default()
        };
        let data = config.read_input(Cursor::new(vec![1u8; 8])).unwrap();
        assert_eq!(data.len(), 8);
    }

    #[test]
    fn test_read_input_over_limit() {
        let config = SecurityConfig {
            max_input_file_size: 8,
            ..SecurityConfig::default()
        };
        match config.read_input(Cursor::new(vec![1u8; 9])) {
            Err(XlsxToPdfError::SecurityViolation(msg)) => {
                assert!(msg.contains("Input file size exceeds maximum"));
            }
            _ => panic!("Expected SecurityViolation"),
        }
    }

    #[test]
    fn test_check_entry_limits() {
        let config = SecurityConfig {
            max_file_count: 2,
            max_file_size: 10,
            max_decompressed_size: 15,
            ..SecurityConfig::default()
        };
        assert!(config.check_entry_count(2).is_ok());
        assert!(config.check_entry_count(3).is_err());

        let mut total = 0;
        assert!(config.check_entry_size("a.xml", 10, &mut total).is_ok());
        assert!(config.check_entry_size("b.xml", 11, &mut total).is_err());
        assert!(config.check_entry_size("c.xml", 6, &mut total).is_err());
    }
}
