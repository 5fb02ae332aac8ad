//! Parser Module
//!
//! calamineによるセル値の読み込みと、XLSX内部XMLからの塗りつぶし情報の抽出。

mod metadata;
mod workbook;

pub(crate) use metadata::XlsxMetadataParser;
pub(crate) use workbook::WorkbookParser;
