//! Boundary Value Tests
//!
//! 空のシート、極端なサイズ、壊れた入力、不正な塗りつぶし指定など、
//! 境界条件での動作を検証します。

use rust_xlsxwriter::{Color as XlsxColor, Format, Workbook, XlsxError};
use std::io::{Cursor, Read, Write};
use xlsxpdf::{Color, ConverterBuilder, SheetGrid, XlsxToPdfError};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

mod fixtures {
    use super::*;

    /// 空のシートを1つだけ持つワークブック
    pub fn generate_empty_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("EmptySheet")?;
        workbook.save_to_buffer()
    }

    /// 1列に`rows`行の数値を持つワークブック
    pub fn generate_many_rows(rows: u32) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for row in 0..rows {
            worksheet.write_number(row, 0, row)?;
        }
        workbook.save_to_buffer()
    }

    /// 非常に長いテキストを持つセル
    pub fn generate_long_cell(len: usize) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "A".repeat(len))?;
        worksheet.write_string(0, 1, "short")?;
        workbook.save_to_buffer()
    }

    /// A1だけが赤で塗りつぶされたワークブック
    pub fn generate_single_red_cell() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let red = Format::new().set_background_color(XlsxColor::RGB(0xFF0000));
        worksheet.write_string_with_format(0, 0, "Colored", &red)?;
        worksheet.write_string(0, 1, "Plain")?;
        workbook.save_to_buffer()
    }

    /// XLSX内の1つのパーツを書き換えたアーカイブを返す
    pub fn rewrite_part(
        xlsx: &[u8],
        part: &str,
        rewrite: impl Fn(String) -> String,
    ) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(xlsx)).unwrap();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let name = file.name().to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();

            if name == part {
                let xml = String::from_utf8(content).unwrap();
                content = rewrite(xml).into_bytes();
            }

            writer.start_file(name, FileOptions::default()).unwrap();
            writer.write_all(&content).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }

    /// 壊れた（XLSXではない）データ
    pub fn generate_corrupted_file() -> Vec<u8> {
        b"This is not a valid Excel file content".to_vec()
    }

    /// ZIPヘッダーだけを持つ不正なデータ
    pub fn generate_invalid_structure() -> Vec<u8> {
        let mut data = vec![0x50, 0x4B, 0x03, 0x04];
        data.extend_from_slice(b"INVALID_CONTENT");
        data
    }
}

fn extract(data: Vec<u8>) -> SheetGrid {
    ConverterBuilder::new()
        .build()
        .unwrap()
        .extract_from_reader(Cursor::new(data))
        .unwrap()
}

fn red_fill_with(code: &str) -> Vec<u8> {
    let code = code.to_string();
    fixtures::rewrite_part(
        &fixtures::generate_single_red_cell().unwrap(),
        "xl/styles.xml",
        move |xml| {
            assert!(xml.contains("rgb=\"FFFF0000\""), "fixture changed: {}", xml);
            xml.replace("rgb=\"FFFF0000\"", &code)
        },
    )
}

// 空のシート: グリッドは空で、PDFは空白の1ページ
#[test]
fn test_empty_sheet() {
    let converter = ConverterBuilder::new().build().unwrap();
    let data = fixtures::generate_empty_sheet().unwrap();

    let grid = converter
        .extract_from_reader(Cursor::new(data.clone()))
        .unwrap();
    assert_eq!(grid.rows(), 0);
    assert!(grid.is_empty());

    let mut output = Vec::new();
    let report = converter.convert(Cursor::new(data), &mut output).unwrap();
    assert!(output.starts_with(b"%PDF-"));
    assert_eq!(report.pages, 1);
    assert_eq!(report.background_cells, 0);
}

#[test]
fn test_render_default_grid() {
    let converter = ConverterBuilder::new().build().unwrap();
    let mut output = Vec::new();
    let report = converter
        .render_to_writer(&SheetGrid::default(), &mut output)
        .unwrap();

    assert_eq!(report.pages, 1);
    assert_eq!(report.rows, 0);
    assert_eq!(report.cols, 0);
}

// 100行 -> Letter縦・10ptで36行/ページ
#[test]
fn test_many_rows_paginate() {
    let converter = ConverterBuilder::new().build().unwrap();
    let data = fixtures::generate_many_rows(100).unwrap();

    let mut output = Vec::new();
    let report = converter.convert(Cursor::new(data), &mut output).unwrap();

    assert_eq!(report.rows, 100);
    assert_eq!(report.pages, 3);
    assert!(String::from_utf8_lossy(&output).contains("/Count 3"));
}

#[test]
#[ignore] // Time-consuming test
fn test_ten_thousand_rows() {
    let converter = ConverterBuilder::new().build().unwrap();
    let data = fixtures::generate_many_rows(10_000).unwrap();

    let report = converter
        .convert(Cursor::new(data), &mut Vec::new())
        .unwrap();

    assert_eq!(report.rows, 10_000);
    assert_eq!(report.pages, 10_000_usize.div_ceil(36));
}

// 枠より広い表でも失敗せず、切れた状態で描画される
#[test]
fn test_long_cell_text() {
    let converter = ConverterBuilder::new().build().unwrap();
    let data = fixtures::generate_long_cell(32_767).unwrap();

    let grid = converter
        .extract_from_reader(Cursor::new(data.clone()))
        .unwrap();
    assert_eq!(grid.cell_text(0, 0).map(str::len), Some(32_767));

    let report = converter
        .convert(Cursor::new(data), &mut Vec::new())
        .unwrap();
    assert_eq!(report.pages, 1);
}

#[test]
fn test_tiny_font_and_margin() {
    let converter = ConverterBuilder::new()
        .with_font_size(1.0)
        .with_margin(0.0)
        .build()
        .unwrap();
    let data = fixtures::generate_single_red_cell().unwrap();

    let report = converter
        .convert(Cursor::new(data), &mut Vec::new())
        .unwrap();
    assert_eq!(report.background_cells, 1);
}

// 不正なRGBコード: エラーにはならず背景色なし
#[test]
fn test_malformed_rgb_code_is_uncolored() {
    for code in ["rgb=\"ZZZZZZZZ\"", "rgb=\"FF00\"", "rgb=\"FFFF00000\""] {
        let grid = extract(red_fill_with(code));
        assert_eq!(grid.cell_text(0, 0), Some("Colored"), "code: {}", code);
        assert_eq!(grid.cell_color(0, 0), None, "code: {}", code);
    }
}

#[test]
fn test_no_fill_code_is_uncolored() {
    let grid = extract(red_fill_with("rgb=\"00000000\""));
    assert_eq!(grid.cell_color(0, 0), None);
}

#[test]
fn test_six_digit_rgb_code() {
    let grid = extract(red_fill_with("rgb=\"00FF00\""));
    assert_eq!(grid.cell_color(0, 0), Some(Color::from_rgb_u32(0x00FF00)));
}

#[test]
fn test_malformed_rgb_falls_back_to_theme() {
    let grid = extract(red_fill_with("rgb=\"XYZ\" theme=\"5\""));
    assert_eq!(grid.cell_color(0, 0), Some(Color::from_rgb_u32(0xC0504D)));
}

#[test]
fn test_theme_tint_is_ignored() {
    let grid = extract(red_fill_with("theme=\"4\" tint=\"0.39997558519241921\""));
    assert_eq!(grid.cell_color(0, 0), Some(Color::from_rgb_u32(0x4F81BD)));
}

#[test]
fn test_out_of_range_theme_is_uncolored() {
    let grid = extract(red_fill_with("theme=\"42\""));
    assert_eq!(grid.cell_color(0, 0), None);
}

#[test]
fn test_indexed_color_is_uncolored() {
    let grid = extract(red_fill_with("indexed=\"10\""));
    assert_eq!(grid.cell_color(0, 0), None);
    assert_eq!(grid.cell_color(0, 1), None);
}

// 解釈できないスタイルIDのセル: 抽出は続行し、そのセルは色なし
#[test]
fn test_malformed_style_id_is_uncolored() {
    let data = fixtures::rewrite_part(
        &fixtures::generate_single_red_cell().unwrap(),
        "xl/worksheets/sheet1.xml",
        |xml| {
            assert!(xml.contains(" s=\"1\""), "fixture changed: {}", xml);
            xml.replace(" s=\"1\"", " s=\"x\"")
        },
    );

    let grid = extract(data);
    assert_eq!(grid.cell_text(0, 0), Some("Colored"));
    assert_eq!(grid.cell_text(0, 1), Some("Plain"));
    assert_eq!(grid.colors(), &vec![vec![None, None]]);
}

#[test]
fn test_malformed_row_number_does_not_abort() {
    let data = fixtures::rewrite_part(
        &fixtures::generate_single_red_cell().unwrap(),
        "xl/worksheets/sheet1.xml",
        |xml| {
            assert!(xml.contains("<row r=\"1\""), "fixture changed: {}", xml);
            xml.replace("<row r=\"1\"", "<row r=\"one\"")
        },
    );

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.extract_from_reader(Cursor::new(data));

    // calamine側で行番号を拒否した場合は解析エラーになるが、
    // スタイル解析が原因で失敗してはならない
    match result {
        Ok(grid) => assert_eq!(grid.cell_color(0, 0), Some(Color::from_rgb_u32(0xFF0000))),
        Err(e) => assert!(matches!(e, XlsxToPdfError::Parse(_)), "unexpected error: {:?}", e),
    }
}

#[test]
fn test_corrupted_input_from_reader() {
    let converter = ConverterBuilder::new().build().unwrap();

    for data in [
        fixtures::generate_corrupted_file(),
        fixtures::generate_invalid_structure(),
    ] {
        let result = converter.extract_from_reader(Cursor::new(data));
        match result {
            Err(e) => assert!(e.is_open_failure(), "unexpected error: {:?}", e),
            Ok(grid) => panic!("Expected error, got {:?}", grid),
        }
    }
}

#[test]
fn test_corrupted_file_path_is_workbook_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.xlsx");
    let output = dir.path().join("broken.pdf");
    std::fs::write(&input, fixtures::generate_corrupted_file()).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert_file(&input, &output);

    assert!(matches!(result, Err(XlsxToPdfError::WorkbookOpen { .. })));
    assert!(!output.exists());
}

#[test]
fn test_empty_input() {
    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.extract_from_reader(Cursor::new(Vec::new()));
    assert!(result.is_err());
}
