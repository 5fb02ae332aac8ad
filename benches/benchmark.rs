//! パフォーマンスベンチマーク
//!
//! 抽出（XLSX → グリッド）と描画（グリッド → PDF）を個別に測定します。
//! フィクスチャはrust_xlsxwriterでベンチマーク開始時に生成します。

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_xlsxwriter::{Color, Format, Workbook};
use std::io::Cursor;
use xlsxpdf::ConverterBuilder;

/// `rows`行 x 8列、偶数行に背景色を付けたワークブック
fn generate_workbook(rows: u32) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let fill = Format::new().set_background_color(Color::RGB(0xDDEBF7));

    for row in 0..rows {
        for col in 0..8u16 {
            let text = format!("R{}C{}", row, col);
            if row % 2 == 0 {
                worksheet
                    .write_string_with_format(row, col, text, &fill)
                    .unwrap();
            } else {
                worksheet.write_string(row, col, text).unwrap();
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

fn benchmark_extract(c: &mut Criterion) {
    let converter = ConverterBuilder::new().build().unwrap();
    let mut group = c.benchmark_group("extract");
    group.sample_size(20);

    for rows in [100u32, 1_000, 10_000] {
        let data = generate_workbook(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| {
                let grid = converter
                    .extract_from_reader(Cursor::new(black_box(data.as_slice())))
                    .unwrap();
                black_box(grid)
            });
        });
    }

    group.finish();
}

fn benchmark_render(c: &mut Criterion) {
    let converter = ConverterBuilder::new().build().unwrap();
    let mut group = c.benchmark_group("render");
    group.sample_size(20);

    for rows in [100u32, 1_000, 10_000] {
        let grid = converter
            .extract_from_reader(Cursor::new(generate_workbook(rows)))
            .unwrap();
        group.throughput(Throughput::Elements(u64::from(rows)));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &grid, |b, grid| {
            b.iter(|| {
                let mut output = Vec::new();
                converter
                    .render_to_writer(black_box(grid), &mut output)
                    .unwrap();
                black_box(output)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_extract, benchmark_render);
criterion_main!(benches);
