//! CLI Tool Example
//!
//! This example demonstrates how to build a command-line tool
//! using xlsxpdf for converting the active sheet of an Excel file to a PDF table.
//!
//! No `log` backend is installed here, so the library's diagnostics are not shown.
//! The colored cell count is printed from the returned `RenderReport` instead.

use std::process;
use xlsxpdf::{ConverterBuilder, Orientation, PageSize, XlsxToPdfError};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <input.xlsx> <output.pdf> [options]", args[0]);
        eprintln!("\nOptions:");
        eprintln!("  --page-size <size>   letter (default), a4, or legal");
        eprintln!("  --landscape          Use landscape orientation");
        eprintln!("  --font-size <pt>     Font size in points (default: 10)");
        eprintln!("  --dump-grid          Print the extracted grid as JSON");
        eprintln!("\nExamples:");
        eprintln!("  {} input.xlsx output.pdf", args[0]);
        eprintln!("  {} input.xlsx output.pdf --page-size a4 --landscape", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];

    // Parse options
    let mut builder = ConverterBuilder::new();
    let mut dump_grid = false;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--page-size" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --page-size requires a value");
                    process::exit(1);
                }
                let page_size = match args[i + 1].to_ascii_lowercase().as_str() {
                    "letter" => PageSize::Letter,
                    "a4" => PageSize::A4,
                    "legal" => PageSize::Legal,
                    other => {
                        eprintln!("Error: Unknown page size: {}", other);
                        process::exit(1);
                    }
                };
                builder = builder.with_page_size(page_size);
                i += 2;
            }
            "--landscape" => {
                builder = builder.with_orientation(Orientation::Landscape);
                i += 1;
            }
            "--font-size" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --font-size requires a value");
                    process::exit(1);
                }
                let size = args[i + 1].parse::<f32>().unwrap_or_else(|_| {
                    eprintln!("Error: Invalid font size: {}", args[i + 1]);
                    process::exit(1);
                });
                builder = builder.with_font_size(size);
                i += 2;
            }
            "--dump-grid" => {
                dump_grid = true;
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
    }

    match convert_excel(builder, input_path, output_path, dump_grid) {
        Ok(report) => {
            println!(
                "Conversion completed: {} -> {} ({} page(s), {} colored cell(s))",
                input_path, output_path, report.pages, report.background_cells
            );
        }
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn convert_excel(
    builder: ConverterBuilder,
    input_path: &str,
    output_path: &str,
    dump_grid: bool,
) -> Result<xlsxpdf::RenderReport, XlsxToPdfError> {
    let converter = builder.build()?;

    let grid = converter.extract(input_path)?;
    if dump_grid {
        println!("{}", grid.to_json()?);
    }

    converter.render(output_path, &grid)
}

fn handle_error(error: XlsxToPdfError) {
    match error {
        XlsxToPdfError::WorkbookOpen { path, source } => {
            eprintln!("Cannot open workbook: {}", path.display());
            eprintln!("  Cause: {}", source);
            eprintln!("Please check that the file exists and is a valid .xlsx file.");
        }
        XlsxToPdfError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that you have permission to write the output file.");
        }
        XlsxToPdfError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
        }
        XlsxToPdfError::Render(msg) => {
            eprintln!("Render Error: {}", msg);
        }
        XlsxToPdfError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file violates security constraints (e.g., file size limit).");
        }
        other => {
            eprintln!("Error: {}", other);
        }
    }
}
