//! CSV Writer Examples
//!
//! Demonstrates various CSV writing capabilities:
//! - Plain CSV with the default dialect (quote every field)
//! - Minimal quoting and custom separators
//! - Null fields and trailing terminator suppression
//! - Zstd and Deflate compressed CSV

use csvstream::csv::Dialect;
use csvstream::{CompressionMethod, CsvWriter};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    std::fs::create_dir_all("demos/output")?;

    println!("=== CSV Writer Examples ===\n");

    // Example 1: Plain CSV
    println!("1. Writing plain CSV...");
    {
        let mut writer = CsvWriter::create("demos/output/output.csv")?;
        writer.write_row(["Name", "Age", "City"])?;
        writer.write_row(["Alice", "30", "New York"])?;
        writer.write_row(["Bob", "25", "San Francisco, CA"])?;
        writer.write_row(["Charlie", "35", "Los Angeles"])?;
        println!("   Records written: {}", writer.written_lines());
        writer.close()?;
        println!("   ✓ Created demos/output/output.csv");
    }

    // Example 2: Edge cases, quoting only where needed
    println!("\n2. Writing edge cases (quotes, separators, newlines)...");
    {
        let dialect = Dialect::builder().quote_all_fields(false).build()?;
        let mut writer = CsvWriter::create_with("demos/output/edge_cases.csv", dialect)?;
        writer.write_row(["Field", "Value"])?;
        writer.write_row(["comma", "a,b"])?;
        writer.write_row(["quote", "she said \"hi\""])?;
        writer.write_row(["newline", "first\nsecond"])?;
        writer.write_row(["backslash", r"C:\temp"])?;
        writer.write_record([Some("null"), None])?;
        writer.close()?;
        println!("   ✓ Created demos/output/edge_cases.csv");
    }

    // Example 3: Semicolon separator, CRLF, no trailing terminator
    println!("\n3. Writing with a custom dialect...");
    {
        let dialect = Dialect::builder()
            .separator(';')
            .line_terminator("\r\n")
            .quote_all_fields(false)
            .avoid_trailing_terminator(true)
            .build()?;
        let mut writer = CsvWriter::create_with("demos/output/semicolon.csv", dialect)?;
        writer.write_rows([
            ["Country", "Capital"],
            ["France", "Paris"],
            ["Japan", "Tokyo"],
        ])?;
        writer.close()?;
        println!("   ✓ Created demos/output/semicolon.csv");
    }

    // Example 4: Zstd compressed CSV (large file)
    println!("\n4. Writing Zstd compressed CSV (100K rows)...");
    {
        let mut writer = CsvWriter::with_compression(
            "demos/output/large.csv.zst",
            CompressionMethod::Zstd,
            3, // Level 3 for balanced compression
            Dialect::default(),
        )?;

        writer.write_row(["ID", "Product", "Price", "Quantity"])?;
        for i in 0..100_000 {
            writer.write_row([
                i.to_string(),
                format!("Product_{}", i % 1000),
                format!("{:.2}", (i as f64 * 0.99) % 100.0),
                ((i % 50) + 1).to_string(),
            ])?;
        }

        println!("   Records written: {}", writer.written_lines());
        writer.close()?;

        let metadata = std::fs::metadata("demos/output/large.csv.zst")?;
        println!(
            "   File size: {:.2} MB",
            metadata.len() as f64 / 1024.0 / 1024.0
        );
    }

    // Example 5: Deflate/Gzip compressed CSV
    println!("\n5. Writing Deflate/Gzip compressed CSV...");
    {
        let mut writer = CsvWriter::create("demos/output/data.csv.gz")?; // Auto-detects Deflate
        writer.write_row(["Product", "Category", "Stock"])?;
        writer.write_row(["Laptop", "Electronics", "150"])?;
        writer.write_row(["Chair", "Furniture", "75"])?;
        println!("   Records written: {}", writer.written_lines());
        writer.close()?;
        println!("   ✓ Created demos/output/data.csv.gz");
    }

    println!("\n=== All examples completed successfully! ===");
    println!("Run `cargo run --example csv_read` to read the files back.");

    Ok(())
}
