//! CSV Reader Examples
//!
//! Demonstrates various CSV reading capabilities:
//! - Reading plain and compressed CSV files
//! - Reading with headers
//! - Custom dialects
//! - Streaming with a callback or the record iterator
//!
//! Run `cargo run --example csv_write` first to create the input files.

use csvstream::csv::Dialect;
use csvstream::CsvReader;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== CSV Reader Examples ===\n");

    // Example 1: Read with headers
    println!("1. Reading plain CSV with headers...");
    {
        let mut reader = CsvReader::open("demos/output/output.csv")?.has_header(true);
        let rows = reader.read_all()?;
        if let Some(headers) = reader.headers() {
            println!("   Headers: {:?}", headers);
        }
        for row in &rows {
            println!("   {:?}", row);
        }
        println!("   Total records read: {}", reader.records_read());
    }

    // Example 2: Edge cases, including a record spanning two lines
    println!("\n2. Reading edge cases (quotes, separators, newlines)...");
    {
        let mut reader = CsvReader::open("demos/output/edge_cases.csv")?;
        while let Some(record) = reader.read_next()? {
            println!("   {:?}", record);
        }
        println!(
            "   {} records from {} physical lines",
            reader.records_read(),
            reader.lines_read()
        );
    }

    // Example 3: Custom dialect
    println!("\n3. Reading with a semicolon separator...");
    {
        let dialect = Dialect::builder().separator(';').build()?;
        let reader = CsvReader::open_with("demos/output/semicolon.csv", dialect)?;
        for record in reader {
            println!("   {:?}", record?);
        }
    }

    // Example 4: Stream a compressed file through a callback
    println!("\n4. Streaming Zstd compressed CSV (100K rows)...");
    {
        let mut reader = CsvReader::open("demos/output/large.csv.zst")?.has_header(true);
        let mut quantity: u64 = 0;
        let count = reader.read_all_with(|record| {
            quantity += record[3].parse::<u64>().unwrap_or(0);
            Ok(())
        })?;
        println!("   Records: {}, total quantity: {}", count, quantity);
    }

    // Example 5: Look-ahead iteration
    println!("\n5. Peeking with the record iterator...");
    {
        let mut records = CsvReader::open("demos/output/data.csv.gz")?.records();
        if let Some(first) = records.peek() {
            println!("   First record: {:?}", first);
        }
        let count = records.filter_map(|r| r.ok()).count();
        println!("   Total records: {}", count);
    }

    // Example 6: Error handling
    println!("\n6. Error handling example...");
    {
        match CsvReader::open("demos/output/nonexistent.csv") {
            Ok(_) => println!("   File opened"),
            Err(e) => println!("   Expected error: {}", e),
        }
    }

    println!("\n=== All examples completed successfully! ===");

    Ok(())
}
