use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use csvstream::csv::Dialect;
use csvstream::{CsvParser, CsvReader, CsvWriter};
use tempfile::NamedTempFile;

fn sample_text(size: usize) -> String {
    let mut writer = CsvWriter::new(Vec::new(), Dialect::default());
    writer.write_row(["ID", "Name", "Note"]).unwrap();
    for i in 0..size {
        writer
            .write_row([
                i.to_string(),
                format!("Name_{}", i),
                format!("said \"{}\",\nthen left", i * 100),
            ])
            .unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

fn benchmark_parse_line(c: &mut Criterion) {
    let line = r#""12345","Name_12345","said \"1234500\", then left",plain,,"#;
    c.bench_function("parse_line", |b| {
        let mut parser = CsvParser::default();
        b.iter(|| black_box(parser.parse_line(black_box(line)).unwrap()));
    });
}

fn benchmark_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [1000, 10000, 100000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let temp = NamedTempFile::new().unwrap();
                let mut writer = CsvWriter::create(temp.path()).unwrap();

                writer.write_row(["ID", "Name", "Value"]).unwrap();
                for i in 0..size {
                    writer
                        .write_row([
                            i.to_string(),
                            format!("Name_{}", i),
                            (i * 100).to_string(),
                        ])
                        .unwrap();
                }

                writer.close().unwrap();
            });
        });
    }

    group.finish();
}

fn benchmark_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for size in [1000, 10000, 100000].iter() {
        let text = sample_text(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut reader = CsvReader::from_reader(text.as_bytes(), Dialect::default());
                while let Some(record) = reader.read_next().unwrap() {
                    black_box(record);
                }
            });
        });
    }

    group.finish();
}

fn benchmark_compressed_roundtrip(c: &mut Criterion) {
    c.bench_function("zstd_roundtrip_10000_rows", |b| {
        b.iter(|| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("bench.csv.zst");

            let mut writer = CsvWriter::create(&path).unwrap();
            for i in 0..10000 {
                writer
                    .write_row([i.to_string(), format!("Name_{}", i)])
                    .unwrap();
            }
            writer.close().unwrap();

            let count = CsvReader::open(&path).unwrap().read_all_with(|_| Ok(())).unwrap();
            black_box(count);
        });
    });
}

criterion_group!(
    benches,
    benchmark_parse_line,
    benchmark_write,
    benchmark_read,
    benchmark_compressed_roundtrip
);
criterion_main!(benches);
