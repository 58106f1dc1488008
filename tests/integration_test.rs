//! Integration tests for csvstream

use csvstream::csv::{Dialect, LineReader};
use csvstream::{CsvReader, CsvWriter, Record};
use tempfile::{tempdir, NamedTempFile};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_records(dialect: Dialect, records: &[Vec<&str>]) -> String {
    let mut writer = CsvWriter::new(Vec::new(), dialect);
    writer.write_rows(records).unwrap();
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

fn read_records(dialect: Dialect, text: &str) -> Vec<Record> {
    CsvReader::from_reader(text.as_bytes(), dialect)
        .read_all()
        .unwrap()
}

#[test]
fn test_write_and_read_roundtrip() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_path_buf();

    // Write data
    {
        let mut writer = CsvWriter::create(&path).unwrap();
        writer.write_row(["Name", "Age", "City"]).unwrap();
        writer.write_row(["Alice", "30", "NYC"]).unwrap();
        writer.write_row(["Bob", "25", "San Francisco, CA"]).unwrap();
        writer.close().unwrap();
    }

    // Read data back
    {
        let mut reader = CsvReader::open(&path).unwrap().has_header(true);
        let rows = reader.read_all().unwrap();

        assert_eq!(
            reader.headers(),
            Some(&["Name".to_string(), "Age".to_string(), "City".to_string()][..])
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Alice", "30", "NYC"]);
        assert_eq!(rows[1], vec!["Bob", "25", "San Francisco, CA"]);
    }
}

#[test]
fn test_roundtrip_with_special_fields() {
    let records = vec![
        vec!["plain", "with,comma", "with \"quotes\""],
        vec!["back\\slash", "multi\nline\nfield", ""],
        vec!["", "", ""],
        vec!["ünïcødé", "日本語", "emoji 🎉"],
    ];
    let text = write_records(Dialect::default(), &records);
    assert_eq!(read_records(Dialect::default(), &text), records);
}

#[test]
fn test_roundtrip_without_quote_all() {
    let dialect = Dialect::builder().quote_all_fields(false).build().unwrap();
    let records = vec![vec!["a", "b", "c"], vec!["1", "2", "3"]];
    let text = write_records(dialect.clone(), &records);
    assert_eq!(text, "a,b,c\n1,2,3\n");
    assert_eq!(read_records(dialect, &text), records);
}

#[test]
fn test_roundtrip_custom_dialect() {
    let dialect = Dialect::builder()
        .separator('\t')
        .quote('\'')
        .escape('~')
        .line_terminator("\r\n")
        .build()
        .unwrap();
    let records = vec![
        vec!["it's", "tab\there", "tilde~"],
        vec!["x", "two\r\nlines", "y"],
    ];
    let text = write_records(dialect.clone(), &records);
    assert_eq!(
        text,
        "'it~'s'\t'tab\there'\t'tilde~~'\r\n'x'\t'two\r\nlines'\t'y'\r\n"
    );

    let parsed = read_records(dialect, &text);
    assert_eq!(parsed[0], records[0]);
    assert_eq!(parsed[1], vec!["x", "two\nlines", "y"]);
}

#[test]
fn test_roundtrip_keeping_carriage_returns() {
    // A CRLF inside a field only survives when carriage returns are kept
    let keep = Dialect::builder().keep_carriage_return(true).build().unwrap();
    let records = vec![vec!["two\r\nlines", "cr\ronly"], vec!["x", "y"]];
    let text = write_records(keep.clone(), &records);
    assert_eq!(read_records(keep, &text), records);
}

#[test]
fn test_writer_avoid_trailing_terminator_file() {
    let temp = NamedTempFile::new().unwrap();
    let dialect = Dialect::builder()
        .avoid_trailing_terminator(true)
        .build()
        .unwrap();
    {
        let mut writer = CsvWriter::create_with(temp.path(), dialect).unwrap();
        writer.write_row(["a"]).unwrap();
        writer.write_row(["b"]).unwrap();
        assert_eq!(writer.written_lines(), 2);
    }
    let content = std::fs::read_to_string(temp.path()).unwrap();
    assert_eq!(content, "\"a\"\n\"b\"");
}

#[test]
fn test_skip_lines_with_multi_line_records() {
    let dialect = Dialect::builder().skip_lines(1).build().unwrap();
    let text = "# generated file\nid,body\n1,\"first\nsecond\"\n2,done\n";
    let mut reader = CsvReader::from_reader(text.as_bytes(), dialect);
    let rows = reader.read_all().unwrap();
    assert_eq!(
        rows,
        vec![
            vec!["id", "body"],
            vec!["1", "first\nsecond"],
            vec!["2", "done"],
        ]
    );
    assert_eq!(reader.lines_read(), 5);
    assert_eq!(reader.records_read(), 3);
}

#[test]
fn test_streamed_read_matches_bulk_read() {
    let text: String = (0..500)
        .map(|i| format!("{i},\"name {i}\",\"note\n{i}\"\n"))
        .collect();

    let bulk = read_records(Dialect::default(), &text);

    let mut streamed = Vec::new();
    let count = CsvReader::from_reader(text.as_bytes(), Dialect::default())
        .read_all_with(|record| {
            streamed.push(record);
            Ok(())
        })
        .unwrap();

    assert_eq!(count, 500);
    assert_eq!(bulk, streamed);
    assert_eq!(bulk[499], vec!["499", "name 499", "note\n499"]);
}

#[test]
fn test_iterator_over_custom_line_source() {
    let source = LineReader::new("a;b\nc;d".as_bytes(), false);
    let dialect = Dialect::builder().separator(';').build().unwrap();
    let rows: Vec<Record> = CsvReader::new(source, dialect)
        .records()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
}

#[test]
fn test_compressed_roundtrip() {
    let dir = tempdir().unwrap();
    for name in ["data.csv.zst", "data.csv.gz"] {
        let path = dir.path().join(name);
        {
            let mut writer = CsvWriter::create(&path).unwrap();
            for i in 0..1000 {
                writer
                    .write_row([i.to_string(), format!("Name_{}", i), "a,\"b\"".to_string()])
                    .unwrap();
            }
            writer.close().unwrap();
        }

        let mut reader = CsvReader::open(&path).unwrap();
        let rows = reader.read_all().unwrap();
        assert_eq!(rows.len(), 1000, "{name}");
        assert_eq!(rows[42], vec!["42", "Name_42", "a,\"b\""]);
    }
}

#[test]
fn test_unterminated_quote_at_end_of_input_is_last_record() {
    init_logging();
    let text = "id,body\n1,ok\n2,\"never\nclosed";
    let mut records = CsvReader::from_reader(text.as_bytes(), Dialect::default()).records();
    assert_eq!(records.next().unwrap().unwrap(), vec!["id", "body"]);
    assert_eq!(records.next().unwrap().unwrap(), vec!["1", "ok"]);
    assert_eq!(
        records.next().unwrap().unwrap(),
        vec!["2", "never\nclosed\n"]
    );
    assert!(!records.has_next());
}
