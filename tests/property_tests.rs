//! Property-based tests for the write/parse round-trip guarantees

use csvstream::csv::Dialect;
use csvstream::{CsvParser, CsvReader, CsvWriter, Record};
use proptest::prelude::*;

fn write(dialect: &Dialect, records: &[Record]) -> String {
    let mut writer = CsvWriter::new(Vec::new(), dialect.clone());
    writer.write_rows(records).unwrap();
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

fn read(dialect: &Dialect, text: &str) -> Vec<Record> {
    CsvReader::from_reader(text.as_bytes(), dialect.clone())
        .read_all()
        .unwrap()
}

fn records(field: &'static str) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(prop::collection::vec(field, 1..6), 1..8)
}

proptest! {
    // Any text except carriage returns, which the default line source treats as line breaks
    #[test]
    fn prop_quoted_roundtrip(records in records("[^\r]{0,12}")) {
        let dialect = Dialect::default();
        let text = write(&dialect, &records);
        prop_assert_eq!(read(&dialect, &text), records);
    }

    #[test]
    fn prop_quoted_roundtrip_keeping_carriage_returns(records in records("\\PC{0,12}|[\r\n,\"\\\\]{0,4}")) {
        let dialect = Dialect::builder().keep_carriage_return(true).build().unwrap();
        let text = write(&dialect, &records);
        prop_assert_eq!(read(&dialect, &text), records);
    }

    #[test]
    fn prop_plain_roundtrip(records in records("[a-zA-Z0-9 _.;:-]{0,12}")) {
        let dialect = Dialect::builder().quote_all_fields(false).build().unwrap();
        let text = write(&dialect, &records);
        prop_assert_eq!(read(&dialect, &text), records);
    }

    #[test]
    fn prop_custom_dialect_roundtrip(records in records("[^\r]{0,12}")) {
        let dialect = Dialect::builder()
            .separator('|')
            .quote('\'')
            .escape('^')
            .quote_all_fields(true)
            .build()
            .unwrap();
        let text = write(&dialect, &records);
        prop_assert_eq!(read(&dialect, &text), records);
    }

    #[test]
    fn prop_parse_is_idempotent(line in "[^\r\n]{0,40}") {
        let first = CsvParser::default().parse_line(&line);
        let second = CsvParser::default().parse_line(&line);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "parse outcome differs for {:?}", line),
        }
    }
}
