//! Mock versions of failing character sources and sinks
use mockall::mock;

use csvstream::csv::LineSource;
use std::io::{self, Write};

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

mock! {
    pub Lines {}
    impl LineSource for Lines {
        fn read_line(&mut self) -> io::Result<Option<String>>;
        fn has_more(&mut self) -> io::Result<bool>;
    }
}
