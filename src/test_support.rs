//! Shared helpers for unit tests across modules.

use crate::interp::{Interpreter, InterpreterConfig};
use std::io::{BufReader, Cursor};

/// A small interpreter wired to an in-memory sink/source, suitable for
/// feeding short programs through the scanner/call machinery in tests.
pub fn test_interpreter() -> Interpreter {
    let config = InterpreterConfig {
        buffer_size: 4096,
        stack_size: 64,
        exec_count_limit: 1 << 16,
        trace_all: false,
    };
    Interpreter::new(
        config,
        Box::new(Vec::new()),
        false,
        Box::new(BufReader::new(Cursor::new(Vec::<u8>::new()))),
        false,
        vec!["ttm".to_string()],
        vec![],
    )
}
