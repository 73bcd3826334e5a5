//! The interpreter: the single mutable context threaded through every
//! operation (`spec.md` §9 "Global mutable state vs. threaded context" —
//! we take the suggested re-architecture and make it an explicit value
//! rather than a process-wide global).

use crate::buffer::Buffer;
use crate::classes::ClassTable;
use crate::dict::Dictionary;
use crate::frame::FrameStack;
use crate::text::CodePoint;
use std::io::{BufRead, Write};
use std::time::Instant;

/// Hard caps from `spec.md` §5 "Bounds as safety".
pub const MINBUFFERSIZE: usize = 1 << 20;
pub const MINSTACKSIZE: usize = 64;
pub const MINEXECCOUNT: u64 = 1 << 16;

/// Resource limits and startup parameters, the interpreter's "configuration
/// layer" (`SPEC_FULL.md` §2 item 11). Built from the CLI surface by
/// `driver::cli`.
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    pub buffer_size: usize,
    pub stack_size: usize,
    pub exec_count_limit: u64,
    pub trace_all: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            buffer_size: MINBUFFERSIZE,
            stack_size: MINSTACKSIZE,
            exec_count_limit: MINEXECCOUNT,
            trace_all: false,
        }
    }
}

impl InterpreterConfig {
    /// Clamps any supplied sizes up to the hard minimums, mirroring the
    /// original driver's `if (x < MINX) x = MINX;` behavior.
    pub fn clamp_to_minimums(mut self) -> Self {
        self.buffer_size = self.buffer_size.max(MINBUFFERSIZE);
        self.stack_size = self.stack_size.max(MINSTACKSIZE);
        self.exec_count_limit = self.exec_count_limit.max(MINEXECCOUNT);
        self
    }
}

/// The five scanner control code points plus the `rs` read-delimiter
/// ("meta character", distinct from the five — see `builtins::env_ops::cm`
/// vs `builtins::meta_ops`).
#[derive(Clone, Copy, Debug)]
pub struct ControlChars {
    pub sharp: CodePoint,
    pub open: CodePoint,
    pub close: CodePoint,
    pub semi: CodePoint,
    pub escape: CodePoint,
    pub meta: CodePoint,
}

impl Default for ControlChars {
    fn default() -> Self {
        ControlChars {
            sharp: '#' as CodePoint,
            open: '<' as CodePoint,
            close: '>' as CodePoint,
            semi: ';' as CodePoint,
            escape: '\\' as CodePoint,
            meta: '\n' as CodePoint,
        }
    }
}

pub struct Interpreter {
    pub buffer: Buffer,
    pub result: Buffer,
    pub dict: Dictionary,
    pub classes: ClassTable,
    pub frames: FrameStack,
    pub config: InterpreterConfig,
    pub chars: ControlChars,
    pub crcounter: u64,
    pub exec_count: u64,
    pub trace_all: bool,
    pub argv_strings: Vec<String>,
    pub include_roots: Vec<std::path::PathBuf>,
    pub stdout_sink: Box<dyn Write>,
    pub is_stdout: bool,
    pub read_source: Box<dyn BufRead>,
    pub is_stdin: bool,
    pub start_time: Instant,
    pub exit_requested: Option<i32>,
    /// Newest-first call trace accumulated by `call::exec` as a fatal error
    /// unwinds the frame stack (`spec.md` §7).
    pub fatal_trace: Vec<crate::call::FrameSnapshot>,
}

impl Interpreter {
    pub fn new(
        config: InterpreterConfig,
        stdout_sink: Box<dyn Write>,
        is_stdout: bool,
        read_source: Box<dyn BufRead>,
        is_stdin: bool,
        argv_strings: Vec<String>,
        include_roots: Vec<std::path::PathBuf>,
    ) -> Self {
        let mut interp = Interpreter {
            buffer: Buffer::new(config.buffer_size),
            result: Buffer::new(config.buffer_size),
            dict: Dictionary::new(),
            classes: ClassTable::new(),
            frames: FrameStack::new(config.stack_size),
            trace_all: config.trace_all,
            config,
            chars: ControlChars::default(),
            crcounter: 0,
            exec_count: 0,
            argv_strings,
            include_roots,
            stdout_sink,
            is_stdout,
            read_source,
            is_stdin,
            start_time: Instant::now(),
            exit_requested: None,
            fatal_trace: Vec::new(),
        };
        crate::builtins::register_all(&mut interp);
        interp.predefine_names();
        interp
    }

    /// Registers the two predefined library strings from the original
    /// runtime (`original_source/ttm.c`'s `predefines[]`): `comment`, an
    /// always-empty sink, and `def`, a macro that defines other macros by
    /// name+body+substitution list in one call.
    fn predefine_names(&mut self) {
        let saved_trace = self.trace_all;
        self.trace_all = false;
        for (name, body) in [
            ("comment", "#<ds;comment;>"),
            (
                "def",
                "#<ds;def;<##<ds;name;<text>>##<ss;name;subs>>>#<ss;def;name;subs;text>",
            ),
        ] {
            self.run_bootstrap(body);
            if let Some(n) = self.dict.lookup_mut(&crate::text::TtmString::from(name).into_vec()) {
                n.locked = true;
            }
        }
        self.trace_all = saved_trace;
    }

    fn run_bootstrap(&mut self, program: &str) {
        self.buffer.reset();
        let cps: Vec<CodePoint> = program.chars().map(|c| c as CodePoint).collect();
        self.buffer.set_length(cps.len()).expect("bootstrap fits buffer");
        self.buffer.write_slice_at(0, &cps).expect("bootstrap fits buffer");
        self.buffer.set_active(0);
        self.buffer.set_passive(0);
        let _ = crate::scanner::scan(self);
        self.buffer.reset();
    }
}
