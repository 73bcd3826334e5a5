//! The driver: CLI parsing, interpreter setup, the `-D`/`-e`/`-f`/`-i`
//! execution sequence, and fatal-error reporting
//! (`original_source/ttm.c`'s `main`, `readinput`, `readbalanced`,
//! `printbuffer`).

pub mod cli;
pub mod diagnostics;
pub mod include;
pub mod io;

use std::io::{IsTerminal, Read, Write};

use anyhow::{bail, Result};
use clap::Parser;

use crate::error::TtmError;
use crate::interp::{Interpreter, InterpreterConfig};
use crate::text::CodePoint;

use cli::{parse_limit, Cli, LimitTag};

/// Parses arguments, runs the configured programs in order, reports any
/// fatal error, and returns the process exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.debug.as_deref());

    if cli.output.is_some() && cli.interactive {
        bail!("Interactive is illegal if output file specified");
    }

    let mut config = InterpreterConfig::default();
    for tag in &cli.limits {
        match parse_limit(tag) {
            Some((LimitTag::Buffer, v)) => config.buffer_size = v,
            Some((LimitTag::Stack, v)) => config.stack_size = v,
            Some((LimitTag::ExecCount, v)) => config.exec_count_limit = v,
            None => bail!("illegal -X tag: {tag}"),
        }
    }
    let config = config.clamp_to_minimums();

    let (stdout_sink, is_stdout) = io::open_output(cli.output.as_deref())?;
    let (read_source, is_stdin) = io::open_read_source(cli.rs_file.as_deref())?;
    let include_roots = include::normalize_roots(&cli.include);

    let mut argv_strings = vec!["ttm".to_string()];
    argv_strings.extend(cli.args.iter().cloned());

    let mut interp = Interpreter::new(
        config,
        stdout_sink,
        is_stdout,
        read_source,
        is_stdin,
        argv_strings,
        include_roots,
    );

    let exit_code = match run_programs(&mut interp, &cli) {
        Ok(()) => interp.exit_requested.unwrap_or(0),
        Err(e) => {
            diagnostics::report(&interp, &e);
            1
        }
    };

    flush_remaining_output(&mut interp)?;
    Ok(exit_code)
}

/// Enables `tracing` output when `-d` is given. The original's own
/// `-d` flag is parsed but never consulted anywhere else in
/// `original_source/ttm.c`; here it drives the one piece of ambient
/// observability the interpreter actually has (`call::exec`'s
/// `ttm::call` spans).
fn init_tracing(debug: Option<&str>) {
    use tracing_subscriber::EnvFilter;
    let filter = match debug {
        Some(flags) if !flags.is_empty() => EnvFilter::new(format!("ttm_rs={flags}")),
        Some(_) => EnvFilter::new("ttm_rs=debug"),
        None => EnvFilter::new("ttm_rs=warn"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs, in order: the `-D` defines (rewritten as `##<ds;name;value>`),
/// the `-e` snippets, the `-f` program file, then the interactive loop.
/// Each step resets the buffer and re-scans from scratch, matching
/// `main`'s sequence of `resetBuffer` + `scan` calls — only the very
/// last step's residual buffer content is ever printed.
fn run_programs(interp: &mut Interpreter, cli: &Cli) -> Result<(), TtmError> {
    for def in &cli.defines {
        let (name, value) = def.split_once('=').unwrap_or((def.as_str(), ""));
        let program = format!("##<ds;{name};{value}>");
        run_snippet(interp, &program)?;
        if interp.exit_requested.is_some() {
            return Ok(());
        }
    }

    for program in &cli.execute {
        run_snippet(interp, program)?;
        if interp.exit_requested.is_some() {
            return Ok(());
        }
    }

    if let Some(path) = &cli.file {
        let cps = io::read_program_file(path).map_err(|_| TtmError::Io)?;
        run_codepoints(interp, &cps)?;
        if interp.exit_requested.is_some() {
            return Ok(());
        }
    }

    if cli.interactive {
        loop {
            match read_balanced(interp)? {
                None => break,
                Some(cps) => {
                    run_codepoints(interp, &cps)?;
                    if interp.exit_requested.is_some() {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn run_snippet(interp: &mut Interpreter, program: &str) -> Result<(), TtmError> {
    run_codepoints(interp, &io::to_codepoints(program))
}

fn run_codepoints(interp: &mut Interpreter, cps: &[CodePoint]) -> Result<(), TtmError> {
    interp.buffer.reset();
    interp.buffer.set_length(cps.len())?;
    interp.buffer.write_slice_at(0, cps)?;
    interp.buffer.set_active(0);
    interp.buffer.set_passive(0);
    crate::scanner::scan(interp)
}

/// Reads stdin byte-by-byte until the outer `<...>` balances back to
/// depth zero, then skips to the end of the line. Returns `None` at an
/// immediate EOF (`original_source/ttm.c`'s `readbalanced`).
fn read_balanced(interp: &mut Interpreter) -> Result<Option<Vec<CodePoint>>, TtmError> {
    if interp.is_stdin && std::io::stdin().is_terminal() {
        print!("ttm>");
        let _ = std::io::stdout().flush();
    }
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut byte = [0u8; 1];
    let mut last = 0u8;
    let mut saw_any = false;
    loop {
        match interp.read_source.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                saw_any = true;
                let mut c = byte[0];
                if c as CodePoint == interp.chars.escape {
                    out.push(c as CodePoint);
                    match interp.read_source.read(&mut byte) {
                        Ok(0) => break,
                        Ok(_) => c = byte[0],
                        Err(_) => return Err(TtmError::Io),
                    }
                }
                out.push(c as CodePoint);
                if c as CodePoint == interp.chars.open {
                    depth += 1;
                } else if c as CodePoint == interp.chars.close {
                    depth -= 1;
                    if depth == 0 {
                        last = c;
                        break;
                    }
                }
                last = c;
            }
            Err(_) => return Err(TtmError::Io),
        }
    }
    while last != b'\n' {
        match interp.read_source.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => last = byte[0],
            Err(_) => return Err(TtmError::Io),
        }
    }
    if !saw_any {
        Ok(None)
    } else {
        Ok(Some(out))
    }
}

/// Dumps whatever is left in the buffer after the run, matching
/// `printbuffer`.
fn flush_remaining_output(interp: &mut Interpreter) -> Result<()> {
    let text: String = interp
        .buffer
        .output()
        .iter()
        .filter_map(|&c| char::from_u32(c))
        .collect();
    write!(interp.stdout_sink, "{text}")?;
    interp.stdout_sink.flush()?;
    Ok(())
}
