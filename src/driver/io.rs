//! File and stream setup for the driver: opening the output sink, the
//! `#<rs>` data source, and reading whole files into code points
//! (`original_source/ttm.c`'s `readinput`/`readfile`).

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};

use anyhow::{Context, Result};

use crate::text::CodePoint;

/// Opens the output sink: `path`, or stdout if `None`. Returns the sink
/// plus whether it is stdout (driver needs this to decide whether to
/// print the `ttm>` prompt and whether to skip closing it explicitly).
pub fn open_output(path: Option<&std::path::Path>) -> Result<(Box<dyn Write>, bool)> {
    match path {
        None => Ok((Box::new(std::io::stdout()), true)),
        Some(p) => {
            let f = File::create(p).with_context(|| format!("output file is not writable: {}", p.display()))?;
            Ok((Box::new(f), false))
        }
    }
}

/// Opens the `#<rs>` source: `path`, or stdin if `None`.
pub fn open_read_source(path: Option<&std::path::Path>) -> Result<(Box<dyn BufRead>, bool)> {
    match path {
        None => Ok((Box::new(BufReader::new(std::io::stdin())), true)),
        Some(p) => {
            let f = File::open(p).with_context(|| format!("-r file is not readable: {}", p.display()))?;
            Ok((Box::new(BufReader::new(f)), false))
        }
    }
}

/// Reads a whole file's text as code points, for `-f <file>`.
pub fn read_program_file(path: &std::path::Path) -> Result<Vec<CodePoint>> {
    let mut f = File::open(path).with_context(|| format!("cannot read program file: {}", path.display()))?;
    let mut s = String::new();
    f.read_to_string(&mut s)
        .with_context(|| format!("program file is not valid UTF-8: {}", path.display()))?;
    Ok(s.chars().map(|c| c as CodePoint).collect())
}

pub fn to_codepoints(s: &str) -> Vec<CodePoint> {
    s.chars().map(|c| c as CodePoint).collect()
}
