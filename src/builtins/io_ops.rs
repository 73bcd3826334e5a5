//! Peripheral I/O operations: `cm`, `ps`, `psr`, `rs`, `pf`
//! (`spec.md` §6.5, grounded on `ttm_cm`/`ttm_ps`/`ttm_rs`/`ttm_psr`/
//! `ttm_pf` in `original_source/ttm.c`).

use std::io::{Read, Write};

use crate::error::{Result, TtmError};
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::{CodePoint, TtmString};

use super::write_result;

/// De-escapes a backslash-escaped code point the way `convertEscapeChar`
/// does: `r`/`n`/`t`/`b`/`f` become the matching control character, an
/// escaped newline is elided (returns `None`), anything else passes
/// through unchanged.
fn convert_escape_char(c: CodePoint) -> Option<char> {
    let c = char::from_u32(c)?;
    Some(match c {
        'r' => '\r',
        'n' => '\n',
        't' => '\t',
        'b' => '\u{8}',
        'f' => '\u{c}',
        '\n' => return None,
        other => other,
    })
}

/// Renders text for `ps`/`psr`: resolves any `\`-escaped code point via
/// [`convert_escape_char`], then drops control characters other than
/// `\n` so a caller-controlled string can't inject escape sequences
/// (`original_source/ttm.c`'s own comment on `ttm_ps`: "In order to avoid
/// spoofing..."). Mirrors `printstring`'s main loop with `printall` false.
fn render_for_print(interp: &Interpreter, s: &[CodePoint]) -> String {
    let mut out = String::new();
    let mut iter = s.iter().copied();
    while let Some(c) = iter.next() {
        let resolved = if c == interp.chars.escape {
            match iter.next() {
                Some(next) => convert_escape_char(next),
                None => None,
            }
        } else {
            char::from_u32(c)
        };
        if let Some(ch) = resolved {
            if ch == '\n' || !ch.is_control() {
                out.push(ch);
            }
        }
    }
    out
}

pub(super) fn ps(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let text = render_for_print(interp, frame.arg(1).unwrap_or(&[]));
    let to_stderr = frame
        .arg(2)
        .map(|s| TtmString::from_codepoints(s.to_vec()).to_string() == "stderr")
        .unwrap_or(false);
    let trailing_newline = if text.ends_with('\n') { "" } else { "\n" };
    if to_stderr {
        eprint!("{text}{trailing_newline}");
    } else {
        write!(interp.stdout_sink, "{text}{trailing_newline}").map_err(|_| TtmError::Io)?;
    }
    Ok(())
}

pub(super) fn rs(interp: &mut Interpreter, _frame: &Frame) -> Result<()> {
    if interp.is_stdin {
        write!(interp.stdout_sink, "ttm>").map_err(|_| TtmError::Io)?;
        interp.stdout_sink.flush().map_err(|_| TtmError::Io)?;
    }
    let meta = char::from_u32(interp.chars.meta).unwrap_or('\n');
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match interp.read_source.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                let c = byte[0] as char;
                if c == meta {
                    break;
                }
                line.push(c as CodePoint);
            }
            Err(_) => return Err(TtmError::Io),
        }
    }
    write_result(interp, &line)
}

pub(super) fn psr(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    ps(interp, frame)?;
    rs(interp, frame)
}

pub(super) fn cm(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let arg = frame.arg(1).unwrap_or(&[]);
    if let Some(&c) = arg.first() {
        if c > 127 {
            return Err(TtmError::Ascii);
        }
        interp.chars.meta = c;
    }
    Ok(())
}

pub(super) fn pf(interp: &mut Interpreter, _frame: &Frame) -> Result<()> {
    interp.stdout_sink.flush().map_err(|_| TtmError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cps(s: &str) -> Vec<CodePoint> {
        s.chars().map(|c| c as CodePoint).collect()
    }

    #[test]
    fn render_resolves_backslash_escapes() {
        let interp = crate::test_support::test_interpreter();
        assert_eq!(render_for_print(&interp, &cps("hi\\nbye")), "hi\nbye");
        assert_eq!(render_for_print(&interp, &cps("a\\tb")), "a\tb");
    }

    #[test]
    fn render_elides_escaped_newline() {
        let interp = crate::test_support::test_interpreter();
        assert_eq!(render_for_print(&interp, &cps("a\\\nb")), "ab");
    }

    #[test]
    fn render_drops_other_control_characters() {
        let interp = crate::test_support::test_interpreter();
        let with_bell = vec!['a' as CodePoint, 7, 'b' as CodePoint];
        assert_eq!(render_for_print(&interp, &with_bell), "ab");
    }
}
