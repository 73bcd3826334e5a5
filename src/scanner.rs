//! The top-level scan loop (`spec.md` §4.3): classify the code point at
//! `active` and either pass it through, dequote a bracketed group,
//! recognize and execute a call, or terminate.

use crate::error::{Result, TtmError};
use crate::interp::Interpreter;

/// Runs the scanner until `active` reaches `end` or an `exit` unwinds it.
/// On return, `[0, passive)` holds the finalized output.
pub fn scan(interp: &mut Interpreter) -> Result<()> {
    loop {
        let c = interp.buffer.peek_active();
        if c == 0 {
            break;
        } else if c == interp.chars.escape {
            interp.buffer.advance_active();
            let next = interp.buffer.peek_active();
            if next == 0 {
                return Err(TtmError::UnexpectedEos);
            }
            interp.buffer.push_passive(next)?;
            interp.buffer.advance_active();
        } else if c == interp.chars.sharp {
            let active = interp.buffer.active();
            let c1 = interp.buffer.peek_at(active + 1);
            let c2 = interp.buffer.peek_at(active + 2);
            let is_call = c1 == interp.chars.open
                || (c1 == interp.chars.sharp && c2 == interp.chars.open);
            if is_call {
                match crate::call::exec(interp) {
                    Err(TtmError::Exit(code)) => {
                        interp.exit_requested = Some(code);
                        break;
                    }
                    other => other?,
                }
            } else {
                interp.buffer.push_passive(c)?;
                interp.buffer.advance_active();
            }
        } else if c == interp.chars.open {
            dequote(interp)?;
        } else {
            interp.buffer.push_passive(c)?;
            interp.buffer.advance_active();
        }
    }

    let newlen = interp.buffer.passive();
    interp.buffer.set_length(newlen)?;
    interp.buffer.set_active(newlen);
    Ok(())
}

/// Strips one level of `<...>` brackets, copying the interior to `passive`
/// and tracking nested depth. The matching closing bracket is consumed but
/// not copied (`spec.md` §4.3).
fn dequote(interp: &mut Interpreter) -> Result<()> {
    interp.buffer.advance_active(); // skip leading '<'
    let mut depth = 1;
    loop {
        let c = interp.buffer.peek_active();
        if c == 0 {
            return Err(TtmError::UnexpectedEos);
        }
        if c == interp.chars.escape {
            interp.buffer.push_passive(c)?;
            interp.buffer.advance_active();
            let next = interp.buffer.peek_active();
            if next == 0 {
                return Err(TtmError::UnexpectedEos);
            }
            interp.buffer.push_passive(next)?;
            interp.buffer.advance_active();
            continue;
        }
        if c == interp.chars.open {
            interp.buffer.push_passive(c)?;
            interp.buffer.advance_active();
            depth += 1;
        } else if c == interp.chars.close {
            interp.buffer.advance_active();
            depth -= 1;
            if depth == 0 {
                break;
            }
            interp.buffer.push_passive(c)?;
        } else {
            interp.buffer.push_passive(c)?;
            interp.buffer.advance_active();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TtmString;

    fn run(src: &str) -> TtmString {
        let mut interp = crate::test_support::test_interpreter();
        interp.buffer.reset();
        let cps: Vec<u32> = src.chars().map(|c| c as u32).collect();
        interp.buffer.set_length(cps.len()).unwrap();
        interp.buffer.write_slice_at(0, &cps).unwrap();
        scan(&mut interp).unwrap();
        let out = interp.buffer.output().to_vec();
        TtmString::from_codepoints(out)
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(run("hello world").to_string(), "hello world");
    }

    #[test]
    fn dequote_strips_outer_brackets() {
        assert_eq!(run("a<b>c").to_string(), "abc");
    }

    #[test]
    fn nested_brackets_keep_inner_pair() {
        assert_eq!(run("a<b<c>d>e").to_string(), "ab<c>de");
    }

    #[test]
    fn escape_passes_next_char_verbatim() {
        assert_eq!(run("a\\#b").to_string(), "a#b");
    }

    #[test]
    fn unterminated_dequote_is_eos_error() {
        let mut interp = crate::test_support::test_interpreter();
        let cps: Vec<u32> = "a<b".chars().map(|c| c as u32).collect();
        interp.buffer.set_length(cps.len()).unwrap();
        interp.buffer.write_slice_at(0, &cps).unwrap();
        assert_eq!(scan(&mut interp), Err(TtmError::UnexpectedEos));
    }

    #[test]
    fn ds_then_call_expands_inline() {
        assert_eq!(
            run("#<ds;greet;Hello, #<ds;name;world>#<name>!>#<greet>").to_string(),
            "Hello, world!"
        );
    }
}
