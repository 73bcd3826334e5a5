//! The call protocol (`spec.md` §4.4) and body substitution / segment and
//! creation marking (`spec.md` §4.5).
//!
//! `exec` is entered by the scanner (and recursively by this module itself,
//! for nested calls encountered while collecting an outer call's arguments)
//! whenever `#<` or `##<` is recognized at the active cursor.

use crate::dict::NameBody;
use crate::error::{Result, TtmError};
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::{is_create_mark, is_segment_mark, segment_mark_index, CodePoint, TtmString};
use std::fmt;

/// An owned snapshot of a frame's call syntax, taken at the moment a fatal
/// error is detected so the diagnostic stack trace (`spec.md` §7) can be
/// printed after the frame itself has been popped.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub active_disposition: bool,
    pub args_preview: Vec<TtmString>,
}

impl FrameSnapshot {
    pub fn capture(frame: &Frame) -> Self {
        let args_preview = (0..frame.argc())
            .map(|i| TtmString::from_codepoints(frame.arg(i).unwrap_or(&[]).to_vec()))
            .collect();
        FrameSnapshot {
            active_disposition: frame.active_disposition,
            args_preview,
        }
    }
}

impl fmt::Display for FrameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.active_disposition { "#<" } else { "##<" };
        write!(f, "{open}")?;
        for (i, a) in self.args_preview.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, "{a}")?;
        }
        write!(f, ">")
    }
}

/// Recognizes and fully executes one call starting at `interp.buffer.active()`
/// (which must be positioned on the leading `#`). On return the call's
/// result (if any) has been spliced into the buffer per its disposition
/// (`spec.md` §4.4 steps 1–8).
pub fn exec(interp: &mut Interpreter) -> Result<()> {
    interp.exec_count += 1;
    if interp.exec_count > interp.config.exec_count_limit {
        return Err(TtmError::Memory);
    }

    let active_disposition = parse_call_head(interp);
    interp.frames.push(Frame::new(active_disposition))?;
    let passive_save = interp.buffer.passive();

    let frame = match collect_args(interp) {
        Ok(()) => interp.frames.pop()?,
        Err(e) => {
            if !e.is_exit() {
                if let Some(f) = interp.frames.top() {
                    interp.fatal_trace.push(FrameSnapshot::capture(f));
                }
            }
            interp.frames.pop()?;
            return Err(e);
        }
    };
    interp.buffer.set_passive(passive_save);

    match dispatch(interp, &frame) {
        Ok(result_text) => splice_result(interp, &frame, &result_text),
        Err(e) => {
            if !e.is_exit() {
                interp.fatal_trace.push(FrameSnapshot::capture(&frame));
            }
            Err(e)
        }
    }
}

/// Consumes the leading `#<` or `##<`, returning `true` for the active
/// disposition (single `#`).
fn parse_call_head(interp: &mut Interpreter) -> bool {
    let active = interp.buffer.active();
    let c1 = interp.buffer.peek_at(active + 1);
    let active_disposition = c1 == interp.chars.open;
    interp.buffer.advance_active();
    if active_disposition {
        interp.buffer.advance_active();
    } else {
        interp.buffer.advance_active();
        interp.buffer.advance_active();
    }
    active_disposition
}

/// Argument collection loop (`spec.md` §4.4 step 2). Each argument's text
/// is assembled in the buffer's passive scratch region (exactly as the
/// scanner assembles finalized output) and then copied out into the
/// frame's own arena as soon as it completes, so the frame never aliases
/// the shared buffer — see `SPEC_FULL.md` §9 "Argument arena per frame".
fn collect_args(interp: &mut Interpreter) -> Result<()> {
    loop {
        let arg_start = interp.buffer.passive();
        let done = collect_one_arg(interp)?;
        let arg_end = interp.buffer.passive();
        let text = interp.buffer.slice(arg_start, arg_end).to_vec();
        interp
            .frames
            .top_mut()
            .expect("frame pushed before argument collection")
            .push_arg(&text)?;
        if done {
            break;
        }
    }
    Ok(())
}

/// Collects one argument, returning `true` if termination was via the
/// closing bracket (the call's last argument).
fn collect_one_arg(interp: &mut Interpreter) -> Result<bool> {
    loop {
        let c = interp.buffer.peek_active();
        if c == 0 {
            return Err(TtmError::UnexpectedEos);
        } else if c == interp.chars.escape {
            interp.buffer.advance_active();
            let next = interp.buffer.peek_active();
            if next == 0 {
                return Err(TtmError::UnexpectedEos);
            }
            interp.buffer.push_passive(next)?;
            interp.buffer.advance_active();
        } else if c == interp.chars.semi {
            interp.buffer.advance_active();
            return Ok(false);
        } else if c == interp.chars.close {
            interp.buffer.advance_active();
            return Ok(true);
        } else if c == interp.chars.sharp {
            let active = interp.buffer.active();
            let c1 = interp.buffer.peek_at(active + 1);
            let c2 = interp.buffer.peek_at(active + 2);
            let is_call = c1 == interp.chars.open
                || (c1 == interp.chars.sharp && c2 == interp.chars.open);
            if is_call {
                // Nested call: its own splice (active or passive
                // disposition) leaves the right text at active/passive
                // for this loop to keep reading normally.
                exec(interp)?;
            } else {
                interp.buffer.push_passive(c)?;
                interp.buffer.advance_active();
            }
        } else if c == interp.chars.open {
            dequote_for_arg(interp)?;
        } else {
            interp.buffer.push_passive(c)?;
            interp.buffer.advance_active();
        }
    }
}

/// The call parser's own dequote: strips one level of `<...>`, tracking
/// nesting like the scanner, but keeps the leading escape character on
/// escaped code points inside the quoted text (`spec.md` §4.4) so a later
/// consumer of the argument — not this parse step — resolves the escape.
fn dequote_for_arg(interp: &mut Interpreter) -> Result<()> {
    interp.buffer.advance_active();
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

enum NameKind {
    Builtin {
        func: crate::dict::BuiltinFn,
        novalue: bool,
    },
    UserDefined {
        body: Vec<CodePoint>,
    },
}

/// Resolves the name, validates arity, and runs the call, returning the
/// produced result text (`spec.md` §4.4 steps 4–6). Takes an owned `Frame`
/// (already popped off the stack) to avoid aliasing `&mut Interpreter`
/// with a live borrow into it.
fn dispatch(interp: &mut Interpreter, frame: &Frame) -> Result<Vec<CodePoint>> {
    if frame.argc() == 0 || frame.name().is_empty() {
        return Err(TtmError::NoName);
    }
    let name_key = frame.name().to_vec();
    let (kind, minargs, trace) = {
        let name = interp.dict.lookup(&name_key).ok_or(TtmError::NoName)?;
        let kind = match &name.body {
            NameBody::Builtin { func, novalue, .. } => NameKind::Builtin {
                func: *func,
                novalue: *novalue,
            },
            NameBody::UserDefined { body, .. } => NameKind::UserDefined { body: body.clone() },
        };
        (kind, name.minargs(), name.trace)
    };

    if minargs > frame.argc() - 1 {
        return Err(TtmError::TooFewParams);
    }

    let trace_active = interp.trace_all || trace;
    let _span = if trace_active {
        Some(
            tracing::debug_span!(
                "ttm::call",
                name = %TtmString::from_codepoints(name_key.clone())
            )
            .entered(),
        )
    } else {
        None
    };

    interp.result.reset();
    let result_text = match kind {
        NameKind::Builtin { func, novalue } => {
            func(interp, frame)?;
            if novalue {
                Vec::new()
            } else {
                interp.result.output().to_vec()
            }
        }
        NameKind::UserDefined { body } => body_substitute(interp, &body, frame),
    };
    Ok(result_text)
}

/// Splices `result` into the buffer per the frame's disposition
/// (`spec.md` §4.4 step 7).
fn splice_result(interp: &mut Interpreter, frame: &Frame, result: &[CodePoint]) -> Result<()> {
    if result.is_empty() {
        return Ok(());
    }
    let active = interp.buffer.active();
    let passive = interp.buffer.passive();
    let avail = active - passive;
    if avail < result.len() {
        interp.buffer.expand_gap_at_active(result.len() - avail)?;
    }
    if frame.active_disposition {
        let active = interp.buffer.active();
        let at = active - result.len();
        interp.buffer.write_slice_at(at, result)?;
        interp.buffer.set_active(at);
    } else {
        let passive = interp.buffer.passive();
        interp.buffer.write_slice_at(passive, result)?;
        interp.buffer.set_passive(passive + result.len());
    }
    Ok(())
}

/// Walks a user-defined body, substituting segment marks with the calling
/// frame's arguments and creation marks with a fresh counter value
/// (`spec.md` §4.4 step 6 / §4.5).
pub(crate) fn body_substitute(
    interp: &mut Interpreter,
    body: &[CodePoint],
    frame: &Frame,
) -> Vec<CodePoint> {
    let mut out = Vec::with_capacity(body.len());
    for &c in body {
        if is_segment_mark(c) {
            let idx = segment_mark_index(c) as usize;
            if idx < frame.argc() {
                if let Some(arg) = frame.arg(idx) {
                    out.extend_from_slice(arg);
                }
            }
        } else if is_create_mark(c) {
            interp.crcounter += 1;
            let counter = format!("{:04}", interp.crcounter);
            out.extend(counter.chars().map(|ch| ch as CodePoint));
        } else {
            out.push(c);
        }
    }
    out
}

/// `ss`/`sc` helper (`spec.md` §4.5): replaces every non-overlapping,
/// leftmost occurrence of each `vi` in `body[residual..]` with a fresh
/// segment mark, allocating one new index per distinct argument that
/// matches at least once. Returns the number of replacements made.
pub(crate) fn segment_replace(
    body: &mut Vec<CodePoint>,
    residual: usize,
    maxsegmark: &mut u32,
    args: &[&[CodePoint]],
) -> Result<usize> {
    if residual >= body.len() {
        return Ok(0);
    }
    let mut count = 0usize;
    let mut startseg = *maxsegmark;
    for &arg in args {
        if arg.is_empty() {
            continue;
        }
        let region = TtmString::from_codepoints(body[residual..].to_vec());
        let mut found = false;
        let mut pos = 0usize;
        let mut rewritten: Vec<CodePoint> = Vec::new();
        loop {
            match region.find_from(arg, pos) {
                Some(at) => {
                    rewritten.extend_from_slice(&region.as_slice()[pos..at]);
                    if !found {
                        startseg += 1;
                        if startseg > crate::text::MAXMARKS as u32 {
                            return Err(TtmError::TooManySegmentMarks);
                        }
                        found = true;
                    }
                    rewritten.push(crate::text::make_segment_mark(startseg));
                    count += 1;
                    pos = at + arg.len();
                }
                None => {
                    rewritten.extend_from_slice(&region.as_slice()[pos..]);
                    break;
                }
            }
        }
        body.truncate(residual);
        body.extend(rewritten);
    }
    *maxsegmark = startseg;
    Ok(count)
}

/// `cr` helper (`spec.md` §4.5): replaces every occurrence of `target`
/// within `body[residual..]` with a single (non-indexed) creation mark.
pub(crate) fn creation_replace(body: &mut Vec<CodePoint>, residual: usize, target: &[CodePoint]) {
    if target.is_empty() || residual >= body.len() {
        return;
    }
    let region = TtmString::from_codepoints(body[residual..].to_vec());
    let mut pos = 0usize;
    let mut rewritten: Vec<CodePoint> = Vec::new();
    loop {
        match region.find_from(target, pos) {
            Some(at) => {
                rewritten.extend_from_slice(&region.as_slice()[pos..at]);
                rewritten.push(crate::text::CREATE_MARK);
                pos = at + target.len();
            }
            None => {
                rewritten.extend_from_slice(&region.as_slice()[pos..]);
                break;
            }
        }
    }
    body.truncate(residual);
    body.extend(rewritten);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TtmString;

    fn run(src: &str) -> TtmString {
        let mut interp = crate::test_support::test_interpreter();
        let cps: Vec<u32> = src.chars().map(|c| c as u32).collect();
        interp.buffer.set_length(cps.len()).unwrap();
        interp.buffer.write_slice_at(0, &cps).unwrap();
        crate::scanner::scan(&mut interp).unwrap();
        TtmString::from_codepoints(interp.buffer.output().to_vec())
    }

    #[test]
    fn active_call_rescans_result() {
        assert_eq!(
            run("#<ds;greet;Hello, #<ds;name;world>#<name>!>#<greet>").to_string(),
            "Hello, world!"
        );
    }

    #[test]
    fn passive_call_defers_ds_but_not_novalue_splice() {
        assert_eq!(run("##<ds;a;X>#<a>").to_string(), "X");
    }

    #[test]
    fn ap_after_ds_concatenates_body() {
        assert_eq!(run("#<ds;a;X>#<ap;a;Y>#<a>").to_string(), "XY");
    }

    #[test]
    fn segment_and_call_substitutes_argument() {
        assert_eq!(
            run("#<ds;inc;<#<ad;1;\\1>>>#<ss;inc;n>#<inc;41>").to_string(),
            "42"
        );
    }

    #[test]
    fn segment_mark_repeats_in_body() {
        assert_eq!(run("#<ds;rep;<\\1\\1>>#<ss;rep;x>#<rep;ab>").to_string(), "abab");
    }

    #[test]
    fn empty_argument_roundtrips() {
        assert_eq!(run("#<ds;e;>#<e>").to_string(), "");
    }

    #[test]
    fn too_many_args_is_fatal() {
        let mut interp = crate::test_support::test_interpreter();
        let mut src = String::from("#<ds");
        for i in 0..70 {
            src.push_str(&format!(";{i}"));
        }
        src.push('>');
        let cps: Vec<u32> = src.chars().map(|c| c as u32).collect();
        interp.buffer.set_length(cps.len()).unwrap();
        interp.buffer.write_slice_at(0, &cps).unwrap();
        assert_eq!(
            crate::scanner::scan(&mut interp),
            Err(TtmError::TooManyParams)
        );
    }

    #[test]
    fn segment_replace_allocates_one_index_per_argument() {
        let mut body: Vec<CodePoint> = "axbxc".chars().map(|c| c as u32).collect();
        let mut maxseg = 0u32;
        let x: Vec<CodePoint> = vec!['x' as u32];
        let count = segment_replace(&mut body, 0, &mut maxseg, &[&x]).unwrap();
        assert_eq!(count, 2);
        assert_eq!(maxseg, 1);
    }

    #[test]
    fn creation_replace_compresses_multi_char_match() {
        let mut body: Vec<CodePoint> = "azbzc".chars().map(|c| c as u32).collect();
        let z: Vec<CodePoint> = vec!['z' as u32];
        creation_replace(&mut body, 0, &z);
        assert_eq!(body.iter().filter(|&&c| is_create_mark(c)).count(), 2);
    }
}
