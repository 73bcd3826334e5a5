//! The `#<ttm;...>` family of self-inspection and meta-configuration
//! pseudo-commands (`spec.md` §6.6, grounded on `ttm_ttm`/`ttm_ttm_meta`/
//! `ttm_ttm_info_name`/`ttm_ttm_info_class` in `original_source/ttm.c`).

use crate::error::{Result, TtmError};
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::{is_create_mark, is_segment_mark, segment_mark_index, CodePoint, TtmString, MAXARGS};

fn discrim(frame: &Frame, i: usize) -> String {
    TtmString::from_codepoints(frame.arg(i).unwrap_or(&[]).to_vec()).to_string()
}

/// `#<ttm;meta;newmetachars>`: the five-character string replaces, in
/// order, `sharp`, `open`, `semi`, `close`, `escape`.
fn ttm_meta(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let arg = frame.arg(2).unwrap_or(&[]);
    if arg.len() != 5 {
        return Err(TtmError::TtmCmd);
    }
    interp.chars.sharp = arg[0];
    interp.chars.open = arg[1];
    interp.chars.semi = arg[2];
    interp.chars.close = arg[3];
    interp.chars.escape = arg[4];
    Ok(())
}

/// `#<ttm;info;name;...>`: one line per requested name, either
/// `name,minargs,maxargs,S|V` (builtin), `name,0,maxsegmark,V
/// residual=N body=|...|` (user-defined, marks rendered as `^NN`/`^00`),
/// or `name,-,-,-` for a name with no dictionary entry.
fn ttm_info_name(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let mut out = String::new();
    for i in 3..frame.argc() {
        let key = frame.arg(i).unwrap_or(&[]).to_vec();
        let label = TtmString::from_codepoints(key.clone()).to_string();
        match interp.dict.lookup(&key) {
            None => {
                out.push_str(&label);
                out.push_str("-,-,-\n");
            }
            Some(name) => {
                out.push_str(&label);
                if name.is_builtin() {
                    let minargs = name.minargs();
                    out.push_str(&format!(",{minargs},"));
                    let maxargs = match &name.body {
                        crate::dict::NameBody::Builtin { maxargs, .. } => *maxargs,
                        _ => 0,
                    };
                    if maxargs == MAXARGS {
                        out.push('*');
                    } else {
                        out.push_str(&maxargs.to_string());
                    }
                    out.push(',');
                    out.push(if name.novalue() { 'S' } else { 'V' });
                } else {
                    out.push_str(&format!(",0,{},V", name.maxsegmark()));
                    out.push_str(&format!(" residual={} body=|", name.residual()));
                    for &c in name.body_text().unwrap_or(&[]) {
                        if is_create_mark(c) {
                            out.push_str("^00");
                        } else if is_segment_mark(c) {
                            out.push_str(&format!("^{:02}", segment_mark_index(c)));
                        } else if let Some(ch) = char::from_u32(c) {
                            out.push(ch);
                        }
                    }
                    out.push('|');
                }
                out.push('\n');
            }
        }
    }
    super::write_result_str(interp, &out)
}

/// `#<ttm;info;class;...>`: one line per requested class, `name
/// [characters]`, a leading `^` inside the brackets for a negative
/// class, and `[`/`]` escaped with `\` inside the character list.
fn ttm_info_class(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let mut out = String::new();
    for i in 3..frame.argc() {
        let key = frame.arg(i).unwrap_or(&[]).to_vec();
        let class_name = TtmString::from_codepoints(key);
        let class = interp.classes.lookup(&class_name).ok_or(TtmError::NoName)?;
        out.push_str(&class_name.to_string());
        out.push(' ');
        out.push('[');
        if class.negative {
            out.push('^');
        }
        for &c in class.characters.as_slice() {
            if c == '[' as CodePoint || c == ']' as CodePoint {
                out.push('\\');
            }
            if let Some(ch) = char::from_u32(c) {
                out.push(ch);
            }
        }
        out.push('\n');
    }
    super::write_result_str(interp, &out)
}

pub(super) fn ttm(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let d1 = discrim(frame, 1);
    if frame.argc() >= 3 && d1 == "meta" {
        return ttm_meta(interp, frame);
    }
    if frame.argc() >= 4 && d1 == "info" {
        let d2 = discrim(frame, 2);
        return match d2.as_str() {
            "name" => ttm_info_name(interp, frame),
            "class" => ttm_info_class(interp, frame),
            _ => Err(TtmError::TtmCmd),
        };
    }
    Err(TtmError::TtmCmd)
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
    fn info_name_reports_unknown_name() {
        assert_eq!(run("#<ttm;info;name;bogus>").to_string(), "bogus-,-,-\n");
    }

    #[test]
    fn info_class_reports_negative_class() {
        assert_eq!(
            run("#<dncl;vowels;aeiou>#<ttm;info;class;vowels>").to_string(),
            "vowels [^aeiou]\n"
        );
    }
}
