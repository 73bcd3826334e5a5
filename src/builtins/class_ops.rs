//! Character class operations: `dcl`, `dncl`, `ecl`, `scl`, `ccl`, `tcl`
//! (`spec.md` §6.2, grounded on `ttm_dcl0`/`ttm_ecl`/`ttm_scl`/`ttm_ccl`/
//! `ttm_tcl` in `original_source/ttm.c`).

use crate::classes::CharClass;
use crate::error::{Result, TtmError};
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::{CodePoint, TtmString};

use super::{user_defined_mut, write_result};

fn dcl0(interp: &mut Interpreter, frame: &Frame, negative: bool) -> Result<()> {
    let name = TtmString::from_codepoints(frame.arg(1).unwrap_or(&[]).to_vec());
    let chars = TtmString::from_codepoints(frame.arg(2).unwrap_or(&[]).to_vec());
    interp.classes.insert(CharClass::new(name, chars, negative));
    Ok(())
}

pub(super) fn dcl(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    dcl0(interp, frame, false)
}

pub(super) fn dncl(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    dcl0(interp, frame, true)
}

pub(super) fn ecl(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    for i in 1..frame.argc() {
        let name = TtmString::from_codepoints(frame.arg(i).unwrap_or(&[]).to_vec());
        interp.classes.remove(&name);
    }
    Ok(())
}

/// Shared scan used by `scl`/`ccl`: the run length, starting at `residual`,
/// of characters in (or, negated, not in) the class.
fn class_run_len(interp: &Interpreter, class_key: &[CodePoint], body: &[CodePoint], residual: usize) -> Result<usize> {
    let class_name = TtmString::from_codepoints(class_key.to_vec());
    let class = interp.classes.lookup(&class_name).ok_or(TtmError::NoName)?;
    let mut len = 0;
    while residual + len < body.len() {
        let c = body[residual + len];
        let in_class = class.matches(c);
        if class.negative {
            if in_class {
                break;
            }
        } else if !in_class {
            break;
        }
        len += 1;
    }
    Ok(len)
}

pub(super) fn scl(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let class_key = frame.arg(1).unwrap_or(&[]).to_vec();
    let str_key = frame.arg(2).unwrap_or(&[]).to_vec();
    let len = {
        let name = interp.dict.lookup(&str_key).ok_or(TtmError::NoName)?;
        if name.is_builtin() {
            return Err(TtmError::NoPrimitive);
        }
        let residual = name.residual();
        let body = name.body_text().unwrap_or(&[]).to_vec();
        class_run_len(interp, &class_key, &body, residual)?
    };
    let name = user_defined_mut(interp, &str_key)?;
    let residual = name.residual();
    name.set_residual(residual + len);
    Ok(())
}

pub(super) fn ccl(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let class_key = frame.arg(1).unwrap_or(&[]).to_vec();
    let str_key = frame.arg(2).unwrap_or(&[]).to_vec();
    let (len, text) = {
        let name = interp.dict.lookup(&str_key).ok_or(TtmError::NoName)?;
        if name.is_builtin() {
            return Err(TtmError::NoPrimitive);
        }
        let residual = name.residual();
        let body = name.body_text().unwrap_or(&[]).to_vec();
        let len = class_run_len(interp, &class_key, &body, residual)?;
        (len, body[residual..residual + len].to_vec())
    };
    if len > 0 {
        let name = user_defined_mut(interp, &str_key)?;
        let residual = name.residual();
        name.set_residual(residual + len);
    }
    write_result(interp, &text)
}

pub(super) fn tcl(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let class_key = frame.arg(1).unwrap_or(&[]).to_vec();
    let str_key = frame.arg(2).unwrap_or(&[]).to_vec();
    let t = frame.arg(3).unwrap_or(&[]).to_vec();
    let f = frame.arg(4).unwrap_or(&[]).to_vec();

    let class_name = TtmString::from_codepoints(class_key);
    let class = interp.classes.lookup(&class_name).ok_or(TtmError::NoName)?.clone();
    let name = interp.dict.lookup(&str_key).ok_or(TtmError::NoName)?;
    if name.is_builtin() {
        return Err(TtmError::NoPrimitive);
    }
    let body = name.body_text().unwrap_or(&[]);
    let residual = name.residual();
    let c = body.get(residual).copied().unwrap_or(0);
    let matches = class.matches(c);
    let result = if matches { t } else { f };
    write_result(interp, &result)
}
