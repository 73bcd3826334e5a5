//! Residual-pointer reading operations: `cc`, `cn`, `cp`, `cs`, `isc`,
//! `rrp`, `scn`, `sn`, `eos` (`spec.md` §6.2, grounded on the matching
//! `ttm_*` functions in `original_source/ttm.c`). Each walks a
//! user-defined name's body starting at its stored `residual` offset and
//! advances that offset as it consumes characters.
//!
//! Every function first computes its owned result text in a scoped block
//! (so the mutable borrow of the looked-up `Name` ends there), then writes
//! it to `interp.result` afterward — mirroring the decoupling `call::exec`
//! uses to avoid aliasing `&mut Interpreter` with a borrow into it.

use crate::error::Result;
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::{is_create_mark, is_segment_mark, CodePoint};

use super::arith_ops::to_int64;
use super::{user_defined, user_defined_mut, write_result};

pub(super) fn cc(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let key = frame.arg(1).unwrap_or(&[]).to_vec();
    let text: Vec<CodePoint> = {
        let name = user_defined_mut(interp, &key)?;
        let residual = name.residual();
        let body = name.body_text().unwrap_or(&[]);
        if residual < body.len() {
            let c = body[residual];
            name.set_residual(residual + 1);
            vec![c]
        } else {
            Vec::new()
        }
    };
    write_result(interp, &text)
}

pub(super) fn cn(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let n = to_int64(frame.arg(1).unwrap_or(&[]))?;
    let key = frame.arg(2).unwrap_or(&[]).to_vec();
    let text: Vec<CodePoint> = {
        let name = user_defined_mut(interp, &key)?;
        let residual = name.residual();
        let bodylen = name.body_text().unwrap_or(&[]).len();
        let negative = n < 0;
        let mut count = n.unsigned_abs() as usize;
        let avail = bodylen.saturating_sub(residual);
        if count == 0 || avail == 0 {
            Vec::new()
        } else {
            if count > avail {
                count = avail;
            }
            let start = if negative { bodylen - count } else { residual };
            let out = name.body_text().unwrap_or(&[])[start..start + count].to_vec();
            name.set_residual(residual + count);
            out
        }
    };
    write_result(interp, &text)
}

pub(super) fn cp(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let key = frame.arg(1).unwrap_or(&[]).to_vec();
    let semi = interp.chars.semi;
    let open = interp.chars.open;
    let close = interp.chars.close;
    let text: Vec<CodePoint> = {
        let name = user_defined_mut(interp, &key)?;
        let residual = name.residual();
        let body = name.body_text().unwrap_or(&[]);
        let mut depth = 0i32;
        let mut i = residual;
        while i < body.len() {
            let c = body[i];
            if c == semi {
                if depth == 0 {
                    break;
                }
            } else if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
            }
            i += 1;
        }
        let out = body[residual..i].to_vec();
        let hit_semi = i < body.len();
        name.set_residual(if hit_semi { i + 1 } else { i });
        out
    };
    write_result(interp, &text)
}

pub(super) fn cs(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let key = frame.arg(1).unwrap_or(&[]).to_vec();
    let text: Vec<CodePoint> = {
        let name = user_defined_mut(interp, &key)?;
        let residual = name.residual();
        let body = name.body_text().unwrap_or(&[]);
        let mut i = residual;
        while i < body.len() && !is_segment_mark(body[i]) && !is_create_mark(body[i]) {
            i += 1;
        }
        let out = body[residual..i].to_vec();
        let hit_mark = i < body.len();
        name.set_residual(if hit_mark { i + 1 } else { i });
        out
    };
    write_result(interp, &text)
}

pub(super) fn isc(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let arg = frame.arg(1).unwrap_or(&[]).to_vec();
    let key = frame.arg(2).unwrap_or(&[]).to_vec();
    let t = frame.arg(3).unwrap_or(&[]).to_vec();
    let f = frame.arg(4).unwrap_or(&[]).to_vec();
    let text: Vec<CodePoint> = {
        let name = user_defined_mut(interp, &key)?;
        let residual = name.residual();
        let body = name.body_text().unwrap_or(&[]);
        let matches = body.len() >= residual + arg.len()
            && body[residual..residual + arg.len()] == arg[..];
        if matches {
            let bodylen = body.len();
            let newres = (residual + arg.len()).min(bodylen);
            name.set_residual(newres);
            t
        } else {
            f
        }
    };
    write_result(interp, &text)
}

pub(super) fn rrp(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let key = frame.arg(1).unwrap_or(&[]).to_vec();
    let name = user_defined_mut(interp, &key)?;
    name.set_residual(0);
    Ok(())
}

pub(super) fn scn(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let arg = frame.arg(1).unwrap_or(&[]).to_vec();
    let key = frame.arg(2).unwrap_or(&[]).to_vec();
    let f = frame.arg(3).unwrap_or(&[]).to_vec();
    let text: Vec<CodePoint> = {
        let name = user_defined_mut(interp, &key)?;
        let residual = name.residual();
        let body = name.body_text().unwrap_or(&[]);
        let tail = &body[residual..];
        let found = if arg.is_empty() {
            None
        } else {
            tail.windows(arg.len()).position(|w| w == arg.as_slice())
        };
        match found {
            None => f,
            Some(pos) => {
                let out = tail[..pos].to_vec();
                let bodylen = body.len();
                name.set_residual((residual + pos + arg.len()).min(bodylen));
                out
            }
        }
    };
    write_result(interp, &text)
}

pub(super) fn sn(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let n = to_int64(frame.arg(1).unwrap_or(&[]))?;
    if n < 0 {
        return Err(crate::error::TtmError::Positive);
    }
    let key = frame.arg(2).unwrap_or(&[]).to_vec();
    let name = user_defined_mut(interp, &key)?;
    let residual = name.residual();
    let bodylen = name.body_text().unwrap_or(&[]).len();
    name.set_residual((residual + n as usize).min(bodylen));
    Ok(())
}

pub(super) fn eos(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let key = frame.arg(1).unwrap_or(&[]).to_vec();
    let t = frame.arg(2).unwrap_or(&[]).to_vec();
    let f = frame.arg(3).unwrap_or(&[]).to_vec();
    let name = user_defined(interp, &key)?;
    let bodylen = name.body_text().unwrap_or(&[]).len();
    let result = if name.residual() >= bodylen { t } else { f };
    write_result(interp, &result)
}
