//! Dictionary-mutating operations: `ap`, `cf`, `cr`, `ds`, `es`, `sc`, `ss`
//! (`spec.md` §6.1, grounded on `ttm_ap`/`ttm_cf`/`ttm_cr`/`ttm_ds`/`ttm_es`/
//! `ttm_ss0`/`ttm_sc`/`ttm_ss` in `original_source/ttm.c`).

use crate::call::{creation_replace, segment_replace};
use crate::dict::Name;
use crate::error::Result;
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::TtmString;

use super::write_result_str;

pub(super) fn ap(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let target = frame.arg(1).unwrap_or(&[]).to_vec();
    if interp.dict.lookup(&target).is_none() {
        return ds(interp, frame);
    }
    let apstring = frame.arg(2).unwrap_or(&[]).to_vec();
    let name = super::user_defined_mut(interp, &target)?;
    let body = name.body_mut().expect("checked user-defined above");
    let bodylen = body.len();
    body.extend_from_slice(&apstring);
    name.set_residual(bodylen);
    Ok(())
}

/// Clones `oldname`'s entire body (and its `locked`/`trace` flags — the
/// copy is a shallow struct clone in the original, not a body-only copy)
/// onto `newname`, creating it if absent.
pub(super) fn cf(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let newname_key = frame.arg(1).unwrap_or(&[]).to_vec();
    let oldname_key = frame.arg(2).unwrap_or(&[]).to_vec();
    let old = interp.dict.lookup(&oldname_key).ok_or(crate::error::TtmError::NoName)?;
    let body = old.body.clone();
    let locked = old.locked;
    let trace = old.trace;
    let new_name = Name {
        name: TtmString::from_codepoints(newname_key),
        body,
        locked,
        trace,
    };
    interp.dict.insert_or_replace(new_name);
    Ok(())
}

pub(super) fn cr(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let target = frame.arg(1).unwrap_or(&[]).to_vec();
    let crstring = frame.arg(2).unwrap_or(&[]).to_vec();
    let name = super::user_defined_mut(interp, &target)?;
    let residual = name.residual();
    let body = name.body_mut().expect("checked user-defined above");
    creation_replace(body, residual, &crstring);
    Ok(())
}

pub(super) fn ds(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let key = frame.arg(1).unwrap_or(&[]).to_vec();
    let body = frame.arg(2).unwrap_or(&[]).to_vec();
    interp.dict.insert_or_replace(Name::new_user_defined(
        TtmString::from_codepoints(key),
        body,
    ));
    Ok(())
}

pub(super) fn es(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    for i in 1..frame.argc() {
        let key = frame.arg(i).unwrap_or(&[]).to_vec();
        let locked = interp.dict.lookup(&key).map(|n| n.locked).unwrap_or(true);
        if !locked {
            interp.dict.remove(&key);
        }
    }
    Ok(())
}

fn ss0(interp: &mut Interpreter, frame: &Frame) -> Result<usize> {
    let target = frame.arg(1).unwrap_or(&[]).to_vec();
    let args: Vec<Vec<crate::text::CodePoint>> =
        (2..frame.argc()).map(|i| frame.arg(i).unwrap_or(&[]).to_vec()).collect();
    let args_ref: Vec<&[crate::text::CodePoint]> = args.iter().map(|v| v.as_slice()).collect();

    let name = super::user_defined_mut(interp, &target)?;
    let residual = name.residual();
    let mut maxsegmark = name.maxsegmark();
    let body = name.body_mut().expect("checked user-defined above");
    let count = segment_replace(body, residual, &mut maxsegmark, &args_ref)?;
    name.set_maxsegmark(maxsegmark);
    Ok(count)
}

pub(super) fn sc(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let count = ss0(interp, frame)?;
    write_result_str(interp, &count.to_string())
}

pub(super) fn ss(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    ss0(interp, frame)?;
    Ok(())
}
