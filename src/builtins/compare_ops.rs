//! Numeric (`eq`/`gt`/`lt`) and logical (`eq?`/`gt?`/`lt?`) comparisons
//! (`spec.md` §6.3, grounded on `ttm_eq`/`ttm_gt`/`ttm_lt`/`ttm_eql`/
//! `ttm_gtl`/`ttm_ltl` in `original_source/ttm.c`).

use crate::error::Result;
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::TtmString;

use super::write_result;
use super::arith_ops::to_int64;

fn numeric_cmp(
    interp: &mut Interpreter,
    frame: &Frame,
    cmp: fn(i64, i64) -> bool,
) -> Result<()> {
    let lhs = to_int64(frame.arg(1).unwrap_or(&[]))?;
    let rhs = to_int64(frame.arg(2).unwrap_or(&[]))?;
    let result = if cmp(lhs, rhs) { frame.arg(3) } else { frame.arg(4) };
    write_result(interp, result.unwrap_or(&[]))
}

fn logical_cmp(
    interp: &mut Interpreter,
    frame: &Frame,
    cmp: fn(std::cmp::Ordering) -> bool,
) -> Result<()> {
    let lhs = TtmString::from_codepoints(frame.arg(1).unwrap_or(&[]).to_vec());
    let rhs = TtmString::from_codepoints(frame.arg(2).unwrap_or(&[]).to_vec());
    let ordering = lhs.ordinal_cmp(&rhs);
    let result = if cmp(ordering) { frame.arg(3) } else { frame.arg(4) };
    write_result(interp, result.unwrap_or(&[]))
}

pub(super) fn eq(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    numeric_cmp(interp, frame, |a, b| a == b)
}

pub(super) fn gt(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    numeric_cmp(interp, frame, |a, b| a > b)
}

pub(super) fn lt(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    numeric_cmp(interp, frame, |a, b| a < b)
}

pub(super) fn eql(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    logical_cmp(interp, frame, |o| o == std::cmp::Ordering::Equal)
}

pub(super) fn gtl(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    logical_cmp(interp, frame, |o| o == std::cmp::Ordering::Greater)
}

pub(super) fn ltl(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    logical_cmp(interp, frame, |o| o == std::cmp::Ordering::Less)
}
