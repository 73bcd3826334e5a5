//! Name scanning / string-shape operations that read an argument directly
//! rather than a named body's residual: `gn`, `zlc`, `zlcp`, `flip`
//! (`spec.md` §6.2, grounded on `ttm_gn`/`ttm_zlc`/`ttm_zlcp`/`ttm_flip` in
//! `original_source/ttm.c`).

use crate::error::Result;
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::CodePoint;

use super::arith_ops::to_int64;
use super::write_result;

pub(super) fn gn(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let num = to_int64(frame.arg(1).unwrap_or(&[]))?;
    let s = frame.arg(2).unwrap_or(&[]);
    let slen = s.len() as i64;
    let (start, count) = if num > 0 {
        (0usize, num.min(slen) as usize)
    } else if num < 0 {
        let n = (-num).min(slen);
        ((slen - n) as usize, n as usize)
    } else {
        (0, 0)
    };
    write_result(interp, &s[start..start + count])
}

/// Rewrites zero-level (outside any `(...)`) commas to `;`, leaving
/// escaped characters untouched.
pub(super) fn zlc(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let s = frame.arg(1).unwrap_or(&[]).to_vec();
    let escape = interp.chars.escape;
    let semi = interp.chars.semi;
    let mut out = Vec::with_capacity(s.len());
    let mut depth = 0i32;
    let mut i = 0usize;
    while i < s.len() {
        let c = s[i];
        if c == escape {
            out.push(c);
            if i + 1 < s.len() {
                out.push(s[i + 1]);
            }
            i += 2;
            continue;
        } else if c == ',' as CodePoint && depth == 0 {
            out.push(semi);
        } else if c == '(' as CodePoint {
            depth += 1;
            out.push(c);
        } else if c == ')' as CodePoint {
            depth -= 1;
            out.push(c);
        } else {
            out.push(c);
        }
        i += 1;
    }
    write_result(interp, &out)
}

/// Zero-level commas AND parentheses: `A(B)` and `A,B` both become `A;B`,
/// and `(A),(B),C` becomes `A;B;C`. The exact rewriting below is ported
/// literally from `ttm_zlcp`, whose own comment calls the algorithm's
/// precise boundary handling "unknown" even to its author — reproduced
/// as-is rather than "fixed" (`spec.md` §9).
pub(super) fn zlcp(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let s = frame.arg(1).unwrap_or(&[]).to_vec();
    let escape = interp.chars.escape;
    let semi = interp.chars.semi;
    let mut out = Vec::with_capacity(s.len());
    let mut depth = 0i32;
    let mut p = 0usize;
    while p < s.len() {
        let c = s[p];
        let next = s.get(p + 1).copied();
        if c == escape {
            out.push(c);
            p += 1;
            if let Some(n) = s.get(p).copied() {
                out.push(n);
            }
            p += 1;
            continue;
        } else if depth == 0 && c == ',' as CodePoint {
            if next != Some('(' as CodePoint) {
                out.push(semi);
            }
        } else if c == '(' as CodePoint {
            if depth == 0 && p > 0 {
                out.push(semi);
            }
            if depth > 0 {
                out.push(c);
            }
            depth += 1;
        } else if c == ')' as CodePoint {
            depth -= 1;
            if depth == 0 && next == Some(',' as CodePoint) {
                // nothing
            } else if depth == 0 && next.is_none() {
                // nothing
            } else if depth == 0 {
                out.push(semi);
            } else {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        p += 1;
    }
    write_result(interp, &out)
}

pub(super) fn flip(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let mut s = frame.arg(1).unwrap_or(&[]).to_vec();
    s.reverse();
    write_result(interp, &s)
}
