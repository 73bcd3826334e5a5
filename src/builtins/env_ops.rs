//! Library/environment operations: `argv`, `classes`, `ctime`, `exit`,
//! `include`, `lf`, `names`, `ndf`, `norm`, `tf`, `time`, `tn`, `uf`,
//! `xtime` (`spec.md` §6.5/§6.6, grounded on the matching `ttm_*`
//! functions in `original_source/ttm.c`).

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, TtmError};
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::{CodePoint, TtmString};

use super::arith_ops::to_int64;
use super::{write_result, write_result_str};

pub(super) fn names(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let allnames = frame.argc() > 1;
    let all = interp.dict.sorted_names();
    let filtered: Vec<TtmString> = if allnames {
        all
    } else {
        all.into_iter()
            .filter(|n| {
                interp
                    .dict
                    .lookup(n.as_slice())
                    .map(|name| !name.is_builtin())
                    .unwrap_or(false)
            })
            .collect()
    };
    let joined = filtered
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",");
    write_result_str(interp, &joined)
}

pub(super) fn exit(_interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let mut code = 0i64;
    if frame.argc() > 1 {
        code = match to_int64(frame.arg(1).unwrap_or(&[])) {
            Ok(v) => v.abs(),
            Err(_) => 1,
        };
    }
    Err(TtmError::Exit(code as i32))
}

pub(super) fn ndf(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let key = frame.arg(1).unwrap_or(&[]).to_vec();
    let t = frame.arg(2).unwrap_or(&[]);
    let f = frame.arg(3).unwrap_or(&[]);
    let result = if interp.dict.lookup(&key).is_some() { t } else { f };
    write_result(interp, result)
}

pub(super) fn norm(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let len = frame.arg(1).unwrap_or(&[]).len();
    write_result_str(interp, &len.to_string())
}

pub(super) fn time(interp: &mut Interpreter, _frame: &Frame) -> Result<()> {
    let dur = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TtmError::Time)?;
    let hundredths = dur.as_secs() as i64 * 100 + (dur.subsec_millis() / 10) as i64;
    write_result_str(interp, &hundredths.to_string())
}

pub(super) fn xtime(interp: &mut Interpreter, _frame: &Frame) -> Result<()> {
    let elapsed = interp.start_time.elapsed();
    let hundredths = elapsed.as_secs() as i64 * 100 + (elapsed.subsec_millis() / 10) as i64;
    write_result_str(interp, &hundredths.to_string())
}

/// Renders a `##<time>`-style hundredths-of-a-second value as a calendar
/// date, without pulling in a date/time crate the rest of the stack
/// doesn't otherwise need. Uses the days-since-epoch civil calendar
/// algorithm (Howard Hinnant's `civil_from_days`) rather than `ctime(3)`,
/// so output is UTC, not localtime.
pub(super) fn ctime(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let tod = to_int64(frame.arg(1).unwrap_or(&[]))?;
    let secs = tod / 100;
    let days = secs.div_euclid(86400);
    let secs_of_day = secs.rem_euclid(86400);
    let (y, m, d) = civil_from_days(days);
    let hh = secs_of_day / 3600;
    let mm = (secs_of_day % 3600) / 60;
    let ss = secs_of_day % 60;
    let weekday = weekday_name(days);
    let month = MONTH_NAMES[(m - 1) as usize];
    let rendered = format!("{weekday} {month} {d:2} {hh:02}:{mm:02}:{ss:02} {y}");
    write_result_str(interp, &rendered)
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAY_NAMES: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];

fn weekday_name(days_since_epoch: i64) -> &'static str {
    let idx = days_since_epoch.rem_euclid(7) as usize;
    WEEKDAY_NAMES[idx]
}

/// `civil_from_days`: converts a day count since 1970-01-01 to `(year,
/// month, day)`, valid over the full range `chrono`/`libc` support.
fn civil_from_days(z: i64) -> (i64, i64, i64) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as i64;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as i64;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

pub(super) fn tf(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    if frame.argc() > 1 {
        for i in 1..frame.argc() {
            let key = frame.arg(i).unwrap_or(&[]).to_vec();
            let name = interp.dict.lookup_mut(&key).ok_or(TtmError::NoName)?;
            name.trace = false;
        }
    } else {
        interp.trace_all = false;
        for name in interp.dict.sorted_names() {
            if let Some(n) = interp.dict.lookup_mut(name.as_slice()) {
                n.trace = false;
            }
        }
    }
    Ok(())
}

pub(super) fn tn(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    if frame.argc() > 1 {
        for i in 1..frame.argc() {
            let key = frame.arg(i).unwrap_or(&[]).to_vec();
            let name = interp.dict.lookup_mut(&key).ok_or(TtmError::NoName)?;
            name.trace = true;
        }
    } else {
        interp.trace_all = true;
    }
    Ok(())
}

pub(super) fn argv(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let idx = to_int64(frame.arg(1).unwrap_or(&[]))?;
    if idx < 0 || idx as usize >= interp.argv_strings.len() {
        return Err(TtmError::Range);
    }
    let s = interp.argv_strings[idx as usize].clone();
    write_result_str(interp, &s)
}

pub(super) fn classes(interp: &mut Interpreter, _frame: &Frame) -> Result<()> {
    let joined = interp
        .classes
        .sorted_names()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",");
    write_result_str(interp, &joined)
}

pub(super) fn lf(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    for i in 1..frame.argc() {
        let key = frame.arg(i).unwrap_or(&[]).to_vec();
        let name = interp.dict.lookup_mut(&key).ok_or(TtmError::NoName)?;
        name.locked = true;
    }
    Ok(())
}

pub(super) fn uf(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    for i in 1..frame.argc() {
        let key = frame.arg(i).unwrap_or(&[]).to_vec();
        let name = interp.dict.lookup_mut(&key).ok_or(TtmError::NoName)?;
        name.locked = false;
    }
    Ok(())
}

/// Reads a file's text, resolved against each configured include root in
/// turn, stripping a leading path separator from the requested suffix
/// (`original_source/ttm.c`'s `ttm_include`: "the file name must only be
/// accessible through one of the include paths").
pub(super) fn include(interp: &mut Interpreter, frame: &Frame) -> Result<()> {
    let suffix_cps = frame.arg(1).unwrap_or(&[]);
    if suffix_cps.is_empty() {
        return Err(TtmError::Include);
    }
    let suffix: String = {
        let start = if matches!(suffix_cps[0] as u32, 47 | 92) { 1 } else { 0 };
        TtmString::from_codepoints(suffix_cps[start..].to_vec()).to_string()
    };
    for root in &interp.include_roots {
        let candidate = root.join(&suffix);
        if let Ok(contents) = std::fs::read_to_string(&candidate) {
            let cps: Vec<CodePoint> = contents.chars().map(|c| c as CodePoint).collect();
            return write_result(interp, &cps);
        }
    }
    Err(TtmError::Include)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_from_days_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn weekday_name_epoch_is_thursday() {
        assert_eq!(weekday_name(0), "Thu");
    }
}
