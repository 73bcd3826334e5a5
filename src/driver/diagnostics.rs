//! Fatal-error reporting (`spec.md` §7 "diagnostic pipeline"): renders
//! the error code/label, the newest-first call trace `call::exec`
//! accumulated while unwinding, and a context window around the
//! buffer's cursors at the point of failure.

use std::io::Write;

use crate::error::TtmError;
use crate::interp::Interpreter;
use crate::text::TtmString;

const CONTEXT_RADIUS: usize = 40;

/// A window of already-scanned output and not-yet-scanned input around
/// the buffer's cursors, for "where was it when it died" context.
fn context_window(interp: &Interpreter) -> String {
    let passive = interp.buffer.passive();
    let active = interp.buffer.active();
    let end = interp.buffer.end();

    let before_start = passive.saturating_sub(CONTEXT_RADIUS);
    let before = TtmString::from_codepoints(interp.buffer.slice(before_start, passive).to_vec());

    let after_end = (active + CONTEXT_RADIUS).min(end);
    let after = TtmString::from_codepoints(interp.buffer.slice(active, after_end).to_vec());

    format!("...{before}<*>{after}...")
}

/// Prints the full diagnostic for a fatal (non-`exit`) error to `stderr`.
pub fn report(interp: &Interpreter, err: &TtmError) {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "Fatal error: ({}) {}", err.code(), err);
    for frame in &interp.fatal_trace {
        let _ = writeln!(stderr, "  at {frame}");
    }
    let _ = writeln!(stderr, "  context: {}", context_window(interp));
    let _ = stderr.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_window_marks_active_position() {
        let mut interp = crate::test_support::test_interpreter();
        let cps: Vec<u32> = "hello world".chars().map(|c| c as u32).collect();
        interp.buffer.set_length(cps.len()).unwrap();
        interp.buffer.write_slice_at(0, &cps).unwrap();
        interp.buffer.set_passive(5);
        interp.buffer.set_active(5);
        assert_eq!(context_window(&interp), "...hello<*> world...");
    }
}
