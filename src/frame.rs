//! Call frames (`spec.md` §3): up to `MAXARGS` argument pointers, the
//! active/passive call disposition, and a bounded LIFO stack of them.

use crate::error::{Result, TtmError};
use crate::text::{CodePoint, MAXARGS};

/// One collected call's arguments. `argv[i]` is a `(start, end)` range into
/// `arena`, which owns a stable copy of every argument's text — see
/// `SPEC_FULL.md` §3/§9 "Argument arena per frame" for why this departs
/// from the teacher's raw-pointer-into-shared-buffer representation.
#[derive(Default)]
pub struct Frame {
    arena: Vec<CodePoint>,
    argv: Vec<(usize, usize)>,
    /// True for the active call form `#<...>`, false for `##<...>`.
    pub active_disposition: bool,
}

impl Frame {
    pub fn new(active_disposition: bool) -> Self {
        Frame {
            arena: Vec::new(),
            argv: Vec::new(),
            active_disposition,
        }
    }

    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    /// Appends `text` as the next argument, returning its index.
    pub fn push_arg(&mut self, text: &[CodePoint]) -> Result<usize> {
        if self.argv.len() >= MAXARGS {
            return Err(TtmError::TooManyParams);
        }
        let start = self.arena.len();
        self.arena.extend_from_slice(text);
        let end = self.arena.len();
        self.argv.push((start, end));
        Ok(self.argv.len() - 1)
    }

    /// The text of argument `i`, or `None` if there is no such argument
    /// (callers substituting segment marks treat this as empty text).
    pub fn arg(&self, i: usize) -> Option<&[CodePoint]> {
        self.argv.get(i).map(|&(s, e)| &self.arena[s..e])
    }

    /// Argument 0 is always the macro name.
    pub fn name(&self) -> &[CodePoint] {
        self.arg(0).unwrap_or(&[])
    }
}

/// A bounded LIFO stack of frames (`spec.md` §3, §5 "Bounds as safety").
pub struct FrameStack {
    frames: Vec<Frame>,
    limit: usize,
}

impl FrameStack {
    pub fn new(limit: usize) -> Self {
        FrameStack {
            frames: Vec::new(),
            limit,
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, frame: Frame) -> Result<()> {
        if self.frames.len() >= self.limit {
            return Err(TtmError::StackOverflow);
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Frame> {
        self.frames.pop().ok_or(TtmError::StackUnderflow)
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Newest-first iteration for diagnostic stack traces (`spec.md` §7).
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = FrameStack::new(4);
        stack.push(Frame::new(true)).unwrap();
        stack.push(Frame::new(false)).unwrap();
        assert_eq!(stack.depth(), 2);
        let f = stack.pop().unwrap();
        assert!(!f.active_disposition);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn stack_overflow_past_limit() {
        let mut stack = FrameStack::new(2);
        stack.push(Frame::new(true)).unwrap();
        stack.push(Frame::new(true)).unwrap();
        assert_eq!(stack.push(Frame::new(true)), Err(TtmError::StackOverflow));
    }

    #[test]
    fn stack_underflow_when_empty() {
        let mut stack = FrameStack::new(2);
        assert_eq!(stack.pop(), Err(TtmError::StackUnderflow));
    }

    #[test]
    fn frame_arg_missing_index_is_none() {
        let mut f = Frame::new(true);
        f.push_arg(&[97, 98]).unwrap();
        assert!(f.arg(5).is_none());
        assert_eq!(f.arg(0), Some(&[97u32, 98u32][..]));
    }

    #[test]
    fn too_many_params() {
        let mut f = Frame::new(true);
        for _ in 0..MAXARGS {
            f.push_arg(&[1]).unwrap();
        }
        assert_eq!(f.push_arg(&[1]), Err(TtmError::TooManyParams));
    }
}
