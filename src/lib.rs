#![forbid(unsafe_code)]
//! A TTM interpreter: scan, recognize calls, parse arguments, retrieve a
//! named body, substitute, and re-insert into the buffer for rescanning.
//! See `SPEC_FULL.md` for the expanded design this crate implements.

pub mod buffer;
pub mod builtins;
pub mod call;
pub mod classes;
pub mod dict;
pub mod driver;
pub mod error;
pub mod frame;
pub mod interp;
pub mod scanner;
pub mod text;

#[cfg(test)]
mod test;
#[cfg(test)]
pub(crate) mod test_support;
