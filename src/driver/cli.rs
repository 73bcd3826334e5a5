//! Command-line surface (`spec.md` §6.5), modeled as a `clap::Parser` the
//! way the teacher models its own `Args` in `src/tools/tools.rs`.

use std::path::PathBuf;

use clap::Parser;

/// A TTM macro-expansion interpreter.
#[derive(Clone, Debug, Parser)]
#[command(name = "ttm", version)]
pub struct Cli {
    /// Set a resource limit: `b=<size>` buffer, `s=<size>` stack,
    /// `x=<count>` execution count. Sizes accept a `K`/`M` suffix.
    /// Repeatable; first value for each tag wins.
    #[arg(short = 'X', value_name = "tag=value")]
    pub limits: Vec<String>,

    /// Debug toggles, passed through to the tracing `EnvFilter`.
    #[arg(short = 'd', value_name = "flags")]
    pub debug: Option<String>,

    /// Define a name before execution, equivalent to `-e '##<ds;name;value>'`.
    #[arg(short = 'D', value_name = "name=value")]
    pub defines: Vec<String>,

    /// Execute a program snippet. Repeatable, applied in order.
    #[arg(short = 'e', value_name = "program")]
    pub execute: Vec<String>,

    /// Main program file.
    #[arg(short = 'f', value_name = "file")]
    pub file: Option<PathBuf>,

    /// Add an include root. Repeatable.
    #[arg(short = 'I', value_name = "dir")]
    pub include: Vec<PathBuf>,

    /// Run interactively, reading balanced input from stdin.
    #[arg(short = 'i')]
    pub interactive: bool,

    /// Redirect output to a file instead of stdout.
    #[arg(short = 'o', value_name = "file")]
    pub output: Option<PathBuf>,

    /// Data source for `#<rs>`, instead of stdin.
    #[arg(short = 'r', value_name = "file")]
    pub rs_file: Option<PathBuf>,

    /// Remaining positional arguments, retrievable via `#<argv;n>`.
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

/// One `-X` tag, parsed out of `tag=value` (`original_source/ttm.c`'s
/// inline `switch` inside its `getopt` loop).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitTag {
    Buffer,
    Stack,
    ExecCount,
}

/// Parses a `K`/`M`-suffixed size, as `tagvalue()` does in the original.
pub fn parse_size(s: &str) -> Option<usize> {
    let s = s.trim();
    if let Some(n) = s.strip_suffix(['K', 'k']) {
        return n.parse::<usize>().ok().map(|v| v * 1024);
    }
    if let Some(n) = s.strip_suffix(['M', 'm']) {
        return n.parse::<usize>().ok().map(|v| v * 1024 * 1024);
    }
    s.parse::<usize>().ok()
}

/// Splits one `-X` argument into its tag and numeric value.
pub fn parse_limit(arg: &str) -> Option<(LimitTag, usize)> {
    let (tag, rest) = arg.split_at_checked(1)?;
    let rest = rest.strip_prefix('=')?;
    let value = parse_size(rest)?;
    let tag = match tag {
        "b" => LimitTag::Buffer,
        "s" => LimitTag::Stack,
        "x" => LimitTag::ExecCount,
        _ => return None,
    };
    Some((tag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_accepts_suffixes() {
        assert_eq!(parse_size("4096"), Some(4096));
        assert_eq!(parse_size("4K"), Some(4096));
        assert_eq!(parse_size("2M"), Some(2 * 1024 * 1024));
    }

    #[test]
    fn parse_limit_splits_tag_and_value() {
        assert_eq!(parse_limit("b=8K"), Some((LimitTag::Buffer, 8192)));
        assert_eq!(parse_limit("x=100"), Some((LimitTag::ExecCount, 100)));
        assert_eq!(parse_limit("q=1"), None);
    }
}
