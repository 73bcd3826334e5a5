//! End-to-end scenarios run through the full scanner/call pipeline
//! (`spec.md` §8), as opposed to the unit tests living alongside each
//! module.

use rstest::rstest;

use crate::error::TtmError;
use crate::text::TtmString;

fn run(src: &str) -> TtmString {
    let mut interp = crate::test_support::test_interpreter();
    let cps: Vec<u32> = src.chars().map(|c| c as u32).collect();
    interp.buffer.set_length(cps.len()).unwrap();
    interp.buffer.write_slice_at(0, &cps).unwrap();
    crate::scanner::scan(&mut interp).unwrap();
    TtmString::from_codepoints(interp.buffer.output().to_vec())
}

fn try_run(src: &str) -> Result<TtmString, TtmError> {
    let mut interp = crate::test_support::test_interpreter();
    let cps: Vec<u32> = src.chars().map(|c| c as u32).collect();
    interp.buffer.set_length(cps.len()).unwrap();
    interp.buffer.write_slice_at(0, &cps).unwrap();
    crate::scanner::scan(&mut interp)?;
    Ok(TtmString::from_codepoints(interp.buffer.output().to_vec()))
}

#[rstest]
#[case("#<ds;greet;Hello, #<ds;name;world>#<name>!>#<greet>", "Hello, world!")]
#[case("#<ds;inc;<#<ad;1;\\1>>>#<ss;inc;n>#<inc;41>", "42")]
#[case("#<ds;rep;<\\1\\1>>#<ss;rep;x>#<rep;ab>", "abab")]
#[case("#<ad;10;0x10>", "26")]
#[case("#<ds;a;1>#<lf;a>#<es;a>#<a>", "1")]
#[case("#<flip;<hello>>", "olleh")]
#[case("#<flip;<olleh>>", "hello")]
#[case("#<zlc;A,B,C>", "A;B;C")]
#[case("#<zlc;A,(B,C)>", "A;(B,C)")]
#[case("#<gn;2;abcd>", "ab")]
#[case("#<gn;-2;abcd>", "cd")]
#[case("##<ds;a;X>#<a>", "X")]
#[case("#<ds;a;X>#<ap;a;Y>#<a>", "XY")]
fn end_to_end_scenarios(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(run(src).to_string(), expected);
}

#[test]
fn empty_argument_is_empty() {
    assert_eq!(run("#<ds;e;>#<e>").to_string(), "");
}

#[test]
fn exceeding_maxargs_is_fatal() {
    let mut src = String::from("#<ds");
    for i in 0..70 {
        src.push_str(&format!(";{i}"));
    }
    src.push('>');
    assert_eq!(try_run(&src), Err(TtmError::TooManyParams));
}

#[test]
fn literal_nesting_past_the_limit_overflows_the_frame_stack() {
    // Each unquoted nested call has to be resolved before its enclosing
    // call's argument collection can finish, so enough literal nesting
    // grows the frame stack past its configured limit.
    let mut src = String::new();
    for _ in 0..70 {
        src.push_str("#<ad;1;");
    }
    src.push('0');
    for _ in 0..70 {
        src.push('>');
    }
    assert_eq!(try_run(&src), Err(TtmError::StackOverflow));
}

#[test]
fn out_of_range_segment_index_substitutes_empty() {
    // `ss` installs three marks (for X, Y, Z); calling with only two
    // arguments leaves the third mark with nothing to substitute.
    assert_eq!(run("#<ds;f;<XYZ>>#<ss;f;X;Y;Z>#<f;1;2>").to_string(), "12");
}

#[test]
fn cn_with_10_against_3_remaining_chars_returns_all_three() {
    assert_eq!(
        run("#<ds;s;abc>#<cn;10;s>").to_string(),
        "abc"
    );
}

#[test]
fn cn_negative_returns_trailing_characters() {
    assert_eq!(
        run("#<ds;s;abcde>#<cn;-2;s>").to_string(),
        "de"
    );
}

#[test]
fn cr_installs_three_creation_marks_visible_via_info_name() {
    let out = run("#<ds;body;azbzc>#<cr;body;z>#<ttm;info;name;body>").to_string();
    assert_eq!(out.matches("^00").count(), 2);
}

#[test]
fn ad_is_associative_for_in_range_values() {
    assert_eq!(run("#<ad;2;3;4>").to_string(), run("#<ad;2;#<ad;3;4>>").to_string());
}
