// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::span::Span;

fn word(parts: Vec<WordPart>) -> Word {
    Word {
        parts,
        span: Span::empty(0),
    }
}

fn vm() -> Vm {
    Vm::new_for_test()
}

#[test]
fn sq_is_verbatim() {
    let vm = vm();
    let w = word(vec![WordPart::SQuoted("a\\b$c".into())]);
    assert_eq!(expand_word(&vm, &w), "a\\b$c");
}

#[test]
fn literal_backslash_escapes_any_char() {
    let vm = vm();
    let w = word(vec![WordPart::Literal("a\\ b\\$c".into())]);
    assert_eq!(expand_word(&vm, &w), "a b$c");
}

#[test]
fn literal_trailing_backslash_dropped() {
    let vm = vm();
    let w = word(vec![WordPart::Literal("abc\\".into())]);
    assert_eq!(expand_word(&vm, &w), "abc");
}

#[test]
fn dquoted_only_escapes_special_chars() {
    let vm = vm();
    let w = word(vec![WordPart::DQuoted("a\\nb\\$c\\\"d".into())]);
    assert_eq!(expand_word(&vm, &w), "a\\nb$c\"d");
}

#[test]
fn var_question_and_hash() {
    let mut vm = vm();
    vm.last_exit_code = 7;
    vm.positional = vec!["x".into(), "y".into()];
    assert_eq!(
        expand_word(&vm, &word(vec![WordPart::VarSub("?".into())])),
        "7"
    );
    assert_eq!(
        expand_word(&vm, &word(vec![WordPart::VarSub("#".into())])),
        "2"
    );
}

#[test]
fn var_positional_out_of_range_is_empty() {
    let vm = vm();
    assert_eq!(
        expand_word(&vm, &word(vec![WordPart::VarSub("5".into())])),
        ""
    );
}

#[test]
fn unset_identifier_expands_empty() {
    let vm = vm();
    let name = "CASH_TEST_DEFINITELY_UNSET_VAR";
    std::env::remove_var(name);
    assert_eq!(
        expand_word(&vm, &word(vec![WordPart::VarSub(name.into())])),
        ""
    );
}

#[test]
fn braced_and_cmd_sub_always_empty() {
    let vm = vm();
    let w = word(vec![
        WordPart::BracedSub("x:-default".into()),
        WordPart::CmdSub("echo hi".into()),
    ]);
    assert_eq!(expand_word(&vm, &w), "");
}

#[test]
fn tilde_plus_and_minus_use_pwd_and_oldpwd() {
    let mut vm = vm();
    vm.pwd = "/cwd".into();
    vm.old_pwd = "/old".into();
    assert_eq!(
        expand_word(&vm, &word(vec![WordPart::Literal("~+".into())])),
        "/cwd"
    );
    assert_eq!(
        expand_word(&vm, &word(vec![WordPart::Literal("~-".into())])),
        "/old"
    );
}

#[test]
fn unknown_tilde_user_left_unchanged() {
    let vm = vm();
    let w = word(vec![WordPart::Literal(
        "~definitely-not-a-real-user-xyz/path".into(),
    )]);
    assert_eq!(
        expand_word(&vm, &w),
        "~definitely-not-a-real-user-xyz/path"
    );
}
