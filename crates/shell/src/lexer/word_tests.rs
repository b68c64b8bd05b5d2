// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::lexer::Lexer as TopLexer;

fn lex_one(input: &str) -> Word {
    let mut lexer = TopLexer::new(input);
    match lexer.next_token().kind {
        crate::token::TokenKind::Word(w) => w,
        other => panic!("expected word, got {other:?}"),
    }
}

#[test]
fn mixed_quote_and_literal_parts() {
    let w = lex_one("foo'bar'$baz\"qux\"");
    assert_eq!(
        w.parts,
        vec![
            WordPart::Literal("foo".into()),
            WordPart::SQuoted("bar".into()),
            WordPart::VarSub("baz".into()),
            WordPart::DQuoted("qux".into()),
        ]
    );
}

#[test]
fn dollar_question_and_hash_are_single_char_names() {
    let w = lex_one("$?");
    assert_eq!(w.parts, vec![WordPart::VarSub("?".into())]);
    let w = lex_one("$#");
    assert_eq!(w.parts, vec![WordPart::VarSub("#".into())]);
}

#[test]
fn empty_variable_name_is_valid() {
    let w = lex_one("$ ");
    assert_eq!(w.parts, vec![WordPart::VarSub(String::new())]);
}

#[test]
fn braced_sub_is_reserved_and_captures_raw_content() {
    let w = lex_one("${anything here}");
    assert_eq!(w.parts, vec![WordPart::BracedSub("anything here".into())]);
}

#[test]
fn backslash_escapes_next_byte_in_literal() {
    let w = lex_one(r"foo\ bar");
    assert_eq!(w.parts, vec![WordPart::Literal(r"foo\ bar".into())]);
}

#[test]
fn double_quoted_dollar_splits_into_parts() {
    let w = lex_one("\"a$b c\"");
    assert_eq!(
        w.parts,
        vec![
            WordPart::DQuoted("a".into()),
            WordPart::VarSub("b".into()),
            WordPart::DQuoted(" c".into()),
        ]
    );
}
