// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::tokenize(input).into_iter().map(|t| t.kind).collect()
}

#[test]
fn simple_word_sequence() {
    let ks = kinds("echo hello");
    assert!(matches!(ks[0], TokenKind::Word(_)));
    assert!(matches!(ks[1], TokenKind::Word(_)));
    assert!(matches!(ks[2], TokenKind::Eof));
}

#[test]
fn operators_and_or_pipe() {
    let ks = kinds("a && b || c | d");
    let op_positions: Vec<&TokenKind> = ks
        .iter()
        .filter(|k| {
            matches!(
                k,
                TokenKind::And | TokenKind::Or | TokenKind::Pipe
            )
        })
        .collect();
    assert_eq!(op_positions.len(), 3);
}

#[test]
fn bare_ampersand_is_background_marker() {
    let ks = kinds("sleep 1 &");
    assert!(matches!(ks[ks.len() - 2], TokenKind::Amp));
}

#[test]
fn redirect_out_err_combo() {
    let ks = kinds("cmd &> file");
    assert!(matches!(
        ks[1],
        TokenKind::Redirect(crate::token::RedirectToken {
            kind: RedirectKind::OutErr,
            ..
        })
    ));
}

#[test]
fn leading_number_attached_to_redirect() {
    let ks = kinds("cmd 2>file");
    match &ks[1] {
        TokenKind::Redirect(r) => {
            assert_eq!(r.left_fd, Some(2));
            assert_eq!(r.kind, RedirectKind::Out);
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn leading_number_not_attached_falls_back_to_word() {
    let ks = kinds("123abc");
    assert!(matches!(ks[0], TokenKind::Word(_)));
}

#[test]
fn bare_number_token_when_digits_end_at_boundary() {
    let ks = kinds("fg 1");
    assert!(matches!(ks[1], TokenKind::Number(_)));
}

#[test]
fn not_token_for_bang() {
    let ks = kinds("! true");
    assert!(matches!(ks[0], TokenKind::Not));
}

#[test]
fn unterminated_single_quote_is_error() {
    let ks = kinds("echo 'abc");
    assert!(matches!(ks.last().unwrap(), TokenKind::Error(_)));
}

#[test]
fn newline_run_collapses_to_one_line_break() {
    let ks = kinds("a\n\n\nb");
    let breaks = ks
        .iter()
        .filter(|k| matches!(k, TokenKind::LineBreak))
        .count();
    assert_eq!(breaks, 1);
}
