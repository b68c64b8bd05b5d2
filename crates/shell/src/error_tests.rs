// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn lex_error_diagnostic_includes_prefix() {
    let err = LexError::UnterminatedSingleQuote {
        span: Span::new(5, 6),
    };
    let diag = err.diagnostic("echo 'abc");
    assert!(diag.starts_with("cash:"));
}

#[test]
fn parse_error_wraps_lex_error_span() {
    let lex = LexError::UnterminatedDoubleQuote {
        span: Span::new(2, 3),
    };
    let parse: ParseError = lex.clone().into();
    assert_eq!(parse.span(), lex.span());
}
