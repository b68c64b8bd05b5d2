// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(2, 5);
    let b = Span::new(10, 12);
    assert_eq!(a.merge(b), Span::new(2, 12));
}

#[test]
fn slice_extracts_text() {
    let src = "echo hello";
    assert_eq!(Span::new(5, 10).slice(src), "hello");
}

#[test]
fn locate_span_reports_line_and_column() {
    let src = "echo a\necho b\n";
    let (line, col, content) = locate_span(src, Span::new(7, 11));
    assert_eq!(line, 2);
    assert_eq!(col, 0);
    assert_eq!(content, "echo b");
}
