// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn raw(name: &str) -> RawCommand {
    RawCommand {
        name: name.to_string(),
        argv: vec![name.to_string()],
        redirs: vec![],
    }
}

#[test]
fn job_list_assigns_ascending_ids() {
    let mut list = JobList::default();
    let job = |text: &str| Job {
        id: 0,
        pgid: None,
        command_text: text.into(),
        background: true,
        notified: false,
        saved_terminal_state: None,
        processes: vec![Process::new(raw("sleep"))],
    };
    let a = list.add(job("a"));
    let b = list.add(job("b"));
    assert_eq!(a, 1);
    assert_eq!(b, 2);
    assert_eq!(list.newest_id(), Some(2));
}

#[test]
fn job_is_stopped_requires_every_process_stopped_or_completed() {
    let mut p1 = Process::new(raw("a"));
    let mut p2 = Process::new(raw("b"));
    p1.stopped = true;
    p2.completed = true;
    let job = Job {
        id: 1,
        pgid: None,
        command_text: "a | b".into(),
        background: false,
        notified: false,
        saved_terminal_state: None,
        processes: vec![p1, p2],
    };
    assert!(job_is_stopped(&job));
    assert!(!job_is_completed(&job));
}

#[test]
fn job_was_terminated_requires_every_process_terminated() {
    let mut p1 = Process::new(raw("a"));
    p1.terminated = true;
    p1.completed = true;
    let p2 = Process::new(raw("b"));
    let job = Job {
        id: 1,
        pgid: None,
        command_text: "a | b".into(),
        background: false,
        notified: false,
        saved_terminal_state: None,
        processes: vec![p1, p2],
    };
    assert!(!job_was_terminated(&job));
}
