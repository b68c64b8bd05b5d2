// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn lookup_recognises_all_four_builtins() {
    assert_eq!(lookup("cd"), Some(Builtin::Cd));
    assert_eq!(lookup("exit"), Some(Builtin::Exit));
    assert_eq!(lookup("jobs"), Some(Builtin::Jobs));
    assert_eq!(lookup("fg"), Some(Builtin::Fg));
    assert_eq!(lookup("echo"), None);
}

#[test]
fn exit_with_non_numeric_arg_reports_error_code_two() {
    let mut vm = Vm::new_for_test();
    let code = run_exit(&mut vm, &["nope".to_string()]);
    assert_eq!(code, 2);
    assert!(vm.exit_requested);
}

#[test]
fn exit_with_no_arg_reuses_last_exit_code() {
    let mut vm = Vm::new_for_test();
    vm.last_exit_code = 9;
    let code = run_exit(&mut vm, &[]);
    assert_eq!(code, 9);
}

#[test]
fn fg_with_no_jobs_reports_error() {
    let mut vm = Vm::new_for_test();
    let code = run_fg(&mut vm, &[]);
    assert_eq!(code, 1);
}

#[test]
fn cd_dash_swaps_to_old_pwd() {
    let mut vm = Vm::new_for_test();
    let original = vm.pwd.clone();
    let tmp = std::env::temp_dir();
    let code = run_cd(&mut vm, &[tmp.to_string_lossy().into_owned()]);
    assert_eq!(code, 0);
    assert_eq!(vm.old_pwd, original);

    let code = run_cd(&mut vm, &["-".to_string()]);
    assert_eq!(code, 0);
    assert_eq!(vm.pwd, original);
    std::env::set_current_dir(&original).expect("restore cwd");
}

#[test]
fn cd_to_missing_dir_returns_255() {
    let mut vm = Vm::new_for_test();
    let code = run_cd(&mut vm, &["/definitely/not/a/real/path/xyz".to_string()]);
    assert_eq!(code, 255);
}
