// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_for_test_is_non_interactive_with_empty_jobs() {
    let vm = Vm::new_for_test();
    assert!(!vm.is_interactive);
    assert!(vm.jobs.is_empty());
    assert_eq!(vm.last_exit_code, 0);
}

#[test]
fn change_dir_updates_old_pwd() {
    let mut vm = Vm::new_for_test();
    let original = vm.pwd.clone();
    let tmp = std::env::temp_dir();
    vm.change_dir(&tmp).expect("cd to tempdir");
    assert_eq!(vm.old_pwd, original);
    std::env::set_current_dir(&original).expect("restore cwd");
}

#[test]
fn change_dir_exports_pwd_and_oldpwd() {
    let mut vm = Vm::new_for_test();
    let original = vm.pwd.clone();
    let tmp = std::env::temp_dir();
    vm.change_dir(&tmp).expect("cd to tempdir");
    assert_eq!(std::env::var("PWD").unwrap(), vm.pwd.to_string_lossy());
    assert_eq!(std::env::var("OLDPWD").unwrap(), original.to_string_lossy());
    std::env::set_current_dir(&original).expect("restore cwd");
}

#[test]
fn change_dir_rebuilds_prompt_with_new_pwd() {
    let mut vm = Vm::new_for_test();
    let original = vm.pwd.clone();
    let tmp = std::env::temp_dir();
    vm.change_dir(&tmp).expect("cd to tempdir");
    assert!(vm.prompt.contains(&vm.pwd.display().to_string()));
    std::env::set_current_dir(&original).expect("restore cwd");
}
