// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builtins: `cd`, `exit`, `jobs`, `fg` (§4.5).
//!
//! A builtin invoked as the sole command of a non-pipelined statement runs
//! directly in the shell process so it can mutate [`Vm`] state. The same
//! name used inside a pipeline still goes through [`crate::job::launch_job`]
//! like any other command — its mutations are then confined to the forked
//! child, exactly as a real shell's `cd | true` would behave.

use nix::unistd::Pid;

use crate::job::{self, RawCommand};
use crate::vm::Vm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
    Jobs,
    Fg,
}

pub fn lookup(name: &str) -> Option<Builtin> {
    match name {
        "cd" => Some(Builtin::Cd),
        "exit" => Some(Builtin::Exit),
        "jobs" => Some(Builtin::Jobs),
        "fg" => Some(Builtin::Fg),
        _ => None,
    }
}

/// Runs `builtin` with `raw.argv[1..]` as its arguments and returns its
/// exit code.
pub fn run(vm: &mut Vm, builtin: Builtin, raw: &RawCommand) -> i32 {
    let args = &raw.argv[1.min(raw.argv.len())..];
    match builtin {
        Builtin::Cd => run_cd(vm, args),
        Builtin::Exit => run_exit(vm, args),
        Builtin::Jobs => run_jobs(vm),
        Builtin::Fg => run_fg(vm, args),
    }
}

fn run_cd(vm: &mut Vm, args: &[String]) -> i32 {
    let swap_to_old = args.first().is_some_and(|a| a == "-");
    let target = if swap_to_old {
        vm.old_pwd.to_string_lossy().into_owned()
    } else {
        match args.first() {
            Some(arg) => arg.clone(),
            None => match vm.home_dir() {
                Some(home) => home,
                None => {
                    eprintln!("cash: cd: HOME not set");
                    return 255;
                }
            },
        }
    };

    match vm.change_dir(std::path::Path::new(&target)) {
        Ok(()) => {
            if swap_to_old {
                println!("{}", vm.pwd.display());
            }
            0
        }
        Err(e) => {
            eprintln!("cash: cd: {target}: {e}");
            255
        }
    }
}

fn run_exit(vm: &mut Vm, args: &[String]) -> i32 {
    let code = match args.first() {
        Some(arg) => match arg.parse::<i32>() {
            Ok(n) => n & 0xFF,
            Err(_) => {
                eprintln!("cash: exit: {arg}: numeric argument required");
                2
            }
        },
        None => vm.last_exit_code,
    };
    vm.request_exit(code);
    code
}

fn run_jobs(vm: &mut Vm) -> i32 {
    job::update_status(vm);
    for j in vm.jobs.iter_newest_first() {
        let state = if job::job_was_terminated(j) {
            "Terminated"
        } else if job::job_is_completed(j) {
            "Completed"
        } else if job::job_is_stopped(j) {
            "Stopped"
        } else {
            "Running"
        };
        println!(
            "[{}] ({})\t{}\t\t{}",
            j.id,
            j.pgid.map(Pid::as_raw).unwrap_or(0),
            state,
            j.command_text
        );
    }
    job::remove_completed_jobs(vm);
    0
}

fn run_fg(vm: &mut Vm, args: &[String]) -> i32 {
    let job_id = match args.first() {
        Some(arg) => match arg.parse::<u32>() {
            Ok(id) => id,
            Err(_) => {
                eprintln!("cash: fg: {arg}: no such job");
                return 1;
            }
        },
        None => match vm.jobs.newest_id() {
            Some(id) => id,
            None => {
                eprintln!("cash: fg: no current job");
                return 1;
            }
        },
    };

    if vm.jobs.get_by_id(job_id).is_none() {
        eprintln!("cash: fg: {job_id}: no such job");
        return 1;
    }

    job::continue_job(vm, job_id, true);
    vm.jobs
        .get_by_id(job_id)
        .and_then(|j| j.processes.last())
        .and_then(|p| p.exit_code)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "builtins_tests.rs"]
mod tests;
