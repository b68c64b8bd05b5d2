// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job / process manager (C6, §4.6).
//!
//! Drives `fork`/`pipe`/`dup2`/`waitpid`/`tcsetpgrp`/`setpgid` into the
//! launch, wait, and notification protocol a job-control shell needs. The
//! shell is single-threaded; every suspension point here is a blocking
//! kernel call, never a cooperative yield (§5).

use std::os::fd::{IntoRawFd, RawFd};
use std::process;

use nix::sys::signal::{kill, signal, SigHandler, Signal};
use nix::sys::termios::{tcgetattr, tcsetattr, SetArg, Termios};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{close, dup2, execve, fork, getpid, pipe, setpgid, tcsetpgrp, ForkResult, Pid};

use crate::ast::{RedirectKind, Redirection};
use crate::vm::Vm;

const STDIN_FD: RawFd = 0;
const STDOUT_FD: RawFd = 1;
const STDERR_FD: RawFd = 2;

/// A fully expanded redirection, ready to be realised in the child before
/// `execve` (§4.5's "redirection realisation").
#[derive(Debug, Clone)]
pub struct RawRedirection {
    pub kind: RedirectKind,
    pub left_fd: u32,
    pub right_fd: Option<u32>,
    pub filename: Option<String>,
}

impl RawRedirection {
    pub fn from_ast(redir: &Redirection, filename: Option<String>) -> Self {
        Self {
            kind: redir.kind,
            left_fd: redir.resolved_left_fd(),
            right_fd: redir.right_fd,
            filename,
        }
    }
}

/// `{name, argv, redirs}` in fully expanded byte form — no `Word`s survive
/// past materialisation (§4.5).
#[derive(Debug, Clone)]
pub struct RawCommand {
    pub name: String,
    pub argv: Vec<String>,
    pub redirs: Vec<RawRedirection>,
}

/// `{pid, status, completed, stopped, terminated, raw_command}`.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Option<Pid>,
    pub completed: bool,
    pub stopped: bool,
    pub terminated: bool,
    pub exit_code: Option<i32>,
    pub raw_command: RawCommand,
}

impl Process {
    pub fn new(raw_command: RawCommand) -> Self {
        Self {
            pid: None,
            completed: false,
            stopped: false,
            terminated: false,
            exit_code: None,
            raw_command,
        }
    }
}

/// `{id, pgid, command_text, background, notified, saved_terminal_state,
/// processes}`. The job list is a LIFO keyed by insertion order; a plain
/// growable array preserves "newest" semantics just as well as an intrusive
/// linked list would (§9).
#[derive(Debug, Clone)]
pub struct Job {
    pub id: u32,
    pub pgid: Option<Pid>,
    pub command_text: String,
    pub background: bool,
    pub notified: bool,
    pub saved_terminal_state: Option<Termios>,
    pub processes: Vec<Process>,
}

pub fn job_is_stopped(job: &Job) -> bool {
    job.processes.iter().all(|p| p.completed || p.stopped)
}

pub fn job_is_completed(job: &Job) -> bool {
    job.processes.iter().all(|p| p.completed)
}

pub fn job_was_terminated(job: &Job) -> bool {
    !job.processes.is_empty() && job.processes.iter().all(|p| p.terminated)
}

#[derive(Debug, Default)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    /// Inserts `job`, assigning it `id = max(existing ids) + 1` (starting at
    /// 1), and returns that id.
    pub fn add(&mut self, mut job: Job) -> u32 {
        let id = self.jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1;
        job.id = id;
        self.jobs.push(job);
        id
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn get_by_id_mut(&mut self, id: u32) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.id == id)
    }

    /// Newest-first iteration, matching the original's head-insert LIFO.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().rev()
    }

    pub fn newest_id(&self) -> Option<u32> {
        self.jobs.last().map(|j| j.id)
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn notify_if_background(vm: &Vm, job: &Job, state: &str) {
    if job.background && vm.is_interactive {
        eprintln!(
            "[{}] ({})\t{}\t\t{}",
            job.id,
            job.pgid.map(Pid::as_raw).unwrap_or(0),
            state,
            job.command_text
        );
    }
}

/// Launches a job of one or more pipeline stages. Returns the exit code of
/// the job's final (rightmost) process once it is known — i.e. after
/// waiting for a foreground job, or immediately (as `previous_exit_code`,
/// unchanged) for a background one.
pub fn launch_job(
    vm: &mut Vm,
    commands: Vec<RawCommand>,
    background: bool,
    command_text: String,
) -> i32 {
    let n = commands.len();
    let processes: Vec<Process> = commands.iter().cloned().map(Process::new).collect();

    let job = Job {
        id: 0,
        pgid: None,
        command_text,
        background,
        notified: false,
        saved_terminal_state: None,
        processes,
    };
    let job_id = vm.jobs.add(job);

    let mut in_fd: RawFd = STDIN_FD;
    let mut pgid: Option<Pid> = None;
    let foreground = !background;

    for (i, raw) in commands.iter().enumerate() {
        let is_last = i == n - 1;
        let (out_fd, next_in_fd) = if is_last {
            (STDOUT_FD, None)
        } else {
            match pipe() {
                Ok((r, w)) => (w.into_raw_fd(), Some(r.into_raw_fd())),
                Err(e) => {
                    eprintln!("cash: pipe: could not create pipe for job: {e}");
                    process::exit(1);
                }
            }
        };

        let child_pgid = pgid;

        // SAFETY: the shell is single-threaded and the child immediately
        // replaces its image via execve or calls process::exit; no Rust
        // destructors or allocator state are shared across the fork other
        // than what launch_process explicitly touches.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                launch_process(vm, raw, child_pgid, in_fd, out_fd, STDERR_FD, foreground);
            }
            Ok(ForkResult::Parent { child }) => {
                if pgid.is_none() {
                    pgid = Some(child);
                }
                let _ = setpgid(child, pgid.unwrap_or(child));
                if let Some(job) = vm.jobs.get_by_id_mut(job_id) {
                    job.pgid = pgid;
                    job.processes[i].pid = Some(child);
                }
            }
            Err(e) => {
                eprintln!("cash: fork: could not fork process for job: {e}");
                process::exit(1);
            }
        }

        if in_fd != STDIN_FD {
            let _ = close(in_fd);
        }
        if out_fd != STDOUT_FD {
            let _ = close(out_fd);
        }
        if let Some(next) = next_in_fd {
            in_fd = next;
        }
    }

    if vm.is_interactive {
        if let Some(job) = vm.jobs.get_by_id(job_id) {
            if job.background {
                notify_if_background(vm, job, "launched");
            }
        }
    }

    if !vm.is_interactive {
        if background {
            eprintln!("cash: trying to run job {job_id} in background in non-interactive mode");
        }
        wait_for_job(vm, job_id);
    } else if foreground {
        put_job_in_foreground(vm, job_id, false);
    } else {
        put_job_in_background(vm, job_id, false);
    }

    job_exit_code(vm, job_id)
}

fn job_exit_code(vm: &Vm, job_id: u32) -> i32 {
    vm.jobs
        .get_by_id(job_id)
        .and_then(|j| j.processes.last())
        .and_then(|p| p.exit_code)
        .unwrap_or(0)
}

/// Runs in the child after `fork`. Never returns.
fn launch_process(
    vm: &mut Vm,
    raw: &RawCommand,
    pgid: Option<Pid>,
    in_fd: RawFd,
    out_fd: RawFd,
    err_fd: RawFd,
    foreground: bool,
) -> ! {
    let builtin = crate::builtins::lookup(&raw.name);

    if vm.is_interactive && builtin.is_none() {
        let pid = getpid();
        let pgid = pgid.unwrap_or(pid);
        let _ = setpgid(pid, pgid);
        if foreground {
            let _ = tcsetpgrp(STDIN_FD, pgid);
        }
        reset_job_control_signals();
    }

    if in_fd != STDIN_FD {
        let _ = dup2(in_fd, STDIN_FD);
        let _ = close(in_fd);
    }
    if out_fd != STDOUT_FD {
        let _ = dup2(out_fd, STDOUT_FD);
        let _ = close(out_fd);
    }
    if err_fd != STDERR_FD {
        let _ = dup2(err_fd, STDERR_FD);
        let _ = close(err_fd);
    }

    if let Err(e) = apply_redirections(&raw.redirs) {
        eprintln!("cash: {e}");
        process::exit(1);
    }

    if let Some(builtin) = builtin {
        let code = crate::builtins::run(vm, builtin, raw);
        process::exit(code);
    }

    let err = crate::exec::exec_replace(raw);
    eprintln!("cash: execve: could not execute {}: {err}", raw.name);
    process::exit(1);
}

/// Resets job-control signals to their default disposition, as every
/// non-builtin child must before `execve` (§4.6).
fn reset_job_control_signals() {
    // SAFETY: installs the default disposition for each signal; no handler
    // closures are registered, so there is nothing unsound to uphold here.
    unsafe {
        let _ = signal(Signal::SIGINT, SigHandler::SigDfl);
        let _ = signal(Signal::SIGQUIT, SigHandler::SigDfl);
        let _ = signal(Signal::SIGTTIN, SigHandler::SigDfl);
        let _ = signal(Signal::SIGTTOU, SigHandler::SigDfl);
        let _ = signal(Signal::SIGTSTP, SigHandler::SigDfl);
        let _ = signal(Signal::SIGCHLD, SigHandler::SigDfl);
    }
}

fn apply_redirections(redirs: &[RawRedirection]) -> Result<(), std::io::Error> {
    use nix::fcntl::{open, OFlag};
    use nix::sys::stat::Mode;

    for redir in redirs {
        let left = redir.left_fd as RawFd;

        let source_fd = match (&redir.filename, redir.right_fd) {
            (Some(path), _) => {
                let flags = match redir.kind {
                    RedirectKind::In => OFlag::O_RDONLY,
                    RedirectKind::Out | RedirectKind::OutErr => {
                        OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC
                    }
                    RedirectKind::AppendOut | RedirectKind::AppendOutErr => {
                        OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND
                    }
                    RedirectKind::InOut => OFlag::O_RDWR | OFlag::O_CREAT,
                    RedirectKind::DupOut => OFlag::O_WRONLY,
                };
                let mode = Mode::from_bits_truncate(0o644);
                open(path.as_str(), flags, mode)
                    .map_err(|e| std::io::Error::from_raw_os_error(e as i32))?
            }
            (None, Some(right)) => right as RawFd,
            (None, None) => {
                return Err(std::io::Error::other(format!(
                    "redirection with no target for fd {left}"
                )))
            }
        };

        dup2(source_fd, left).map_err(|e| std::io::Error::from_raw_os_error(e as i32))?;
        if redir.filename.is_some() {
            let _ = close(source_fd);
        }

        if matches!(redir.kind, RedirectKind::OutErr | RedirectKind::AppendOutErr) {
            dup2(STDOUT_FD, STDERR_FD).map_err(|e| std::io::Error::from_raw_os_error(e as i32))?;
        }
    }
    Ok(())
}

/// `waitpid(-1, WUNTRACED)` until the job is stopped or completed (§4.6).
pub fn wait_for_job(vm: &mut Vm, job_id: u32) {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => mark_process_status(vm, status),
            Err(_) => break,
        }
        match vm.jobs.get_by_id(job_id) {
            Some(job) if job_is_stopped(job) || job_is_completed(job) => break,
            Some(_) => continue,
            None => break,
        }
    }
}

/// Non-blocking reap loop used for background-job bookkeeping (§4.6).
pub fn update_status(vm: &mut Vm) {
    loop {
        match waitpid(
            Pid::from_raw(-1),
            Some(WaitPidFlag::WUNTRACED | WaitPidFlag::WNOHANG),
        ) {
            Ok(WaitStatus::StillAlive) | Err(_) => break,
            Ok(status) => mark_process_status(vm, status),
        }
    }
}

fn mark_process_status(vm: &mut Vm, status: WaitStatus) {
    let pid = match status.pid() {
        Some(p) => p,
        None => return,
    };

    for job in vm.jobs.jobs.iter_mut() {
        for proc in job.processes.iter_mut() {
            if proc.pid != Some(pid) {
                continue;
            }
            match status {
                WaitStatus::Stopped(_, _) => proc.stopped = true,
                WaitStatus::Continued(_) => proc.stopped = false,
                WaitStatus::Signaled(_, sig, _) => {
                    proc.completed = true;
                    proc.terminated = true;
                    proc.exit_code = Some(128 + sig as i32);
                    eprintln!("Process {pid} terminated by signal {}", sig as i32);
                }
                WaitStatus::Exited(_, code) => {
                    proc.completed = true;
                    proc.exit_code = Some(code & 0xFF);
                }
                _ => {}
            }
            return;
        }
    }
}

/// Transfers the terminal to `job_id` and waits for it (§4.6). `cont`
/// indicates this is resuming a stopped job rather than a fresh launch.
pub fn put_job_in_foreground(vm: &mut Vm, job_id: u32, cont: bool) {
    if let Some(job) = vm.jobs.get_by_id_mut(job_id) {
        job.background = false;
    }
    let pgid = vm.jobs.get_by_id(job_id).and_then(|j| j.pgid);

    if let Some(pgid) = pgid {
        let _ = tcsetpgrp(STDIN_FD, pgid);

        if cont {
            let saved = vm
                .jobs
                .get_by_id(job_id)
                .and_then(|j| j.saved_terminal_state.clone());
            if let Some(term) = saved {
                let _ = tcsetattr(STDIN_FD, SetArg::TCSADRAIN, &term);
            }
            if kill(Pid::from_raw(-pgid.as_raw()), Signal::SIGCONT).is_err() {
                eprintln!("cash: kill: could not continue job {}", pgid.as_raw());
            }
        }
    }

    wait_for_job(vm, job_id);

    let _ = tcsetpgrp(STDIN_FD, vm.shell_pgid);

    if let Ok(attrs) = tcgetattr(STDIN_FD) {
        if let Some(job) = vm.jobs.get_by_id_mut(job_id) {
            job.saved_terminal_state = Some(attrs);
        }
    }
    if let Some(shell_term) = vm.saved_shell_terminal_state.clone() {
        let _ = tcsetattr(STDIN_FD, SetArg::TCSADRAIN, &shell_term);
    }
}

pub fn put_job_in_background(vm: &mut Vm, job_id: u32, cont: bool) {
    if let Some(job) = vm.jobs.get_by_id_mut(job_id) {
        job.background = true;
    }
    if cont {
        if let Some(pgid) = vm.jobs.get_by_id(job_id).and_then(|j| j.pgid) {
            if kill(Pid::from_raw(-pgid.as_raw()), Signal::SIGCONT).is_err() {
                eprintln!("cash: kill: could not continue job {}", pgid.as_raw());
            }
        }
    }
}

fn mark_job_as_running(job: &mut Job) {
    job.notified = false;
    for proc in &mut job.processes {
        proc.stopped = false;
    }
}

/// Resumes a stopped job, as `fg` does (§4.6).
pub fn continue_job(vm: &mut Vm, job_id: u32, foreground: bool) {
    if let Some(job) = vm.jobs.get_by_id_mut(job_id) {
        mark_job_as_running(job);
    }
    if foreground {
        put_job_in_foreground(vm, job_id, true);
    } else {
        put_job_in_background(vm, job_id, true);
    }
}

/// Reaps statuses, then prints and unlinks every job that just finished or
/// just stopped for the first time. Run after every top-level statement,
/// never mid-statement (§5).
pub fn do_job_notification(vm: &mut Vm) {
    update_status(vm);

    let mut i = 0;
    while i < vm.jobs.jobs.len() {
        let remove = {
            let job = &mut vm.jobs.jobs[i];
            if job_was_terminated(job) {
                if !job.notified {
                    notify_if_background(vm, job, "Terminated");
                }
                true
            } else if job_is_completed(job) {
                notify_if_background(vm, job, "Completed");
                true
            } else if job_is_stopped(job) && !job.notified {
                notify_if_background(vm, job, "Stopped");
                job.notified = true;
                false
            } else {
                false
            }
        };
        if remove {
            vm.jobs.jobs.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Drops every completed job without printing anything — used by the
/// `jobs` builtin after it has already reported each job's state (§4.5).
pub fn remove_completed_jobs(vm: &mut Vm) {
    vm.jobs.jobs.retain(|job| !job_is_completed(job));
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
