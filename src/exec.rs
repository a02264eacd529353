use crate::errors::ShellError;
use crate::jobs::JobTable;
use crate::parser::{self, Redirect, RedirectMode};
use crate::utils;
use nix::fcntl::OFlag;
use nix::libc;
use nix::sys::wait::waitpid;
use nix::unistd::{self, fork, ForkResult, Pid};
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::unix::io::{AsRawFd, RawFd};
use std::process;

/// Runs one `;`-separated segment: pipeline, background launch, or plain
/// foreground command with optional redirection.
pub fn run_segment(segment: &str, jobs: &mut JobTable) -> Result<(), ShellError> {
    if let Some((left, right)) = parser::split_pipe(segment) {
        return run_pipeline(left, right);
    }

    let (text, background) = parser::strip_background(segment);
    if text.is_empty() {
        return Ok(());
    }
    // A command rejected for capacity is discarded outright, never demoted
    // to the foreground.
    if background && jobs.is_full() {
        return Err(ShellError::TableFull);
    }

    let (command, redirect) = parser::parse_redirect(text)?;
    let argv = parser::split_args(&command)?;
    if argv.is_empty() {
        return Ok(());
    }

    let target = match &redirect {
        Some(r) => Some(open_target(r)?),
        None => None,
    };

    let mut stdin_fd = libc::STDIN_FILENO;
    let mut stdout_fd = libc::STDOUT_FILENO;
    let mut stderr_fd = libc::STDERR_FILENO;
    if let (Some(r), Some(file)) = (&redirect, &target) {
        let fd = file.as_raw_fd();
        match r.mode {
            RedirectMode::Read => stdin_fd = fd,
            RedirectMode::Truncate | RedirectMode::Append => stdout_fd = fd,
            RedirectMode::DualTruncate | RedirectMode::DualAppend => {
                stdout_fd = fd;
                stderr_fd = fd;
            }
        }
    }

    let child = launch(&argv, stdin_fd, stdout_fd, stderr_fd);
    drop(target); // the child holds its own copy of the descriptor

    if background {
        jobs.add(child, text)?;
    } else {
        wait_child(child);
    }
    Ok(())
}

/// Wires two command legs through an anonymous pipe and waits for both.
///
/// The pipe is opened close-on-exec, so neither exec'd child keeps a stray
/// end open; the parent closes its own ends right after spawning. Between
/// the two waits the legs run concurrently.
fn run_pipeline(left: &str, right: &str) -> Result<(), ShellError> {
    let left_argv = parser::split_args(left)?;
    let right_argv = parser::split_args(right)?;
    if left_argv.is_empty() || right_argv.is_empty() {
        return Err(ShellError::EmptyPipeline);
    }

    let (read_end, write_end) = match unistd::pipe2(OFlag::O_CLOEXEC) {
        Ok(ends) => ends,
        Err(e) => utils::fatal(&format!("pipe: {}", e)),
    };

    let lhs = launch(&left_argv, libc::STDIN_FILENO, write_end, libc::STDERR_FILENO);
    let rhs = launch(&right_argv, read_end, libc::STDOUT_FILENO, libc::STDERR_FILENO);

    let _ = unistd::close(read_end);
    let _ = unistd::close(write_end);

    wait_child(lhs);
    wait_child(rhs);
    Ok(())
}

/// Spawns a child with its standard streams rewired to the given
/// descriptors and its image replaced by `argv[0]`, resolved via PATH.
///
/// Launch failures are confined to the child, which reports and exits 127.
/// A failed fork is fatal to the whole interpreter.
pub fn launch(argv: &[String], stdin_fd: RawFd, stdout_fd: RawFd, stderr_fd: RawFd) -> Pid {
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => child,
        Ok(ForkResult::Child) => {
            redirect_stdio(stdin_fd, stdout_fd, stderr_fd);
            exec_program(argv)
        }
        Err(e) => utils::fatal(&format!("fork: {}", e)),
    }
}

fn redirect_stdio(stdin_fd: RawFd, stdout_fd: RawFd, stderr_fd: RawFd) {
    for (fd, stream) in [
        (stdin_fd, libc::STDIN_FILENO),
        (stdout_fd, libc::STDOUT_FILENO),
        (stderr_fd, libc::STDERR_FILENO),
    ] {
        if fd != stream {
            if let Err(e) = unistd::dup2(fd, stream) {
                eprintln!("ish: dup2: {}", e);
                process::exit(126);
            }
        }
    }
}

fn exec_program(argv: &[String]) -> ! {
    let c_argv: Vec<CString> = argv
        .iter()
        .filter_map(|arg| CString::new(arg.as_str()).ok())
        .collect();
    if c_argv.len() != argv.len() {
        eprintln!("ish: {}: invalid argument", argv[0]);
        process::exit(127);
    }
    if let Err(e) = unistd::execvp(&c_argv[0], &c_argv) {
        eprintln!("ish: {}: {}", argv[0], e);
    }
    process::exit(127)
}

fn open_target(redirect: &Redirect) -> Result<File, ShellError> {
    let mut opts = OpenOptions::new();
    match redirect.mode {
        RedirectMode::Read => {
            opts.read(true);
        }
        RedirectMode::Truncate | RedirectMode::DualTruncate => {
            opts.write(true).create(true).truncate(true);
        }
        RedirectMode::Append | RedirectMode::DualAppend => {
            opts.append(true).create(true);
        }
    }
    opts.open(&redirect.target).map_err(|e| ShellError::Redirect {
        path: redirect.target.clone(),
        source: e,
    })
}

fn wait_child(pid: Pid) {
    if let Err(e) = waitpid(pid, None) {
        eprintln!("ish: waitpid: {}", e);
    }
}
