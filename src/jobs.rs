use crate::errors::ShellError;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// Maximum number of concurrently tracked background jobs.
pub const MAX_JOBS: usize = 10;

/// One background job. The table owns the record; the process itself is
/// owned by the OS and only referenced by pid.
#[derive(Debug)]
pub struct Job {
    pub jid: i32,
    pub pid: Pid,
    pub cmdline: String,
}

/// Bounded, ordered table of background jobs.
///
/// Job ids come from a monotonic counter: they are dense at insertion time
/// and are never reused within a session, so the sequence becomes
/// non-contiguous after removals.
#[derive(Debug)]
pub struct JobTable {
    jobs: Vec<Job>,
    next_jid: i32,
}

impl JobTable {
    pub fn new() -> Self {
        JobTable {
            jobs: Vec::new(),
            next_jid: 1,
        }
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= MAX_JOBS
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn position(&self, jid: i32) -> Option<usize> {
        self.jobs.iter().position(|job| job.jid == jid)
    }

    /// Inserts a new job and announces it as `[id] pid command`.
    pub fn add(&mut self, pid: Pid, cmdline: &str) -> Result<i32, ShellError> {
        if self.is_full() {
            return Err(ShellError::TableFull);
        }
        let jid = self.next_jid;
        self.next_jid += 1;
        self.jobs.push(Job {
            jid,
            pid,
            cmdline: cmdline.to_owned(),
        });
        println!("[{}] {} {}", jid, pid, cmdline);
        Ok(jid)
    }

    /// The `jobs` built-in: probes every record without blocking, printing a
    /// status line for live jobs and reaping the ones that have exited.
    pub fn list_and_sweep(&mut self) {
        if self.is_empty() {
            println!("No background processes.");
            return;
        }
        let mut i = 0;
        while i < self.jobs.len() {
            match waitpid(self.jobs[i].pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => {
                    let job = self.jobs.remove(i);
                    println!("[{}] Done\t\t{}", job.jid, job.cmdline);
                }
                Ok(_) => {
                    let job = &self.jobs[i];
                    println!("[{}] {} {}", job.jid, job.pid, job.cmdline);
                    i += 1;
                }
                Err(e) => {
                    eprintln!("ish: waitpid: {}", e);
                    i += 1;
                }
            }
        }
    }

    /// The `bg` built-in: delivers SIGCONT to a stopped job and reports it.
    pub fn resume(&mut self, jid: i32) -> Result<(), ShellError> {
        let job = self
            .jobs
            .iter()
            .find(|job| job.jid == jid)
            .ok_or(ShellError::JobNotFound(jid))?;
        let _ = kill(job.pid, Signal::SIGCONT);
        println!("[{}] Continued\t{}", job.jid, job.cmdline);
        Ok(())
    }

    /// The `fg` built-in: continues the job, then blocks until it
    /// terminates and removes its record.
    pub fn wait_foreground(&mut self, jid: i32) -> Result<(), ShellError> {
        let i = self.position(jid).ok_or(ShellError::JobNotFound(jid))?;
        let pid = self.jobs[i].pid;
        let _ = kill(pid, Signal::SIGCONT);
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => {
                self.jobs.remove(i);
            }
            Ok(_) => {}
            Err(e) => eprintln!("ish: waitpid: {}", e),
        }
        Ok(())
    }

    /// The `kill` built-in: SIGTERM followed immediately by SIGCONT, so a
    /// stopped process is not left un-killable. The record is removed
    /// whether or not the process was still alive.
    pub fn terminate(&mut self, jid: i32) -> Result<(), ShellError> {
        let i = self.position(jid).ok_or(ShellError::JobNotFound(jid))?;
        let job = self.jobs.remove(i);
        let _ = kill(job.pid, Signal::SIGTERM);
        let _ = kill(job.pid, Signal::SIGCONT);
        Ok(())
    }

    /// End-of-line sweep: reaps jobs that exited while the line was being
    /// processed, tagging each notice as the most recently finished job.
    pub fn sweep_finished(&mut self) {
        let mut i = 0;
        while i < self.jobs.len() {
            match waitpid(self.jobs[i].pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => {
                    let job = self.jobs.remove(i);
                    println!("[{}]+  Done\t\t{}", job.jid, job.cmdline);
                }
                Ok(_) => i += 1,
                Err(e) => {
                    eprintln!("ish: waitpid: {}", e);
                    i += 1;
                }
            }
        }
    }
}
