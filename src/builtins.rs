use crate::errors::ShellError;
use crate::jobs::JobTable;
use std::env;
use std::process;

/// Checks whether the line names a built-in directive and, if so, executes
/// it in the interpreter's own process. Built-ins are recognized by the
/// leading word and are never forked. Returns true when the line was
/// handled.
pub fn handle_builtin(line: &str, jobs: &mut JobTable) -> bool {
    let mut words = line.split_whitespace();
    let name = match words.next() {
        Some(name) => name,
        None => return false,
    };
    match name {
        "exit" => {
            println!("Exiting shell...");
            process::exit(0);
        }
        "cd" => {
            report(change_directory(words.next()));
            true
        }
        "setenv" => {
            report(set_env(words.next(), words.next()));
            true
        }
        "unsetenv" => {
            report(unset_env(words.next()));
            true
        }
        "jobs" => {
            jobs.list_and_sweep();
            true
        }
        "bg" => {
            report(job_ref(words.next(), "bg").and_then(|jid| jobs.resume(jid)));
            true
        }
        "fg" => {
            report(job_ref(words.next(), "fg").and_then(|jid| jobs.wait_foreground(jid)));
            true
        }
        "kill" => {
            report(job_ref(words.next(), "kill").and_then(|jid| jobs.terminate(jid)));
            true
        }
        _ => false,
    }
}

fn report(result: Result<(), ShellError>) {
    if let Err(e) = result {
        eprintln!("ish: {}", e);
    }
}

fn change_directory(dir: Option<&str>) -> Result<(), ShellError> {
    let dir = dir.ok_or(ShellError::MissingArgument("cd"))?;
    if let Err(e) = env::set_current_dir(dir) {
        eprintln!("ish: cd: {}: {}", dir, e);
    }
    Ok(())
}

fn set_env(name: Option<&str>, value: Option<&str>) -> Result<(), ShellError> {
    let name = name.ok_or(ShellError::MissingArgument("setenv"))?;
    let value = value.ok_or(ShellError::MissingArgument("setenv"))?;
    env::set_var(name, value);
    Ok(())
}

fn unset_env(name: Option<&str>) -> Result<(), ShellError> {
    let name = name.ok_or(ShellError::MissingArgument("unsetenv"))?;
    env::remove_var(name);
    Ok(())
}

/// Parses a `%<job_id>` reference as used by `bg`, `fg`, and `kill`.
fn job_ref(arg: Option<&str>, command: &'static str) -> Result<i32, ShellError> {
    let arg = arg.ok_or(ShellError::MissingArgument(command))?;
    let digits = arg
        .strip_prefix('%')
        .ok_or_else(|| ShellError::BadJobId(arg.to_owned()))?;
    match digits.parse::<i32>() {
        Ok(jid) if jid > 0 => Ok(jid),
        _ => Err(ShellError::BadJobId(arg.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ref() {
        assert_eq!(job_ref(Some("%3"), "bg").unwrap(), 3);
        assert!(matches!(
            job_ref(Some("3"), "bg"),
            Err(ShellError::BadJobId(_))
        ));
        assert!(matches!(
            job_ref(Some("%zero"), "kill"),
            Err(ShellError::BadJobId(_))
        ));
        assert!(matches!(
            job_ref(None, "fg"),
            Err(ShellError::MissingArgument("fg"))
        ));
    }

    #[test]
    fn test_unknown_word_is_not_builtin() {
        let mut jobs = JobTable::new();
        assert!(!handle_builtin("ls -l", &mut jobs));
        assert!(!handle_builtin("", &mut jobs));
    }

    #[test]
    fn test_setenv_roundtrip() {
        let mut jobs = JobTable::new();
        assert!(handle_builtin("setenv ISH_TEST_VAR probe", &mut jobs));
        assert_eq!(env::var("ISH_TEST_VAR").unwrap(), "probe");
        assert!(handle_builtin("unsetenv ISH_TEST_VAR", &mut jobs));
        assert!(env::var("ISH_TEST_VAR").is_err());
    }
}
