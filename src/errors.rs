use std::io;
use thiserror::Error;

/// Everything that can go wrong while parsing or dispatching a command line.
///
/// Parse-class errors skip the offending command and keep the loop running;
/// `JobNotFound` and `TableFull` make the requested operation a no-op.
/// Fork/pipe failures are not represented here: they are fatal and go
/// through `utils::fatal` instead.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("no target file after '{0}'")]
    MissingTarget(&'static str),

    #[error("{0}: missing argument")]
    MissingArgument(&'static str),

    #[error("line too long (limit {0} bytes)")]
    LineTooLong(usize),

    #[error("too many arguments (limit {0})")]
    TooManyArguments(usize),

    #[error("missing command in pipeline")]
    EmptyPipeline,

    #[error("bad job id '{0}'")]
    BadJobId(String),

    #[error("job {0} not found")]
    JobNotFound(i32),

    #[error("maximum number of background processes reached")]
    TableFull,

    #[error("{path}: {source}")]
    Redirect { path: String, source: io::Error },
}
