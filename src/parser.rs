use crate::errors::ShellError;

/// Maximum number of whitespace-delimited arguments in one command.
pub const MAX_ARGS: usize = 64;
/// Maximum accepted input line length in bytes.
pub const MAX_LINE: usize = 1024;

/// How a redirection target file is opened and which child descriptors it
/// ends up wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `< file`: open existing, becomes stdin.
    Read,
    /// `> file`: create/truncate, becomes stdout.
    Truncate,
    /// `>> file`: create/append, becomes stdout.
    Append,
    /// `&> file`: create/truncate, becomes stdout and stderr.
    DualTruncate,
    /// `>>& file`: create/append, becomes stdout and stderr.
    DualAppend,
}

/// A resolved redirection: at most one per command segment.
#[derive(Debug, PartialEq, Eq)]
pub struct Redirect {
    pub mode: RedirectMode,
    pub target: String,
}

/// Splits a line into `;`-separated command segments, dropping empty ones.
/// Pipe splitting is deferred to the per-segment stage.
pub fn split_segments(line: &str) -> impl Iterator<Item = &str> {
    line.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Splits a piped segment at its first `|` into a left and right leg.
/// Returns `None` when the segment contains no pipe.
pub fn split_pipe(segment: &str) -> Option<(&str, &str)> {
    segment
        .find('|')
        .map(|i| (&segment[..i], &segment[i + 1..]))
}

/// Strips a trailing `&` background marker, returning the remaining text and
/// whether the segment should run in the background.
pub fn strip_background(segment: &str) -> (&str, bool) {
    match segment.trim_end().strip_suffix('&') {
        Some(rest) => (rest.trim_end(), true),
        None => (segment.trim_end(), false),
    }
}

/// Splits a command portion into its argument vector on whitespace runs.
pub fn split_args(text: &str) -> Result<Vec<String>, ShellError> {
    let args: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
    if args.len() > MAX_ARGS {
        return Err(ShellError::TooManyArguments(MAX_ARGS));
    }
    Ok(args)
}

// Scan order matters: `>` is a substring of every other output operator and
// `>>` of `>>&`, so the longer operators must be recognized first.
const OPERATORS: [(&str, RedirectMode); 5] = [
    ("<", RedirectMode::Read),
    (">>&", RedirectMode::DualAppend),
    ("&>", RedirectMode::DualTruncate),
    (">>", RedirectMode::Append),
    (">", RedirectMode::Truncate),
];

/// Detects at most one redirection operator in a segment, returning the bare
/// command portion and the redirection descriptor, if any.
///
/// The target filename is the first whitespace-delimited token after the
/// operator; anything beyond it is not interpreted. Input redirection wins
/// over all output forms, matching the resolver's fixed precedence.
pub fn parse_redirect(segment: &str) -> Result<(String, Option<Redirect>), ShellError> {
    for (op, mode) in OPERATORS {
        if let Some(i) = segment.find(op) {
            let command = segment[..i].trim_end().to_owned();
            let rest = segment[i + op.len()..].trim_start_matches(|c| c == ' ' || c == '\t');
            let target = rest.split_whitespace().next().unwrap_or("");
            if target.is_empty() {
                return Err(ShellError::MissingTarget(op));
            }
            return Ok((
                command,
                Some(Redirect {
                    mode,
                    target: target.to_owned(),
                }),
            ));
        }
    }
    Ok((segment.to_owned(), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments_skips_empty() {
        let segments: Vec<&str> = split_segments("ls -l ;  ; echo hi;; pwd ").collect();
        assert_eq!(segments, vec!["ls -l", "echo hi", "pwd"]);
    }

    #[test]
    fn test_split_args_collapses_whitespace() {
        let args = split_args("grep   -r  pattern").unwrap();
        assert_eq!(args, vec!["grep", "-r", "pattern"]);
    }

    #[test]
    fn test_split_args_limit() {
        let line = vec!["x"; MAX_ARGS + 1].join(" ");
        assert!(matches!(
            split_args(&line),
            Err(ShellError::TooManyArguments(_))
        ));
    }

    #[test]
    fn test_strip_background() {
        assert_eq!(strip_background("sleep 5 &"), ("sleep 5", true));
        assert_eq!(strip_background("echo hi&"), ("echo hi", true));
        assert_eq!(strip_background("echo hi"), ("echo hi", false));
    }

    #[test]
    fn test_split_pipe_first_bar() {
        assert_eq!(split_pipe("a | b | c"), Some(("a ", " b | c")));
        assert_eq!(split_pipe("a b"), None);
    }

    #[test]
    fn test_redirect_modes() {
        let cases = [
            ("cat < in.txt", RedirectMode::Read, "in.txt"),
            ("make >>& build.log", RedirectMode::DualAppend, "build.log"),
            ("make &> build.log", RedirectMode::DualTruncate, "build.log"),
            ("echo hi >> out.txt", RedirectMode::Append, "out.txt"),
            ("echo hi > out.txt", RedirectMode::Truncate, "out.txt"),
        ];
        for (input, mode, target) in cases {
            let (_, redirect) = parse_redirect(input).unwrap();
            let redirect = redirect.unwrap();
            assert_eq!(redirect.mode, mode, "input: {}", input);
            assert_eq!(redirect.target, target, "input: {}", input);
        }
    }

    #[test]
    fn test_redirect_command_portion() {
        let (command, redirect) = parse_redirect("sort -u data.txt > sorted.txt").unwrap();
        assert_eq!(command, "sort -u data.txt");
        assert!(redirect.is_some());
    }

    #[test]
    fn test_redirect_none() {
        let (command, redirect) = parse_redirect("echo plain").unwrap();
        assert_eq!(command, "echo plain");
        assert!(redirect.is_none());
    }

    #[test]
    fn test_redirect_input_wins() {
        // Only one operator is honored; `<` takes precedence.
        let (command, redirect) = parse_redirect("cmd < in > out").unwrap();
        assert_eq!(command, "cmd");
        let redirect = redirect.unwrap();
        assert_eq!(redirect.mode, RedirectMode::Read);
        assert_eq!(redirect.target, "in");
    }

    #[test]
    fn test_redirect_target_is_first_token() {
        let (_, redirect) = parse_redirect("cmd > file extra").unwrap();
        assert_eq!(redirect.unwrap().target, "file");
    }

    #[test]
    fn test_redirect_missing_target() {
        assert!(matches!(
            parse_redirect("echo hi >"),
            Err(ShellError::MissingTarget(">"))
        ));
        assert!(matches!(
            parse_redirect("make >>&"),
            Err(ShellError::MissingTarget(">>&"))
        ));
    }
}
