//! External command execution.
//!
//! The converter pipes documents through an external program on stdin and
//! reads the result from stdout. Known noise on stderr is filtered before
//! logging.

use crate::log;
use anyhow::{Context, Result, bail};
use std::{
    ffi::OsString,
    io::Write,
    path::Path,
    process::{Command, Output, Stdio},
    thread,
};

// ============================================================================
// Argument Conversion
// ============================================================================

/// Convert a configured command line to `OsString`s.
#[inline]
pub fn to_cmd_vec(cmd: &[String]) -> Vec<OsString> {
    cmd.iter().map(OsString::from).collect()
}

/// Filter out empty args.
#[inline]
pub fn filter_args(args: &[OsString]) -> Vec<OsString> {
    args.iter().filter(|a| !a.is_empty()).cloned().collect()
}

// ============================================================================
// Command Execution
// ============================================================================

/// Run a command with `input` on stdin and return its stdout.
///
/// stdin is written from a separate thread so a child filling its stdout pipe
/// never deadlocks against us.
///
/// # Errors
/// Returns error if the command cannot be spawned, exits non-zero, or does
/// not accept the whole input.
pub fn exec_with_input(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    input: &[u8],
) -> Result<Vec<u8>> {
    let (name, mut command) = prepare(root, cmd, args)?;
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to spawn `{name}`"))?;
    let mut stdin = child.stdin.take().context("Failed to acquire stdin")?;

    let (written, output) = thread::scope(|scope| {
        let writer = scope.spawn(move || stdin.write_all(input));
        let output = child.wait_with_output();
        (writer.join(), output)
    });

    let output = output.with_context(|| format!("Failed to execute `{name}`"))?;
    check_output(&name, &output)?;

    match written {
        Ok(result) => result.with_context(|| format!("Failed to write stdin of `{name}`"))?,
        Err(_) => bail!("stdin writer of `{name}` panicked"),
    }

    Ok(output.stdout)
}

/// Prepare a Command from components.
fn prepare(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<(String, Command)> {
    let (program, rest) = cmd.split_first().context("Empty command")?;
    let name = program.to_str().context("Command name is not UTF-8")?.to_owned();

    let mut command = Command::new(program);
    command.args(rest).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

// ============================================================================
// Output Filtering
// ============================================================================

/// Filter rule for stderr noise.
///
/// Matches lines that start with a prefix AND contain all required keywords.
struct FilterRule {
    /// Line must start with one of these (case-insensitive, after trim).
    starts_with: &'static [&'static str],
    /// Line must also contain ALL of these keywords (case-insensitive).
    contains: &'static [&'static str],
}

impl FilterRule {
    const fn new(starts_with: &'static [&'static str], contains: &'static [&'static str]) -> Self {
        Self { starts_with, contains }
    }

    fn matches(&self, line: &str) -> bool {
        let lower = line.trim().to_ascii_lowercase();
        let has_prefix = self.starts_with.is_empty()
            || self.starts_with.iter().any(|p| lower.starts_with(p));
        let has_keywords = self.contains.iter().all(|kw| lower.contains(kw));
        has_prefix && has_keywords
    }
}

// Ruby interpreter noise, e.g.
//   /usr/lib/ruby/3.2.0/x.rb:12: warning: already initialized constant X
//   /usr/lib/ruby/3.2.0/x.rb:10: warning: previous definition of X was here
const STDERR_RULES: &[FilterRule] = &[
    FilterRule::new(&[], &["warning:", "already initialized constant"]),
    FilterRule::new(&[], &["warning:", "previous definition of"]),
];

fn should_filter_line(line: &str) -> bool {
    STDERR_RULES.iter().any(|rule| rule.matches(line))
}

/// Error message from stderr, skipping filtered lines at the start.
fn extract_error(stderr: &str) -> &str {
    stderr
        .lines()
        .find(|line| !line.trim().is_empty() && !should_filter_line(line))
        .map(|first| {
            let offset = first.as_ptr() as usize - stderr.as_ptr() as usize;
            &stderr[offset..]
        })
        .unwrap_or(stderr)
        .trim()
}

/// Fail on a non-zero exit, otherwise log stderr without the known noise.
fn check_output(name: &str, output: &Output) -> Result<()> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();

    if !output.status.success() {
        let error_msg = extract_error(stderr);
        if error_msg.is_empty() {
            bail!("Command `{name}` failed with {}", output.status);
        }
        bail!("Command `{name}` failed with {}: {error_msg}", output.status);
    }

    for line in stderr.lines() {
        if !line.trim().is_empty() && !should_filter_line(line) {
            log!(name; "{line}");
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cmd_vec() {
        let v = vec!["asciidoctor".to_string(), "-s".to_string()];
        let cmd = to_cmd_vec(&v);
        assert_eq!(cmd, vec![OsString::from("asciidoctor"), OsString::from("-s")]);
    }

    #[test]
    fn test_filter_args() {
        let args = [OsString::from("a"), OsString::from(""), OsString::from("b")];
        let filtered = filter_args(&args);
        assert_eq!(filtered, vec![OsString::from("a"), OsString::from("b")]);
    }

    #[test]
    fn test_prepare_empty() {
        assert!(prepare(None, &[], &[]).is_err());
    }

    #[test]
    fn test_prepare_valid() {
        let cmd = to_cmd_vec(&["asciidoctor".to_string()]);
        let (name, _) = prepare(None, &cmd, &[]).unwrap();
        assert_eq!(name, "asciidoctor");
    }

    #[test]
    fn test_filter_rule_matches_ruby_noise() {
        assert!(should_filter_line(
            "/usr/lib/ruby/x.rb:12: warning: already initialized constant X"
        ));
        assert!(!should_filter_line("asciidoctor: WARNING: a.adoc: line 3: dropping line"));
    }

    #[test]
    fn test_extract_error_skips_noise() {
        let stderr = "x.rb:1: warning: already initialized constant X\nasciidoctor: FAILED: boom\n";
        assert_eq!(extract_error(stderr), "asciidoctor: FAILED: boom");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_with_input_pipes_stdin() {
        let cmd = to_cmd_vec(&["cat".to_string()]);
        let output = exec_with_input(None, &cmd, &[], b"hello").unwrap();
        assert_eq!(output, b"hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_with_input_reports_failure() {
        let cmd = to_cmd_vec(&["sh".to_string()]);
        let args = [OsString::from("-c"), OsString::from("echo broken >&2; exit 3")];
        let err = exec_with_input(None, &cmd, &args, b"").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
