use std::process::{Command, Output, Stdio};

use crate::error::{SetupError, SetupResult};

/// Run a command and capture its output. Fails if the command
/// returns a non-zero exit code.
pub fn run(program: &str, args: &[&str]) -> SetupResult<String> {
    let output = spawn(program, args)?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let command = format_command(program, args);
        eprintln!("stderr: {stderr}");
        Err(SetupError::CommandFailed {
            command,
            status: output.status,
        })
    }
}

/// Run a command and report only whether it succeeded. Stdout and
/// stderr are discarded. Used by readiness probes.
#[must_use]
pub fn succeeds(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Run a command with stdin/stdout/stderr inherited (interactive).
pub fn run_interactive(program: &str, args: &[&str]) -> SetupResult<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SetupError::CommandNotFound(program.to_string())
            } else {
                SetupError::Io(e)
            }
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(SetupError::CommandFailed {
            command: format_command(program, args),
            status,
        })
    }
}

/// Spawn a command detached, without waiting for it to finish.
/// The caller is expected to gate on a readiness poll afterwards.
pub fn spawn_detached(program: &str, args: &[&str]) -> SetupResult<()> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SetupError::CommandNotFound(program.to_string())
            } else {
                SetupError::Io(e)
            }
        })?;
    Ok(())
}

/// Check if a command exists on PATH.
#[must_use]
pub fn command_exists(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

fn spawn(program: &str, args: &[&str]) -> SetupResult<Output> {
    Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SetupError::CommandNotFound(program.to_string())
            } else {
                SetupError::Io(e)
            }
        })
}

fn format_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| (*a).to_string()));
    parts.join(" ")
}
