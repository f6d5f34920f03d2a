//! System clipboard via the platform copy command.
//!
//! - macOS: `pbcopy`
//! - Linux: `wl-copy`, then `xclip`, then `xsel`
//! - Windows: `clip`

use anyhow::{anyhow, bail, Context, Result};
use snipdeck_core::collaborators::Clipboard;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

#[cfg(target_os = "macos")]
const COPY_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "linux")]
const COPY_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(target_os = "windows")]
const COPY_COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const COPY_COMMANDS: &[(&str, &[&str])] = &[];

fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn {}", program))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("failed to write to {}", program))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}

fn copy_with(commands: &[(&str, &[&str])], text: &str) -> Result<()> {
    let mut last_err = None;
    for (program, args) in commands {
        match pipe_into(program, args, text) {
            Ok(()) => {
                debug!(program, bytes = text.len(), "copied to clipboard");
                return Ok(());
            }
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow!("clipboard not supported on this platform")))
}

/// Fire-and-forget clipboard backed by the platform copy command.
///
/// Failures are logged and never reported to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) {
        if let Err(err) = copy_with(COPY_COMMANDS, text) {
            warn!("clipboard copy failed: {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::copy_with;

    #[test]
    fn missing_copy_tools_report_the_last_spawn_error() {
        let err = copy_with(&[("snipdeck-no-such-copy-tool", &[])], "hello")
            .expect_err("unknown program");
        assert!(err.to_string().contains("snipdeck-no-such-copy-tool"));
    }

    #[test]
    fn empty_command_list_is_unsupported() {
        let err = copy_with(&[], "hello").expect_err("no commands");
        assert_eq!(err.to_string(), "clipboard not supported on this platform");
    }
}
