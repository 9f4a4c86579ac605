//! One-way hand-off of confirmed command lines to a background worker.
//!
//! The console only pushes into a channel; it never sees whether or when a
//! command finishes.

use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::model::{CommandRegistry, render_template, split_command_line};

pub trait ExecutionSink {
    fn submit(&self, command_line: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub command_line: String,
}

pub struct ChannelSink {
    tx: Sender<Submission>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Submission>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, Receiver<Submission>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }
}

impl ExecutionSink for ChannelSink {
    fn submit(&self, command_line: &str) {
        let submission = Submission {
            command_line: command_line.to_string(),
        };
        if self.tx.send(submission).is_err() {
            warn!(command_line, "executor is gone; command dropped");
        }
    }
}

pub fn spawn_executor(
    registry: Arc<dyn CommandRegistry>,
    rx: Receiver<Submission>,
) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("cmdcon-executor".to_string())
        .spawn(move || {
            for submission in rx {
                match execute_submission(registry.as_ref(), &submission) {
                    Ok(Some(code)) => {
                        info!(command_line = %submission.command_line, code, "command finished")
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(command_line = %submission.command_line, "command failed: {err:#}")
                    }
                }
            }
        })
        .context("failed to spawn executor thread")
}

/// Runs the command's shell template, if it has one. Returns the exit code.
fn execute_submission(
    registry: &dyn CommandRegistry,
    submission: &Submission,
) -> Result<Option<i32>> {
    let (head, args) = split_command_line(&submission.command_line);
    let Some(command) = registry.lookup_by_identifier(&head.to_uppercase()) else {
        warn!(command_line = %submission.command_line, "no such command at execution time");
        return Ok(None);
    };
    let Some(template) = &command.template else {
        info!(command = %command.global_name, "no run template; nothing to execute");
        return Ok(None);
    };

    let mut params = HashMap::new();
    params.insert("command".to_string(), command.global_name.clone());
    params.insert("args".to_string(), args.to_string());
    let rendered = render_template(template, &params);

    info!(command = %command.global_name, shell = %rendered, "executing");
    run_shell_command_quiet(&rendered).map(Some)
}

fn run_shell_command_quiet(command: &str) -> Result<i32> {
    #[cfg(target_os = "windows")]
    let mut process = {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    };

    #[cfg(not(target_os = "windows"))]
    let mut process = {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    };

    let status = process
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("failed to start shell command: {command}"))?;

    Ok(status.code().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommandCatalog;
    use crate::model::tests::mock_command;

    #[test]
    fn channel_sink_delivers_in_order() {
        let (sink, rx) = ChannelSink::channel();
        sink.submit("LINE 0,0");
        sink.submit("CIRCLE");
        let lines: Vec<_> = rx.try_iter().map(|s| s.command_line).collect();
        assert_eq!(lines, vec!["LINE 0,0", "CIRCLE"]);
    }

    #[test]
    fn submitting_after_executor_exit_does_not_panic() {
        let (sink, rx) = ChannelSink::channel();
        drop(rx);
        sink.submit("LINE");
    }

    #[test]
    fn commands_without_template_are_skipped() {
        let mut catalog = CommandCatalog::empty();
        catalog.extend(vec![mock_command("ZOOM")]).unwrap();
        let submission = Submission {
            command_line: "zoom extents".to_string(),
        };
        assert_eq!(execute_submission(&catalog, &submission).unwrap(), None);

        let unknown = Submission {
            command_line: "frobnicate".to_string(),
        };
        assert_eq!(execute_submission(&catalog, &unknown).unwrap(), None);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn template_receives_arguments() {
        let mut command = mock_command("CHECK");
        command.template = Some("test \"{{args}}\" = \"a b\" && exit 3".to_string());
        let mut catalog = CommandCatalog::empty();
        catalog.extend(vec![command]).unwrap();

        let submission = Submission {
            command_line: "check a b".to_string(),
        };
        assert_eq!(execute_submission(&catalog, &submission).unwrap(), Some(3));
    }
}
