use std::path::PathBuf;

use crate::exec::invoker::{Invocation, ToolFailure, ToolInvoker};

/// What a [`RecordingInvoker`] saw for one call.
#[derive(Clone, Debug)]
pub(crate) struct RecordedCall {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
    pub stdout_connected: bool,
}

/// Invoker that never spawns anything: it records each call, optionally writes a canned reply to
/// the connected stdout and optionally fails.
#[derive(Debug, Default)]
pub(crate) struct RecordingInvoker {
    pub calls: Vec<RecordedCall>,
    pub stdout_reply: Vec<u8>,
    pub fail_with: Option<ToolFailure>,
}

impl RecordingInvoker {
    pub fn failing(failure: ToolFailure) -> Self {
        Self {
            fail_with: Some(failure),
            ..Self::default()
        }
    }

    pub fn replying(stdout_reply: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout_reply: stdout_reply.into(),
            ..Self::default()
        }
    }

    pub fn last_args(&self) -> Vec<String> {
        self.calls
            .last()
            .map(|call| call.args.clone())
            .unwrap_or_default()
    }
}

impl ToolInvoker for RecordingInvoker {
    fn execute(&mut self, invocation: Invocation<'_>) -> Result<(), ToolFailure> {
        let stdin = match invocation.stdin {
            Some(reader) => {
                let mut bytes = Vec::new();
                reader
                    .read_to_end(&mut bytes)
                    .map_err(|e| ToolFailure::new(format!("fake stdin read failed: {e}")))?;
                Some(bytes)
            }
            None => None,
        };
        let stdout_connected = invocation.stdout.is_some();
        if let Some(writer) = invocation.stdout {
            writer
                .write_all(&self.stdout_reply)
                .map_err(|e| ToolFailure::new(format!("fake stdout write failed: {e}")))?;
        }

        self.calls.push(RecordedCall {
            program: invocation.program.to_path_buf(),
            args: invocation
                .args
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            stdin,
            stdout_connected,
        });

        match &self.fail_with {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}
