use std::{
    collections::BTreeMap,
    ffi::OsString,
    io::{Read, Write},
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

/// One fully assembled tool invocation.
///
/// Streams are borrowed for the duration of a single [`ToolInvoker::execute`] call.
pub struct Invocation<'i> {
    /// Program to spawn.
    pub program: &'i Path,
    /// Ordered argument vector, not including the program itself.
    pub args: &'i [OsString],
    /// Extra environment variables.
    pub env: &'i BTreeMap<String, String>,
    /// Bytes to feed to the child's stdin. `None` leaves stdin closed.
    pub stdin: Option<&'i mut (dyn Read + Send)>,
    /// Destination for the child's stdout. `None` discards it.
    pub stdout: Option<&'i mut dyn Write>,
}

/// Failure reported by a [`ToolInvoker`]: its own message plus whatever the tool wrote to stderr.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}. {}", String::from_utf8_lossy(.stderr).trim_end())]
pub struct ToolFailure {
    /// Invoker-level description, e.g. `exit status: 1`.
    pub message: String,
    /// Captured standard error of the tool, possibly empty.
    pub stderr: Vec<u8>,
}

impl ToolFailure {
    /// Failure with no captured stderr.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stderr: Vec::new(),
        }
    }

    /// Attach captured stderr.
    pub fn with_stderr(mut self, stderr: impl Into<Vec<u8>>) -> Self {
        self.stderr = stderr.into();
        self
    }
}

/// Process-execution seam shared by every tool builder.
///
/// Implementations block until the tool has exited.
pub trait ToolInvoker {
    /// Run `invocation` to completion.
    fn execute(&mut self, invocation: Invocation<'_>) -> Result<(), ToolFailure>;
}

impl<T: ToolInvoker + ?Sized> ToolInvoker for &mut T {
    fn execute(&mut self, invocation: Invocation<'_>) -> Result<(), ToolFailure> {
        (**self).execute(invocation)
    }
}

/// [`ToolInvoker`] backed by [`std::process::Command`].
///
/// Stdin is pumped and stderr drained on scoped threads while stdout is copied on the calling
/// thread, so a tool that interleaves reads and writes cannot deadlock on a full pipe.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessInvoker;

impl ToolInvoker for ProcessInvoker {
    fn execute(&mut self, invocation: Invocation<'_>) -> Result<(), ToolFailure> {
        let Invocation {
            program,
            args,
            env,
            stdin,
            stdout,
        } = invocation;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(env)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(if stdout.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            ToolFailure::new(format!("failed to spawn '{}': {e}", program.display()))
        })?;
        tracing::debug!(pid = child.id(), program = %program.display(), "spawned tool");

        let child_stdin = child.stdin.take();
        let child_stdout = child.stdout.take();
        let mut child_stderr = child
            .stderr
            .take()
            .ok_or_else(|| ToolFailure::new("failed to open tool stderr (unexpected)"))?;

        std::thread::scope(|scope| -> Result<(), ToolFailure> {
            let stderr_drain = scope.spawn(move || {
                let mut stderr_bytes = Vec::new();
                child_stderr.read_to_end(&mut stderr_bytes)?;
                Ok::<_, std::io::Error>(stderr_bytes)
            });

            let stdin_pump = match (stdin, child_stdin) {
                (Some(reader), Some(mut pipe)) => Some(scope.spawn(move || {
                    let copied = std::io::copy(reader, &mut pipe);
                    // Dropping the pipe closes the child's stdin.
                    drop(pipe);
                    match copied {
                        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                        other => other.map(|_| ()),
                    }
                })),
                _ => None,
            };

            let stdout_copy = match (stdout, child_stdout) {
                (Some(writer), Some(mut pipe)) => {
                    let copied = std::io::copy(&mut pipe, writer).map(|_| ());
                    if copied.is_err() {
                        // Nobody reads the pipe anymore; don't leave the child blocked on it.
                        let _ = child.kill();
                    }
                    copied
                }
                _ => Ok(()),
            };

            let status = child.wait();

            let stdin_result = match stdin_pump {
                Some(handle) => handle
                    .join()
                    .map_err(|_| ToolFailure::new("tool stdin pump thread panicked"))?,
                None => Ok(()),
            };
            let stderr_bytes = stderr_drain
                .join()
                .map_err(|_| ToolFailure::new("tool stderr drain thread panicked"))?
                .map_err(|e| ToolFailure::new(format!("tool stderr read failed: {e}")))?;

            let status = status.map_err(|e| {
                ToolFailure::new(format!("failed to wait for tool to finish: {e}"))
                    .with_stderr(stderr_bytes.clone())
            })?;
            // A failed copy kills the child; report the copy error, not the kill status.
            stdout_copy.map_err(|e| {
                ToolFailure::new(format!("failed to copy tool stdout: {e}"))
                    .with_stderr(stderr_bytes.clone())
            })?;
            if !status.success() {
                return Err(ToolFailure::new(describe_status(status)).with_stderr(stderr_bytes));
            }
            stdin_result.map_err(|e| {
                ToolFailure::new(format!("failed to write tool stdin: {e}"))
                    .with_stderr(stderr_bytes)
            })?;
            Ok(())
        })
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status: {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exec/invoker.rs"]
mod tests;
