//! Builders for the individual WebP command-line tools.

use std::ffi::OsString;

use crate::{
    exec::invoker::{Invocation, ToolInvoker},
    foundation::{
        config::ToolConfig,
        error::{WebpBinError, WebpBinResult},
    },
};

/// Input/output channel selection shared by the builders.
pub mod channel;
/// `gif2webp` builder.
pub mod gif2webp;
/// `img2webp` builder.
pub mod img2webp;

/// Run `<tool> -version` and return its trimmed stdout.
pub(crate) fn tool_version<I: ToolInvoker>(
    invoker: &mut I,
    config: &ToolConfig,
    tool: &str,
) -> WebpBinResult<String> {
    let program = config.resolve_program(tool);
    let args = [OsString::from("-version")];
    let mut stdout: Vec<u8> = Vec::new();
    invoker
        .execute(Invocation {
            program: &program,
            args: &args,
            env: &config.env,
            stdin: None,
            stdout: Some(&mut stdout),
        })
        .map_err(|failure| WebpBinError::execution(failure.to_string()))?;
    Ok(String::from_utf8_lossy(&stdout).trim().to_string())
}
