use std::{ffi::OsString, io::Write, path::PathBuf};

use crate::{
    exec::invoker::{Invocation, ProcessInvoker, ToolInvoker},
    foundation::{
        config::ToolConfig,
        error::{WebpBinError, WebpBinResult},
    },
    tools::channel::{OutputKind, OutputSink, resolve_output},
};

/// Default program name of the frame sequence encoder.
pub const IMG2WEBP: &str = "img2webp";

/// One still frame of an animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSpec {
    /// Image path (or anything else the tool accepts as a positional source).
    pub locator: String,
    /// Display duration in milliseconds. `0` keeps the tool default.
    pub duration_ms: u32,
}

impl FrameSpec {
    /// Frame with the tool's default duration.
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            duration_ms: 0,
        }
    }

    /// Set the display duration.
    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Key-frame spacing bounds (`-kmin` / `-kmax`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyframeInterval {
    /// Minimum distance between key-frames.
    pub min: u32,
    /// Maximum distance between key-frames.
    pub max: u32,
}

/// Builder around `img2webp`: assembles ordered still frames into one animated WebP.
///
/// ```text
/// img2webp [-mixed] [-loop N] [-kmin N -kmax M] <frame> [-d N] ... -o <out|->
/// ```
///
/// The frame list is consumed by each [`run`](Self::run). Output, mixed mode and the file-level
/// options stay set.
pub struct Img2Webp<'a, I = ProcessInvoker> {
    config: ToolConfig,
    invoker: I,
    frames: Vec<FrameSpec>,
    output: Option<OutputSink<'a>>,
    mixed: bool,
    loop_count: Option<u32>,
    keyframes: Option<KeyframeInterval>,
}

impl<'a> Img2Webp<'a> {
    /// Builder that spawns the real `img2webp`.
    pub fn new(config: ToolConfig) -> Self {
        Self::with_invoker(config, ProcessInvoker)
    }
}

impl<'a, I: ToolInvoker> Img2Webp<'a, I> {
    /// Builder that runs through `invoker`. Mixed mode starts enabled.
    pub fn with_invoker(config: ToolConfig, invoker: I) -> Self {
        Self {
            config,
            invoker,
            frames: Vec::new(),
            output: None,
            mixed: true,
            loop_count: None,
            keyframes: None,
        }
    }

    /// Replace the whole frame list.
    pub fn set_frames(&mut self, frames: Vec<FrameSpec>) -> &mut Self {
        self.frames = frames;
        self
    }

    /// Let the tool pick lossy or lossless per frame.
    pub fn set_mixed(&mut self, mixed: bool) -> &mut Self {
        self.mixed = mixed;
        self
    }

    /// Number of times the animation loops (`0` = forever).
    pub fn set_loop_count(&mut self, loop_count: u32) -> &mut Self {
        self.loop_count = Some(loop_count);
        self
    }

    /// Bound the distance between key-frames.
    pub fn set_keyframes(&mut self, min: u32, max: u32) -> &mut Self {
        self.keyframes = Some(KeyframeInterval { min, max });
        self
    }

    /// Write the WebP to `path`. Replaces any stream output.
    pub fn set_output_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output = Some(OutputSink::File(path.into()));
        self
    }

    /// Stream the WebP into `writer`. Replaces any file output.
    pub fn set_output_stream(&mut self, writer: &'a mut dyn Write) -> &mut Self {
        self.output = Some(OutputSink::Stream(writer));
        self
    }

    /// Frames pending for the next run.
    pub fn frames(&self) -> &[FrameSpec] {
        &self.frames
    }

    /// Whether mixed mode is on.
    pub fn mixed(&self) -> bool {
        self.mixed
    }

    /// Active output variant, if any.
    pub fn output_kind(&self) -> Option<OutputKind> {
        self.output.as_ref().map(OutputSink::kind)
    }

    /// Borrow the invoker.
    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Borrow the tool configuration.
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Version string reported by `img2webp -version`.
    pub fn version(&mut self) -> WebpBinResult<String> {
        super::tool_version(&mut self.invoker, &self.config, IMG2WEBP)
    }

    /// Assemble the arguments, connect the output and run `img2webp` to completion.
    ///
    /// The frame list is cleared whatever the outcome.
    #[tracing::instrument(skip_all, fields(tool = IMG2WEBP))]
    pub fn run(&mut self) -> WebpBinResult<()> {
        let frames = std::mem::take(&mut self.frames);

        let mut args: Vec<OsString> = Vec::new();
        if self.mixed {
            args.push("-mixed".into());
        }
        if let Some(loop_count) = self.loop_count {
            args.push("-loop".into());
            args.push(loop_count.to_string().into());
        }
        if let Some(keyframes) = self.keyframes {
            args.push("-kmin".into());
            args.push(keyframes.min.to_string().into());
            args.push("-kmax".into());
            args.push(keyframes.max.to_string().into());
        }
        for frame in &frames {
            args.push(frame.locator.as_str().into());
            if frame.duration_ms != 0 {
                args.push("-d".into());
                args.push(frame.duration_ms.to_string().into());
            }
        }

        let (output, stdout) = resolve_output(&mut self.output)?;
        args.push("-o".into());
        args.push(output);

        if frames.is_empty() {
            return Err(WebpBinError::config("undefined input"));
        }

        let program = self.config.resolve_program(IMG2WEBP);
        tracing::debug!(
            program = %program.display(),
            frames = frames.len(),
            ?args,
            "running img2webp"
        );

        self.invoker
            .execute(Invocation {
                program: &program,
                args: &args,
                env: &self.config.env,
                stdin: None,
                stdout,
            })
            .map_err(|failure| {
                tracing::warn!(error = %failure, "img2webp failed");
                WebpBinError::execution(failure.to_string())
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/img2webp.rs"]
mod tests;
