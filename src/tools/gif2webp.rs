use std::{
    ffi::OsString,
    io::{Read, Write},
    path::PathBuf,
};

use crate::{
    exec::invoker::{Invocation, ProcessInvoker, ToolInvoker},
    foundation::{
        config::ToolConfig,
        error::{WebpBinError, WebpBinResult},
    },
    gif::{
        decoded::DecodedGif,
        serialize::{GifSerializer, ImageGifSerializer},
    },
    tools::channel::{
        END_OF_OPTIONS, InputKind, InputSource, OutputKind, OutputSink, STREAM_SENTINEL,
        resolve_output,
    },
};

/// Default program name of the GIF converter.
pub const GIF2WEBP: &str = "gif2webp";

/// Source rectangle handed to `-crop`.
///
/// Passed through verbatim; the tool rejects rectangles outside the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Settings consumed by a single [`Gif2Webp::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RunSettings {
    quality: Option<u8>,
    crop: Option<CropRegion>,
}

/// Builder around `gif2webp`: converts one GIF (file, stream or decoded frames) into WebP.
///
/// ```text
/// gif2webp [-q N] [-crop X Y W H] [-mixed] -o <out|-> [-- -|path]
/// ```
///
/// Quality and crop only apply to the next [`run`](Self::run); input, output and mixed mode
/// stay selected until replaced.
pub struct Gif2Webp<'a, I = ProcessInvoker, S = ImageGifSerializer> {
    config: ToolConfig,
    invoker: I,
    serializer: S,
    input: Option<InputSource<'a>>,
    output: Option<OutputSink<'a>>,
    settings: RunSettings,
    mixed: bool,
}

impl<'a> Gif2Webp<'a> {
    /// Builder that spawns the real `gif2webp`.
    pub fn new(config: ToolConfig) -> Self {
        Self::with_invoker(config, ProcessInvoker)
    }
}

impl<'a, I: ToolInvoker> Gif2Webp<'a, I> {
    /// Builder that runs through `invoker`.
    pub fn with_invoker(config: ToolConfig, invoker: I) -> Self {
        Self {
            config,
            invoker,
            serializer: ImageGifSerializer::default(),
            input: None,
            output: None,
            settings: RunSettings::default(),
            mixed: false,
        }
    }
}

impl<'a, I: ToolInvoker, S: GifSerializer> Gif2Webp<'a, I, S> {
    /// Swap the serializer used for [`set_input_image`](Self::set_input_image) sources.
    pub fn with_serializer<T: GifSerializer>(self, serializer: T) -> Gif2Webp<'a, I, T> {
        Gif2Webp {
            config: self.config,
            invoker: self.invoker,
            serializer,
            input: self.input,
            output: self.output,
            settings: self.settings,
            mixed: self.mixed,
        }
    }

    /// Read the GIF from `path`. Replaces any stream or image input.
    pub fn set_input_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.input = Some(InputSource::File(path.into()));
        self
    }

    /// Pipe the GIF from `reader`. Replaces any file or image input.
    pub fn set_input_stream(&mut self, reader: &'a mut (dyn Read + Send)) -> &mut Self {
        self.input = Some(InputSource::Stream(reader));
        self
    }

    /// Re-encode `gif` and pipe it in. Replaces any file or stream input.
    pub fn set_input_image(&mut self, gif: &'a DecodedGif) -> &mut Self {
        self.input = Some(InputSource::Image(gif));
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

    /// Compression factor for the next run. Values above 100 are clamped.
    ///
    /// Smaller values give smaller, lower quality files. Unset leaves the tool default (75).
    pub fn set_quality(&mut self, quality: u32) -> &mut Self {
        self.settings.quality = Some(quality.min(100) as u8);
        self
    }

    /// Crop the source to `width x height` at `(x, y)` for the next run.
    pub fn set_crop(&mut self, x: u32, y: u32, width: u32, height: u32) -> &mut Self {
        self.settings.crop = Some(CropRegion {
            x,
            y,
            width,
            height,
        });
        self
    }

    /// Let the tool pick lossy or lossless per frame.
    pub fn set_mixed(&mut self, mixed: bool) -> &mut Self {
        self.mixed = mixed;
        self
    }

    /// Drop any quality and crop configured for the next run.
    pub fn reset(&mut self) -> &mut Self {
        self.settings = RunSettings::default();
        self
    }

    /// Quality pending for the next run.
    pub fn quality(&self) -> Option<u8> {
        self.settings.quality
    }

    /// Crop pending for the next run.
    pub fn crop(&self) -> Option<CropRegion> {
        self.settings.crop
    }

    /// Whether mixed mode is on.
    pub fn mixed(&self) -> bool {
        self.mixed
    }

    /// Active input variant, if any.
    pub fn input_kind(&self) -> Option<InputKind> {
        self.input.as_ref().map(InputSource::kind)
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

    /// Version string reported by `gif2webp -version`.
    pub fn version(&mut self) -> WebpBinResult<String> {
        super::tool_version(&mut self.invoker, &self.config, GIF2WEBP)
    }

    /// Assemble the arguments, connect the channels and run `gif2webp` to completion.
    ///
    /// Quality and crop are reset whatever the outcome.
    #[tracing::instrument(skip_all, fields(tool = GIF2WEBP))]
    pub fn run(&mut self) -> WebpBinResult<()> {
        let settings = std::mem::take(&mut self.settings);

        let mut args: Vec<OsString> = Vec::new();
        if let Some(quality) = settings.quality {
            args.push("-q".into());
            args.push(quality.to_string().into());
        }
        if let Some(crop) = settings.crop {
            args.push("-crop".into());
            args.extend(
                [crop.x, crop.y, crop.width, crop.height].map(|v| OsString::from(v.to_string())),
            );
        }
        if self.mixed {
            args.push("-mixed".into());
        }

        let (output, stdout) = resolve_output(&mut self.output)?;
        args.push("-o".into());
        args.push(output);

        let serialized: Vec<u8>;
        let mut serialized_reader: &[u8];
        let stdin: Option<&mut (dyn Read + Send)> = match &mut self.input {
            Some(InputSource::Stream(reader)) => {
                args.push(END_OF_OPTIONS.into());
                args.push(STREAM_SENTINEL.into());
                let reader: &mut (dyn Read + Send) = &mut **reader;
                Some(reader)
            }
            Some(InputSource::Image(gif)) => {
                serialized = self.serializer.serialize(gif)?;
                serialized_reader = &serialized;
                args.push(END_OF_OPTIONS.into());
                args.push(STREAM_SENTINEL.into());
                let reader: &mut (dyn Read + Send) = &mut serialized_reader;
                Some(reader)
            }
            Some(InputSource::File(path)) if !path.as_os_str().is_empty() => {
                args.push(path.clone().into_os_string());
                None
            }
            _ => return Err(WebpBinError::config("undefined input")),
        };

        let program = self.config.resolve_program(GIF2WEBP);
        tracing::debug!(program = %program.display(), ?args, "running gif2webp");

        self.invoker
            .execute(Invocation {
                program: &program,
                args: &args,
                env: &self.config.env,
                stdin,
                stdout,
            })
            .map_err(|failure| {
                tracing::warn!(error = %failure, "gif2webp failed");
                WebpBinError::execution(failure.to_string())
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/gif2webp.rs"]
mod tests;
