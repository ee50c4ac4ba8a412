use std::{
    ffi::OsString,
    io::{Read, Write},
    path::PathBuf,
};

use crate::{
    foundation::error::{WebpBinError, WebpBinResult},
    gif::decoded::DecodedGif,
};

/// Token that tells the tools to use stdin/stdout instead of a named file.
pub const STREAM_SENTINEL: &str = "-";
/// End-of-options marker placed before a positional stdin sentinel.
pub const END_OF_OPTIONS: &str = "--";

/// Where the tool reads its source from. Exactly one variant is active.
pub enum InputSource<'a> {
    /// Named file passed as a positional argument.
    File(PathBuf),
    /// Caller-owned reader piped to stdin.
    Stream(&'a mut (dyn Read + Send)),
    /// Decoded GIF serialized and piped to stdin.
    Image(&'a DecodedGif),
}

impl InputSource<'_> {
    /// Which variant is active.
    pub fn kind(&self) -> InputKind {
        match self {
            Self::File(_) => InputKind::File,
            Self::Stream(_) => InputKind::Stream,
            Self::Image(_) => InputKind::Image,
        }
    }
}

/// Where the tool writes its result. Exactly one variant is active.
pub enum OutputSink<'a> {
    /// Named output file.
    File(PathBuf),
    /// Caller-owned writer connected to stdout.
    Stream(&'a mut dyn Write),
}

impl OutputSink<'_> {
    /// Which variant is active.
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::File(_) => OutputKind::File,
            Self::Stream(_) => OutputKind::Stream,
        }
    }
}

/// Discriminant of [`InputSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// [`InputSource::File`].
    File,
    /// [`InputSource::Stream`].
    Stream,
    /// [`InputSource::Image`].
    Image,
}

/// Discriminant of [`OutputSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// [`OutputSink::File`].
    File,
    /// [`OutputSink::Stream`].
    Stream,
}

/// Resolve the `-o` token and the stdout connection for one run.
///
/// An empty file path counts as unset.
pub(crate) fn resolve_output<'s>(
    sink: &'s mut Option<OutputSink<'_>>,
) -> WebpBinResult<(OsString, Option<&'s mut dyn Write>)> {
    match sink {
        Some(OutputSink::Stream(writer)) => {
            let writer: &'s mut dyn Write = &mut **writer;
            Ok((STREAM_SENTINEL.into(), Some(writer)))
        }
        Some(OutputSink::File(path)) if !path.as_os_str().is_empty() => {
            Ok((path.clone().into_os_string(), None))
        }
        _ => Err(WebpBinError::config("undefined output")),
    }
}
