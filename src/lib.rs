//! webpbin drives the libwebp command-line tools through a small builder API.
//!
//! Two builders share one execution seam:
//!
//! - [`Gif2Webp`] converts a GIF (file, byte stream or [`DecodedGif`]) into WebP.
//! - [`Img2Webp`] assembles an ordered list of still frames into an animated WebP.
//!
//! Each builder turns its settings into an ordered argument vector, picks the input and output
//! channels (named file or `-` plus a piped stream) and hands everything to a [`ToolInvoker`].
//! Failures carry the tool's own stderr.
//!
//! # Run lifecycle
//!
//! 1. **Configure**: chained setters, in any order. Input and output variants are last-set-wins.
//! 2. **Run**: per-run settings are taken out of the builder, arguments are assembled, channels are
//!    resolved (missing input/output fails before spawning) and the invoker runs the tool.
//! 3. **Reset**: the next run starts without the previous quality, crop or frame list.
//!
//! The codecs themselves live in the external binaries; nothing here inspects image content.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod exec;
mod foundation;
mod gif;
mod tools;

pub use exec::invoker::{Invocation, ProcessInvoker, ToolFailure, ToolInvoker};
pub use foundation::config::ToolConfig;
pub use foundation::error::{WebpBinError, WebpBinResult};
pub use gif::decoded::DecodedGif;
pub use gif::serialize::{GifSerializer, ImageGifSerializer};
pub use tools::channel::{
    END_OF_OPTIONS, InputKind, InputSource, OutputKind, OutputSink, STREAM_SENTINEL,
};
pub use tools::gif2webp::{CropRegion, GIF2WEBP, Gif2Webp};
pub use tools::img2webp::{FrameSpec, IMG2WEBP, Img2Webp, KeyframeInterval};

/// Re-exported so callers can build [`DecodedGif`] values without depending on `image` directly.
pub use image::{Delay, Frame, codecs::gif::Repeat};
