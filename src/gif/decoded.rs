use std::io::{BufRead, Seek};

use anyhow::Context as _;
use image::{AnimationDecoder as _, Frame, codecs::gif::Repeat};

use crate::foundation::error::WebpBinResult;

/// A GIF held in memory as decoded RGBA frames.
///
/// Frame order is animation order. Each frame keeps its own delay and offset.
#[derive(Clone)]
pub struct DecodedGif {
    /// Frames in display order.
    pub frames: Vec<Frame>,
    /// Loop behaviour written back when the GIF is re-encoded.
    pub repeat: Repeat,
}

impl std::fmt::Debug for DecodedGif {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedGif")
            .field("frames", &self.frames.len())
            .field("repeat", &self.repeat)
            .finish()
    }
}

impl DecodedGif {
    /// Looping animation from `frames`.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            repeat: Repeat::Infinite,
        }
    }

    /// Override the loop behaviour.
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Decode every frame of a GIF stream.
    pub fn decode<R: BufRead + Seek>(reader: R) -> WebpBinResult<Self> {
        let decoder = image::codecs::gif::GifDecoder::new(reader).context("open gif decoder")?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .context("decode gif frames")?;
        Ok(Self::new(frames))
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
