use image::codecs::gif::GifEncoder;

use crate::{
    foundation::error::{WebpBinError, WebpBinResult},
    gif::decoded::DecodedGif,
};

/// Turns a [`DecodedGif`] back into a GIF byte stream.
pub trait GifSerializer {
    /// Encode `gif` as standard GIF bytes.
    fn serialize(&self, gif: &DecodedGif) -> WebpBinResult<Vec<u8>>;
}

/// [`GifSerializer`] built on the `image` crate's GIF encoder.
#[derive(Clone, Copy, Debug)]
pub struct ImageGifSerializer {
    speed: i32,
}

impl ImageGifSerializer {
    /// Serializer with an explicit NeuQuant speed (1 = best palette, 30 = fastest).
    pub fn with_speed(speed: i32) -> Self {
        Self {
            speed: speed.clamp(1, 30),
        }
    }
}

impl Default for ImageGifSerializer {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

impl GifSerializer for ImageGifSerializer {
    fn serialize(&self, gif: &DecodedGif) -> WebpBinResult<Vec<u8>> {
        if gif.is_empty() {
            return Err(WebpBinError::serialize("gif has no frames"));
        }

        let mut bytes: Vec<u8> = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut bytes, self.speed);
            encoder
                .set_repeat(gif.repeat)
                .map_err(|e| WebpBinError::serialize(format!("failed to set GIF repeat: {e}")))?;
            for (i, frame) in gif.frames.iter().enumerate() {
                encoder.encode_frame(frame.clone()).map_err(|e| {
                    WebpBinError::serialize(format!("failed to encode GIF frame {i}: {e}"))
                })?;
            }
            // The trailer is written when the encoder drops.
        }

        tracing::debug!(
            frames = gif.len(),
            bytes = bytes.len(),
            "serialized decoded gif"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gif/serialize.rs"]
mod tests;
