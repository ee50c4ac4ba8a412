//! In-memory GIF input for `gif2webp`.

/// Decoded GIF container.
pub mod decoded;
/// Decoded GIF -> GIF bytes.
pub mod serialize;
