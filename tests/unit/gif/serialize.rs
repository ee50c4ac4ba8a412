use super::*;

use image::{Delay, Frame, Rgba, RgbaImage, codecs::gif::Repeat};

fn solid_frame(rgba: [u8; 4]) -> Frame {
    Frame::from_parts(
        RgbaImage::from_pixel(4, 4, Rgba(rgba)),
        0,
        0,
        Delay::from_numer_denom_ms(100, 1),
    )
}

#[test]
fn empty_gif_is_rejected() {
    let err = ImageGifSerializer::default()
        .serialize(&DecodedGif::new(Vec::new()))
        .unwrap_err();
    assert!(matches!(err, WebpBinError::Serialize(_)));
}

#[test]
fn serialized_bytes_are_a_gif_that_decodes_back() {
    let gif = DecodedGif::new(vec![
        solid_frame([255, 0, 0, 255]),
        solid_frame([0, 0, 255, 255]),
    ])
    .with_repeat(Repeat::Finite(3));

    let bytes = ImageGifSerializer::default().serialize(&gif).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    assert_eq!(bytes.last(), Some(&0x3B), "missing GIF trailer");

    let decoded = DecodedGif::decode(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.frames[0].buffer().dimensions(), (4, 4));
}

#[test]
fn speed_is_clamped() {
    let gif = DecodedGif::new(vec![solid_frame([1, 2, 3, 255])]);
    for speed in [-5, 0, 1, 30, 99] {
        let bytes = ImageGifSerializer::with_speed(speed).serialize(&gif).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }
}

#[test]
fn garbage_does_not_decode() {
    let err = DecodedGif::decode(std::io::Cursor::new(b"not a gif".to_vec())).unwrap_err();
    assert!(matches!(err, WebpBinError::Other(_)));
}
