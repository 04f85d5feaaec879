use std::io::Cursor;

use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_frame_png_dimensions_and_premul() {
    let frame = decode_frame(&png_bytes(vec![100, 50, 200, 128], 1, 1)).unwrap();
    assert_eq!(frame.width, 1);
    assert_eq!(frame.height, 1);
    assert_eq!(
        frame.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn fully_transparent_pixels_are_zeroed() {
    let frame = decode_frame(&png_bytes(vec![9, 9, 9, 0, 1, 2, 3, 255], 2, 1)).unwrap();
    assert_eq!(frame.rgba8_premul.as_slice(), &[0, 0, 0, 0, 1, 2, 3, 255]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_frame(b"not a png").is_err());
}
