//! End-to-end tests: encode, render, transform the raster, decode.

use image::imageops::{self, FilterType};
use image::GrayImage;
use proptest::prelude::*;
use qr_codec::encoder::Segment;
use qr_codec::symbol::FunctionMask;
use qr_codec::symbol::placement::data_positions;
use qr_codec::utils::geometry::PerspectiveTransform;
use qr_codec::{
    BitMatrix, ECLevel, EncodeOptions, Frame, MaskPattern, Mode, Point, QrError, Renderer,
    Version, decode, decode_frame, decode_matrix, encode, encode_symbol, encode_with,
};

fn render(matrix: &BitMatrix, scale: u32) -> GrayImage {
    Renderer {
        scale,
        ..Renderer::default()
    }
    .to_luma(matrix)
}

fn decode_image(image: &GrayImage) -> qr_codec::Result<qr_codec::QRCode> {
    decode(image.as_raw(), image.width() as usize, image.height() as usize)
}

fn assert_round_trip(text: &str) {
    let matrix = encode(text, ECLevel::M).unwrap();
    let qr = decode_matrix(&matrix).unwrap();
    assert_eq!(qr.content, text);
    let qr = decode_image(&render(&matrix, 4)).unwrap();
    assert_eq!(qr.content, text);
}

#[test]
fn test_numeric_round_trip() {
    assert_round_trip("0123456789012345678901234567890");
}

#[test]
fn test_alphanumeric_round_trip() {
    assert_round_trip("HELLO WORLD $%*+-./:");
}

#[test]
fn test_byte_ascii_round_trip() {
    assert_round_trip("Hello, world! https://example.com/?q=rust");
}

#[test]
fn test_byte_utf8_round_trip() {
    assert_round_trip("héllo wörld ✓ Ελληνικά");
}

#[test]
fn test_kanji_round_trip() {
    let text = "日本語の漢字";
    assert_eq!(Segment::from_text(text).mode(), Mode::Kanji);
    assert_round_trip(text);
    let qr = decode_matrix(&encode(text, ECLevel::M).unwrap()).unwrap();
    // Raw payload is Shift JIS, two bytes per character
    assert_eq!(qr.data.len(), 12);
}

#[test]
fn test_hello() {
    let matrix = encode("HELLO", ECLevel::M).unwrap();
    assert_eq!(matrix.width(), 21);
    let qr = decode_matrix(&matrix).unwrap();
    assert_eq!(qr.content, "HELLO");
    assert_eq!(qr.data, b"HELLO");
    assert_eq!(qr.version, Version::MIN);
    assert_eq!(qr.error_correction, ECLevel::M);
}

#[test]
fn test_numeric_is_shorter_than_byte() {
    let segment = Segment::from_text("12345");
    assert_eq!(segment.mode(), Mode::Numeric);
    let byte_bits = 4 + 8 + 5 * 8;
    assert!(segment.bit_len(Version::MIN) < byte_bits);
    assert_eq!(segment.bit_len(Version::MIN), 4 + 10 + 17);
}

#[test]
fn test_capacity_boundary() {
    let fits = "a".repeat(2953);
    let matrix = encode(&fits, ECLevel::L).unwrap();
    assert_eq!(matrix.width(), 177);
    assert_eq!(decode_matrix(&matrix).unwrap().content, fits);

    let too_long = "a".repeat(2954);
    assert!(matches!(
        encode(&too_long, ECLevel::L),
        Err(QrError::CapacityExceeded {
            ec_level: ECLevel::L,
            ..
        })
    ));
}

#[test]
fn test_forced_version_too_small() {
    let options = EncodeOptions {
        version: Version::new(1),
        ..EncodeOptions::new(ECLevel::H)
    };
    assert!(matches!(
        encode_with(&"x".repeat(40), &options),
        Err(QrError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_deterministic_mask_selection() {
    let text = "determinism matters";
    let first = encode_symbol(text, &EncodeOptions::default()).unwrap();
    for _ in 0..5 {
        assert_eq!(encode_symbol(text, &EncodeOptions::default()).unwrap(), first);
    }
}

/// Flip one module in each of the listed codewords of a version 1 symbol
fn damage_codewords(matrix: &mut BitMatrix, codewords: &[usize]) {
    let positions = data_positions(&FunctionMask::new(Version::MIN));
    for &index in codewords {
        let (x, y) = positions[index * 8 + 3];
        matrix.toggle(x, y);
    }
}

#[test]
fn test_error_tolerance_within_capacity() {
    // Version 1-M: one block with 10 EC codewords corrects 5
    let mut matrix = encode("HELLO", ECLevel::M).unwrap();
    damage_codewords(&mut matrix, &[0, 3, 9, 17, 25]);
    assert_eq!(decode_matrix(&matrix).unwrap().content, "HELLO");
}

#[test]
fn test_damage_beyond_capacity_is_uncorrectable() {
    let mut matrix = encode("HELLO", ECLevel::M).unwrap();
    damage_codewords(&mut matrix, &[0, 1, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
    assert_eq!(
        decode_matrix(&matrix),
        Err(QrError::UncorrectableError { block: 0 })
    );
}

#[test]
fn test_damaged_first_format_copy_uses_second() {
    let options = EncodeOptions {
        mask: Some(MaskPattern::Pattern6),
        ..EncodeOptions::new(ECLevel::L)
    };
    let mut matrix = encode_with("HELLO WORLD", &options).unwrap();
    // Six flips leave the top-left copy three bits from the Pattern7 word
    for y in 0..6 {
        matrix.toggle(8, y);
    }
    let qr = decode_matrix(&matrix).unwrap();
    assert_eq!(qr.content, "HELLO WORLD");
    assert_eq!(qr.mask_pattern, MaskPattern::Pattern6);
}

/// Warp `image` through a homography that narrows the top edge by `inset`
/// of the width on each side, on a 20 px white margin
fn keystone(image: &GrayImage, inset: f32) -> GrayImage {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let margin = 20.0;
    let square = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];
    let quad = [
        Point::new(margin + inset * w, margin),
        Point::new(margin + w - inset * w, margin),
        Point::new(margin + w, margin + h),
        Point::new(margin, margin + h),
    ];
    let to_source = PerspectiveTransform::from_points(&quad, &square).unwrap();
    let (out_w, out_h) = ((w + 2.0 * margin) as u32, (h + 2.0 * margin) as u32);
    GrayImage::from_fn(out_w, out_h, |x, y| {
        let p = to_source.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
        if p.x >= 0.0 && p.y >= 0.0 && p.x < w && p.y < h {
            *image.get_pixel(p.x as u32, p.y as u32)
        } else {
            image::Luma([255])
        }
    })
}

#[test]
fn test_keystone_decodes() {
    for version in [2u8, 5, 10] {
        let options = EncodeOptions {
            version: Version::new(version),
            ..EncodeOptions::new(ECLevel::M)
        };
        let text = format!("keystone v{version}");
        let matrix = encode_with(&text, &options).unwrap();
        // 10% narrower at the top
        let warped = keystone(&render(&matrix, 5), 0.05);
        let qr = decode_image(&warped).unwrap_or_else(|e| panic!("version {version}: {e}"));
        assert_eq!(qr.content, text);
        assert_eq!(qr.version.number(), version);
    }
}

#[test]
fn test_rotations_decode() {
    let matrix = encode("rotate me 123", ECLevel::M).unwrap();
    let base = render(&matrix, 4);
    for rotated in [
        imageops::rotate90(&base),
        imageops::rotate180(&base),
        imageops::rotate270(&base),
    ] {
        let qr = decode_image(&rotated).unwrap();
        assert_eq!(qr.content, "rotate me 123");
        assert!(!qr.mirrored);
    }
}

#[test]
fn test_scales_decode() {
    let matrix = encode("scale invariance", ECLevel::M).unwrap();
    let base = render(&matrix, 4);
    let (w, h) = base.dimensions();
    for factor in [0.5f32, 1.5, 2.0, 3.0] {
        let scaled = imageops::resize(
            &base,
            (w as f32 * factor) as u32,
            (h as f32 * factor) as u32,
            FilterType::Nearest,
        );
        let qr = decode_image(&scaled).unwrap_or_else(|e| panic!("factor {factor}: {e}"));
        assert_eq!(qr.content, "scale invariance");
    }
}

#[test]
fn test_mirrored_symbol_decodes() {
    let matrix = encode("mirror", ECLevel::M).unwrap();
    let flipped = imageops::flip_horizontal(&render(&matrix, 4));
    let qr = decode_image(&flipped).unwrap();
    assert_eq!(qr.content, "mirror");
    assert!(qr.mirrored);
}

#[test]
fn test_version_7_with_alignment_and_version_info() {
    let options = EncodeOptions {
        version: Version::new(7),
        mask: Some(MaskPattern::Pattern2),
        ..EncodeOptions::new(ECLevel::Q)
    };
    let matrix = encode_with("alignment patterns and version blocks", &options).unwrap();
    let qr = decode_image(&render(&matrix, 3)).unwrap();
    assert_eq!(qr.content, "alignment patterns and version blocks");
    assert_eq!(qr.version.number(), 7);
    assert_eq!(qr.mask_pattern, MaskPattern::Pattern2);
}

#[test]
fn test_symbol_inside_larger_frame() {
    let matrix = encode("camera frame", ECLevel::H).unwrap();
    let symbol = render(&matrix, 5);
    // Grey background with the symbol pasted off-centre, then a padded stride
    let mut canvas = GrayImage::from_pixel(320, 240, image::Luma([140]));
    imageops::overlay(&mut canvas, &symbol, 90, 40);
    let stride = 336;
    let mut plane = vec![0u8; stride * 240];
    for (y, row) in canvas.as_raw().chunks(320).enumerate() {
        plane[y * stride..y * stride + 320].copy_from_slice(row);
    }
    let frame = Frame::with_stride(&plane, 320, 240, stride).unwrap();
    let qr = decode_frame(&frame).unwrap();
    assert_eq!(qr.content, "camera frame");
    let tl = qr.position[0];
    assert!((tl.x - 110.0).abs() < 2.0 && (tl.y - 60.0).abs() < 2.0, "{tl:?}");
}

#[test]
fn test_uniform_gray_is_not_found() {
    let gray = vec![128u8; 200 * 150];
    let err = decode(&gray, 200, 150).unwrap_err();
    assert_eq!(err, QrError::NotFound);
    assert!(err.is_not_found());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_printable_round_trip(text in "[ -~]{0,120}") {
        let matrix = encode(&text, ECLevel::M).unwrap();
        prop_assert_eq!(decode_matrix(&matrix).unwrap().content, text);
    }

    #[test]
    fn prop_unicode_round_trip(text in "\\PC{0,40}") {
        let matrix = encode(&text, ECLevel::M).unwrap();
        prop_assert_eq!(decode_matrix(&matrix).unwrap().content, text);
    }

    #[test]
    fn prop_digits_round_trip(text in "[0-9]{1,200}", level in 0usize..4) {
        let ec_level = ECLevel::ALL[level];
        let matrix = encode(&text, ec_level).unwrap();
        let qr = decode_matrix(&matrix).unwrap();
        prop_assert_eq!(qr.error_correction, ec_level);
        prop_assert_eq!(qr.content, text);
    }
}
