//! Format sniffing from magic bytes.

use decoy::sniff::{first_match, SignatureTarget, SIGNATURES};
use decoy::{detect_format, FormatTag};

fn padded(prefix: &[u8], len: usize) -> Vec<u8> {
    let mut v = prefix.to_vec();
    v.resize(len.max(prefix.len()), 0);
    v
}

#[test]
fn every_signature_needs_twelve_bytes() {
    for sig in SIGNATURES {
        let mut v = vec![0u8; sig.offset];
        v.extend_from_slice(sig.magic);
        v.resize(v.len().max(12), 0);
        for len in 0..12 {
            assert_eq!(detect_format(&v[..len]), FormatTag::Unknown, "len={}", len);
        }
    }
    assert_eq!(detect_format(&[]), FormatTag::Unknown);
    assert_eq!(detect_format(b"\xFF\xD8\xFF\xE0\0\0\0\0\0\0\0"), FormatTag::Unknown);
}

#[test]
fn detect_common_images() {
    assert_eq!(detect_format(&padded(&[0xFF, 0xD8, 0xFF, 0xE0], 12)), FormatTag::Jpeg);
    assert_eq!(
        detect_format(&padded(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], 12)),
        FormatTag::Png
    );
    assert_eq!(detect_format(&padded(b"BM", 12)), FormatTag::Bmp);
    assert_eq!(detect_format(&padded(b"GIF89a", 12)), FormatTag::Gif);
    assert_eq!(detect_format(&padded(b"8BPS", 12)), FormatTag::Psd);
    assert_eq!(detect_format(&padded(b"MM\0*", 12)), FormatTag::Tiff);
    assert_eq!(detect_format(&padded(b"II*\0", 12)), FormatTag::Tiff);
}

#[test]
fn detect_media_containers() {
    assert_eq!(detect_format(&padded(b"ID3\x04", 12)), FormatTag::Mp3);
    assert_eq!(detect_format(&padded(b"\0\0\0\x18ftypisom", 12)), FormatTag::Mp4);
    assert_eq!(detect_format(&padded(&[0, 0, 0, 1, 0x40, 1], 12)), FormatTag::Hevc);
    assert_eq!(detect_format(&padded(b"\0\0\0\0AV1", 12)), FormatTag::Av1);
    assert_eq!(detect_format(&padded(&[0xD7, 0xCD, 0xC6, 0x9A], 12)), FormatTag::Wmf);
}

#[test]
fn riff_webp_vs_avi() {
    let mut webp = b"RIFF\x10\0\0\0WEBP".to_vec();
    webp.extend_from_slice(b"VP8 ");
    assert_eq!(detect_format(&webp), FormatTag::Webp);
    assert_eq!(detect_format(b"RIFF\x10\0\0\0AVI "), FormatTag::Avi);
    assert_eq!(detect_format(b"RIFF\x10\0\0\0WAVE"), FormatTag::Avi);
}

#[test]
fn tiff_prefix_shadows_raw_formats() {
    let cr2 = padded(&[0x49, 0x49, 0x2A, 0x00, 0x10, 0x00, 0x00, 0x00, b'C', b'R'], 16);
    assert_eq!(detect_format(&cr2), FormatTag::Tiff);
    let matched = first_match(&cr2).unwrap();
    let idx = SIGNATURES.iter().position(|s| s == matched).unwrap();
    assert_eq!(idx, 11);
    assert_eq!(matched.magic, b"II*\0");

    // the longer CR2 rule is in the table but never reached
    let cr2_rule = SIGNATURES
        .iter()
        .position(|s| s.target == SignatureTarget::Format(FormatTag::Cr2))
        .unwrap();
    assert!(cr2_rule > idx);
}

#[test]
fn emf_rule_reads_offset_forty() {
    let mut v = vec![0u8; 44];
    v[40..44].copy_from_slice(&[0x01, 0, 0, 0]);
    assert_eq!(detect_format(&v), FormatTag::Emf);
}

#[test]
fn no_match_is_unknown() {
    assert_eq!(detect_format(&[0u8; 64]), FormatTag::Unknown);
    assert_eq!(detect_format(b"%PDF-1.7\n%\xE2\xE3"), FormatTag::Unknown);
}
