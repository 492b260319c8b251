//! JPEG marker-segment walker.
//!
//! Checks oversized APPn/COM segments (room for hidden text or payloads), APP1 segments
//! without an Exif header, and bytes appended after the EOI marker.

use crate::bytes::{be_u16, plural_bytes};
use crate::result::{Finding, Stage};

const SOI: [u8; 2] = [0xFF, 0xD8];
const MARKER_EOI: u8 = 0xD9;
const MARKER_APP0: u8 = 0xE0;
const MARKER_APP1: u8 = 0xE1;
const MARKER_APP15: u8 = 0xEF;
const MARKER_COM: u8 = 0xFE;

/// APPn / COM segments longer than this are flagged.
pub const MAX_TEXT_SEGMENT_LEN: u16 = 2048;

/// Required start of an APP1 payload.
pub const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

fn text_segment_name(marker: u8) -> Option<String> {
    match marker {
        MARKER_COM => Some("COM".to_string()),
        MARKER_APP0..=MARKER_APP15 => Some(format!("APP{}", marker - MARKER_APP0)),
        _ => None,
    }
}

/// Walk JPEG marker segments after SOI up to EOI.
pub fn validate_jpeg(data: &[u8]) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !data.starts_with(&SOI) {
        findings.push(Finding::anomaly(
            Stage::Structure,
            "JPEG: missing or invalid SOI marker",
        ));
        return findings;
    }

    let mut pos = 2usize;
    let mut segments = 0usize;
    let mut eoi_end = None;

    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            // entropy-coded scan data
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        match marker {
            MARKER_EOI => {
                eoi_end = Some(pos + 2);
                break;
            }
            0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            // stuffed 0xFF00 inside scan data
            0x00 => {
                pos += 2;
                continue;
            }
            // fill byte before a marker
            0xFF => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let Some(length) = be_u16(data, pos + 2) else {
            findings.push(Finding::anomaly(
                Stage::Structure,
                format!(
                    "JPEG: segment 0x{:02X} at offset {} truncated before its length field",
                    marker, pos
                ),
            ));
            break;
        };
        segments += 1;

        if let Some(name) = text_segment_name(marker) {
            if length > MAX_TEXT_SEGMENT_LEN {
                findings.push(Finding::anomaly(
                    Stage::Structure,
                    format!("JPEG: oversized {} segment ({} bytes)", name, length),
                ));
            }
            if marker == MARKER_APP1 {
                let header = data.get(pos + 4..pos + 4 + EXIF_HEADER.len());
                if header != Some(EXIF_HEADER.as_slice()) {
                    findings.push(Finding::anomaly(
                        Stage::Structure,
                        format!("JPEG: APP1 segment at offset {} has no Exif header", pos),
                    ));
                }
            }
        }

        if length < 2 {
            findings.push(Finding::anomaly(
                Stage::Structure,
                format!(
                    "JPEG: invalid length {} for segment 0x{:02X} at offset {}",
                    length, marker, pos
                ),
            ));
            break;
        }
        pos += 2 + length as usize;
    }

    findings.push(Finding::info(
        Stage::Structure,
        format!("JPEG: {} marker segment(s) walked", segments),
    ));

    match eoi_end {
        Some(end) if end < data.len() => {
            findings.push(Finding::anomaly(
                Stage::Structure,
                format!(
                    "JPEG: {} trailing after EOI marker",
                    plural_bytes(data.len() - end)
                ),
            ));
        }
        Some(_) => {}
        None => findings.push(Finding::anomaly(
            Stage::Structure,
            "JPEG: EOI marker not found, file may be truncated",
        )),
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_jpeg() -> Vec<u8> {
        let mut v = vec![0xFF, 0xD8];
        // APP0 / JFIF, length 16
        v.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        v.extend_from_slice(b"JFIF\0");
        v.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
        // SOS with a tiny scan containing a stuffed byte and a restart marker
        v.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x04, 0x01, 0x00]);
        v.extend_from_slice(&[0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD0, 0x56]);
        v.extend_from_slice(&[0xFF, 0xD9]);
        v
    }

    #[test]
    fn clean_jpeg_has_no_anomaly() {
        let f = validate_jpeg(&minimal_jpeg());
        assert!(f.iter().all(|f| !f.is_anomaly()), "{:?}", f);
    }

    #[test]
    fn oversized_comment_and_bad_app1() {
        let mut v = vec![0xFF, 0xD8];
        v.extend_from_slice(&[0xFF, 0xFE]);
        v.extend_from_slice(&3000u16.to_be_bytes());
        v.extend(std::iter::repeat(b'A').take(2998));
        v.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x0A]);
        v.extend_from_slice(b"XMP\0\0\0\0\0");
        v.extend_from_slice(&[0xFF, 0xD9]);
        let f = validate_jpeg(&v);
        let anomalies: Vec<_> = f.iter().filter(|f| f.is_anomaly()).collect();
        assert_eq!(anomalies.len(), 2, "{:?}", f);
        assert!(anomalies[0].message.contains("COM"));
        assert!(anomalies[1].message.contains("Exif"));
    }

    #[test]
    fn zero_length_segment_stops_walk() {
        let v = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x00, 0xFF, 0xD9];
        let f = validate_jpeg(&v);
        assert!(f.iter().any(|f| f.message.contains("invalid length 0")));
    }
}
