//! WebP RIFF sub-chunk walker.

use crate::bytes::{fourcc, le_u32, tag_display};
use crate::result::{Finding, Stage};

/// Sub-chunk ids considered standard; anything else is flagged.
pub const WEBP_ALLOWED_CHUNKS: &[&[u8; 4]] = &[b"VP8 ", b"VP8L", b"VP8X", b"ALPH", b"ANIM", b"ANMF"];

const RIFF_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

pub fn validate_webp(data: &[u8]) -> Vec<Finding> {
    let mut findings = Vec::new();

    if data.get(..4) != Some(b"RIFF".as_slice()) || data.get(8..12) != Some(b"WEBP".as_slice()) {
        findings.push(Finding::anomaly(
            Stage::Structure,
            "WebP: invalid RIFF/WEBP header",
        ));
        return findings;
    }

    let mut pos = RIFF_HEADER_LEN;
    let mut chunks = 0usize;

    while pos + CHUNK_HEADER_LEN <= data.len() {
        let (Some(id), Some(size)) = (fourcc(data, pos), le_u32(data, pos + 4)) else {
            break;
        };
        chunks += 1;
        let name = tag_display(&id);

        if !WEBP_ALLOWED_CHUNKS.contains(&&id) {
            findings.push(Finding::anomaly(
                Stage::Structure,
                format!("WebP: non-standard chunk '{}' ({} bytes)", name, size),
            ));
        }

        let padded = (size as usize).saturating_add(size as usize & 1);
        let next = (pos + CHUNK_HEADER_LEN).saturating_add(padded);
        if (pos + CHUNK_HEADER_LEN).saturating_add(size as usize) > data.len() {
            findings.push(Finding::anomaly(
                Stage::Structure,
                format!(
                    "WebP: chunk '{}' at offset {} declares {} bytes past end of file",
                    name, pos, size
                ),
            ));
            break;
        }
        pos = next;
    }

    findings.push(Finding::info(
        Stage::Structure,
        format!("WebP: {} chunk(s) walked", chunks),
    ));

    findings
}
