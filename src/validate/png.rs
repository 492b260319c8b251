//! PNG chunk walker. CRCs are read past but not verified.

use crate::bytes::{be_u32, fourcc, plural_bytes, tag_display};
use crate::result::{Finding, Stage};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Chunk types considered standard; anything else is flagged.
pub const PNG_ALLOWED_CHUNKS: &[&[u8; 4]] = &[
    b"IHDR", b"PLTE", b"IDAT", b"IEND", b"tEXt", b"zTXt", b"iTXt", b"pHYs", b"gAMA", b"cHRM",
    b"sRGB", b"bKGD", b"hIST", b"iCCP", b"sBIT", b"tIME", b"tRNS",
];

const MAX_TEXT_CHUNK_LEN: u32 = 2048;
const CHUNK_HEADER_LEN: usize = 8;
const CRC_LEN: usize = 4;

/// Walk PNG chunks from the signature to IEND.
pub fn validate_png(data: &[u8]) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !data.starts_with(&PNG_SIGNATURE) {
        findings.push(Finding::anomaly(Stage::Structure, "PNG: invalid signature"));
        return findings;
    }

    let mut index = PNG_SIGNATURE.len();
    let mut chunks = 0usize;
    let mut found_iend = false;

    while index + CHUNK_HEADER_LEN <= data.len() {
        let (Some(length), Some(chunk_type)) = (be_u32(data, index), fourcc(data, index + 4))
        else {
            break;
        };
        index += CHUNK_HEADER_LEN;
        chunks += 1;
        let name = tag_display(&chunk_type);

        if !PNG_ALLOWED_CHUNKS.contains(&&chunk_type) {
            findings.push(Finding::anomaly(
                Stage::Structure,
                format!("PNG: non-standard chunk '{}' ({} bytes)", name, length),
            ));
        }

        let data_end = index.saturating_add(length as usize);

        if matches!(&chunk_type, b"tEXt" | b"iTXt" | b"zTXt") {
            let Some(payload) = data.get(index..data_end) else {
                break;
            };
            if length > MAX_TEXT_CHUNK_LEN {
                findings.push(Finding::anomaly(
                    Stage::Structure,
                    format!("PNG: oversized text chunk '{}' ({} bytes)", name, length),
                ));
            }
            if matches!(&chunk_type, b"tEXt" | b"iTXt") && !payload.contains(&0) {
                findings.push(Finding::anomaly(
                    Stage::Structure,
                    format!("PNG: text chunk '{}' has no NUL keyword separator", name),
                ));
            }
        }

        if &chunk_type == b"IEND" {
            found_iend = true;
            let chunk_end = data_end.saturating_add(CRC_LEN).min(data.len());
            if chunk_end < data.len() {
                findings.push(Finding::anomaly(
                    Stage::Structure,
                    format!("PNG: {} trailing after IEND", plural_bytes(data.len() - chunk_end)),
                ));
            }
            break;
        }

        let next = data_end.saturating_add(CRC_LEN);
        if next > data.len() {
            break;
        }
        index = next;
    }

    findings.push(Finding::info(
        Stage::Structure,
        format!("PNG: {} chunk(s) walked", chunks),
    ));

    if !found_iend {
        findings.push(Finding::anomaly(
            Stage::Structure,
            "PNG: IEND chunk not found, file truncated or corrupted",
        ));
    }

    findings
}
