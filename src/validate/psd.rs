//! PSD: signature, header fields, size ceiling.

use crate::bytes::{be_u16, be_u32};
use crate::result::{Finding, Stage};

/// PSD files above this size are flagged.
pub const PSD_MAX_SIZE: usize = 100 * 1024 * 1024;

const PSD_SIGNATURE: &[u8; 4] = b"8BPS";

pub fn validate_psd(data: &[u8]) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !data.starts_with(PSD_SIGNATURE) {
        findings.push(Finding::anomaly(
            Stage::Structure,
            "PSD: corrupted or unsupported header",
        ));
    } else if let (Some(version), Some(channels), Some(height), Some(width), Some(depth)) = (
        be_u16(data, 4),
        be_u16(data, 12),
        be_u32(data, 14),
        be_u32(data, 18),
        be_u16(data, 22),
    ) {
        let kind = match version {
            1 => "PSD",
            2 => "PSB",
            _ => "unknown version",
        };
        findings.push(Finding::info(
            Stage::Structure,
            format!(
                "PSD: {} v{}, {}x{}, {} channel(s), {} bits",
                kind, version, width, height, channels, depth
            ),
        ));
    }

    if data.len() > PSD_MAX_SIZE {
        findings.push(Finding::anomaly(
            Stage::Structure,
            format!("PSD: unusually large file ({} bytes)", data.len()),
        ));
    }

    findings
}
