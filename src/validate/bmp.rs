//! BMP: compare the file size field against the actual buffer length.

use crate::bytes::{le_u32, plural_bytes};
use crate::result::{Finding, Stage};

/// Check the `BM` magic and the declared file size at offset 2.
pub fn validate_bmp(data: &[u8]) -> Vec<Finding> {
    let mut findings = Vec::new();

    let declared = match (data.starts_with(b"BM"), le_u32(data, 2)) {
        (true, Some(declared)) => declared as usize,
        _ => {
            findings.push(Finding::anomaly(
                Stage::Structure,
                "BMP: invalid or truncated header",
            ));
            return findings;
        }
    };

    findings.push(Finding::info(
        Stage::Structure,
        format!("BMP: declared size {} bytes, actual {} bytes", declared, data.len()),
    ));

    if data.len() > declared {
        findings.push(Finding::anomaly(
            Stage::Structure,
            format!(
                "BMP: {} appended beyond declared size",
                plural_bytes(data.len() - declared)
            ),
        ));
    } else if data.len() < declared {
        findings.push(Finding::info(
            Stage::Structure,
            format!(
                "BMP: {} shorter than declared size",
                plural_bytes(declared - data.len())
            ),
        ));
    }

    findings
}
