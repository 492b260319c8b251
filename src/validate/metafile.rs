//! EMF / WMF metafiles. The two are told apart by the ` EMF` signature at offset 40.

use crate::bytes::{le_u32, plural_bytes};
use crate::result::{Finding, Stage};

/// Smallest buffer that can hold an EMF header up to its signature.
pub const METAFILE_MIN_LEN: usize = 44;

/// EMF header signature at offset 40.
pub const EMF_SIGNATURE: &[u8; 4] = b" EMF";

pub fn validate_metafile(data: &[u8]) -> Vec<Finding> {
    let mut findings = Vec::new();

    if data.len() < METAFILE_MIN_LEN {
        findings.push(Finding::anomaly(
            Stage::Structure,
            "EMF/WMF: file too small to analyze",
        ));
        return findings;
    }

    let is_emf = &data[40..44] == EMF_SIGNATURE;
    findings.push(Finding::info(
        Stage::Structure,
        format!("EMF/WMF: metafile variant {}", if is_emf { "EMF" } else { "WMF" }),
    ));

    if is_emf {
        // header field counts 4-byte words
        if let Some(words) = le_u32(data, 4) {
            let declared = words as u64 * 4;
            if (data.len() as u64) > declared {
                findings.push(Finding::anomaly(
                    Stage::Structure,
                    format!(
                        "EMF: {} trailing beyond declared size",
                        plural_bytes(data.len() - declared as usize)
                    ),
                ));
            }
        }
    }

    findings
}
