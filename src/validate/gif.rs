//! GIF: header version and trailer byte.

use crate::result::{Finding, Stage};

const GIF_TRAILER: u8 = 0x3B;

pub fn validate_gif(data: &[u8]) -> Vec<Finding> {
    let mut findings = Vec::new();

    if data.len() < 6 {
        findings.push(Finding::anomaly(Stage::Structure, "GIF: file too small"));
        return findings;
    }

    match &data[..6] {
        b"GIF87a" | b"GIF89a" => findings.push(Finding::info(
            Stage::Structure,
            format!("GIF: version {}", String::from_utf8_lossy(&data[3..6])),
        )),
        _ => findings.push(Finding::anomaly(
            Stage::Structure,
            "GIF: unsupported or corrupted header",
        )),
    }

    if data.last() != Some(&GIF_TRAILER) {
        findings.push(Finding::anomaly(
            Stage::Structure,
            "GIF: missing 0x3B trailer, file truncated or carries appended data",
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailer_required() {
        let mut v = b"GIF89a".to_vec();
        v.extend_from_slice(&[0u8; 10]);
        v.push(0x3B);
        assert!(validate_gif(&v).iter().all(|f| !f.is_anomaly()));
        v.push(0x00);
        assert_eq!(validate_gif(&v).iter().filter(|f| f.is_anomaly()).count(), 1);
    }
}
