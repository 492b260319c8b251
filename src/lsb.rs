//! Least-significant-bit statistics over the raw buffer.
//!
//! The anomaly band is asymmetric: a share of set low bits below 48.0% or
//! above 49.5% is flagged, so a perfectly balanced 50/50 distribution counts as suspicious
//! too. Low binary entropy (< 0.98 bit) is flagged as well. This is a heuristic signal,
//! not proof that a payload is present.

use crate::result::{Finding, Stage};

/// Lower bound of the accepted share of bytes with the low bit set, in percent.
pub const MIN_PERCENT_ONES: f64 = 48.0;
/// Upper bound of the accepted share of bytes with the low bit set, in percent.
pub const MAX_PERCENT_ONES: f64 = 49.5;
/// Binary entropy below this is flagged.
pub const MIN_ENTROPY: f64 = 0.98;

/// Low-bit distribution of a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LsbStats {
    pub ones: u64,
    pub total: u64,
    pub percent_ones: f64,
    /// Shannon entropy of the {0, 1} low-bit distribution, in bits (0.0..=1.0).
    pub entropy: f64,
}

impl LsbStats {
    /// `None` for an empty buffer.
    pub fn compute(data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let total = data.len() as u64;
        let ones = data.iter().filter(|&&b| b & 1 == 1).count() as u64;
        let p1 = ones as f64 / total as f64;
        let p0 = 1.0 - p1;
        Some(Self {
            ones,
            total,
            percent_ones: p1 * 100.0,
            entropy: entropy_term(p0) + entropy_term(p1),
        })
    }

    pub fn percent_out_of_band(&self) -> bool {
        self.percent_ones < MIN_PERCENT_ONES || self.percent_ones > MAX_PERCENT_ONES
    }

    pub fn entropy_too_low(&self) -> bool {
        self.entropy < MIN_ENTROPY
    }

    pub fn is_anomalous(&self) -> bool {
        self.percent_out_of_band() || self.entropy_too_low()
    }
}

#[inline]
fn entropy_term(p: f64) -> f64 {
    if p > 0.0 {
        -p * p.log2()
    } else {
        0.0
    }
}

/// Two informational findings (distribution, entropy) plus one anomaly when out of band.
pub fn analyze_lsb(data: &[u8]) -> Vec<Finding> {
    let Some(stats) = LsbStats::compute(data) else {
        return vec![Finding::info(Stage::Lsb, "LSB: empty buffer, nothing to analyze")];
    };

    let mut findings = vec![
        Finding::info(
            Stage::Lsb,
            format!(
                "LSB: {} of {} bytes have the low bit set ({:.4}%)",
                stats.ones, stats.total, stats.percent_ones
            ),
        ),
        Finding::info(Stage::Lsb, format!("LSB: entropy {:.6} bit", stats.entropy)),
    ];

    if stats.is_anomalous() {
        let mut reasons = Vec::new();
        if stats.percent_out_of_band() {
            reasons.push(format!(
                "share {:.4}% outside {:.1}..{:.1}%",
                stats.percent_ones, MIN_PERCENT_ONES, MAX_PERCENT_ONES
            ));
        }
        if stats.entropy_too_low() {
            reasons.push(format!(
                "entropy {:.6} below {:.2}",
                stats.entropy, MIN_ENTROPY
            ));
        }
        findings.push(Finding::anomaly(
            Stage::Lsb,
            format!(
                "LSB: anomalous low-bit distribution ({}), possible embedded payload",
                reasons.join("; ")
            ),
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_is_anomalous() {
        let s = LsbStats::compute(&[0u8; 128]).unwrap();
        assert_eq!(s.ones, 0);
        assert_eq!(s.percent_ones, 0.0);
        assert_eq!(s.entropy, 0.0);
        assert!(s.is_anomalous());
    }

    #[test]
    fn in_band_distribution_is_clean() {
        // 49 of 100 bytes odd: 49% is inside the band, entropy ~0.9997
        let data: Vec<u8> = (0..100u8).map(|i| u8::from(i < 49)).collect();
        let s = LsbStats::compute(&data).unwrap();
        assert!((s.percent_ones - 49.0).abs() < 1e-9);
        assert!(!s.is_anomalous());
        assert_eq!(analyze_lsb(&data).len(), 2);
    }

    #[test]
    fn empty_buffer_is_informational() {
        let f = analyze_lsb(&[]);
        assert_eq!(f.len(), 1);
        assert!(!f[0].is_anomaly());
    }
}
