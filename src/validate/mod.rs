//! Per-format structural validators.
//!
//! Each validator walks one container layout and reports irregularities as findings.
//! Validators never fail: truncation stops the walk and is itself reported.

mod bmp;
mod gif;
mod jpeg;
mod metafile;
mod png;
mod psd;
mod tiff;
mod webp;

pub use bmp::validate_bmp;
pub use gif::validate_gif;
pub use jpeg::{validate_jpeg, EXIF_HEADER, MAX_TEXT_SEGMENT_LEN};
pub use metafile::{validate_metafile, EMF_SIGNATURE, METAFILE_MIN_LEN};
pub use png::{validate_png, PNG_ALLOWED_CHUNKS, PNG_SIGNATURE};
pub use psd::{validate_psd, PSD_MAX_SIZE};
pub use tiff::{validate_tiff, TIFF_MAX_SIZE};
pub use webp::{validate_webp, WEBP_ALLOWED_CHUNKS};

use crate::result::{Finding, Stage};
use crate::FormatTag;

/// Signature shared by every validator.
pub type ValidateFn = fn(&[u8]) -> Vec<Finding>;

/// Dispatch table: one validator per tag. EMF and WMF share the metafile walker,
/// which tells the two apart from content.
pub const VALIDATORS: &[(FormatTag, ValidateFn)] = &[
    (FormatTag::Jpeg, validate_jpeg),
    (FormatTag::Png, validate_png),
    (FormatTag::Bmp, validate_bmp),
    (FormatTag::Gif, validate_gif),
    (FormatTag::Tiff, validate_tiff),
    (FormatTag::Psd, validate_psd),
    (FormatTag::Webp, validate_webp),
    (FormatTag::Emf, validate_metafile),
    (FormatTag::Wmf, validate_metafile),
];

/// Validator registered for `tag`, if any.
pub fn validator_for(tag: FormatTag) -> Option<ValidateFn> {
    VALIDATORS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, f)| *f)
}

/// Run the structural validator for `tag` over `data`.
pub fn validate(tag: FormatTag, data: &[u8]) -> Vec<Finding> {
    match validator_for(tag) {
        Some(validator) => validator(data),
        None => vec![Finding::info(
            Stage::Structure,
            format!("{}: structural validation not supported", tag.label()),
        )],
    }
}
