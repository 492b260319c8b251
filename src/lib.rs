//! # decoy
//!
//! Triage media files for forgery and concealment signals: does the content match the
//! name it is presented under, is the container well-formed, and does the low-bit
//! distribution hint at an embedded payload.
//!
//! All parsing is slice-based and bounds-checked; truncated or hostile input yields
//! findings, never panics.
//!
//! ## Pipeline
//!
//! 1. **Sniff** – classify the buffer into a [`FormatTag`] from magic bytes only
//!    ([`detect_format`]). The signature table is ordered; first match wins.
//! 2. **Validate** – walk the container for the detected tag (JPEG markers, PNG chunks,
//!    WebP RIFF chunks, BMP/EMF declared sizes, GIF trailer, TIFF/PSD headers).
//! 3. **LSB** – bit statistics for still-image formats ([`lsb`]).
//! 4. **Extension** – compare the name against the detected tag, look for double
//!    extensions and bidi/zero-width characters ([`extension`]).
//!
//! Findings keep that order; the verdict is true iff any finding is an anomaly.
//!
//! ## Example
//!
//! ```no_run
//! let result = decoy::analyze_file("holiday.jpg");
//! if result.suspicious {
//!     for f in result.anomalies() {
//!         println!("[{}] {}", f.stage.label(), f.message);
//!     }
//! }
//! ```
//!
//! ## Throughput
//!
//! Files are read fully into memory and analyzed one at a time. With the `parallel`
//! feature, [`pipeline::analyze_directory_parallel`] spreads a directory over a rayon pool
//! and returns the same ordered output.

mod bytes;
mod error;
mod result;

#[cfg(feature = "serde")]
pub mod config;
pub mod extension;
pub mod external;
pub mod full;
pub mod lsb;
pub mod pipeline;
#[cfg(feature = "serde")]
pub mod report;
pub mod sniff;
pub mod validate;

#[cfg(feature = "serde")]
use serde::Serialize;

pub use error::{Error, Result};
pub use extension::{correlate_extension, ExtensionProfile};
pub use full::FullAnalyzer;
pub use lsb::{analyze_lsb, LsbStats};
pub use pipeline::{
    analyze, analyze_directory, analyze_file, try_analyze_file, AnalysisOptions, BatchItem, Scope,
};
pub use result::{derive_verdict, AnalysisResult, Finding, FindingKind, Stage};
pub use sniff::detect_format;
pub use validate::validate;

/// Container format, decided from buffer content only (never from the file name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum FormatTag {
    Jpeg,
    Png,
    Bmp,
    Gif,
    Tiff,
    Psd,
    Webp,
    Avi,
    Mp3,
    Mp4,
    Webm,
    Mkv,
    Hevc,
    Av1,
    Cr2,
    Nef,
    Dng,
    Emf,
    Wmf,
    Unknown,
}

impl FormatTag {
    /// Short label for display (e.g. "JPEG", "WEBP").
    pub fn label(self) -> &'static str {
        match self {
            FormatTag::Jpeg => "JPEG",
            FormatTag::Png => "PNG",
            FormatTag::Bmp => "BMP",
            FormatTag::Gif => "GIF",
            FormatTag::Tiff => "TIFF",
            FormatTag::Psd => "PSD",
            FormatTag::Webp => "WEBP",
            FormatTag::Avi => "AVI",
            FormatTag::Mp3 => "MP3",
            FormatTag::Mp4 => "MP4",
            FormatTag::Webm => "WEBM",
            FormatTag::Mkv => "MKV",
            FormatTag::Hevc => "HEVC",
            FormatTag::Av1 => "AV1",
            FormatTag::Cr2 => "CR2",
            FormatTag::Nef => "NEF",
            FormatTag::Dng => "DNG",
            FormatTag::Emf => "EMF",
            FormatTag::Wmf => "WMF",
            FormatTag::Unknown => "Unknown",
        }
    }

    /// Extensions (with leading dot, lowercase) accepted for this format.
    /// Empty for `Unknown`, which is never reported as a mismatch.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FormatTag::Jpeg => &[".jpg", ".jpeg"],
            FormatTag::Png => &[".png"],
            FormatTag::Bmp => &[".bmp"],
            FormatTag::Gif => &[".gif"],
            FormatTag::Tiff => &[".tif", ".tiff"],
            FormatTag::Psd => &[".psd"],
            FormatTag::Webp => &[".webp"],
            FormatTag::Avi => &[".avi"],
            FormatTag::Mp3 => &[".mp3"],
            FormatTag::Mp4 => &[".mp4"],
            FormatTag::Webm => &[".webm"],
            FormatTag::Mkv => &[".mkv"],
            FormatTag::Hevc => &[".hevc", ".h265"],
            FormatTag::Av1 => &[".av1"],
            FormatTag::Cr2 => &[".cr2"],
            FormatTag::Nef => &[".nef"],
            FormatTag::Dng => &[".dng"],
            FormatTag::Emf => &[".emf"],
            FormatTag::Wmf => &[".wmf"],
            FormatTag::Unknown => &[],
        }
    }

    /// Formats whose raw bytes go through the LSB stage.
    pub fn is_lsb_relevant(self) -> bool {
        matches!(
            self,
            FormatTag::Jpeg
                | FormatTag::Png
                | FormatTag::Bmp
                | FormatTag::Gif
                | FormatTag::Tiff
                | FormatTag::Webp
                | FormatTag::Psd
        )
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
