//! File name / extension correlation.
//!
//! Compares the extension a file is presented under with the format its content was
//! classified as, and looks for naming tricks: double extensions (`invoice.pdf.exe`),
//! non-ASCII extensions, and zero-width or bidirectional control characters that can make
//! `exe.jpg` render as `gpj.exe`.

use std::path::Path;

use crate::result::{Finding, Stage};
use crate::FormatTag;

/// A deceptive code point looked for in file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvisibleChar {
    pub ch: char,
    pub name: &'static str,
}

impl InvisibleChar {
    /// `U+XXXX` notation.
    pub fn code(&self) -> String {
        format!("U+{:04X}", self.ch as u32)
    }
}

/// Zero-width and bidirectional formatting characters, in reporting order.
pub const INVISIBLE_CHARS: &[InvisibleChar] = &[
    InvisibleChar { ch: '\u{200B}', name: "zero-width space" },
    InvisibleChar { ch: '\u{200C}', name: "zero-width non-joiner" },
    InvisibleChar { ch: '\u{200D}', name: "zero-width joiner" },
    InvisibleChar { ch: '\u{FEFF}', name: "zero-width no-break space" },
    InvisibleChar { ch: '\u{202A}', name: "left-to-right embedding" },
    InvisibleChar { ch: '\u{202B}', name: "right-to-left embedding" },
    InvisibleChar { ch: '\u{202C}', name: "pop directional formatting" },
    InvisibleChar { ch: '\u{202D}', name: "left-to-right override" },
    InvisibleChar { ch: '\u{202E}', name: "right-to-left override" },
];

/// Naming facts derived from a path. Nothing here looks at file content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionProfile {
    /// File name component.
    pub file_name: String,
    /// Final extension with leading dot, as written (e.g. ".JPG").
    pub primary: Option<String>,
    /// Stem extension + primary extension (e.g. ".pdf.exe") when the stem has one.
    pub compound: Option<String>,
    /// Extension contains bytes outside ASCII.
    pub non_ascii: bool,
    /// Deceptive characters present anywhere in the file name, in table order.
    pub invisible: Vec<InvisibleChar>,
}

impl ExtensionProfile {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let primary = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()));
        let compound = match (&primary, path.file_stem().map(Path::new)) {
            (Some(primary), Some(stem)) => stem
                .extension()
                .map(|e| format!(".{}{}", e.to_string_lossy(), primary)),
            _ => None,
        };
        let non_ascii = primary.as_deref().is_some_and(|e| !e.is_ascii());
        let invisible = INVISIBLE_CHARS
            .iter()
            .filter(|c| file_name.contains(c.ch))
            .copied()
            .collect();
        Self {
            file_name,
            primary,
            compound,
            non_ascii,
            invisible,
        }
    }

    /// Lowercased primary extension ("" when there is none).
    pub fn primary_lower(&self) -> String {
        self.primary.as_deref().unwrap_or("").to_lowercase()
    }

    /// True when `tag` has an extension table and the primary extension is not in it.
    pub fn mismatches(&self, tag: FormatTag) -> bool {
        let accepted = tag.extensions();
        !accepted.is_empty() && !accepted.contains(&self.primary_lower().as_str())
    }
}

/// Extension findings for a file whose content was classified as `tag`.
pub fn correlate_extension(tag: FormatTag, path: &Path) -> Vec<Finding> {
    let profile = ExtensionProfile::from_path(path);
    let shown = profile.primary.as_deref().unwrap_or("-");
    let mut findings = vec![Finding::info(
        Stage::Extension,
        format!("Extension: {} (content: {})", shown, tag.label()),
    )];

    if profile.mismatches(tag) {
        findings.push(Finding::anomaly(
            Stage::Extension,
            format!(
                "Extension {} does not match content type {} (expected {})",
                shown,
                tag.label(),
                tag.extensions().join(" or ")
            ),
        ));
    }

    if let Some(compound) = &profile.compound {
        findings.push(Finding::anomaly(
            Stage::Extension,
            format!("Double extension: {}", compound),
        ));
    }

    if profile.non_ascii {
        findings.push(Finding::anomaly(
            Stage::Extension,
            format!("Extension {} contains non-ASCII characters", shown),
        ));
    }

    for c in &profile.invisible {
        findings.push(Finding::anomaly(
            Stage::Extension,
            format!("Invisible character {} ({}) in file name", c.code(), c.name),
        ));
    }

    findings
}
