//! Magic-byte format classification.
//!
//! Rules are tried in table order and the first match wins. Several RAW formats share the
//! generic little-endian TIFF prefix and are listed after it, so `II*\0` content is always
//! reported as TIFF; CR2, NEF and DNG entries are kept for table fidelity but are shadowed.

use crate::FormatTag;

/// Buffers shorter than this are never classified (RIFF disambiguation reads bytes 8..12).
pub const MIN_SNIFF_LEN: usize = 12;

/// What a signature resolves to once matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureTarget {
    Format(FormatTag),
    /// Generic RIFF container: `WEBP` at bytes 8..12 means WebP, anything else is reported as AVI.
    Riff,
}

/// One entry of the ordered signature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub target: SignatureTarget,
    pub magic: &'static [u8],
    pub offset: usize,
}

impl Signature {
    const fn new(tag: FormatTag, magic: &'static [u8], offset: usize) -> Self {
        Self {
            target: SignatureTarget::Format(tag),
            magic,
            offset,
        }
    }

    /// True when `magic` is present at `offset`.
    #[inline]
    pub fn matches(&self, data: &[u8]) -> bool {
        self.offset
            .checked_add(self.magic.len())
            .and_then(|end| data.get(self.offset..end))
            .is_some_and(|window| window == self.magic)
    }
}

/// Ordered signature table. Order is priority.
pub static SIGNATURES: &[Signature] = &[
    Signature::new(FormatTag::Jpeg, &[0xFF, 0xD8, 0xFF], 0),
    Signature::new(FormatTag::Png, &[0x89, 0x50, 0x4E, 0x47], 0),
    Signature::new(FormatTag::Bmp, b"BM", 0),
    Signature::new(FormatTag::Gif, b"GIF8", 0),
    Signature::new(FormatTag::Mp3, b"ID3", 0),
    Signature::new(FormatTag::Mp4, b"ftyp", 4),
    Signature::new(FormatTag::Webm, b"webm", 31),
    Signature::new(FormatTag::Mkv, &[0x1A, 0x45, 0xDF, 0xA3], 0),
    Signature::new(FormatTag::Psd, b"8BPS", 0),
    Signature::new(FormatTag::Hevc, &[0x00, 0x00, 0x00, 0x01, 0x40], 0),
    Signature::new(FormatTag::Av1, b"AV1", 4),
    Signature::new(FormatTag::Tiff, &[0x49, 0x49, 0x2A, 0x00], 0),
    Signature::new(FormatTag::Tiff, &[0x4D, 0x4D, 0x00, 0x2A], 0),
    Signature::new(
        FormatTag::Cr2,
        &[0x49, 0x49, 0x2A, 0x00, 0x10, 0x00, 0x00, 0x00, b'C', b'R'],
        0,
    ),
    Signature::new(FormatTag::Nef, &[0x49, 0x49, 0x2A, 0x00], 0),
    Signature::new(FormatTag::Dng, &[0x49, 0x49, 0x2A, 0x00], 0),
    Signature::new(FormatTag::Emf, &[0x01, 0x00, 0x00, 0x00], 40),
    Signature::new(FormatTag::Wmf, &[0xD7, 0xCD, 0xC6, 0x9A], 0),
    Signature {
        target: SignatureTarget::Riff,
        magic: b"RIFF",
        offset: 0,
    },
];

/// First table entry that matches `data`, if any.
pub fn first_match(data: &[u8]) -> Option<&'static Signature> {
    if data.len() < MIN_SNIFF_LEN {
        return None;
    }
    SIGNATURES.iter().find(|sig| sig.matches(data))
}

/// Classify a buffer from its content alone. Never fails; no match is `Unknown`.
pub fn detect_format(data: &[u8]) -> FormatTag {
    match first_match(data).map(|sig| sig.target) {
        Some(SignatureTarget::Format(tag)) => tag,
        Some(SignatureTarget::Riff) => {
            if data.get(8..12) == Some(b"WEBP".as_slice()) {
                FormatTag::Webp
            } else {
                FormatTag::Avi
            }
        }
        None => FormatTag::Unknown,
    }
}
