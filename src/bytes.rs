//! Bounds-checked integer reads over byte slices.
//! Every read returns `None` instead of panicking when the slice is too short.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    #[inline]
    pub fn read_u16(self, data: &[u8], offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = data.get(offset..offset.checked_add(2)?)?.try_into().ok()?;
        Some(match self {
            Endian::Little => u16::from_le_bytes(bytes),
            Endian::Big => u16::from_be_bytes(bytes),
        })
    }

    #[inline]
    pub fn read_u32(self, data: &[u8], offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = data.get(offset..offset.checked_add(4)?)?.try_into().ok()?;
        Some(match self {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        })
    }
}

#[inline]
pub fn be_u16(data: &[u8], offset: usize) -> Option<u16> {
    Endian::Big.read_u16(data, offset)
}

#[inline]
pub fn be_u32(data: &[u8], offset: usize) -> Option<u32> {
    Endian::Big.read_u32(data, offset)
}

#[inline]
pub fn le_u32(data: &[u8], offset: usize) -> Option<u32> {
    Endian::Little.read_u32(data, offset)
}

/// Four-byte tag at `offset` (chunk ids, fourcc codes).
#[inline]
pub fn fourcc(data: &[u8], offset: usize) -> Option<[u8; 4]> {
    data.get(offset..offset.checked_add(4)?)?.try_into().ok()
}

/// Printable form of a chunk id; non-printable bytes become `\xNN`.
pub fn tag_display(tag: &[u8]) -> String {
    tag.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                (b as char).to_string()
            } else {
                format!("\\x{:02x}", b)
            }
        })
        .collect()
}

/// "1 byte" / "N bytes".
pub fn plural_bytes(n: usize) -> String {
    if n == 1 {
        "1 byte".to_string()
    } else {
        format!("{} bytes", n)
    }
}
