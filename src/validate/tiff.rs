//! TIFF header check, size ceiling, and an IFD0 bounds walk.

use crate::bytes::Endian;
use crate::result::{Finding, Stage};

/// TIFF files above this size are flagged.
pub const TIFF_MAX_SIZE: usize = 50 * 1024 * 1024;

const TIFF_MAGIC: u16 = 0x002A;
const TIFF_HEADER_LEN: usize = 8;
const IFD_ENTRY_LEN: usize = 12;

const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;
const TYPE_SBYTE: u16 = 6;
const TYPE_UNDEFINED: u16 = 7;
const TYPE_SSHORT: u16 = 8;
const TYPE_SLONG: u16 = 9;
const TYPE_SRATIONAL: u16 = 10;
const TYPE_FLOAT: u16 = 11;
const TYPE_DOUBLE: u16 = 12;
const TYPE_IFD: u16 = 13;
const TYPE_LONG8: u16 = 16;
const TYPE_SLONG8: u16 = 17;
const TYPE_IFD8: u16 = 18;

#[derive(Debug, Clone, Copy)]
struct IfdEntry {
    tag: u16,
    field_type: u16,
    count: u32,
    value_offset: u32,
}

fn type_unit_size(field_type: u16) -> Option<u64> {
    match field_type {
        TYPE_BYTE | TYPE_ASCII | TYPE_SBYTE | TYPE_UNDEFINED => Some(1),
        TYPE_SHORT | TYPE_SSHORT => Some(2),
        TYPE_LONG | TYPE_SLONG | TYPE_FLOAT | TYPE_IFD => Some(4),
        TYPE_RATIONAL | TYPE_SRATIONAL | TYPE_DOUBLE | TYPE_LONG8 | TYPE_SLONG8 | TYPE_IFD8 => {
            Some(8)
        }
        _ => None,
    }
}

/// Byte order from the `II*\0` / `MM\0*` header.
fn byte_order(data: &[u8]) -> Option<Endian> {
    let bo = match data.get(..4)? {
        [b'I', b'I', 0x2A, 0x00] => Endian::Little,
        [b'M', b'M', 0x00, 0x2A] => Endian::Big,
        _ => return None,
    };
    (bo.read_u16(data, 2)? == TIFF_MAGIC).then_some(bo)
}

fn read_ifd_entry(bo: Endian, data: &[u8], offset: usize) -> Option<IfdEntry> {
    Some(IfdEntry {
        tag: bo.read_u16(data, offset)?,
        field_type: bo.read_u16(data, offset + 2)?,
        count: bo.read_u32(data, offset + 4)?,
        value_offset: bo.read_u32(data, offset + 8)?,
    })
}

/// Finding for an entry the walker cannot vouch for. Values of 4 bytes or less live inline
/// in the entry and are never out of bounds. Unknown field types cannot be sized and are
/// only noted.
fn entry_bounds_issue(data_len: usize, entry: IfdEntry) -> Option<Finding> {
    let Some(unit) = type_unit_size(entry.field_type) else {
        return Some(Finding::info(
            Stage::Structure,
            format!(
                "TIFF: unknown field type {} for tag 0x{:04x}",
                entry.field_type, entry.tag
            ),
        ));
    };
    let total = unit.saturating_mul(entry.count as u64);
    if total <= 4 {
        return None;
    }
    let end = (entry.value_offset as u64).saturating_add(total);
    (end > data_len as u64).then(|| {
        Finding::anomaly(
            Stage::Structure,
            format!(
                "TIFF: tag 0x{:04x} value at offset 0x{:08x} needs {} bytes beyond end of file ({} bytes)",
                entry.tag, entry.value_offset, total, data_len
            ),
        )
    })
}

fn walk_ifd0(bo: Endian, data: &[u8], findings: &mut Vec<Finding>) {
    let Some(ifd0) = bo.read_u32(data, 4) else {
        findings.push(Finding::anomaly(
            Stage::Structure,
            "TIFF: header truncated before IFD0 offset",
        ));
        return;
    };
    let ifd0 = ifd0 as usize;
    let Some(count) = bo.read_u16(data, ifd0) else {
        findings.push(Finding::anomaly(
            Stage::Structure,
            format!("TIFF: IFD0 offset {} outside file", ifd0),
        ));
        return;
    };
    let count = count as usize;
    let entries_start = ifd0 + 2;
    if entries_start + count * IFD_ENTRY_LEN > data.len() {
        findings.push(Finding::anomaly(
            Stage::Structure,
            format!("TIFF: IFD0 declares {} entries but file is truncated", count),
        ));
        return;
    }

    findings.push(Finding::info(
        Stage::Structure,
        format!("TIFF: {:?}-endian, IFD0 at {} with {} entries", bo, ifd0, count),
    ));

    for i in 0..count {
        let Some(entry) = read_ifd_entry(bo, data, entries_start + i * IFD_ENTRY_LEN) else {
            break;
        };
        if let Some(issue) = entry_bounds_issue(data.len(), entry) {
            findings.push(issue);
        }
    }
}

pub fn validate_tiff(data: &[u8]) -> Vec<Finding> {
    let mut findings = Vec::new();

    if data.len() < 4 {
        findings.push(Finding::anomaly(
            Stage::Structure,
            "TIFF: file too small or corrupted",
        ));
        return findings;
    }

    match byte_order(data) {
        Some(bo) if data.len() >= TIFF_HEADER_LEN => walk_ifd0(bo, data, &mut findings),
        Some(_) => findings.push(Finding::anomaly(
            Stage::Structure,
            "TIFF: header truncated before IFD0 offset",
        )),
        None => findings.push(Finding::anomaly(Stage::Structure, "TIFF: invalid signature")),
    }

    if data.len() > TIFF_MAX_SIZE {
        findings.push(Finding::anomaly(
            Stage::Structure,
            format!("TIFF: suspiciously large file ({} bytes)", data.len()),
        ));
    }

    findings
}
