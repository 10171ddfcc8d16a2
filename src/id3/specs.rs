use byteorder::{ByteOrder, LittleEndian};

/// Text encoding types used in ID3v2.3 frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Encoding {
    Latin1 = 0,
    Utf16 = 1,
}

impl Encoding {
    /// Size of the null terminator for each encoding.
    pub fn null_terminator(self) -> &'static [u8] {
        match self {
            Encoding::Latin1 => &[0],
            Encoding::Utf16 => &[0, 0],
        }
    }
}

/// Little-endian byte order mark.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Language written into USLT/COMM frames when the caller gives none.
pub const DEFAULT_LANGUAGE: [u8; 3] = *b"eng";

/// Append `text` as UTF-16LE prefixed with a BOM.
pub fn write_utf16(out: &mut Vec<u8>, text: &str) {
    out.extend_from_slice(&UTF16_LE_BOM);
    write_utf16_units(out, text);
}

/// Append `text` as UTF-16LE without a BOM.
pub fn write_utf16_units(out: &mut Vec<u8>, text: &str) {
    let units: Vec<u16> = text.encode_utf16().collect();
    let start = out.len();
    out.resize(start + units.len() * 2, 0);
    LittleEndian::write_u16_into(&units, &mut out[start..]);
}

/// Byte length of `text` once written by [`write_utf16`].
pub fn utf16_len(text: &str) -> usize {
    UTF16_LE_BOM.len() + text.encode_utf16().count() * 2
}

/// Normalise an ISO-639-2 language code: three ASCII letters, lower-cased.
pub fn parse_language(code: &str) -> Option<[u8; 3]> {
    let bytes = code.as_bytes();
    if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
        return None;
    }
    Some([
        bytes[0].to_ascii_lowercase(),
        bytes[1].to_ascii_lowercase(),
        bytes[2].to_ascii_lowercase(),
    ])
}

/// Picture type enum matching ID3v2 APIC frame specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PictureType {
    Other = 0,
    FileIcon = 1,
    OtherFileIcon = 2,
    CoverFront = 3,
    CoverBack = 4,
}
