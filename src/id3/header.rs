use crate::common::error::{Id3WriterError, Result};

/// Largest value a 4-byte synchsafe integer can carry (2^28 - 1).
pub const SYNCHSAFE_MAX: u32 = (1 << 28) - 1;

/// Size of both the tag header and every frame header.
pub const HEADER_LEN: usize = 10;

/// Syncsafe integer encoding used in ID3v2 tags.
/// Each byte uses only 7 bits (MSB is always 0).
///
/// A value of this type is always within 28 bits, so rendering it can't fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SynchsafeInt(u32);

impl SynchsafeInt {
    pub fn new(value: u64) -> Result<Self> {
        if value > SYNCHSAFE_MAX as u64 {
            return Err(Id3WriterError::TagTooLarge(value));
        }
        Ok(SynchsafeInt(value as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Encode as 4 big-endian bytes of 7 bits each.
    pub fn to_bytes(self) -> [u8; 4] {
        let mut result = [0u8; 4];
        let mut val = self.0;
        for i in (0..4).rev() {
            result[i] = (val & 0x7F) as u8;
            val >>= 7;
        }
        result
    }

    /// Decode a syncsafe integer from bytes. High bits are ignored.
    pub fn from_bytes(data: [u8; 4]) -> Self {
        let mut result: u32 = 0;
        for b in data {
            result = (result << 7) | (b as u32 & 0x7F);
        }
        SynchsafeInt(result)
    }

    /// Check if data could be a valid syncsafe integer (no high bits set).
    pub fn has_valid_padding(data: &[u8]) -> bool {
        data.iter().all(|&b| b & 0x80 == 0)
    }
}

/// Encode `value` as a 4-byte synchsafe integer.
pub fn encode(value: u64) -> Result<[u8; 4]> {
    SynchsafeInt::new(value).map(SynchsafeInt::to_bytes)
}

/// Decode a 4-byte synchsafe integer.
pub fn decode(data: [u8; 4]) -> u32 {
    SynchsafeInt::from_bytes(data).get()
}

/// The 10-byte ID3v2 tag header as written by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub version: (u8, u8), // (major, revision), always (3, 0) here
    pub size: SynchsafeInt, // Tag size excluding this header
}

impl TagHeader {
    pub fn new(size: SynchsafeInt) -> Self {
        TagHeader {
            version: (3, 0),
            size,
        }
    }

    pub fn render(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..3].copy_from_slice(b"ID3");
        out[3] = self.version.0;
        out[4] = self.version.1;
        // Flags (none set)
        out[5] = 0;
        out[6..10].copy_from_slice(&self.size.to_bytes());
        out
    }
}

/// Render a frame header: id, synchsafe body size, two zero flag bytes.
pub fn render_frame_header(id: &[u8; 4], body_size: SynchsafeInt) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[0..4].copy_from_slice(id);
    out[4..8].copy_from_slice(&body_size.to_bytes());
    out
}
