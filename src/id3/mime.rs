//! Image MIME type detection from magic bytes.

use crate::common::error::{Id3WriterError, Result};

/// Image formats recognised for APIC frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Jpeg,
    Png,
    Gif,
    Webp,
    Tiff,
    Bmp,
    Icon,
}

impl MimeType {
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
            MimeType::Gif => "image/gif",
            MimeType::Webp => "image/webp",
            MimeType::Tiff => "image/tiff",
            MimeType::Bmp => "image/bmp",
            MimeType::Icon => "image/x-icon",
        }
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in order, first match wins.
const SIGNATURES: &[(usize, &[u8], MimeType)] = &[
    (0, &[0xFF, 0xD8, 0xFF], MimeType::Jpeg),
    (0, &[0x89, 0x50, 0x4E, 0x47], MimeType::Png),
    (0, &[0x47, 0x49, 0x46], MimeType::Gif),
    (8, b"WEBP", MimeType::Webp),
    (0, &[0x49, 0x49, 0x2A, 0x00], MimeType::Tiff),
    (0, &[0x4D, 0x4D, 0x00, 0x2A], MimeType::Tiff),
    (0, &[0x42, 0x4D], MimeType::Bmp),
    (0, &[0x00, 0x00, 0x01, 0x00], MimeType::Icon),
];

/// Classify an image buffer by its leading bytes.
pub fn sniff(data: &[u8]) -> Result<MimeType> {
    SIGNATURES
        .iter()
        .find(|(offset, magic, _)| {
            data.get(*offset..offset + magic.len()) == Some(*magic)
        })
        .map(|&(_, _, mime)| mime)
        .ok_or(Id3WriterError::UnknownPictureMimeType)
}
