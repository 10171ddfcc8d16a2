use std::borrow::Cow;

use crate::common::error::Result;
use crate::id3::frames::{self, FrameValue};
use crate::id3::header::{SynchsafeInt, TagHeader, HEADER_LEN};
use crate::id3::tags::{PendingFrame, PendingFrames};

/// Builds an ID3v2.3 tag and prepends it to an audio buffer.
///
/// Frames are validated when set, so [`finalize`](Self::finalize) can't fail.
/// Finalizing doesn't consume the writer: later `set_frame` calls are picked up
/// by the next `finalize`.
///
/// ```
/// use id3_writer::TagWriter;
///
/// let mut writer = TagWriter::new(&[0xFF, 0xFB][..]);
/// writer.set_frame("TIT2", "Song")?.set_frame("TPE1", vec!["Artist"])?;
/// let tagged = writer.finalize();
/// assert_eq!(&tagged[..3], b"ID3");
/// assert_eq!(&tagged[tagged.len() - 2..], &[0xFF, 0xFB]);
/// # Ok::<(), id3_writer::Id3WriterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TagWriter<'a> {
    audio: Cow<'a, [u8]>,
    frames: PendingFrames,
    padding: u32,
    tag_size: SynchsafeInt,
}

impl<'a> TagWriter<'a> {
    pub fn new(audio: impl Into<Cow<'a, [u8]>>) -> Self {
        TagWriter {
            audio: audio.into(),
            frames: PendingFrames::new(),
            padding: 0,
            tag_size: SynchsafeInt::default(),
        }
    }

    /// Validate and store a frame, replacing any earlier frame with the same id.
    /// On error the writer is left unchanged.
    pub fn set_frame(&mut self, id: &str, value: impl Into<FrameValue>) -> Result<&mut Self> {
        let (frame_id, value) = frames::validate(id, value.into())?;
        let frame = PendingFrame::new(frame_id, value)?;
        let tag_size = SynchsafeInt::new(
            self.frames.total_len_with(Some(&frame)) + self.padding as u64,
        )?;

        let size = frame.total_len();
        if self.frames.insert(frame).is_some() {
            log::debug!("{}: replaced earlier frame ({} bytes)", frame_id, size);
        } else {
            log::debug!("{}: added frame ({} bytes)", frame_id, size);
        }
        self.tag_size = tag_size;
        Ok(self)
    }

    /// Reserve `padding` zero bytes after the last frame.
    pub fn with_padding(&mut self, padding: u32) -> Result<&mut Self> {
        self.tag_size =
            SynchsafeInt::new(self.frames.total_len_with(None) + padding as u64)?;
        self.padding = padding;
        Ok(self)
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn frames(&self) -> &PendingFrames {
        &self.frames
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    /// Size of the tag without its 10-byte header.
    pub fn tag_size(&self) -> u32 {
        self.tag_size.get()
    }

    /// Render the tag header, every frame, the padding and then the audio.
    pub fn finalize(&self) -> Vec<u8> {
        let tag_size = self.tag_size.get() as usize;
        let mut out = Vec::with_capacity(HEADER_LEN + tag_size + self.audio.len());

        out.extend_from_slice(&TagHeader::new(self.tag_size).render());
        for frame in self.frames.iter() {
            frame.render_into(&mut out);
            log::trace!("{}: wrote {} bytes", frame.id, frame.total_len());
        }
        out.resize(out.len() + self.padding as usize, 0);
        debug_assert_eq!(out.len(), HEADER_LEN + tag_size);

        out.extend_from_slice(&self.audio);
        log::trace!(
            "finalized tag: {} frames, {} tag bytes, {} audio bytes",
            self.frames.len(),
            tag_size,
            self.audio.len()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Id3WriterError;
    use crate::id3::header;

    #[test]
    fn empty_writer_emits_bare_header() {
        let writer = TagWriter::new(vec![1, 2, 3]);
        assert_eq!(writer.finalize(), vec![b'I', b'D', b'3', 3, 0, 0, 0, 0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn failed_set_frame_leaves_state_alone() {
        let mut writer = TagWriter::new(&[][..]);
        writer.set_frame("TIT2", "x").unwrap();
        let before = writer.finalize();

        assert!(writer.set_frame("TCON", FrameValue::List(vec![])).is_err());
        assert!(writer.set_frame("XYZQ", "x").is_err());
        assert!(writer.set_frame("APIC", vec![0u8; 4]).is_err());

        assert_eq!(writer.finalize(), before);
        assert_eq!(writer.frames().len(), 1);
    }

    #[test]
    fn padding_is_counted_in_size() {
        let mut writer = TagWriter::new(vec![9]);
        writer.with_padding(4).unwrap();
        writer.set_frame("TIT2", "a").unwrap();

        let out = writer.finalize();
        assert_eq!(writer.tag_size(), 15 + 4);
        assert_eq!(header::decode([out[6], out[7], out[8], out[9]]), 19);
        assert_eq!(&out[25..29], &[0, 0, 0, 0]);
        assert_eq!(&out[29..], &[9]);
    }

    #[test]
    fn oversized_padding_is_rejected() {
        let mut writer = TagWriter::new(&[][..]);
        assert_eq!(
            writer.with_padding(header::SYNCHSAFE_MAX + 1).unwrap_err(),
            Id3WriterError::TagTooLarge(header::SYNCHSAFE_MAX as u64 + 1)
        );
        assert_eq!(writer.padding(), 0);
        writer.with_padding(header::SYNCHSAFE_MAX - 20).unwrap();
        // 10 + 1 + 2 + 2 * 5 = 23 bytes no longer fit
        assert!(matches!(
            writer.set_frame("TIT2", "hello"),
            Err(Id3WriterError::TagTooLarge(_))
        ));
        assert!(writer.frames().is_empty());
    }

    #[test]
    fn borrowed_audio_is_copied_not_mutated() {
        let audio = vec![0xFF, 0xFB, 0x90, 0x64];
        let mut writer = TagWriter::new(&audio);
        writer.set_frame("TALB", "Album").unwrap();
        let out = writer.finalize();
        assert!(out.ends_with(&audio));
        assert_eq!(audio, vec![0xFF, 0xFB, 0x90, 0x64]);
    }
}
