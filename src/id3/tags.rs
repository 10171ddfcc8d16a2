use crate::common::error::Result;
use crate::id3::frames::{FrameId, ValidatedValue};
use crate::id3::header::{render_frame_header, SynchsafeInt, HEADER_LEN};

/// A validated frame waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFrame {
    pub id: FrameId,
    pub value: ValidatedValue,
    pub body_size: SynchsafeInt,
}

impl PendingFrame {
    pub fn new(id: FrameId, value: ValidatedValue) -> Result<Self> {
        let body_size = SynchsafeInt::new(value.body_len() as u64)?;
        Ok(PendingFrame {
            id,
            value,
            body_size,
        })
    }

    /// Header plus body size in bytes.
    pub fn total_len(&self) -> usize {
        HEADER_LEN + self.body_size.get() as usize
    }

    /// Append the 10-byte frame header and the encoded body to `out`.
    pub fn render_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&render_frame_header(self.id.as_bytes(), self.body_size));
        let start = out.len();
        out.extend_from_slice(&self.value.encode());
        debug_assert_eq!(out.len() - start, self.body_size.get() as usize);
    }
}

/// Frames keyed by identifier, kept in submission order.
/// Uses Vec instead of HashMap for better cache locality
/// (a tag rarely holds more than a couple dozen frames).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingFrames {
    frames: Vec<PendingFrame>,
}

impl PendingFrames {
    pub fn new() -> Self {
        PendingFrames {
            frames: Vec::with_capacity(16),
        }
    }

    /// Insert a frame; an earlier frame with the same id is dropped and the
    /// new one goes to the end. Returns the replaced frame, if any.
    pub fn insert(&mut self, frame: PendingFrame) -> Option<PendingFrame> {
        let replaced = self
            .frames
            .iter()
            .position(|f| f.id == frame.id)
            .map(|i| self.frames.remove(i));
        self.frames.push(frame);
        replaced
    }

    pub fn get(&self, id: &str) -> Option<&PendingFrame> {
        self.frames.iter().find(|f| f.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingFrame> {
        self.frames.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.frames.iter().map(|f| f.id.to_string()).collect()
    }

    /// Sum of header and body sizes, optionally as if `candidate` were inserted.
    pub fn total_len_with(&self, candidate: Option<&PendingFrame>) -> u64 {
        self.frames
            .iter()
            .filter(|f| candidate.map_or(true, |c| c.id != f.id))
            .chain(candidate)
            .map(|f| f.total_len() as u64)
            .sum()
    }

    /// Render every frame (header + body) in order.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_len_with(None) as usize);
        for frame in &self.frames {
            frame.render_into(&mut out);
        }
        out
    }
}
