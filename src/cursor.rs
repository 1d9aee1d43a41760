use crate::source::PlayCount;

/// Tracks the next frame to decode, wrapping modulo the frame count.
///
/// Owned by the decode-side state; the result thread never touches it.
#[derive(Clone, Debug)]
pub struct AnimationCursor {
    next_index: usize,
    frame_count: usize,
}

impl AnimationCursor {
    pub fn new(frame_count: usize) -> Self {
        Self { next_index: 0, frame_count }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Index of the frame the next decode will produce.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Advance past the frame just processed (successfully or not).
    ///
    /// Zero-frame sources never decode, so the index never moves for them.
    pub fn advance(&mut self) {
        if self.frame_count > 0 {
            self.next_index = (self.next_index + 1) % self.frame_count;
        }
    }
}

/// Derive the externally reported repetition count from the raw play count.
///
/// The play count includes the first pass; the reported value counts
/// *additional* loops, with `-1` meaning "loop forever".
pub fn repetition_count(play_count: PlayCount) -> i32 {
    match play_count {
        PlayCount::Infinite => -1,
        PlayCount::Finite(n) => n as i32 - 1,
    }
}
