use std::fmt;

/// Ways a single frame request can fail.
///
/// Every variant is scoped to one in-flight request: compositor state is only
/// mutated after a successful raw decode, so a failed request leaves the next
/// one unaffected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FrameError {
    /// The output buffer for the frame could not be allocated.
    Allocation { bytes: usize },
    /// The frame source failed to produce pixels for the requested index.
    Decode { frame: usize },
    /// A decoded buffer could not be turned into a displayable image.
    Materialize(String),
    /// The source reported zero frames; every request on the instance fails.
    NoFrames,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { bytes } => {
                write!(f, "failed to allocate memory for frame buffer of size {bytes}B")
            }
            Self::Decode { frame } => write!(f, "could not decode pixels for frame {frame}"),
            Self::Materialize(msg) => write!(f, "could not materialize image: {msg}"),
            Self::NoFrames => f.write_str("could not provide any frame"),
        }
    }
}

impl std::error::Error for FrameError {}
