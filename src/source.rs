//! The frame source seam: everything the pipeline needs to know about an
//! animated image, without knowing anything about its bitstream.

use crate::buffer::PixelBuffer;

/// How often an animation should play through all of its frames.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayCount {
    /// Play the animation `n` times in total (the first pass included).
    Finite(u32),
    /// Loop forever.
    Infinite,
}

/// Per-frame instruction describing how the canvas is prepared before the
/// *next* frame is drawn.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DisposalMethod {
    /// The source did not specify a disposal method.
    #[default]
    None,
    /// Leave the canvas as-is for the next frame.
    Keep,
    /// Restore the canvas to the previously retained frame.
    RestorePrevious,
    /// Clear `disposal_rect` to transparent before the next frame.
    RestoreBackground,
}

/// Axis-aligned pixel rectangle, used for background-restore regions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Whether the source's native pixel output has premultiplied alpha.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlphaMode {
    Premultiplied,
    Unpremultiplied,
    Opaque,
}

/// Fixed, whole-animation properties of a source.
#[derive(Clone, Copy, Debug)]
pub struct ImageDescriptor {
    /// Canvas width in pixels; every frame composites onto this canvas.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// The source's native alpha handling. Delivered frames are always
    /// premultiplied regardless; see [`FrameSource::decode_into`].
    pub alpha: AlphaMode,
}

/// Metadata for one frame, queried before that frame is decoded.
#[derive(Clone, Debug, Default)]
pub struct FrameInfo {
    /// Frame this one must be composited on top of, if any.
    pub required_frame: Option<usize>,
    /// How to prepare the canvas for the frame after this one.
    pub disposal: DisposalMethod,
    /// Region cleared under [`DisposalMethod::RestoreBackground`].
    pub disposal_rect: Option<Rect>,
    /// How long the frame is displayed, in milliseconds.
    pub duration_ms: u32,
}

/// A single-frame decoder for an animated image.
///
/// Implementations decode one frame at a time into a caller-provided buffer.
/// The pipeline seeds that buffer according to the previous frame's disposal
/// method before calling [`decode_into`](Self::decode_into), so sources only
/// draw the requested frame's own pixels.
///
/// Sources are shared between the caller-visible handle and in-flight decode
/// work, and are called from a dedicated decode thread; hence `Send + Sync`.
pub trait FrameSource: Send + Sync {
    /// Canvas dimensions and native alpha mode, fixed for the source's life.
    fn descriptor(&self) -> ImageDescriptor;

    /// Total number of frames. May be zero for broken inputs.
    fn frame_count(&self) -> usize;

    /// Raw play count as reported by the container.
    fn play_count(&self) -> PlayCount;

    /// Metadata for frame `index`. `index` is always `< frame_count()`.
    fn frame_info(&self, index: usize) -> FrameInfo;

    /// Decode frame `index` into `target`, which is already seeded per the
    /// prior frame's disposal. `required_frame` is the dependency index from
    /// [`FrameInfo::required_frame`], passed back so stateful decoders can
    /// verify or rebuild their frame chain.
    ///
    /// Pixels are RGBA8. Sources declaring [`AlphaMode::Unpremultiplied`]
    /// write straight alpha and the pipeline converts fresh canvases after
    /// decoding; seeded canvases already hold premultiplied pixels, so a
    /// decode on top of one must write premultiplied values itself. Returns
    /// `false` on decode failure, in which case `target`'s contents are
    /// unspecified and will be discarded.
    fn decode_into(
        &self,
        target: &mut PixelBuffer,
        index: usize,
        required_frame: Option<usize>,
    ) -> bool;
}
