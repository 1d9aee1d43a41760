//! animpipe - frame-by-frame decoding, compositing and cross-thread delivery
//! for animated raster images (GIF/APNG-style).
//!
//! Callers repeatedly ask an [`AnimatedImage`] for "the next frame". Each
//! request is composited against prior frames according to per-frame
//! disposal rules on a dedicated decode thread, materialized into a
//! displayable image, and delivered back to the caller's result thread.
//! Bitstream decoding and GPU upload stay behind the [`FrameSource`] and
//! [`ImageMaterializer`] seams.

pub mod buffer;
pub mod compositor;
pub mod cursor;
pub mod error;
pub mod materialize;
pub mod pipeline;
pub mod schedule;
pub mod source;

pub use buffer::PixelBuffer;
pub use error::FrameError;
pub use materialize::{CpuImage, CpuMaterializer, ImageMaterializer};
pub use pipeline::{AnimatedImage, FrameResponse};
pub use schedule::{DecodeWorker, TaskQueue, TaskSender};
pub use source::{
    AlphaMode, DisposalMethod, FrameInfo, FrameSource, ImageDescriptor, PlayCount, Rect,
};
