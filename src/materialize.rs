//! Turning composited pixel buffers into displayable images.

use crate::buffer::PixelBuffer;
use crate::error::FrameError;
use image::RgbaImage;
use std::sync::Arc;

/// Converts a composited pixel buffer into a renderable image handle.
///
/// Materialization runs on the decode thread (it may block on a GPU context
/// handoff) and must never assume a GPU context is available: when it is
/// not, implementations are expected to degrade to a CPU-backed image rather
/// than fail. GPU-resident backends express their handle via the associated
/// `Image` type.
pub trait ImageMaterializer: Send + Sync {
    type Image: Send + 'static;

    fn materialize(&self, buffer: PixelBuffer) -> Result<Self::Image, FrameError>;
}

/// A CPU-backed renderable image: premultiplied RGBA8 pixels wrapped in an
/// [`image::RgbaImage`], cheaply cloneable for handoff to a renderer.
#[derive(Clone, Debug)]
pub struct CpuImage {
    image: Arc<RgbaImage>,
}

impl CpuImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }
}

/// The always-available fallback materializer. Produces [`CpuImage`]s and
/// never touches a GPU context.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuMaterializer;

impl ImageMaterializer for CpuMaterializer {
    type Image = CpuImage;

    fn materialize(&self, buffer: PixelBuffer) -> Result<CpuImage, FrameError> {
        let (width, height) = (buffer.width(), buffer.height());
        let image = RgbaImage::from_raw(width, height, buffer.into_vec()).ok_or_else(|| {
            FrameError::Materialize(format!(
                "pixel buffer does not match declared dimensions {width}x{height}"
            ))
        })?;
        Ok(CpuImage { image: Arc::new(image) })
    }
}
