//! Premultiplied RGBA8 pixel buffers used for frame composition.

use crate::error::FrameError;
use crate::source::Rect;

const BYTES_PER_PIXEL: usize = 4;

/// An owned, premultiplied RGBA8 pixel buffer.
///
/// Allocation is fallible: animated sources declare their own canvas size, so
/// a hostile or corrupt file can request an absurd buffer. Failure surfaces
/// as [`FrameError::Allocation`] instead of aborting the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed (fully transparent) buffer.
    pub fn try_allocate(width: u32, height: u32) -> Result<Self, FrameError> {
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
            .ok_or(FrameError::Allocation { bytes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| FrameError::Allocation { bytes })?;
        data.resize(bytes, 0);

        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw interleaved RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer, keeping the pixel bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Overwrite this buffer with another buffer of identical dimensions.
    pub fn copy_from(&mut self, other: &PixelBuffer) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.data.copy_from_slice(&other.data);
    }

    /// Clear `rect` to fully transparent. The rectangle is clamped to the
    /// buffer bounds, so oversized disposal rects from the source are safe.
    pub fn erase_rect(&mut self, rect: Rect) {
        let x0 = rect.x.min(self.width) as usize;
        let x1 = rect.x.saturating_add(rect.width).min(self.width) as usize;
        let y0 = rect.y.min(self.height) as usize;
        let y1 = rect.y.saturating_add(rect.height).min(self.height) as usize;

        let stride = self.width as usize * BYTES_PER_PIXEL;
        for y in y0..y1 {
            let start = y * stride + x0 * BYTES_PER_PIXEL;
            let end = y * stride + x1 * BYTES_PER_PIXEL;
            self.data[start..end].fill(0);
        }
    }

    /// Convert straight-alpha pixels to premultiplied alpha in place.
    ///
    /// For sources whose native output is unpremultiplied; the composition
    /// pipeline requires premultiplied buffers throughout.
    pub fn premultiply_in_place(&mut self) {
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            let a = px[3] as u16;
            if a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((*c as u16 * a) / 255) as u8;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }
}
