//! The per-frame disposal state machine.
//!
//! Each frame's visible canvas is built from the prior canvas state modified
//! by the previous frame's disposal instruction, not simple frame-over-frame
//! overwrite. The compositor owns the two pieces of mutable state that make
//! that work: the last retained composited frame and the pending
//! restore-background rectangle.

use crate::buffer::PixelBuffer;
use crate::error::FrameError;
use crate::source::{AlphaMode, DisposalMethod, FrameSource, Rect};

/// What to retain for the next frame, decided from the disposal method alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Retention {
    /// Overwrite the retained frame with the frame just composited.
    RetainCurrent,
    /// Leave the retained frame unchanged.
    KeepExisting,
}

/// Pure transition function of the disposal state machine: given the frame's
/// disposal instruction and whether a retained frame already exists, decide
/// what to retain and which rectangle (if any) must be erased before the
/// next frame is decoded.
///
/// * `Keep` always retains the current frame.
/// * `RestorePrevious` keeps the existing retained frame, unless none exists
///   yet; with nothing to restore to it falls back to `Keep` semantics.
/// * `RestoreBackground` and unspecified disposal retain the current frame
///   once any frame has been retained ("keep" is the default whenever
///   restoring to a previous frame is not explicitly requested).
pub fn plan_retention(
    disposal: DisposalMethod,
    disposal_rect: Option<Rect>,
    has_retained: bool,
) -> (Retention, Option<Rect>) {
    let retention = match disposal {
        DisposalMethod::Keep => Retention::RetainCurrent,
        DisposalMethod::RestorePrevious => {
            if has_retained {
                Retention::KeepExisting
            } else {
                Retention::RetainCurrent
            }
        }
        DisposalMethod::RestoreBackground | DisposalMethod::None => {
            if has_retained {
                Retention::RetainCurrent
            } else {
                Retention::KeepExisting
            }
        }
    };

    let erase = match disposal {
        DisposalMethod::RestoreBackground => disposal_rect,
        _ => None,
    };

    (retention, erase)
}

/// Composites raw decoded frames into display-ready canvases.
///
/// Owned exclusively by the decode thread; see [`crate::pipeline`].
#[derive(Debug, Default)]
pub struct FrameCompositor {
    retained: Option<PixelBuffer>,
    pending_erase: Option<Rect>,
}

impl FrameCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the composited canvas for frame `index`.
    ///
    /// On failure the retained frame and pending erase rect are left
    /// untouched, so the next request starts from an unaffected state.
    pub fn compose_frame(
        &mut self,
        source: &dyn FrameSource,
        index: usize,
    ) -> Result<PixelBuffer, FrameError> {
        let descriptor = source.descriptor();
        let mut output =
            PixelBuffer::try_allocate(descriptor.width, descriptor.height).map_err(|err| {
                log::error!("{err}");
                err
            })?;

        let info = source.frame_info(index);

        let mut seeded = false;
        if let Some(required) = info.required_frame {
            match &self.retained {
                Some(previous)
                    if (previous.width(), previous.height())
                        == (output.width(), output.height()) =>
                {
                    output.copy_from(previous);
                    if let Some(rect) = self.pending_erase {
                        output.erase_rect(rect);
                    }
                    seeded = true;
                }
                Some(_) => {
                    // A source that changes its declared dimensions leaves
                    // the retained canvas incompatible; treat it as uncached.
                    log::debug!(
                        "frame {index} depends on frame {required} but the retained \
                         canvas no longer matches the source dimensions; using blank \
                         slate instead"
                    );
                }
                None => {
                    // Best-effort fallback, not an error: decode onto a blank
                    // slate when the dependency was never retained.
                    log::debug!(
                        "frame {index} depends on frame {required} and no required \
                         frames are cached; using blank slate instead"
                    );
                }
            }
        }

        // The buffer is now seeded in accordance with the previous frame's
        // disposal policy; the source draws this frame's own pixels on top.
        if !source.decode_into(&mut output, index, info.required_frame) {
            let err = FrameError::Decode { frame: index };
            log::error!("{err}");
            return Err(err);
        }

        // Straight-alpha sources are converted here so everything retained
        // and delivered downstream is premultiplied. A seeded canvas already
        // holds premultiplied pixels, so conversion only applies to canvases
        // the source drew from scratch.
        if descriptor.alpha == AlphaMode::Unpremultiplied && !seeded {
            output.premultiply_in_place();
        }

        let (retention, erase) =
            plan_retention(info.disposal, info.disposal_rect, self.retained.is_some());
        if retention == Retention::RetainCurrent {
            self.retained = Some(output.clone());
        }
        self.pending_erase = erase;

        Ok(output)
    }

    /// The canvas the next dependent frame will start from, if any.
    pub fn retained_frame(&self) -> Option<&PixelBuffer> {
        self.retained.as_ref()
    }

    /// Rectangle the next composition will clear after copying the retained
    /// frame, set by a `RestoreBackground` disposal.
    pub fn pending_erase_rect(&self) -> Option<Rect> {
        self.pending_erase
    }
}
