//! The two-stage, two-thread frame request pipeline.
//!
//! A request hops threads twice: the decode thread composites the frame and
//! materializes it into a displayable image, then the finished result is
//! posted back to the result thread's queue for delivery. All mutable codec
//! state is only ever touched from the decode thread; the result thread
//! reads nothing but the immutable `frame_count`/`repetition_count` fields.

use crate::compositor::FrameCompositor;
use crate::cursor::{repetition_count, AnimationCursor};
use crate::error::FrameError;
use crate::materialize::ImageMaterializer;
use crate::schedule::TaskSender;
use crate::source::FrameSource;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// The completion payload for one frame request, delivered exactly once on
/// the result thread.
#[derive(Debug)]
pub struct FrameResponse<I> {
    /// The displayable frame, absent when any stage failed.
    pub image: Option<I>,
    /// Display duration of the frame in milliseconds; 0 when no image was
    /// produced.
    pub duration_ms: u32,
    /// Human-readable failure description, `None` on success.
    pub error: Option<String>,
}

impl<I> FrameResponse<I> {
    fn failure(error: FrameError) -> Self {
        Self { image: None, duration_ms: 0, error: Some(error.to_string()) }
    }
}

/// State shared between the caller-visible handle and in-flight decode work.
///
/// In-flight work holds this strongly so a frame mid-decode can outlive the
/// caller-visible [`AnimatedImage`]; the pending-pickup check goes through a
/// `Weak` instead so released handles short-circuit (see
/// [`AnimatedImage::request_next_frame`]).
struct CodecShared {
    source: Arc<dyn FrameSource>,
    frame_count: usize,
    repetition_count: i32,
    /// Decode-thread-only state. The mutex is never contended: a single
    /// decode worker processes requests for this instance in FIFO order.
    state: Mutex<DecodeState>,
}

struct DecodeState {
    cursor: AnimationCursor,
    compositor: FrameCompositor,
}

impl CodecShared {
    fn decode_and_deliver<M, F>(
        self: Arc<Self>,
        materializer: &M,
        results: &TaskSender,
        callback: F,
    ) where
        M: ImageMaterializer,
        F: FnOnce(FrameResponse<M::Image>) + Send + 'static,
    {
        let mut state = self.state.lock();
        let index = state.cursor.next_index();

        let (image, error) = match state.compositor.compose_frame(self.source.as_ref(), index) {
            Ok(buffer) => match materializer.materialize(buffer) {
                Ok(image) => (Some(image), None),
                // A materialization error overrides the decode success.
                Err(err) => (None, Some(err.to_string())),
            },
            Err(err) => (None, Some(err.to_string())),
        };

        let duration_ms = if image.is_some() {
            self.source.frame_info(index).duration_ms
        } else {
            0
        };

        // The cursor advances on success and failure alike, so a transient
        // bad frame is skipped rather than retried forever.
        state.cursor.advance();
        drop(state);

        results.post(move || callback(FrameResponse { image, duration_ms, error }));
    }
}

/// Caller-visible handle to one animated image.
///
/// Immutable once constructed: `frame_count` and `repetition_count` are
/// fixed at creation and safe to read from any thread while requests are in
/// flight.
pub struct AnimatedImage<M: ImageMaterializer> {
    shared: Arc<CodecShared>,
    materializer: Arc<M>,
}

impl<M: ImageMaterializer + 'static> AnimatedImage<M> {
    pub fn new(source: Arc<dyn FrameSource>, materializer: Arc<M>) -> Self {
        let frame_count = source.frame_count();
        let repetition_count = repetition_count(source.play_count());
        let shared = Arc::new(CodecShared {
            source,
            frame_count,
            repetition_count,
            state: Mutex::new(DecodeState {
                cursor: AnimationCursor::new(frame_count),
                compositor: FrameCompositor::new(),
            }),
        });
        Self { shared, materializer }
    }

    pub fn frame_count(&self) -> usize {
        self.shared.frame_count
    }

    /// Number of *additional* loops after the first pass; `-1` loops forever.
    pub fn repetition_count(&self) -> i32 {
        self.shared.repetition_count
    }

    /// Request the next frame in animation order.
    ///
    /// The frame is composited and materialized on the decode thread behind
    /// `decode`, then `callback` is posted to `results` with the finished
    /// [`FrameResponse`]. Requests are processed in submission order.
    ///
    /// If this handle is dropped before the decode thread picks the request
    /// up, no decode is started: the callback is posted to the result thread
    /// un-invoked, so resources it captured are still released there
    /// deterministically.
    pub fn request_next_frame<F>(&self, decode: &TaskSender, results: &TaskSender, callback: F)
    where
        F: FnOnce(FrameResponse<M::Image>) + Send + 'static,
    {
        if self.shared.frame_count == 0 {
            let err = FrameError::NoFrames;
            log::error!("{err}");
            results.post(move || callback(FrameResponse::failure(err)));
            return;
        }

        let weak: Weak<CodecShared> = Arc::downgrade(&self.shared);
        let materializer = Arc::clone(&self.materializer);
        let results = results.clone();

        decode.post(move || {
            let Some(shared) = weak.upgrade() else {
                // Handle released while the request was queued. Drop the
                // callback on the result thread instead of invoking it.
                results.post(move || drop(callback));
                return;
            };
            shared.decode_and_deliver(materializer.as_ref(), &results, callback);
        });
    }
}
