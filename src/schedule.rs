//! Scheduler capability consumed by the engine.
//!
//! The host owns the animation-frame loop; the engine only asks it to drive a
//! scalar progress value from 0 to 1 over a wall-clock duration, invoking the
//! frame callback along the way and the completion callback exactly once at
//! the end. The engine is handed in explicitly (no process-wide ticker
//! singleton), shared with the host through `Rc<RefCell<..>>`.

/// Per-frame callback; receives global progress in `[0,1]`.
pub type FrameCallback = Box<dyn FnMut(f64)>;

/// One-shot completion callback, fired when progress reaches 1.
pub type CompleteCallback = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Handle to one progress-driving tween.
    type TweenId: Copy;

    /// Registers a tween with its frame callback. The tween starts idle;
    /// `rearm` + `play` arm and run it.
    fn create(&mut self, on_frame: FrameCallback) -> Self::TweenId;

    /// Resets progress to 0 and sets the total duration. Any pending
    /// completion callback is dropped unfired.
    fn rearm(&mut self, id: Self::TweenId, duration_secs: f64);

    /// Plays from progress 0, firing `on_complete` once when progress
    /// reaches 1.
    fn play(&mut self, id: Self::TweenId, on_complete: CompleteCallback);

    /// Jumps to progress 1 and emits a single frame callback, without
    /// playing and without firing any completion callback.
    fn finish(&mut self, id: Self::TweenId);

    fn is_active(&self, id: Self::TweenId) -> bool;

    /// Stops an in-flight tween. Its completion callback is dropped unfired;
    /// the tween can be re-armed afterwards.
    fn kill(&mut self, id: Self::TweenId);

    /// Unregisters the tween and drops its callbacks.
    fn remove(&mut self, id: Self::TweenId);

    fn duration_secs(&self, id: Self::TweenId) -> f64;
}
