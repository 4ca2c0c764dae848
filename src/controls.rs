use std::sync::atomic::{AtomicBool, Ordering};

/// Control flags shared between the UI side and the frame processor.
///
/// One instance lives in an `Arc`: the host mutates it from input callbacks,
/// the processor reads it at the top of every frame. Flags default to off on
/// construction, so rebuilding the processing chain also resets them.
#[derive(Debug, Default)]
pub struct SharedControls {
    paused: AtomicBool,
    reset_requested: AtomicBool,
    show_features: AtomicBool,
}

impl SharedControls {
    pub fn new() -> SharedControls {
        SharedControls::default()
    }

    pub fn paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Requests that all accumulated mosaic state be discarded before the
    /// next stitched frame.
    pub fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
    }

    pub fn reset_requested(&self) -> bool {
        self.reset_requested.load(Ordering::Acquire)
    }

    /// Consumes a pending reset request. Returns true at most once per
    /// request.
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    pub fn show_features(&self) -> bool {
        self.show_features.load(Ordering::Acquire)
    }

    pub fn set_show_features(&self, show: bool) {
        self.show_features.store(show, Ordering::Release);
    }
}
