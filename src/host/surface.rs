//! Shared surface state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::traits::Surface;

/// Surface whose visibility and scroll offset are set by the host loop.
#[derive(Debug, Default)]
pub struct SurfaceState {
    hidden: AtomicBool,
    scroll: Mutex<Option<f64>>,
}

impl SurfaceState {
    /// Create a visible surface with no scroll position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the surface hidden or visible.
    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::SeqCst);
    }

    /// Update the scroll offset; `None` means the host has none.
    pub fn set_scroll_offset(&self, offset: Option<f64>) {
        *self.scroll.lock().unwrap_or_else(PoisonError::into_inner) = offset;
    }
}

impl Surface for SurfaceState {
    fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::SeqCst)
    }

    fn scroll_offset(&self) -> Option<f64> {
        *self.scroll.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
