//! Busy indicator boundary.
//!
//! Runners call [`BusyIndicator::show`] before sending and
//! [`BusyIndicator::hide`] once the call settles. Every runner toggles the
//! indicator independently, so with overlapping calls the first one to finish
//! hides it. Wrap the indicator in [`CountingIndicator`] to hide only after the
//! last in-flight call settles.

use std::sync::Arc;
use std::sync::Mutex;

/// Process-wide "something is loading" signal.
pub trait BusyIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

impl<T: BusyIndicator + ?Sized> BusyIndicator for Arc<T> {
    fn show(&self) {
        (**self).show();
    }

    fn hide(&self) {
        (**self).hide();
    }
}

/// Indicator that does nothing. Used when a family configures none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIndicator;

impl BusyIndicator for NoopIndicator {
    fn show(&self) {}
    fn hide(&self) {}
}

/// Reference-counted wrapper: forwards `show` when the first call starts and
/// `hide` when the last one settles.
#[derive(Debug, Default)]
pub struct CountingIndicator<I> {
    inner: I,
    in_flight: Mutex<usize>,
}

impl<I: BusyIndicator> CountingIndicator<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            in_flight: Mutex::new(0),
        }
    }

    /// Number of calls currently holding the indicator.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<I: BusyIndicator> BusyIndicator for CountingIndicator<I> {
    fn show(&self) {
        // The lock is held while forwarding so show/hide reach `inner` in
        // counter order.
        let mut count = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        *count += 1;
        if *count == 1 {
            self.inner.show();
        }
    }

    fn hide(&self) {
        let mut count = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        match *count {
            0 => {
                tracing::warn!(target: "apirunner::busy", "hide() without matching show()");
            }
            1 => {
                *count = 0;
                self.inner.hide();
            }
            _ => *count -= 1,
        }
    }
}

/// Shows the indicator on creation and hides it on drop, so `hide` runs on
/// every exit path of a call, including panics in hooks and dropped futures.
pub struct BusyGuard {
    indicator: Option<Arc<dyn BusyIndicator>>,
}

impl BusyGuard {
    /// Show `indicator` if `active`; otherwise the guard is inert.
    pub fn new(indicator: &Arc<dyn BusyIndicator>, active: bool) -> Self {
        if !active {
            return Self { indicator: None };
        }
        indicator.show();
        Self {
            indicator: Some(Arc::clone(indicator)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.indicator.is_some()
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Some(indicator) = self.indicator.take() {
            indicator.hide();
        }
    }
}
