//! Ties in-flight requests to the lifetime of the view that issued them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{AbortHandle, AbortRegistration};

/// Cloneable unmount handle shared between a view and whoever owns its
/// lifecycle.
///
/// Once [`unmount`](Lifetime::unmount) is called the request currently in
/// flight is aborted and no further requests are registered.
#[derive(Debug, Clone, Default)]
pub struct Lifetime {
    inner: Arc<Mutex<LifetimeState>>,
}

#[derive(Debug, Default)]
struct LifetimeState {
    unmounted: bool,
    in_flight: Option<AbortHandle>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unmount(&self) {
        let mut state = self.lock();
        state.unmounted = true;
        if let Some(handle) = state.in_flight.take() {
            tracing::debug!("aborting in-flight request on unmount");
            handle.abort();
        }
    }

    pub fn is_unmounted(&self) -> bool {
        self.lock().unmounted
    }

    /// Registers a new in-flight request. Returns `None` after unmount.
    pub(crate) fn register(&self) -> Option<AbortRegistration> {
        let mut state = self.lock();
        if state.unmounted {
            return None;
        }
        let (handle, registration) = AbortHandle::new_pair();
        state.in_flight = Some(handle);
        Some(registration)
    }

    pub(crate) fn settle(&self) {
        self.lock().in_flight = None;
    }

    fn lock(&self) -> MutexGuard<'_, LifetimeState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Unmounts the lifetime when the owning view is dropped.
#[derive(Debug)]
pub(crate) struct UnmountOnDrop(pub(crate) Lifetime);

impl Drop for UnmountOnDrop {
    fn drop(&mut self) {
        self.0.unmount();
    }
}
