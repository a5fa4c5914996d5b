//! Where the sync loop reports failures.
//!
//! Failures never reach the rendered view. They go to a `Diagnostics` sink,
//! which by default is the `tracing` error log.

use crate::error::RequestFailed;

pub trait Diagnostics {
    fn request_failed(&self, error: &RequestFailed);
}

/// Logs every failure at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn request_failed(&self, error: &RequestFailed) {
        tracing::error!(operation = %error.operation, error = %error.source, "request failed");
    }
}

impl<F> Diagnostics for F
where
    F: Fn(&RequestFailed),
{
    fn request_failed(&self, error: &RequestFailed) {
        self(error)
    }
}
