//! The I/O seam between the sans-IO client and the network.
//!
//! # Design
//! A `Gateway` executes one `HttpRequest` and hands back the raw
//! `HttpResponse`. Status interpretation stays in `TodoClient::parse_*`, so
//! implementations must return 4xx/5xx responses as `Ok`. Only failures that
//! prevent a response from existing are errors: `ApiError::Transport` or
//! `ApiError::Timeout`.

use std::future::Future;
use std::sync::Arc;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes HTTP round-trips on behalf of a [`TodoView`](crate::TodoView).
pub trait Gateway {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>>;
}

impl<G: Gateway + ?Sized> Gateway for &G {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> {
        (**self).execute(request)
    }
}

impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> {
        (**self).execute(request)
    }
}
