use std::fmt::{Display, Formatter};
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use tower::{Layer, Service};
use uuid::Uuid;

/// Identifier minted for each request, attached to its tracing span and
/// echoed back in the `x-request-id` response header.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(Uuid);

impl Deref for RequestId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestIdLayer {}

impl RequestIdLayer {
    pub fn new() -> Self {
        Self {}
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;
    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>, Response = Response<Body>>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }
    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let request_id = RequestId(Uuid::new_v4());
        req.extensions_mut().insert(request_id);
        let fut = self.inner.call(req);
        let request_id = request_id.to_string();
        let inner = async move {
            let res: Result<Self::Response, Self::Error> = fut.await;
            res.map(|mut it| {
                it.headers_mut()
                    .insert("x-request-id", request_id.parse().unwrap());
                it
            })
        };
        Box::pin(inner)
    }
}
