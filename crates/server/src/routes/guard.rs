use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::REFERER,
    middleware::Next,
    response::Response,
};
use service::guard::{check_referer, RefererPolicy};

use crate::errors::ApiError;

/// Middleware: reject posts calls whose `Referer` is not the deployment's own domain.
pub async fn require_referer(
    State(policy): State<Arc<RefererPolicy>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let referer = req.headers().get(REFERER).and_then(|v| v.to_str().ok());
    check_referer(referer, &policy)?;
    Ok(next.run(req).await)
}
