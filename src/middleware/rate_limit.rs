use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::RateLimitStats;
use crate::state::AppState;

/// Admission control for combine requests.
#[derive(Debug)]
pub struct RequestLimiter {
    semaphore: Semaphore,
    total_requests: AtomicU64,
    rejected_requests: AtomicU64,
}

impl RequestLimiter {
    pub fn new(max_requests: usize) -> Self {
        info!(
            max_concurrent_requests = max_requests,
            "Initializing request semaphore"
        );
        Self {
            semaphore: Semaphore::new(max_requests),
            total_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> RateLimitStats {
        RateLimitStats::new(
            self.total_requests.load(Ordering::Relaxed),
            self.rejected_requests.load(Ordering::Relaxed),
            self.semaphore.available_permits(),
        )
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();
    let limiter: &Arc<RequestLimiter> = &state.limiter;

    let total_requests = limiter.total_requests.fetch_add(1, Ordering::Relaxed) + 1;

    let _permit = limiter.semaphore.try_acquire().map_err(|_| {
        let rejected = limiter.rejected_requests.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            path = path,
            total_requests = total_requests,
            rejected_requests = rejected,
            available_permits = limiter.semaphore.available_permits(),
            "Rate limit exceeded - too many concurrent requests"
        );
        AppError::RateLimitExceeded
    })?;

    debug!(
        path = path,
        total_requests = total_requests,
        available_permits = limiter.semaphore.available_permits(),
        "Request permit acquired"
    );

    let response = next.run(request).await;

    debug!(path = path, "Request completed, permit released");

    Ok(response)
}
