use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub service: String,
    pub converter_url: String,
    pub rate_limiting: RateLimitStats,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RateLimitStats {
    pub total_requests: u64,
    pub rejected_requests: u64,
    pub available_permits: usize,
    pub rejection_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub converter: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub request_id: String,
    pub timestamp: String,
}

impl RateLimitStats {
    pub fn new(total_requests: u64, rejected_requests: u64, available_permits: usize) -> Self {
        let rejection_rate = if total_requests > 0 {
            (rejected_requests as f64 / total_requests as f64 * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total_requests,
            rejected_requests,
            available_permits,
            rejection_rate,
        }
    }
}
