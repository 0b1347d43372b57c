//! Per-IP rate limiting for the whole API
//!
//! Best-effort, process-local throttle. The stricter per-user limit for UPI
//! updates lives in `crate::upi`.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tokio::sync::RwLock;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket limiter keyed by client IP
#[derive(Clone)]
pub struct IpRateLimiter {
    buckets: Arc<RwLock<HashMap<String, Bucket>>>,
    refill_per_second: f64,
    capacity: f64,
}

impl IpRateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            refill_per_second: requests_per_second as f64,
            capacity: requests_per_second as f64,
        }
    }

    /// Check if a request from this client is allowed
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.write().await;
        let now = Instant::now();

        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_second).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop buckets that have been idle longer than `max_age`
    pub async fn cleanup(&self, max_age: std::time::Duration) {
        let mut buckets = self.buckets.write().await;
        let now = Instant::now();
        buckets.retain(|_, bucket| now.duration_since(bucket.last_refill) < max_age);
    }
}

/// Rate limiting middleware, for use with `middleware::from_fn_with_state`
pub async fn rate_limit(
    State(limiter): State<IpRateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client_key = extract_client_ip(&request);

    if !limiter.check(&client_key).await {
        tracing::warn!(client = %client_key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "1")],
            "Too many requests. Please try again later.",
        )
            .into_response();
    }

    next.run(request).await
}

/// Extract client IP from request headers
pub(crate) fn extract_client_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(ip) = s.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(s) = real_ip.to_str() {
            return s.to_string();
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ip_rate_limiter_exhausts() {
        let limiter = IpRateLimiter::new(5);

        for _ in 0..5 {
            assert!(limiter.check("203.0.113.5").await);
        }

        // Bucket empty
        assert!(!limiter.check("203.0.113.5").await);
    }

    #[tokio::test]
    async fn test_ip_rate_limiter_per_client() {
        let limiter = IpRateLimiter::new(1);

        assert!(limiter.check("client-a").await);
        assert!(limiter.check("client-b").await);
        assert!(!limiter.check("client-a").await);
    }
}
