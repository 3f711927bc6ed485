//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by client IP and path bucket.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::aio::ConnectionManager;
use std::net::SocketAddr;

use crate::{
    constants::{rate_limits, redis_keys, API_BASE_PATH},
    error::AppError,
    state::AppState,
};

/// Counts a hit and starts the window in one step, so a counter can never
/// be left without a TTL
const HIT_SCRIPT: &str = r#"
local count = redis.call("INCR", KEYS[1])
if count == 1 or redis.call("TTL", KEYS[1]) == -1 then
    redis.call("EXPIRE", KEYS[1], ARGV[1])
end
return count
"#;

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bucket = path_bucket(request.uri().path());
    let (limit, window) = limit_for(bucket);

    let key = format!("{}:{}:{}", redis_keys::RATE_LIMIT, addr.ip(), bucket);
    let mut redis = state.redis();

    // A Redis outage should not take the API down with it
    let count = match count_hit(&mut redis, &key, window).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Rate limit check skipped");
            return Ok(next.run(request).await);
        }
    };

    if count > limit {
        tracing::debug!(ip = %addr.ip(), bucket, count, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// Increment the counter for `key`, returning the hits in the current window
async fn count_hit(
    redis: &mut ConnectionManager,
    key: &str,
    window_secs: i64,
) -> redis::RedisResult<i64> {
    redis::Script::new(HIT_SCRIPT)
        .key(key)
        .arg(window_secs)
        .invoke_async(redis)
        .await
}

/// Requests per window for a bucket
fn limit_for(bucket: &str) -> (i64, i64) {
    match bucket {
        "submissions" => (
            rate_limits::SUBMISSION_MAX_REQUESTS,
            rate_limits::SUBMISSION_WINDOW_SECS,
        ),
        _ => (
            rate_limits::GENERAL_MAX_REQUESTS,
            rate_limits::GENERAL_WINDOW_SECS,
        ),
    }
}

/// Get bucket for path (for grouping similar endpoints)
fn path_bucket(path: &str) -> &'static str {
    let path = path.strip_prefix(API_BASE_PATH).unwrap_or(path);

    if path.starts_with("/submissions") {
        "submissions"
    } else {
        "general"
    }
}
