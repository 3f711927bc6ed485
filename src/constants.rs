//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// EXECUTION SERVICE DEFAULTS
// =============================================================================

/// Default base URL of the code execution service
pub const DEFAULT_EXECUTION_BASE_URL: &str = "http://localhost:2358";

/// Timeout for the submit call in seconds
pub const DEFAULT_SUBMIT_TIMEOUT_SECONDS: u64 = 10;

/// Timeout for a single result fetch in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 10;

/// How many times a not-ready result is polled before giving up
pub const DEFAULT_RESULT_POLL_ATTEMPTS: u32 = 5;

/// Delay between result polls in milliseconds
pub const DEFAULT_RESULT_POLL_INTERVAL_MS: u64 = 500;

/// Timeout for persisting a solved question record in seconds
pub const DEFAULT_RECONCILE_TIMEOUT_SECONDS: u64 = 5;

/// Lifetime of the per-student in-flight submission lock in seconds
pub const DEFAULT_IN_FLIGHT_LOCK_SECONDS: u64 = 120;

// =============================================================================
// GRADING
// =============================================================================

/// Stand-in for a line missing on one side of an output comparison
pub const MISSING_LINE: &str = "null";

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const STUDENT: &str = "student";
}

// =============================================================================
// REDIS KEYS
// =============================================================================

/// Redis key prefixes
pub mod redis_keys {
    /// Prefix of the in-flight submission lock, `in_flight:{student}:{question}`
    pub const IN_FLIGHT: &str = "in_flight";

    /// Prefix of rate limit counters, `rate_limit:{ip}:{bucket}`
    pub const RATE_LIMIT: &str = "rate_limit";
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Submission endpoints - max requests
    pub const SUBMISSION_MAX_REQUESTS: i64 = 10;
    /// Submission endpoints - window in seconds
    pub const SUBMISSION_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum source code size in bytes (1 MB)
pub const MAX_SOURCE_CODE_SIZE: u64 = 1024 * 1024;

/// Maximum custom stdin size in bytes (1 MB)
pub const MAX_STDIN_SIZE: u64 = 1024 * 1024;
