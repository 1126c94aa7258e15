mod error_handler;
mod preflight;
mod rate_limit;

pub use error_handler::log_errors;
pub use preflight::no_content_preflight;
pub use rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimiter, client_identity, rate_limit};
