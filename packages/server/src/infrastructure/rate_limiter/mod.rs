//! RateLimiter 実装

mod sliding_window;

pub use sliding_window::SlidingWindowRateLimiter;
