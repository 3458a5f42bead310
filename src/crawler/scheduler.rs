//! Request pacing
//!
//! The job board is fetched politely: a fixed pause after every detail page
//! and a longer one between categories. In parallel mode the per-detail pause
//! turns into a shared rate limiter granting one detail request per period,
//! so concurrency never raises the aggregate request rate.

use crate::config::{ExecutionMode, ScraperConfig};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::time::Duration;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Pacing controller shared by every fetch of a run
pub struct Pacer {
    detail_delay: Duration,
    category_delay: Duration,

    /// One permit per `detail_delay`; absent when the delay is zero
    limiter: Option<DirectLimiter>,
}

impl Pacer {
    /// Creates a pacer with explicit delays
    pub fn new(detail_delay: Duration, category_delay: Duration) -> Self {
        let limiter = Quota::with_period(detail_delay).map(RateLimiter::direct);

        Self {
            detail_delay,
            category_delay,
            limiter,
        }
    }

    /// Creates a pacer from the scraper configuration
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.detail_delay(), config.category_delay())
    }

    pub fn detail_delay(&self) -> Duration {
        self.detail_delay
    }

    pub fn category_delay(&self) -> Duration {
        self.category_delay
    }

    /// Sequential mode: pause after a detail fetch
    pub async fn after_detail(&self) {
        pause(self.detail_delay).await;
    }

    /// Pause after a category before starting the next one
    pub async fn after_category(&self) {
        pause(self.category_delay).await;
    }

    /// Parallel mode: wait for a detail request slot
    pub async fn detail_slot(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// How detail pages of a category are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// One request at a time, paced by sleeping after each detail fetch
    Sequential,

    /// Up to `workers` detail requests in flight, paced by the rate limiter
    Parallel { workers: usize },
}

impl Schedule {
    pub fn from_config(config: &ScraperConfig) -> Self {
        match config.mode {
            ExecutionMode::Sequential => Self::Sequential,
            ExecutionMode::Parallel => Self::Parallel {
                workers: config.max_concurrent_details.max(1) as usize,
            },
        }
    }
}
