//! Configuration types for seeding.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

use crate::retry::RetryPolicy;

/// Longest day offset accepted for schedule and subscription windows.
pub const MAX_DAY_WINDOW: i64 = 36_500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} range is inverted: {min} > {max}")]
    Inverted { field: &'static str, min: i64, max: i64 },
    #[error("{field} range {min}..={max} must lie within {lo}..={hi}")]
    OutOfBounds {
        field: &'static str,
        min: i64,
        max: i64,
        lo: i64,
        hi: i64,
    },
}

/// Inclusive integer range used for the randomized columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: i64,
    pub max: i64,
}

impl Span {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Returns a uniformly random value in `[min, max]`.
    ///
    /// Panics if `min > max`; [`SeedConfig::validate`] rejects such spans.
    pub fn sample(&self, rng: &mut impl Rng) -> i64 {
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Checks that the span is ordered and inside `[lo, hi]`.
    pub fn check(&self, field: &'static str, lo: i64, hi: i64) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::Inverted {
                field,
                min: self.min,
                max: self.max,
            });
        }
        if self.min < lo || self.max > hi {
            return Err(ConfigError::OutOfBounds {
                field,
                min: self.min,
                max: self.max,
                lo,
                hi,
            });
        }
        Ok(())
    }
}

/// How many staff rows of each role to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMix {
    pub managers: usize,
    pub trainers: usize,
    pub receptionists: usize,
    pub cleaners: usize,
}

impl StaffMix {
    pub fn total(&self) -> usize {
        self.managers + self.trainers + self.receptionists + self.cleaners
    }
}

impl Default for StaffMix {
    fn default() -> Self {
        Self {
            managers: 100,
            trainers: 1000,
            receptionists: 200,
            cleaners: 500,
        }
    }
}

/// Volume and distribution targets for a seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Staff rows per role.
    pub staff_mix: StaffMix,

    /// Number of branches.
    pub branch_count: usize,

    /// Branch capacity range.
    pub branch_capacity: Span,

    /// Number of members generated (before conflict skipping).
    pub member_count: usize,

    /// Subscriptions starting within `active_window_days` of today.
    pub active_subscriptions: usize,

    /// Subscriptions starting within `expired_window_days` before today.
    pub expired_subscriptions: usize,

    /// Days before today an active subscription may start.
    pub active_window_days: Span,

    /// Days before today an expired subscription may start.
    pub expired_window_days: Span,

    /// Per-branch stock of every inventory item.
    pub inventory_quantity: Span,

    /// Number of class sessions.
    pub session_count: usize,

    /// Days ahead of now a session may be scheduled.
    pub session_days_ahead: Span,

    /// Bookings for a 10-seat session.
    pub small_class_fill: Span,

    /// Bookings for a 30-seat session.
    pub large_class_fill: Span,

    /// Rows per multi-row insert statement.
    pub batch_size: usize,

    /// Fixed rng seed for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            staff_mix: StaffMix::default(),
            branch_count: 100,
            branch_capacity: Span::new(50, 500),
            member_count: 10_000,
            active_subscriptions: 9000,
            expired_subscriptions: 6000,
            active_window_days: Span::new(0, 20),
            expired_window_days: Span::new(400, 500),
            inventory_quantity: Span::new(5, 50),
            session_count: 300,
            session_days_ahead: Span::new(1, 14),
            small_class_fill: Span::new(5, 10),
            large_class_fill: Span::new(15, 30),
            batch_size: 1000,
            rng_seed: None,
        }
    }
}

impl SeedConfig {
    /// A scaled-down configuration that keeps every distribution rule intact.
    pub fn small() -> Self {
        Self {
            staff_mix: StaffMix {
                managers: 5,
                trainers: 20,
                receptionists: 4,
                cleaners: 6,
            },
            branch_count: 5,
            member_count: 200,
            active_subscriptions: 90,
            expired_subscriptions: 60,
            session_count: 30,
            batch_size: 50,
            ..Self::default()
        }
    }

    /// Rejects spans that would panic when sampled or overflow the column
    /// they are stored in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let int_column = i64::from(i32::MAX);
        let fill_limit = i64::try_from(usize::MAX).unwrap_or(i64::MAX);

        self.branch_capacity.check("branch_capacity", 0, int_column)?;
        self.inventory_quantity.check("inventory_quantity", 0, int_column)?;
        self.active_window_days.check("active_window_days", 0, MAX_DAY_WINDOW)?;
        self.expired_window_days.check("expired_window_days", 0, MAX_DAY_WINDOW)?;
        self.session_days_ahead.check("session_days_ahead", 0, MAX_DAY_WINDOW)?;
        self.small_class_fill.check("small_class_fill", 0, fill_limit)?;
        self.large_class_fill.check("large_class_fill", 0, fill_limit)?;
        Ok(())
    }

    /// Total subscriptions generated before conflict skipping.
    pub fn subscription_count(&self) -> usize {
        self.active_subscriptions + self.expired_subscriptions
    }
}

/// Where and how persistently to connect.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Overrides the discrete fields above when set.
    pub url: Option<String>,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: "db".to_string(),
            port: 5432,
            database: "GYM_MANAGEMENT_SYSTEM".to_string(),
            username: "root".to_string(),
            password: "hello".to_string(),
            url: None,
            max_attempts: 10,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl ConnectConfig {
    /// Uses a full connection URL instead of the default host constants.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_delay)
    }

    /// Builds connect options, parsing `url` when present.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .database(&self.database)
                .username(&self.username)
                .password(&self.password)),
        }
    }
}
