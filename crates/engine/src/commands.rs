//! Command structs for engine operations.
//!
//! These types group parameters for the operations that are not driven by a
//! JSON payload (bootstrap, listing), keeping call sites readable.

use crate::{BodyRegion, MoneyCents, Role};

/// Create an account. The API token is generated by the engine.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl NewAccount {
    #[must_use]
    pub fn new(display_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            role,
        }
    }
}

/// Add a package to the storefront.
#[derive(Clone, Debug)]
pub struct NewStorefrontItem {
    pub name: String,
    pub sessions: i64,
    pub price: MoneyCents,
}

/// Add an exercise to the library.
#[derive(Clone, Debug)]
pub struct NewExercise {
    pub name: String,
    pub body_region: Option<BodyRegion>,
}

/// Page through a client's workouts, newest first.
#[derive(Clone, Debug, Default)]
pub struct WorkoutListQuery {
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

impl WorkoutListQuery {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 100;

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub(crate) fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}
