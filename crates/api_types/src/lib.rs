//! JSON shapes of the studio HTTP API that are not engine payloads.
//!
//! Write bodies that need field-level validation (purchases, workouts, plans,
//! bookings) are parsed by `engine::validation` from raw JSON; the types here
//! cover the remaining simple requests and the error envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error {
    use super::*;

    /// Body of every non-2xx response.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
        /// Offending field path for validation errors (`exercises[0].sets[1].reps`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub field: Option<String>,
        /// Names that matched nothing in the exercise library (422 only).
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub unmatched: Vec<String>,
    }
}

pub mod assignment {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AssignmentNew {
        pub client_id: Uuid,
        pub trainer_id: Uuid,
    }
}

pub mod order {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderComplete {
        pub payment_reference: Option<String>,
    }
}

pub mod workout {
    use super::*;

    /// Query string of `GET /clients/:clientId/workouts`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct WorkoutListParams {
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }
}

pub mod session {
    use super::*;

    /// Body of `POST /admin/session-deductions`. `now` defaults to the
    /// server clock.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct DeductionRun {
        pub now: Option<DateTime<Utc>>,
    }
}
