pub use access::{AccessDecision, DenyReason, Requester, Role, decide};
pub use accounts::{Account, CreditBalance};
pub use assignments::{Assignment, AssignmentStatus};
pub use commands::{NewAccount, NewExercise, NewStorefrontItem, WorkoutListQuery};
pub use commission::{CommissionSplit, LOYALTY_BUMP_BPS, LeadSource, LoyaltyPolicy, compute_split};
pub use commissions::CommissionRecord;
pub use error::EngineError;
pub use exercises::Exercise;
pub use money::MoneyCents;
pub use ops::{
    DeductionReport, Engine, EngineBuilder, PlanSaved, PurchaseReceipt, WorkoutLogged,
    WorkoutPage,
};
pub use order_items::OrderItem;
pub use orders::{Order, OrderStatus};
pub use plan_days::PlanDay;
pub use plan_exercises::PlanExercise;
pub use storefront::StorefrontItem;
pub use tax::{TaxBreakdown, TaxTable, compute_tax};
pub use training_sessions::{SessionStatus, TrainingSession};
pub use util::{hash_api_token, normalize_exercise_name};
pub use workout_log_rows::{BodyRegion, Weight, WorkoutRow};
pub use workout_plans::{DayType, OptPhase, WorkoutPlan};
pub use workouts::{Workout, WorkoutTotals};

mod access;
mod accounts;
mod assignments;
mod commands;
mod commission;
mod commissions;
mod error;
mod exercises;
mod money;
mod ops;
mod order_items;
mod orders;
mod plan_days;
mod plan_exercises;
mod storefront;
mod tax;
mod training_sessions;
mod util;
pub mod validation;
mod workout_log_rows;
mod workout_plans;
mod workouts;

type ResultEngine<T> = Result<T, EngineError>;
