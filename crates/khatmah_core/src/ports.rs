//! crates/khatmah_core/src/ports.rs
//!
//! Defines the service contract (trait) for schedule persistence.
//! The core stays independent of any concrete database; the API service
//! supplies an adapter implementing this port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DayStatus, ImamAssignment, NewReadingPlan, ReadingPlan, ScheduleDay};

/// A generic error type for all port operations, abstracting away the
/// specific errors of the external service behind the adapter.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Persistence boundary for reading plans and their per-day records.
///
/// A mosque keeps a single active plan; creating a new one replaces the
/// previous plan together with its days and imam assignments.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Atomically replaces the owner's plan, bulk-inserting the computed
    /// days and imam assignments. Returns the stored plan with its
    /// assigned identity and share token.
    async fn replace_plan(
        &self,
        owner_id: Uuid,
        plan: NewReadingPlan,
        days: Vec<ScheduleDay>,
        imams: Vec<ImamAssignment>,
    ) -> PortResult<ReadingPlan>;

    /// The owner's most recently created plan.
    async fn latest_plan(&self, owner_id: Uuid) -> PortResult<ReadingPlan>;

    async fn plan_by_id(&self, plan_id: Uuid) -> PortResult<ReadingPlan>;

    /// Resolves a public share token to its plan.
    async fn plan_by_share_token(&self, token: &str) -> PortResult<ReadingPlan>;

    /// All per-day records of a plan, ordered by day number.
    async fn days_for_plan(&self, plan_id: Uuid) -> PortResult<Vec<ScheduleDay>>;

    /// Overrides one day's status (e.g. marking a night absent).
    async fn set_day_status(
        &self,
        plan_id: Uuid,
        day_number: u32,
        status: DayStatus,
    ) -> PortResult<()>;

    async fn imams_for_plan(&self, plan_id: Uuid) -> PortResult<Vec<ImamAssignment>>;
}
