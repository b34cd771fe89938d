//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ScheduleStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::NaiveDate;
use khatmah_core::domain::{
    DayStatus, ImamAssignment, NewReadingPlan, ReadingPlan, ScheduleDay,
};
use khatmah_core::ports::{PortError, PortResult, ScheduleStore};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ScheduleStore` port.
#[derive(Clone)]
pub struct DbStore {
    pool: PgPool,
}

impl DbStore {
    /// Creates a new `DbStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn not_found(what: &str, e: sqlx::Error) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what.to_string()),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct PlanRecord {
    id: Uuid,
    owner_id: Uuid,
    share_token: String,
    start_page: i32,
    pages_per_night: i32,
    rakats_per_night: i32,
    start_date: NaiveDate,
    total_days: i32,
}

impl PlanRecord {
    fn to_domain(self) -> ReadingPlan {
        ReadingPlan {
            id: self.id,
            owner_id: self.owner_id,
            share_token: self.share_token,
            start_page: self.start_page as u16,
            pages_per_night: self.pages_per_night as u32,
            rakats_per_night: self.rakats_per_night as u32,
            start_date: self.start_date,
            total_days: self.total_days as u32,
        }
    }
}

#[derive(FromRow)]
struct DayRecord {
    day_number: i32,
    date: NaiveDate,
    start_page: i32,
    end_page: i32,
    status: String,
}

impl DayRecord {
    fn to_domain(self) -> PortResult<ScheduleDay> {
        let status = self
            .status
            .parse::<DayStatus>()
            .map_err(PortError::Unexpected)?;
        Ok(ScheduleDay {
            day_number: self.day_number as u32,
            date: self.date,
            start_page: self.start_page as u16,
            end_page: self.end_page as u16,
            status,
        })
    }
}

#[derive(FromRow)]
struct ImamRecord {
    imam_name: String,
    start_rakat: i32,
    end_rakat: i32,
}

impl ImamRecord {
    fn to_domain(self) -> ImamAssignment {
        ImamAssignment {
            imam_name: self.imam_name,
            start_rakat: self.start_rakat as u32,
            end_rakat: self.end_rakat as u32,
        }
    }
}

//=========================================================================================
// `ScheduleStore` Trait Implementation
//=========================================================================================

const PLAN_COLUMNS: &str =
    "id, owner_id, share_token, start_page, pages_per_night, rakats_per_night, start_date, total_days";

#[async_trait]
impl ScheduleStore for DbStore {
    async fn replace_plan(
        &self,
        owner_id: Uuid,
        plan: NewReadingPlan,
        days: Vec<ScheduleDay>,
        imams: Vec<ImamAssignment>,
    ) -> PortResult<ReadingPlan> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // A mosque keeps one active plan: drop the previous one first.
        sqlx::query("DELETE FROM reading_plans WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let share_token = Uuid::new_v4().simple().to_string();
        let record = sqlx::query_as::<_, PlanRecord>(
            "INSERT INTO reading_plans \
             (owner_id, share_token, start_page, pages_per_night, rakats_per_night, start_date, total_days) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, owner_id, share_token, start_page, pages_per_night, rakats_per_night, start_date, total_days",
        )
        .bind(owner_id)
        .bind(&share_token)
        .bind(i32::from(plan.start_page))
        .bind(plan.pages_per_night as i32)
        .bind(plan.rakats_per_night as i32)
        .bind(plan.start_date)
        .bind(plan.total_days as i32)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        for day in &days {
            sqlx::query(
                "INSERT INTO schedule_days (plan_id, day_number, date, start_page, end_page, status) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(record.id)
            .bind(day.day_number as i32)
            .bind(day.date)
            .bind(i32::from(day.start_page))
            .bind(i32::from(day.end_page))
            .bind(day.status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        for imam in &imams {
            sqlx::query(
                "INSERT INTO imam_assignments (plan_id, imam_name, start_rakat, end_rakat) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(record.id)
            .bind(&imam.imam_name)
            .bind(imam.start_rakat as i32)
            .bind(imam.end_rakat as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.to_domain())
    }

    async fn latest_plan(&self, owner_id: Uuid) -> PortResult<ReadingPlan> {
        let record = sqlx::query_as::<_, PlanRecord>(&format!(
            "SELECT {PLAN_COLUMNS} FROM reading_plans WHERE owner_id = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(&format!("No reading plan for owner {}", owner_id), e))?;
        Ok(record.to_domain())
    }

    async fn plan_by_id(&self, plan_id: Uuid) -> PortResult<ReadingPlan> {
        let record = sqlx::query_as::<_, PlanRecord>(&format!(
            "SELECT {PLAN_COLUMNS} FROM reading_plans WHERE id = $1"
        ))
        .bind(plan_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(&format!("Reading plan {} not found", plan_id), e))?;
        Ok(record.to_domain())
    }

    async fn plan_by_share_token(&self, token: &str) -> PortResult<ReadingPlan> {
        let record = sqlx::query_as::<_, PlanRecord>(&format!(
            "SELECT {PLAN_COLUMNS} FROM reading_plans WHERE share_token = $1"
        ))
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found("No schedule behind this share link", e))?;
        Ok(record.to_domain())
    }

    async fn days_for_plan(&self, plan_id: Uuid) -> PortResult<Vec<ScheduleDay>> {
        let records = sqlx::query_as::<_, DayRecord>(
            "SELECT day_number, date, start_page, end_page, status FROM schedule_days \
             WHERE plan_id = $1 ORDER BY day_number ASC",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn set_day_status(
        &self,
        plan_id: Uuid,
        day_number: u32,
        status: DayStatus,
    ) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE schedule_days SET status = $1 WHERE plan_id = $2 AND day_number = $3",
        )
        .bind(status.as_str())
        .bind(plan_id)
        .bind(day_number as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Day {} of plan {} not found",
                day_number, plan_id
            )));
        }
        Ok(())
    }

    async fn imams_for_plan(&self, plan_id: Uuid) -> PortResult<Vec<ImamAssignment>> {
        let records = sqlx::query_as::<_, ImamRecord>(
            "SELECT imam_name, start_rakat, end_rakat FROM imam_assignments \
             WHERE plan_id = $1 ORDER BY start_rakat ASC",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
