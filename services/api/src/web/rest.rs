//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{NaiveDate, Utc};
use khatmah_core::domain::{
    DayStatus, ImamAssignment, NightSchedule, RakatBreakdown, RakatPhase, ReadingPlan,
    ScheduleDay,
};
use khatmah_core::planner::{self, StartPoint};
use khatmah_core::ports::PortError;
use khatmah_core::{OnExhausted, PlanError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_plan_handler,
        latest_plan_handler,
        plan_nights_handler,
        preview_handler,
        set_day_status_handler,
        shared_schedule_handler,
    ),
    components(
        schemas(
            StartSelection,
            PhasePayload,
            CreatePlanRequest,
            PreviewRequest,
            SetDayStatusRequest,
            PlanResponse,
            DayPayload,
            NightPayload,
            RakatPayload,
            ImamPayload,
            NightsResponse,
            SharedScheduleResponse,
        )
    ),
    tags(
        (name = "Khatmah Scheduler API", description = "API endpoints for generating and tracking Tarawih reading schedules.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request Payloads
//=========================================================================================

/// Where the khatmah starts. Exactly one selection mode is used, in
/// order of precedence: explicit page, surah (optionally with an ayah),
/// then juz.
#[derive(Deserialize, ToSchema)]
pub struct StartSelection {
    pub juz: Option<u8>,
    pub surah: Option<u8>,
    pub ayah: Option<u32>,
    pub page: Option<u16>,
}

impl StartSelection {
    fn to_start_point(&self) -> Option<StartPoint> {
        if let Some(page) = self.page {
            return Some(StartPoint::Page(page));
        }
        if let Some(surah) = self.surah {
            return Some(match self.ayah {
                Some(ayah) => StartPoint::SurahAyah { surah, ayah },
                None => StartPoint::Surah(surah),
            });
        }
        self.juz.map(StartPoint::Juz)
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreatePlanRequest {
    pub start: StartSelection,
    pub pages_per_night: u32,
    pub rakats_per_night: u32,
    /// Defaults to however many nights the remaining pages need.
    pub total_days: Option<u32>,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub imam_names: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct PhasePayload {
    pub start_day: u32,
    pub end_day: u32,
    pub rakats_per_night: u32,
}

impl PhasePayload {
    fn to_domain(&self) -> RakatPhase {
        RakatPhase {
            start_day: self.start_day,
            end_day: self.end_day,
            rakats_per_night: self.rakats_per_night,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct PreviewRequest {
    pub start: StartSelection,
    pub pages_per_night: u32,
    pub rakats_per_night: u32,
    pub total_days: u32,
    pub start_date: Option<NaiveDate>,
    /// Optional dynamic pacing; when present, overrides the uniform
    /// rak'at count night by night.
    pub phases: Option<Vec<PhasePayload>>,
    /// Continue from the beginning after the last page instead of
    /// ending the plan early.
    #[serde(default)]
    pub wrap_around: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct SetDayStatusRequest {
    /// One of `upcoming`, `today`, `completed`, `absent`.
    pub status: String,
}

//=========================================================================================
// API Response Payloads
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct DayPayload {
    pub day_number: u32,
    pub date: NaiveDate,
    pub start_page: u16,
    pub end_page: u16,
    pub status: String,
}

impl DayPayload {
    fn from_domain(day: &ScheduleDay) -> Self {
        Self {
            day_number: day.day_number,
            date: day.date,
            start_page: day.start_page,
            end_page: day.end_page,
            status: day.status.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PlanResponse {
    pub id: Uuid,
    pub share_token: String,
    pub start_page: u16,
    pub pages_per_night: u32,
    pub rakats_per_night: u32,
    pub start_date: NaiveDate,
    pub total_days: u32,
    pub days: Vec<DayPayload>,
}

impl PlanResponse {
    fn from_domain(plan: ReadingPlan, days: &[ScheduleDay]) -> Self {
        Self {
            id: plan.id,
            share_token: plan.share_token,
            start_page: plan.start_page,
            pages_per_night: plan.pages_per_night,
            rakats_per_night: plan.rakats_per_night,
            start_date: plan.start_date,
            total_days: plan.total_days,
            days: days.iter().map(DayPayload::from_domain).collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct RakatPayload {
    pub rakat_number: u32,
    pub page: u16,
    pub part: u32,
    pub total_parts: u32,
    pub percentage_start: f64,
    pub percentage_end: f64,
    pub start_ayah: u32,
    pub end_ayah: u32,
    pub ayah_count: u32,
    pub surah_name: String,
    pub surah_arabic_name: String,
}

impl RakatPayload {
    fn from_domain(rakat: &RakatBreakdown) -> Self {
        Self {
            rakat_number: rakat.rakat_number,
            page: rakat.partition.page,
            part: rakat.partition.part,
            total_parts: rakat.partition.total_parts,
            percentage_start: rakat.partition.percentage_start,
            percentage_end: rakat.partition.percentage_end,
            start_ayah: rakat.start_ayah,
            end_ayah: rakat.end_ayah,
            ayah_count: rakat.ayah_count,
            surah_name: rakat.surah_name.clone(),
            surah_arabic_name: rakat.surah_arabic_name.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct NightPayload {
    pub night_number: u32,
    pub date: NaiveDate,
    pub total_pages: f64,
    pub rakats_count: u32,
    pub rakats: Vec<RakatPayload>,
}

impl NightPayload {
    fn from_domain(night: &NightSchedule) -> Self {
        Self {
            night_number: night.night_number,
            date: night.date,
            total_pages: night.total_pages,
            rakats_count: night.rakats_count,
            rakats: night.rakats.iter().map(RakatPayload::from_domain).collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ImamPayload {
    pub imam_name: String,
    pub start_rakat: u32,
    pub end_rakat: u32,
}

impl ImamPayload {
    fn from_domain(imam: &ImamAssignment) -> Self {
        Self {
            imam_name: imam.imam_name.clone(),
            start_rakat: imam.start_rakat,
            end_rakat: imam.end_rakat,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct NightsResponse {
    pub nights: Vec<NightPayload>,
    pub imams: Vec<ImamPayload>,
}

#[derive(Serialize, ToSchema)]
pub struct SharedScheduleResponse {
    pub start_date: NaiveDate,
    pub total_days: u32,
    pub pages_per_night: u32,
    pub rakats_per_night: u32,
    pub days: Vec<DayPayload>,
}

//=========================================================================================
// Error Mapping Helpers
//=========================================================================================

type HandlerError = (StatusCode, String);

fn owner_id(headers: &HeaderMap) -> Result<Uuid, HandlerError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "x-user-id header is required".to_string(),
            )
        })?;
    Uuid::parse_str(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid x-user-id format".to_string(),
        )
    })
}

fn plan_error(e: PlanError) -> HandlerError {
    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
}

fn port_error(context: &str, e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Unexpected(_) => {
            error!("{}: {:?}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

fn resolve_start(selection: &StartSelection) -> Result<u16, HandlerError> {
    let start_point = selection.to_start_point().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "A start point (juz, surah or page) is required".to_string(),
        )
    })?;
    planner::resolve_start_point(start_point).map_err(plan_error)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create (or replace) the caller's reading plan.
///
/// Resolves the start selection to a page, lays out the per-day page
/// ranges, splits the rak'ats among the named imams and persists the
/// whole plan. The previous plan, if any, is replaced.
#[utoipa::path(
    post,
    path = "/plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created successfully", body = PlanResponse),
        (status = 400, description = "Bad request (e.g., missing header or start point)"),
        (status = 422, description = "Plan parameters failed validation"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the mosque administrator.")
    )
)]
pub async fn create_plan_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let owner = owner_id(&headers)?;
    let start_page = resolve_start(&req.start)?;

    let today = Utc::now().date_naive();
    let start_date = req.start_date.unwrap_or(today);
    let total_days = match req.total_days {
        Some(days) => days,
        None => planner::duration_for_pages_per_night(
            req.pages_per_night,
            start_page,
            khatmah_core::QURAN_END_PAGE,
        )
        .map_err(plan_error)?,
    };

    if req.rakats_per_night == 0 {
        return Err(plan_error(PlanError::InvalidRakatCount));
    }

    let days = planner::schedule_days(
        start_page,
        req.pages_per_night,
        total_days,
        start_date,
        today,
        OnExhausted::Stop,
    )
    .map_err(plan_error)?;

    let imams = planner::split_rakats_among_imams(req.rakats_per_night, &req.imam_names);

    let plan = khatmah_core::NewReadingPlan {
        start_page,
        pages_per_night: req.pages_per_night,
        rakats_per_night: req.rakats_per_night,
        start_date,
        total_days,
    };

    let stored = app_state
        .store
        .replace_plan(owner, plan, days.clone(), imams)
        .await
        .map_err(|e| port_error("Failed to create plan", e))?;

    Ok((
        StatusCode::CREATED,
        Json(PlanResponse::from_domain(stored, &days)),
    ))
}

/// Fetch the caller's latest plan with its per-day schedule.
///
/// Day statuses are refreshed against today's date before returning:
/// past days auto-complete unless marked absent.
#[utoipa::path(
    get,
    path = "/plans/latest",
    responses(
        (status = 200, description = "The latest plan", body = PlanResponse),
        (status = 404, description = "The caller has no plan"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the mosque administrator.")
    )
)]
pub async fn latest_plan_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HandlerError> {
    let owner = owner_id(&headers)?;

    let plan = app_state
        .store
        .latest_plan(owner)
        .await
        .map_err(|e| port_error("Failed to fetch plan", e))?;
    let mut days = app_state
        .store
        .days_for_plan(plan.id)
        .await
        .map_err(|e| port_error("Failed to fetch schedule days", e))?;

    planner::refresh_statuses(&mut days, Utc::now().date_naive());

    Ok(Json(PlanResponse::from_domain(plan, &days)))
}

/// The night-by-night rak'at breakdown of a plan, with imam attribution.
///
/// The breakdown is recomputed from the stored plan parameters; it is
/// deterministic, so it never drifts from the persisted day records.
#[utoipa::path(
    get,
    path = "/plans/{id}/nights",
    responses(
        (status = 200, description = "Night-by-night breakdown", body = NightsResponse),
        (status = 404, description = "Plan not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The plan ID.")
    )
)]
pub async fn plan_nights_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let plan = app_state
        .store
        .plan_by_id(id)
        .await
        .map_err(|e| port_error("Failed to fetch plan", e))?;
    let imams = app_state
        .store
        .imams_for_plan(id)
        .await
        .map_err(|e| port_error("Failed to fetch imam assignments", e))?;

    let nights = planner::generate_simple_schedule(
        plan.start_page,
        plan.pages_per_night,
        plan.total_days,
        plan.rakats_per_night,
        plan.start_date,
        OnExhausted::Stop,
    )
    .map_err(plan_error)?;

    Ok(Json(NightsResponse {
        nights: nights.iter().map(NightPayload::from_domain).collect(),
        imams: imams.iter().map(ImamPayload::from_domain).collect(),
    }))
}

/// Preview a schedule without persisting anything.
///
/// Supports both uniform pacing and phase-based pacing, and both
/// end-of-mushaf policies.
#[utoipa::path(
    post,
    path = "/plans/preview",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "The computed schedule", body = [NightPayload]),
        (status = 400, description = "Bad request"),
        (status = 422, description = "Plan parameters failed validation")
    )
)]
pub async fn preview_handler(
    Json(req): Json<PreviewRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let start_page = resolve_start(&req.start)?;
    let start_date = req.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let on_exhausted = if req.wrap_around {
        OnExhausted::WrapAround
    } else {
        OnExhausted::Stop
    };

    let schedule = match &req.phases {
        Some(phases) => {
            if req.pages_per_night == 0 {
                return Err(plan_error(PlanError::InvalidPagesPerNight));
            }
            let rakats_per_page =
                f64::from(req.rakats_per_night) / f64::from(req.pages_per_night);
            let phases: Vec<RakatPhase> = phases.iter().map(PhasePayload::to_domain).collect();
            planner::generate_phased_schedule(
                rakats_per_page,
                &phases,
                req.total_days,
                start_page,
                start_date,
                on_exhausted,
            )
        }
        None => planner::generate_simple_schedule(
            start_page,
            req.pages_per_night,
            req.total_days,
            req.rakats_per_night,
            start_date,
            on_exhausted,
        ),
    }
    .map_err(plan_error)?;

    let nights: Vec<NightPayload> = schedule.iter().map(NightPayload::from_domain).collect();
    Ok(Json(nights))
}

/// Override one day's status, e.g. marking a night absent.
#[utoipa::path(
    patch,
    path = "/plans/{id}/days/{day_number}",
    request_body = SetDayStatusRequest,
    responses(
        (status = 204, description = "Status updated"),
        (status = 404, description = "Plan or day not found"),
        (status = 422, description = "Unknown status value")
    ),
    params(
        ("id" = Uuid, Path, description = "The plan ID."),
        ("day_number" = u32, Path, description = "1-based day number.")
    )
)]
pub async fn set_day_status_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, day_number)): Path<(Uuid, u32)>,
    Json(req): Json<SetDayStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let status = req
        .status
        .parse::<DayStatus>()
        .map_err(|msg| (StatusCode::UNPROCESSABLE_ENTITY, msg))?;

    app_state
        .store
        .set_day_status(id, day_number, status)
        .await
        .map_err(|e| port_error("Failed to update day status", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Public, read-only schedule view behind a share token.
#[utoipa::path(
    get,
    path = "/shared/{token}",
    responses(
        (status = 200, description = "The shared schedule", body = SharedScheduleResponse),
        (status = 404, description = "Unknown share token")
    ),
    params(
        ("token" = String, Path, description = "The plan's share token.")
    )
)]
pub async fn shared_schedule_handler(
    State(app_state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let plan = app_state
        .store
        .plan_by_share_token(&token)
        .await
        .map_err(|e| port_error("Failed to fetch shared schedule", e))?;
    let mut days = app_state
        .store
        .days_for_plan(plan.id)
        .await
        .map_err(|e| port_error("Failed to fetch schedule days", e))?;

    // Read-only view: refresh for display without writing back.
    planner::refresh_statuses(&mut days, Utc::now().date_naive());

    Ok(Json(SharedScheduleResponse {
        start_date: plan.start_date,
        total_days: plan.total_days,
        pages_per_night: plan.pages_per_night,
        rakats_per_night: plan.rakats_per_night,
        days: days.iter().map(DayPayload::from_domain).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_selection_prefers_page_over_surah_over_juz() {
        let all = StartSelection {
            juz: Some(3),
            surah: Some(18),
            ayah: None,
            page: Some(100),
        };
        assert_eq!(all.to_start_point(), Some(StartPoint::Page(100)));

        let surah_with_ayah = StartSelection {
            juz: Some(3),
            surah: Some(18),
            ayah: Some(10),
            page: None,
        };
        assert_eq!(
            surah_with_ayah.to_start_point(),
            Some(StartPoint::SurahAyah { surah: 18, ayah: 10 })
        );

        let juz_only = StartSelection { juz: Some(3), surah: None, ayah: None, page: None };
        assert_eq!(juz_only.to_start_point(), Some(StartPoint::Juz(3)));

        let empty = StartSelection { juz: None, surah: None, ayah: None, page: None };
        assert_eq!(empty.to_start_point(), None);
    }
}
