pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod ports;
pub mod quran;

pub use domain::{
    DayStatus, ImamAssignment, NewReadingPlan, NightSchedule, PagePartition, RakatBreakdown,
    RakatPhase, ReadingPlan, ScheduleDay,
};
pub use engine::{generate_schedule, GlobalCursor, OnExhausted};
pub use error::PlanError;
pub use planner::StartPoint;
pub use ports::{PortError, PortResult, ScheduleStore};
pub use quran::{Surah, QURAN_END_PAGE, QURAN_START_PAGE, TOTAL_QURAN_PAGES};
