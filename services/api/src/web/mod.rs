pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary
// that builds the web server router.
pub use rest::{
    create_plan_handler, latest_plan_handler, plan_nights_handler, preview_handler,
    set_day_status_handler, shared_schedule_handler,
};
