pub mod aggregate;
pub mod align;
pub mod app;
pub mod axis;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod poller;
pub mod query;
pub mod report;
pub mod state;
pub mod storage;

pub use align::{Observation, align, summarize};
pub use app::router;
pub use axis::{
    build_dense_daily_axis, build_dense_monthly_axis, build_dense_range_axis,
    build_dense_yearly_axis,
};
pub use config::Config;
pub use state::AppState;
pub use storage::{load_data, reload_data};
