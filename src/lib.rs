pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, AppResult, SchemaError, SchemaErrorKind};
pub use models::analytics::{DashboardSnapshot, KpiSummary, Metric, RankedEmployee};
pub use models::dataset::{Dataset, FilterSpec, FilteredView, RemoteRange};
pub use services::analytics_service::{
    headcount_by_department, kpis, productivity_by_department, time_series, top_n, TOP_N,
};
pub use services::ingest_service::load;
pub use services::record_filter::apply as filter;
