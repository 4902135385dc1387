pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::EngineDefaults;
pub use error::{AppError, AppResult};
pub use services::backend_api::{BackendApiClient, SchedulingBackend};
pub use services::coach_matcher::CoachMatchingService;
pub use services::scheduling_service::SchedulingService;
