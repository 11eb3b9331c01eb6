pub mod health;
pub mod metrics;
pub mod token_handler;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
pub use token_handler::handle_issue_token;
