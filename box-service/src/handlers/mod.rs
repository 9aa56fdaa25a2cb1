pub mod boxes;
pub mod health;
pub mod metrics;

pub use boxes::generate_box;
pub use health::{health_check, readiness_check};
pub use self::metrics::metrics_endpoint;
