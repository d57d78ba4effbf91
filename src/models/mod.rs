pub mod workout;
pub mod metrics;

pub use workout::{Exercise, Session, SetEntry};
pub use metrics::MetricsDocument;
