pub mod client;
pub mod cluster;
pub mod error;
pub mod managed_volume;
pub mod models;
pub mod object;
pub mod outcome;
pub mod sla;
pub mod snapshot;

pub use client::{ApiVersion, Credentials, RubrikClient, DEFAULT_TIMEOUT, LONG_RUNNING_TIMEOUT};
pub use error::RubrikError;
pub use object::{HostOs, ObjectType};
pub use outcome::Transition;
pub use sla::SlaSelector;
