//! Client library for the Rubrik CDM REST API.
//!
//! Objects are addressed by name: every operation first resolves the name to
//! the cluster's object id, then reads the object's current state and only
//! issues a mutating call when that state differs from the requested one.
//!
//! ```no_run
//! use rubrik_cdm_rs::rubrik::{Credentials, ObjectType, RubrikClient, SlaSelector};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = RubrikClient::new(
//!     "10.0.1.20",
//!     Credentials::Basic { username: "admin".into(), password: "secret".into() },
//!     false,
//! )?;
//! let outcome = client
//!     .assign_sla("web-01", ObjectType::Vmware, &SlaSelector::parse("Gold"), None)
//!     .await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod rubrik;
pub mod settings;
