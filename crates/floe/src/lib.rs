//! Floe - push architecture plans to a remote modeling service.
//!
//! A plan describes model objects, connections, a diagram, and interaction
//! flows by short local refs. Floe resolves those refs into remote ids,
//! creates everything in dependency order, lays the resulting graph out on
//! a 2-D canvas, and reports a full audit trail of what was created.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use floe::{Pusher, store::HttpStore};
//! use floe_core::plan::Plan;
//!
//! let plan: Plan = serde_json::from_str(r#"{"objects": []}"#)
//!     .expect("Failed to parse plan");
//!
//! let store = HttpStore::new(
//!     floe::store::DEFAULT_BASE_URL,
//!     "api-key",
//!     Duration::from_secs(30),
//! )
//! .expect("Failed to build client");
//!
//! let summary = Pusher::new(&store, "landscape-id")
//!     .push(&plan)
//!     .expect("Push failed");
//!
//! println!("{}", summary.to_json().expect("Failed to serialize"));
//! ```

pub mod diagram;
pub mod flow;
pub mod layout;
pub mod order;
pub mod preview;
pub mod refs;
pub mod store;
pub mod summary;

mod error;
mod push;

pub use error::FloeError;
pub use push::Pusher;
pub use refs::RefTable;
pub use summary::RunSummary;
