//! Status records and the key scheme that addresses them in the store.

pub mod key;
pub mod record;
pub mod service;

pub use key::{encode_key, ServiceKind};
pub use record::{StatusQuery, StatusRecord};
pub use service::{SetOutcome, StatusService};
