//! Thin REST wrappers over the Homzhub backend.
//!
//! Each endpoint family is a small `async-trait` seam (`TicketApi`,
//! `AttachmentApi`, `LeaseApi`) with one HTTP implementation over a shared
//! [`ApiClient`]. Error bodies flow through a single normalization point
//! that extracts `details.message` for display and `details.statusCode`
//! for telemetry. Nothing in this crate holds workflow state.

pub mod attachments;
pub mod client;
pub mod error;
pub mod lease;
pub mod tickets;

pub use attachments::{AttachmentApi, HttpAttachmentApi};
pub use client::ApiClient;
pub use error::ApiError;
pub use lease::{HttpLeaseApi, LeaseApi, LeaseTermRequest};
pub use tickets::{HttpTicketApi, ReassignRequest, ReviewRequest, TicketApi};
