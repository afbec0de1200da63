//! Workflow orchestration for the Homzhub service-ticket quote engine.
//!
//! The stages mirror the operator's path through a quote-request session:
//!
//! 1. **Category load** (`loader`) - fetch categories, seed one group of
//!    empty slots per category into the session
//! 2. **Slot editing** - handled entirely by `homzhub_core::session`
//!    commands; nothing here touches the network until submission
//! 3. **Submission** (`submit`) - concurrent document uploads with
//!    fail-fast cancellation, payload assembly, one atomic POST,
//!    clear-on-success
//! 4. **Lifecycle actions** (`actions`) - single-purpose ticket mutations,
//!    each followed by an authoritative detail re-fetch
//! 5. **Lease terms** (`lease`) - validated space/term submission
//!
//! # Consistency principle
//!
//! Local state is a cache. Every mutating call invalidates it - the
//! aggregate is re-read from the backend, never patched from a mutation
//! response. Failures leave the session untouched so the same user action
//! can simply be retried.

pub mod actions;
pub mod errors;
pub mod lease;
pub mod loader;
pub mod submit;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::TicketActions;
pub use errors::WorkflowError;
pub use lease::LeaseSubmission;
pub use loader::load_categories;
pub use submit::{SubmissionAssembler, SubmitOutcome};
