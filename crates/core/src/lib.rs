pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod notify;
pub mod payload;
pub mod session;

pub use domain::lease::{
    validate_lease, AssetUnitId, Furnishing, LeaseSpaceForm, LeaseTermForm, LeaseValidation,
    LeaseValidationFailure,
};
pub use domain::quote::{
    AttachmentId, CategoryId, FileRef, QuoteCategory, QuoteGroup, QuoteSlot, SlotFill,
    SLOTS_PER_CATEGORY,
};
pub use domain::ticket::{
    FfmStatus, QuoteRequestId, Ticket, TicketAction, TicketId, TicketStatus,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{
    validate_all_groups, validate_group, TabNavigator, TabTransition, TabTransitionError,
    INCOMPLETE_SLOTS_MESSAGE_KEY,
};
pub use notify::{InMemoryNotifier, Notification, Notifier, Severity, TracingNotifier};
pub use payload::{
    assemble, QuoteGroupPayload, QuotePayload, SubmitQuotesRequest, UploadedAttachments,
    DEFAULT_CURRENCY,
};
pub use session::{QuoteSession, SessionCommand};
