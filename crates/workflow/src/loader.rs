use tracing::{info, warn};
use uuid::Uuid;

use homzhub_api::TicketApi;
use homzhub_core::domain::ticket::{QuoteRequestId, TicketId};
use homzhub_core::notify::{Notification, Notifier, Severity};
use homzhub_core::session::{QuoteSession, SessionCommand};

use crate::errors::WorkflowError;

/// Fetch the quote categories for a ticket and seed the session with one
/// group of empty slots per category. A failure leaves the session
/// unusable until the operator retries; there is no automatic retry.
pub async fn load_categories(
    api: &dyn TicketApi,
    session: &mut QuoteSession,
    notifier: &dyn Notifier,
    ticket: &TicketId,
    quote_request: &QuoteRequestId,
) -> Result<usize, WorkflowError> {
    let correlation_id = Uuid::new_v4().to_string();

    let categories = match api.quote_categories(ticket, quote_request).await {
        Ok(categories) => categories,
        Err(error) => {
            warn!(
                event_name = "quote.categories_load_failed",
                ticket_id = %ticket.0,
                correlation_id = %correlation_id,
                error = %error,
                "quote category fetch failed"
            );
            notifier.notify(
                Notification::new(
                    Severity::Error,
                    "quoteCategoriesLoadFailed",
                    correlation_id.as_str(),
                )
                .with_detail(error.to_string()),
            );
            return Err(error.into());
        }
    };

    let count = categories.len();
    session.apply(SessionCommand::SeedCategories(categories))?;
    info!(
        event_name = "quote.categories_loaded",
        ticket_id = %ticket.0,
        correlation_id = %correlation_id,
        category_count = count,
        "seeded quote session"
    );
    Ok(count)
}
