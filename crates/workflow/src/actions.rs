use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use homzhub_api::{ApiError, ReassignRequest, ReviewRequest, TicketApi};
use homzhub_core::domain::ticket::{Ticket, TicketAction};
use homzhub_core::errors::DomainError;
use homzhub_core::notify::{Notification, Notifier, Severity};

use crate::errors::WorkflowError;

/// Single-purpose ticket lifecycle mutations.
///
/// The client never computes the next status: each action is gated
/// locally against `Ticket::available_actions`, posted, and then the
/// detail is re-fetched so the caller always ends up holding the
/// authoritative ticket. The ticket passed in is treated as an
/// invalidated cache from the moment the mutation is sent.
pub struct TicketActions {
    api: Arc<dyn TicketApi>,
    notifier: Arc<dyn Notifier>,
}

impl TicketActions {
    pub fn new(api: Arc<dyn TicketApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    pub async fn close(&self, ticket: &Ticket) -> Result<Ticket, WorkflowError> {
        self.guard(ticket, TicketAction::CloseTicket)?;
        let result = self.api.close_ticket(&ticket.id).await;
        self.finish(ticket, TicketAction::CloseTicket, "ticketCloseSuccess", result).await
    }

    pub async fn reassign(
        &self,
        ticket: &Ticket,
        assigned_to: impl Into<String>,
    ) -> Result<Ticket, WorkflowError> {
        self.guard(ticket, TicketAction::Reassign)?;
        let request = ReassignRequest { assigned_to: assigned_to.into() };
        let result = self.api.reassign(&ticket.id, &request).await;
        self.finish(ticket, TicketAction::Reassign, "ticketReassignSuccess", result).await
    }

    pub async fn request_quote(&self, ticket: &Ticket) -> Result<Ticket, WorkflowError> {
        self.guard(ticket, TicketAction::RequestQuote)?;
        let result = self.api.request_quote(&ticket.id).await;
        self.finish(ticket, TicketAction::RequestQuote, "quoteRequestSuccess", result).await
    }

    pub async fn approve_quote(&self, ticket: &Ticket) -> Result<Ticket, WorkflowError> {
        self.guard(ticket, TicketAction::ApproveQuote)?;
        let result = self.api.approve_quote(&ticket.id).await;
        self.finish(ticket, TicketAction::ApproveQuote, "quoteApproveSuccess", result).await
    }

    pub async fn request_more_quotes(&self, ticket: &Ticket) -> Result<Ticket, WorkflowError> {
        self.guard(ticket, TicketAction::RequestMoreQuotes)?;
        let result = self.api.request_more_quotes(&ticket.id).await;
        self.finish(ticket, TicketAction::RequestMoreQuotes, "moreQuotesRequestSuccess", result)
            .await
    }

    pub async fn submit_review(
        &self,
        ticket: &Ticket,
        rating: u8,
        comment: Option<String>,
    ) -> Result<Ticket, WorkflowError> {
        self.guard(ticket, TicketAction::SubmitReview)?;
        let request = ReviewRequest { rating, comment };
        let result = self.api.submit_review(&ticket.id, &request).await;
        self.finish(ticket, TicketAction::SubmitReview, "reviewSubmitSuccess", result).await
    }

    fn guard(&self, ticket: &Ticket, action: TicketAction) -> Result<(), WorkflowError> {
        if ticket.offers(action) {
            return Ok(());
        }
        Err(WorkflowError::Domain(DomainError::ActionNotAvailable {
            action,
            status: ticket.status,
        }))
    }

    async fn finish(
        &self,
        ticket: &Ticket,
        action: TicketAction,
        success_key: &str,
        result: Result<(), ApiError>,
    ) -> Result<Ticket, WorkflowError> {
        let correlation_id = Uuid::new_v4().to_string();

        if let Err(error) = result {
            warn!(
                event_name = "ticket.action_failed",
                ticket_id = %ticket.id.0,
                correlation_id = %correlation_id,
                action = ?action,
                error = %error,
                "ticket action rejected"
            );
            self.notifier.notify(
                Notification::new(Severity::Error, "ticketActionFailed", correlation_id.as_str())
                    .with_detail(error.to_string()),
            );
            return Err(error.into());
        }

        // Re-fetch after mutate: the response body is never merged into
        // local state.
        let detail = match self.api.ticket_detail(&ticket.id).await {
            Ok(detail) => detail,
            Err(error) => {
                warn!(
                    event_name = "ticket.refetch_failed",
                    ticket_id = %ticket.id.0,
                    correlation_id = %correlation_id,
                    error = %error,
                    "ticket detail re-read failed after action"
                );
                self.notifier.notify(
                    Notification::new(
                        Severity::Error,
                        "ticketRefreshFailed",
                        correlation_id.as_str(),
                    )
                    .with_detail(error.to_string()),
                );
                return Err(error.into());
            }
        };

        self.notifier.notify(Notification::new(
            Severity::Success,
            success_key,
            correlation_id.as_str(),
        ));
        info!(
            event_name = "ticket.action_applied",
            ticket_id = %ticket.id.0,
            correlation_id = %correlation_id,
            action = ?action,
            status = ?detail.status,
            "ticket action applied and detail refreshed"
        );
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use homzhub_api::TicketApi;
    use homzhub_core::domain::ticket::{
        FfmStatus, QuoteRequestId, Ticket, TicketAction, TicketId, TicketStatus,
    };
    use homzhub_core::errors::DomainError;
    use homzhub_core::notify::{InMemoryNotifier, Severity};

    use super::TicketActions;
    use crate::errors::WorkflowError;
    use crate::testing::{api_error, RecordingTicketApi};

    fn ticket(status: TicketStatus, ffm_status: Option<FfmStatus>) -> Ticket {
        Ticket {
            id: TicketId("T-1042".to_string()),
            quote_request_id: Some(QuoteRequestId("QR-17".to_string())),
            currency: None,
            status,
            ffm_status,
        }
    }

    fn actions(api: &Arc<RecordingTicketApi>, notifier: &InMemoryNotifier) -> TicketActions {
        TicketActions::new(Arc::clone(api) as Arc<dyn TicketApi>, Arc::new(notifier.clone()))
    }

    #[tokio::test]
    async fn close_posts_then_refetches_the_authoritative_ticket() {
        let api = Arc::new(RecordingTicketApi::default());
        api.details.lock().expect("lock").push(Ok(ticket(TicketStatus::Closed, None)));
        let notifier = InMemoryNotifier::default();

        let refreshed = actions(&api, &notifier)
            .close(&ticket(TicketStatus::WorkInitiated, None))
            .await
            .expect("close succeeds");

        assert_eq!(refreshed.status, TicketStatus::Closed);
        assert_eq!(api.calls(), vec!["close_ticket", "ticket_detail"]);
        assert!(notifier
            .notifications()
            .iter()
            .any(|notification| notification.message_key == "ticketCloseSuccess"));
    }

    #[tokio::test]
    async fn unavailable_action_is_refused_without_any_network_call() {
        let api = Arc::new(RecordingTicketApi::default());
        let notifier = InMemoryNotifier::default();

        let error = actions(&api, &notifier)
            .close(&ticket(TicketStatus::Closed, None))
            .await
            .expect_err("closed ticket cannot close again");

        assert!(matches!(
            error,
            WorkflowError::Domain(DomainError::ActionNotAvailable {
                action: TicketAction::CloseTicket,
                status: TicketStatus::Closed,
            })
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn pending_ffm_ticket_refuses_reassignment() {
        let api = Arc::new(RecordingTicketApi::default());
        let notifier = InMemoryNotifier::default();

        let error = actions(&api, &notifier)
            .reassign(&ticket(TicketStatus::Open, Some(FfmStatus::Pending)), "tech-204")
            .await
            .expect_err("pending ffm offers only accept/reject");

        assert!(matches!(error, WorkflowError::Domain(DomainError::ActionNotAvailable { .. })));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_action_notifies_and_skips_the_refetch() {
        let api = Arc::new(RecordingTicketApi::default());
        api.action_results
            .lock()
            .expect("lock")
            .push(Err(api_error(403, "not the ticket owner")));
        let notifier = InMemoryNotifier::default();

        let error = actions(&api, &notifier)
            .approve_quote(&ticket(TicketStatus::QuoteSubmitted, None))
            .await
            .expect_err("backend rejection must surface");

        assert!(matches!(error, WorkflowError::Api(_)));
        assert_eq!(api.calls(), vec!["approve_quote"]);
        let failure = notifier
            .notifications()
            .into_iter()
            .find(|notification| notification.severity == Severity::Error)
            .expect("error notification");
        assert!(failure.detail.as_deref().unwrap_or("").contains("not the ticket owner"));
    }

    #[tokio::test]
    async fn review_flows_through_for_closed_tickets() {
        let api = Arc::new(RecordingTicketApi::default());
        api.details
            .lock()
            .expect("lock")
            .push(Ok(ticket(TicketStatus::Closed, Some(FfmStatus::Closed))));
        let notifier = InMemoryNotifier::default();

        let refreshed = actions(&api, &notifier)
            .submit_review(
                &ticket(TicketStatus::Closed, None),
                5,
                Some("quick turnaround".to_string()),
            )
            .await
            .expect("review succeeds");

        assert_eq!(refreshed.ffm_status, Some(FfmStatus::Closed));
        assert_eq!(api.calls(), vec!["submit_review", "ticket_detail"]);
    }
}
