use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRequestId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    QuoteRequested,
    QuoteSubmitted,
    QuoteApproved,
    PaymentRequested,
    PaymentDone,
    WorkInitiated,
    Closed,
}

/// Field-force-management track, parallel to the ticket's own status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FfmStatus {
    Pending,
    Accepted,
    Rejected,
    AcceptedAndClosed,
    Closed,
}

/// Single-purpose actions the backend exposes on a ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketAction {
    AcceptWork,
    RejectWork,
    RequestQuote,
    SubmitQuote,
    ApproveQuote,
    RequestMoreQuotes,
    Reassign,
    CloseTicket,
    SubmitReview,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    #[serde(default)]
    pub quote_request_id: Option<QuoteRequestId>,
    #[serde(default)]
    pub currency: Option<String>,
    pub status: TicketStatus,
    #[serde(default)]
    pub ffm_status: Option<FfmStatus>,
}

impl Ticket {
    /// Which actions may be offered for the current status pair. The
    /// backend owns every transition; after any action the detail must be
    /// re-fetched for the authoritative status.
    pub fn available_actions(&self) -> Vec<TicketAction> {
        use TicketAction::*;

        match self.ffm_status {
            Some(FfmStatus::Pending) => return vec![AcceptWork, RejectWork],
            Some(FfmStatus::Rejected) => return vec![Reassign],
            Some(FfmStatus::AcceptedAndClosed) | Some(FfmStatus::Closed) => {
                return vec![SubmitReview];
            }
            Some(FfmStatus::Accepted) | None => {}
        }

        match self.status {
            TicketStatus::Open => vec![RequestQuote, Reassign, CloseTicket],
            TicketStatus::QuoteRequested => vec![SubmitQuote, Reassign, CloseTicket],
            TicketStatus::QuoteSubmitted => vec![ApproveQuote, RequestMoreQuotes, CloseTicket],
            TicketStatus::QuoteApproved
            | TicketStatus::PaymentRequested
            | TicketStatus::PaymentDone => vec![CloseTicket],
            TicketStatus::WorkInitiated => vec![CloseTicket, SubmitReview],
            TicketStatus::Closed => vec![SubmitReview],
        }
    }

    pub fn offers(&self, action: TicketAction) -> bool {
        self.available_actions().contains(&action)
    }

    /// A ticket awaiting field-force acceptance renders only its
    /// accept/reject buttons; the card itself is non-interactive.
    pub fn is_interactive(&self) -> bool {
        !matches!(self.ffm_status, Some(FfmStatus::Pending))
    }
}
