use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use homzhub_core::domain::quote::QuoteCategory;
use homzhub_core::domain::ticket::{QuoteRequestId, Ticket, TicketId};
use homzhub_core::payload::SubmitQuotesRequest;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Wire value for the close mutation on `PATCH /tickets/{id}`.
pub const CLOSE_TICKET_ACTION: &str = "CLOSE_TICKET";

#[derive(Debug, Serialize)]
struct TicketActionBody {
    action: &'static str,
    payload: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReassignRequest {
    pub assigned_to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReviewRequest {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Ticket endpoints consumed by the quote workflow. Every mutation is a
/// single-purpose call; callers re-fetch `ticket_detail` afterwards for
/// the authoritative status.
#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn quote_categories(
        &self,
        ticket: &TicketId,
        quote_request: &QuoteRequestId,
    ) -> Result<Vec<QuoteCategory>, ApiError>;

    async fn submit_quotes(
        &self,
        ticket: &TicketId,
        quote_request: &QuoteRequestId,
        request: &SubmitQuotesRequest,
    ) -> Result<(), ApiError>;

    async fn ticket_detail(&self, ticket: &TicketId) -> Result<Ticket, ApiError>;

    async fn close_ticket(&self, ticket: &TicketId) -> Result<(), ApiError>;

    async fn reassign(&self, ticket: &TicketId, request: &ReassignRequest)
        -> Result<(), ApiError>;

    async fn request_quote(&self, ticket: &TicketId) -> Result<(), ApiError>;

    async fn approve_quote(&self, ticket: &TicketId) -> Result<(), ApiError>;

    async fn request_more_quotes(&self, ticket: &TicketId) -> Result<(), ApiError>;

    async fn submit_review(
        &self,
        ticket: &TicketId,
        request: &ReviewRequest,
    ) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct HttpTicketApi {
    client: ApiClient,
}

impl HttpTicketApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TicketApi for HttpTicketApi {
    async fn quote_categories(
        &self,
        ticket: &TicketId,
        quote_request: &QuoteRequestId,
    ) -> Result<Vec<QuoteCategory>, ApiError> {
        self.client
            .get_json(
                "quote-categories",
                &[("ticket_id", ticket.0.as_str()), ("quote_request_id", quote_request.0.as_str())],
            )
            .await
    }

    async fn submit_quotes(
        &self,
        ticket: &TicketId,
        quote_request: &QuoteRequestId,
        request: &SubmitQuotesRequest,
    ) -> Result<(), ApiError> {
        let path = format!("tickets/{}/quote-requests/{}/quotes", ticket.0, quote_request.0);
        self.client.post_unit(&path, request).await
    }

    async fn ticket_detail(&self, ticket: &TicketId) -> Result<Ticket, ApiError> {
        self.client.get_json(&format!("tickets/{}", ticket.0), &[]).await
    }

    async fn close_ticket(&self, ticket: &TicketId) -> Result<(), ApiError> {
        let body = TicketActionBody { action: CLOSE_TICKET_ACTION, payload: json!({}) };
        self.client.patch_unit(&format!("tickets/{}", ticket.0), &body).await
    }

    async fn reassign(
        &self,
        ticket: &TicketId,
        request: &ReassignRequest,
    ) -> Result<(), ApiError> {
        self.client.post_unit(&format!("tickets/{}/reassign", ticket.0), request).await
    }

    async fn request_quote(&self, ticket: &TicketId) -> Result<(), ApiError> {
        self.client.post_unit(&format!("tickets/{}/request-quote", ticket.0), &json!({})).await
    }

    async fn approve_quote(&self, ticket: &TicketId) -> Result<(), ApiError> {
        self.client.post_unit(&format!("tickets/{}/approve-quote", ticket.0), &json!({})).await
    }

    async fn request_more_quotes(&self, ticket: &TicketId) -> Result<(), ApiError> {
        self.client
            .post_unit(&format!("tickets/{}/request-more-quote", ticket.0), &json!({}))
            .await
    }

    async fn submit_review(
        &self,
        ticket: &TicketId,
        request: &ReviewRequest,
    ) -> Result<(), ApiError> {
        self.client.post_unit(&format!("tickets/{}/review", ticket.0), request).await
    }
}
