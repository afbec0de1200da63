//! Scripted API doubles shared by the workflow unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use homzhub_api::{
    ApiError, AttachmentApi, LeaseApi, LeaseTermRequest, ReassignRequest, ReviewRequest,
    TicketApi,
};
use homzhub_core::domain::lease::AssetUnitId;
use homzhub_core::domain::quote::{AttachmentId, FileRef, QuoteCategory};
use homzhub_core::domain::ticket::{QuoteRequestId, Ticket, TicketId};
use homzhub_core::payload::SubmitQuotesRequest;

pub(crate) fn api_error(status: u16, message: &str) -> ApiError {
    ApiError::from_response_body(
        status,
        &format!(r#"{{"details":{{"message":"{message}","statusCode":{status}}}}}"#),
    )
}

/// Ticket endpoint double: records every call, replays scripted results,
/// and defaults mutations to success so happy paths stay terse.
#[derive(Default)]
pub(crate) struct RecordingTicketApi {
    pub categories: Mutex<Vec<Result<Vec<QuoteCategory>, ApiError>>>,
    pub submit_results: Mutex<Vec<Result<(), ApiError>>>,
    pub details: Mutex<Vec<Result<Ticket, ApiError>>>,
    pub action_results: Mutex<Vec<Result<(), ApiError>>>,
    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<SubmitQuotesRequest>>,
}

impl RecordingTicketApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn submitted(&self) -> Vec<SubmitQuotesRequest> {
        self.submitted.lock().expect("submitted lock").clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().expect("calls lock").push(call.to_string());
    }

    fn next_action_result(&self) -> Result<(), ApiError> {
        let mut results = self.action_results.lock().expect("action lock");
        if results.is_empty() {
            Ok(())
        } else {
            results.remove(0)
        }
    }
}

#[async_trait]
impl TicketApi for RecordingTicketApi {
    async fn quote_categories(
        &self,
        _ticket: &TicketId,
        _quote_request: &QuoteRequestId,
    ) -> Result<Vec<QuoteCategory>, ApiError> {
        self.record("quote_categories");
        let mut responses = self.categories.lock().expect("categories lock");
        if responses.is_empty() {
            Ok(Vec::new())
        } else {
            responses.remove(0)
        }
    }

    async fn submit_quotes(
        &self,
        _ticket: &TicketId,
        _quote_request: &QuoteRequestId,
        request: &SubmitQuotesRequest,
    ) -> Result<(), ApiError> {
        self.record("submit_quotes");
        let mut results = self.submit_results.lock().expect("submit lock");
        let result = if results.is_empty() { Ok(()) } else { results.remove(0) };
        if result.is_ok() {
            self.submitted.lock().expect("submitted lock").push(request.clone());
        }
        result
    }

    async fn ticket_detail(&self, _ticket: &TicketId) -> Result<Ticket, ApiError> {
        self.record("ticket_detail");
        let mut details = self.details.lock().expect("details lock");
        if details.is_empty() {
            panic!("ticket_detail response not scripted");
        }
        details.remove(0)
    }

    async fn close_ticket(&self, _ticket: &TicketId) -> Result<(), ApiError> {
        self.record("close_ticket");
        self.next_action_result()
    }

    async fn reassign(
        &self,
        _ticket: &TicketId,
        _request: &ReassignRequest,
    ) -> Result<(), ApiError> {
        self.record("reassign");
        self.next_action_result()
    }

    async fn request_quote(&self, _ticket: &TicketId) -> Result<(), ApiError> {
        self.record("request_quote");
        self.next_action_result()
    }

    async fn approve_quote(&self, _ticket: &TicketId) -> Result<(), ApiError> {
        self.record("approve_quote");
        self.next_action_result()
    }

    async fn request_more_quotes(&self, _ticket: &TicketId) -> Result<(), ApiError> {
        self.record("request_more_quotes");
        self.next_action_result()
    }

    async fn submit_review(
        &self,
        _ticket: &TicketId,
        _request: &ReviewRequest,
    ) -> Result<(), ApiError> {
        self.record("submit_review");
        self.next_action_result()
    }
}

/// Attachment double keyed by file name so concurrent upload order does
/// not matter to the script.
#[derive(Default)]
pub(crate) struct ScriptedAttachmentApi {
    pub results: Mutex<HashMap<String, Result<AttachmentId, ApiError>>>,
    pub uploads: Mutex<Vec<String>>,
}

impl ScriptedAttachmentApi {
    pub fn script(&self, name: &str, result: Result<AttachmentId, ApiError>) {
        self.results.lock().expect("results lock").insert(name.to_string(), result);
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().expect("uploads lock").clone()
    }
}

#[async_trait]
impl AttachmentApi for ScriptedAttachmentApi {
    async fn upload(&self, file: &FileRef) -> Result<AttachmentId, ApiError> {
        self.uploads.lock().expect("uploads lock").push(file.name.clone());
        self.results
            .lock()
            .expect("results lock")
            .remove(&file.name)
            .unwrap_or_else(|| panic!("upload result not scripted for `{}`", file.name))
    }
}

#[derive(Default)]
pub(crate) struct RecordingLeaseApi {
    pub requests: Mutex<Vec<(AssetUnitId, LeaseTermRequest)>>,
    pub results: Mutex<Vec<Result<(), ApiError>>>,
}

impl RecordingLeaseApi {
    pub fn requests(&self) -> Vec<(AssetUnitId, LeaseTermRequest)> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl LeaseApi for RecordingLeaseApi {
    async fn submit_lease_term(
        &self,
        unit: &AssetUnitId,
        request: &LeaseTermRequest,
    ) -> Result<(), ApiError> {
        self.requests.lock().expect("requests lock").push((*unit, request.clone()));
        let mut results = self.results.lock().expect("results lock");
        if results.is_empty() {
            Ok(())
        } else {
            results.remove(0)
        }
    }
}
