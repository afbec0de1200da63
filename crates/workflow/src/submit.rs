use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use homzhub_api::{ApiError, AttachmentApi, TicketApi};
use homzhub_core::domain::quote::FileRef;
use homzhub_core::domain::ticket::{QuoteRequestId, Ticket};
use homzhub_core::errors::DomainError;
use homzhub_core::flows::{validate_all_groups, TabNavigator, INCOMPLETE_SLOTS_MESSAGE_KEY};
use homzhub_core::notify::{Notification, Notifier, Severity};
use homzhub_core::payload::{assemble, UploadedAttachments};
use homzhub_core::session::{QuoteSession, SessionCommand};

use crate::errors::WorkflowError;

/// Summary handed to the caller after a successful submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub groups: usize,
    pub quotes: usize,
    pub uploads: usize,
}

struct PendingUpload {
    group: usize,
    slot: usize,
    quote_number: u8,
    group_name: String,
    file: FileRef,
}

/// Turns a fully edited session into one atomic submission POST.
///
/// Documents are uploaded concurrently; the first failed upload cancels
/// its siblings and aborts the attempt before anything is posted, so slot
/// documents stay in place and the operator can retry. Only a successful
/// POST clears the session.
pub struct SubmissionAssembler {
    tickets: Arc<dyn TicketApi>,
    attachments: Arc<dyn AttachmentApi>,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionAssembler {
    pub fn new(
        tickets: Arc<dyn TicketApi>,
        attachments: Arc<dyn AttachmentApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { tickets, attachments, notifier }
    }

    pub async fn submit(
        &self,
        session: &mut QuoteSession,
        navigator: &TabNavigator,
        ticket: &Ticket,
        quote_request: &QuoteRequestId,
        cancel: &CancellationToken,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let correlation_id = Uuid::new_v4().to_string();

        if !navigator.is_terminal() {
            return Err(WorkflowError::Domain(DomainError::InvariantViolation(
                "submission is only offered from the final category".to_string(),
            )));
        }
        if let Err(error) = validate_all_groups(session.groups()) {
            self.notifier.notify(
                Notification::new(
                    Severity::Error,
                    INCOMPLETE_SLOTS_MESSAGE_KEY,
                    correlation_id.as_str(),
                )
                .with_detail(error.to_string()),
            );
            return Err(WorkflowError::Domain(error.into()));
        }

        let pending = collect_pending(session);
        let uploads = self.upload_all(pending, cancel, &correlation_id).await?;

        let request = assemble(
            session.groups(),
            &uploads,
            ticket.currency.as_deref(),
            session.comment(),
        )?;
        let groups = request.quote_group.len();
        let quotes = request.quote_group.iter().map(|group| group.quotes.len()).sum();

        let posted = tokio::select! {
            _ = cancel.cancelled() => return Err(WorkflowError::Cancelled),
            result = self.tickets.submit_quotes(&ticket.id, quote_request, &request) => result,
        };
        if let Err(error) = posted {
            warn!(
                event_name = "quote.submit_failed",
                ticket_id = %ticket.id.0,
                correlation_id = %correlation_id,
                error = %error,
                "quote submission rejected; session retained for retry"
            );
            self.notifier.notify(
                Notification::new(Severity::Error, "quoteSubmitFailed", correlation_id.as_str())
                    .with_detail(error.to_string()),
            );
            return Err(error.into());
        }

        // Stale-session guard: a second read after success must be empty.
        session.apply(SessionCommand::Reset)?;
        self.notifier.notify(Notification::new(
            Severity::Success,
            "quoteSubmitSuccess",
            correlation_id.as_str(),
        ));
        info!(
            event_name = "quote.submitted",
            ticket_id = %ticket.id.0,
            correlation_id = %correlation_id,
            group_count = groups,
            quote_count = quotes,
            "quote submission accepted"
        );
        Ok(SubmitOutcome { groups, quotes, uploads: uploads.len() })
    }

    /// Fan out every pending document upload, fail fast on the first
    /// error, and honor external cancellation at each await point.
    async fn upload_all(
        &self,
        pending: Vec<PendingUpload>,
        cancel: &CancellationToken,
        correlation_id: &str,
    ) -> Result<UploadedAttachments, WorkflowError> {
        if cancel.is_cancelled() {
            return Err(WorkflowError::Cancelled);
        }

        let child = cancel.child_token();
        let mut tasks = JoinSet::new();
        for upload in pending {
            let attachments = Arc::clone(&self.attachments);
            let token = child.clone();
            tasks.spawn(async move {
                let result: Result<_, Option<ApiError>> = tokio::select! {
                    _ = token.cancelled() => Err(None),
                    result = attachments.upload(&upload.file) => result.map_err(Some),
                };
                (upload, result)
            });
        }

        let mut uploads: UploadedAttachments = BTreeMap::new();
        let mut failure: Option<WorkflowError> = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((upload, Ok(attachment_id))) => {
                    uploads.insert((upload.group, upload.slot), attachment_id);
                }
                Ok((upload, Err(Some(error)))) => {
                    if failure.is_none() {
                        child.cancel();
                        failure = Some(WorkflowError::Upload {
                            group_name: upload.group_name,
                            quote_number: upload.quote_number,
                            message: error.to_string(),
                        });
                    }
                }
                // A sibling cancelled after the first failure or by the caller.
                Ok((_, Err(None))) => {}
                Err(join_error) => {
                    if failure.is_none() {
                        child.cancel();
                        failure = Some(WorkflowError::Domain(DomainError::InvariantViolation(
                            format!("upload task failed to join: {join_error}"),
                        )));
                    }
                }
            }
        }

        if let Some(error) = failure {
            warn!(
                event_name = "quote.upload_failed",
                correlation_id = %correlation_id,
                error = %error,
                "document upload failed; submission aborted before POST"
            );
            self.notifier.notify(
                Notification::new(Severity::Error, "fileCorrupt", correlation_id)
                    .with_detail(error.to_string()),
            );
            return Err(error);
        }
        if cancel.is_cancelled() {
            return Err(WorkflowError::Cancelled);
        }
        Ok(uploads)
    }
}

fn collect_pending(session: &QuoteSession) -> Vec<PendingUpload> {
    let mut pending = Vec::new();
    for (group_index, group) in session.groups().iter().enumerate() {
        for (slot_index, slot) in group.slots.iter().enumerate() {
            if let Some(file) = &slot.document {
                pending.push(PendingUpload {
                    group: group_index,
                    slot: slot_index,
                    quote_number: slot.quote_number,
                    group_name: group.group_name.clone(),
                    file: file.clone(),
                });
            }
        }
    }
    pending
}
