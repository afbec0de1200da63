use std::sync::Arc;

use homzhub_api::TicketApi;
use homzhub_core::config::{AppConfig, LoadOptions};
use homzhub_core::domain::ticket::TicketId;
use homzhub_core::notify::Notifier;
use homzhub_workflow::TicketActions;

use super::{api_handles, runtime, CommandResult};
use crate::TicketCommand;

pub fn run(command: TicketCommand) -> CommandResult {
    let (name, ticket) = match &command {
        TicketCommand::Close { ticket } => ("ticket.close", ticket.clone()),
        TicketCommand::Reassign { ticket, .. } => ("ticket.reassign", ticket.clone()),
        TicketCommand::RequestQuote { ticket } => ("ticket.request-quote", ticket.clone()),
        TicketCommand::ApproveQuote { ticket } => ("ticket.approve-quote", ticket.clone()),
        TicketCommand::RequestMoreQuotes { ticket } => {
            ("ticket.request-more-quotes", ticket.clone())
        }
        TicketCommand::Review { ticket, .. } => ("ticket.review", ticket.clone()),
    };

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure(name, "config_validation", error.to_string(), 2),
    };
    let handles = match api_handles(&config) {
        Ok(handles) => handles,
        Err(message) => return CommandResult::failure(name, "api_client", message, 1),
    };
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure(name, "runtime", message, 1),
    };

    let actions = TicketActions::new(
        Arc::clone(&handles.tickets) as Arc<dyn TicketApi>,
        Arc::clone(&handles.notifier) as Arc<dyn Notifier>,
    );
    let ticket_id = TicketId(ticket.clone());

    let result = runtime.block_on(async {
        // Start from the authoritative detail so local gating sees the
        // current status pair.
        let detail = handles
            .tickets
            .ticket_detail(&ticket_id)
            .await
            .map_err(|error| error.to_string())?;

        let refreshed = match &command {
            TicketCommand::Close { .. } => actions.close(&detail).await,
            TicketCommand::Reassign { assigned_to, .. } => {
                actions.reassign(&detail, assigned_to.clone()).await
            }
            TicketCommand::RequestQuote { .. } => actions.request_quote(&detail).await,
            TicketCommand::ApproveQuote { .. } => actions.approve_quote(&detail).await,
            TicketCommand::RequestMoreQuotes { .. } => {
                actions.request_more_quotes(&detail).await
            }
            TicketCommand::Review { rating, comment, .. } => {
                actions.submit_review(&detail, *rating, comment.clone()).await
            }
        }
        .map_err(|error| error.to_string())?;

        Ok::<_, String>(refreshed)
    });

    match result {
        Ok(refreshed) => CommandResult::success(
            name,
            format!(
                "ticket {} now has status {:?} (ffm {:?})",
                ticket, refreshed.status, refreshed.ffm_status
            ),
        ),
        Err(message) => CommandResult::failure(name, "workflow_error", message, 1),
    }
}
