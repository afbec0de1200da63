use homzhub_core::config::{AppConfig, LoadOptions};
use homzhub_core::domain::ticket::{QuoteRequestId, TicketId};
use homzhub_core::session::QuoteSession;
use homzhub_workflow::load_categories;

use super::{api_handles, runtime, CommandResult};

pub fn run(ticket: &str, quote_request: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("categories", "config_validation", error.to_string(), 2)
        }
    };
    let handles = match api_handles(&config) {
        Ok(handles) => handles,
        Err(message) => return CommandResult::failure("categories", "api_client", message, 1),
    };
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure("categories", "runtime", message, 1),
    };

    let ticket_id = TicketId(ticket.to_string());
    let quote_request_id = QuoteRequestId(quote_request.to_string());
    let mut session = QuoteSession::default();

    let loaded = runtime.block_on(load_categories(
        handles.tickets.as_ref(),
        &mut session,
        handles.notifier.as_ref(),
        &ticket_id,
        &quote_request_id,
    ));

    match loaded {
        Ok(count) => {
            let listing = session
                .groups()
                .iter()
                .map(|group| format!("{} (#{})", group.group_name, group.group_id.0))
                .collect::<Vec<_>>()
                .join(", ");
            CommandResult::success("categories", format!("seeded {count} categories: {listing}"))
        }
        Err(error) => {
            CommandResult::failure("categories", "workflow_error", error.to_string(), 1)
        }
    }
}
