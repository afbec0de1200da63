use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use homzhub_api::{AttachmentApi, TicketApi};
use homzhub_core::config::{AppConfig, LoadOptions};
use homzhub_core::domain::quote::{FileRef, SLOTS_PER_CATEGORY};
use homzhub_core::domain::ticket::{QuoteRequestId, TicketId};
use homzhub_core::flows::TabNavigator;
use homzhub_core::notify::Notifier;
use homzhub_core::session::{QuoteSession, SessionCommand};
use homzhub_workflow::{load_categories, SubmissionAssembler, SubmitOutcome};

use super::{api_handles, runtime, CommandResult};

/// Operator-authored description of one quote submission, e.g.
///
/// ```toml
/// comment = "access via rear gate"
///
/// [[category]]
/// id = 4
///
/// [[category.quote]]
/// slot = 1
/// price = "500"
/// document = "quotes/plumbing.pdf"
/// ```
#[derive(Debug, Deserialize)]
struct SubmitManifest {
    #[serde(default)]
    comment: Option<String>,
    #[serde(default, rename = "category")]
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    id: i64,
    #[serde(default, rename = "quote")]
    quotes: Vec<QuoteEntry>,
}

#[derive(Debug, Deserialize)]
struct QuoteEntry {
    slot: u8,
    price: String,
    document: PathBuf,
}

pub fn run(ticket: &str, quote_request: &str, manifest_path: &Path) -> CommandResult {
    let manifest = match read_manifest(manifest_path) {
        Ok(manifest) => manifest,
        Err(message) => return CommandResult::failure("submit", "manifest_invalid", message, 2),
    };
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("submit", "config_validation", error.to_string(), 2)
        }
    };
    let handles = match api_handles(&config) {
        Ok(handles) => handles,
        Err(message) => return CommandResult::failure("submit", "api_client", message, 1),
    };
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure("submit", "runtime", message, 1),
    };

    let ticket_id = TicketId(ticket.to_string());
    let quote_request_id = QuoteRequestId(quote_request.to_string());
    let mut session = QuoteSession::default();

    let outcome: Result<SubmitOutcome, String> = runtime.block_on(async {
        let detail = handles
            .tickets
            .ticket_detail(&ticket_id)
            .await
            .map_err(|error| error.to_string())?;

        load_categories(
            handles.tickets.as_ref(),
            &mut session,
            handles.notifier.as_ref(),
            &ticket_id,
            &quote_request_id,
        )
        .await
        .map_err(|error| error.to_string())?;

        apply_manifest(&mut session, &manifest)?;

        let mut navigator =
            TabNavigator::for_groups(session.groups()).map_err(|error| error.to_string())?;
        while !navigator.is_terminal() {
            navigator.advance(session.groups()).map_err(|error| error.to_string())?;
        }

        let assembler = SubmissionAssembler::new(
            Arc::clone(&handles.tickets) as Arc<dyn TicketApi>,
            Arc::clone(&handles.attachments) as Arc<dyn AttachmentApi>,
            Arc::clone(&handles.notifier) as Arc<dyn Notifier>,
        );
        assembler
            .submit(
                &mut session,
                &navigator,
                &detail,
                &quote_request_id,
                &CancellationToken::new(),
            )
            .await
            .map_err(|error| error.to_string())
    });

    match outcome {
        Ok(outcome) => CommandResult::success(
            "submit",
            format!(
                "submitted {} quotes across {} categories ({} documents uploaded)",
                outcome.quotes, outcome.groups, outcome.uploads
            ),
        ),
        Err(message) => CommandResult::failure("submit", "workflow_error", message, 1),
    }
}

fn read_manifest(path: &Path) -> Result<SubmitManifest, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read manifest `{}`: {error}", path.display()))?;
    toml::from_str(&raw)
        .map_err(|error| format!("could not parse manifest `{}`: {error}", path.display()))
}

fn apply_manifest(session: &mut QuoteSession, manifest: &SubmitManifest) -> Result<(), String> {
    for category in &manifest.categories {
        let group = session
            .groups()
            .iter()
            .position(|group| group.group_id.0 == category.id)
            .ok_or_else(|| format!("manifest names unknown category id {}", category.id))?;

        for quote in &category.quotes {
            if quote.slot == 0 || quote.slot as usize > SLOTS_PER_CATEGORY {
                return Err(format!(
                    "quote slot {} is out of range 1..={SLOTS_PER_CATEGORY}",
                    quote.slot
                ));
            }
            let slot = quote.slot as usize - 1;
            session
                .apply(SessionCommand::SetPrice { group, slot, price: quote.price.clone() })
                .map_err(|error| error.to_string())?;
            session
                .apply(SessionCommand::AttachDocument {
                    group,
                    slot,
                    file: file_ref(&quote.document),
                })
                .map_err(|error| error.to_string())?;
        }
    }

    if let Some(comment) = &manifest.comment {
        session
            .apply(SessionCommand::SetComment(comment.clone()))
            .map_err(|error| error.to_string())?;
    }
    Ok(())
}

fn file_ref(path: &Path) -> FileRef {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    FileRef { name, path: path.to_path_buf(), mime: mime_for_path(path).to_string() }
}

fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use homzhub_core::domain::quote::{CategoryId, QuoteCategory, SlotFill};
    use homzhub_core::session::{QuoteSession, SessionCommand};

    use super::{apply_manifest, mime_for_path, SubmitManifest};

    fn manifest(raw: &str) -> SubmitManifest {
        toml::from_str(raw).expect("manifest parses")
    }

    fn seeded_session() -> QuoteSession {
        let mut session = QuoteSession::default();
        session
            .apply(SessionCommand::SeedCategories(vec![
                QuoteCategory { id: CategoryId(4), name: "Plumbing".to_string() },
                QuoteCategory { id: CategoryId(9), name: "Electrical".to_string() },
            ]))
            .expect("seed");
        session
    }

    #[test]
    fn manifest_round_trips_categories_and_quotes() {
        let manifest = manifest(
            r#"
comment = "access via rear gate"

[[category]]
id = 4

[[category.quote]]
slot = 1
price = "500"
document = "quotes/plumbing.pdf"

[[category]]
id = 9
"#,
        );

        assert_eq!(manifest.comment.as_deref(), Some("access via rear gate"));
        assert_eq!(manifest.categories.len(), 2);
        assert_eq!(manifest.categories[0].quotes.len(), 1);
        assert_eq!(manifest.categories[1].quotes.len(), 0);
    }

    #[test]
    fn applying_a_manifest_fills_the_addressed_slots() {
        let mut session = seeded_session();
        let manifest = manifest(
            r#"
[[category]]
id = 9

[[category.quote]]
slot = 2
price = "750"
document = "quotes/electrical.pdf"
"#,
        );

        apply_manifest(&mut session, &manifest).expect("manifest applies");

        assert_eq!(session.groups()[1].slots[1].fill(), SlotFill::Complete);
        assert_eq!(session.groups()[1].slots[1].price, "750");
        assert_eq!(session.groups()[0].slots[1].fill(), SlotFill::Empty);
    }

    #[test]
    fn unknown_category_and_out_of_range_slots_are_refused() {
        let mut session = seeded_session();

        let unknown = manifest("[[category]]\nid = 99\n");
        assert!(apply_manifest(&mut session, &unknown)
            .expect_err("unknown category")
            .contains("unknown category id 99"));

        let out_of_range = manifest(
            r#"
[[category]]
id = 4

[[category.quote]]
slot = 4
price = "10"
document = "a.pdf"
"#,
        );
        assert!(apply_manifest(&mut session, &out_of_range)
            .expect_err("slot out of range")
            .contains("out of range"));
    }

    #[test]
    fn document_mime_types_follow_the_file_extension() {
        assert_eq!(mime_for_path(Path::new("estimate.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("site.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("unknown.bin")), "application/octet-stream");
    }
}
