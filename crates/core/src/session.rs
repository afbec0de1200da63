use crate::domain::quote::{FileRef, QuoteCategory, QuoteGroup, QuoteSlot};
use crate::errors::DomainError;

/// Mutations over the quote session. All writes go through one reducer,
/// so the session has a single writer and no other workflow can touch
/// this state concurrently.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    SeedCategories(Vec<QuoteCategory>),
    SetPrice { group: usize, slot: usize, price: String },
    AttachDocument { group: usize, slot: usize, file: FileRef },
    RemoveDocument { group: usize, slot: usize },
    SetComment(String),
    Reset,
}

/// Per-submission quote state: seeded on category load, cleared on a
/// successful submit, untouched by any failure so a retry keeps the
/// operator's work. None of the commands touch the network.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuoteSession {
    groups: Vec<QuoteGroup>,
    comment: String,
}

impl QuoteSession {
    pub fn apply(&mut self, command: SessionCommand) -> Result<(), DomainError> {
        match command {
            SessionCommand::SeedCategories(categories) => {
                self.groups = categories.iter().map(QuoteGroup::seeded).collect();
                self.comment.clear();
            }
            SessionCommand::SetPrice { group, slot, price } => {
                self.slot_mut(group, slot)?.price = price;
            }
            SessionCommand::AttachDocument { group, slot, file } => {
                self.slot_mut(group, slot)?.document = Some(file);
            }
            SessionCommand::RemoveDocument { group, slot } => {
                self.slot_mut(group, slot)?.document = None;
            }
            SessionCommand::SetComment(comment) => {
                self.comment = comment;
            }
            SessionCommand::Reset => {
                self.groups.clear();
                self.comment.clear();
            }
        }
        Ok(())
    }

    pub fn groups(&self) -> &[QuoteGroup] {
        &self.groups
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn is_seeded(&self) -> bool {
        !self.groups.is_empty()
    }

    fn slot_mut(&mut self, group: usize, slot: usize) -> Result<&mut QuoteSlot, DomainError> {
        self.groups
            .get_mut(group)
            .and_then(|quote_group| quote_group.slots.get_mut(slot))
            .ok_or(DomainError::UnknownSlot { group, slot })
    }
}
