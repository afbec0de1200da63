use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Every category always offers this many competing quote slots.
pub const SLOTS_PER_CATEGORY: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachmentId(pub i64);

/// A bucket of work items within a ticket that can receive quotes.
/// Fetched once per ticket and immutable for the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCategory {
    pub id: CategoryId,
    pub name: String,
}

/// Local, not-yet-uploaded attachment captured from a document picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub path: PathBuf,
    pub mime: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotFill {
    /// No quote offered for this slot.
    Empty,
    /// Price and document both captured.
    Complete,
    /// Exactly one of price/document captured; blocks category advance.
    Partial,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSlot {
    /// Stable identity within the group, 1..=SLOTS_PER_CATEGORY.
    pub quote_number: u8,
    pub title: String,
    /// Free-form text while editing; parsed at assembly time.
    pub price: String,
    pub document: Option<FileRef>,
}

impl QuoteSlot {
    pub fn empty(quote_number: u8) -> Self {
        Self {
            quote_number,
            title: format!("Quote {quote_number}"),
            price: String::new(),
            document: None,
        }
    }

    pub fn fill(&self) -> SlotFill {
        match (self.price.trim().is_empty(), self.document.is_some()) {
            (true, false) => SlotFill::Empty,
            (false, true) => SlotFill::Complete,
            _ => SlotFill::Partial,
        }
    }

    /// Price text must name a non-negative amount before submission.
    pub fn parsed_price(&self) -> Result<Decimal, DomainError> {
        let invalid = || DomainError::InvalidPrice {
            quote_number: self.quote_number,
            price: self.price.clone(),
        };
        let price = self.price.trim().parse::<Decimal>().map_err(|_| invalid())?;
        if price.is_sign_negative() {
            return Err(invalid());
        }
        Ok(price)
    }
}

/// Session-local projection of one category: the category identity plus
/// its fixed set of candidate slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteGroup {
    pub group_id: CategoryId,
    pub group_name: String,
    pub slots: Vec<QuoteSlot>,
}

impl QuoteGroup {
    /// One group per category, pre-populated with empty slots numbered
    /// from one.
    pub fn seeded(category: &QuoteCategory) -> Self {
        let slots = (1..=SLOTS_PER_CATEGORY as u8).map(QuoteSlot::empty).collect();
        Self { group_id: category.id, group_name: category.name.clone(), slots }
    }

    pub fn partial_slot_numbers(&self) -> Vec<u8> {
        self.slots
            .iter()
            .filter(|slot| slot.fill() == SlotFill::Partial)
            .map(|slot| slot.quote_number)
            .collect()
    }

    pub fn has_partial_slot(&self) -> bool {
        self.slots.iter().any(|slot| slot.fill() == SlotFill::Partial)
    }
}
