use thiserror::Error;

use crate::domain::quote::QuoteGroup;

/// Message key surfaced when a category still has half-filled slots.
pub const INCOMPLETE_SLOTS_MESSAGE_KEY: &str = "pleaseFillDetails";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TabTransitionError {
    #[error("category `{group_name}` has incomplete quote slots {slot_numbers:?} ({message_key})")]
    IncompleteSlots {
        group_name: String,
        slot_numbers: Vec<u8>,
        message_key: &'static str,
    },
    #[error("there are no quote categories to navigate")]
    NoCategories,
    #[error("already on the final category")]
    AtTerminal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabTransition {
    pub from: usize,
    pub to: usize,
}

/// One state per category index. Leaving a category is refused while any
/// of its slots holds exactly one of price/document; a refusal never
/// moves the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabNavigator {
    index: usize,
    count: usize,
}

impl TabNavigator {
    pub fn for_groups(groups: &[QuoteGroup]) -> Result<Self, TabTransitionError> {
        if groups.is_empty() {
            return Err(TabTransitionError::NoCategories);
        }
        Ok(Self { index: 0, count: groups.len() })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// On the final category the primary action is submit, not next.
    pub fn is_terminal(&self) -> bool {
        self.index + 1 == self.count
    }

    pub fn advance(&mut self, groups: &[QuoteGroup]) -> Result<TabTransition, TabTransitionError> {
        let group = groups.get(self.index).ok_or(TabTransitionError::NoCategories)?;
        validate_group(group)?;

        if self.is_terminal() {
            return Err(TabTransitionError::AtTerminal);
        }

        let from = self.index;
        self.index += 1;
        Ok(TabTransition { from, to: self.index })
    }

    /// Backwards navigation is never gated.
    pub fn retreat(&mut self) -> Option<TabTransition> {
        if self.index == 0 {
            return None;
        }
        let from = self.index;
        self.index -= 1;
        Some(TabTransition { from, to: self.index })
    }
}

/// A category with every slot blank is valid; the operator may skip it.
pub fn validate_group(group: &QuoteGroup) -> Result<(), TabTransitionError> {
    let slot_numbers = group.partial_slot_numbers();
    if slot_numbers.is_empty() {
        return Ok(());
    }
    Err(TabTransitionError::IncompleteSlots {
        group_name: group.group_name.clone(),
        slot_numbers,
        message_key: INCOMPLETE_SLOTS_MESSAGE_KEY,
    })
}

/// Submission-time check across every category, not just the active tab.
pub fn validate_all_groups(groups: &[QuoteGroup]) -> Result<(), TabTransitionError> {
    groups.iter().try_for_each(validate_group)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{TabNavigator, TabTransitionError, INCOMPLETE_SLOTS_MESSAGE_KEY};
    use crate::domain::quote::{CategoryId, FileRef, QuoteCategory, QuoteGroup};

    fn groups(names: &[&str]) -> Vec<QuoteGroup> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                QuoteGroup::seeded(&QuoteCategory {
                    id: CategoryId(index as i64 + 1),
                    name: (*name).to_string(),
                })
            })
            .collect()
    }

    fn document() -> FileRef {
        FileRef {
            name: "estimate.pdf".to_string(),
            path: PathBuf::from("/tmp/estimate.pdf"),
            mime: "application/pdf".to_string(),
        }
    }

    #[test]
    fn all_blank_category_advances() {
        let groups = groups(&["Plumbing", "Electrical"]);
        let mut navigator = TabNavigator::for_groups(&groups).expect("non-empty groups");

        let transition = navigator.advance(&groups).expect("blank category is skippable");
        assert_eq!((transition.from, transition.to), (0, 1));
        assert!(navigator.is_terminal());
    }

    #[test]
    fn partial_slot_blocks_advance_and_keeps_index() {
        let mut groups = groups(&["Plumbing", "Electrical"]);
        groups[0].slots[1].price = "750".to_string();
        let mut navigator = TabNavigator::for_groups(&groups).expect("non-empty groups");

        let error = navigator.advance(&groups).expect_err("half-filled slot must block");
        assert_eq!(
            error,
            TabTransitionError::IncompleteSlots {
                group_name: "Plumbing".to_string(),
                slot_numbers: vec![2],
                message_key: INCOMPLETE_SLOTS_MESSAGE_KEY,
            }
        );
        assert_eq!(navigator.index(), 0);
    }

    #[test]
    fn complete_slot_with_document_advances() {
        let mut groups = groups(&["Plumbing", "Electrical"]);
        groups[0].slots[0].price = "500".to_string();
        groups[0].slots[0].document = Some(document());
        let mut navigator = TabNavigator::for_groups(&groups).expect("non-empty groups");

        navigator.advance(&groups).expect("complete slot plus blanks is valid");
        assert_eq!(navigator.index(), 1);
    }

    #[test]
    fn terminal_tab_refuses_advance() {
        let groups = groups(&["Plumbing"]);
        let mut navigator = TabNavigator::for_groups(&groups).expect("non-empty groups");

        assert!(navigator.is_terminal());
        let error = navigator.advance(&groups).expect_err("single tab is terminal");
        assert_eq!(error, TabTransitionError::AtTerminal);
    }

    #[test]
    fn retreat_is_never_gated() {
        let mut groups = groups(&["Plumbing", "Electrical"]);
        let mut navigator = TabNavigator::for_groups(&groups).expect("non-empty groups");
        navigator.advance(&groups).expect("advance to second tab");

        groups[1].slots[0].price = "10".to_string();
        let transition = navigator.retreat().expect("retreat from second tab");
        assert_eq!((transition.from, transition.to), (1, 0));
        assert_eq!(navigator.retreat(), None);
    }

    #[test]
    fn empty_group_list_is_rejected_up_front() {
        let error = TabNavigator::for_groups(&[]).expect_err("no categories");
        assert_eq!(error, TabTransitionError::NoCategories);
    }
}
