pub mod tabs;

pub use tabs::{
    validate_all_groups, validate_group, TabNavigator, TabTransition, TabTransitionError,
    INCOMPLETE_SLOTS_MESSAGE_KEY,
};
