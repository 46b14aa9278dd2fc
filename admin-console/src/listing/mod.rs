//! Identities listing screen
//!
//! [`filter`] and [`commands`] are pure. [`state::ListingState`] is the
//! event-driven state machine, and [`ListingController`] wires it to the
//! identity gateway and the notification channel. [`ListingSessions`] gives
//! every console session its own controller.

pub mod commands;
pub mod controller;
pub mod filter;
pub mod sessions;
pub mod state;

pub use commands::{commands_for, Command, CommandKey};
pub use controller::{BulkOutcome, CommandOutcome, ListingController, ListingError, RefreshOutcome};
pub use filter::{filter, SearchField, SearchMode};
pub use sessions::ListingSessions;
pub use state::{DeleteConfirmation, ListingEvent, ListingState, ListingView, Transition};
