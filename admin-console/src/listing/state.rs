// Listing state machine - every change to the identities screen goes
// through `ListingState::apply`
use std::collections::BTreeSet;

use serde::Serialize;

use super::commands::{commands_for, Command};
use super::filter::{filter, SearchMode};
use crate::models::DisplayRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteConfirmation {
    #[default]
    Hidden,
    Shown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEvent {
    QueryChanged(String),
    ModeChanged(SearchMode),
    SelectionChanged(BTreeSet<String>),
    /// A fetch was issued; stamps a new generation
    FetchStarted,
    FetchSettled {
        generation: u64,
        records: Vec<DisplayRecord>,
    },
    DeleteConfirmationShown,
    DeleteConfirmationHidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The event does not apply in the current state
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ListingState {
    records: Vec<DisplayRecord>,
    displayed: Vec<DisplayRecord>,
    query: String,
    mode: SearchMode,
    selection: BTreeSet<String>,
    commands: Vec<Command>,
    confirmation: DeleteConfirmation,
    generation: u64,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            displayed: Vec::new(),
            query: String::new(),
            mode: SearchMode::default(),
            selection: BTreeSet::new(),
            commands: commands_for(0),
            confirmation: DeleteConfirmation::Hidden,
            generation: 0,
        }
    }
}

impl ListingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: ListingEvent) -> Transition {
        match event {
            ListingEvent::QueryChanged(query) => {
                self.query = query;
                self.recompute_displayed();
            }
            ListingEvent::ModeChanged(mode) => {
                self.mode = mode;
                self.recompute_displayed();
            }
            ListingEvent::SelectionChanged(mut selection) => {
                // Only rows of the loaded listing can be selected
                selection.retain(|id| self.records.iter().any(|record| &record.id == id));
                self.commands = commands_for(selection.len());
                self.selection = selection;
                self.confirmation = DeleteConfirmation::Hidden;
            }
            ListingEvent::FetchStarted => {
                self.generation += 1;
            }
            ListingEvent::FetchSettled { generation, records } => {
                if generation != self.generation {
                    return Transition::Ignored;
                }
                self.records = records;
                self.recompute_displayed();
                self.selection.clear();
                self.commands = commands_for(0);
            }
            ListingEvent::DeleteConfirmationShown => {
                if self.selection.is_empty() {
                    return Transition::Ignored;
                }
                self.confirmation = DeleteConfirmation::Shown;
            }
            ListingEvent::DeleteConfirmationHidden => {
                self.confirmation = DeleteConfirmation::Hidden;
            }
        }
        Transition::Applied
    }

    fn recompute_displayed(&mut self) {
        self.displayed = filter(&self.records, &self.query, self.mode);
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn displayed(&self) -> &[DisplayRecord] {
        &self.displayed
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn confirmation(&self) -> DeleteConfirmation {
        self.confirmation
    }

    /// Generation of the most recently started fetch
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> ListingView {
        ListingView {
            displayed: self.displayed.clone(),
            total: self.records.len(),
            query: self.query.clone(),
            mode: self.mode,
            selection: self.selection.iter().cloned().collect(),
            commands: self.commands.clone(),
            confirmation: self.confirmation,
        }
    }
}

/// Read-only snapshot of the listing for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub displayed: Vec<DisplayRecord>,
    pub total: usize,
    pub query: String,
    pub mode: SearchMode,
    pub selection: Vec<String>,
    pub commands: Vec<Command>,
    pub confirmation: DeleteConfirmation,
}
