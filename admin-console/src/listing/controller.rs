// Listing controller - drives the identities screen
//
// State lives behind a mutex that is only ever held for a single reducer
// step, never across a gateway call.
use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::commands::CommandKey;
use super::filter::SearchMode;
use super::state::{DeleteConfirmation, ListingEvent, ListingState, ListingView, Transition};
use crate::gateway::IdentityGateway;
use crate::models::{DisplayRecord, Notification, Route};
use crate::services::MessageService;

const REFRESHED_SECS: u64 = 2;
const REFRESH_FAILED_SECS: u64 = 4;
const BULK_SUCCESS_SECS: u64 = 2;
const BULK_FAILED_SECS: u64 = 5;
const BULK_FAILED_CONTENT: &str = "See logs for more information";

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("Command not available for the current selection: {0}")]
    CommandUnavailable(CommandKey),

    #[error("Deletion has not been confirmed")]
    NotConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Applied { count: usize },
    /// A newer refresh started before this one settled
    Superseded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BulkOutcome {
    NothingSelected,
    Succeeded { count: usize },
    Failed { failed: usize, total: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandOutcome {
    Navigate { route: Route },
    ConfirmationShown { count: usize },
    Recovery { outcome: BulkOutcome },
    Refresh { outcome: RefreshOutcome },
}

pub struct ListingController {
    gateway: Arc<dyn IdentityGateway>,
    messages: MessageService,
    state: Mutex<ListingState>,
}

impl ListingController {
    pub fn new(gateway: Arc<dyn IdentityGateway>, messages: MessageService) -> Self {
        Self {
            gateway,
            messages,
            state: Mutex::new(ListingState::new()),
        }
    }

    /// Initial load, without a success banner
    pub async fn init(&self) -> RefreshOutcome {
        self.refresh(false).await
    }

    pub fn view(&self) -> ListingView {
        self.state.lock().view()
    }

    pub fn displayed(&self) -> Vec<DisplayRecord> {
        self.state.lock().displayed().to_vec()
    }

    pub fn selection(&self) -> BTreeSet<String> {
        self.state.lock().selection().clone()
    }

    /// Fetch every identity and replace the listing. Only the most recently
    /// started refresh is applied; earlier ones settle as `Superseded`.
    pub async fn refresh(&self, notify_on_success: bool) -> RefreshOutcome {
        let generation = {
            let mut state = self.state.lock();
            state.apply(ListingEvent::FetchStarted);
            state.generation()
        };

        let identities = match self.gateway.list_identities().await {
            Ok(identities) => identities,
            Err(err) => {
                if self.state.lock().generation() != generation {
                    debug!(generation, error = %err, "superseded refresh failed");
                    return RefreshOutcome::Superseded;
                }
                error!(error = %err, "failed to get identities");
                self.messages
                    .dispatch(Notification::error("failed to get identities", REFRESH_FAILED_SECS));
                return RefreshOutcome::Failed;
            }
        };

        let records: Vec<DisplayRecord> = identities.iter().map(DisplayRecord::from).collect();
        let count = records.len();
        let transition = self
            .state
            .lock()
            .apply(ListingEvent::FetchSettled { generation, records });

        if transition == Transition::Ignored {
            debug!(generation, "dropping superseded refresh result");
            return RefreshOutcome::Superseded;
        }

        info!(count, "identities refreshed");
        if notify_on_success {
            self.messages
                .dispatch(Notification::success("identities refreshed", REFRESHED_SECS));
        }
        RefreshOutcome::Applied { count }
    }

    pub fn set_query(&self, query: impl Into<String>) -> ListingView {
        let mut state = self.state.lock();
        state.apply(ListingEvent::QueryChanged(query.into()));
        state.view()
    }

    pub fn set_mode(&self, mode: SearchMode) -> ListingView {
        let mut state = self.state.lock();
        state.apply(ListingEvent::ModeChanged(mode));
        state.view()
    }

    pub fn set_selection<I, S>(&self, ids: I) -> ListingView
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selection: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        let mut state = self.state.lock();
        state.apply(ListingEvent::SelectionChanged(selection));
        state.view()
    }

    /// Run a toolbar command. Keys not offered for the current selection are
    /// rejected.
    pub async fn trigger(&self, key: CommandKey) -> Result<CommandOutcome, ListingError> {
        let immediate = {
            let mut state = self.state.lock();
            if !state.commands().iter().any(|command| command.key == key) {
                return Err(ListingError::CommandUnavailable(key));
            }
            let single = state.selection().iter().next().cloned();

            match (key, single) {
                (CommandKey::Create, _) => Some(CommandOutcome::Navigate {
                    route: Route::CreateIdentity,
                }),
                (CommandKey::View, Some(id)) => Some(CommandOutcome::Navigate {
                    route: Route::ViewIdentity(id),
                }),
                (CommandKey::Edit, Some(id)) => Some(CommandOutcome::Navigate {
                    route: Route::EditIdentity(id),
                }),
                (CommandKey::Delete, _) => {
                    state.apply(ListingEvent::DeleteConfirmationShown);
                    Some(CommandOutcome::ConfirmationShown {
                        count: state.selection().len(),
                    })
                }
                (CommandKey::View | CommandKey::Edit, None) => {
                    return Err(ListingError::CommandUnavailable(key));
                }
                (CommandKey::RecoveryLink | CommandKey::Refresh, _) => None,
            }
        };

        if let Some(outcome) = immediate {
            return Ok(outcome);
        }

        match key {
            CommandKey::RecoveryLink => Ok(CommandOutcome::Recovery {
                outcome: self.recover_selected().await,
            }),
            _ => Ok(CommandOutcome::Refresh {
                outcome: self.refresh(true).await,
            }),
        }
    }

    pub fn cancel_delete(&self) -> ListingView {
        let mut state = self.state.lock();
        state.apply(ListingEvent::DeleteConfirmationHidden);
        state.view()
    }

    /// Delete every selected identity once the confirmation prompt is shown.
    /// All-or-nothing reporting: one aggregate notification, and the list only
    /// refreshes if every delete succeeded. Deletes that did succeed upstream
    /// are not undone.
    pub async fn delete_selected(&self) -> Result<BulkOutcome, ListingError> {
        let ids = {
            let state = self.state.lock();
            if state.confirmation() != DeleteConfirmation::Shown {
                return Err(ListingError::NotConfirmed);
            }
            state.selection().iter().cloned().collect::<Vec<_>>()
        };
        if ids.is_empty() {
            self.state.lock().apply(ListingEvent::DeleteConfirmationHidden);
            return Ok(BulkOutcome::NothingSelected);
        }

        let results = join_all(ids.iter().map(|id| self.gateway.delete_identity(id))).await;
        let failed = count_failures("delete identity", &ids, &results);

        self.state.lock().apply(ListingEvent::DeleteConfirmationHidden);

        if failed > 0 {
            self.messages.dispatch(
                Notification::error("failed to delete identities", BULK_FAILED_SECS)
                    .with_content(BULK_FAILED_CONTENT),
            );
            return Ok(BulkOutcome::Failed {
                failed,
                total: ids.len(),
            });
        }

        info!(count = ids.len(), "identities deleted");
        self.refresh(false).await;
        self.messages
            .dispatch(Notification::success("selected identities deleted", BULK_SUCCESS_SECS));
        Ok(BulkOutcome::Succeeded { count: ids.len() })
    }

    /// Issue a recovery link for every selected identity. Same reporting as
    /// `delete_selected`, but the listing is left as is.
    pub async fn recover_selected(&self) -> BulkOutcome {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return BulkOutcome::NothingSelected;
        }

        let results = join_all(ids.iter().map(|id| self.gateway.create_recovery_link(id))).await;
        let failed = count_failures("create recovery link", &ids, &results);

        if failed > 0 {
            self.messages.dispatch(
                Notification::error("failed to recover identities", BULK_FAILED_SECS)
                    .with_content(BULK_FAILED_CONTENT),
            );
            return BulkOutcome::Failed {
                failed,
                total: ids.len(),
            };
        }

        info!(count = ids.len(), "recovery links created");
        self.messages
            .dispatch(Notification::success("selected identities recovered", BULK_SUCCESS_SECS));
        BulkOutcome::Succeeded { count: ids.len() }
    }

    fn selected_ids(&self) -> Vec<String> {
        self.state.lock().selection().iter().cloned().collect()
    }
}

fn count_failures<T, E: std::fmt::Display>(
    operation: &str,
    ids: &[String],
    results: &[Result<T, E>],
) -> usize {
    ids.iter()
        .zip(results)
        .filter(|(id, result)| match result {
            Ok(_) => false,
            Err(err) => {
                warn!(identity_id = %id, error = %err, "{} failed", operation);
                true
            }
        })
        .count()
}
