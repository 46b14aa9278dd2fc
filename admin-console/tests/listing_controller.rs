/// Integration tests for the identities listing controller
mod common;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use admin_console::listing::{
    commands_for, BulkOutcome, CommandKey, CommandOutcome, DeleteConfirmation, ListingController,
    ListingError, RefreshOutcome, SearchField, SearchMode,
};
use admin_console::models::{Intent, Route};
use admin_console::services::MessageService;
use common::{http_error, identity, recovery_link, sample_identities, MockGateway, ScriptedGateway};
use tokio::sync::oneshot;

fn controller(gateway: MockGateway) -> (ListingController, MessageService) {
    let messages = MessageService::new(16);
    (
        ListingController::new(Arc::new(gateway), messages.clone()),
        messages,
    )
}

fn displayed_ids(controller: &ListingController) -> Vec<String> {
    controller.displayed().into_iter().map(|r| r.id).collect()
}

/// Listing expectation that answers from a queue of canned responses
fn queued_listing(gateway: &mut MockGateway, responses: Vec<Result<usize, u16>>) {
    let calls = responses.len();
    let queue = Mutex::new(VecDeque::from(responses));
    gateway
        .expect_list_identities()
        .times(calls)
        .returning(move || match queue.lock().unwrap().pop_front() {
            Some(Ok(count)) => Ok(sample_identities().into_iter().take(count).collect()),
            Some(Err(status)) => Err(http_error(status)),
            None => panic!("no listing response queued"),
        });
}

// ==================== Refresh ====================

#[tokio::test]
async fn test_init_maps_upstream_records_without_banner() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    let (controller, messages) = controller(gateway);

    assert_eq!(controller.init().await, RefreshOutcome::Applied { count: 2 });

    let displayed = controller.displayed();
    assert_eq!(displayed.len(), 2);
    assert_eq!(displayed[0].id, "a");
    assert_eq!(displayed[0].state, "active");
    assert_eq!(displayed[0].schema, "s1");
    assert_eq!(displayed[0].addresses, "x@ex.com");
    assert!(messages.active().is_empty());
}

#[tokio::test]
async fn test_refresh_with_no_identities_empties_listing_and_notifies() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_list_identities()
        .times(1)
        .returning(|| Ok(Vec::new()));
    let (controller, messages) = controller(gateway);
    let mut receiver = messages.subscribe();

    assert_eq!(controller.refresh(true).await, RefreshOutcome::Applied { count: 0 });

    assert!(controller.displayed().is_empty());
    let active = messages.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].notification.message.intent, Intent::Success);
    assert_eq!(active[0].notification.remove_after_seconds, 2);

    let received = receiver.try_recv().unwrap();
    assert_eq!(received.id, active[0].id);
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_refresh_keeps_last_known_good_records() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2), Err(503)]);
    let (controller, messages) = controller(gateway);

    controller.init().await;
    assert_eq!(controller.refresh(true).await, RefreshOutcome::Failed);

    assert_eq!(displayed_ids(&controller), vec!["a", "b"]);
    let active = messages.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].notification.message.intent, Intent::Error);
    assert_eq!(active[0].notification.message.title, "failed to get identities");
    assert_eq!(active[0].notification.remove_after_seconds, 4);
}

#[tokio::test]
async fn test_refresh_reapplies_current_filter_and_resets_selection() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2), Ok(2)]);
    let (controller, _messages) = controller(gateway);

    controller.init().await;
    controller.set_query("y@");
    controller.set_selection(["b"]);

    controller.refresh(false).await;

    assert_eq!(displayed_ids(&controller), vec!["b"]);
    assert!(controller.selection().is_empty());
    assert_eq!(controller.view().commands, commands_for(0));
}

#[tokio::test]
async fn test_latest_refresh_wins_when_results_arrive_out_of_order() {
    let (older_tx, older_rx) = oneshot::channel();
    let (newer_tx, newer_rx) = oneshot::channel();
    let messages = MessageService::new(16);
    let controller = ListingController::new(
        Arc::new(ScriptedGateway::new(vec![older_rx, newer_rx])),
        messages,
    );

    let (first, second, ()) = tokio::join!(
        controller.refresh(false),
        controller.refresh(false),
        async {
            newer_tx
                .send(vec![identity("new", "active", "s1", &["n@ex.com"])])
                .unwrap();
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            older_tx
                .send(vec![
                    identity("old", "active", "s1", &["o@ex.com"]),
                    identity("older", "inactive", "s1", &[]),
                ])
                .unwrap();
        }
    );

    let outcomes = [first, second];
    assert!(outcomes.contains(&RefreshOutcome::Superseded));
    assert!(outcomes.contains(&RefreshOutcome::Applied { count: 1 }));
    assert_eq!(displayed_ids(&controller), vec!["new"]);
}

// ==================== Filtering ====================

#[tokio::test]
async fn test_filter_changes_never_refetch() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    let (controller, _messages) = controller(gateway);
    controller.init().await;

    let view = controller.set_mode(SearchMode::new(SearchField::Email, true));
    assert_eq!(view.displayed.len(), 2);

    let view = controller.set_query("^x");
    assert_eq!(view.displayed.len(), 1);
    assert_eq!(view.displayed[0].id, "a");
    assert_eq!(view.total, 2);

    controller.set_mode(SearchMode::new(SearchField::State, false));
    assert!(controller.displayed().is_empty());

    controller.set_query("");
    assert_eq!(displayed_ids(&controller), vec!["a", "b"]);
}

// ==================== Commands ====================

#[tokio::test]
async fn test_single_selection_navigates_to_view_and_edit() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    let (controller, _messages) = controller(gateway);
    controller.init().await;

    controller.set_selection(["b"]);

    assert_eq!(
        controller.trigger(CommandKey::View).await.unwrap(),
        CommandOutcome::Navigate {
            route: Route::ViewIdentity("b".to_string())
        }
    );
    assert_eq!(
        controller.trigger(CommandKey::Edit).await.unwrap(),
        CommandOutcome::Navigate {
            route: Route::EditIdentity("b".to_string())
        }
    );
    assert_eq!(
        controller.trigger(CommandKey::Create).await.unwrap(),
        CommandOutcome::Navigate {
            route: Route::CreateIdentity
        }
    );
}

#[tokio::test]
async fn test_commands_not_offered_are_rejected() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    let (controller, _messages) = controller(gateway);
    controller.init().await;

    assert!(matches!(
        controller.trigger(CommandKey::Delete).await,
        Err(ListingError::CommandUnavailable(CommandKey::Delete))
    ));

    controller.set_selection(["a", "b"]);
    assert!(matches!(
        controller.trigger(CommandKey::View).await,
        Err(ListingError::CommandUnavailable(CommandKey::View))
    ));
    assert_eq!(controller.view().confirmation, DeleteConfirmation::Hidden);
}

#[tokio::test]
async fn test_refresh_command_shows_banner() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2), Ok(1)]);
    let (controller, messages) = controller(gateway);
    controller.init().await;

    let outcome = controller.trigger(CommandKey::Refresh).await.unwrap();

    assert_eq!(
        outcome,
        CommandOutcome::Refresh {
            outcome: RefreshOutcome::Applied { count: 1 }
        }
    );
    assert_eq!(messages.active().len(), 1);
}

// ==================== Bulk delete ====================

#[tokio::test]
async fn test_delete_with_one_failure_reports_once_and_skips_refresh() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    gateway
        .expect_delete_identity()
        .times(2)
        .returning(|id| if id == "b" { Err(http_error(500)) } else { Ok(()) });
    let (controller, messages) = controller(gateway);
    controller.init().await;

    controller.set_selection(["a", "b"]);
    assert_eq!(
        controller.trigger(CommandKey::Delete).await.unwrap(),
        CommandOutcome::ConfirmationShown { count: 2 }
    );
    assert_eq!(controller.view().confirmation, DeleteConfirmation::Shown);

    let outcome = controller.delete_selected().await.unwrap();

    assert_eq!(outcome, BulkOutcome::Failed { failed: 1, total: 2 });
    assert_eq!(controller.view().confirmation, DeleteConfirmation::Hidden);
    assert_eq!(displayed_ids(&controller), vec!["a", "b"]);
    let active = messages.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].notification.message.intent, Intent::Error);
    assert_eq!(active[0].notification.message.title, "failed to delete identities");
}

#[tokio::test]
async fn test_delete_all_succeeded_refreshes_with_single_banner() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2), Ok(0)]);
    gateway
        .expect_delete_identity()
        .times(2)
        .returning(|_| Ok(()));
    let (controller, messages) = controller(gateway);
    controller.init().await;

    controller.set_selection(["a", "b"]);
    controller.trigger(CommandKey::Delete).await.unwrap();
    let outcome = controller.delete_selected().await.unwrap();

    assert_eq!(outcome, BulkOutcome::Succeeded { count: 2 });
    assert_eq!(controller.view().confirmation, DeleteConfirmation::Hidden);
    assert!(controller.displayed().is_empty());
    assert!(controller.selection().is_empty());

    let active = messages.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].notification.message.title, "selected identities deleted");
    assert_eq!(active[0].notification.remove_after_seconds, 2);
}

#[tokio::test]
async fn test_cancel_hides_confirmation_without_deleting() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    gateway.expect_delete_identity().never();
    let (controller, messages) = controller(gateway);
    controller.init().await;

    controller.set_selection(["a"]);
    controller.trigger(CommandKey::Delete).await.unwrap();
    let view = controller.cancel_delete();

    assert_eq!(view.confirmation, DeleteConfirmation::Hidden);
    assert_eq!(view.selection, vec!["a".to_string()]);
    assert!(messages.active().is_empty());
}

#[tokio::test]
async fn test_delete_without_confirmation_is_rejected() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    gateway.expect_delete_identity().never();
    let (controller, messages) = controller(gateway);
    controller.init().await;

    assert!(matches!(
        controller.delete_selected().await,
        Err(ListingError::NotConfirmed)
    ));

    controller.set_selection(["a"]);
    assert!(matches!(
        controller.delete_selected().await,
        Err(ListingError::NotConfirmed)
    ));
    assert!(messages.active().is_empty());
}

#[tokio::test]
async fn test_selection_change_withdraws_confirmation() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    gateway.expect_delete_identity().never();
    let (controller, _messages) = controller(gateway);
    controller.init().await;

    controller.set_selection(["a"]);
    controller.trigger(CommandKey::Delete).await.unwrap();
    controller.set_selection(["b"]);

    assert_eq!(controller.view().confirmation, DeleteConfirmation::Hidden);
    assert!(matches!(
        controller.delete_selected().await,
        Err(ListingError::NotConfirmed)
    ));
}

#[tokio::test]
async fn test_delete_only_reaches_listed_identities() {
    let deleted = Arc::new(Mutex::new(Vec::new()));
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2), Ok(2)]);
    {
        let deleted = deleted.clone();
        gateway.expect_delete_identity().returning(move |id| {
            deleted.lock().unwrap().push(id.to_string());
            Ok(())
        });
    }
    let (controller, _messages) = controller(gateway);
    controller.init().await;

    let view = controller.set_selection(["a", "zzz-not-listed"]);
    assert_eq!(view.selection, vec!["a".to_string()]);

    controller.trigger(CommandKey::Delete).await.unwrap();
    let outcome = controller.delete_selected().await.unwrap();

    assert_eq!(outcome, BulkOutcome::Succeeded { count: 1 });
    assert_eq!(*deleted.lock().unwrap(), vec!["a".to_string()]);
}

// ==================== Bulk recovery ====================

#[tokio::test]
async fn test_recovery_success_does_not_refresh() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    gateway
        .expect_create_recovery_link()
        .times(2)
        .returning(|_| Ok(recovery_link()));
    let (controller, messages) = controller(gateway);
    controller.init().await;

    controller.set_selection(["a", "b"]);
    let outcome = controller.trigger(CommandKey::RecoveryLink).await.unwrap();

    assert_eq!(
        outcome,
        CommandOutcome::Recovery {
            outcome: BulkOutcome::Succeeded { count: 2 }
        }
    );
    // Selection survives because no refresh happened
    assert_eq!(controller.selection().len(), 2);
    let active = messages.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].notification.message.title, "selected identities recovered");
}

#[tokio::test]
async fn test_recovery_failure_reports_single_error() {
    let mut gateway = MockGateway::new();
    queued_listing(&mut gateway, vec![Ok(2)]);
    gateway
        .expect_create_recovery_link()
        .times(2)
        .returning(|_| Err(http_error(502)));
    let (controller, messages) = controller(gateway);
    controller.init().await;

    controller.set_selection(["a", "b"]);
    let outcome = controller.recover_selected().await;

    assert_eq!(outcome, BulkOutcome::Failed { failed: 2, total: 2 });
    let active = messages.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].notification.message.intent, Intent::Error);
    assert_eq!(active[0].notification.remove_after_seconds, 5);
}
