// Per-session listings - each console session owns its own listing state
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::controller::ListingController;
use crate::gateway::IdentityGateway;
use crate::services::MessageService;

/// Listing controllers keyed by session token. A controller is created and
/// loaded on the first request of a session, and dropped with the session.
pub struct ListingSessions {
    gateway: Arc<dyn IdentityGateway>,
    messages: MessageService,
    controllers: Mutex<HashMap<Uuid, Arc<ListingController>>>,
}

impl ListingSessions {
    pub fn new(gateway: Arc<dyn IdentityGateway>, messages: MessageService) -> Self {
        Self {
            gateway,
            messages,
            controllers: Mutex::new(HashMap::new()),
        }
    }

    /// Controller of `token`, running the initial load when it is new
    pub async fn controller(&self, token: Uuid) -> Arc<ListingController> {
        let (controller, created) = {
            let mut controllers = self.controllers.lock();
            match controllers.get(&token) {
                Some(controller) => (controller.clone(), false),
                None => {
                    let controller = Arc::new(ListingController::new(
                        self.gateway.clone(),
                        self.messages.clone(),
                    ));
                    controllers.insert(token, controller.clone());
                    (controller, true)
                }
            }
        };

        if created {
            debug!(session = %token, "opening listing for session");
            controller.init().await;
        }
        controller
    }

    pub fn close(&self, token: Uuid) -> bool {
        self.controllers.lock().remove(&token).is_some()
    }

    /// Drop the listings of the given sessions
    pub fn close_all(&self, tokens: &[Uuid]) {
        if tokens.is_empty() {
            return;
        }
        let mut controllers = self.controllers.lock();
        for token in tokens {
            controllers.remove(token);
        }
    }

    pub fn len(&self) -> usize {
        self.controllers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
