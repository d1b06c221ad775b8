use std::sync::Arc;

use service::item::ItemService;

/// Shared handler state. Authorization is an external collaborator's
/// concern: everything reachable here assumes an already-authenticated
/// single actor.
#[derive(Clone)]
pub struct ServerState {
    pub items: Arc<ItemService>,
}
