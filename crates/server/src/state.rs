use std::sync::Arc;

use service::users::UserService;

use crate::views::Views;

/// Per-request handle on the user service and the view renderer.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<dyn UserService>,
    pub views: Arc<Views>,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserService>, views: Arc<Views>) -> Self {
        Self { users, views }
    }
}
