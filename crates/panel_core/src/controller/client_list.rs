//! Client overview: loading, creating drafts, opening the editor and
//! deleting clients.

use shared::domain::Client;
use tracing::{debug, info, warn};

use crate::{navigation::CLIENT_EDIT, rest_info::describe_failure, PanelContext};

pub const PERMISSION_DENIED: &str =
    "You have been logged out because you don't have enough permissions to access this menu.";
pub const FETCH_FAILED: &str =
    "<strong>Warning:</strong> Could not contact REST-Interface to fetch client data! %INFO%";
pub const DELETE_FAILED: &str =
    "<strong>Warning:</strong> Delete-Operation failed, could not contact REST-Interface! %INFO%";

pub const DELETE_TITLE: &str = "Delete Client";
pub const DELETE_MESSAGE: &str = "Do you really want to remove this client?";
pub const DELETE_PANEL_TITLE: &str = "Delete Admin-Panel Client";
pub const DELETE_PANEL_MESSAGE: &str = "This clients API-Key is required by the the Admin-Panel, you should change the default api-key (inside app.js) first!<br/><br/>Do you really want to remove this client?";

pub struct ClientListController {
    ctx: PanelContext,
    pub clients: Vec<Client>,
    pub warning: Option<String>,
}

impl ClientListController {
    pub fn new(ctx: PanelContext) -> Self {
        Self {
            clients: ctx.storage.clients(),
            warning: None,
            ctx,
        }
    }

    pub async fn init(&mut self) {
        self.warning = None;
        self.load_clients().await;
    }

    pub async fn load_clients(&mut self) {
        match self.ctx.rest.query_clients().await {
            Ok(response) if response.is_success() => {
                info!(count = response.clients.len(), "client list loaded");
                self.ctx.storage.set_clients(response.clients);
                self.clients = self.ctx.storage.clients();
            }
            Ok(response) => {
                warn!(status = ?response.status, msg = ?response.msg, "client list refused");
                self.ctx.session.logout();
                self.ctx.session.set_error(PERMISSION_DENIED);
            }
            Err(failure) => {
                warn!(%failure, "client list unavailable");
                self.warning = Some(describe_failure(FETCH_FAILED, &failure));
            }
        }
    }

    /// Starts a local draft; it reaches the backend only when saved.
    pub fn create_new_client(&mut self) {
        let draft = self.ctx.storage.default_client();
        self.ctx.storage.add_client(draft.clone());
        self.ctx.storage.set_current(draft);
        self.clients = self.ctx.storage.clients();
        self.ctx.navigator.redirect(CLIENT_EDIT);
    }

    pub fn edit_client(&mut self, client: &Client) {
        self.ctx.storage.set_current(client.clone());
        self.ctx.navigator.redirect(CLIENT_EDIT);
    }

    /// Removes the client shown at `index` after confirmation. Storage drops
    /// the same client by identity and the view is refreshed from it. The
    /// entry leaves the list before the backend answers and stays gone if the
    /// remote delete fails. Returns the removed client.
    pub async fn delete_client(&mut self, index: usize) -> Option<Client> {
        let Some(client) = self.clients.get(index) else {
            warn!(index, "delete requested for unknown list position");
            return None;
        };

        let (title, message) = if client.api_key == self.ctx.settings.api_key {
            (DELETE_PANEL_TITLE, DELETE_PANEL_MESSAGE)
        } else {
            (DELETE_TITLE, DELETE_MESSAGE)
        };
        if !self.ctx.dialogs.confirm(title, message).await {
            debug!(index, "delete dismissed");
            return None;
        }

        let client = self.clients.remove(index);
        let stored = self.ctx.storage.remove_client(&client);
        self.clients = self.ctx.storage.clients();

        if client.is_unsaved() {
            debug!(in_storage = stored.is_some(), "discarded unsaved draft");
            return Some(client);
        }

        match self.ctx.rest.delete_client(client.id).await {
            Ok(()) => info!(client_id = %client.id, "client deleted"),
            Err(failure) => {
                warn!(client_id = %client.id, %failure, "remote delete failed");
                self.warning = Some(describe_failure(DELETE_FAILED, &failure));
            }
        }
        Some(client)
    }
}

#[cfg(test)]
#[path = "../tests/client_list_tests.rs"]
mod tests;
