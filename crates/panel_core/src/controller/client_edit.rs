//! Client editor: permission list, random credentials and the
//! create-or-update save.
//!
//! A draft with id `-1` is created on save and receives its id from the
//! backend; any other draft is updated in place. Saving redirects to the
//! client list as soon as the request is on its way, before the answer is
//! known, so the outcome only lands in `warning` and in storage.

use std::sync::Arc;

use shared::{
    domain::{Client, ClientId, Permission, Route},
    error::RestFailure,
    protocol::ClientFields,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    navigation::CLIENT_LIST,
    rest_info::{describe_failure, rest_info},
    token::TokenGenerator,
    PanelContext,
};

pub const SAVE_REJECTED: &str =
    "<strong>Warning:</strong> Save-Operation failed, for unknown reason! %INFO%";
pub const SAVE_FAILED: &str =
    "<strong>Warning:</strong> Save-Operation failed, could not contact REST-Interface! %INFO%";

pub const UPDATE_PANEL_TITLE: &str = "Update Admin-Panel Client";
pub const UPDATE_PANEL_MESSAGE: &str = "This clients API-Key is required by the the Admin-Panel, you should change the default api-key (inside app.js) first!<br/><br/>Do you really want to apply this changes?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(ClientId),
    Updated,
    /// The administrator declined to change the panel's own key.
    Cancelled,
    Failed(String),
}

pub struct ClientEditController {
    ctx: PanelContext,
    pub current: Client,
    /// Key at the time the editor opened, to notice changes to the panel key.
    pub original_key: String,
    pub routes: Vec<Route>,
    pub warning: Option<String>,
    tokens: TokenGenerator,
}

impl ClientEditController {
    pub fn new(ctx: PanelContext) -> Self {
        let current = ctx.storage.current().unwrap_or_else(Client::draft);
        Self {
            original_key: current.api_key.clone(),
            current,
            routes: Vec::new(),
            warning: None,
            tokens: TokenGenerator::from_entropy(),
            ctx,
        }
    }

    pub fn with_token_generator(mut self, tokens: TokenGenerator) -> Self {
        self.tokens = tokens;
        self
    }

    pub async fn init(&mut self) {
        if let Some(current) = self.ctx.storage.current() {
            self.current = current;
        }
        self.original_key = self.current.api_key.clone();
        self.load_routes().await;
    }

    pub async fn load_routes(&mut self) {
        match self.ctx.rest.routes().await {
            Ok(response) => {
                debug!(count = response.routes.len(), "route catalog loaded");
                self.routes = response.routes;
            }
            Err(failure) => warn!(%failure, "route catalog unavailable"),
        }
    }

    pub fn go_back(&self) {
        self.ctx.navigator.redirect(CLIENT_LIST);
    }

    pub fn format_permission_option(route: &str, verb: &str) -> String {
        format!("[{verb}] {route}")
    }

    /// Catalog entries as selectable permissions with their labels.
    pub fn permission_options(&self) -> Vec<(Permission, String)> {
        self.routes
            .iter()
            .map(|route| {
                (
                    route.to_permission(),
                    Self::format_permission_option(&route.route, &route.verb),
                )
            })
            .collect()
    }

    pub fn add_permission(&mut self, permission: Permission) {
        self.current.push_permission(permission);
        self.ctx.storage.set_current(self.current.clone());
    }

    pub fn delete_permission(&mut self, index: usize) -> Option<Permission> {
        let removed = self.current.remove_permission(index);
        if removed.is_some() {
            self.ctx.storage.set_current(self.current.clone());
        }
        removed
    }

    pub fn create_random_api_key(&mut self) -> &str {
        self.current.api_key = self.tokens.api_key();
        &self.current.api_key
    }

    pub fn create_random_api_secret(&mut self) -> &str {
        self.current.api_secret = self.tokens.api_secret();
        &self.current.api_secret
    }

    /// Whether saving would change the key the panel itself depends on.
    pub fn changes_panel_key(&self) -> bool {
        self.original_key == self.ctx.settings.api_key && self.original_key != self.current.api_key
    }

    pub async fn save_client(&mut self) -> SaveOutcome {
        let fields = match ClientFields::from_client(&self.current) {
            Ok(fields) => fields,
            Err(err) => {
                let message = format!("<strong>Warning:</strong> Save-Operation failed, {err}");
                self.warning = Some(message.clone());
                return SaveOutcome::Failed(message);
            }
        };

        if self.current.is_unsaved() {
            return self.create(fields).await;
        }

        if self.changes_panel_key()
            && !self
                .ctx
                .dialogs
                .confirm(UPDATE_PANEL_TITLE, UPDATE_PANEL_MESSAGE)
                .await
        {
            debug!(client_id = %self.current.id, "panel key change dismissed");
            return SaveOutcome::Cancelled;
        }
        self.update(fields).await
    }

    async fn create(&mut self, fields: ClientFields) -> SaveOutcome {
        let rest = Arc::clone(&self.ctx.rest);
        let request = tokio::spawn(async move { rest.create_client(&fields).await });
        self.ctx.navigator.redirect(CLIENT_LIST);

        match settle(request).await {
            Ok(response) if response.is_success() => match response.id {
                Some(id) => {
                    info!(client_id = %id, "client created");
                    self.current.id = id;
                    self.original_key = self.current.api_key.clone();
                    self.ctx.storage.add_client(self.current.clone());
                    self.ctx.storage.set_current(self.current.clone());
                    SaveOutcome::Created(id)
                }
                None => self.reject(response.status.as_deref()),
            },
            Ok(response) => self.reject(response.status.as_deref()),
            Err(failure) => self.fail(failure),
        }
    }

    async fn update(&mut self, fields: ClientFields) -> SaveOutcome {
        let id = self.current.id;
        self.ctx.storage.update_client(self.current.clone());
        self.ctx.storage.set_current(self.current.clone());

        let rest = Arc::clone(&self.ctx.rest);
        let request = tokio::spawn(async move { rest.update_client(id, &fields).await });
        self.ctx.navigator.redirect(CLIENT_LIST);

        match settle(request).await {
            Ok(response) if response.is_success() => {
                info!(client_id = %id, "client updated");
                self.original_key = self.current.api_key.clone();
                SaveOutcome::Updated
            }
            Ok(response) => self.reject(response.status.as_deref()),
            Err(failure) => self.fail(failure),
        }
    }

    /// The backend answered but refused. No transport status or raw body
    /// exists for this case, so the info slot stays empty.
    fn reject(&mut self, status: Option<&str>) -> SaveOutcome {
        warn!(client_id = %self.current.id, ?status, "save refused by backend");
        let message = rest_info(SAVE_REJECTED, None, "");
        self.warning = Some(message.clone());
        SaveOutcome::Failed(message)
    }

    fn fail(&mut self, failure: RestFailure) -> SaveOutcome {
        warn!(client_id = %self.current.id, %failure, "save request failed");
        let message = describe_failure(SAVE_FAILED, &failure);
        self.warning = Some(message.clone());
        SaveOutcome::Failed(message)
    }
}

async fn settle<T>(request: JoinHandle<Result<T, RestFailure>>) -> Result<T, RestFailure> {
    request
        .await
        .unwrap_or_else(|err| Err(RestFailure::unreachable(format!("request aborted: {err}"))))
}

#[cfg(test)]
#[path = "../tests/client_edit_tests.rs"]
mod tests;
