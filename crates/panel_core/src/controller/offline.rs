//! Screen shown when the REST interface cannot be reached while the panel
//! starts. Nothing here notices a connection lost later on.

use tracing::{info, warn};

use crate::{rest_info::describe_failure, PanelContext};

pub const UNREACHABLE: &str =
    "<strong>Warning:</strong> Could not contact REST-Interface! %INFO%";

pub struct OfflineController {
    ctx: PanelContext,
    /// Absolute REST endpoint the hosting platform announced.
    pub post_endpoint: String,
    /// Absolute location of the panel installation.
    pub install_dir: String,
    pub diagnostics: Option<String>,
}

impl OfflineController {
    pub fn new(ctx: PanelContext) -> Self {
        let settings = &ctx.settings;
        Self {
            post_endpoint: settings.absolute_url(&settings.post_vars.rest_endpoint),
            install_dir: settings.absolute_url(&settings.install_dir),
            diagnostics: None,
            ctx,
        }
    }

    /// Probes the route catalog, the one call that needs no session.
    pub async fn check_connection(&mut self) -> bool {
        match self.ctx.rest.routes().await {
            Ok(_) => {
                info!(endpoint = %self.ctx.settings.rest_endpoint, "REST interface reachable");
                self.diagnostics = None;
                true
            }
            Err(failure) => {
                warn!(endpoint = %self.ctx.settings.rest_endpoint, %failure, "REST interface unreachable");
                self.diagnostics = Some(describe_failure(UNREACHABLE, &failure));
                false
            }
        }
    }

    pub fn retry(&self) {
        self.ctx.navigator.reload();
    }
}
