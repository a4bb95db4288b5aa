//! Shell-level view state shared by every screen: breadcrumbs, the login
//! state and the REST endpoint in use.

use std::sync::Arc;

use crate::{
    navigation::{Breadcrumbs, LOGIN},
    session::{AuthSession, SessionSnapshot},
    PanelContext,
};

pub struct MainController {
    ctx: PanelContext,
    pub breadcrumbs: Breadcrumbs,
    pub session: Arc<AuthSession>,
    pub rest_endpoint: String,
}

impl MainController {
    pub fn new(ctx: PanelContext) -> Self {
        let mut controller = Self {
            breadcrumbs: Breadcrumbs::default(),
            session: Arc::clone(&ctx.session),
            rest_endpoint: ctx.settings.rest_endpoint.clone(),
            ctx,
        };
        controller.init();
        controller
    }

    pub fn init(&mut self) {
        self.session = Arc::clone(&self.ctx.session);
        self.rest_endpoint = self.ctx.settings.rest_endpoint.clone();
        self.refresh_breadcrumbs();
    }

    pub fn refresh_breadcrumbs(&mut self) {
        self.breadcrumbs = Breadcrumbs::from_path(&self.ctx.navigator.current_path());
    }

    /// Login screens hide the session warnings.
    pub fn is_login_route(&self) -> bool {
        self.ctx.navigator.current_path().to_lowercase() == LOGIN
    }

    pub fn authentication(&self) -> SessionSnapshot {
        self.session.snapshot()
    }
}
