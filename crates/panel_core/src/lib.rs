use std::sync::Arc;

pub mod config;
pub mod controller;
pub mod dialogs;
pub mod navigation;
pub mod rest;
pub mod rest_info;
pub mod session;
pub mod storage;
pub mod token;

pub use config::{load_settings, PanelSettings, PostVars};
pub use controller::{
    client_edit::{ClientEditController, SaveOutcome},
    client_list::ClientListController,
    login::{LoginController, LoginForm},
    main::MainController,
    offline::OfflineController,
};
pub use dialogs::{AutoConfirm, Dialogs};
pub use navigation::{Breadcrumb, Breadcrumbs, HistoryNavigator, Navigator};
pub use rest::{AdminRest, Endpoints, HttpAdminRest};
pub use session::{AuthSession, SessionSnapshot};
pub use storage::ClientStorage;
pub use token::TokenGenerator;

/// Collaborators shared by every controller. The application shell builds one
/// and hands clones to each controller it activates.
#[derive(Clone)]
pub struct PanelContext {
    pub rest: Arc<dyn AdminRest>,
    pub storage: Arc<ClientStorage>,
    pub session: Arc<AuthSession>,
    pub dialogs: Arc<dyn Dialogs>,
    pub navigator: Arc<dyn Navigator>,
    pub settings: Arc<PanelSettings>,
}

impl PanelContext {
    /// Wires the HTTP adapter to a fresh session and storage.
    pub fn connect(
        settings: PanelSettings,
        dialogs: Arc<dyn Dialogs>,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        let session = Arc::new(AuthSession::new());
        let rest = HttpAdminRest::new(
            settings.rest_endpoint.clone(),
            Endpoints::default(),
            Arc::clone(&session),
        )?;
        Ok(Self {
            rest: Arc::new(rest),
            storage: Arc::new(ClientStorage::new()),
            session,
            dialogs,
            navigator,
            settings: Arc::new(settings),
        })
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
