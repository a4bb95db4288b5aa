use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::{
    domain::ClientId,
    error::RestFailure,
    protocol::{
        ClientFields, ClientListResponse, CreateClientResponse, PasswordGrantRequest,
        RoutesResponse, SessionExchangeRequest, SessionExchangeResponse, StatusResponse,
        TokenResponse,
    },
};

use crate::{
    AdminRest, AuthSession, ClientStorage, Dialogs, HistoryNavigator, PanelContext,
    PanelSettings,
};

pub(crate) const PANEL_KEY: &str = "panel-key";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RestCall {
    QueryClients,
    Create(ClientFields),
    Update(ClientId, ClientFields),
    Delete(ClientId),
    Routes,
    Exchange(SessionExchangeRequest),
    Token(PasswordGrantRequest),
}

type Scripted<T> = Mutex<Option<Result<T, RestFailure>>>;

/// Backend double answering every call with a preset result.
#[derive(Default)]
pub(crate) struct ScriptedRest {
    list: Scripted<ClientListResponse>,
    create: Scripted<CreateClientResponse>,
    update: Scripted<StatusResponse>,
    delete: Scripted<()>,
    routes: Scripted<RoutesResponse>,
    exchange: Scripted<SessionExchangeResponse>,
    token: Scripted<TokenResponse>,
    calls: Mutex<Vec<RestCall>>,
}

fn answer<T: Clone>(slot: &Scripted<T>) -> Result<T, RestFailure> {
    slot.lock()
        .expect("script lock")
        .clone()
        .unwrap_or_else(|| Err(RestFailure::unreachable("unscripted call")))
}

impl ScriptedRest {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_list(self, result: Result<ClientListResponse, RestFailure>) -> Self {
        *self.list.lock().expect("script lock") = Some(result);
        self
    }

    pub(crate) fn with_create(self, result: Result<CreateClientResponse, RestFailure>) -> Self {
        *self.create.lock().expect("script lock") = Some(result);
        self
    }

    pub(crate) fn with_update(self, result: Result<StatusResponse, RestFailure>) -> Self {
        *self.update.lock().expect("script lock") = Some(result);
        self
    }

    pub(crate) fn with_delete(self, result: Result<(), RestFailure>) -> Self {
        *self.delete.lock().expect("script lock") = Some(result);
        self
    }

    pub(crate) fn with_routes(self, result: Result<RoutesResponse, RestFailure>) -> Self {
        *self.routes.lock().expect("script lock") = Some(result);
        self
    }

    pub(crate) fn with_exchange(
        self,
        result: Result<SessionExchangeResponse, RestFailure>,
    ) -> Self {
        *self.exchange.lock().expect("script lock") = Some(result);
        self
    }

    pub(crate) fn with_token(self, result: Result<TokenResponse, RestFailure>) -> Self {
        *self.token.lock().expect("script lock") = Some(result);
        self
    }

    pub(crate) fn calls(&self) -> Vec<RestCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: RestCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl AdminRest for ScriptedRest {
    async fn query_clients(&self) -> Result<ClientListResponse, RestFailure> {
        self.record(RestCall::QueryClients);
        answer(&self.list)
    }

    async fn create_client(
        &self,
        fields: &ClientFields,
    ) -> Result<CreateClientResponse, RestFailure> {
        self.record(RestCall::Create(fields.clone()));
        answer(&self.create)
    }

    async fn update_client(
        &self,
        id: ClientId,
        fields: &ClientFields,
    ) -> Result<StatusResponse, RestFailure> {
        self.record(RestCall::Update(id, fields.clone()));
        answer(&self.update)
    }

    async fn delete_client(&self, id: ClientId) -> Result<(), RestFailure> {
        self.record(RestCall::Delete(id));
        answer(&self.delete)
    }

    async fn routes(&self) -> Result<RoutesResponse, RestFailure> {
        self.record(RestCall::Routes);
        answer(&self.routes)
    }

    async fn exchange_session(
        &self,
        request: &SessionExchangeRequest,
    ) -> Result<SessionExchangeResponse, RestFailure> {
        self.record(RestCall::Exchange(request.clone()));
        answer(&self.exchange)
    }

    async fn request_token(
        &self,
        request: &PasswordGrantRequest,
    ) -> Result<TokenResponse, RestFailure> {
        self.record(RestCall::Token(request.clone()));
        answer(&self.token)
    }
}

pub(crate) struct RecordingDialogs {
    accept: bool,
    asked: Mutex<Vec<(String, String)>>,
}

impl RecordingDialogs {
    pub(crate) fn asked(&self) -> Vec<(String, String)> {
        self.asked.lock().expect("dialog lock").clone()
    }
}

#[async_trait]
impl Dialogs for RecordingDialogs {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        self.asked
            .lock()
            .expect("dialog lock")
            .push((title.to_string(), message.to_string()));
        self.accept
    }
}

pub(crate) struct Harness {
    pub rest: Arc<ScriptedRest>,
    pub dialogs: Arc<RecordingDialogs>,
    pub navigator: Arc<HistoryNavigator>,
    pub ctx: PanelContext,
}

pub(crate) fn harness(rest: ScriptedRest, accept_dialogs: bool) -> Harness {
    harness_with_settings(rest, accept_dialogs, PanelSettings {
        api_key: PANEL_KEY.to_string(),
        ..PanelSettings::default()
    })
}

pub(crate) fn harness_with_settings(
    rest: ScriptedRest,
    accept_dialogs: bool,
    settings: PanelSettings,
) -> Harness {
    let rest = Arc::new(rest);
    let dialogs = Arc::new(RecordingDialogs {
        accept: accept_dialogs,
        asked: Mutex::new(Vec::new()),
    });
    let navigator = Arc::new(HistoryNavigator::new(crate::navigation::CLIENT_LIST));
    let ctx = PanelContext {
        rest: rest.clone(),
        storage: Arc::new(ClientStorage::new()),
        session: Arc::new(AuthSession::new()),
        dialogs: dialogs.clone(),
        navigator: navigator.clone(),
        settings: Arc::new(settings),
    };
    Harness {
        rest,
        dialogs,
        navigator,
        ctx,
    }
}
