use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::ClientId,
    error::RestFailure,
    protocol::{
        ClientFields, ClientListResponse, CreateClientResponse, PasswordGrantRequest,
        RoutesResponse, SessionExchangeRequest, SessionExchangeResponse, StatusResponse,
        TokenResponse, UpdateClientRequest,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::session::AuthSession;

/// The backend operations the panel consumes. Every call resolves to either
/// the decoded response or a [`RestFailure`] carrying status and raw body.
#[async_trait]
pub trait AdminRest: Send + Sync {
    async fn query_clients(&self) -> Result<ClientListResponse, RestFailure>;
    async fn create_client(&self, fields: &ClientFields)
        -> Result<CreateClientResponse, RestFailure>;
    async fn update_client(
        &self,
        id: ClientId,
        fields: &ClientFields,
    ) -> Result<StatusResponse, RestFailure>;
    async fn delete_client(&self, id: ClientId) -> Result<(), RestFailure>;
    async fn routes(&self) -> Result<RoutesResponse, RestFailure>;
    async fn exchange_session(
        &self,
        request: &SessionExchangeRequest,
    ) -> Result<SessionExchangeResponse, RestFailure>;
    async fn request_token(
        &self,
        request: &PasswordGrantRequest,
    ) -> Result<TokenResponse, RestFailure>;
}

/// Resource paths relative to the REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub clients: String,
    pub routes: String,
    pub session_exchange: String,
    pub token: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            clients: "/v1/clients".into(),
            routes: "/v1/routes".into(),
            session_exchange: "/v1/ilauth/rtoken2bearer".into(),
            token: "/v1/oauth2/token".into(),
        }
    }
}

pub struct HttpAdminRest {
    http: Client,
    server_url: String,
    endpoints: Endpoints,
    session: Arc<AuthSession>,
}

impl HttpAdminRest {
    pub fn new(
        server_url: impl Into<String>,
        endpoints: Endpoints,
        session: Arc<AuthSession>,
    ) -> Result<Self> {
        let server_url = server_url.into();
        Url::parse(&server_url)
            .with_context(|| format!("invalid REST endpoint url '{server_url}'"))?;

        Ok(Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            endpoints,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.server_url, path.trim_start_matches('/'))
    }

    fn client_url(&self, id: ClientId) -> String {
        format!("{}/{}", self.url(&self.endpoints.clients), id.0)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_body(&self, request: RequestBuilder) -> Result<(u16, String), RestFailure> {
        let response = self.authorize(request).send().await.map_err(|err| {
            warn!(error = %err, "REST endpoint unreachable");
            RestFailure::unreachable(err.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RestFailure::http(status.as_u16(), err.to_string()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "REST call answered with error status");
            return Err(RestFailure::http(status.as_u16(), body));
        }

        Ok((status.as_u16(), body))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RestFailure> {
        let (status, body) = self.fetch_body(request).await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(status, error = %err, "REST response is not the expected json");
                Err(RestFailure::http(status, body))
            }
        }
    }
}

#[async_trait]
impl AdminRest for HttpAdminRest {
    async fn query_clients(&self) -> Result<ClientListResponse, RestFailure> {
        self.fetch_json(self.http.get(self.url(&self.endpoints.clients)))
            .await
    }

    async fn create_client(
        &self,
        fields: &ClientFields,
    ) -> Result<CreateClientResponse, RestFailure> {
        self.fetch_json(self.http.post(self.url(&self.endpoints.clients)).json(fields))
            .await
    }

    async fn update_client(
        &self,
        id: ClientId,
        fields: &ClientFields,
    ) -> Result<StatusResponse, RestFailure> {
        let body = UpdateClientRequest {
            id,
            data: fields.clone(),
        };
        self.fetch_json(self.http.put(self.client_url(id)).json(&body))
            .await
    }

    async fn delete_client(&self, id: ClientId) -> Result<(), RestFailure> {
        self.fetch_body(self.http.delete(self.client_url(id)))
            .await
            .map(|_| ())
    }

    async fn routes(&self) -> Result<RoutesResponse, RestFailure> {
        self.fetch_json(self.http.get(self.url(&self.endpoints.routes)))
            .await
    }

    async fn exchange_session(
        &self,
        request: &SessionExchangeRequest,
    ) -> Result<SessionExchangeResponse, RestFailure> {
        self.fetch_json(
            self.http
                .post(self.url(&self.endpoints.session_exchange))
                .json(request),
        )
        .await
    }

    async fn request_token(
        &self,
        request: &PasswordGrantRequest,
    ) -> Result<TokenResponse, RestFailure> {
        self.fetch_json(self.http.post(self.url(&self.endpoints.token)).json(request))
            .await
    }
}

#[cfg(test)]
#[path = "tests/rest_tests.rs"]
mod tests;
