use serde::{Deserialize, Serialize};

use crate::domain::{Client, ClientId, Route};

/// Status value the backend reports for an accepted request.
pub const STATUS_SUCCESS: &str = "success";

/// Token type returned by the password grant on success.
pub const TOKEN_TYPE_BEARER: &str = "bearer";

pub const GRANT_TYPE_PASSWORD: &str = "password";

fn is_success(status: Option<&str>) -> bool {
    status == Some(STATUS_SUCCESS)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientListResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ClientListResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.status.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateClientResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub id: Option<ClientId>,
}

impl CreateClientResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.status.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.status.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutesResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// Editable field set submitted on create and update. Permissions travel as
/// a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFields {
    pub api_key: String,
    pub api_secret: String,
    pub oauth2_redirection_uri: String,
    pub oauth2_consent_message: String,
    pub permissions: String,
    pub oauth2_gt_client_active: bool,
    pub oauth2_gt_client_user: String,
    pub oauth2_gt_authcode_active: bool,
    pub oauth2_gt_implicit_active: bool,
    pub oauth2_gt_resourceowner_active: bool,
    pub oauth2_user_restriction_active: bool,
    pub oauth2_consent_message_active: bool,
    pub oauth2_authcode_refresh_active: bool,
    pub oauth2_resource_refresh_active: bool,
    pub access_user_csv: String,
}

impl ClientFields {
    pub fn from_client(client: &Client) -> serde_json::Result<Self> {
        Ok(Self {
            api_key: client.api_key.clone(),
            api_secret: client.api_secret.clone(),
            oauth2_redirection_uri: client.oauth2_redirection_uri.clone(),
            oauth2_consent_message: client.oauth2_consent_message.clone(),
            permissions: serde_json::to_string(client.permissions())?,
            oauth2_gt_client_active: client.oauth2_gt_client_active,
            oauth2_gt_client_user: client.oauth2_gt_client_user.clone(),
            oauth2_gt_authcode_active: client.oauth2_gt_authcode_active,
            oauth2_gt_implicit_active: client.oauth2_gt_implicit_active,
            oauth2_gt_resourceowner_active: client.oauth2_gt_resourceowner_active,
            oauth2_user_restriction_active: client.oauth2_user_restriction_active,
            oauth2_consent_message_active: client.oauth2_consent_message_active,
            oauth2_authcode_refresh_active: client.oauth2_authcode_refresh_active,
            oauth2_resource_refresh_active: client.oauth2_resource_refresh_active,
            access_user_csv: client.access_user_csv.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub id: ClientId,
    pub data: ClientFields,
}

/// Exchange of a hosting-platform session for a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionExchangeRequest {
    pub api_key: String,
    pub user_id: String,
    pub session_id: String,
    pub rtoken: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionExchangeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub token: Option<AccessToken>,
}

impl SessionExchangeResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.status.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordGrantRequest {
    pub grant_type: String,
    pub username: String,
    pub password: String,
    pub api_key: String,
}

impl PasswordGrantRequest {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            grant_type: GRANT_TYPE_PASSWORD.to_string(),
            username: username.into(),
            password: password.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl TokenResponse {
    pub fn is_bearer(&self) -> bool {
        self.token_type.as_deref() == Some(TOKEN_TYPE_BEARER)
    }
}
