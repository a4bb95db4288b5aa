use shared::{
    error::RestFailure,
    protocol::{PasswordGrantRequest, SessionExchangeRequest},
};
use tracing::{info, warn};

use crate::{
    config::PostVars,
    navigation::{CLIENT_LIST, LOGIN},
    rest_info::describe_failure,
    PanelContext,
};

pub const LOGIN_REJECTED: &str =
    "<strong>Login failed:</strong> Username/Password combination was rejected. %INFO%";
pub const LOGIN_DISABLED: &str = "<strong>Login failed:</strong> REST-Interface is disabled! %INFO%";
pub const LOGIN_UNKNOWN: &str = "<strong>Login failed:</strong> An unknown error occured while trying to contact the REST-Interface. %INFO%";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub user_name: String,
    pub password: String,
}

pub struct LoginController {
    ctx: PanelContext,
    /// Session hints handed over by the hosting platform; emptied once used.
    pub post_vars: PostVars,
    pub form: LoginForm,
}

impl LoginController {
    pub fn new(ctx: PanelContext) -> Self {
        Self {
            post_vars: ctx.settings.post_vars.clone(),
            form: LoginForm::default(),
            ctx,
        }
    }

    /// Runs the automatic login when the session allows it. Returns whether
    /// an attempt was made.
    pub async fn init(&mut self) -> bool {
        if self.ctx.session.try_auto_login(&self.post_vars) {
            self.auto_login().await;
            true
        } else {
            false
        }
    }

    pub async fn auto_login(&mut self) -> bool {
        let request = SessionExchangeRequest {
            api_key: self.post_vars.api_key.clone(),
            user_id: self.post_vars.user_id.clone(),
            session_id: self.post_vars.session_id.clone(),
            rtoken: self.post_vars.rtoken.clone(),
        };

        match self.ctx.rest.exchange_session(&request).await {
            Ok(response) if response.is_success() => {
                let user = response.user.unwrap_or_default();
                let token = response.token.map(|token| token.access_token);
                match token.filter(|token| !token.is_empty()) {
                    Some(token) => {
                        info!(%user, "automatic login succeeded");
                        self.post_vars = PostVars::default();
                        self.ctx.session.login(user, token);
                        self.ctx.navigator.redirect(CLIENT_LIST);
                        true
                    }
                    None => {
                        warn!("automatic login answered without token");
                        self.abort()
                    }
                }
            }
            Ok(response) => {
                warn!(status = ?response.status, "automatic login refused");
                self.abort()
            }
            Err(failure) => {
                warn!(%failure, "automatic login failed");
                self.abort()
            }
        }
    }

    pub async fn manual_login(&mut self) -> bool {
        let request = PasswordGrantRequest::new(
            self.form.user_name.clone(),
            self.form.password.clone(),
            self.ctx.settings.api_key.clone(),
        );

        match self.ctx.rest.request_token(&request).await {
            Ok(response) if response.is_bearer() => {
                match response.access_token.filter(|token| !token.is_empty()) {
                    Some(token) => {
                        info!(user = %self.form.user_name, "login succeeded");
                        self.ctx.session.login(self.form.user_name.clone(), token);
                        self.ctx.navigator.redirect(CLIENT_LIST);
                        true
                    }
                    None => {
                        warn!("bearer grant answered without access token");
                        self.abort()
                    }
                }
            }
            Ok(response) => {
                warn!(token_type = ?response.token_type, "login answered with unexpected token type");
                self.abort()
            }
            Err(failure) => {
                warn!(%failure, "login request failed");
                if let Some(message) = login_failure_message(&failure) {
                    self.ctx.session.set_error(message);
                }
                self.abort()
            }
        }
    }

    fn abort(&mut self) -> bool {
        self.ctx.session.logout();
        self.ctx.navigator.redirect(LOGIN);
        false
    }
}

/// User-facing explanation for a failed token request; `None` for a 200 whose
/// body could not be used.
pub fn login_failure_message(failure: &RestFailure) -> Option<String> {
    let template = match failure.status {
        Some(401) => LOGIN_REJECTED,
        Some(405) => LOGIN_DISABLED,
        Some(200) => return None,
        _ => LOGIN_UNKNOWN,
    };
    Some(describe_failure(template, failure))
}

#[cfg(test)]
#[path = "../tests/login_tests.rs"]
mod tests;
