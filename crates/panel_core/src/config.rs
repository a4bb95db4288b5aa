use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

/// Values handed over by the hosting platform when the panel is opened from
/// its configuration dialog. They allow a login without a password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostVars {
    pub api_key: String,
    pub user_id: String,
    pub session_id: String,
    pub rtoken: String,
    pub rest_endpoint: String,
}

impl PostVars {
    pub fn has_session_hints(&self) -> bool {
        !self.user_id.is_empty() && !self.session_id.is_empty() && !self.rtoken.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Base URL of the REST interface.
    pub rest_endpoint: String,
    /// API key the panel itself authenticates with.
    pub api_key: String,
    /// Public root the panel is served from; display URLs resolve against it.
    pub base_url: String,
    pub install_dir: String,
    pub post_vars: PostVars,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            rest_endpoint: "http://127.0.0.1:8080".into(),
            api_key: "admin-panel".into(),
            base_url: "http://127.0.0.1:8080/".into(),
            install_dir: "admin/".into(),
            post_vars: PostVars {
                rest_endpoint: "v1".into(),
                ..PostVars::default()
            },
        }
    }
}

pub fn load_settings() -> PanelSettings {
    load_settings_from(Path::new("panel.toml"), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `key = "value"` file, then environment overrides.
/// Unreadable files are skipped.
pub fn load_settings_from<F>(path: &Path, env: F) -> PanelSettings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = PanelSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_overrides(&mut settings, &file_cfg);
        }
    }

    if let Some(v) = env("PANEL_REST_ENDPOINT") {
        settings.rest_endpoint = v;
    }
    if let Some(v) = env("APP__REST_ENDPOINT") {
        settings.rest_endpoint = v;
    }

    if let Some(v) = env("PANEL_API_KEY") {
        settings.api_key = v;
    }
    if let Some(v) = env("APP__API_KEY") {
        settings.api_key = v;
    }

    if let Some(v) = env("PANEL_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("PANEL_INSTALL_DIR") {
        settings.install_dir = v;
    }

    if let Some(v) = env("PANEL_POST_API_KEY") {
        settings.post_vars.api_key = v;
    }
    if let Some(v) = env("PANEL_POST_USER_ID") {
        settings.post_vars.user_id = v;
    }
    if let Some(v) = env("PANEL_POST_SESSION_ID") {
        settings.post_vars.session_id = v;
    }
    if let Some(v) = env("PANEL_POST_RTOKEN") {
        settings.post_vars.rtoken = v;
    }
    if let Some(v) = env("PANEL_POST_REST_ENDPOINT") {
        settings.post_vars.rest_endpoint = v;
    }

    settings
}

fn apply_file_overrides(settings: &mut PanelSettings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("rest_endpoint") {
        settings.rest_endpoint = v.clone();
    }
    if let Some(v) = file_cfg.get("api_key") {
        settings.api_key = v.clone();
    }
    if let Some(v) = file_cfg.get("base_url") {
        settings.base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("install_dir") {
        settings.install_dir = v.clone();
    }
    if let Some(v) = file_cfg.get("post_rest_endpoint") {
        settings.post_vars.rest_endpoint = v.clone();
    }
}

impl PanelSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.rest_endpoint)
            .with_context(|| format!("invalid rest_endpoint '{}'", self.rest_endpoint))?;
        Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url '{}'", self.base_url))?;
        Ok(())
    }

    /// Resolves `relative` against the server root of `base_url`.
    pub fn absolute_url(&self, relative: &str) -> String {
        let root = Url::parse(&self.base_url).and_then(|base| base.join("/"));
        match root.and_then(|root| root.join(relative.trim_start_matches('/'))) {
            Ok(url) => url.to_string(),
            Err(_) => format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                relative.trim_start_matches('/')
            ),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
