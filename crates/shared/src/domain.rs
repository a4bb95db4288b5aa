use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Text(String),
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub struct $name(pub i64);

        // Ids may arrive quoted.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match IdRepr::deserialize(deserializer)? {
                    IdRepr::Int(value) => Ok(Self(value)),
                    IdRepr::Text(value) => value
                        .trim()
                        .parse()
                        .map(Self)
                        .map_err(|_| serde::de::Error::custom(format!("invalid id '{value}'"))),
                }
            }
        }
    };
}

id_newtype!(ClientId);

impl ClientId {
    /// Marks a draft that has not been created on the backend yet.
    pub const UNSAVED: ClientId = ClientId(-1);

    pub fn is_unsaved(self) -> bool {
        self == Self::UNSAVED
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::UNSAVED
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (route, verb) pair granted to an API client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    #[serde(alias = "pattern")]
    pub route: String,
    pub verb: String,
}

impl Permission {
    pub fn new(route: impl Into<String>, verb: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            verb: verb.into(),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.verb, self.route)
    }
}

/// Route catalog entry as published by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(alias = "pattern")]
    pub route: String,
    pub verb: String,
}

impl Route {
    pub fn to_permission(&self) -> Permission {
        Permission::new(self.route.clone(), self.verb.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: ClientId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub api_key: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub api_secret: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub oauth2_redirection_uri: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub oauth2_consent_message: String,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub oauth2_gt_client_active: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub oauth2_gt_client_user: String,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub oauth2_gt_authcode_active: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub oauth2_gt_implicit_active: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub oauth2_gt_resourceowner_active: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub oauth2_user_restriction_active: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub oauth2_consent_message_active: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub oauth2_authcode_refresh_active: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub oauth2_resource_refresh_active: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub access_user_csv: String,
    #[serde(default, deserialize_with = "lenient_permissions")]
    pub permissions: Option<Vec<Permission>>,
}

impl Client {
    /// A blank local draft, not yet known to the backend.
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn is_unsaved(&self) -> bool {
        self.id.is_unsaved()
    }

    pub fn permissions(&self) -> &[Permission] {
        self.permissions.as_deref().unwrap_or_default()
    }

    pub fn push_permission(&mut self, permission: Permission) {
        self.permissions.get_or_insert_with(Vec::new).push(permission);
    }

    pub fn remove_permission(&mut self, index: usize) -> Option<Permission> {
        let permissions = self.permissions.as_mut()?;
        if index < permissions.len() {
            Some(permissions.remove(index))
        } else {
            None
        }
    }

    pub fn access_users(&self) -> impl Iterator<Item = &str> {
        self.access_user_csv
            .split(',')
            .map(str::trim)
            .filter(|user| !user.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
    Text(String),
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<FlagRepr>::deserialize(deserializer)?;
    Ok(match repr {
        None => false,
        Some(FlagRepr::Bool(value)) => value,
        Some(FlagRepr::Int(value)) => value != 0,
        Some(FlagRepr::Text(value)) => {
            let value = value.trim();
            value == "1" || value.eq_ignore_ascii_case("true")
        }
    })
}

/// Text columns may come back as `null` or as bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextRepr {
    Text(String),
    Int(i64),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<TextRepr>::deserialize(deserializer)?;
    Ok(match repr {
        None => String::new(),
        Some(TextRepr::Text(value)) => value,
        Some(TextRepr::Int(value)) => value.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PermissionsRepr {
    List(Vec<Permission>),
    Json(String),
}

// Some backends hand the permission list back in the same JSON-string form
// it was submitted in.
fn lenient_permissions<'de, D>(deserializer: D) -> Result<Option<Vec<Permission>>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<PermissionsRepr>::deserialize(deserializer)?;
    match repr {
        None => Ok(None),
        Some(PermissionsRepr::List(list)) => Ok(Some(list)),
        Some(PermissionsRepr::Json(raw)) if raw.trim().is_empty() => Ok(None),
        Some(PermissionsRepr::Json(raw)) => serde_json::from_str::<Option<Vec<Permission>>>(&raw)
            .map_err(serde::de::Error::custom),
    }
}
