use std::sync::{PoisonError, RwLock};

use tracing::debug;

pub const LOGIN: &str = "/login";
pub const CLIENT_LIST: &str = "/clientlist";
pub const CLIENT_EDIT: &str = "/clientlist/clientedit";
pub const OFFLINE: &str = "/offline";

pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn redirect(&self, path: &str);
    /// Hard reload of the whole panel.
    fn reload(&self);
}

#[derive(Debug, Default)]
struct History {
    visited: Vec<String>,
    reloads: usize,
}

/// Path-based navigator that remembers where it has been.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: RwLock<History>,
}

impl HistoryNavigator {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            history: RwLock::new(History {
                visited: vec![start.into()],
                reloads: 0,
            }),
        }
    }

    pub fn visited(&self) -> Vec<String> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .visited
            .clone()
    }

    pub fn reloads(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .reloads
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> String {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .visited
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn redirect(&self, path: &str) {
        debug!(path, "navigate");
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .visited
            .push(path.to_string());
    }

    fn reload(&self) {
        debug!("reload panel");
        let mut guard = self.history.write().unwrap_or_else(PoisonError::into_inner);
        guard.reloads += 1;
        guard.visited.push("/".to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumbs {
    crumbs: Vec<Breadcrumb>,
}

impl Breadcrumbs {
    /// One crumb per path segment, each linking to the path prefix that ends
    /// with it.
    pub fn from_path(path: &str) -> Self {
        let mut prefix = String::new();
        let crumbs = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                prefix.push('/');
                prefix.push_str(segment);
                Breadcrumb {
                    label: segment.to_string(),
                    path: prefix.clone(),
                }
            })
            .collect();
        Self { crumbs }
    }

    pub fn crumbs(&self) -> &[Breadcrumb] {
        &self.crumbs
    }

    pub fn labels(&self) -> Vec<&str> {
        self.crumbs.iter().map(|crumb| crumb.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumbs_follow_path_segments() {
        let crumbs = Breadcrumbs::from_path("/clientlist/clientedit?x=1");
        assert_eq!(crumbs.labels(), vec!["clientlist", "clientedit"]);
        assert_eq!(crumbs.crumbs()[1].path, "/clientlist/clientedit");
        assert!(Breadcrumbs::from_path("/").crumbs().is_empty());
    }

    #[test]
    fn navigator_tracks_redirects_and_reloads() {
        let navigator = HistoryNavigator::new(LOGIN);
        navigator.redirect(CLIENT_LIST);
        assert_eq!(navigator.current_path(), CLIENT_LIST);

        navigator.reload();
        assert_eq!(navigator.reloads(), 1);
        assert_eq!(navigator.current_path(), "/");
        assert_eq!(navigator.visited(), vec![LOGIN, CLIENT_LIST, "/"]);
    }
}
