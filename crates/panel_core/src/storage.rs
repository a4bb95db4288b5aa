use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::domain::Client;

struct Entry {
    client: Client,
    /// Local key of an unsaved draft; persisted clients are known by id.
    draft: Option<u64>,
}

#[derive(Default)]
struct StorageState {
    entries: Vec<Entry>,
    current: Option<Client>,
    /// Draft entry the editor is working on; a successful create lands there.
    editing: Option<u64>,
    next_draft: u64,
}

impl StorageState {
    /// Position of an unsaved entry equal to `client`, preferring the draft
    /// being edited. Equal blank drafts are interchangeable.
    fn draft_position(&self, client: &Client) -> Option<usize> {
        let matches = |entry: &Entry| entry.draft.is_some() && entry.client == *client;
        self.entries
            .iter()
            .position(|entry| matches(entry) && entry.draft == self.editing)
            .or_else(|| self.entries.iter().position(matches))
    }

    fn editing_position(&self) -> Option<usize> {
        let key = self.editing?;
        self.entries.iter().position(|entry| entry.draft == Some(key))
    }
}

/// In-memory cache of the client list and the draft currently open in the
/// editor. Controllers only ever see copies.
#[derive(Default)]
pub struct ClientStorage {
    state: RwLock<StorageState>,
}

impl ClientStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StorageState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StorageState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn default_client(&self) -> Client {
        Client::draft()
    }

    pub fn clients(&self) -> Vec<Client> {
        self.read()
            .entries
            .iter()
            .map(|entry| entry.client.clone())
            .collect()
    }

    pub fn set_clients(&self, clients: Vec<Client>) {
        let mut state = self.write();
        state.editing = None;
        state.entries = clients
            .into_iter()
            .map(|client| Entry {
                client,
                draft: None,
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Adds a client to the list. An unsaved draft is appended and becomes
    /// the one being edited. A persisted client replaces the entry with the
    /// same id, or else the draft being edited, or else is appended.
    pub fn add_client(&self, client: Client) {
        let mut state = self.write();

        if client.is_unsaved() {
            let key = state.next_draft;
            state.next_draft += 1;
            state.editing = Some(key);
            state.entries.push(Entry {
                client,
                draft: Some(key),
            });
            return;
        }

        let slot = state
            .entries
            .iter()
            .position(|entry| entry.draft.is_none() && entry.client.id == client.id)
            .or_else(|| state.editing_position());
        match slot {
            Some(index) => {
                if state.entries[index].draft.is_some() {
                    state.editing = None;
                }
                state.entries[index] = Entry {
                    client,
                    draft: None,
                };
            }
            None => state.entries.push(Entry {
                client,
                draft: None,
            }),
        }
    }

    /// Replaces the entry with the same id; unknown ids are ignored.
    pub fn update_client(&self, client: Client) -> bool {
        if client.is_unsaved() {
            return false;
        }
        let mut state = self.write();
        match state
            .entries
            .iter_mut()
            .find(|entry| entry.draft.is_none() && entry.client.id == client.id)
        {
            Some(entry) => {
                entry.client = client;
                true
            }
            None => false,
        }
    }

    /// Removes the entry `client` refers to: the same id for persisted
    /// clients, an equal draft otherwise. A client no longer in the list
    /// removes nothing.
    pub fn remove_client(&self, client: &Client) -> Option<Client> {
        let mut state = self.write();
        let index = if client.is_unsaved() {
            state.draft_position(client)
        } else {
            state
                .entries
                .iter()
                .position(|entry| entry.draft.is_none() && entry.client.id == client.id)
        }?;

        let entry = state.entries.remove(index);
        if entry.draft.is_some() && entry.draft == state.editing {
            state.editing = None;
        }
        Some(entry.client)
    }

    pub fn current(&self) -> Option<Client> {
        self.read().current.clone()
    }

    /// Marks `client` as open in the editor. An unsaved client that matches a
    /// listed draft makes that draft the one a create will replace.
    pub fn set_current(&self, client: Client) {
        let mut state = self.write();
        if client.is_unsaved() {
            if let Some(index) = state.draft_position(&client) {
                state.editing = state.entries[index].draft;
            }
        } else {
            state.editing = None;
        }
        state.current = Some(client);
    }

    pub fn clear_current(&self) {
        let mut state = self.write();
        state.current = None;
        state.editing = None;
    }
}

#[cfg(test)]
#[path = "tests/storage_tests.rs"]
mod tests;
