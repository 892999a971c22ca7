use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use embed_connect_core::{Chain, PortError, StoragePort};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStorageAdapter {
    inner: Arc<Mutex<HashMap<Chain, String>>>,
}

impl InMemoryStorageAdapter {
    pub fn account_for_chain(&self, chain: &Chain) -> Result<Option<String>, PortError> {
        let g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("storage lock poisoned: {e}")))?;
        Ok(g.get(chain).cloned())
    }
}

impl StoragePort for InMemoryStorageAdapter {
    fn store_account(&self, account: &str, chain: &Chain) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("storage lock poisoned: {e}")))?;
        g.insert(chain.clone(), account.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("storage lock poisoned: {e}")))?;
        g.clear();
        Ok(())
    }
}

/// Accounts kept in `localStorage`, one key per chain.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct BrowserStorageAdapter {
    config: crate::EmbedAdapterConfig,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStorageAdapter {
    pub fn new(config: crate::EmbedAdapterConfig) -> Self {
        Self { config }
    }

    fn local_storage() -> Result<web_sys::Storage, PortError> {
        web_sys::window()
            .ok_or_else(|| PortError::Transport("missing window".to_owned()))?
            .local_storage()
            .map_err(|e| PortError::Transport(format!("localStorage access failed: {e:?}")))?
            .ok_or_else(|| PortError::NotFound("localStorage unavailable".to_owned()))
    }

    pub fn account_for_chain(&self, chain: &Chain) -> Result<Option<String>, PortError> {
        Self::local_storage()?
            .get_item(&self.config.storage_key(chain.as_str()))
            .map_err(|e| PortError::Transport(format!("localStorage read failed: {e:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for BrowserStorageAdapter {
    fn default() -> Self {
        Self::new(crate::EmbedAdapterConfig::from_env())
    }
}

#[cfg(target_arch = "wasm32")]
impl StoragePort for BrowserStorageAdapter {
    fn store_account(&self, account: &str, chain: &Chain) -> Result<(), PortError> {
        Self::local_storage()?
            .set_item(&self.config.storage_key(chain.as_str()), account)
            .map_err(|e| PortError::Transport(format!("localStorage write failed: {e:?}")))
    }

    fn clear(&self) -> Result<(), PortError> {
        let storage = Self::local_storage()?;
        let len = storage
            .length()
            .map_err(|e| PortError::Transport(format!("localStorage length failed: {e:?}")))?;
        let prefix = format!("{}:", self.config.storage_key_prefix);
        let mut owned = Vec::new();
        for i in 0..len {
            if let Ok(Some(key)) = storage.key(i) {
                if key.starts_with(&prefix) {
                    owned.push(key);
                }
            }
        }
        for key in owned {
            storage
                .remove_item(&key)
                .map_err(|e| PortError::Transport(format!("localStorage remove failed: {e:?}")))?;
        }
        Ok(())
    }
}
