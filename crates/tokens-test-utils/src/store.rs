//! In-memory backend fixture
//!
//! One [`MemoryStore`] acts as the system of record behind a
//! [`MemoryProvider`] and a [`MemoryWriter`], so a synchronization run's
//! writes are visible to the next run — which is what the idempotence
//! scenarios need.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokens_model::{Brand, Token, TokenGroup, TokenTheme};
use tokens_sync::{
    DataProvider, Error, EventSink, Result, SyncEvent, TokenWritePayload, TokenWriter, WriteResult,
};

/// Shared backend state.
#[derive(Default)]
pub struct MemoryStore {
    brands: Vec<Brand>,
    tokens: Mutex<HashMap<String, Vec<Token>>>,
    groups: Mutex<HashMap<String, Vec<TokenGroup>>>,
    themes: Mutex<HashMap<String, Vec<TokenTheme>>>,
    fail_fetch: Mutex<Option<String>>,
    write_calls: Mutex<usize>,
    theme_write_calls: Mutex<usize>,
}

impl MemoryStore {
    /// Fresh store holding the given brands and nothing else.
    pub fn new(brands: Vec<Brand>) -> Arc<Self> {
        Arc::new(Self {
            brands,
            ..Self::default()
        })
    }

    /// Provider half of the store.
    pub fn provider(self: &Arc<Self>) -> Arc<MemoryProvider> {
        Arc::new(MemoryProvider {
            store: Arc::clone(self),
        })
    }

    /// Writer half of the store.
    pub fn writer(self: &Arc<Self>) -> Arc<MemoryWriter> {
        Arc::new(MemoryWriter {
            store: Arc::clone(self),
        })
    }

    /// Seed remote tokens for a brand.
    pub fn seed_tokens(&self, brand_id: &str, tokens: Vec<Token>) {
        self.tokens
            .lock()
            .unwrap()
            .insert(brand_id.to_string(), tokens);
    }

    /// Seed remote groups for a brand.
    pub fn seed_groups(&self, brand_id: &str, groups: Vec<TokenGroup>) {
        self.groups
            .lock()
            .unwrap()
            .insert(brand_id.to_string(), groups);
    }

    /// Seed a remote theme.
    pub fn seed_theme(&self, theme: TokenTheme) {
        self.themes
            .lock()
            .unwrap()
            .entry(theme.brand_id.clone())
            .or_default()
            .push(theme);
    }

    /// Make every subsequent fetch fail with a `Response` error.
    pub fn fail_fetches_with(&self, message: &str) {
        *self.fail_fetch.lock().unwrap() = Some(message.to_string());
    }

    /// Snapshot of a brand's tokens.
    pub fn tokens(&self, brand_id: &str) -> Vec<Token> {
        self.tokens
            .lock()
            .unwrap()
            .get(brand_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of a brand's groups.
    pub fn groups(&self, brand_id: &str) -> Vec<TokenGroup> {
        self.groups
            .lock()
            .unwrap()
            .get(brand_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of a brand's themes.
    pub fn themes(&self, brand_id: &str) -> Vec<TokenTheme> {
        self.themes
            .lock()
            .unwrap()
            .get(brand_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `write_tokens` calls observed.
    pub fn write_calls(&self) -> usize {
        *self.write_calls.lock().unwrap()
    }

    /// Number of `write_theme` calls observed.
    pub fn theme_write_calls(&self) -> usize {
        *self.theme_write_calls.lock().unwrap()
    }

    fn check_fail(&self) -> Result<()> {
        match self.fail_fetch.lock().unwrap().as_ref() {
            Some(message) => Err(Error::response(message.clone())),
            None => Ok(()),
        }
    }
}

/// Read half over a [`MemoryStore`].
pub struct MemoryProvider {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl DataProvider for MemoryProvider {
    async fn fetch_brands(&self, _design_system_id: &str) -> Result<Vec<Brand>> {
        self.store.check_fail()?;
        Ok(self.store.brands.clone())
    }

    async fn fetch_tokens(&self, brand_id: &str) -> Result<Vec<Token>> {
        self.store.check_fail()?;
        Ok(self.store.tokens(brand_id))
    }

    async fn fetch_token_groups(&self, brand_id: &str) -> Result<Vec<TokenGroup>> {
        self.store.check_fail()?;
        Ok(self.store.groups(brand_id))
    }

    async fn fetch_themes(&self, brand_id: &str) -> Result<Vec<TokenTheme>> {
        self.store.check_fail()?;
        Ok(self.store.themes(brand_id))
    }
}

/// Write half over a [`MemoryStore`]. Applies payloads the way a real
/// backend would: upsert by identity, then delete.
pub struct MemoryWriter {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl TokenWriter for MemoryWriter {
    async fn write_tokens(
        &self,
        brand_id: &str,
        payload: &TokenWritePayload,
    ) -> Result<WriteResult> {
        *self.store.write_calls.lock().unwrap() += 1;

        {
            let mut tokens = self.store.tokens.lock().unwrap();
            let pool = tokens.entry(brand_id.to_string()).or_default();
            for incoming in &payload.tokens {
                match pool.iter_mut().find(|token| token.id == incoming.id) {
                    Some(slot) => *slot = incoming.clone(),
                    None => pool.push(incoming.clone()),
                }
            }
            pool.retain(|token| !payload.tokens_to_delete.iter().any(|d| d.id == token.id));
        }
        {
            let mut groups = self.store.groups.lock().unwrap();
            let pool = groups.entry(brand_id.to_string()).or_default();
            for incoming in &payload.groups {
                match pool.iter_mut().find(|group| group.id == incoming.id) {
                    Some(slot) => *slot = incoming.clone(),
                    None => pool.push(incoming.clone()),
                }
            }
            pool.retain(|group| !payload.groups_to_delete.iter().any(|d| d.id == group.id));
        }

        Ok(WriteResult {
            tokens_written: payload.tokens.len(),
            groups_written: payload.groups.len(),
            tokens_deleted: payload.tokens_to_delete.len(),
            groups_deleted: payload.groups_to_delete.len(),
        })
    }

    async fn write_theme(&self, theme: &TokenTheme) -> Result<WriteResult> {
        *self.store.theme_write_calls.lock().unwrap() += 1;
        let mut themes = self.store.themes.lock().unwrap();
        let pool = themes.entry(theme.brand_id.clone()).or_default();
        match pool.iter_mut().find(|existing| existing.id == theme.id) {
            Some(slot) => *slot = theme.clone(),
            None => pool.push(theme.clone()),
        }
        Ok(WriteResult {
            tokens_written: theme.overridden_tokens.len(),
            ..WriteResult::default()
        })
    }
}

/// Event sink collecting everything it sees.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of collected events.
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: &SyncEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
