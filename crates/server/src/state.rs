//! Shared server state.

use racksearch_core::{AdminGate, Config, ConfigStore, RackResult};
use racksearch_http::SheetClient;
use racksearch_sheet::Table;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// How long a fetched sheet is served before it is fetched again.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// A fetched sheet and when it was fetched.
struct Cached {
    loaded: Instant,
    table: Arc<Table>,
}

/// State shared by all handlers.
///
/// The fetched sheet is cached for `ttl` and dropped early when the
/// configuration changes or a refresh is requested. Only one fetch runs at
/// a time; the cache lock itself is never held across a fetch.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    store: ConfigStore,
    client: SheetClient,
    gate: AdminGate,
    ttl: Duration,
    table: RwLock<Option<Cached>>,
    fetch: Mutex<()>,
}

impl AppState {
    pub fn new(store: ConfigStore, client: SheetClient, gate: AdminGate) -> Self {
        Self::with_ttl(store, client, gate, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(
        store: ConfigStore,
        client: SheetClient,
        gate: AdminGate,
        ttl: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                client,
                gate,
                ttl,
                table: RwLock::new(None),
                fetch: Mutex::new(()),
            }),
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.inner.store
    }

    pub fn gate(&self) -> &AdminGate {
        &self.inner.gate
    }

    /// Put a table in the cache directly.
    #[cfg(test)]
    pub async fn set_table(&self, table: Table) {
        *self.inner.table.write().await = Some(Cached {
            loaded: Instant::now(),
            table: Arc::new(table),
        });
    }

    async fn fresh_table(&self) -> Option<Arc<Table>> {
        self.inner
            .table
            .read()
            .await
            .as_ref()
            .filter(|cached| cached.loaded.elapsed() < self.inner.ttl)
            .map(|cached| Arc::clone(&cached.table))
    }

    /// The cached table, fetching it for `config` when missing or expired.
    pub async fn table(&self, config: &Config) -> RackResult<Arc<Table>> {
        if let Some(table) = self.fresh_table().await {
            return Ok(table);
        }

        let _fetching = self.inner.fetch.lock().await;
        // Another request may have loaded it while we waited
        if let Some(table) = self.fresh_table().await {
            return Ok(table);
        }

        let table = Arc::new(self.inner.client.fetch_table(config).await?);
        *self.inner.table.write().await = Some(Cached {
            loaded: Instant::now(),
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    /// Drop the cached table, waiting for any fetch in flight.
    pub async fn clear_table(&self) {
        let _fetching = self.inner.fetch.lock().await;
        self.inner.table.write().await.take();
        tracing::debug!("sheet cache cleared");
    }

    pub async fn has_table(&self) -> bool {
        self.inner.table.read().await.is_some()
    }
}
