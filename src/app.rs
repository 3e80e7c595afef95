//! The application: settings, the store it owns, and the router over it.
//!
//! `App` replaces process-wide singletons. The entry point builds one,
//! optionally listens, and closes it; tests build one over a
//! [`MemoryStore`](crate::store::MemoryStore) and drive its router directly.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::error::Error;
use crate::router::Router;
use crate::routes::{self, Mount};
use crate::server::Server;
use crate::store::{MongoStore, SharedStore};

pub struct App {
    settings: Settings,
    store: SharedStore,
    mounts: Vec<Mount>,
}

impl App {
    /// Connects to MongoDB using `settings`.
    pub async fn connect(settings: Settings) -> Result<Self, Error> {
        let store = MongoStore::connect(&settings.db_url, settings.database_name()).await?;
        Ok(Self::with_store(settings, Arc::new(store)))
    }

    /// Uses an already constructed store.
    pub fn with_store(settings: Settings, store: SharedStore) -> Self {
        Self { settings, store, mounts: Mount::defaults() }
    }

    /// Replaces the default mounts.
    pub fn mounts(mut self, mounts: Vec<Mount>) -> Self {
        self.mounts = mounts;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn router(&self) -> Router<SharedStore> {
        routes::router(Arc::clone(&self.store), &self.mounts)
    }

    /// Listens on the configured address until SIGTERM or Ctrl-C, then closes.
    /// The store is closed even when binding fails.
    pub async fn listen(self) -> Result<(), Error> {
        let result = match self.bind().await {
            Ok(server) => server.serve(self.router()).await,
            Err(e) => Err(e),
        };
        self.close().await?;
        result
    }

    async fn bind(&self) -> Result<Server, Error> {
        Server::bind(self.settings.socket_addr()?).await
    }

    /// Like [`listen`](Self::listen) on an already bound server, stopping
    /// when `signal` resolves.
    pub async fn listen_on<F>(self, server: Server, signal: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let result = server.serve_with_shutdown(self.router(), signal).await;
        self.close().await?;
        result
    }

    /// Shutdown hook: releases the store.
    pub async fn close(self) -> Result<(), Error> {
        info!("server closed!");
        self.store.close().await
    }
}
