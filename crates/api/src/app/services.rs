use std::sync::Arc;

use sqlx::PgPool;

use clientdesk_infra::{ClientRepository, ClientStore, InMemoryClientStore, PostgresClientStore};

/// Service wiring shared by all request handlers.
///
/// The storage handle is created once here and injected into the repository;
/// handlers never touch the connection themselves.
pub struct AppServices {
    repo: ClientRepository<Arc<dyn ClientStore>>,
}

impl AppServices {
    pub fn repo(&self) -> &ClientRepository<Arc<dyn ClientStore>> {
        &self.repo
    }
}

/// Pick the storage backend from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (`DATABASE_URL` required);
/// anything else selects the in-memory store (dev/test).
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let store: Arc<dyn ClientStore> = if use_persistent {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to Postgres");
        tracing::info!("using Postgres client store");
        Arc::new(PostgresClientStore::new(pool))
    } else {
        tracing::info!("using in-memory client store");
        Arc::new(InMemoryClientStore::new())
    };

    AppServices {
        repo: ClientRepository::new(store),
    }
}
