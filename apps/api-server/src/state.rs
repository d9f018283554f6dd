//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{PasswordService, PostRepository, RoleRepository, UserRepository};
use blog_core::resource::{ResourceAssembler, RouteRegistry};
use blog_core::services::{PostService, RoleService, UserService};
use blog_infra::database::{DatabaseConfig, DatabaseConnections, InMemoryStore};
use blog_infra::Argon2PasswordService;

#[cfg(feature = "postgres")]
use blog_infra::database::{
    PostgresPostRepository, PostgresRoleRepository, PostgresUserRepository,
};

/// The three store ports, however they are backed.
struct Stores {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    posts: Arc<dyn PostRepository>,
}

impl Stores {
    fn in_memory() -> Self {
        Self::memory(Arc::new(InMemoryStore::with_default_roles()))
    }

    fn memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            roles: store.clone(),
            posts: store,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &DatabaseConnections) -> Self {
        let db = connections.main.clone();
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            roles: Arc::new(PostgresRoleRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db)),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub roles: Arc<RoleService>,
    pub posts: Arc<PostService>,
    pub assembler: Arc<ResourceAssembler>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, public_base_url: &str) -> Self {
        #[cfg(feature = "postgres")]
        let (db, stores) = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let stores = Stores::postgres(&connections);
                    (Some(Arc::new(connections)), stores)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, Stores::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Stores::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, stores) = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored - built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory store");
            (None, Stores::in_memory())
        };

        tracing::info!("Application state initialized");
        Self::from_stores(stores, db, public_base_url)
    }

    /// State over a caller-held in-memory store.
    #[cfg(test)]
    pub fn with_memory_store(store: Arc<InMemoryStore>, public_base_url: &str) -> Self {
        Self::from_stores(Stores::memory(store), None, public_base_url)
    }

    fn from_stores(
        stores: Stores,
        db: Option<Arc<DatabaseConnections>>,
        public_base_url: &str,
    ) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            users: Arc::new(UserService::new(
                stores.users.clone(),
                stores.roles.clone(),
                passwords,
            )),
            roles: Arc::new(RoleService::new(stores.roles.clone())),
            posts: Arc::new(PostService::new(stores.posts, stores.users, stores.roles)),
            assembler: Arc::new(ResourceAssembler::new(RouteRegistry::blog(public_base_url))),
            db,
        }
    }
}
