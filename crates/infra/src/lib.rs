//! Infrastructure layer: storage backends and the client repository.

pub mod repository;
pub mod store;

pub use repository::ClientRepository;
pub use store::{
    ClientFilter, ClientStore, InMemoryClientStore, PostgresClientStore, StoreError, StoreResult,
};
