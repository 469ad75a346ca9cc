//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_credential_hasher;
mod in_memory_access_repository;
mod postgres_access_repository;
mod postgres_user_directory;

pub use argon2_credential_hasher::Argon2CredentialHasher;
pub use in_memory_access_repository::InMemoryAccessRepository;
pub use postgres_access_repository::PostgresAccessRepository;
pub use postgres_user_directory::PostgresUserDirectory;
