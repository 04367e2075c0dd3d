//! goshawk-migrate - Shared product repository and migration engine
//!
//! Moves derived products from project workspaces into the canonical shared
//! repository and replaces the local copies with symlinks, so unrelated
//! projects landing on the same track reuse one physical copy.

pub mod cleanup;
pub mod migration;
pub mod repository;
pub mod workspace;

pub use migration::{MigrationEngine, MigrationOutcome, MigrationStats};
pub use repository::ProductRepository;
