// Public modules
pub mod config;
pub mod discover;
pub mod error;
pub mod migrate;
pub mod report;
pub mod rewrite;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use migrate::{MigrateOptions, Phase};
pub use report::RunReport;
pub use rewrite::{ChangeEntry, Registry, RewriteRule};
