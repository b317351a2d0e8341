//! Todo store database schema.

use sqlx::migrate::Migrator;

/// Embedded migrations from the workspace `migrations/` directory.
///
/// Creates the `todos` table with a 140-character `todo` column.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
