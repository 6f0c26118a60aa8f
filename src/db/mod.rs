// Re-export the Database struct and other public items
pub mod cluster;
pub mod core;
pub mod records;
mod schema;

// Re-export Database and essential traits
pub use self::core::Database;
pub use sqlx::Row;
