pub mod repositories;
pub mod security;

pub use repositories::SqliteUserRepository;
