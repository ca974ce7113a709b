pub mod models;
pub mod repo;

pub use models::User;
