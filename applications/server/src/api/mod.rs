/// API route modules
pub mod albums;
pub mod health;
