pub mod app_error;
pub mod folders;
pub mod health;
pub mod server;
pub mod state;
pub mod upload;
