pub mod app;
pub mod auth;
pub mod completion;
pub mod error;
pub mod handlers;
pub mod models;
pub mod stream;
pub mod upstream;
