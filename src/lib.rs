pub mod config;
pub mod dispatch;
pub mod error;
pub mod mapper;
pub mod request;
pub mod schema;
pub mod server;
pub mod service;
pub mod validate;
