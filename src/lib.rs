pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod faq;
pub mod server;
pub mod translator;
