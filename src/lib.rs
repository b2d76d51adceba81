pub mod api;
pub mod client;
pub mod config;
pub mod data;
pub mod db;
pub mod detail;
pub mod error;
pub mod form;
pub mod menu;
pub mod nav;
pub mod service;

pub use error::Error;
