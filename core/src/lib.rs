pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use error::{Result, StoreError};
