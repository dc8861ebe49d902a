#![forbid(unsafe_code)]

mod cache;

pub const CRATE_NAME: &str = "wahlatlas-store";

pub use cache::{ResultCache, StoreError, StoreErrorCode};
