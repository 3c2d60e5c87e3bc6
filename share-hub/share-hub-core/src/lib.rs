pub mod accounts;
pub mod auth;
pub mod documents;
pub mod error;
pub mod guard;
pub mod model;
pub mod profiles;
pub mod search;
pub mod shares;
pub mod store;

pub use error::{Error, Result, StoreError};
