//! Validated types and admin resource models.

mod base_url;
mod models;

pub use base_url::BaseUrl;
pub use models::{Client, Group, GroupKey, NewClient};
