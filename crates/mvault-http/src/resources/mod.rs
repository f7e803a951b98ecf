//! Admin resource proxies.
//!
//! Each proxy maps one call onto a method and path under `{base}admin/` and
//! decodes the JSON answer; nothing is transformed on the way.

mod clients;
mod group_keys;
mod groups;
mod playbook;

pub use clients::ClientsApi;
pub use group_keys::GroupKeysApi;
pub use groups::GroupsApi;
pub use playbook::PlaybookApi;
