//! mvault-http - Authenticated HTTP gateway for the micro-vault admin API.
//!
//! Every admin call goes through a [`Gateway`]. The gateway runs each
//! request through a small middleware pipeline around a [`Transport`]:
//!
//! 1. [`ErrorReporter`] hands reportable failures to a notification sink,
//! 2. [`TokenRefresher`] turns a 401 into one token refresh and one replay,
//! 3. [`AuthHeaders`] injects the bearer token right before dispatch.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mvault_core::{BaseUrl, Credentials, Session};
//! use mvault_http::Gateway;
//!
//! # async fn example() -> Result<(), mvault_core::Error> {
//! let base = BaseUrl::new("https://vault.example.com/api/v1/")?;
//! let gateway = Gateway::new(Arc::new(Session::new(base)))?;
//! gateway.login(&Credentials::new("root", "yxcvb")).await?;
//!
//! for group in gateway.groups().list().await? {
//!     println!("{}", group.name);
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod config;
mod endpoints;
mod gateway;
pub mod middleware;
mod request;
mod resources;
mod response;
mod transport;

pub use config::GatewayConfig;
pub use gateway::{Gateway, GatewayBuilder};
pub use middleware::{AuthHeaders, ErrorReporter, Middleware, Next, TokenRefresher};
pub use request::{Request, RequestOptions};
pub use resources::{ClientsApi, GroupKeysApi, GroupsApi, PlaybookApi};
pub use response::Response;
pub use transport::{HttpTransport, Transport};

pub use reqwest::Method;
pub use reqwest::header;
