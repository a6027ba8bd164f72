//! Typed consumer of the category admin API.

pub mod admin_client;
pub mod error;
pub mod model;

pub use admin_client::AdminClient;
pub use error::{ClientError, ClientResult};
pub use model::Category;
