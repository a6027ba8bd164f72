//! Category tree administration.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Success | Description |
//! |--------|----------|---------|-------------|
//! | GET | `/admin/category` | 200 | All categories, parent as id |
//! | GET | `/admin/category/{id}` | 200 / 204 | One category, parent chain nested |
//! | POST | `/admin/category` | 201 | Create, `Location` header set |
//! | PUT | `/admin/category/{id}` | 200 | Replace mutable fields |
//! | DELETE | `/admin/category/{id}` | 204 | Delete, idempotent |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::{CategoryLookup, CategoryService};
pub use store::{CategoryStore, InMemoryCategoryStore, PgCategoryStore};
