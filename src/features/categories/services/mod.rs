pub mod category_service;

pub use category_service::{CategoryLookup, CategoryService};
