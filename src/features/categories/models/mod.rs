pub mod category;

pub use category::{
    Category, CategoryId, CategoryLineage, CategoryUpdate, InvalidCategoryId, NewCategory,
};
