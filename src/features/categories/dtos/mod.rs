pub mod category_dto;

pub use category_dto::{CategoryDetailDto, CategoryListItemDto, CategoryRequestDto, ParentRefDto};
