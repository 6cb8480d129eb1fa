//! Sea-ORM entities for the catalog tables

pub mod brand;
pub mod category;
pub mod category_product;
pub mod product;
