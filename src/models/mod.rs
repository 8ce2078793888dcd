mod product;

pub use product::{CreateProduct, Product, ProductQuery, SortKey, UpdateProduct};
