pub mod openapi;
pub mod products;
