pub mod category;
pub mod errors;
pub mod order;
pub mod pagination;
pub mod ports;
pub mod product;
