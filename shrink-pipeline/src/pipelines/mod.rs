pub mod region_digest;
pub mod risky_products;
