pub mod product;
pub mod questions;
pub mod quiz;
