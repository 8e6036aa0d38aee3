pub mod common;
pub mod competition;
pub mod product;
pub mod validation;
