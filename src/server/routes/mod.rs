pub mod blog;
pub mod deals;
pub mod hubdb;
pub mod pages;
