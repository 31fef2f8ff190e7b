pub mod extraction;
pub mod staging;
