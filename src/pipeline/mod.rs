pub mod extraction;
pub mod indexing;
