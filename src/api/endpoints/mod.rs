pub mod extract;
pub mod index;
pub mod root;
pub mod search;
