pub mod audio;
pub mod catalog;
pub mod inference;
pub mod observability;
