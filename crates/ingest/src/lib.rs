pub mod batch;
pub mod document;
pub mod transcript;
