pub mod boxes;

pub use boxes::{BoxRequest, GenerateBoxResponse};
