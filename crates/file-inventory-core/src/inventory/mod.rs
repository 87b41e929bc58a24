pub mod attributes;
pub mod time;

pub use attributes::{extension_of, FileAttributes};
