pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Download, Init, Upload, Version};
