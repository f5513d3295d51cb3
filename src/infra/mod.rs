//! Infrastructure utilities (filesystem access).

pub mod fs;

pub use fs::{absolutize, io_reason, read_first_line};
