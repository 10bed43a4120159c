//! Writing artifacts to disk.

pub mod writer;

pub use writer::{resolve_output_path, write_archive, write_plain};
