//! Storage layer for index artifacts and document collections.
//!
//! A [`Storage`] is a flat namespace of named files. Inputs and outputs are
//! scoped handles: they are released when dropped, on every exit path.

pub mod file;
pub mod traits;

pub use file::FileStorage;
pub use traits::{Storage, StorageConfig, StorageInput, StorageOutput};
