//! Self-describing HDF5 dataset I/O with flat, typed host buffers.
//!
//! Each operation takes a file path and an internal path, opens its own
//! short-lived handle, performs one read or write, and releases the handle
//! on every exit path. No handle is cached or shared, so callers must
//! serialize access to a given file: one writer at a time, and no reader
//! overlapping a writer. Operations on distinct files are independent.

pub mod datatype;
pub mod error;
pub mod group;
pub mod read;
pub mod write;

mod store;
mod strings;

pub use datatype::{ChildKind, NumericData, Shape, TypeCode};
pub use error::{Error, Result};
pub use group::{list_group_children, GroupListing};
pub use read::{describe_dataset, load_dataset, DatasetInfo, DatasetPayload, LoadedDataset, StringPayload};
pub use write::{
    create_dataset, create_file, create_group, write_numeric_dataset, write_string_dataset,
    CreateConfig,
};
