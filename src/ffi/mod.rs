//! FFI bindings to the OpenCL library.
//!
//! This module contains the raw ABI types and the dispatch table. Users
//! should prefer the typed handles in the parent modules.

pub mod api;
pub mod error;
pub mod raw;

pub use api::{active, install, uninstall, Api, LIBRARY_ENV};
pub use error::{check_created, check_status};
pub use raw::*;
