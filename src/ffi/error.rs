//! Status conversion utilities for FFI.

use super::raw::{cl_int, cl_object, CL_SUCCESS};
use crate::error::{ErrorCode, NativeCallError};

/// Convert a native status to a Result.
///
/// Every status other than `CL_SUCCESS` becomes a [`NativeCallError`] carrying
/// that exact code, with the entry point name as its message.
pub fn check_status(status: cl_int, entry: &'static str) -> crate::Result<()> {
    if status == CL_SUCCESS {
        Ok(())
    } else {
        Err(NativeCallError::with_message(ErrorCode::from_raw(status), entry).into())
    }
}

/// Convert the `(object, status)` pair of a create-family call to a Result.
pub fn check_created(object: cl_object, status: cl_int, entry: &'static str) -> crate::Result<cl_object> {
    check_status(status, entry)?;
    Ok(object)
}
