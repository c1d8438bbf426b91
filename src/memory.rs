//! Memory object creation: buffers and 2D images.

use std::mem;
use std::os::raw::c_void;
use std::ptr;

use log::debug;

use crate::error::{Error, Result};
use crate::ffi;
use crate::handle::{Context, Handle, Mem};
use crate::types::{ImageFormat, MemFlags};

impl Mem {
    /// Allocate an uninitialized buffer of `size` bytes.
    pub fn buffer(context: Context, flags: MemFlags, size: usize) -> Result<Mem> {
        if flags.contains(MemFlags::USE_HOST_PTR) || flags.contains(MemFlags::COPY_HOST_PTR) {
            return Err(Error::InvalidArgument(
                "host pointer flags need host data, use Mem::buffer_from".to_string(),
            ));
        }
        create_buffer(context, flags, size, ptr::null_mut())
    }

    /// Allocate a buffer initialized with a copy of `data`.
    ///
    /// `COPY_HOST_PTR` is added to `flags`; the native library copies `data`
    /// before this call returns.
    pub fn buffer_from<T: Copy>(context: Context, flags: MemFlags, data: &[T]) -> Result<Mem> {
        if flags.contains(MemFlags::USE_HOST_PTR) {
            return Err(Error::InvalidArgument(
                "USE_HOST_PTR would let the buffer outlive borrowed data".to_string(),
            ));
        }
        create_buffer(
            context,
            flags | MemFlags::COPY_HOST_PTR,
            mem::size_of_val(data),
            data.as_ptr() as *mut c_void,
        )
    }

    /// Allocate an uninitialized 2D image.
    pub fn image_2d(
        context: Context,
        flags: MemFlags,
        format: ImageFormat,
        width: usize,
        height: usize,
    ) -> Result<Mem> {
        let api = ffi::active()?;
        let raw_format = format.to_raw();

        let mut status = ffi::CL_SUCCESS;
        let raw = unsafe {
            (api.create_image_2d)(
                context.as_raw(),
                flags.bits(),
                &raw_format,
                width,
                height,
                0,
                ptr::null_mut(),
                &mut status,
            )
        };
        let image = Mem::from_raw(ffi::check_created(raw, status, "clCreateImage2D")?);
        debug!("created image {:?} ({}x{}) in {:?}", image, width, height, context);
        Ok(image)
    }
}

fn create_buffer(context: Context, flags: MemFlags, size: usize, host_ptr: *mut c_void) -> Result<Mem> {
    let api = ffi::active()?;

    let mut status = ffi::CL_SUCCESS;
    let raw = unsafe {
        (api.create_buffer)(context.as_raw(), flags.bits(), size, host_ptr, &mut status)
    };
    let buffer = Mem::from_raw(ffi::check_created(raw, status, "clCreateBuffer")?);
    debug!("created buffer {:?} ({} bytes) in {:?}", buffer, size, context);
    Ok(buffer)
}
