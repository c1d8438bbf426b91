//! Program and kernel creation.
//!
//! Building a program is left to the native library; a kernel can only be
//! created from a program that was built for the context's devices.

use std::ffi::CString;
use std::os::raw::c_char;

use log::debug;

use crate::error::{Error, Result};
use crate::ffi::{self, cl_uint};
use crate::handle::{Context, Handle, Kernel, Program};

impl Program {
    /// Create a program from OpenCL C source strings.
    pub fn with_source(context: Context, sources: &[&str]) -> Result<Program> {
        let api = ffi::active()?;

        let strings: Vec<*const c_char> = sources.iter().map(|s| s.as_ptr() as *const c_char).collect();
        let lengths: Vec<usize> = sources.iter().map(|s| s.len()).collect();

        let mut status = ffi::CL_SUCCESS;
        let raw = unsafe {
            (api.create_program_with_source)(
                context.as_raw(),
                sources.len() as cl_uint,
                if strings.is_empty() { std::ptr::null() } else { strings.as_ptr() },
                lengths.as_ptr(),
                &mut status,
            )
        };
        let program = Program::from_raw(ffi::check_created(raw, status, "clCreateProgramWithSource")?);
        debug!("created {:?} from {} source string(s)", program, sources.len());
        Ok(program)
    }
}

impl Kernel {
    /// Create a kernel for the `__kernel` function `name` of a built program.
    pub fn new(program: Program, name: &str) -> Result<Kernel> {
        let name_c = CString::new(name)
            .map_err(|_| Error::InvalidArgument(format!("kernel name {:?} contains a NUL byte", name)))?;
        let api = ffi::active()?;

        let mut status = ffi::CL_SUCCESS;
        let raw = unsafe { (api.create_kernel)(program.as_raw(), name_c.as_ptr(), &mut status) };
        let kernel = Kernel::from_raw(ffi::check_created(raw, status, "clCreateKernel")?);
        debug!("created {:?} for {} from {:?}", kernel, name, program);
        Ok(kernel)
    }
}
