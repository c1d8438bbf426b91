//! Context creation.

use std::ptr;

use log::debug;

use crate::error::Result;
use crate::ffi::{self, cl_context_properties, cl_object, cl_uint};
use crate::handle::{Context, Device};
use crate::types::{ContextProperty, DeviceType};

fn properties_ptr(list: &Option<Vec<ContextProperty>>) -> *const cl_context_properties {
    list.as_ref()
        .map(|l| l.as_ptr() as *const cl_context_properties)
        .unwrap_or(ptr::null())
}

impl Context {
    /// Create a context over explicit devices.
    ///
    /// The returned context has a reference count of one and must be disposed.
    pub fn new(properties: &[ContextProperty], devices: &[Device]) -> Result<Context> {
        let api = ffi::active()?;
        let list = ContextProperty::terminated(properties);

        let mut status = ffi::CL_SUCCESS;
        let raw = unsafe {
            (api.create_context)(
                properties_ptr(&list),
                devices.len() as cl_uint,
                devices.as_ptr() as *const cl_object,
                None,
                ptr::null_mut(),
                &mut status,
            )
        };
        let context = Context::from_raw(ffi::check_created(raw, status, "clCreateContext")?);
        debug!("created {:?} over {} device(s)", context, devices.len());
        Ok(context)
    }

    /// Create a context over every device of the given type.
    pub fn from_type(properties: &[ContextProperty], device_type: DeviceType) -> Result<Context> {
        let api = ffi::active()?;
        let list = ContextProperty::terminated(properties);

        let mut status = ffi::CL_SUCCESS;
        let raw = unsafe {
            (api.create_context_from_type)(
                properties_ptr(&list),
                device_type.bits(),
                None,
                ptr::null_mut(),
                &mut status,
            )
        };
        let context =
            Context::from_raw(ffi::check_created(raw, status, "clCreateContextFromType")?);
        debug!("created {:?} for device type {:#x}", context, device_type.bits());
        Ok(context)
    }
}
