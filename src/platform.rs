//! Platform and device discovery.
//!
//! Platforms and devices are owned by the driver. They are returned by
//! queries, never created, and have no retain or dispose.

use std::mem;
use std::os::raw::c_void;
use std::ptr;

use log::debug;

use crate::error::Result;
use crate::ffi::{self, cl_device_type, cl_object, cl_uint, GetInfoFn};
use crate::handle::{Device, Handle, Platform};
use crate::types::DeviceType;

/// List every available platform.
pub fn platforms() -> Result<Vec<Platform>> {
    let api = ffi::active()?;

    let mut count: cl_uint = 0;
    let status = unsafe { (api.get_platform_ids)(0, ptr::null_mut(), &mut count) };
    ffi::check_status(status, "clGetPlatformIDs")?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut raw: Vec<cl_object> = vec![ptr::null_mut(); count as usize];
    let status = unsafe { (api.get_platform_ids)(count, raw.as_mut_ptr(), ptr::null_mut()) };
    ffi::check_status(status, "clGetPlatformIDs")?;

    let platforms: Vec<Platform> = raw.into_iter().map(Platform::from_raw).collect();
    debug!("found {} OpenCL platform(s)", platforms.len());
    Ok(platforms)
}

/// Read a string-valued info parameter with the query-size-then-fill protocol.
fn info_string(
    info: GetInfoFn,
    object: cl_object,
    param: cl_uint,
    entry: &'static str,
) -> Result<String> {
    let mut size = 0usize;
    let status = unsafe { info(object, param, 0, ptr::null_mut(), &mut size) };
    ffi::check_status(status, entry)?;
    if size == 0 {
        return Ok(String::new());
    }

    let mut buf = vec![0u8; size];
    let status = unsafe {
        info(
            object,
            param,
            buf.len(),
            buf.as_mut_ptr() as *mut c_void,
            ptr::null_mut(),
        )
    };
    ffi::check_status(status, entry)?;

    if let Some(nul) = buf.iter().position(|&b| b == 0) {
        buf.truncate(nul);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl Platform {
    /// List the platform's devices of the given type.
    ///
    /// A platform without matching devices reports `DeviceNotFound`.
    pub fn devices(&self, device_type: DeviceType) -> Result<Vec<Device>> {
        let api = ffi::active()?;

        let mut count: cl_uint = 0;
        let status = unsafe {
            (api.get_device_ids)(
                self.as_raw(),
                device_type.bits(),
                0,
                ptr::null_mut(),
                &mut count,
            )
        };
        ffi::check_status(status, "clGetDeviceIDs")?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut raw: Vec<cl_object> = vec![ptr::null_mut(); count as usize];
        let status = unsafe {
            (api.get_device_ids)(
                self.as_raw(),
                device_type.bits(),
                count,
                raw.as_mut_ptr(),
                ptr::null_mut(),
            )
        };
        ffi::check_status(status, "clGetDeviceIDs")?;

        Ok(raw.into_iter().map(Device::from_raw).collect())
    }

    /// Platform name.
    pub fn name(&self) -> Result<String> {
        self.info(ffi::CL_PLATFORM_NAME)
    }

    /// Platform vendor.
    pub fn vendor(&self) -> Result<String> {
        self.info(ffi::CL_PLATFORM_VENDOR)
    }

    /// OpenCL version string, e.g. `"OpenCL 1.2 <vendor info>"`.
    pub fn version(&self) -> Result<String> {
        self.info(ffi::CL_PLATFORM_VERSION)
    }

    /// `"FULL_PROFILE"` or `"EMBEDDED_PROFILE"`.
    pub fn profile(&self) -> Result<String> {
        self.info(ffi::CL_PLATFORM_PROFILE)
    }

    fn info(&self, param: cl_uint) -> Result<String> {
        let api = ffi::active()?;
        info_string(api.get_platform_info, self.as_raw(), param, "clGetPlatformInfo")
    }
}

impl Device {
    /// Device name.
    pub fn name(&self) -> Result<String> {
        let api = ffi::active()?;
        info_string(api.get_device_info, self.as_raw(), ffi::CL_DEVICE_NAME, "clGetDeviceInfo")
    }

    /// Device vendor.
    pub fn vendor(&self) -> Result<String> {
        let api = ffi::active()?;
        info_string(api.get_device_info, self.as_raw(), ffi::CL_DEVICE_VENDOR, "clGetDeviceInfo")
    }

    /// Device type bits.
    pub fn device_type(&self) -> Result<DeviceType> {
        let api = ffi::active()?;
        let mut bits: cl_device_type = 0;
        let status = unsafe {
            (api.get_device_info)(
                self.as_raw(),
                ffi::CL_DEVICE_TYPE,
                mem::size_of::<cl_device_type>(),
                &mut bits as *mut cl_device_type as *mut c_void,
                ptr::null_mut(),
            )
        };
        ffi::check_status(status, "clGetDeviceInfo")?;
        Ok(DeviceType::from_bits(bits))
    }
}
