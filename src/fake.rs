//! In-process stand-in for the OpenCL library, used by unit tests.
//!
//! Objects are plain counters keyed by a fake address. Each stub validates
//! the kind of the object it is given and answers with the same status a
//! conforming driver would, so tests can observe exactly what the binding
//! forwards.

use std::collections::HashMap;
use std::ffi::CStr;
use std::mem;
use std::os::raw::{c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::ffi::*;
use crate::handle::HandleKind;

pub const PLATFORMS: [usize; 2] = [0x100, 0x200];
pub const PLATFORM_NAME: &str = "Fake Platform";
pub const DEVICE_NAME: &str = "Fake Device";

struct Object {
    kind: HandleKind,
    count: u32,
}

#[derive(Default)]
struct State {
    objects: HashMap<usize, Object>,
    failures: HashMap<usize, cl_int>,
    calls: HashMap<usize, Vec<&'static str>>,
}

static STATE: Lazy<Mutex<State>> = Lazy::new(|| Mutex::new(State::default()));
static NEXT: AtomicUsize = AtomicUsize::new(0x10_000);

/// Install the fake dispatch table.
pub fn install() {
    let _ = env_logger::builder().is_test(true).try_init();
    crate::init_with(table());
}

/// Create a fake object with reference count one.
pub fn alloc(kind: HandleKind) -> cl_object {
    let address = NEXT.fetch_add(0x10, Ordering::Relaxed);
    STATE.lock().objects.insert(address, Object { kind, count: 1 });
    address as cl_object
}

/// Make the next call that receives `address` return `status`.
pub fn fail_next(address: usize, status: cl_int) {
    STATE.lock().failures.insert(address, status);
}

/// Current reference count, `None` once destroyed.
pub fn count(address: usize) -> Option<u32> {
    STATE.lock().objects.get(&address).map(|o| o.count)
}

/// Entry points called with `address`, in order.
pub fn calls(address: usize) -> Vec<&'static str> {
    STATE.lock().calls.get(&address).cloned().unwrap_or_default()
}

fn invalid_status(kind: HandleKind) -> cl_int {
    match kind {
        HandleKind::Platform => CL_INVALID_PLATFORM,
        HandleKind::Device => CL_INVALID_DEVICE,
        HandleKind::Context => CL_INVALID_CONTEXT,
        HandleKind::Mem => CL_INVALID_MEM_OBJECT,
        HandleKind::Program => CL_INVALID_PROGRAM,
        HandleKind::CommandQueue => CL_INVALID_COMMAND_QUEUE,
        HandleKind::Kernel => CL_INVALID_KERNEL,
        HandleKind::Event => CL_INVALID_EVENT,
        HandleKind::Sampler => CL_INVALID_SAMPLER,
    }
}

/// Record the call and check that `object` is a live object of `kind`.
fn enter(state: &mut State, entry: &'static str, object: cl_object, kind: HandleKind) -> cl_int {
    let address = object as usize;
    state.calls.entry(address).or_default().push(entry);
    if let Some(status) = state.failures.remove(&address) {
        return status;
    }
    match state.objects.get(&address) {
        Some(o) if o.kind == kind => CL_SUCCESS,
        _ => invalid_status(kind),
    }
}

fn retain(entry: &'static str, object: cl_object, kind: HandleKind) -> cl_int {
    let mut state = STATE.lock();
    let status = enter(&mut state, entry, object, kind);
    if status == CL_SUCCESS {
        if let Some(o) = state.objects.get_mut(&(object as usize)) {
            o.count += 1;
        }
    }
    status
}

fn release(entry: &'static str, object: cl_object, kind: HandleKind) -> cl_int {
    let mut state = STATE.lock();
    let status = enter(&mut state, entry, object, kind);
    if status == CL_SUCCESS {
        let address = object as usize;
        let destroyed = match state.objects.get_mut(&address) {
            Some(o) => {
                o.count -= 1;
                o.count == 0
            }
            None => false,
        };
        if destroyed {
            state.objects.remove(&address);
        }
    }
    status
}

unsafe fn write_u32(value: u32, size: usize, out: *mut c_void, size_ret: *mut usize) -> cl_int {
    if !size_ret.is_null() {
        *size_ret = mem::size_of::<u32>();
    }
    if out.is_null() {
        return CL_SUCCESS;
    }
    if size < mem::size_of::<u32>() {
        return CL_INVALID_VALUE;
    }
    *(out as *mut u32) = value;
    CL_SUCCESS
}

unsafe fn write_str(value: &str, size: usize, out: *mut c_void, size_ret: *mut usize) -> cl_int {
    let needed = value.len() + 1;
    if !size_ret.is_null() {
        *size_ret = needed;
    }
    if out.is_null() {
        return CL_SUCCESS;
    }
    if size < needed {
        return CL_INVALID_VALUE;
    }
    let out = out as *mut u8;
    ptr::copy_nonoverlapping(value.as_ptr(), out, value.len());
    *out.add(value.len()) = 0;
    CL_SUCCESS
}

unsafe fn info(
    entry: &'static str,
    object: cl_object,
    kind: HandleKind,
    size: usize,
    out: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    let mut state = STATE.lock();
    let status = enter(&mut state, entry, object, kind);
    if status != CL_SUCCESS {
        return status;
    }
    let count = state.objects[&(object as usize)].count;
    write_u32(count, size, out, size_ret)
}

macro_rules! lifecycle_stubs {
    ($kind:ident: $retain:ident = $retain_entry:literal, $release:ident = $release_entry:literal, $info:ident = $info_entry:literal) => {
        unsafe extern "C" fn $retain(object: cl_object) -> cl_int {
            retain($retain_entry, object, HandleKind::$kind)
        }

        unsafe extern "C" fn $release(object: cl_object) -> cl_int {
            release($release_entry, object, HandleKind::$kind)
        }

        unsafe extern "C" fn $info(
            object: cl_object,
            _param: cl_uint,
            size: usize,
            out: *mut c_void,
            size_ret: *mut usize,
        ) -> cl_int {
            info($info_entry, object, HandleKind::$kind, size, out, size_ret)
        }
    };
}

lifecycle_stubs!(Context: retain_context = "clRetainContext", release_context = "clReleaseContext", get_context_info = "clGetContextInfo");
lifecycle_stubs!(Mem: retain_mem = "clRetainMemObject", release_mem = "clReleaseMemObject", get_mem_info = "clGetMemObjectInfo");
lifecycle_stubs!(Program: retain_program = "clRetainProgram", release_program = "clReleaseProgram", get_program_info = "clGetProgramInfo");
lifecycle_stubs!(CommandQueue: retain_queue = "clRetainCommandQueue", release_queue = "clReleaseCommandQueue", get_queue_info = "clGetCommandQueueInfo");
lifecycle_stubs!(Kernel: retain_kernel = "clRetainKernel", release_kernel = "clReleaseKernel", get_kernel_info = "clGetKernelInfo");
lifecycle_stubs!(Event: retain_event = "clRetainEvent", release_event = "clReleaseEvent", get_event_info = "clGetEventInfo");
lifecycle_stubs!(Sampler: retain_sampler = "clRetainSampler", release_sampler = "clReleaseSampler", get_sampler_info = "clGetSamplerInfo");

unsafe fn set_status(errcode_ret: *mut cl_int, status: cl_int) {
    if !errcode_ret.is_null() {
        *errcode_ret = status;
    }
}

/// Validate the parent object, then create a child of `kind`.
unsafe fn create(
    entry: &'static str,
    parent: cl_object,
    parent_kind: HandleKind,
    kind: HandleKind,
    errcode_ret: *mut cl_int,
) -> cl_object {
    let status = {
        let mut state = STATE.lock();
        enter(&mut state, entry, parent, parent_kind)
    };
    set_status(errcode_ret, status);
    if status != CL_SUCCESS {
        return ptr::null_mut();
    }
    alloc(kind)
}

fn is_platform(address: usize) -> bool {
    PLATFORMS.contains(&address)
}

fn is_device(address: usize) -> bool {
    PLATFORMS.iter().any(|p| address == p + 1 || address == p + 2)
}

unsafe extern "C" fn get_platform_ids(
    num_entries: cl_uint,
    platforms: *mut cl_object,
    num_platforms: *mut cl_uint,
) -> cl_int {
    if platforms.is_null() && num_platforms.is_null() {
        return CL_INVALID_VALUE;
    }
    if !num_platforms.is_null() {
        *num_platforms = PLATFORMS.len() as cl_uint;
    }
    if !platforms.is_null() {
        if num_entries == 0 {
            return CL_INVALID_VALUE;
        }
        for (i, p) in PLATFORMS.iter().take(num_entries as usize).enumerate() {
            *platforms.add(i) = *p as cl_object;
        }
    }
    CL_SUCCESS
}

unsafe extern "C" fn get_platform_info(
    platform: cl_object,
    param: cl_uint,
    size: usize,
    out: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    if !is_platform(platform as usize) {
        return CL_INVALID_PLATFORM;
    }
    match param {
        CL_PLATFORM_NAME => write_str(PLATFORM_NAME, size, out, size_ret),
        CL_PLATFORM_VENDOR => write_str("Fake Vendor", size, out, size_ret),
        CL_PLATFORM_VERSION => write_str("OpenCL 1.2 Fake", size, out, size_ret),
        CL_PLATFORM_PROFILE => write_str("FULL_PROFILE", size, out, size_ret),
        _ => CL_INVALID_VALUE,
    }
}

/// Each platform has one GPU at `platform + 1` and one CPU at `platform + 2`.
unsafe extern "C" fn get_device_ids(
    platform: cl_object,
    device_type: cl_device_type,
    num_entries: cl_uint,
    devices: *mut cl_object,
    num_devices: *mut cl_uint,
) -> cl_int {
    let platform = platform as usize;
    if !is_platform(platform) {
        return CL_INVALID_PLATFORM;
    }
    let mut found = Vec::new();
    if device_type & (1 << 2 | 1 << 0) != 0 {
        found.push(platform + 1);
    }
    if device_type & (1 << 1) != 0 {
        found.push(platform + 2);
    }
    if found.is_empty() {
        return CL_DEVICE_NOT_FOUND;
    }
    if !num_devices.is_null() {
        *num_devices = found.len() as cl_uint;
    }
    if !devices.is_null() {
        for (i, d) in found.iter().take(num_entries as usize).enumerate() {
            *devices.add(i) = *d as cl_object;
        }
    }
    CL_SUCCESS
}

unsafe extern "C" fn get_device_info(
    device: cl_object,
    param: cl_uint,
    size: usize,
    out: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    let device = device as usize;
    if !is_device(device) {
        return CL_INVALID_DEVICE;
    }
    match param {
        CL_DEVICE_NAME => write_str(DEVICE_NAME, size, out, size_ret),
        CL_DEVICE_VENDOR => write_str("Fake Vendor", size, out, size_ret),
        CL_DEVICE_TYPE => {
            if !size_ret.is_null() {
                *size_ret = mem::size_of::<cl_device_type>();
            }
            if out.is_null() {
                return CL_SUCCESS;
            }
            if size < mem::size_of::<cl_device_type>() {
                return CL_INVALID_VALUE;
            }
            let kind: cl_device_type = if device % 0x100 == 1 { 1 << 2 } else { 1 << 1 };
            *(out as *mut cl_device_type) = kind;
            CL_SUCCESS
        }
        _ => CL_INVALID_VALUE,
    }
}

unsafe extern "C" fn create_context(
    _properties: *const cl_context_properties,
    num_devices: cl_uint,
    devices: *const cl_object,
    _notify: cl_context_notify,
    _user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_object {
    if num_devices == 0 || devices.is_null() {
        set_status(errcode_ret, CL_INVALID_VALUE);
        return ptr::null_mut();
    }
    for i in 0..num_devices as usize {
        let device = *devices.add(i) as usize;
        let forced = STATE.lock().failures.remove(&device);
        if let Some(status) = forced {
            set_status(errcode_ret, status);
            return ptr::null_mut();
        }
        if !is_device(device) {
            set_status(errcode_ret, CL_INVALID_DEVICE);
            return ptr::null_mut();
        }
    }
    set_status(errcode_ret, CL_SUCCESS);
    alloc(HandleKind::Context)
}

unsafe extern "C" fn create_context_from_type(
    properties: *const cl_context_properties,
    device_type: cl_device_type,
    _notify: cl_context_notify,
    _user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_object {
    if !properties.is_null() && *properties == CL_CONTEXT_PLATFORM {
        let platform = *properties.add(1) as usize;
        if !is_platform(platform) {
            set_status(errcode_ret, CL_INVALID_PLATFORM);
            return ptr::null_mut();
        }
    }
    if device_type & (1 << 3) != 0 && device_type != 0xFFFF_FFFF {
        set_status(errcode_ret, CL_DEVICE_NOT_FOUND);
        return ptr::null_mut();
    }
    set_status(errcode_ret, CL_SUCCESS);
    alloc(HandleKind::Context)
}

unsafe extern "C" fn create_command_queue(
    context: cl_object,
    device: cl_object,
    _properties: cl_command_queue_properties,
    errcode_ret: *mut cl_int,
) -> cl_object {
    if !is_device(device as usize) {
        set_status(errcode_ret, CL_INVALID_DEVICE);
        return ptr::null_mut();
    }
    create(
        "clCreateCommandQueue",
        context,
        HandleKind::Context,
        HandleKind::CommandQueue,
        errcode_ret,
    )
}

unsafe extern "C" fn create_buffer(
    context: cl_object,
    _flags: cl_mem_flags,
    size: usize,
    _host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_object {
    if size == 0 {
        set_status(errcode_ret, CL_INVALID_BUFFER_SIZE);
        return ptr::null_mut();
    }
    create("clCreateBuffer", context, HandleKind::Context, HandleKind::Mem, errcode_ret)
}

#[allow(clippy::too_many_arguments)]
unsafe extern "C" fn create_image_2d(
    context: cl_object,
    _flags: cl_mem_flags,
    format: *const cl_image_format,
    width: usize,
    height: usize,
    _row_pitch: usize,
    _host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_object {
    if format.is_null() || ptr::read_unaligned(format).image_channel_order == 0 {
        set_status(errcode_ret, CL_INVALID_IMAGE_FORMAT_DESCRIPTOR);
        return ptr::null_mut();
    }
    if width == 0 || height == 0 {
        set_status(errcode_ret, CL_INVALID_IMAGE_SIZE);
        return ptr::null_mut();
    }
    create("clCreateImage2D", context, HandleKind::Context, HandleKind::Mem, errcode_ret)
}

unsafe extern "C" fn create_program_with_source(
    context: cl_object,
    count: cl_uint,
    strings: *const *const c_char,
    _lengths: *const usize,
    errcode_ret: *mut cl_int,
) -> cl_object {
    if count == 0 || strings.is_null() {
        set_status(errcode_ret, CL_INVALID_VALUE);
        return ptr::null_mut();
    }
    create(
        "clCreateProgramWithSource",
        context,
        HandleKind::Context,
        HandleKind::Program,
        errcode_ret,
    )
}

unsafe extern "C" fn create_kernel(
    program: cl_object,
    kernel_name: *const c_char,
    errcode_ret: *mut cl_int,
) -> cl_object {
    if kernel_name.is_null() {
        set_status(errcode_ret, CL_INVALID_VALUE);
        return ptr::null_mut();
    }
    if CStr::from_ptr(kernel_name).to_bytes() == b"missing" {
        set_status(errcode_ret, CL_INVALID_KERNEL_NAME);
        return ptr::null_mut();
    }
    create("clCreateKernel", program, HandleKind::Program, HandleKind::Kernel, errcode_ret)
}

unsafe extern "C" fn create_user_event(context: cl_object, errcode_ret: *mut cl_int) -> cl_object {
    create("clCreateUserEvent", context, HandleKind::Context, HandleKind::Event, errcode_ret)
}

unsafe extern "C" fn create_sampler(
    context: cl_object,
    _normalized_coords: cl_bool,
    addressing_mode: cl_addressing_mode,
    _filter_mode: cl_filter_mode,
    errcode_ret: *mut cl_int,
) -> cl_object {
    if !(0x1130..=0x1134).contains(&addressing_mode) {
        set_status(errcode_ret, CL_INVALID_VALUE);
        return ptr::null_mut();
    }
    create("clCreateSampler", context, HandleKind::Context, HandleKind::Sampler, errcode_ret)
}

fn table() -> Api {
    Api {
        get_platform_ids,
        get_platform_info,
        get_device_ids,
        get_device_info,

        create_context,
        create_context_from_type,
        retain_context,
        release_context,
        get_context_info,

        create_command_queue,
        retain_command_queue: retain_queue,
        release_command_queue: release_queue,
        get_command_queue_info: get_queue_info,

        create_buffer,
        create_image_2d,
        retain_mem_object: retain_mem,
        release_mem_object: release_mem,
        get_mem_object_info: get_mem_info,

        create_program_with_source,
        retain_program,
        release_program,
        get_program_info,

        create_kernel,
        retain_kernel,
        release_kernel,
        get_kernel_info,

        create_user_event,
        retain_event,
        release_event,
        get_event_info,

        create_sampler,
        retain_sampler,
        release_sampler,
        get_sampler_info,
    }
}
