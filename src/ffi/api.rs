//! The dispatch table of OpenCL entry points.
//!
//! Every native call made by this crate goes through an [`Api`] value. The
//! table is normally resolved from the platform's OpenCL library with
//! [`Api::load`], but it is a plain struct of function pointers and can be
//! assembled by hand (an alternative loader, a test double).

use std::env;
use std::path::PathBuf;

use libloading::Library;
use log::debug;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::raw::*;
use crate::error::{Error, Result};
use crate::types::LoadOptions;

/// Environment variable naming the OpenCL library to load.
pub const LIBRARY_ENV: &str = "CLHANDLE_OPENCL_LIBRARY";

/// Function pointers for every native entry point this crate calls.
#[derive(Debug, Clone, Copy)]
pub struct Api {
    pub get_platform_ids: GetPlatformIdsFn,
    pub get_platform_info: GetInfoFn,
    pub get_device_ids: GetDeviceIdsFn,
    pub get_device_info: GetInfoFn,

    pub create_context: CreateContextFn,
    pub create_context_from_type: CreateContextFromTypeFn,
    pub retain_context: RetainFn,
    pub release_context: ReleaseFn,
    pub get_context_info: GetInfoFn,

    pub create_command_queue: CreateCommandQueueFn,
    pub retain_command_queue: RetainFn,
    pub release_command_queue: ReleaseFn,
    pub get_command_queue_info: GetInfoFn,

    pub create_buffer: CreateBufferFn,
    pub create_image_2d: CreateImage2dFn,
    pub retain_mem_object: RetainFn,
    pub release_mem_object: ReleaseFn,
    pub get_mem_object_info: GetInfoFn,

    pub create_program_with_source: CreateProgramWithSourceFn,
    pub retain_program: RetainFn,
    pub release_program: ReleaseFn,
    pub get_program_info: GetInfoFn,

    pub create_kernel: CreateKernelFn,
    pub retain_kernel: RetainFn,
    pub release_kernel: ReleaseFn,
    pub get_kernel_info: GetInfoFn,

    pub create_user_event: CreateUserEventFn,
    pub retain_event: RetainFn,
    pub release_event: ReleaseFn,
    pub get_event_info: GetInfoFn,

    pub create_sampler: CreateSamplerFn,
    pub retain_sampler: RetainFn,
    pub release_sampler: ReleaseFn,
    pub get_sampler_info: GetInfoFn,
}

/// The loaded library. Never unloaded, so copied function pointers stay valid.
static LIBRARY: OnceCell<Library> = OnceCell::new();

/// The table used by handle operations.
static ACTIVE: RwLock<Option<Api>> = parking_lot::const_rwlock(None);

impl Api {
    /// Open the OpenCL library and resolve every entry point.
    ///
    /// The library is opened once per process; later calls reuse it and
    /// ignore `options.library_path`.
    pub fn load(options: &LoadOptions) -> Result<Api> {
        let library = LIBRARY.get_or_try_init(|| open_library(options))?;
        unsafe { Api::from_library(library) }
    }

    /// Resolve every entry point from an already opened library.
    ///
    /// # Safety
    ///
    /// The library must export the OpenCL 1.2 entry points with their
    /// standard signatures, and must outlive every use of the returned table.
    pub unsafe fn from_library(library: &Library) -> Result<Api> {
        Ok(Api {
            get_platform_ids: symbol(library, "clGetPlatformIDs")?,
            get_platform_info: symbol(library, "clGetPlatformInfo")?,
            get_device_ids: symbol(library, "clGetDeviceIDs")?,
            get_device_info: symbol(library, "clGetDeviceInfo")?,

            create_context: symbol(library, "clCreateContext")?,
            create_context_from_type: symbol(library, "clCreateContextFromType")?,
            retain_context: symbol(library, "clRetainContext")?,
            release_context: symbol(library, "clReleaseContext")?,
            get_context_info: symbol(library, "clGetContextInfo")?,

            create_command_queue: symbol(library, "clCreateCommandQueue")?,
            retain_command_queue: symbol(library, "clRetainCommandQueue")?,
            release_command_queue: symbol(library, "clReleaseCommandQueue")?,
            get_command_queue_info: symbol(library, "clGetCommandQueueInfo")?,

            create_buffer: symbol(library, "clCreateBuffer")?,
            create_image_2d: symbol(library, "clCreateImage2D")?,
            retain_mem_object: symbol(library, "clRetainMemObject")?,
            release_mem_object: symbol(library, "clReleaseMemObject")?,
            get_mem_object_info: symbol(library, "clGetMemObjectInfo")?,

            create_program_with_source: symbol(library, "clCreateProgramWithSource")?,
            retain_program: symbol(library, "clRetainProgram")?,
            release_program: symbol(library, "clReleaseProgram")?,
            get_program_info: symbol(library, "clGetProgramInfo")?,

            create_kernel: symbol(library, "clCreateKernel")?,
            retain_kernel: symbol(library, "clRetainKernel")?,
            release_kernel: symbol(library, "clReleaseKernel")?,
            get_kernel_info: symbol(library, "clGetKernelInfo")?,

            create_user_event: symbol(library, "clCreateUserEvent")?,
            retain_event: symbol(library, "clRetainEvent")?,
            release_event: symbol(library, "clReleaseEvent")?,
            get_event_info: symbol(library, "clGetEventInfo")?,

            create_sampler: symbol(library, "clCreateSampler")?,
            retain_sampler: symbol(library, "clRetainSampler")?,
            release_sampler: symbol(library, "clReleaseSampler")?,
            get_sampler_info: symbol(library, "clGetSamplerInfo")?,
        })
    }
}

unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T> {
    library
        .get::<T>(name.as_bytes())
        .map(|sym| *sym)
        .map_err(|source| Error::MissingSymbol {
            symbol: name,
            source,
        })
}

/// Library names tried when no explicit path is configured.
fn default_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &["OpenCL.dll"]
    } else if cfg!(target_os = "macos") {
        &["/System/Library/Frameworks/OpenCL.framework/OpenCL"]
    } else {
        &["libOpenCL.so.1", "libOpenCL.so"]
    }
}

/// Candidate paths in resolution order: explicit option, environment, defaults.
pub(crate) fn library_candidates(options: &LoadOptions) -> Vec<PathBuf> {
    if let Some(path) = &options.library_path {
        return vec![path.clone()];
    }
    if let Some(path) = env::var_os(LIBRARY_ENV).filter(|p| !p.is_empty()) {
        return vec![PathBuf::from(path)];
    }
    default_candidates().iter().map(PathBuf::from).collect()
}

fn open_library(options: &LoadOptions) -> Result<Library> {
    let mut last = None;
    for path in library_candidates(options) {
        match unsafe { Library::new(&path) } {
            Ok(library) => {
                debug!("loaded OpenCL library from {}", path.display());
                return Ok(library);
            }
            Err(source) => {
                debug!("could not load {}: {}", path.display(), source);
                last = Some((path, source));
            }
        }
    }

    match last {
        Some((path, source)) => Err(Error::Load { path, source }),
        None => Err(Error::InvalidArgument("no OpenCL library candidates".to_string())),
    }
}

/// Get the installed dispatch table.
pub fn active() -> Result<Api> {
    (*ACTIVE.read()).ok_or(Error::NotInitialized)
}

/// Install a dispatch table, replacing any previous one.
pub fn install(api: Api) {
    *ACTIVE.write() = Some(api);
}

/// Remove the installed dispatch table.
pub fn uninstall() -> Option<Api> {
    ACTIVE.write().take()
}
