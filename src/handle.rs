//! Handle value types for OpenCL objects.
//!
//! Every OpenCL object is reached through one pointer-sized opaque address.
//! Each kind gets its own newtype so handles of different kinds can never be
//! mixed up or compared with each other.
//!
//! Handles are plain `Copy` values. Copying a handle does not retain the
//! native object and dropping one does not release it: only
//! [`RefCounted::retain`] and [`RefCounted::dispose`] change the native
//! reference count. Callers own the obligation to dispose exactly once per
//! acquisition on every exit path, and to not dispose the same acquisition
//! from two threads. Use [`HandleArena`](crate::HandleArena) when an owning
//! layer that catches use-after-release is wanted.
//!
//! # Example
//!
//! ```no_run
//! use clhandle::{Context, DeviceType, Handle, Mem, MemFlags, RefCounted, INVALID};
//!
//! fn example() -> clhandle::Result<()> {
//!     clhandle::init()?;
//!
//!     let context = Context::from_type(&[], DeviceType::GPU)?;
//!     assert!(context != INVALID);
//!
//!     let result = Mem::buffer(context, MemFlags::READ_WRITE, 4096).and_then(|buffer| {
//!         println!("buffer {:?}", buffer);
//!         buffer.dispose()
//!     });
//!
//!     // Release the context whether or not the buffer work succeeded.
//!     context.dispose()?;
//!     result
//! }
//! ```

use std::fmt;
use std::hash::Hash;
use std::mem;
use std::os::raw::c_void;
use std::ptr;

use log::trace;

use crate::error::Result;
use crate::ffi::{self, cl_object, cl_uint, Api, GetInfoFn, ReleaseFn, RetainFn};

/// The closed set of handle kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Platform,
    Device,
    Context,
    Mem,
    Program,
    CommandQueue,
    Kernel,
    Event,
    Sampler,
}

impl HandleKind {
    /// Every kind, in declaration order.
    pub const ALL: [HandleKind; 9] = [
        HandleKind::Platform,
        HandleKind::Device,
        HandleKind::Context,
        HandleKind::Mem,
        HandleKind::Program,
        HandleKind::CommandQueue,
        HandleKind::Kernel,
        HandleKind::Event,
        HandleKind::Sampler,
    ];

    /// Whether the native library keeps a reference count for this kind.
    ///
    /// Platforms and devices are discovered, never created, so their lifetime
    /// belongs to the driver.
    pub const fn is_ref_counted(self) -> bool {
        !matches!(self, HandleKind::Platform | HandleKind::Device)
    }

    /// Kind name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            HandleKind::Platform => "platform",
            HandleKind::Device => "device",
            HandleKind::Context => "context",
            HandleKind::Mem => "memory object",
            HandleKind::Program => "program",
            HandleKind::CommandQueue => "command queue",
            HandleKind::Kernel => "kernel",
            HandleKind::Event => "event",
            HandleKind::Sampler => "sampler",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A value that wraps one opaque native address.
///
/// Implemented by every handle kind; it cannot be implemented outside this
/// crate.
pub trait Handle: Copy + Eq + Hash + fmt::Debug + Send + Sync + sealed::Sealed {
    /// Kind tag of this handle type.
    const KIND: HandleKind;

    /// The wrapped native pointer, for marshaling.
    fn as_raw(&self) -> cl_object;

    /// The wrapped opaque address.
    #[inline]
    fn address(&self) -> usize {
        self.as_raw() as usize
    }

    /// Check if this handle is valid (non-zero).
    #[inline]
    fn is_valid(&self) -> bool {
        !is_invalid(self)
    }
}

/// The "no object" sentinel, comparable with every handle kind.
///
/// `handle == INVALID` and `INVALID == handle` hold iff the handle's address
/// is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidHandle;

/// The invalid-handle sentinel.
pub const INVALID: InvalidHandle = InvalidHandle;

/// Check whether any handle is the zero address.
///
/// This is the one comparison behind every sentinel check.
#[inline]
pub fn is_invalid<H: Handle>(handle: &H) -> bool {
    handle.address() == 0
}

impl<H: Handle> PartialEq<H> for InvalidHandle {
    fn eq(&self, handle: &H) -> bool {
        is_invalid(handle)
    }
}

/// Retain/release protocol for handle kinds backed by a native reference count.
///
/// Each kind only selects its native entry points; the operations are
/// implemented once here. Nothing on the handle records whether it was
/// already disposed.
pub trait RefCounted: Handle {
    /// Native retain entry point name.
    const RETAIN_ENTRY: &'static str;
    /// Native release entry point name.
    const RELEASE_ENTRY: &'static str;
    /// Native info entry point name.
    const INFO_ENTRY: &'static str;
    /// Info parameter that reports the reference count.
    const REFERENCE_COUNT_PARAM: cl_uint;

    /// Select the native retain function from the dispatch table.
    fn retain_fn(api: &Api) -> RetainFn;

    /// Select the native release function from the dispatch table.
    fn release_fn(api: &Api) -> ReleaseFn;

    /// Select the native info function from the dispatch table.
    fn info_fn(api: &Api) -> GetInfoFn;

    /// Increment the native reference count.
    fn retain(&self) -> Result<()> {
        let api = ffi::active()?;
        trace!("retain {} {:#x}", Self::KIND, self.address());
        let status = unsafe { (Self::retain_fn(&api))(self.as_raw()) };
        ffi::check_status(status, Self::RETAIN_ENTRY)
    }

    /// Decrement the native reference count.
    ///
    /// At zero the native library destroys the object and every copy of this
    /// handle must no longer be used. Calling this twice for one acquisition
    /// is undefined behavior at the native layer.
    fn dispose(self) -> Result<()> {
        let api = ffi::active()?;
        trace!("release {} {:#x}", Self::KIND, self.address());
        let status = unsafe { (Self::release_fn(&api))(self.as_raw()) };
        ffi::check_status(status, Self::RELEASE_ENTRY)
    }

    /// Query the native reference count.
    ///
    /// The value is stale as soon as it is returned; use it for diagnostics
    /// only.
    fn reference_count(&self) -> Result<u32> {
        let api = ffi::active()?;
        let mut count: cl_uint = 0;
        let status = unsafe {
            (Self::info_fn(&api))(
                self.as_raw(),
                Self::REFERENCE_COUNT_PARAM,
                mem::size_of::<cl_uint>(),
                &mut count as *mut cl_uint as *mut c_void,
                ptr::null_mut(),
            )
        };
        ffi::check_status(status, Self::INFO_ENTRY)?;
        trace!("{} {:#x} reference count {}", Self::KIND, self.address(), count);
        Ok(count)
    }
}

/// Macro to define a handle type.
macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            ptr: cl_object,
        }

        impl $name {
            /// Create an invalid (null) handle.
            #[inline]
            pub const fn invalid() -> Self {
                Self {
                    ptr: ptr::null_mut(),
                }
            }

            /// Wrap an address returned by the native library.
            #[inline]
            pub(crate) const fn from_raw(ptr: cl_object) -> Self {
                Self { ptr }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl sealed::Sealed for $name {}

        impl Handle for $name {
            const KIND: HandleKind = HandleKind::$kind;

            #[inline]
            fn as_raw(&self) -> cl_object {
                self.ptr
            }
        }

        impl PartialEq<InvalidHandle> for $name {
            fn eq(&self, _: &InvalidHandle) -> bool {
                is_invalid(self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self.address())
            }
        }

        // Handles are plain addresses; thread safety of the object is the
        // native library's concern.
        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}
    };
}

/// Macro to route a handle kind to its native reference-count entry points.
macro_rules! ref_counted {
    ($name:ident {
        retain: $retain:ident = $retain_entry:literal,
        release: $release:ident = $release_entry:literal,
        info: $info:ident = $info_entry:literal,
        count: $param:path $(,)?
    }) => {
        impl RefCounted for $name {
            const RETAIN_ENTRY: &'static str = $retain_entry;
            const RELEASE_ENTRY: &'static str = $release_entry;
            const INFO_ENTRY: &'static str = $info_entry;
            const REFERENCE_COUNT_PARAM: cl_uint = $param;

            fn retain_fn(api: &Api) -> RetainFn {
                api.$retain
            }

            fn release_fn(api: &Api) -> ReleaseFn {
                api.$release
            }

            fn info_fn(api: &Api) -> GetInfoFn {
                api.$info
            }
        }
    };
}

define_handle! {
    /// An OpenCL platform. Discovered through [`platforms`](crate::platforms).
    Platform => Platform
}
define_handle! {
    /// A compute device of a platform.
    Device => Device
}
define_handle! {
    /// An OpenCL context.
    Context => Context
}
define_handle! {
    /// A memory object (buffer or image) bound to a context.
    Mem => Mem
}
define_handle! {
    /// A program bound to a context.
    Program => Program
}
define_handle! {
    /// A command queue bound to a context and a device.
    CommandQueue => CommandQueue
}
define_handle! {
    /// A kernel created from a built program.
    Kernel => Kernel
}
define_handle! {
    /// An event produced by an enqueued command or created by the user.
    Event => Event
}
define_handle! {
    /// An image sampler.
    Sampler => Sampler
}

ref_counted!(Context {
    retain: retain_context = "clRetainContext",
    release: release_context = "clReleaseContext",
    info: get_context_info = "clGetContextInfo",
    count: ffi::CL_CONTEXT_REFERENCE_COUNT,
});

ref_counted!(Mem {
    retain: retain_mem_object = "clRetainMemObject",
    release: release_mem_object = "clReleaseMemObject",
    info: get_mem_object_info = "clGetMemObjectInfo",
    count: ffi::CL_MEM_REFERENCE_COUNT,
});

ref_counted!(Program {
    retain: retain_program = "clRetainProgram",
    release: release_program = "clReleaseProgram",
    info: get_program_info = "clGetProgramInfo",
    count: ffi::CL_PROGRAM_REFERENCE_COUNT,
});

ref_counted!(CommandQueue {
    retain: retain_command_queue = "clRetainCommandQueue",
    release: release_command_queue = "clReleaseCommandQueue",
    info: get_command_queue_info = "clGetCommandQueueInfo",
    count: ffi::CL_QUEUE_REFERENCE_COUNT,
});

ref_counted!(Kernel {
    retain: retain_kernel = "clRetainKernel",
    release: release_kernel = "clReleaseKernel",
    info: get_kernel_info = "clGetKernelInfo",
    count: ffi::CL_KERNEL_REFERENCE_COUNT,
});

ref_counted!(Event {
    retain: retain_event = "clRetainEvent",
    release: release_event = "clReleaseEvent",
    info: get_event_info = "clGetEventInfo",
    count: ffi::CL_EVENT_REFERENCE_COUNT,
});

ref_counted!(Sampler {
    retain: retain_sampler = "clRetainSampler",
    release: release_sampler = "clReleaseSampler",
    info: get_sampler_info = "clGetSamplerInfo",
    count: ffi::CL_SAMPLER_REFERENCE_COUNT,
});
