//! Reference-counted OpenCL object handles.
//!
//! This crate exposes OpenCL's platform, device, context, memory object,
//! program, command queue, kernel, event and sampler objects as typed,
//! pointer-sized handle values. The native library does the real work; this
//! crate forwards creation, retain and release calls to it and turns every
//! failure status into an [`Error`].
//!
//! Handles are `Copy` values without ownership: copying one does not retain
//! the native object and dropping one does not release it. Call
//! [`RefCounted::dispose`] once per acquisition, or hand acquisitions to a
//! [`HandleArena`] to have stale uses caught.
//!
//! # Example
//!
//! ```no_run
//! use clhandle::{CommandQueue, CommandQueueProperties, Context, DeviceType, RefCounted};
//!
//! fn main() -> clhandle::Result<()> {
//!     // Load the OpenCL library
//!     clhandle::init()?;
//!
//!     for platform in clhandle::platforms()? {
//!         println!("{} ({})", platform.name()?, platform.version()?);
//!     }
//!
//!     let platform = clhandle::platforms()?[0];
//!     let device = platform.devices(DeviceType::GPU)?[0];
//!     let context = Context::new(&[], &[device])?;
//!     let queue = CommandQueue::new(context, device, CommandQueueProperties::default())?;
//!
//!     println!("context references: {}", context.reference_count()?);
//!
//!     queue.dispose()?;
//!     context.dispose()?;
//!
//!     clhandle::shutdown();
//!     Ok(())
//! }
//! ```

pub mod arena;
mod context;
pub mod error;
mod event;
pub mod ffi;
pub mod handle;
mod memory;
pub mod platform;
mod program;
mod queue;
mod sampler;
pub mod types;

#[cfg(test)]
mod fake;

// Re-export main types at the crate root
pub use arena::{ArenaKey, HandleArena};
pub use error::{Error, ErrorCode, NativeCallError, Result};
pub use handle::{
    is_invalid, CommandQueue, Context, Device, Event, Handle, HandleKind, InvalidHandle, Kernel,
    Mem, Platform, Program, RefCounted, Sampler, INVALID,
};
pub use platform::platforms;
pub use types::{
    AddressingMode, ChannelOrder, ChannelType, CommandQueueProperties, ContextProperty,
    DeviceType, FilterMode, ImageFormat, LoadOptions, MemFlags,
};

use log::debug;

/// Load the OpenCL library with default options and install its dispatch table.
///
/// Safe to call multiple times; the library is opened once.
pub fn init() -> Result<()> {
    init_with_options(&LoadOptions::default())
}

/// Load the OpenCL library described by `options` and install its dispatch
/// table.
pub fn init_with_options(options: &LoadOptions) -> Result<()> {
    let api = ffi::Api::load(options)?;
    ffi::install(api);
    debug!("OpenCL dispatch table installed");
    Ok(())
}

/// Install a dispatch table assembled by the caller.
pub fn init_with(api: ffi::Api) {
    ffi::install(api);
    debug!("custom OpenCL dispatch table installed");
}

/// Remove the installed dispatch table.
///
/// Afterwards every native operation fails with [`Error::NotInitialized`]
/// until `init` is called again. Native objects are not released.
pub fn shutdown() {
    if ffi::uninstall().is_some() {
        debug!("OpenCL dispatch table removed");
    }
}

/// Check whether a dispatch table is installed.
pub fn is_initialized() -> bool {
    ffi::active().is_ok()
}
