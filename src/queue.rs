//! Command queue creation.

use log::debug;

use crate::error::Result;
use crate::ffi;
use crate::handle::{CommandQueue, Context, Device, Handle};
use crate::types::CommandQueueProperties;

impl CommandQueue {
    /// Create a command queue for one device of a context.
    pub fn new(context: Context, device: Device, properties: CommandQueueProperties) -> Result<CommandQueue> {
        let api = ffi::active()?;

        let mut status = ffi::CL_SUCCESS;
        let raw = unsafe {
            (api.create_command_queue)(context.as_raw(), device.as_raw(), properties.bits(), &mut status)
        };
        let queue = CommandQueue::from_raw(ffi::check_created(raw, status, "clCreateCommandQueue")?);
        debug!("created {:?} on {:?}", queue, device);
        Ok(queue)
    }
}
