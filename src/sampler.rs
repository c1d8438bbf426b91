//! Sampler creation.

use log::debug;

use crate::error::Result;
use crate::ffi::{self, CL_FALSE, CL_TRUE};
use crate::handle::{Context, Handle, Sampler};
use crate::types::{AddressingMode, FilterMode};

impl Sampler {
    /// Create a sampler.
    pub fn new(
        context: Context,
        normalized_coords: bool,
        addressing_mode: AddressingMode,
        filter_mode: FilterMode,
    ) -> Result<Sampler> {
        let api = ffi::active()?;

        let mut status = ffi::CL_SUCCESS;
        let raw = unsafe {
            (api.create_sampler)(
                context.as_raw(),
                if normalized_coords { CL_TRUE } else { CL_FALSE },
                addressing_mode as u32,
                filter_mode as u32,
                &mut status,
            )
        };
        let sampler = Sampler::from_raw(ffi::check_created(raw, status, "clCreateSampler")?);
        debug!("created {:?} ({:?}, {:?})", sampler, addressing_mode, filter_mode);
        Ok(sampler)
    }
}
