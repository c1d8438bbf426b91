//! User event creation.
//!
//! Most events are produced by enqueued commands, which live outside this
//! crate; user events are the only ones created directly.

use log::debug;

use crate::error::Result;
use crate::ffi;
use crate::handle::{Context, Event, Handle};

impl Event {
    /// Create a user event in a context.
    pub fn user(context: Context) -> Result<Event> {
        let api = ffi::active()?;

        let mut status = ffi::CL_SUCCESS;
        let raw = unsafe { (api.create_user_event)(context.as_raw(), &mut status) };
        let event = Event::from_raw(ffi::check_created(raw, status, "clCreateUserEvent")?);
        debug!("created user {:?} in {:?}", event, context);
        Ok(event)
    }
}
