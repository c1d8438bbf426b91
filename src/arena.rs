//! An owning layer over reference-counted handles.
//!
//! Handle values carry no ownership, so nothing stops a caller from using a
//! handle after its last release. [`HandleArena`] owns acquisitions instead:
//! each live entry stands for exactly one native reference, callers hold
//! [`ArenaKey`]s, and a key whose entry was released is rejected with
//! [`Error::StaleKey`] before anything reaches the native layer.

use std::fmt;
use std::marker::PhantomData;

use log::{trace, warn};

use crate::error::{Error, Result};
use crate::handle::RefCounted;

/// Names one live entry of a [`HandleArena`].
pub struct ArenaKey<H> {
    index: u32,
    generation: u32,
    _kind: PhantomData<fn() -> H>,
}

impl<H> ArenaKey<H> {
    fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _kind: PhantomData,
        }
    }
}

impl<H> Clone for ArenaKey<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for ArenaKey<H> {}

impl<H> PartialEq for ArenaKey<H> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<H> Eq for ArenaKey<H> {}

impl<H> std::hash::Hash for ArenaKey<H> {
    fn hash<S: std::hash::Hasher>(&self, state: &mut S) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<H> fmt::Debug for ArenaKey<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaKey({}v{})", self.index, self.generation)
    }
}

struct Slot<H> {
    generation: u32,
    handle: Option<H>,
}

/// Generational arena of owned handle acquisitions.
///
/// Dropping the arena releases every entry that is still live.
pub struct HandleArena<H: RefCounted> {
    slots: Vec<Slot<H>>,
    free: Vec<u32>,
    live: usize,
}

impl<H: RefCounted> HandleArena<H> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Take ownership of one acquisition of `handle`.
    ///
    /// The handle must come from a creation call or a retain that has not
    /// been released yet.
    pub fn insert(&mut self, handle: H) -> ArenaKey<H> {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.handle = Some(handle);
            return ArenaKey::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            handle: Some(handle),
        });
        ArenaKey::new(index, 0)
    }

    /// The handle behind a live key.
    pub fn get(&self, key: ArenaKey<H>) -> Result<H> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.handle)
            .ok_or(Error::StaleKey)
    }

    /// Check whether the key still names a live entry.
    pub fn contains(&self, key: ArenaKey<H>) -> bool {
        self.get(key).is_ok()
    }

    /// Retain the handle behind `key` and own the new reference under a
    /// second key.
    pub fn share(&mut self, key: ArenaKey<H>) -> Result<ArenaKey<H>> {
        let handle = self.get(key)?;
        handle.retain()?;
        Ok(self.insert(handle))
    }

    /// Give the acquisition back to the caller without releasing it.
    pub fn take(&mut self, key: ArenaKey<H>) -> Result<H> {
        let handle = self.get(key)?;
        self.vacate(key.index);
        Ok(handle)
    }

    /// Release the acquisition behind `key`.
    ///
    /// The entry is removed even when the native release fails, so a failed
    /// release is never retried through this arena.
    pub fn release(&mut self, key: ArenaKey<H>) -> Result<()> {
        let handle = self.take(key)?;
        trace!("arena releasing {:?}", handle);
        handle.dispose()
    }

    /// Release every live entry.
    ///
    /// Every entry is attempted; the first failure is returned.
    pub fn release_all(&mut self) -> Result<()> {
        let mut first = None;
        for index in 0..self.slots.len() {
            let Some(handle) = self.slots[index].handle else {
                continue;
            };
            self.vacate(index as u32);
            if let Err(e) = handle.dispose() {
                warn!("failed to release {:?}: {}", handle, e);
                first.get_or_insert(e);
            }
        }
        match first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn vacate(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.handle = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.live -= 1;
    }
}

impl<H: RefCounted> Default for HandleArena<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: RefCounted> Drop for HandleArena<H> {
    fn drop(&mut self) {
        // Errors are logged by release_all
        let _ = self.release_all();
    }
}
