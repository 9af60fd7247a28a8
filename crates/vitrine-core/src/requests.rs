//! Request ids for asynchronous asset loads
//!
//! Every edit that changes the primary object's geometry or material issues a new
//! id for its slot, synchronous edits included. An asynchronous completion may
//! only commit while its id is still the latest for the slot; anything older is
//! stale and gets dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the primary object a request replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetSlot {
    /// Shape, teapot mesh, or generated text
    Geometry,
    /// Material or texture
    Material,
}

impl fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSlot::Geometry => f.write_str("geometry"),
            AssetSlot::Material => f.write_str("material"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId {
    pub slot: AssetSlot,
    pub seq: u64,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.slot, self.seq)
    }
}

/// Outcome of checking a completion against the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Latest request for its slot; apply it
    Current,
    /// Superseded by a newer request; drop it
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    geometry: u64,
    material: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&mut self, slot: AssetSlot) -> &mut u64 {
        match slot {
            AssetSlot::Geometry => &mut self.geometry,
            AssetSlot::Material => &mut self.material,
        }
    }

    /// Issue a new id, superseding every earlier request for the slot
    pub fn issue(&mut self, slot: AssetSlot) -> RequestId {
        let counter = self.counter(slot);
        *counter += 1;
        RequestId { slot, seq: *counter }
    }

    pub fn latest(&self, slot: AssetSlot) -> u64 {
        match slot {
            AssetSlot::Geometry => self.geometry,
            AssetSlot::Material => self.material,
        }
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest(id.slot) == id.seq
    }

    pub fn check(&self, id: RequestId) -> Completion {
        if self.is_current(id) {
            Completion::Current
        } else {
            tracing::debug!(request = %id, latest = self.latest(id.slot), "Dropping stale completion");
            Completion::Stale
        }
    }
}
