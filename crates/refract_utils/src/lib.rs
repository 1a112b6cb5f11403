//! Containers shared by the `refract` crates.
//!
//! - [`hash`]: `hashbrown` maps with fixed `foldhash` seeds.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;

mod typeid_map;

// -----------------------------------------------------------------------------
// Exports

pub use typeid_map::TypeIdMap;
