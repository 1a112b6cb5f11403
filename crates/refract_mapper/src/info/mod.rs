//! Descriptors produced by member discovery.
//!
//! ## Menu
//!
//! - [`Type`]: a `TypeId` with its type path.
//! - [`PropertyDescriptor`]: one logical property, merged from a field, a getter and a setter.
//! - [`ConstructorDescriptor`]: one candidate constructor and its parameter bindings.
//! - [`TypeDescriptor`]: all properties and constructors of a mapped type.
//! - [`UpdateTest`]: whether a supplied value counts as a change.
//! - [`Construct`]: implemented by functions usable as constructors.

// -----------------------------------------------------------------------------
// Modules

mod constructor;
mod property;
mod ty;
mod type_descriptor;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use property::{EqFn, FieldAccess, ReadFn, WriteFn};
pub(crate) use property::{erase_field_read, erase_field_write, erase_getter, erase_setter};
pub(crate) use property::erase_eq;

// -----------------------------------------------------------------------------
// Exports

pub use constructor::{Construct, ConstructorArgs, ConstructorDescriptor};
pub use property::{PropertyDescriptor, UpdateTest};
pub use ty::Type;
pub use type_descriptor::TypeDescriptor;
