//! Memoized type descriptors.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: a thread-safe cache of [`TypeDescriptor`]s, built on first use.
//! - [`impl_auto_register`]: submits a type for [`TypeRegistry::auto_register`].
//!
//! ## auto_register
//!
//! Static registration is collected through the [`inventory`] crate, which
//! covers the major desktop, mobile and web targets.
//! On other targets [`TypeRegistry::auto_register`] returns `false`
//! and types are still described lazily on first [`TypeRegistry::get`].
//!
//! [`TypeDescriptor`]: crate::info::TypeDescriptor
//! [`impl_auto_register`]: crate::impl_auto_register
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_registry::TypeRegistry;
