//! Runtime object mapping.
//!
//! A type opts in by implementing [`Mapped`], declaring its fields, accessor
//! methods and constructors under logical property names. From these
//! declarations:
//!
//! - [`describe`] builds a [`TypeDescriptor`]: one merged
//!   [`PropertyDescriptor`] per logical name, in declaration order.
//! - [`TypeDescriptor::select_constructor`] picks the preferred, then narrowest, constructor
//!   able to set a given set of properties.
//! - [`TypeDescriptor::update`] applies a [`ChangeSet`] to an instance, in
//!   place when only mutable properties change, through a new instance
//!   otherwise.
//! - [`TypeRegistry`] memoizes descriptors, building each at most once.
//!
//! # Example
//!
//! ```
//! use refract_mapper::registry::TypeRegistry;
//! use refract_mapper::{Applied, ChangeSet, Mapped, MemberDeclarations};
//!
//! #[derive(Debug, PartialEq)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! impl User {
//!     fn name(&self) -> String {
//!         self.name.clone()
//!     }
//!
//!     fn set_name(&mut self, name: String) {
//!         self.name = name;
//!     }
//! }
//!
//! impl Mapped for User {
//!     fn declare(members: &mut MemberDeclarations<Self>) {
//!         members
//!             .readonly_field("id", |u| &u.id)
//!             .getter("name", User::name)
//!             .setter("name", User::set_name)
//!             .constructor("new", &["id"], |id: u64| User { id, name: String::new() });
//!     }
//! }
//!
//! let registry = TypeRegistry::new();
//! let mut user = Some(User { id: 1, name: "ann".into() });
//!
//! let changes = ChangeSet::new().with("name", String::from("bob"));
//! assert_eq!(registry.update(&mut user, changes).unwrap(), Applied::Mutated);
//!
//! let changes = ChangeSet::new().with("id", 2_u64);
//! assert_eq!(registry.update(&mut user, changes).unwrap(), Applied::Constructed);
//! assert_eq!(user, Some(User { id: 2, name: "bob".into() }));
//! ```
//!
//! # Features
//!
//! - `auto_register`: [`impl_auto_register!`] and [`TypeRegistry::auto_register`].
//! - `debug`: trace logging of every property write, in debug builds only.
//!
//! [`TypeDescriptor`]: info::TypeDescriptor
//! [`TypeDescriptor::select_constructor`]: info::TypeDescriptor::select_constructor
//! [`TypeDescriptor::update`]: info::TypeDescriptor::update
//! [`PropertyDescriptor`]: info::PropertyDescriptor
//! [`TypeRegistry`]: registry::TypeRegistry
//! [`TypeRegistry::auto_register`]: registry::TypeRegistry::auto_register

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Macros

/// Trace logging compiled only with the `debug` feature in debug builds.
macro_rules! debug_trace {
    ($($arg:tt)*) => {
        #[cfg(all(debug_assertions, feature = "debug"))]
        ::log::trace!($($arg)*);
    };
}

pub(crate) use debug_trace;

/// Submits a [`Mapped`] type for [`TypeRegistry::auto_register`](crate::registry::TypeRegistry::auto_register).
///
/// Expands to nothing without the `auto_register` feature.
///
/// Generic types need concrete arguments.
///
/// ## Example
///
/// ```ignore
/// impl_auto_register!(foo::Foo);
/// impl_auto_register!(Wrapper<u32>); // Ok
/// impl_auto_register!(Wrapper<T>); // Error
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! impl_auto_register {
    ($ty:ty) => {
        const _: () = {
            $crate::__macro_exports::auto_register::inventory::submit! {
                $crate::__macro_exports::auto_register::AutoRegistration(
                    $crate::__macro_exports::auto_register::register::<$ty>
                )
            }
        };
    };
}

/// Submits a [`Mapped`] type for automatic registration.
///
/// The `auto_register` feature is disabled, so this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! impl_auto_register {
    ($ty:ty) => {};
}

// -----------------------------------------------------------------------------
// Modules

mod change_set;
mod declare;
mod describe;
mod select;
mod update;
mod value;

pub mod error;
pub mod info;
pub mod registry;

#[cfg(test)]
mod fixtures;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use change_set::ChangeSet;
pub use declare::{Mapped, MemberDeclarations};
pub use describe::describe;
pub use update::{Applied, Updated};
pub use value::Value;
