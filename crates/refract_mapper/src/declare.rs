use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use crate::info::{Construct, ConstructorDescriptor, Type, UpdateTest};
use crate::info::{EqFn, ReadFn, WriteFn};
use crate::info::{erase_eq, erase_field_read, erase_field_write, erase_getter, erase_setter};

// -----------------------------------------------------------------------------
// Mapped

/// A type whose members can be discovered by the mapper.
///
/// Implementations list the type's mapped members once; the result is
/// turned into a [`TypeDescriptor`] by [`describe`] and cached by the
/// [`TypeRegistry`].
///
/// # Examples
///
/// ```
/// use refract_mapper::{Mapped, MemberDeclarations, describe};
///
/// struct Counter {
///     step: u32,
///     total: u64,
/// }
///
/// impl Counter {
///     fn new(step: u32) -> Self {
///         Self { step, total: 0 }
///     }
/// }
///
/// impl Mapped for Counter {
///     fn declare(members: &mut MemberDeclarations<Self>) {
///         members
///             .readonly_field("step", |c| &c.step)
///             .field("total", |c| &c.total, |c| &mut c.total)
///             .constructor("new", &["step"], Counter::new);
///     }
/// }
///
/// let descriptor = describe::<Counter>().unwrap();
/// assert!(descriptor.property("step").unwrap().is_immutable());
/// assert!(descriptor.property("total").unwrap().is_mutable());
/// ```
///
/// [`TypeDescriptor`]: crate::info::TypeDescriptor
/// [`describe`]: crate::describe
/// [`TypeRegistry`]: crate::registry::TypeRegistry
pub trait Mapped: Any + Sized {
    /// Declares the mapped fields, accessors and constructors of `Self`.
    fn declare(members: &mut MemberDeclarations<Self>);
}

// -----------------------------------------------------------------------------
// MemberDeclarations

pub(crate) enum Member {
    Field { read: ReadFn, write: Option<WriteFn> },
    Getter(ReadFn),
    Setter(WriteFn),
}

pub(crate) struct MemberDeclaration {
    pub(crate) name: &'static str,
    pub(crate) value_type: Type,
    pub(crate) member: Member,
}

pub(crate) struct UpdateTestDeclaration {
    pub(crate) name: &'static str,
    pub(crate) value_type: Type,
    pub(crate) test: UpdateTest,
    pub(crate) equals: EqFn,
}

/// The declaration table of a mapped type `T`.
///
/// Every member is registered under a logical property name, which does not
/// have to match the Rust member name. Declarations sharing a logical name
/// are merged into one property; declaration order is kept.
pub struct MemberDeclarations<T> {
    members: Vec<MemberDeclaration>,
    constructors: Vec<ConstructorDescriptor>,
    update_tests: Vec<UpdateTestDeclaration>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> MemberDeclarations<T> {
    pub(crate) fn new() -> Self {
        Self {
            members: Vec::new(),
            constructors: Vec::new(),
            update_tests: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Vec<MemberDeclaration>, Vec<ConstructorDescriptor>, Vec<UpdateTestDeclaration>) {
        (self.members, self.constructors, self.update_tests)
    }

    fn push(&mut self, name: &'static str, value_type: Type, member: Member) -> &mut Self {
        self.members.push(MemberDeclaration {
            name,
            value_type,
            member,
        });
        self
    }

    /// Declares a field that can be read and written.
    pub fn field<V: Any + Clone>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> &mut Self {
        let member = Member::Field {
            read: erase_field_read(get),
            write: Some(erase_field_write(get_mut)),
        };
        self.push(name, Type::of::<V>(), member)
    }

    /// Declares a field that can only be read, i.e. a field fixed at construction.
    pub fn readonly_field<V: Any + Clone>(&mut self, name: &'static str, get: fn(&T) -> &V) -> &mut Self {
        let member = Member::Field {
            read: erase_field_read(get),
            write: None,
        };
        self.push(name, Type::of::<V>(), member)
    }

    /// Declares a getter method.
    pub fn getter<V: Any>(&mut self, name: &'static str, getter: fn(&T) -> V) -> &mut Self {
        self.push(name, Type::of::<V>(), Member::Getter(erase_getter(getter)))
    }

    /// Declares a setter method. The property also needs a getter or a field.
    pub fn setter<V: Any>(&mut self, name: &'static str, setter: fn(&mut T, V)) -> &mut Self {
        self.push(name, Type::of::<V>(), Member::Setter(erase_setter(setter)))
    }

    /// Declares a constructor, binding its parameters to properties by name.
    ///
    /// `parameters[i]` is the property passed as the `i`-th argument.
    pub fn constructor<Args: 'static>(
        &mut self,
        name: &'static str,
        parameters: &[&'static str],
        function: impl Construct<T, Args>,
    ) -> &mut Self {
        self.constructor_with_priority(name, 0, parameters, function)
    }

    /// Declares a constructor with an explicit selection priority.
    ///
    /// Among the constructors able to set the required properties, the one
    /// with the highest priority wins; parameter count only breaks ties.
    pub fn constructor_with_priority<Args: 'static>(
        &mut self,
        name: &'static str,
        priority: i32,
        parameters: &[&'static str],
        function: impl Construct<T, Args>,
    ) -> &mut Self {
        self.constructors
            .push(ConstructorDescriptor::new(name, parameters, function).with_priority(priority));
        self
    }

    /// Sets the [`UpdateTest`] of the property `name`, whose values are `V`s.
    ///
    /// With [`UpdateTest::ValueChanged`], an update drops supplied values
    /// equal to the instance's current value.
    pub fn update_test<V: Any + PartialEq>(&mut self, name: &'static str, test: UpdateTest) -> &mut Self {
        self.update_tests.push(UpdateTestDeclaration {
            name,
            value_type: Type::of::<V>(),
            test,
            equals: erase_eq::<V>(),
        });
        self
    }
}
