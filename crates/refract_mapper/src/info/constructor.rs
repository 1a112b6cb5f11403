use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::Value;
use crate::error::ConstructError;
use crate::info::Type;

// -----------------------------------------------------------------------------
// ConstructorArgs

/// Resolved constructor arguments, in parameter order.
///
/// Every argument can be taken once.
#[derive(Debug)]
pub struct ConstructorArgs {
    values: Vec<Option<Value>>,
}

impl ConstructorArgs {
    #[inline]
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// Returns the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Moves the argument at `index` out as a `V`.
    pub fn take<V: Any>(&mut self, index: usize) -> Result<V, ConstructError> {
        let value = self
            .values
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(ConstructError::MissingArgument { index })?;

        value.take::<V>().map_err(|value| {
            let found = value.value_type();
            // Put it back so the caller can still report or retry.
            self.values[index] = Some(value);
            ConstructError::MismatchedArgument {
                index,
                expected: Type::of::<V>(),
                found,
            }
        })
    }
}

// -----------------------------------------------------------------------------
// Construct

/// A function usable as a mapped type's constructor.
///
/// Implemented for every `Fn(A0, .., An) -> T` with up to eight parameters.
/// Fn items (`Point::new`) and closures with annotated parameters both work.
///
/// # Examples
///
/// ```
/// use refract_mapper::Value;
/// use refract_mapper::error::ConstructError;
/// use refract_mapper::info::{Construct, ConstructorArgs};
///
/// fn pair(a: i32, b: String) -> (i32, String) {
///     (a, b)
/// }
///
/// fn call<T, Args>(function: impl Construct<T, Args>, args: Vec<Value>) -> Result<T, ConstructError> {
///     function.construct(&mut ConstructorArgs::new(args))
/// }
///
/// let built = call(pair, vec![Value::new(1_i32), Value::new(String::from("b"))]).unwrap();
/// assert_eq!(built, (1, String::from("b")));
///
/// let err = call(pair, vec![Value::new(1_u8), Value::new(String::new())]).unwrap_err();
/// assert!(matches!(err, ConstructError::MismatchedArgument { index: 0, .. }));
/// ```
pub trait Construct<T, Args>: Send + Sync + 'static {
    /// Returns the parameter types, in order.
    fn parameter_types(&self) -> Vec<Type>;

    /// Calls the function with arguments taken from `args`.
    fn construct(&self, args: &mut ConstructorArgs) -> Result<T, ConstructError>;
}

macro_rules! impl_construct {
    ($($arg:ident : $index:tt),*) => {
        impl<T, F, $($arg: Any),*> Construct<T, ($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> T + Send + Sync + 'static,
        {
            fn parameter_types(&self) -> Vec<Type> {
                alloc::vec![$(Type::of::<$arg>()),*]
            }

            #[allow(unused_variables, reason = "nullary constructors take no arguments")]
            fn construct(&self, args: &mut ConstructorArgs) -> Result<T, ConstructError> {
                Ok(self($(args.take::<$arg>($index)?),*))
            }
        }
    };
}

impl_construct!();
impl_construct!(A0: 0);
impl_construct!(A0: 0, A1: 1);
impl_construct!(A0: 0, A1: 1, A2: 2);
impl_construct!(A0: 0, A1: 1, A2: 2, A3: 3);
impl_construct!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4);
impl_construct!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5);
impl_construct!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5, A6: 6);
impl_construct!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5, A6: 6, A7: 7);

// -----------------------------------------------------------------------------
// ConstructorDescriptor

pub(crate) type ConstructFn =
    Arc<dyn Fn(&mut ConstructorArgs) -> Result<Box<dyn Any>, ConstructError> + Send + Sync>;

/// A candidate constructor of a mapped type.
///
/// Each parameter is bound to a property by logical name; `parameters` and
/// `parameter_types` have the same length and order.
///
/// Constructors with a higher priority are preferred during selection,
/// whatever their parameter count. The default priority is `0`.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    name: &'static str,
    priority: i32,
    parameters: Box<[&'static str]>,
    parameter_types: Box<[Type]>,
    construct: ConstructFn,
}

impl ConstructorDescriptor {
    pub(crate) fn new<T: Any, Args: 'static>(
        name: &'static str,
        parameters: &[&'static str],
        function: impl Construct<T, Args>,
    ) -> Self {
        let parameter_types = function.parameter_types().into_boxed_slice();
        let construct: ConstructFn = Arc::new(move |args: &mut ConstructorArgs| {
            let instance: Box<dyn Any> = Box::new(function.construct(args)?);
            Ok(instance)
        });

        Self {
            name,
            priority: 0,
            parameters: parameters.into(),
            parameter_types,
            construct,
        }
    }

    #[inline]
    pub(crate) fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the label given to the constructor when it was declared.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the property names bound to each parameter, in parameter order.
    #[inline]
    pub fn parameters(&self) -> &[&'static str] {
        &self.parameters
    }

    /// Returns the parameter types, in parameter order.
    #[inline]
    pub fn parameter_types(&self) -> &[Type] {
        &self.parameter_types
    }

    #[inline]
    pub fn parameter_len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns `true` if some parameter is bound to `property`.
    #[inline]
    pub fn binds(&self, property: &str) -> bool {
        self.parameters.iter().any(|name| *name == property)
    }

    /// Creates a new instance from arguments in parameter order.
    pub fn construct(&self, arguments: Vec<Value>) -> Result<Box<dyn Any>, ConstructError> {
        if arguments.len() != self.parameters.len() {
            return Err(ConstructError::ArgumentCount {
                expected: self.parameters.len(),
                found: arguments.len(),
            });
        }
        (self.construct)(&mut ConstructorArgs::new(arguments))
    }
}

impl PartialEq for ConstructorDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.priority == other.priority
            && self.parameters == other.parameters
            && self.parameter_types == other.parameter_types
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("parameters", &self.parameters)
            .field("parameter_types", &self.parameter_types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::{ConstructorArgs, ConstructorDescriptor};
    use crate::Value;
    use crate::error::ConstructError;
    use crate::info::Type;

    fn label(id: u32, text: String) -> (u32, String) {
        (id, text)
    }

    #[test]
    fn records_parameter_types() {
        let ctor = ConstructorDescriptor::new("label", &["id", "text"], label);
        assert_eq!(ctor.parameters(), &["id", "text"]);
        assert_eq!(ctor.parameter_types(), &[Type::of::<u32>(), Type::of::<String>()]);
        assert!(ctor.binds("text"));
        assert!(!ctor.binds("label"));
        assert_eq!(ctor.priority(), 0);
        assert_eq!(ctor.clone().with_priority(3).priority(), 3);
        assert_ne!(ctor.clone().with_priority(3), ctor);
    }

    #[test]
    fn constructs_in_parameter_order() {
        let ctor = ConstructorDescriptor::new("label", &["id", "text"], label);
        let built = ctor
            .construct(vec![Value::new(3_u32), Value::new(String::from("three"))])
            .unwrap();
        let built = built.downcast::<(u32, String)>().unwrap();
        assert_eq!(*built, (3, String::from("three")));
    }

    #[test]
    fn rejects_mistyped_argument() {
        let ctor = ConstructorDescriptor::new("label", &["id", "text"], label);
        let err = ctor
            .construct(vec![Value::new(3_i64), Value::new(String::new())])
            .unwrap_err();
        assert!(matches!(err, ConstructError::MismatchedArgument { index: 0, .. }));

        let err = ctor.construct(vec![Value::new(3_u32)]).unwrap_err();
        assert!(matches!(
            err,
            ConstructError::ArgumentCount { expected: 2, found: 1 }
        ));
    }

    #[test]
    fn argument_taken_once() {
        let mut args = ConstructorArgs::new(vec![Value::new(1_u8)]);
        assert_eq!(args.take::<u8>(0).unwrap(), 1);
        assert!(matches!(
            args.take::<u8>(0),
            Err(ConstructError::MissingArgument { index: 0 })
        ));
    }

    #[test]
    fn nullary_constructor() {
        let ctor = ConstructorDescriptor::new("unit", &[], || 42_u64);
        assert_eq!(ctor.parameter_len(), 0);
        let built = ctor.construct(vec![]).unwrap();
        assert_eq!(built.downcast_ref::<u64>(), Some(&42));
    }
}
