//! Error types of the mapper.
//!
//! - [`DescribeError`]: a type's declarations cannot be turned into a
//!   [`TypeDescriptor`](crate::info::TypeDescriptor). Fatal for the type.
//! - [`UpdateError`]: a single update call cannot be carried out. Fatal for
//!   that call; the target instance is left untouched.
//! - [`ConstructError`]: a constructor function rejected its arguments.
//!
//! None of these are retried or recovered internally; they point at a
//! mapping configuration bug and are surfaced to the caller.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::info::Type;

// -----------------------------------------------------------------------------
// MemberKind

/// The kind of a member declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Getter,
    Setter,
    UpdateTest,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Field => "field",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::UpdateTest => "update test",
        })
    }
}

// -----------------------------------------------------------------------------
// DescribeError

/// A problem found while building the descriptor of a type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescribeError {
    /// Two declarations claim the same logical name with different value types.
    #[error("`{type_path}`: property `{property}` is declared as both `{first}` and `{second}`")]
    ConflictingMapping {
        type_path: &'static str,
        property: &'static str,
        first: Type,
        second: Type,
    },

    /// Two members of the same kind claim the same logical name.
    #[error("`{type_path}`: property `{property}` has more than one {kind}")]
    DuplicateDeclaration {
        type_path: &'static str,
        property: &'static str,
        kind: MemberKind,
    },

    /// A setter whose property has neither a getter nor a field to read from.
    #[error("`{type_path}`: setter for property `{property}` has no corresponding getter or field")]
    SetterWithoutReadPath {
        type_path: &'static str,
        property: &'static str,
    },

    /// An update test declared for a name that is not a property.
    #[error("`{type_path}`: update test declared for unknown property `{property}`")]
    UnknownUpdateTestProperty {
        type_path: &'static str,
        property: &'static str,
    },

    /// A constructor parameter bound to a name that is not a property.
    #[error("`{type_path}`: constructor `{constructor}` binds unknown property `{property}`")]
    UnknownConstructorBinding {
        type_path: &'static str,
        constructor: &'static str,
        property: &'static str,
    },

    /// A constructor binds the same property to more than one parameter.
    #[error("`{type_path}`: constructor `{constructor}` binds property `{property}` more than once")]
    DuplicateConstructorBinding {
        type_path: &'static str,
        constructor: &'static str,
        property: &'static str,
    },

    /// A constructor parameter's type differs from its property's value type.
    #[error(
        "`{type_path}`: constructor `{constructor}` takes `{found}` for property `{property}` of type `{expected}`"
    )]
    ConstructorParameterType {
        type_path: &'static str,
        constructor: &'static str,
        property: &'static str,
        expected: Type,
        found: Type,
    },

    /// The number of bound names differs from the constructor's arity.
    #[error(
        "`{type_path}`: constructor `{constructor}` has {parameters} parameters but {bindings} property names"
    )]
    ConstructorArity {
        type_path: &'static str,
        constructor: &'static str,
        bindings: usize,
        parameters: usize,
    },
}

// -----------------------------------------------------------------------------
// ConstructError

/// A constructor function could not be called with the resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    #[error("expected {expected} arguments, found {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("argument {index} is missing or was already taken")]
    MissingArgument { index: usize },

    #[error("argument {index} should be `{expected}`, found `{found}`")]
    MismatchedArgument {
        index: usize,
        expected: Type,
        found: Type,
    },
}

// -----------------------------------------------------------------------------
// UpdateError

/// A failed [`update`](crate::info::TypeDescriptor::update) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// The target type could not be described.
    #[error(transparent)]
    Describe(#[from] DescribeError),

    /// No constructor binds every required property.
    #[error("`{type_path}` has no constructor covering [{}]", required.join(", "))]
    NoMatchingConstructor {
        type_path: &'static str,
        required: Vec<String>,
    },

    /// A constructor argument has neither a supplied value nor an instance to read it from.
    #[error("`{type_path}`: no value for constructor parameter `{property}`")]
    MissingValue {
        type_path: &'static str,
        property: &'static str,
    },

    /// The change set names a property the type does not declare.
    #[error("`{type_path}` has no property named `{property}`")]
    PropertyNotFound {
        type_path: &'static str,
        property: Cow<'static, str>,
    },

    /// A supplied value is not of the property's value type.
    #[error("`{type_path}`: property `{property}` expects `{expected}`, found `{found}`")]
    MismatchedValueType {
        type_path: &'static str,
        property: &'static str,
        expected: Type,
        found: Type,
    },

    /// The supplied instance is not of the described type.
    #[error("instance is not a `{expected}`")]
    MismatchedInstanceType { expected: &'static str },

    /// The selected constructor rejected its arguments.
    #[error("`{type_path}`: constructor `{constructor}` failed: {source}")]
    Construction {
        type_path: &'static str,
        constructor: &'static str,
        #[source]
        source: ConstructError,
    },
}
