//! Member discovery: turns a type's declaration table into a [`TypeDescriptor`].

use alloc::vec::Vec;

use refract_utils::hash::HashMap;

use crate::declare::{Mapped, Member, MemberDeclaration, MemberDeclarations, UpdateTestDeclaration};
use crate::error::{DescribeError, MemberKind};
use crate::info::{ConstructorDescriptor, FieldAccess, PropertyDescriptor, ReadFn, Type, WriteFn};
use crate::info::TypeDescriptor;

/// Builds the [`TypeDescriptor`] of `T` from its [`Mapped`] declarations.
///
/// Declarations sharing a logical name are merged into one property: a
/// field supplies the write path when there is no setter, and the read path
/// when there is no getter. Properties are ordered by the first declaration
/// of their name.
///
/// Every problem found is logged; the first one, in declaration order, is
/// returned. Describing is pure: calling it twice yields equal descriptors.
///
/// # Errors
///
/// - [`DescribeError::ConflictingMapping`] if declarations of one name,
///   update tests included, disagree on the value type.
/// - [`DescribeError::DuplicateDeclaration`] if two fields, getters, setters
///   or update tests share a name.
/// - [`DescribeError::SetterWithoutReadPath`] if a setter has no getter or field.
/// - [`DescribeError::UnknownUpdateTestProperty`] if an update test names no property.
/// - A constructor error if a constructor binds an unknown property, binds a
///   property twice, disagrees with a property's type, or has the wrong arity.
pub fn describe<T: Mapped>() -> Result<TypeDescriptor, DescribeError> {
    let ty = Type::of::<T>();
    let mut members = MemberDeclarations::<T>::new();
    T::declare(&mut members);

    let (declarations, constructors, update_tests) = members.into_parts();
    let mut problems = Vec::new();

    let mut properties = merge_members(ty, declarations, &mut problems);
    apply_update_tests(ty, &mut properties, update_tests, &mut problems);
    check_constructors(ty, &properties, &constructors, &mut problems);

    if let Some(first) = problems.first() {
        log::error!("Error(s) describing `{}`:", ty.path());
        for problem in &problems {
            log::error!("  {problem}");
        }
        return Err(first.clone());
    }

    log::debug!(
        "described `{}`: {} properties, {} constructors",
        ty.path(),
        properties.len(),
        constructors.len(),
    );

    Ok(TypeDescriptor::new(
        ty,
        properties.into_boxed_slice(),
        constructors.into_boxed_slice(),
    ))
}

// Everything declared under one logical name.
struct Candidate {
    name: &'static str,
    value_type: Type,
    field: Option<FieldAccess>,
    getter: Option<ReadFn>,
    setter: Option<WriteFn>,
}

fn merge_members(
    ty: Type,
    declarations: Vec<MemberDeclaration>,
    problems: &mut Vec<DescribeError>,
) -> Vec<PropertyDescriptor> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut indices: HashMap<&'static str, usize> = HashMap::default();

    for MemberDeclaration {
        name,
        value_type,
        member,
    } in declarations
    {
        let index = *indices.entry(name).or_insert_with(|| {
            candidates.push(Candidate {
                name,
                value_type,
                field: None,
                getter: None,
                setter: None,
            });
            candidates.len() - 1
        });
        let candidate = &mut candidates[index];

        if candidate.value_type != value_type {
            problems.push(DescribeError::ConflictingMapping {
                type_path: ty.path(),
                property: name,
                first: candidate.value_type,
                second: value_type,
            });
            continue;
        }

        let (kind, occupied) = match member {
            Member::Field { read, write } => (
                MemberKind::Field,
                candidate.field.replace(FieldAccess { read, write }).is_some(),
            ),
            Member::Getter(getter) => (MemberKind::Getter, candidate.getter.replace(getter).is_some()),
            Member::Setter(setter) => (MemberKind::Setter, candidate.setter.replace(setter).is_some()),
        };
        if occupied {
            problems.push(DescribeError::DuplicateDeclaration {
                type_path: ty.path(),
                property: name,
                kind,
            });
        }
    }

    let mut properties = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.field.is_none() && candidate.getter.is_none() {
            // Only a setter can leave a name without a read path.
            problems.push(DescribeError::SetterWithoutReadPath {
                type_path: ty.path(),
                property: candidate.name,
            });
            continue;
        }
        properties.push(PropertyDescriptor::new(
            candidate.name,
            candidate.value_type,
            candidate.field,
            candidate.getter,
            candidate.setter,
        ));
    }
    properties
}

fn apply_update_tests(
    ty: Type,
    properties: &mut [PropertyDescriptor],
    update_tests: Vec<UpdateTestDeclaration>,
    problems: &mut Vec<DescribeError>,
) {
    let mut seen: Vec<&'static str> = Vec::with_capacity(update_tests.len());

    for UpdateTestDeclaration {
        name,
        value_type,
        test,
        equals,
    } in update_tests
    {
        let Some(property) = properties.iter_mut().find(|p| p.name() == name) else {
            problems.push(DescribeError::UnknownUpdateTestProperty {
                type_path: ty.path(),
                property: name,
            });
            continue;
        };

        if property.value_type() != value_type {
            problems.push(DescribeError::ConflictingMapping {
                type_path: ty.path(),
                property: name,
                first: property.value_type(),
                second: value_type,
            });
            continue;
        }

        if seen.contains(&name) {
            problems.push(DescribeError::DuplicateDeclaration {
                type_path: ty.path(),
                property: name,
                kind: MemberKind::UpdateTest,
            });
            continue;
        }
        seen.push(name);
        property.set_update_test(test, equals);
    }
}

fn check_constructors(
    ty: Type,
    properties: &[PropertyDescriptor],
    constructors: &[ConstructorDescriptor],
    problems: &mut Vec<DescribeError>,
) {
    for constructor in constructors {
        let bindings = constructor.parameters();
        let types = constructor.parameter_types();

        if bindings.len() != types.len() {
            problems.push(DescribeError::ConstructorArity {
                type_path: ty.path(),
                constructor: constructor.name(),
                bindings: bindings.len(),
                parameters: types.len(),
            });
            continue;
        }

        for (index, (&name, &found)) in bindings.iter().zip(types).enumerate() {
            if bindings[..index].contains(&name) {
                problems.push(DescribeError::DuplicateConstructorBinding {
                    type_path: ty.path(),
                    constructor: constructor.name(),
                    property: name,
                });
                continue;
            }

            let Some(property) = properties.iter().find(|p| p.name() == name) else {
                problems.push(DescribeError::UnknownConstructorBinding {
                    type_path: ty.path(),
                    constructor: constructor.name(),
                    property: name,
                });
                continue;
            };

            if property.value_type() != found {
                problems.push(DescribeError::ConstructorParameterType {
                    type_path: ty.path(),
                    constructor: constructor.name(),
                    property: name,
                    expected: property.value_type(),
                    found,
                });
            }
        }
    }
}
