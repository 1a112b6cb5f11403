//! Mapped types shared by the unit tests.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{Mapped, MemberDeclarations};

// -----------------------------------------------------------------------------
// AutoSerializedType

/// A mutable field, an accessor pair with a side effect and a constructor-only field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AutoSerializedType {
    pub(crate) plain_field: Vec<String>,
    pub(crate) accessor_value: i32,
    pub(crate) accessor_string: String,
    pub(crate) final_field: i32,
}

impl AutoSerializedType {
    pub(crate) fn new(final_field: i32) -> Self {
        Self {
            plain_field: Vec::new(),
            accessor_value: 0,
            accessor_string: String::new(),
            final_field,
        }
    }

    pub(crate) fn accessor_value(&self) -> i32 {
        self.accessor_value
    }

    pub(crate) fn set_accessor_value(&mut self, value: i32) {
        self.accessor_value = value;
        self.accessor_string = format!("Value is: {value}");
    }
}

impl Mapped for AutoSerializedType {
    fn declare(members: &mut MemberDeclarations<Self>) {
        members
            .field("plainField", |t| &t.plain_field, |t| &mut t.plain_field)
            .getter("accessorValue", Self::accessor_value)
            .setter("accessorValue", Self::set_accessor_value)
            .readonly_field("finalField", |t| &t.final_field)
            .constructor("new", &["finalField"], Self::new);
    }
}

// -----------------------------------------------------------------------------
// Point

/// Read-only coordinates with overlapping constructors.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) z: i64,
    pub(crate) label: String,
}

impl Point {
    fn at(x: i64, y: i64, z: i64) -> Self {
        Self {
            x,
            y,
            z,
            label: String::new(),
        }
    }
}

impl Mapped for Point {
    fn declare(members: &mut MemberDeclarations<Self>) {
        members
            .readonly_field("x", |p| &p.x)
            .readonly_field("y", |p| &p.y)
            .readonly_field("z", |p| &p.z)
            .field("label", |p| &p.label, |p| &mut p.label)
            .constructor("new", &["x", "y", "z"], Self::at)
            .constructor("on_x_axis", &["x"], |x: i64| Self::at(x, 0, 0))
            .constructor("on_y_axis", &["y"], |y: i64| Self::at(0, y, 0))
            .constructor("planar", &["x", "y"], |x: i64, y: i64| Self::at(x, y, 0))
            .constructor("along_x", &["x"], |x: i64| Self::at(x, 0, 0))
            .constructor("origin", &[], || Self::at(0, 0, 0));
    }
}
