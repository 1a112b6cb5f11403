//! Constructor selection.

use alloc::string::String;
use core::cmp::Reverse;

use crate::error::UpdateError;
use crate::info::{ConstructorDescriptor, TypeDescriptor};

impl TypeDescriptor {
    /// Selects the constructor able to set every property in `required`.
    ///
    /// Among the constructors binding all of `required`, the one with the
    /// highest [priority](ConstructorDescriptor::priority) wins, then the one
    /// with the fewest parameters; ties go to the constructor declared first.
    /// Parameters bound to properties outside `required` have to be filled
    /// in by the caller, usually from an existing instance.
    ///
    /// The result only depends on the descriptor and the set of names, so
    /// repeated calls return the same constructor.
    ///
    /// # Errors
    ///
    /// [`UpdateError::NoMatchingConstructor`] if no constructor binds all of `required`.
    ///
    /// # Examples
    ///
    /// ```
    /// use refract_mapper::{Mapped, MemberDeclarations, describe};
    ///
    /// struct Range {
    ///     start: i64,
    ///     end: i64,
    /// }
    ///
    /// impl Mapped for Range {
    ///     fn declare(members: &mut MemberDeclarations<Self>) {
    ///         members
    ///             .readonly_field("start", |r| &r.start)
    ///             .readonly_field("end", |r| &r.end)
    ///             .constructor("new", &["start", "end"], |start: i64, end: i64| Range { start, end })
    ///             .constructor("empty_at", &["start"], |start: i64| Range { start, end: start });
    ///     }
    /// }
    ///
    /// let descriptor = describe::<Range>().unwrap();
    /// assert_eq!(descriptor.select_constructor(&["start"]).unwrap().name(), "empty_at");
    /// assert_eq!(descriptor.select_constructor(&["end"]).unwrap().name(), "new");
    /// assert!(descriptor.select_constructor(&["length"]).is_err());
    /// ```
    pub fn select_constructor(&self, required: &[&str]) -> Result<&ConstructorDescriptor, UpdateError> {
        // `min_by_key` keeps the first of equal minimums.
        self.constructors()
            .iter()
            .filter(|constructor| required.iter().all(|name| constructor.binds(name)))
            .min_by_key(|constructor| {
                (Reverse(constructor.priority()), constructor.parameter_len())
            })
            .ok_or_else(|| UpdateError::NoMatchingConstructor {
                type_path: self.type_path(),
                required: required.iter().map(|name| String::from(*name)).collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::UpdateError;
    use crate::fixtures::{AutoSerializedType, Point};
    use crate::info::TypeDescriptor;
    use crate::{Mapped, MemberDeclarations, describe};

    fn pick(descriptor: &TypeDescriptor, required: &[&str]) -> &'static str {
        descriptor.select_constructor(required).unwrap().name()
    }

    #[test]
    fn narrowest_covering_constructor() {
        let descriptor = describe::<Point>().unwrap();

        assert_eq!(pick(&descriptor, &["x"]), "on_x_axis");
        assert_eq!(pick(&descriptor, &["y"]), "on_y_axis");
        assert_eq!(pick(&descriptor, &["x", "y"]), "planar");
        assert_eq!(pick(&descriptor, &["y", "x"]), "planar");
        assert_eq!(pick(&descriptor, &["z"]), "new");
        assert_eq!(pick(&descriptor, &["x", "z"]), "new");
        // Nothing required: the nullary constructor.
        assert_eq!(pick(&descriptor, &[]), "origin");
    }

    #[test]
    fn ties_go_to_first_declared() {
        let descriptor = describe::<Point>().unwrap();
        // `on_x_axis` and `along_x` both bind exactly `x`.
        for _ in 0..8 {
            assert_eq!(
                descriptor.select_constructor(&["x"]).unwrap().name(),
                "on_x_axis"
            );
        }
    }

    #[test]
    fn no_covering_constructor() {
        let descriptor = describe::<AutoSerializedType>().unwrap();
        let err = descriptor
            .select_constructor(&["finalField", "accessorValue"])
            .unwrap_err();
        match err {
            UpdateError::NoMatchingConstructor { required, .. } => {
                assert_eq!(required, ["finalField", "accessorValue"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    struct Span {
        start: u32,
        len: u32,
    }

    impl Span {
        fn new(start: u32, len: u32) -> Self {
            Self { start, len }
        }
    }

    struct Ranked(Span);

    impl Mapped for Ranked {
        fn declare(members: &mut MemberDeclarations<Self>) {
            members
                .readonly_field("start", |r| &r.0.start)
                .readonly_field("len", |r| &r.0.len)
                .constructor_with_priority("fallback", -1, &["start"], |start: u32| {
                    Ranked(Span::new(start, 0))
                })
                .constructor("at", &["start"], |start: u32| Ranked(Span::new(start, 1)))
                .constructor("new", &["start", "len"], |start: u32, len: u32| {
                    Ranked(Span::new(start, len))
                });
        }
    }

    struct Preferred(Span);

    impl Mapped for Preferred {
        fn declare(members: &mut MemberDeclarations<Self>) {
            members
                .readonly_field("start", |p| &p.0.start)
                .readonly_field("len", |p| &p.0.len)
                .constructor("at", &["start"], |start: u32| Preferred(Span::new(start, 1)))
                .constructor_with_priority("new", 5, &["start", "len"], |start: u32, len: u32| {
                    Preferred(Span::new(start, len))
                });
        }
    }

    #[test]
    fn priority_before_declaration_order() {
        let descriptor = describe::<Ranked>().unwrap();
        assert_eq!(pick(&descriptor, &["start"]), "at");
        assert_eq!(pick(&descriptor, &["len"]), "new");
    }

    #[test]
    fn priority_before_parameter_count() {
        let descriptor = describe::<Preferred>().unwrap();
        assert_eq!(descriptor.constructors()[1].priority(), 5);
        assert_eq!(pick(&descriptor, &["start"]), "new");
        assert_eq!(pick(&descriptor, &[]), "new");
    }
}
