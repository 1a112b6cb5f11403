use alloc::sync::Arc;
use core::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock};

use refract_utils::TypeIdMap;

use crate::error::{DescribeError, UpdateError};
use crate::info::TypeDescriptor;
use crate::{Applied, ChangeSet, Mapped, Updated, describe};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of [described](describe) types.
///
/// Descriptors are built on first request and shared afterwards. Concurrent
/// first requests for the same type build its descriptor at most once; every
/// caller receives the same [`Arc`].
///
/// Most programs use the [`global`](Self::global) registry. Separate
/// registries, e.g. [`TypeRegistry::new`] in tests, do not share entries.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use refract_mapper::registry::TypeRegistry;
/// use refract_mapper::{Mapped, MemberDeclarations};
///
/// struct Tag {
///     name: String,
/// }
///
/// impl Mapped for Tag {
///     fn declare(members: &mut MemberDeclarations<Self>) {
///         members.field("name", |t| &t.name, |t| &mut t.name);
///     }
/// }
///
/// let registry = TypeRegistry::new();
/// let first = registry.get::<Tag>().unwrap();
/// let second = registry.get::<Tag>().unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.properties()[0].name(), "name");
/// ```
pub struct TypeRegistry {
    descriptors: RwLock<TypeIdMap<Arc<TypeDescriptor>>>,
}

impl Default for TypeRegistry {
    /// Same as [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Returns a registry without any descriptors. Usable in `static` items.
    #[inline]
    pub const fn new() -> Self {
        Self {
            descriptors: RwLock::new(TypeIdMap::new()),
        }
    }

    /// Returns the process-wide registry.
    #[inline]
    pub fn global() -> &'static Self {
        static GLOBAL: TypeRegistry = TypeRegistry::new();
        &GLOBAL
    }

    /// Returns the descriptor of `T`, describing it on first use.
    ///
    /// # Errors
    ///
    /// The [`DescribeError`] of `T`. Failures are not cached, every call
    /// reports them again.
    #[inline]
    pub fn get<T: Mapped>(&self) -> Result<Arc<TypeDescriptor>, DescribeError> {
        match self.get_by_id(TypeId::of::<T>()) {
            Some(descriptor) => Ok(descriptor),
            None => self.insert_by_id(TypeId::of::<T>(), describe::<T>),
        }
    }

    /// Returns the descriptor registered for `type_id`, if any.
    ///
    /// Unlike [`get`](Self::get) this never describes a type.
    pub fn get_by_id(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    // Describing under the write lock keeps concurrent first requests from
    // building twice.
    #[inline(never)]
    fn insert_by_id(
        &self,
        type_id: TypeId,
        build: impl FnOnce() -> Result<TypeDescriptor, DescribeError>,
    ) -> Result<Arc<TypeDescriptor>, DescribeError> {
        let mut descriptors = self.descriptors.write().unwrap_or_else(PoisonError::into_inner);
        descriptors
            .get_or_try_insert(type_id, || {
                let descriptor = build()?;
                log::debug!("registered `{}`", descriptor.type_path());
                Ok(Arc::new(descriptor))
            })
            .map(|descriptor| Arc::clone(descriptor))
    }

    /// Describes `T` if it has not been registered yet.
    #[inline]
    pub fn register<T: Mapped>(&self) -> Result<(), DescribeError> {
        self.get::<T>().map(|_| ())
    }

    /// Describes every type submitted with [`impl_auto_register!`].
    ///
    /// Types that fail to describe are logged and skipped.
    /// Repeated calls are cheap and will not describe a type twice.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration works on the current platform.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it
    /// always does nothing and returns `false`.
    ///
    /// [`impl_auto_register!`]: crate::impl_auto_register
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&self) -> bool {
        #[cfg(feature = "auto_register")]
        let available = {
            use crate::__macro_exports::auto_register;

            // Reduce the cost of repeated calls.
            let flag = TypeId::of::<auto_register::AutoRegisterFlag>();
            if self.contains(flag) {
                return true;
            }
            auto_register::register_types(self);
            self.contains(flag)
        };
        #[cfg(not(feature = "auto_register"))]
        let available = false;

        available
    }

    /// Returns `true` if a descriptor for `type_id` is cached here.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&type_id)
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies `changes` to the value in `slot`.
    ///
    /// A typed front end to [`TypeDescriptor::update`]: when a new instance
    /// is constructed it replaces the slot's content. An empty slot is
    /// filled through a constructor. On error `slot` is left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use refract_mapper::registry::TypeRegistry;
    /// use refract_mapper::{Applied, ChangeSet, Mapped, MemberDeclarations};
    ///
    /// struct Version {
    ///     major: u32,
    ///     note: String,
    /// }
    ///
    /// impl Mapped for Version {
    ///     fn declare(members: &mut MemberDeclarations<Self>) {
    ///         members
    ///             .readonly_field("major", |v| &v.major)
    ///             .field("note", |v| &v.note, |v| &mut v.note)
    ///             .constructor("new", &["major"], |major: u32| Version { major, note: String::new() });
    ///     }
    /// }
    ///
    /// let registry = TypeRegistry::new();
    /// let mut slot = None;
    ///
    /// let changes = ChangeSet::new().with("major", 1_u32);
    /// assert_eq!(registry.update::<Version>(&mut slot, changes).unwrap(), Applied::Constructed);
    ///
    /// let changes = ChangeSet::new().with("note", String::from("beta"));
    /// assert_eq!(registry.update(&mut slot, changes).unwrap(), Applied::Mutated);
    ///
    /// let version = slot.unwrap();
    /// assert_eq!((version.major, version.note.as_str()), (1, "beta"));
    /// ```
    pub fn update<T: Mapped>(
        &self,
        slot: &mut Option<T>,
        changes: ChangeSet,
    ) -> Result<Applied, UpdateError> {
        let descriptor = self.get::<T>()?;
        let instance = slot.as_mut().map(|value| value as &mut dyn Any);

        match descriptor.update(instance, changes)? {
            Updated::InPlace => Ok(Applied::Mutated),
            Updated::Constructed(built) => {
                let built = built
                    .downcast::<T>()
                    .map_err(|_| UpdateError::MismatchedInstanceType {
                        expected: descriptor.type_path(),
                    })?;
                *slot = Some(*built);
                Ok(Applied::Constructed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::any::TypeId;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::TypeRegistry;
    use crate::error::{DescribeError, UpdateError};
    use crate::fixtures::{AutoSerializedType, Point};
    use crate::info::TypeDescriptor;
    use crate::{Applied, ChangeSet, Mapped, MemberDeclarations, describe};

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    struct Counted {
        value: u32,
    }

    impl Mapped for Counted {
        fn declare(members: &mut MemberDeclarations<Self>) {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            members.field("value", |c| &c.value, |c| &mut c.value);
        }
    }

    struct Broken;

    impl Mapped for Broken {
        fn declare(members: &mut MemberDeclarations<Self>) {
            members.setter("value", |_, _: u8| {});
        }
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let registry = TypeRegistry::new();

        let descriptors: Vec<Arc<TypeDescriptor>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.get::<Counted>().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert!(descriptors.iter().all(|d| Arc::ptr_eq(d, &descriptors[0])));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn memoized_descriptor_matches_describe() {
        let registry = TypeRegistry::new();
        assert!(!registry.contains(TypeId::of::<Point>()));

        let first = registry.get::<Point>().unwrap();
        let second = registry.get::<Point>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, describe::<Point>().unwrap());

        assert!(registry.contains(TypeId::of::<Point>()));
        assert!(Arc::ptr_eq(&registry.get_by_id(TypeId::of::<Point>()).unwrap(), &first));
    }

    #[test]
    fn failures_are_not_cached() {
        let registry = TypeRegistry::new();
        for _ in 0..2 {
            assert!(matches!(
                registry.get::<Broken>(),
                Err(DescribeError::SetterWithoutReadPath { property: "value", .. })
            ));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn global_registry_is_shared() {
        let first = TypeRegistry::global().get::<AutoSerializedType>().unwrap();
        let second = TypeRegistry::global().get::<AutoSerializedType>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn typed_update() {
        let registry = TypeRegistry::new();
        let mut slot = Some(AutoSerializedType::new(5));

        let changes = ChangeSet::new().with("accessorValue", 2_i32);
        assert_eq!(registry.update(&mut slot, changes).unwrap(), Applied::Mutated);

        let changes = ChangeSet::new().with("finalField", 7_i32);
        assert_eq!(registry.update(&mut slot, changes).unwrap(), Applied::Constructed);

        let value = slot.as_ref().unwrap();
        assert_eq!((value.final_field, value.accessor_value), (7, 2));
    }

    #[test]
    fn typed_update_fills_empty_slot() {
        let registry = TypeRegistry::new();
        let mut slot: Option<AutoSerializedType> = None;

        let changes = ChangeSet::new().with("finalField", 3_i32);
        assert_eq!(registry.update(&mut slot, changes).unwrap(), Applied::Constructed);
        assert_eq!(slot, Some(AutoSerializedType::new(3)));
    }

    #[test]
    fn typed_update_error_keeps_slot() {
        let registry = TypeRegistry::new();
        let mut slot = Some(AutoSerializedType::new(5));

        let changes = ChangeSet::new()
            .with("finalField", 7_i32)
            .with("accessorValue", String::new());
        let err = registry.update(&mut slot, changes).unwrap_err();
        assert!(matches!(err, UpdateError::MismatchedValueType { .. }));
        assert_eq!(slot, Some(AutoSerializedType::new(5)));

        let mut empty: Option<Broken> = None;
        let err = registry.update(&mut empty, ChangeSet::new()).unwrap_err();
        assert!(matches!(err, UpdateError::Describe(_)));
        assert!(empty.is_none());
    }

    crate::impl_auto_register!(AutoSerializedType);
    crate::impl_auto_register!(Broken);

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register() {
        let registry = TypeRegistry::new();
        assert!(registry.auto_register());
        assert!(registry.contains(TypeId::of::<AutoSerializedType>()));
        assert!(!registry.contains(TypeId::of::<Broken>()));
        // Second call short-circuits on the flag.
        assert!(registry.auto_register());
    }
}
