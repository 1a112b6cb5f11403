//! Items used by exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::error::DescribeError;
    use crate::registry::TypeRegistry;
    use crate::{Mapped, MemberDeclarations};

    /// A registration submitted by [`impl_auto_register`](crate::impl_auto_register).
    pub struct AutoRegistration(pub fn(&TypeRegistry) -> Result<(), DescribeError>);

    inventory::collect!(AutoRegistration);

    pub fn register<T: Mapped>(registry: &TypeRegistry) -> Result<(), DescribeError> {
        registry.register::<T>()
    }

    /// Always submitted; found in a registry only if collection works on this platform.
    pub struct AutoRegisterFlag;

    impl Mapped for AutoRegisterFlag {
        fn declare(_: &mut MemberDeclarations<Self>) {}
    }

    crate::impl_auto_register!(AutoRegisterFlag);

    /// Registers every submitted type, logging the ones that cannot be described.
    pub(crate) fn register_types(registry: &TypeRegistry) {
        for registration in inventory::iter::<AutoRegistration> {
            if let Err(err) = (registration.0)(registry) {
                log::error!("auto registration failed: {err}");
            }
        }
    }
}
