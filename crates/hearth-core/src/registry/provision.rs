use std::any::Any;
use std::fmt;

/// How the registry may obtain an instance of a type it has never seen.
pub enum Provision<T> {
    /// Instances are created and destroyed by the host (components driven by
    /// the update loop). The registry only keeps a weak back-reference and
    /// never builds one itself, so the host must register it before the first
    /// resolve.
    HostManaged,

    /// Plain service with no dependencies of its own. Built on the first
    /// unresolved lookup and registered as a side effect.
    Construct(fn() -> T),

    /// Needs constructor arguments the registry cannot supply.
    /// Must be registered explicitly.
    Manual,
}

impl<T: Default> Provision<T> {
    /// Auto-construct through `Default`.
    #[inline]
    pub fn auto() -> Self {
        Self::Construct(T::default)
    }
}

impl<T> Provision<T> {
    #[inline]
    pub fn is_host_managed(&self) -> bool {
        matches!(self, Self::HostManaged)
    }
}

impl<T> fmt::Debug for Provision<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostManaged => f.write_str("HostManaged"),
            Self::Construct(_) => f.write_str("Construct"),
            Self::Manual => f.write_str("Manual"),
        }
    }
}

/// A type that can live in the [`Registry`](super::Registry).
///
/// The provision marker replaces any runtime inspection of the type: the
/// registry decides between "build it", "wait for the host" and "fail" purely
/// from what the type declares here.
///
/// ```
/// use hearth_core::registry::{Dependency, Provision};
///
/// #[derive(Default)]
/// struct Settings {
///     volume: f32,
/// }
///
/// impl Dependency for Settings {
///     fn provision() -> Provision<Self> {
///         Provision::auto()
///     }
/// }
/// ```
pub trait Dependency: Any + Sized {
    fn provision() -> Provision<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Counter(u32);

    #[test]
    fn auto_builds_from_default() {
        let Provision::Construct(build) = Provision::<Counter>::auto() else {
            panic!("auto() must produce a constructor");
        };
        assert_eq!(build(), Counter(0));
    }

    #[test]
    fn only_host_managed_reports_host_managed() {
        assert!(Provision::<Counter>::HostManaged.is_host_managed());
        assert!(!Provision::<Counter>::Manual.is_host_managed());
        assert!(!Provision::<Counter>::auto().is_host_managed());
        assert_eq!(format!("{:?}", Provision::<Counter>::auto()), "Construct");
    }
}
