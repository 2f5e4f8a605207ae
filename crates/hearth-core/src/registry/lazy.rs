use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::RegistryResult;

use super::{Dependency, Generation, Registry};

/// Memoized handle to one dependency.
///
/// The handle caches a weak reference together with the registry generation
/// it was resolved at. The cache is reused only while the generation still
/// matches and the registry entry still holds that same instance; otherwise
/// the next access goes back to the registry, which may build a fresh
/// instance or report the entry as dangling. Failures are never cached.
///
/// ```
/// use std::rc::Rc;
/// use hearth_core::registry::{Dependency, Lazy, Provision, Registry};
///
/// #[derive(Default)]
/// struct Score(u32);
///
/// impl Dependency for Score {
///     fn provision() -> Provision<Self> {
///         Provision::auto()
///     }
/// }
///
/// let mut registry = Registry::new();
/// let mut score = Lazy::<Score>::new();
///
/// let first = score.get(&mut registry).unwrap();
/// registry.clear();
/// let second = score.get(&mut registry).unwrap();
/// assert!(!Rc::ptr_eq(&first, &second));
/// ```
pub struct Lazy<T> {
    cached: Option<Weak<T>>,
    generation: Generation,
}

impl<T> Lazy<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            cached: None,
            generation: Generation::INITIAL,
        }
    }

    /// Forget the cached instance; the next access resolves again.
    #[inline]
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Generation the cached value was resolved at, if anything is cached.
    #[inline]
    pub fn cached_generation(&self) -> Option<Generation> {
        self.cached.as_ref().map(|_| self.generation)
    }
}

impl<T: Dependency> Lazy<T> {
    pub fn get(&mut self, registry: &mut Registry) -> RegistryResult<Rc<T>> {
        let current = registry.generation();

        if self.generation == current {
            if let Some(value) = self.cached.as_ref().and_then(Weak::upgrade) {
                // A released entry leaves the old instance alive if anyone still holds it.
                let registered = registry
                    .try_resolve::<T>()
                    .is_some_and(|live| Rc::ptr_eq(&live, &value));
                if registered {
                    return Ok(value);
                }
            }
        }

        self.cached = None;
        let value = registry.resolve::<T>()?;
        self.cached = Some(Rc::downgrade(&value));
        self.generation = current;
        Ok(value)
    }

    /// Like [`get`](Self::get) but folds every failure into `false`.
    pub fn is_resolvable(&mut self, registry: &mut Registry) -> bool {
        self.get(registry).is_ok()
    }
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("type", &std::any::type_name::<T>())
            .field("cached", &self.cached.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}
