use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{RegistryError, RegistryResult};

use super::{Dependency, Provision};

/// Monotonic counter bumped by every [`Registry::clear`].
///
/// Anything cached against an older generation is stale.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const INITIAL: Generation = Generation(0);

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[inline]
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

enum Slot {
    /// Registry owns the singleton.
    Owned(Rc<dyn Any>),
    /// Host owns the object, we only point back at it.
    Host(Weak<dyn Any>),
    /// Host tore the object down and told us so.
    Released,
}

impl Slot {
    #[inline]
    fn upgrade(&self) -> Option<Rc<dyn Any>> {
        match self {
            Slot::Owned(v) => Some(Rc::clone(v)),
            Slot::Host(v) => v.upgrade(),
            Slot::Released => None,
        }
    }

    #[inline]
    fn is_live(&self) -> bool {
        match self {
            Slot::Owned(_) => true,
            Slot::Host(v) => v.strong_count() > 0,
            Slot::Released => false,
        }
    }
}

struct Entry {
    type_name: &'static str,
    slot: Slot,
}

/// Type-keyed store of at most one instance per type.
///
/// Notes:
/// - Keys are `TypeId::of::<T>()`, values are recovered with a checked downcast.
/// - Host-managed types are held weakly; when the host drops the object the
///   entry turns dangling until it is registered again or the registry is cleared.
/// - Single-threaded by construction (`Rc`), owned by the composition root and
///   handed out through `ModuleCtx`.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
    generation: Generation,
}

impl Registry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `instance` as the singleton for `T`.
    ///
    /// An entry whose instance is gone (released, or a host object that was
    /// dropped) is silently replaced. A live entry is never replaced.
    ///
    /// For host-managed types only a weak reference is kept, so the caller must
    /// hold on to `instance` for the registration to stay live.
    pub fn register<T: Dependency>(&mut self, instance: Rc<T>) -> RegistryResult<()> {
        let type_name = type_name::<T>();

        if let Some(existing) = self.entries.get(&TypeId::of::<T>()) {
            if existing.slot.is_live() {
                return Err(RegistryError::AlreadyRegistered { type_name });
            }
            log::debug!("registry: replacing dangling entry for {type_name}");
        }

        let instance: Rc<dyn Any> = instance;
        let slot = if T::provision().is_host_managed() {
            Slot::Host(Rc::downgrade(&instance))
        } else {
            Slot::Owned(instance)
        };

        self.entries.insert(TypeId::of::<T>(), Entry { type_name, slot });
        log::debug!("registry: registered {type_name}");
        Ok(())
    }

    /// Look up the singleton for `T`, building it when `T` allows it.
    pub fn resolve<T: Dependency>(&mut self) -> RegistryResult<Rc<T>> {
        let type_name = type_name::<T>();

        if let Some(entry) = self.entries.get(&TypeId::of::<T>()) {
            let value = entry
                .slot
                .upgrade()
                .ok_or(RegistryError::DanglingRegistration { type_name })?;
            return value
                .downcast::<T>()
                .map_err(|_| RegistryError::TypeMismatch { type_name });
        }

        match T::provision() {
            Provision::HostManaged => Err(RegistryError::UnregisteredHostType { type_name }),
            Provision::Construct(build) => {
                let instance = Rc::new(build());
                self.register(Rc::clone(&instance))?;
                log::debug!("registry: auto-constructed {type_name}");
                Ok(instance)
            }
            Provision::Manual => Err(RegistryError::UnresolvableType { type_name }),
        }
    }

    /// Look up `T` without failing and without constructing anything.
    pub fn try_resolve<T: Any>(&self) -> Option<Rc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.slot.upgrade())
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// Host teardown hook: null the entry for `T` but keep its key.
    ///
    /// Resolving `T` afterwards fails with `DanglingRegistration` until the
    /// host registers a new instance. Returns whether `T` had an entry.
    pub fn release<T: Any>(&mut self) -> bool {
        match self.entries.get_mut(&TypeId::of::<T>()) {
            Some(entry) => {
                entry.slot = Slot::Released;
                log::debug!("registry: released {}", entry.type_name);
                true
            }
            None => false,
        }
    }

    /// Drop every entry and advance the generation.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.generation = self.generation.next();
        log::debug!(
            "registry: cleared {dropped} entries, generation {}",
            self.generation
        );
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether `T` has an entry at all, live or dangling.
    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    #[inline]
    pub fn is_live<T: Any>(&self) -> bool {
        self.entries
            .get(&TypeId::of::<T>())
            .is_some_and(|entry| entry.slot.is_live())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered type names, sorted. Diagnostics only.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("generation", &self.generation)
            .field("types", &self.type_names())
            .finish()
    }
}
