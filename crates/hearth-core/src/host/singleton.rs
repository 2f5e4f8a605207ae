use std::any::type_name;
use std::rc::Rc;

use crate::error::RegistryResult;
use crate::registry::{Dependency, Registry};

/// Host-owned instance that registers itself as the singleton for `T`.
///
/// The component holds the only strong reference; for host-managed types the
/// registry just points back at it. A second component of the same type is
/// discarded on `awake` instead of replacing the first.
pub struct SingletonComponent<T> {
    instance: Option<Rc<T>>,
    persist_across_scenes: bool,
}

impl<T: Dependency> SingletonComponent<T> {
    pub fn new(instance: T, persist_across_scenes: bool) -> Self {
        Self {
            instance: Some(Rc::new(instance)),
            persist_across_scenes,
        }
    }

    /// Register the instance. Returns `false` when there is nothing to
    /// register: either this component was already destroyed, or another live
    /// instance of `T` is registered and this one got discarded.
    pub fn awake(&mut self, registry: &mut Registry) -> RegistryResult<bool> {
        let Some(instance) = self.instance.as_ref() else {
            return Ok(false);
        };

        if let Some(existing) = registry.try_resolve::<T>() {
            if Rc::ptr_eq(&existing, instance) {
                return Ok(true);
            }
            log::warn!("{} already exists, destroying duplicate", type_name::<T>());
            self.instance = None;
            return Ok(false);
        }

        registry.register(Rc::clone(instance))?;
        Ok(true)
    }

    /// Drop the instance and release its registry entry if it is still ours.
    pub fn destroy(&mut self, registry: &mut Registry) {
        let Some(instance) = self.instance.take() else {
            return;
        };
        let ours = registry
            .try_resolve::<T>()
            .is_some_and(|registered| Rc::ptr_eq(&registered, &instance));
        if ours {
            registry.release::<T>();
        }
    }

    /// Call after the registry was cleared. Persistent components register
    /// again, the others are destroyed with the scene.
    pub fn on_scene_reset(&mut self, registry: &mut Registry) -> RegistryResult<bool> {
        if self.persist_across_scenes {
            return self.awake(registry);
        }
        self.instance = None;
        Ok(false)
    }

    #[inline]
    pub fn get(&self) -> Option<&Rc<T>> {
        self.instance.as_ref()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.instance.is_some()
    }

    #[inline]
    pub fn persists_across_scenes(&self) -> bool {
        self.persist_across_scenes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::registry::{Lazy, Provision};
    use std::cell::Cell;

    struct GameManager {
        ticks: Cell<u64>,
    }

    impl GameManager {
        fn new() -> Self {
            Self { ticks: Cell::new(0) }
        }
    }

    impl Dependency for GameManager {
        fn provision() -> Provision<Self> {
            Provision::HostManaged
        }
    }

    #[test]
    fn awake_registers_and_destroy_releases() {
        let mut registry = Registry::new();
        let mut manager = SingletonComponent::new(GameManager::new(), true);

        assert!(manager.awake(&mut registry).unwrap());
        assert!(registry.is_live::<GameManager>());
        // Waking twice is harmless.
        assert!(manager.awake(&mut registry).unwrap());

        manager.destroy(&mut registry);
        assert!(!manager.is_alive());
        assert!(registry.contains::<GameManager>());
        assert!(matches!(
            registry.resolve::<GameManager>(),
            Err(RegistryError::DanglingRegistration { .. })
        ));
    }

    #[test]
    fn duplicate_component_is_discarded() {
        let mut registry = Registry::new();
        let mut first = SingletonComponent::new(GameManager::new(), true);
        let mut second = SingletonComponent::new(GameManager::new(), true);

        first.get().unwrap().ticks.set(5);
        assert!(first.awake(&mut registry).unwrap());
        assert!(!second.awake(&mut registry).unwrap());
        assert!(!second.is_alive());

        // Destroying the discarded duplicate must not touch the live entry.
        second.destroy(&mut registry);
        assert_eq!(registry.resolve::<GameManager>().unwrap().ticks.get(), 5);
    }

    #[test]
    fn replacement_after_destroy_registers_over_the_dangling_entry() {
        let mut registry = Registry::new();
        let mut old = SingletonComponent::new(GameManager::new(), true);
        old.awake(&mut registry).unwrap();
        old.destroy(&mut registry);

        let mut new = SingletonComponent::new(GameManager::new(), true);
        assert!(new.awake(&mut registry).unwrap());
        assert!(Rc::ptr_eq(
            &registry.resolve::<GameManager>().unwrap(),
            new.get().unwrap()
        ));
    }

    #[test]
    fn persistent_component_survives_scene_reset() {
        let mut registry = Registry::new();
        let mut manager = SingletonComponent::new(GameManager::new(), true);
        let mut handle = Lazy::<GameManager>::new();

        manager.awake(&mut registry).unwrap();
        let before = handle.get(&mut registry).unwrap();
        drop(before);

        registry.clear();
        assert!(!handle.is_resolvable(&mut registry));

        assert!(manager.on_scene_reset(&mut registry).unwrap());
        assert!(Rc::ptr_eq(&handle.get(&mut registry).unwrap(), manager.get().unwrap()));
    }

    #[test]
    fn scene_bound_component_dies_with_the_scene() {
        let mut registry = Registry::new();
        let mut manager = SingletonComponent::new(GameManager::new(), false);
        assert!(!manager.persists_across_scenes());

        manager.awake(&mut registry).unwrap();
        registry.clear();

        assert!(!manager.on_scene_reset(&mut registry).unwrap());
        assert!(!manager.is_alive());
        assert!(matches!(
            registry.resolve::<GameManager>(),
            Err(RegistryError::UnregisteredHostType { .. })
        ));
    }
}
