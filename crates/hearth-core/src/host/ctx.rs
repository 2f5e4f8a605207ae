use std::rc::Rc;

use crate::error::RegistryResult;
use crate::frame::Frame;
use crate::registry::{Dependency, Registry};

/// Context passed to modules.
///
/// This prevents modules from taking `&mut Engine`.
pub struct ModuleCtx<'a> {
    registry: &'a mut Registry,
    exit: &'a mut bool,
    scene_reset: &'a mut bool,

    frame: Option<Frame>,
}

impl<'a> ModuleCtx<'a> {
    #[inline]
    pub(crate) fn new(registry: &'a mut Registry, exit: &'a mut bool, scene_reset: &'a mut bool) -> Self {
        Self {
            registry,
            exit,
            scene_reset,
            frame: None,
        }
    }

    #[inline]
    pub(crate) fn with_frame(mut self, frame: &Frame) -> Self {
        self.frame = Some(*frame);
        self
    }

    #[inline]
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    #[inline]
    pub fn registry(&mut self) -> &mut Registry {
        self.registry
    }

    /// Shorthand for `ctx.registry().resolve::<T>()`.
    #[inline]
    pub fn resolve<T: Dependency>(&mut self) -> RegistryResult<Rc<T>> {
        self.registry.resolve::<T>()
    }

    #[inline]
    pub fn request_exit(&mut self) {
        *self.exit = true;
    }

    #[inline]
    pub fn is_exit_requested(&self) -> bool {
        *self.exit
    }

    /// Clear the registry at the end of the current step.
    #[inline]
    pub fn request_scene_reset(&mut self) {
        *self.scene_reset = true;
    }

    #[inline]
    pub fn is_scene_reset_requested(&self) -> bool {
        *self.scene_reset
    }
}
