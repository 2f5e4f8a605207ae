use std::time::Instant;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::frame::Frame;
use crate::registry::Registry;

use super::{Module, ModuleCtx};

/// Cooperative update loop that owns the registry and the modules.
///
/// Everything runs on the calling thread. Platform code (or a headless driver)
/// calls [`step`](Self::step) once per frame.
pub struct Engine {
    fixed_dt: f32,
    max_fixed_steps: u32,
    modules: Vec<Box<dyn Module>>,

    registry: Registry,

    exit_requested: bool,
    scene_reset_requested: bool,

    frame_index: u64,
    last: Instant,
    acc: f32,
}

impl Engine {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            fixed_dt: cfg.fixed_dt_sec(),
            max_fixed_steps: cfg.max_fixed_steps.max(1),
            modules: Vec::new(),
            registry: Registry::new(),
            exit_requested: false,
            scene_reset_requested: false,
            frame_index: 0,
            last: Instant::now(),
            acc: 0.0,
        }
    }

    pub fn register_module(&mut self, mut module: Box<dyn Module>) -> EngineResult<()> {
        let mut ctx = ModuleCtx::new(
            &mut self.registry,
            &mut self.exit_requested,
            &mut self.scene_reset_requested,
        );
        module.init(&mut ctx)?;
        log::debug!("module registered: {}", module.id());
        self.modules.push(module);
        Ok(())
    }

    pub fn start(&mut self) -> EngineResult<()> {
        let Self {
            modules,
            registry,
            exit_requested,
            scene_reset_requested,
            ..
        } = self;

        for m in modules.iter_mut() {
            let mut ctx = ModuleCtx::new(registry, exit_requested, scene_reset_requested);
            m.start(&mut ctx)?;
        }

        self.last = Instant::now();
        self.acc = 0.0;
        log::info!("engine started with {} modules", self.modules.len());
        Ok(())
    }

    /// Advance one frame using wall-clock time since the previous step.
    pub fn step(&mut self) -> EngineResult<Frame> {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        self.step_with(dt)
    }

    /// Advance one frame by `dt` seconds.
    ///
    /// Runs as many fixed updates as the accumulator allows (capped), then one
    /// update. A scene reset requested during the frame is applied at the end.
    pub fn step_with(&mut self, dt: f32) -> EngineResult<Frame> {
        if self.exit_requested {
            return Err(EngineError::ExitRequested);
        }

        // Prevent spiral-of-death on long stalls.
        self.acc = (self.acc + dt.max(0.0)).min(self.fixed_dt * self.max_fixed_steps as f32);

        let Self {
            fixed_dt,
            modules,
            registry,
            exit_requested,
            scene_reset_requested,
            frame_index,
            acc,
            ..
        } = self;
        let fixed_dt = *fixed_dt;

        let mut fixed_steps = 0u32;
        while *acc >= fixed_dt {
            *acc -= fixed_dt;
            fixed_steps += 1;

            let frame = Frame {
                frame_index: *frame_index,
                dt,
                fixed_dt,
                fixed_alpha: (*acc / fixed_dt).clamp(0.0, 0.999_999),
                fixed_steps,
                scene_generation: registry.generation(),
            };

            for m in modules.iter_mut() {
                let mut ctx = ModuleCtx::new(registry, exit_requested, scene_reset_requested)
                    .with_frame(&frame);
                m.fixed_update(&mut ctx, &frame)?;
            }
        }

        let frame = Frame {
            frame_index: *frame_index,
            dt,
            fixed_dt,
            fixed_alpha: (*acc / fixed_dt).clamp(0.0, 0.999_999),
            fixed_steps,
            scene_generation: registry.generation(),
        };

        for m in modules.iter_mut() {
            let mut ctx =
                ModuleCtx::new(registry, exit_requested, scene_reset_requested).with_frame(&frame);
            m.update(&mut ctx, &frame)?;
        }

        *frame_index = frame_index.wrapping_add(1);

        if self.scene_reset_requested {
            self.reset_scene()?;
        }

        Ok(frame)
    }

    /// Step `frames` times with the fixed step as frame time. For headless hosts.
    ///
    /// Stops early once a module requests exit; returns the number of frames run.
    pub fn run_frames(&mut self, frames: u64) -> EngineResult<u64> {
        let mut ran = 0;
        while ran < frames && !self.exit_requested {
            self.step_with(self.fixed_dt)?;
            ran += 1;
        }
        Ok(ran)
    }

    /// Scene boundary: drop every singleton, then let modules re-register.
    pub fn reset_scene(&mut self) -> EngineResult<()> {
        self.scene_reset_requested = false;
        self.registry.clear();
        log::info!("scene reset, registry generation {}", self.registry.generation());

        let Self {
            modules,
            registry,
            exit_requested,
            scene_reset_requested,
            ..
        } = self;

        for m in modules.iter_mut() {
            let mut ctx = ModuleCtx::new(registry, exit_requested, scene_reset_requested);
            m.scene_reset(&mut ctx)?;
        }
        Ok(())
    }

    /// Shut modules down in reverse registration order, then clear the registry.
    ///
    /// A failing module does not stop the others. Every failure is logged and
    /// the first one is returned once all hooks have run.
    pub fn shutdown(&mut self) -> EngineResult<()> {
        let Self {
            modules,
            registry,
            exit_requested,
            scene_reset_requested,
            ..
        } = self;

        let mut first_err = None;
        for m in modules.iter_mut().rev() {
            let mut ctx = ModuleCtx::new(registry, exit_requested, scene_reset_requested);
            if let Err(e) = m.shutdown(&mut ctx) {
                log::warn!("module {} failed to shut down: {e}", m.id());
                first_err.get_or_insert(e);
            }
        }

        self.registry.clear();
        log::info!("engine shut down");
        first_err.map_or(Ok(()), Err)
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    #[inline]
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[inline]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
