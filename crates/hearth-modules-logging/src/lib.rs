//! Logger installation and a module that reports engine lifecycle events.

use std::cell::Cell;
use std::rc::Rc;

use hearth_core::{EngineConfig, EngineResult, Frame, Module, ModuleCtx};

/// Install `env_logger` with `filter` as the default directives.
///
/// `RUST_LOG` is applied on top when set. Returns `false` if a logger was
/// already installed (repeat calls are harmless).
pub fn init(filter: &str) -> bool {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filter).parse_default_env().is_test(false);
    builder.try_init().is_ok()
}

pub fn init_from_config(cfg: &EngineConfig) -> bool {
    init(&cfg.log_level)
}

/// Frame and reset counters, shared with whoever built the module.
#[derive(Debug, Default)]
pub struct LifecycleStats {
    frames: Cell<u64>,
    resets: Cell<u32>,
}

impl LifecycleStats {
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    #[inline]
    pub fn resets(&self) -> u32 {
        self.resets.get()
    }
}

/// Logs start/reset/shutdown and a periodic registry summary.
pub struct LoggingModule {
    report_every: u64,
    stats: Rc<LifecycleStats>,
}

impl LoggingModule {
    /// `report_every` frames between summaries; 0 disables them.
    pub fn new(report_every: u64) -> Self {
        Self {
            report_every,
            stats: Rc::default(),
        }
    }

    pub fn stats(&self) -> Rc<LifecycleStats> {
        Rc::clone(&self.stats)
    }
}

impl Default for LoggingModule {
    fn default() -> Self {
        Self::new(60)
    }
}

impl Module for LoggingModule {
    fn id(&self) -> &'static str {
        "logging"
    }

    fn start(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        let registry = ctx.registry();
        log::info!(
            "start: {} registered [{}]",
            registry.len(),
            registry.type_names().join(", ")
        );
        Ok(())
    }

    fn update(&mut self, ctx: &mut ModuleCtx<'_>, frame: &Frame) -> EngineResult<()> {
        self.stats.frames.set(self.stats.frames.get() + 1);
        if self.report_every != 0 && frame.frame_index % self.report_every == 0 {
            log::debug!(
                "frame {} gen {} singletons {} fixed_steps {}",
                frame.frame_index,
                frame.scene_generation,
                ctx.registry().len(),
                frame.fixed_steps
            );
        }
        Ok(())
    }

    fn scene_reset(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        let resets = self.stats.resets.get() + 1;
        self.stats.resets.set(resets);
        log::info!("scene reset #{resets} -> generation {}", ctx.registry().generation());
        Ok(())
    }

    fn shutdown(&mut self, _ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        log::info!(
            "shutdown after {} frames, {} scene resets",
            self.stats.frames(),
            self.stats.resets()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::Engine;

    #[test]
    fn second_init_reports_an_existing_logger() {
        init("debug");
        assert!(!init("info"));
    }

    #[test]
    fn module_counts_frames_and_resets() {
        let module = LoggingModule::new(1);
        let stats = module.stats();

        let mut engine = Engine::new(&EngineConfig::default());
        engine.register_module(Box::new(module)).unwrap();
        engine.start().unwrap();
        engine.run_frames(3).unwrap();
        engine.reset_scene().unwrap();
        engine.run_frames(2).unwrap();
        engine.shutdown().unwrap();

        assert_eq!(stats.frames(), 5);
        assert_eq!(stats.resets(), 1);
    }
}
