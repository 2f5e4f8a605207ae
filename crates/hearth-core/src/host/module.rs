use crate::error::EngineResult;
use crate::frame::Frame;

use super::ModuleCtx;

/// Module lifecycle contract.
///
/// Modules talk to each other only through the registry handed out by
/// [`ModuleCtx`]. Host-managed singletons a module owns should be registered
/// in `init` and registered again in `scene_reset`, since a reset clears
/// the registry before the hook runs.
pub trait Module {
    fn id(&self) -> &'static str;

    fn init(&mut self, _ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        Ok(())
    }

    fn start(&mut self, _ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        Ok(())
    }

    fn fixed_update(&mut self, _ctx: &mut ModuleCtx<'_>, _frame: &Frame) -> EngineResult<()> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut ModuleCtx<'_>, _frame: &Frame) -> EngineResult<()> {
        Ok(())
    }

    /// Runs after the registry was cleared at a scene boundary.
    fn scene_reset(&mut self, _ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        Ok(())
    }

    fn shutdown(&mut self, _ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        Ok(())
    }
}
