use std::cell::{Cell, RefCell};

use hearth_core::{
    Dependency, EngineResult, Frame, Lazy, Module, ModuleCtx, Observable, ObservableList,
    Provision, SingletonComponent, Subscriber,
};

/// Scene-level manager owned by the host loop.
pub struct GameManager {
    name: String,
    description: String,
    ticks: Cell<u64>,
}

impl GameManager {
    pub fn new() -> Self {
        Self {
            name: "foo".to_string(),
            description: "bar".to_string(),
            ticks: Cell::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn current_tick(&self) -> u64 {
        self.ticks.get()
    }

    pub fn status(&self) -> &'static str {
        "I am running!"
    }

    fn tick(&self) {
        self.ticks.set(self.ticks.get() + 1);
    }
}

impl Dependency for GameManager {
    fn provision() -> Provision<Self> {
        Provision::HostManaged
    }
}

/// UI-facing state, built by the registry on first use.
#[derive(Default)]
pub struct HudState {
    pub tick_text: RefCell<Observable<String>>,
    pub events: RefCell<ObservableList<String>>,
}

impl Dependency for HudState {
    fn provision() -> Provision<Self> {
        Provision::auto()
    }
}

pub struct GameManagerModule {
    component: SingletonComponent<GameManager>,
}

impl GameManagerModule {
    pub fn new(persist_across_scenes: bool) -> Self {
        Self {
            component: SingletonComponent::new(GameManager::new(), persist_across_scenes),
        }
    }
}

impl Module for GameManagerModule {
    fn id(&self) -> &'static str {
        "game-manager"
    }

    fn init(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        self.component.awake(ctx.registry())?;
        Ok(())
    }

    fn update(&mut self, _ctx: &mut ModuleCtx<'_>, _frame: &Frame) -> EngineResult<()> {
        if let Some(manager) = self.component.get() {
            manager.tick();
        }
        Ok(())
    }

    fn scene_reset(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        if !self.component.on_scene_reset(ctx.registry())? {
            log::info!("game manager destroyed with the scene");
        }
        Ok(())
    }

    fn shutdown(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        self.component.destroy(ctx.registry());
        Ok(())
    }
}

/// Copies the manager's tick into the HUD every few frames and asks for one
/// scene reset along the way.
pub struct TickDisplay {
    manager: Lazy<GameManager>,
    hud: Lazy<HudState>,
    refresh_every: u64,
    reset_at: u64,
    on_text: Subscriber<String>,
    on_events: Subscriber<[String]>,
}

impl TickDisplay {
    pub fn new(refresh_every: u64, reset_at: u64) -> Self {
        Self {
            manager: Lazy::new(),
            hud: Lazy::new(),
            refresh_every: refresh_every.max(1),
            reset_at,
            on_text: Subscriber::new(|text: &String| log::info!("tick text: {text}")),
            on_events: Subscriber::new(|events: &[String]| {
                if let Some(last) = events.last() {
                    log::info!("hud event #{}: {last}", events.len());
                }
            }),
        }
    }

    /// Hook our listeners onto the current HUD instance.
    fn attach(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        let hud = self.hud.get(ctx.registry())?;
        hud.tick_text.borrow_mut().subscribe(&self.on_text, false);
        hud.events.borrow_mut().subscribe(&self.on_events, false);
        Ok(())
    }

    fn set_tick_text(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        let text = match self.manager.get(ctx.registry()) {
            Ok(manager) => manager.current_tick().to_string(),
            Err(e) => format!("-- ({e})"),
        };
        let hud = self.hud.get(ctx.registry())?;
        hud.tick_text.borrow_mut().set(text);
        Ok(())
    }
}

impl Module for TickDisplay {
    fn id(&self) -> &'static str {
        "tick-display"
    }

    fn start(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        self.attach(ctx)?;
        if !self.manager.is_resolvable(ctx.registry()) {
            log::warn!("no game manager in the scene");
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut ModuleCtx<'_>, frame: &Frame) -> EngineResult<()> {
        if frame.frame_index % self.refresh_every == 0 {
            self.set_tick_text(ctx)?;
        }
        if frame.frame_index == self.reset_at {
            ctx.request_scene_reset();
        }
        Ok(())
    }

    fn scene_reset(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        // The previous HUD went away with the registry; the handle rebuilds it.
        self.attach(ctx)?;
        let generation = ctx.registry().generation();
        let hud = self.hud.get(ctx.registry())?;
        hud.events
            .borrow_mut()
            .add(format!("scene loaded (generation {generation})"));
        Ok(())
    }

    fn shutdown(&mut self, ctx: &mut ModuleCtx<'_>) -> EngineResult<()> {
        if let Some(hud) = ctx.registry().try_resolve::<HudState>() {
            hud.tick_text.borrow_mut().unsubscribe(&self.on_text);
            hud.events.borrow_mut().unsubscribe(&self.on_events);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{Engine, EngineConfig};

    fn engine(persist: bool) -> Engine {
        let mut engine = Engine::new(&EngineConfig::default());
        engine
            .register_module(Box::new(GameManagerModule::new(persist)))
            .unwrap();
        engine.register_module(Box::new(TickDisplay::new(1, 4))).unwrap();
        engine.start().unwrap();
        engine
    }

    #[test]
    fn display_tracks_the_manager_tick() {
        let mut engine = engine(true);
        engine.run_frames(3).unwrap();

        let hud = engine.registry().try_resolve::<HudState>().unwrap();
        assert_eq!(hud.tick_text.borrow().get(), "3");
    }

    #[test]
    fn persistent_manager_keeps_counting_after_reset() {
        let mut engine = engine(true);
        engine.run_frames(7).unwrap();

        let manager = engine.registry().try_resolve::<GameManager>().unwrap();
        assert_eq!(manager.current_tick(), 7);
        assert_eq!(engine.registry().generation().get(), 1);

        let hud = engine.registry().try_resolve::<HudState>().unwrap();
        assert_eq!(hud.events.borrow().items(), ["scene loaded (generation 1)"]);
        assert_eq!(hud.tick_text.borrow().get(), "7");
        assert_eq!(hud.tick_text.borrow().subscriber_count(), 1);
    }

    #[test]
    fn scene_bound_manager_is_gone_after_reset() {
        let mut engine = engine(false);
        engine.run_frames(6).unwrap();

        assert!(engine.registry().try_resolve::<GameManager>().is_none());
        let hud = engine.registry().try_resolve::<HudState>().unwrap();
        assert!(hud.tick_text.borrow().get().starts_with("--"));
    }

    #[test]
    fn shutdown_detaches_hud_listeners() {
        let mut engine = engine(true);
        engine.run_frames(1).unwrap();
        let hud = engine.registry().try_resolve::<HudState>().unwrap();

        engine.shutdown().unwrap();
        assert_eq!(hud.tick_text.borrow().subscriber_count(), 0);
        assert_eq!(hud.events.borrow().subscriber_count(), 0);
    }
}
