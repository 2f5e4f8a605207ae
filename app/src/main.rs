mod game;

use anyhow::Context;
use hearth_core::{Engine, EngineConfig};
use hearth_modules_logging::LoggingModule;

use crate::game::{GameManager, GameManagerModule, TickDisplay};

const FRAMES: u64 = 180;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hearth.toml".to_string());
    let cfg = EngineConfig::load_or_default(&path).with_context(|| format!("loading {path}"))?;
    hearth_modules_logging::init_from_config(&cfg);

    let logging = LoggingModule::default();
    let stats = logging.stats();

    let mut engine = Engine::new(&cfg);
    engine.register_module(Box::new(logging))?;
    engine.register_module(Box::new(GameManagerModule::new(
        cfg.singletons.persist_across_scenes,
    )))?;
    engine.register_module(Box::new(TickDisplay::new(30, FRAMES / 2)))?;

    engine.start()?;
    engine.run_frames(FRAMES)?;

    match engine.registry().try_resolve::<GameManager>() {
        Some(manager) => println!(
            "{} ({}): {} tick={}",
            manager.name(),
            manager.description(),
            manager.status(),
            manager.current_tick()
        ),
        None => println!("game manager did not survive the scene reset"),
    }

    engine.shutdown()?;
    println!("{} frames, {} scene resets", stats.frames(), stats.resets());
    Ok(())
}
