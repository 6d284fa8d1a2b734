//! Square Dodge entry point
//!
//! Loads settings, sets up file logging and runs the game in the terminal.

use std::fs::File;
use std::panic;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

use square_dodge::Game;
use square_dodge::Settings;
use square_dodge::platform::{SystemClock, TerminalEvents};
use square_dodge::renderer::TerminalRenderer;
use square_dodge::renderer::terminal::restore_terminal;

/// Log to a file; the terminal belongs to the game while it runs
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to initialize logger")?;
    Ok(())
}

/// Put the terminal back before the default hook prints the panic
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        log::error!("panic: {info}");
        default_hook(info);
    }));
}

fn main() -> Result<()> {
    let (settings, source) = Settings::load().context("failed to load settings")?;
    if let Some(path) = &settings.log_file {
        init_logging(path)?;
    }
    log::info!("Square Dodge starting...");
    log::info!("Settings from {source}");

    let mut game = Game::new(&settings);
    let mut renderer = TerminalRenderer::new(settings.screen_size());

    install_panic_hook();
    if let Err(err) = renderer.enter() {
        // Raw mode may already be on
        let _ = renderer.exit();
        return Err(err).context("failed to set up terminal");
    }

    let result = TerminalEvents::open(settings.key_repeat_delay(), settings.key_hold())
        .and_then(|mut events| {
            let run = game.run(
                &mut events,
                &mut renderer,
                &mut SystemClock::new(),
                settings.frame_budget(),
            );
            let closed = events.close();
            run.and(closed)
        });

    // Restore the terminal before reporting anything
    let restored = renderer.exit();
    result.context("game loop failed")?;
    restored.context("failed to restore terminal")?;

    let state = game.state();
    log::info!(
        "Exited! {} ticks, {:.1}s played, stats: {:?}",
        state.time_ticks,
        state.world.elapsed_ms / 1000.0,
        state.stats
    );
    Ok(())
}
