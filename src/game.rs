//! Frame loop
//!
//! Each frame polls every pending platform event, simulates the elapsed time
//! in fixed ticks and draws the result.

use std::io;
use std::thread;
use std::time::Duration;

use log::info;

use crate::input::{InputSignal, InputState};
use crate::platform::{Clock, EventSource};
use crate::renderer::{Renderer, draw_frame};
use crate::settings::Settings;
use crate::sim::{FixedTimestep, GameState, tick};

/// A running game: simulation state plus everything sampled between ticks
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    input: InputState,
    timestep: FixedTimestep,
    running: bool,
}

impl Game {
    /// Start a new run from settings, drawing a seed if none is configured
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.resolve_seed();
        info!(
            "new run: seed {seed}, boundary {}, field {}",
            settings.boundary.as_str(),
            settings.screen_size()
        );
        Self::from_state(GameState::new(
            settings.screen_size(),
            settings.boundary,
            seed,
        ))
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            input: InputState::new(),
            timestep: FixedTimestep::default(),
            running: true,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drain the event queue into the held-key state
    ///
    /// Events after a quit request are still drained.
    pub fn pump_events<E: EventSource + ?Sized>(&mut self, events: &mut E) -> io::Result<()> {
        while let Some(event) = events.poll_event()? {
            if self.input.apply(&event) == InputSignal::Quit {
                self.running = false;
            }
        }
        Ok(())
    }

    /// Simulate `frame_ms` of wall time, returning the number of ticks run
    pub fn advance(&mut self, frame_ms: f64) -> u32 {
        self.timestep.accumulate(frame_ms);
        let dt = self.timestep.tick_ms();
        let mut ticks = 0;
        while self.timestep.next_tick() {
            tick(&mut self.state, &self.input, dt);
            ticks += 1;
        }
        ticks
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> io::Result<()> {
        draw_frame(renderer, &self.state)
    }

    /// One full frame: input, simulation, drawing
    ///
    /// The frame is drawn even when it requested a quit.
    pub fn frame<E, R>(
        &mut self,
        frame_ms: f64,
        events: &mut E,
        renderer: &mut R,
    ) -> io::Result<u32>
    where
        E: EventSource + ?Sized,
        R: Renderer + ?Sized,
    {
        self.pump_events(events)?;
        let ticks = self.advance(frame_ms);
        self.render(renderer)?;
        Ok(ticks)
    }

    /// Run frames until a quit is requested
    ///
    /// With `pacing`, the rest of each frame budget is slept away.
    pub fn run<E, R, C>(
        &mut self,
        events: &mut E,
        renderer: &mut R,
        clock: &mut C,
        pacing: Option<Duration>,
    ) -> io::Result<()>
    where
        E: EventSource + ?Sized,
        R: Renderer + ?Sized,
        C: Clock + ?Sized,
    {
        let mut last = clock.now_ms();
        while self.running {
            let now = clock.now_ms();
            self.frame(now - last, events, renderer)?;
            last = now;

            if let Some(budget) = pacing {
                let spent = Duration::from_secs_f64(((clock.now_ms() - now) / 1000.0).max(0.0));
                if let Some(rest) = budget.checked_sub(spent) {
                    thread::sleep(rest);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use glam::Vec2;

    use super::*;
    use crate::consts::*;
    use crate::platform::{Key, PlatformEvent};
    use crate::renderer::{Canvas, colors};
    use crate::sim::{BoundaryPolicy, EntityStore};

    /// Events handed out per frame; each inner queue is drained by one pump
    struct Script {
        frames: VecDeque<Vec<PlatformEvent>>,
        current: VecDeque<PlatformEvent>,
        exhausted: bool,
    }

    impl Script {
        fn new(frames: Vec<Vec<PlatformEvent>>) -> Self {
            Self {
                frames: frames.into(),
                current: VecDeque::new(),
                exhausted: true,
            }
        }
    }

    impl EventSource for Script {
        fn poll_event(&mut self) -> io::Result<Option<PlatformEvent>> {
            if self.exhausted {
                // New pump, so hand out the next frame's batch
                self.exhausted = false;
                self.current = self.frames.pop_front().unwrap_or_default().into();
            }
            match self.current.pop_front() {
                Some(event) => Ok(Some(event)),
                None => {
                    self.exhausted = true;
                    Ok(None)
                }
            }
        }
    }

    /// Advances a fixed step on every read
    struct StepClock {
        now: f64,
        step: f64,
    }

    impl Clock for StepClock {
        fn now_ms(&mut self) -> f64 {
            let now = self.now;
            self.now += self.step;
            now
        }
    }

    fn screen() -> Vec2 {
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn empty_game() -> Game {
        let mut state = GameState::new(screen(), BoundaryPolicy::Clamp, 99);
        state.world.entities = EntityStore::new();
        Game::from_state(state)
    }

    #[test]
    fn test_new_uses_configured_seed() {
        let settings = Settings {
            seed: Some(5),
            ..Default::default()
        };
        let a = Game::new(&settings);
        let b = Game::new(&settings);
        assert_eq!(a.state().seed, 5);
        assert!(a.is_running());
        assert_eq!(a.state().world.entities.active_count(), 1);
        let pos = |g: &Game| g.state().enemies().next().map(|e| e.position);
        assert_eq!(pos(&a), pos(&b));
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut game = empty_game();
        // Debt must exceed a tick before one runs
        assert_eq!(game.advance(20.0), 0);
        assert_eq!(game.advance(20.0), 1);
        assert_eq!(game.advance(100.0), 5);
        assert_eq!(game.state().time_ticks, 6);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut game = empty_game();
        assert_eq!(game.advance(10_000.0), 24);
        assert_eq!(game.state().world.elapsed_ms, 480.0);
    }

    #[test]
    fn test_negative_frame_time_is_ignored() {
        let mut game = empty_game();
        assert_eq!(game.advance(-50.0), 0);
        assert_eq!(game.state().time_ticks, 0);
    }

    #[test]
    fn test_held_right_moves_player() {
        let mut game = empty_game();
        let start = game.state().player.position.x;
        let mut canvas = Canvas::new(screen(), 48, 80);
        let mut events = Script::new(vec![vec![PlatformEvent::KeyDown(Key::Right)]]);

        // 3 ticks with the key held
        let ticks = game.frame(70.0, &mut events, &mut canvas).unwrap();
        assert_eq!(ticks, 3);
        assert!(game.input().right);
        assert_eq!(game.state().player.position.x, start + 15.0);
    }

    #[test]
    fn test_release_stops_player() {
        let mut game = empty_game();
        let mut canvas = Canvas::new(screen(), 48, 80);
        let mut events = Script::new(vec![
            vec![PlatformEvent::KeyDown(Key::Char('a'))],
            vec![PlatformEvent::KeyUp(Key::Char('a'))],
        ]);

        game.frame(30.0, &mut events, &mut canvas).unwrap();
        let after_press = game.state().player.position.x;
        assert_eq!(after_press, 240.0 - 5.0);

        game.frame(40.0, &mut events, &mut canvas).unwrap();
        assert!(!game.input().left);
        assert_eq!(game.state().player.position.x, after_press);
    }

    #[test]
    fn test_escape_quits_after_drawing_frame() {
        let mut game = empty_game();
        let mut canvas = Canvas::new(screen(), 48, 80);
        let mut events = Script::new(vec![vec![PlatformEvent::KeyDown(Key::Escape)]]);

        game.frame(30.0, &mut events, &mut canvas).unwrap();
        assert!(!game.is_running());
        assert_eq!(canvas.frames_presented(), 1);
        assert_eq!(game.state().time_ticks, 1);
    }

    #[test]
    fn test_run_until_quit() {
        let mut game = empty_game();
        let mut canvas = Canvas::new(screen(), 48, 80);
        let mut events = Script::new(vec![
            vec![],
            vec![PlatformEvent::KeyDown(Key::Left)],
            vec![],
            vec![PlatformEvent::Quit],
        ]);
        let mut clock = StepClock {
            now: 0.0,
            step: 15.0,
        };

        game.run(&mut events, &mut canvas, &mut clock, None).unwrap();
        assert!(!game.is_running());
        assert_eq!(canvas.frames_presented(), 4);
        assert!(game.state().player.position.x < 240.0);
        assert_eq!(canvas.pixel(0, 0), Some(colors::BACKGROUND));
    }

    #[test]
    fn test_run_with_pacing_terminates() {
        let mut game = empty_game();
        let mut canvas = Canvas::new(screen(), 48, 80);
        let mut events = Script::new(vec![vec![PlatformEvent::Quit]]);
        let mut clock = StepClock {
            now: 0.0,
            step: 1.0,
        };

        game.run(
            &mut events,
            &mut canvas,
            &mut clock,
            Some(Duration::from_millis(2)),
        )
        .unwrap();
        assert_eq!(canvas.frames_presented(), 1);
    }
}
