use std::time::Duration;

use mikesweeper_core::{Coord, Coord2, Minefield, SAFE_ZONE_CELLS};
use serde::{Deserialize, Serialize};

use crate::{Result, Settings, SettingsProvider};

/// Edge length of a tile in unscaled display pixels.
pub const TILE_SIZE: Coord = 16;

/// Height of the counter bar above the minefield, in unscaled display pixels.
pub const HUD_HEIGHT: Coord = 24;

/// Largest value the three-digit clock can show.
pub const CLOCK_MAX: u64 = 999;

/// Valid transitions:
/// - Ready -> Active
/// - Ready -> Won (the first discovery opens every safe cell)
/// - Active -> Won
/// - Active -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Nothing discovered yet, bombs not placed
    #[default]
    Ready,
    /// Game started
    Active,
    /// Every safe cell discovered
    Won,
    /// A bomb was discovered
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from the first click to a win or a loss, plus the settings that shape the next one.
#[derive(Clone, Debug)]
pub struct Game {
    minefield: Minefield,
    game_over: bool,
    won: bool,
    elapsed: Duration,
    zoom: Coord,
    always_chord: bool,
}

impl Game {
    /// Starts a game with bomb layouts seeded from the thread RNG.
    pub fn new(settings: &Settings) -> Self {
        Self::with_seed(settings, rand::random())
    }

    /// Starts a game whose bomb layouts are reproducible from `seed`.
    pub fn with_seed(settings: &Settings, seed: u64) -> Self {
        let mut minefield = Minefield::new(seed);
        minefield.set_origin((0, HUD_HEIGHT));
        minefield.set_tile_size(TILE_SIZE);

        let mut game = Self {
            minefield,
            game_over: false,
            won: false,
            elapsed: Duration::ZERO,
            zoom: 1,
            always_chord: false,
        };
        game.apply_settings(settings);
        game
    }

    /// Starts a game from whatever `provider` has stored.
    pub fn from_provider(provider: &impl SettingsProvider) -> Result<Self> {
        let settings = provider.load()?;
        Ok(Self::new(&settings))
    }

    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    pub fn state(&self) -> GameState {
        if self.won {
            GameState::Won
        } else if self.game_over {
            GameState::Lost
        } else if self.minefield.has_started() {
            GameState::Active
        } else {
            GameState::Ready
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Copies the board and play settings over and starts a fresh game.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.minefield.set_target_bomb_count(settings.bombs());
        self.minefield.resize(settings.columns(), settings.rows());
        self.zoom = settings.zoom().max(1);
        self.always_chord = settings.always_chord();
        self.restart();
    }

    /// Clears the board and the clock, keeping the current settings.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.won = false;
        self.game_over = false;
        self.minefield.reset();
        log::debug!(
            "New {}x{} game with {} bombs",
            self.minefield.width(),
            self.minefield.height(),
            self.minefield.target_bomb_count()
        );
    }

    /// Discovers a cell and settles the game if it was a bomb or the last safe cell.
    pub fn discover(&mut self, coords: Coord2) -> bool {
        if self.game_over || !self.minefield.discover(coords) {
            return false;
        }

        if self.minefield.is_bomb(coords) {
            log::info!("Bomb discovered at {coords:?}, game lost");
            self.game_over = true;
        }
        self.won = self.win_condition();
        if self.won {
            log::info!("Game won in {:.1}s", self.elapsed.as_secs_f32());
            self.game_over = true;
        }
        true
    }

    fn win_condition(&self) -> bool {
        !self.game_over
            && self.minefield.total_cells() - self.minefield.bomb_count()
                == self.minefield.discovered_cells()
    }

    /// Discovers all neighbors once the flags around a discovered cell match its bomb count.
    ///
    /// A misplaced flag means a bomb gets discovered, which ends the game.
    pub fn chord(&mut self, coords: Coord2) -> bool {
        if self.game_over || !self.minefield.can_chord(coords) {
            return false;
        }

        let mut discovered = false;
        for pos in self.minefield.neighbors(coords) {
            discovered |= self.discover(pos);
        }
        discovered
    }

    /// The primary click: chords on discovered cells when always-chord is enabled, otherwise discovers.
    pub fn primary_action(&mut self, coords: Coord2) -> bool {
        if self.always_chord && self.minefield.is_discovered(coords) {
            self.chord(coords)
        } else {
            self.discover(coords)
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> bool {
        !self.game_over && self.minefield.toggle_flag(coords)
    }

    /// Advances the clock, which only runs between the first discovery and the end of the game.
    pub fn tick(&mut self, dt: Duration) {
        if !self.game_over && self.minefield.has_started() {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whole seconds for the clock display.
    pub fn clock_display(&self) -> u64 {
        self.elapsed.as_secs().min(CLOCK_MAX)
    }

    /// Bomb counter for the display: bombs minus flags once started, otherwise the bombs the first click will place.
    pub fn bombs_display(&self) -> i64 {
        if self.minefield.has_started() {
            self.minefield.mines_left()
        } else {
            let capacity =
                i64::from(self.minefield.total_cells()) - i64::from(SAFE_ZONE_CELLS);
            capacity.min(i64::from(self.minefield.target_bomb_count()))
        }
    }

    /// Maps a window pixel to the grid cell under it; may be out of bounds.
    pub fn cursor_at(&self, (px, py): Coord2) -> Coord2 {
        self.minefield
            .position_to_index((px.div_euclid(self.zoom), py.div_euclid(self.zoom)))
    }

    /// Window size in pixels needed to show the board and the counter bar.
    pub fn viewport_size(&self) -> Coord2 {
        let (width, height) = self.minefield.size();
        (
            width.saturating_mul(TILE_SIZE).saturating_mul(self.zoom),
            height
                .saturating_mul(TILE_SIZE)
                .saturating_add(HUD_HEIGHT)
                .saturating_mul(self.zoom),
        )
    }
}
