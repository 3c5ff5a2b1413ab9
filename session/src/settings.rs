use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use mikesweeper_core::{CellCount, Coord};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Result, SettingsError};

/// Preset board configurations offered to the player.
///
/// Stored as its index, like the desktop game does; variant names are accepted when reading too.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Difficulty {
    #[default]
    Easy = 0,
    Normal = 1,
    Hard = 2,
    /// Whatever the player entered by hand.
    Custom = 3,
}

impl Difficulty {
    pub const ALL: [Self; 4] = [Self::Easy, Self::Normal, Self::Hard, Self::Custom];

    pub fn from_index(index: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Easy" => Some(Self::Easy),
            "Normal" => Some(Self::Normal),
            "Hard" => Some(Self::Hard),
            "Custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

struct DifficultyVisitor;

impl<'de> Visitor<'de> for DifficultyVisitor {
    type Value = Difficulty;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a difficulty index 0..=3 or name")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Difficulty, E> {
        Difficulty::from_index(value)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Difficulty, E> {
        u64::try_from(value)
            .ok()
            .and_then(Difficulty::from_index)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Difficulty, E> {
        Difficulty::from_name(value)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(DifficultyVisitor)
    }
}

/// Bombs, rows and columns of a preset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub bombs: CellCount,
    pub rows: Coord,
    pub columns: Coord,
}

impl Difficulty {
    pub const fn preset(self) -> Option<Preset> {
        match self {
            Self::Easy => Some(Preset {
                bombs: 15,
                rows: 10,
                columns: 10,
            }),
            Self::Normal => Some(Preset {
                bombs: 25,
                rows: 15,
                columns: 10,
            }),
            Self::Hard => Some(Preset {
                bombs: 99,
                rows: 20,
                columns: 20,
            }),
            Self::Custom => None,
        }
    }
}

/// Player settings: board shape, bomb count, display scale and play modes.
///
/// The serialized layout matches the `options.json` written by the desktop game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Settings {
    bombs: CellCount,
    rows: Coord,
    columns: Coord,
    zoom: Coord,
    always_chord: bool,
    puppy_mode: bool,
    #[serde(rename = "difficulty")]
    difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bombs: 15,
            rows: 10,
            columns: 10,
            zoom: 4,
            always_chord: false,
            puppy_mode: false,
            difficulty: Difficulty::Easy,
        }
    }
}

impl Settings {
    pub const BOMBS_MIN: CellCount = 1;
    pub const BOMBS_MAX: CellCount = 999;
    pub const DIMENSION_MIN: Coord = 10;
    pub const DIMENSION_MAX: Coord = 40;
    pub const ZOOM_MIN: Coord = 1;
    pub const ZOOM_MAX: Coord = 4;

    /// Switches to `difficulty`, taking over its preset board when it has one.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        if let Some(preset) = difficulty.preset() {
            self.bombs = preset.bombs;
            self.rows = preset.rows;
            self.columns = preset.columns;
        }
        self.difficulty = difficulty;
        self
    }

    pub fn bombs(&self) -> CellCount {
        self.bombs
    }

    pub fn rows(&self) -> Coord {
        self.rows
    }

    pub fn columns(&self) -> Coord {
        self.columns
    }

    pub fn zoom(&self) -> Coord {
        self.zoom
    }

    pub fn always_chord(&self) -> bool {
        self.always_chord
    }

    pub fn puppy_mode(&self) -> bool {
        self.puppy_mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_bombs(&mut self, bombs: CellCount) {
        self.bombs = bombs;
        self.difficulty = Difficulty::Custom;
    }

    pub fn set_rows(&mut self, rows: Coord) {
        self.rows = rows;
        self.difficulty = Difficulty::Custom;
    }

    pub fn set_columns(&mut self, columns: Coord) {
        self.columns = columns;
        self.difficulty = Difficulty::Custom;
    }

    pub fn set_zoom(&mut self, zoom: Coord) {
        self.zoom = zoom;
    }

    pub fn set_always_chord(&mut self, always_chord: bool) {
        self.always_chord = always_chord;
    }

    pub fn set_puppy_mode(&mut self, puppy_mode: bool) {
        self.puppy_mode = puppy_mode;
    }

    /// Forces every number into its allowed range.
    pub fn clamped(mut self) -> Self {
        self.bombs = clamp_logged("bombs", self.bombs, Self::BOMBS_MIN, Self::BOMBS_MAX);
        self.rows = clamp_logged("rows", self.rows, Self::DIMENSION_MIN, Self::DIMENSION_MAX);
        self.columns = clamp_logged(
            "columns",
            self.columns,
            Self::DIMENSION_MIN,
            Self::DIMENSION_MAX,
        );
        self.zoom = clamp_logged("zoom", self.zoom, Self::ZOOM_MIN, Self::ZOOM_MAX);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_range("bombs", self.bombs, Self::BOMBS_MIN, Self::BOMBS_MAX)?;
        check_range("rows", self.rows, Self::DIMENSION_MIN, Self::DIMENSION_MAX)?;
        check_range(
            "columns",
            self.columns,
            Self::DIMENSION_MIN,
            Self::DIMENSION_MAX,
        )?;
        check_range("zoom", self.zoom, Self::ZOOM_MIN, Self::ZOOM_MAX)
    }
}

fn clamp_logged<T: Ord + Copy + std::fmt::Display>(name: &str, value: T, min: T, max: T) -> T {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("Setting {name} = {value} out of range {min}..={max}, using {clamped}");
    }
    clamped
}

fn check_range<T: Ord + std::fmt::Display>(name: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        return Err(SettingsError::Invalid(format!(
            "{name} must be within {min}..={max}, got {value}"
        )));
    }
    Ok(())
}

/// Where settings come from and go to.
pub trait SettingsProvider {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Keeps settings in memory only.
#[derive(Debug, Default)]
pub struct MemorySettings {
    settings: RefCell<Settings>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RefCell::new(settings),
        }
    }
}

impl SettingsProvider for MemorySettings {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.borrow().clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        *self.settings.borrow_mut() = settings.clone();
        Ok(())
    }
}

/// Persists settings as JSON in a single file.
#[derive(Clone, Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub const FILE_NAME: &'static str = "options.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses [`Self::FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsProvider for JsonFileSettings {
    /// Falls back to defaults when the file does not exist yet.
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            log::info!(
                "No settings at {}, using defaults",
                self.path.display()
            );
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| SettingsError::Read {
            path: self.path.clone(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings.clamped())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_easy_preset() {
        let settings = Settings::default();

        assert_eq!(settings.difficulty(), Difficulty::Easy);
        assert_eq!(settings, Settings::default().with_difficulty(Difficulty::Easy));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn presets_apply_board() {
        let normal = Settings::default().with_difficulty(Difficulty::Normal);
        assert_eq!((normal.bombs(), normal.rows(), normal.columns()), (25, 15, 10));

        let hard = Settings::default().with_difficulty(Difficulty::Hard);
        assert_eq!((hard.bombs(), hard.rows(), hard.columns()), (99, 20, 20));
    }

    #[test]
    fn custom_keeps_current_board() {
        let custom = Settings::default()
            .with_difficulty(Difficulty::Hard)
            .with_difficulty(Difficulty::Custom);

        assert_eq!(custom.difficulty(), Difficulty::Custom);
        assert_eq!(custom.bombs(), 99);
    }

    #[test]
    fn manual_board_edit_switches_to_custom() {
        let mut settings = Settings::default().with_difficulty(Difficulty::Normal);
        settings.set_rows(12);

        assert_eq!(settings.difficulty(), Difficulty::Custom);

        let mut settings = Settings::default();
        settings.set_zoom(2);
        assert_eq!(settings.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn clamped_forces_ranges() {
        let mut settings = Settings::default();
        settings.set_bombs(5000);
        settings.set_rows(3);
        settings.set_columns(100);
        settings.set_zoom(0);

        let settings = settings.clamped();

        assert_eq!(settings.bombs(), 999);
        assert_eq!(settings.rows(), 10);
        assert_eq!(settings.columns(), 40);
        assert_eq!(settings.zoom(), 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_reports_first_violation() {
        let mut settings = Settings::default();
        settings.set_bombs(0);

        let err = settings.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid settings: bombs must be within 1..=999, got 0"
        );
    }

    #[test]
    fn serialized_keys_follow_desktop_layout() {
        let json = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(json["Bombs"], 15);
        assert_eq!(json["Rows"], 10);
        assert_eq!(json["Columns"], 10);
        assert_eq!(json["Zoom"], 4);
        assert_eq!(json["AlwaysChord"], false);
        assert_eq!(json["PuppyMode"], false);
        assert_eq!(json["difficulty"], 0);
    }

    #[test]
    fn difficulty_reads_index_or_name() {
        let by_index: Settings = serde_json::from_str(r#"{"difficulty": 2}"#).unwrap();
        let by_name: Settings = serde_json::from_str(r#"{"difficulty": "Hard"}"#).unwrap();

        assert_eq!(by_index.difficulty(), Difficulty::Hard);
        assert_eq!(by_name.difficulty(), Difficulty::Hard);
        assert!(serde_json::from_str::<Settings>(r#"{"difficulty": 7}"#).is_err());
        assert!(serde_json::from_str::<Settings>(r#"{"difficulty": "Insane"}"#).is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"Bombs": 40, "PuppyMode": true}"#).unwrap();

        assert_eq!(settings.bombs(), 40);
        assert!(settings.puppy_mode());
        assert_eq!(settings.rows(), 10);
    }

    #[test]
    fn memory_provider_round_trips_and_rejects_invalid() {
        let provider = MemorySettings::default();
        let hard = Settings::default().with_difficulty(Difficulty::Hard);

        provider.save(&hard).unwrap();
        assert_eq!(provider.load().unwrap(), hard);

        let mut broken = hard.clone();
        broken.set_zoom(9);
        assert!(matches!(provider.save(&broken), Err(SettingsError::Invalid(_))));
        assert_eq!(provider.load().unwrap(), hard);
    }

    #[test]
    fn file_provider_uses_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let provider = JsonFileSettings::in_dir(temp_dir.path());

        assert_eq!(provider.load().unwrap(), Settings::default());
        assert!(!provider.path().exists());
    }

    #[test]
    fn file_provider_creates_directory_on_save() {
        let temp_dir = TempDir::new().unwrap();
        let provider = JsonFileSettings::in_dir(temp_dir.path().join("Mikesweeper"));
        let mut settings = Settings::default().with_difficulty(Difficulty::Normal);
        settings.set_always_chord(true);

        provider.save(&settings).unwrap();

        assert!(provider.path().exists());
        assert_eq!(provider.load().unwrap(), settings);
    }

    #[test]
    fn file_provider_clamps_hand_edited_values() {
        let temp_dir = TempDir::new().unwrap();
        let provider = JsonFileSettings::in_dir(temp_dir.path());
        fs::write(provider.path(), r#"{"Rows": 80, "Zoom": 7}"#).unwrap();

        let settings = provider.load().unwrap();

        assert_eq!(settings.rows(), 40);
        assert_eq!(settings.zoom(), 4);
    }

    #[test]
    fn file_provider_loads_desktop_options_file() {
        let temp_dir = TempDir::new().unwrap();
        let provider = JsonFileSettings::in_dir(temp_dir.path());
        fs::write(
            provider.path(),
            r#"{"Bombs":25,"Rows":15,"Columns":10,"Zoom":4,"AlwaysChord":false,"PuppyMode":false,"difficulty":1}"#,
        )
        .unwrap();

        let settings = provider.load().unwrap();

        assert_eq!(settings, Settings::default().with_difficulty(Difficulty::Normal));
    }

    #[test]
    fn file_provider_writes_desktop_layout() {
        let temp_dir = TempDir::new().unwrap();
        let provider = JsonFileSettings::in_dir(temp_dir.path());

        provider
            .save(&Settings::default().with_difficulty(Difficulty::Hard))
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(provider.path()).unwrap()).unwrap();
        assert_eq!(json["difficulty"], 2);
        assert_eq!(json["Bombs"], 99);
    }

    #[test]
    fn file_provider_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let provider = JsonFileSettings::in_dir(temp_dir.path());
        fs::write(provider.path(), "not json").unwrap();

        assert!(matches!(provider.load(), Err(SettingsError::Parse(_))));
    }
}
