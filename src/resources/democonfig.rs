//! Demo run settings.
//!
//! The demo binary reads an optional INI file and lets command-line flags
//! override individual values. Anything absent falls back to a safe
//! default, so running with no file and no flags always works.
//!
//! # Configuration File Format
//!
//! ```ini
//! [demo]
//! run_for = 8.0
//! timestep = 0.1
//! time_scale = 1.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_RUN_FOR: f32 = 8.0;
const DEFAULT_TIMESTEP: f32 = 0.1;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./defercall.ini";

/// Settings for one demo run.
#[derive(Resource, Debug, Clone)]
pub struct DemoConfig {
    /// Simulated seconds to run for.
    pub run_for: f32,
    /// Fixed timestep in seconds.
    pub timestep: f32,
    /// Time scale applied to the play world.
    pub time_scale: f32,
    /// INI file consulted by [`load_from_file`](Self::load_from_file).
    pub config_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoConfig {
    /// Safe startup defaults.
    pub fn new() -> Self {
        Self {
            run_for: DEFAULT_RUN_FOR,
            timestep: DEFAULT_TIMESTEP,
            time_scale: DEFAULT_TIME_SCALE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Defaults with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Read the `[demo]` section of the INI file at `config_path`.
    ///
    /// Keys that are missing or fail to parse keep their current values.
    /// An unreadable file is reported as an error so the caller can decide
    /// whether that matters.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| format!("Cannot read {:?}: {}", self.config_path, e))?;

        let read = |ini: &Ini, key: &str| ini.getfloat("demo", key).ok().flatten();
        if let Some(v) = read(&ini, "run_for") {
            self.run_for = v as f32;
        }
        if let Some(v) = read(&ini, "timestep") {
            self.timestep = v as f32;
        }
        if let Some(v) = read(&ini, "time_scale") {
            self.time_scale = v as f32;
        }

        info!(
            "Config from {:?}: run_for={}s, timestep={}s, time_scale={}",
            self.config_path, self.run_for, self.timestep, self.time_scale
        );
        Ok(())
    }

    /// Clamp values the fixed-step loop cannot run with.
    ///
    /// A non-positive timestep would make the step count unbounded;
    /// negative run time and time scale are treated as zero.
    pub fn sanitize(&mut self) {
        if self.timestep <= 0.0 {
            self.timestep = DEFAULT_TIMESTEP;
        }
        if self.run_for < 0.0 {
            self.run_for = 0.0;
        }
        if self.time_scale < 0.0 {
            self.time_scale = 0.0;
        }
    }
}
