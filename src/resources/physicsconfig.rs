//! Physics configuration resource.
//!
//! Tunables for integration and contact rules, loaded from an INI file.
//! Defaults are safe to run with when the file is missing.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! fixed_step = 0.016666
//! deflection_speed = 5.0
//! ground_friction = 6.0
//! ice_friction = 0.5
//! max_velocity = 1000.0
//!
//! [debug]
//! log_contacts = false
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use log::info;

const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;
const DEFAULT_DEFLECTION_SPEED: f32 = 5.0;
const DEFAULT_GROUND_FRICTION: f32 = 6.0;
const DEFAULT_ICE_FRICTION: f32 = 0.5;
const DEFAULT_MAX_VELOCITY: f32 = 1000.0;
const DEFAULT_LOG_CONTACTS: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./physics.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Seconds per simulation step used by the demo runner.
    pub fixed_step: f32,
    /// Vertical speed given to projectiles reflected up or down by a shield.
    pub deflection_speed: f32,
    /// Horizontal drag applied to feet standing on a block.
    pub ground_friction: f32,
    /// Drag applied while touching ice.
    pub ice_friction: f32,
    /// Default per-axis velocity clamp for new bodies.
    pub max_velocity: f32,
    /// Log every resolved contact at debug level.
    pub log_contacts: bool,
    pub config_path: PathBuf,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsConfig {
    pub fn new() -> Self {
        Self {
            fixed_step: DEFAULT_FIXED_STEP,
            deflection_speed: DEFAULT_DEFLECTION_SPEED,
            ground_friction: DEFAULT_GROUND_FRICTION,
            ice_friction: DEFAULT_ICE_FRICTION,
            max_velocity: DEFAULT_MAX_VELOCITY,
            log_contacts: DEFAULT_LOG_CONTACTS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from the INI file. Missing keys keep their current values.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config)
    }

    /// Load values from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), String> {
        // [physics] section
        if let Some(step) = config.getfloat("physics", "fixed_step")? {
            if step <= 0.0 {
                return Err(format!("fixed_step must be positive, got {}", step));
            }
            self.fixed_step = step as f32;
        }
        if let Some(speed) = config.getfloat("physics", "deflection_speed")? {
            self.deflection_speed = speed as f32;
        }
        if let Some(friction) = config.getfloat("physics", "ground_friction")? {
            self.ground_friction = friction as f32;
        }
        if let Some(friction) = config.getfloat("physics", "ice_friction")? {
            self.ice_friction = friction as f32;
        }
        if let Some(max) = config.getfloat("physics", "max_velocity")? {
            self.max_velocity = max as f32;
        }

        // [debug] section
        if let Some(log_contacts) = config.getbool("debug", "log_contacts")? {
            self.log_contacts = log_contacts;
        }

        info!(
            "Loaded physics config: step={}, deflection={}, ground_friction={}, ice_friction={}, max_velocity={}, log_contacts={}",
            self.fixed_step,
            self.deflection_speed,
            self.ground_friction,
            self.ice_friction,
            self.max_velocity,
            self.log_contacts
        );
        Ok(())
    }

    /// Render the current values as INI text.
    pub fn to_ini_string(&self) -> String {
        let mut config = Ini::new();
        config.set("physics", "fixed_step", Some(self.fixed_step.to_string()));
        config.set("physics", "deflection_speed", Some(self.deflection_speed.to_string()));
        config.set("physics", "ground_friction", Some(self.ground_friction.to_string()));
        config.set("physics", "ice_friction", Some(self.ice_friction.to_string()));
        config.set("physics", "max_velocity", Some(self.max_velocity.to_string()));
        config.set("debug", "log_contacts", Some(self.log_contacts.to_string()));
        config.writes()
    }

    pub fn save_to_file(&self) -> Result<(), String> {
        std::fs::write(&self.config_path, self.to_ini_string())
            .map_err(|e| format!("Failed to save config file: {}", e))?;
        info!("Saved physics config to {:?}", self.config_path);
        Ok(())
    }
}
