use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Color;

pub const DEFAULT_DEPTH: u8 = 5;
pub const MAX_DEPTH: u8 = 10;

/// Settings of the computer-controlled side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed search depth in plies.
    pub depth: u8,
    /// Color played by the engine; the human plays the other one.
    pub engine_color: Color,
}

/// Converts a caller-supplied search depth. Zero and negative depths mean
/// "evaluate only" and map to 0.
pub fn search_depth(depth: i32) -> Result<u8, ConfigError> {
    if depth <= 0 {
        return Ok(0);
    }
    match u8::try_from(depth) {
        Ok(depth) if depth <= MAX_DEPTH => Ok(depth),
        _ => Err(ConfigError::DepthTooLarge {
            depth,
            max: MAX_DEPTH,
        }),
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(ConfigError::InvalidDepth {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }

    pub fn human_color(&self) -> Color {
        self.engine_color.opponent()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            engine_color: Color::Black,
        }
    }
}
