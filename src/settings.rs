//! Demo settings
//!
//! Handed in by the UI on each apply; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::error::DemoError;

/// Which balls start in motion after a restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StartStyle {
    /// Only the top-row small ball moves; the rest wait to be hit
    #[default]
    New,
    /// Every ball starts moving
    Old,
}

impl StartStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartStyle::New => "new",
            StartStyle::Old => "old",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(StartStyle::New),
            "old" => Some(StartStyle::Old),
            _ => None,
        }
    }
}

/// How balls are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsStyle {
    /// Translucent gray disc with the holes cut out
    #[default]
    #[serde(rename = "new")]
    Cutout,
    /// Colored disc, white rim, holes drawn as rings
    #[serde(rename = "old")]
    Outlined,
    /// Colored disc, white rim, a cross through the center to show spin
    #[serde(rename = "cross")]
    SpinCross,
}

impl GraphicsStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphicsStyle::Cutout => "new",
            GraphicsStyle::Outlined => "old",
            GraphicsStyle::SpinCross => "cross",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" | "cutout" => Some(GraphicsStyle::Cutout),
            "old" | "outlined" => Some(GraphicsStyle::Outlined),
            "cross" | "spin" => Some(GraphicsStyle::SpinCross),
            _ => None,
        }
    }
}

/// Complete demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Start pattern for the next restart
    #[serde(rename = "style")]
    pub start_style: StartStyle,
    /// Ball drawing style
    pub graphics_style: GraphicsStyle,
    /// Text repeated across the background
    pub background_text: String,
    /// Regenerate the background noise every frame
    pub noise_animated: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_style: StartStyle::New,
            graphics_style: GraphicsStyle::Cutout,
            background_text: "RETRO BOUNCE".to_string(),
            noise_animated: false,
        }
    }
}

/// Raw settings as the UI sends them. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsInput {
    style: Option<String>,
    graphics_style: Option<String>,
    background_text: Option<String>,
    noise_animated: Option<bool>,
}

impl Settings {
    /// Strict parse: unknown style names are an error
    pub fn parse_json(json: &str) -> Result<Self, DemoError> {
        let input: SettingsInput = serde_json::from_str(json)?;
        let defaults = Self::default();

        let start_style = match input.style {
            Some(s) => StartStyle::from_str(&s).ok_or(DemoError::InvalidOption {
                field: "style",
                value: s,
            })?,
            None => defaults.start_style,
        };
        let graphics_style = match input.graphics_style {
            Some(s) => GraphicsStyle::from_str(&s).ok_or(DemoError::InvalidOption {
                field: "graphicsStyle",
                value: s,
            })?,
            None => defaults.graphics_style,
        };

        Ok(Self {
            start_style,
            graphics_style,
            background_text: input.background_text.unwrap_or(defaults.background_text),
            noise_animated: input.noise_animated.unwrap_or(defaults.noise_animated),
        })
    }

    /// Lenient parse used by the UI path. Missing keys keep the current
    /// value; unknown style names fall back to the default style.
    pub fn merge_json(&self, json: &str) -> Self {
        let input: SettingsInput = match serde_json::from_str(json) {
            Ok(input) => input,
            Err(e) => {
                log::warn!("Ignoring malformed settings payload: {}", e);
                return self.clone();
            }
        };

        let start_style = input
            .style
            .map(|s| {
                StartStyle::from_str(&s).unwrap_or_else(|| {
                    let fallback = StartStyle::default();
                    log::warn!("Unknown start style {:?}, using {}", s, fallback.as_str());
                    fallback
                })
            })
            .unwrap_or(self.start_style);
        let graphics_style = input
            .graphics_style
            .map(|s| {
                GraphicsStyle::from_str(&s).unwrap_or_else(|| {
                    let fallback = GraphicsStyle::default();
                    log::warn!("Unknown graphics style {:?}, using {}", s, fallback.as_str());
                    fallback
                })
            })
            .unwrap_or(self.graphics_style);

        Self {
            start_style,
            graphics_style,
            background_text: input
                .background_text
                .unwrap_or_else(|| self.background_text.clone()),
            noise_animated: input.noise_animated.unwrap_or(self.noise_animated),
        }
    }
}
