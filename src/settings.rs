//! User settings document shared with the settings UI.
//!
//! The UI owns the file; this module only fixes its JSON shape:
//!
//! ```json
//! {
//!   "keyboard": [{"id": "1", "sourceKey": "A", "mode": "remap", "targetKey": "B"}],
//!   "mouse": {"swapButtons": false, "numpad5Primary": false,
//!             "numpadPlusSecondary": false, "yAxisInvert": false, "movingSpeed": 1.0}
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::mouse::MouseSettings;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What a keyboard row does with its source key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowMode {
    Remap,
    Block,
    Pass,
}

/// One keyboard row. Keys are display names resolved by `keycodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardRow {
    #[serde(default)]
    pub id: Option<String>,
    pub source_key: String,
    pub mode: RowMode,
    #[serde(default)]
    pub target_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub keyboard: Vec<KeyboardRow>,
    pub mouse: MouseSettings,
}

impl UserSettings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }
}
