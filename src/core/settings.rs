use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::TypeSpecError;

use super::field::LAST_POSITION;

/// Named position usable in settings files instead of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    First,
    Last,
}

/// A position as written in settings: either an index or an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionSetting {
    Index(usize),
    Anchor(Anchor),
}

impl PositionSetting {
    pub fn resolve(self) -> usize {
        match self {
            PositionSetting::Index(index) => index,
            PositionSetting::Anchor(Anchor::First) => 0,
            PositionSetting::Anchor(Anchor::Last) => LAST_POSITION,
        }
    }
}

/// Mapping settings that can live outside the code, typically in a JSON file.
///
/// Every entry is optional. Settings are applied with
/// [`TypeSpecBuilder::settings`]; builder calls made afterwards take precedence.
///
/// # Examples
///
/// ```
/// use typespec_rs::core::settings::SpecSettings;
///
/// let settings = SpecSettings::from_json(r#"{
///     "null_replacement": "NULL",
///     "positions": { "joined": 1, "id": "last" }
/// }"#).unwrap();
///
/// assert_eq!(settings.null_replacement.as_deref(), Some("NULL"));
/// assert_eq!(settings.delimiter, None);
/// assert_eq!(settings.positions.len(), 2);
/// ```
///
/// [`TypeSpecBuilder::settings`]: crate::core::type_spec::TypeSpecBuilder::settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecSettings {
    pub null_replacement: Option<String>,
    pub delimiter: Option<char>,
    pub positions: BTreeMap<String, PositionSetting>,
}

impl SpecSettings {
    pub fn from_json(json: &str) -> Result<Self, TypeSpecError> {
        serde_json::from_str(json).map_err(|error| TypeSpecError::Settings(error.to_string()))
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, TypeSpecError> {
        serde_json::from_reader(rdr).map_err(|error| TypeSpecError::Settings(error.to_string()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TypeSpecError> {
        let file = File::open(path.as_ref()).map_err(|error| {
            TypeSpecError::Settings(format!("{}: {}", path.as_ref().display(), error))
        })?;
        Self::from_reader(file)
    }

    pub fn to_json(&self) -> Result<String, TypeSpecError> {
        serde_json::to_string_pretty(self).map_err(|error| TypeSpecError::Settings(error.to_string()))
    }
}
