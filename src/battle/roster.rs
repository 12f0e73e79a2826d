//! Character templates and the lookup units resolve them through
//!
//! A template is resolved once per unit from its type key and never changes
//! afterwards. Only rendering consumes it.

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, UnitError};

/// Stats and appearance of a character archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterTemplate {
    /// Archetype key, also the prefix of every animation clip
    pub key: String,
    pub name: String,
    #[serde(default = "default_max_health")]
    pub max_health: f32,
    /// Texture key of the body sprite; defaults to the archetype key
    #[serde(default)]
    pub sprite_sheet: Option<String>,
}

fn default_max_health() -> f32 {
    100.0
}

impl CharacterTemplate {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            max_health: default_max_health(),
            sprite_sheet: None,
        }
    }

    pub fn texture_key(&self) -> &str {
        self.sprite_sheet.as_deref().unwrap_or(&self.key)
    }
}

/// Resolves a type key to its template
pub trait CharacterLookup: Send + Sync {
    fn resolve(&self, type_key: &str) -> Result<CharacterTemplate>;
}

/// In-memory set of character templates
#[derive(Debug, Clone, Default)]
pub struct CharacterRoster {
    templates: AHashMap<String, CharacterTemplate>,
}

impl CharacterRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, replacing any with the same key
    pub fn insert(&mut self, template: CharacterTemplate) {
        self.templates.insert(template.key.clone(), template);
    }

    pub fn with(mut self, template: CharacterTemplate) -> Self {
        self.insert(template);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CharacterTemplate> {
        self.templates.get(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Load templates from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse templates from a TOML string with `[[characters]]` tables
    pub fn parse_toml(content: &str) -> Result<Self> {
        let file: TomlRoster = toml::from_str(content)?;
        let mut roster = Self::new();
        for template in file.characters {
            roster.insert(template);
        }
        Ok(roster)
    }
}

impl CharacterLookup for CharacterRoster {
    fn resolve(&self, type_key: &str) -> Result<CharacterTemplate> {
        self.get(type_key)
            .cloned()
            .ok_or_else(|| UnitError::UnknownCharacter(type_key.to_string()))
    }
}

/// TOML representation of a roster file
#[derive(Debug, Deserialize)]
struct TomlRoster {
    #[serde(default)]
    characters: Vec<CharacterTemplate>,
}
