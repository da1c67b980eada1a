//! Space description: corridors, destinations and image dimensions.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Vec2;

/// A simply-connected walkable polygon on one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    pub id: String,
    pub floor: i32,
    pub polygon: Vec<Vec2>,
    /// Free-form label (corridor, room, lobby). Does not affect rasterization.
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "corridor".to_string()
}

impl Corridor {
    pub fn new(id: impl Into<String>, floor: i32, polygon: Vec<Vec2>) -> Self {
        Self {
            id: id.into(),
            floor,
            polygon,
            kind: default_kind(),
        }
    }

    /// Axis-aligned rectangle corridor, handy for fixtures and simple floor plans.
    pub fn rect(id: impl Into<String>, floor: i32, min: Vec2, max: Vec2) -> Self {
        Self::new(
            id,
            floor,
            vec![
                Vec2::new(min.x, min.y),
                Vec2::new(max.x, min.y),
                Vec2::new(max.x, max.y),
                Vec2::new(min.x, max.y),
            ],
        )
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}

/// A named point goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub floor: i32,
    pub x: f32,
    pub y: f32,
}

impl Destination {
    pub fn new(id: impl Into<String>, floor: i32, x: f32, y: f32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            floor,
            x,
            y,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Everything needed to (re)build an environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceConfig {
    #[serde(default)]
    pub corridors: Vec<Corridor>,
    #[serde(default)]
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub image_width: f32,
    #[serde(default)]
    pub image_height: f32,
}

impl SpaceConfig {
    /// Load a space description from JSON (`.json`) or YAML (anything else).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read space from {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let space: Self = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse space from {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse space from {}", path.display()))?
        };
        Ok(space)
    }

    pub fn destination(&self, id: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    /// Distinct floors referenced by corridors, ascending.
    pub fn floors(&self) -> Vec<i32> {
        let mut floors: Vec<i32> = self.corridors.iter().map(|c| c.floor).collect();
        floors.sort_unstable();
        floors.dedup();
        floors
    }
}
