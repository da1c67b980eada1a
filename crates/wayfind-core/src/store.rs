use std::collections::BTreeMap;

use serde::Serialize;

use crate::{build_clearance, rasterize, ClearanceField, NavGrid, SpaceConfig};

/// Key into the layer store: one entry per floor plus the floor-agnostic combined layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FloorKey {
    Combined,
    Level(i32),
}

impl From<Option<i32>> for FloorKey {
    fn from(floor: Option<i32>) -> Self {
        floor.map_or(FloorKey::Combined, FloorKey::Level)
    }
}

/// A rasterized grid and the clearance field derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorLayer {
    pub grid: NavGrid,
    pub clearance: ClearanceField,
}

impl FloorLayer {
    fn build(space: &SpaceConfig, resolution: f32, floor: Option<i32>) -> Self {
        let grid = rasterize(
            &space.corridors,
            space.image_width,
            space.image_height,
            resolution,
            floor,
        );
        let clearance = build_clearance(&grid);
        Self { grid, clearance }
    }
}

/// Every layer of one environment, built together and replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct GridStore {
    layers: BTreeMap<FloorKey, FloorLayer>,
}

impl GridStore {
    /// Rasterize the combined layer plus one layer per floor mentioned by corridors or
    /// destinations.
    pub fn build(space: &SpaceConfig, resolution: f32) -> Self {
        let mut floors = space.floors();
        floors.extend(space.destinations.iter().map(|d| d.floor));
        floors.sort_unstable();
        floors.dedup();

        let mut layers = BTreeMap::new();
        layers.insert(
            FloorKey::Combined,
            FloorLayer::build(space, resolution, None),
        );
        for floor in floors {
            layers.insert(
                FloorKey::Level(floor),
                FloorLayer::build(space, resolution, Some(floor)),
            );
        }
        Self { layers }
    }

    pub fn get(&self, key: FloorKey) -> Option<&FloorLayer> {
        self.layers.get(&key)
    }

    pub fn combined(&self) -> Option<&FloorLayer> {
        self.get(FloorKey::Combined)
    }

    /// `false` when the space had no usable image dimensions.
    pub fn is_configured(&self) -> bool {
        self.combined().is_some_and(|layer| !layer.grid.is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = FloorKey> + '_ {
        self.layers.keys().copied()
    }
}
