use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::{
    extract_path, solve, Destination, FloorKey, FloorLayer, GridStore, NavError, PathOutcome,
    PathResult, Result, SolverConfig, SpaceConfig, ValueField, Vec2,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavStats {
    pub grid_width: u32,
    pub grid_height: u32,
    pub resolution: f32,
    pub navigable_cell_count: usize,
    pub solved_destination_count: usize,
    pub destination_count: usize,
    pub floor_count: usize,
}

/// Outcome of a bulk solve. A destination that fails never stops the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolveSummary {
    pub solved: Vec<String>,
    pub unreachable: Vec<String>,
    /// Solved, but the sweep cap was reached before convergence.
    pub unconverged: Vec<String>,
}

#[derive(Debug)]
struct Environment {
    space: SpaceConfig,
    store: GridStore,
    destinations: BTreeMap<String, Destination>,
}

/// Owns grids, clearance fields and the per-destination value-field cache.
///
/// `set_environment` needs `&mut self` and swaps everything in one step; queries take
/// `&self`. Value fields are solved at most once per destination and shared as
/// `Arc<ValueField>`. Multi-threaded hosts wrap the whole `Wayfinder` in an `RwLock`.
#[derive(Debug)]
pub struct Wayfinder {
    config: SolverConfig,
    env: Option<Environment>,
    fields: RwLock<BTreeMap<String, Arc<ValueField>>>,
}

impl Default for Wayfinder {
    fn default() -> Self {
        Self {
            config: SolverConfig::default(),
            env: None,
            fields: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Wayfinder {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Rebuild every grid and clearance field and drop all cached value fields.
    ///
    /// A space without positive image dimensions leaves the wayfinder unconfigured.
    pub fn set_environment(&mut self, space: SpaceConfig) -> Result<()> {
        let mut destinations = BTreeMap::new();
        for dest in &space.destinations {
            if destinations.insert(dest.id.clone(), dest.clone()).is_some() {
                return Err(NavError::DuplicateDestination(dest.id.clone()));
            }
        }

        self.fields = RwLock::new(BTreeMap::new());

        let store = GridStore::build(&space, self.config.resolution);
        if !store.is_configured() {
            tracing::warn!(
                image_width = space.image_width,
                image_height = space.image_height,
                "image dimensions not set; navigation stays unconfigured"
            );
            self.env = None;
            return Ok(());
        }

        if let Some(layer) = store.combined() {
            tracing::info!(
                corridors = space.corridors.len(),
                destinations = destinations.len(),
                grid_width = layer.grid.width(),
                grid_height = layer.grid.height(),
                navigable = layer.grid.walkable_count(),
                "navigation environment rebuilt"
            );
        }

        self.env = Some(Environment {
            space,
            store,
            destinations,
        });
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.env.is_some()
    }

    fn env(&self) -> Result<&Environment> {
        self.env.as_ref().ok_or(NavError::NotConfigured)
    }

    pub fn space(&self) -> Result<&SpaceConfig> {
        Ok(&self.env()?.space)
    }

    pub fn grid_store(&self) -> Result<&GridStore> {
        Ok(&self.env()?.store)
    }

    /// Layer for `floor`, or the combined layer for `None`. Unknown floors yield `None`.
    pub fn layer(&self, floor: Option<i32>) -> Result<Option<&FloorLayer>> {
        Ok(self.env()?.store.get(FloorKey::from(floor)))
    }

    pub fn destination(&self, id: &str) -> Result<&Destination> {
        self.env()?
            .destinations
            .get(id)
            .ok_or_else(|| NavError::UnknownDestination(id.to_string()))
    }

    pub fn is_navigable(&self, p: Vec2, floor: Option<i32>) -> Result<bool> {
        Ok(self.layer(floor)?.is_some_and(|layer| {
            layer
                .grid
                .world_to_cell(p)
                .is_some_and(|cell| layer.grid.is_walkable(cell))
        }))
    }

    /// Center of the walkable cell nearest to `p`, if any lies within the snap radius.
    pub fn nearest_navigable(&self, p: Vec2, floor: Option<i32>) -> Result<Option<Vec2>> {
        let Some(layer) = self.layer(floor)? else {
            return Ok(None);
        };
        let origin = layer.grid.raw_cell(p);
        Ok(layer
            .grid
            .nearest_walkable(origin, self.config.snap_radius)
            .map(|cell| layer.grid.cell_center(cell)))
    }

    pub fn value_field(&self, id: &str) -> Option<Arc<ValueField>> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn is_solved(&self, id: &str) -> bool {
        self.value_field(id).is_some()
    }

    /// Drop every cached value field; they are re-solved on demand.
    pub fn reset_fields(&mut self) {
        self.fields
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Cached value field for `id`, solving it first if needed.
    pub fn ensure_field(&self, id: &str) -> Result<Arc<ValueField>> {
        let env = self.env()?;
        let dest = env
            .destinations
            .get(id)
            .ok_or_else(|| NavError::UnknownDestination(id.to_string()))?;

        if let Some(field) = self.value_field(id) {
            return Ok(field);
        }

        let layer = env
            .store
            .get(FloorKey::Level(dest.floor))
            .ok_or_else(|| NavError::UnreachableDestination(id.to_string()))?;
        let field = Arc::new(solve(dest, &layer.grid, &layer.clearance, &self.config)?);

        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        Ok(fields.entry(id.to_string()).or_insert(field).clone())
    }

    pub fn solve_all(&self) -> Result<SolveSummary> {
        self.solve_all_with_progress(|_| {})
    }

    /// Solve every destination, reporting fractional progress in `(0, 1]` after each one.
    pub fn solve_all_with_progress(&self, mut progress: impl FnMut(f32)) -> Result<SolveSummary> {
        let env = self.env()?;
        let total = env.destinations.len();
        let mut summary = SolveSummary::default();

        for (done, id) in env.destinations.keys().enumerate() {
            match self.ensure_field(id) {
                Ok(field) => {
                    if !field.report().converged {
                        summary.unconverged.push(id.clone());
                    }
                    summary.solved.push(id.clone());
                }
                Err(err) => {
                    tracing::warn!(destination = %id, error = %err, "destination not solved");
                    summary.unreachable.push(id.clone());
                }
            }
            progress((done + 1) as f32 / total as f32);
        }

        tracing::info!(
            solved = summary.solved.len(),
            unreachable = summary.unreachable.len(),
            unconverged = summary.unconverged.len(),
            "solved all destinations"
        );
        Ok(summary)
    }

    /// Route from `start` to the destination `destination_id`.
    ///
    /// `destination` is the exact goal point used for the final waypoint. `floor`, when
    /// given, must match the destination's floor; floor changes go through
    /// [`Wayfinder::stitch_route`].
    pub fn find_path(
        &self,
        start: Vec2,
        destination: Vec2,
        destination_id: &str,
        floor: Option<i32>,
    ) -> Result<PathResult> {
        let dest = self.destination(destination_id)?;
        if let Some(requested) = floor {
            if requested != dest.floor {
                return Err(NavError::FloorMismatch {
                    destination: destination_id.to_string(),
                    expected: dest.floor,
                    requested,
                });
            }
        }

        let field = self.ensure_field(destination_id)?;
        let layer = self
            .layer(Some(dest.floor))?
            .ok_or(NavError::NotConfigured)?;
        let result = extract_path(&field, &layer.grid, start, Some(destination), &self.config)?;

        if result.outcome == PathOutcome::NoPath {
            tracing::debug!(
                destination = destination_id,
                x = start.x,
                y = start.y,
                "start is disconnected from destination"
            );
        }
        Ok(result)
    }

    /// Like [`Wayfinder::find_path`], aiming at the destination's own coordinates.
    pub fn find_path_to(&self, start: Vec2, destination_id: &str) -> Result<PathResult> {
        let goal = self.destination(destination_id)?.position();
        self.find_path(start, goal, destination_id, None)
    }

    pub fn stats(&self) -> Result<NavStats> {
        let env = self.env()?;
        let layer = env.store.combined().ok_or(NavError::NotConfigured)?;
        let solved = self
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        Ok(NavStats {
            grid_width: layer.grid.width(),
            grid_height: layer.grid.height(),
            resolution: layer.grid.cell_size(),
            navigable_cell_count: layer.grid.walkable_count(),
            solved_destination_count: solved,
            destination_count: env.destinations.len(),
            floor_count: env.store.keys().filter(|k| *k != FloorKey::Combined).count(),
        })
    }
}
