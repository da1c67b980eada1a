//! Continuous-space building navigation: polygon rasterization, clearance fields,
//! value-iteration routing and greedy path extraction.
//!
//! Data flows one way: corridors → [`NavGrid`] → [`ClearanceField`] → [`ValueField`]
//! (one per destination) → [`PathResult`]. [`Wayfinder`] owns the whole pipeline.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod clearance;
pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod math;
pub mod raster;
pub mod route;
pub mod solver;
pub mod space;
pub mod store;
pub mod wayfinder;

pub use clearance::{build_clearance, ClearanceField};
pub use config::SolverConfig;
pub use error::{NavError, Result};
pub use extract::{extract_path, PathOutcome, PathResult};
pub use geometry::{bounding_box, point_in_polygon, polygons_overlap, Aabb};
pub use math::Vec2;
pub use raster::{rasterize, Cell, NavGrid};
pub use route::{GraphRoute, MultiFloorPath, RouteGraph, RouteSegment};
pub use solver::{solve, SolveReport, ValueField, UNREACHED};
pub use space::{Corridor, Destination, SpaceConfig};
pub use store::{FloorKey, FloorLayer, GridStore};
pub use wayfinder::{NavStats, SolveSummary, Wayfinder};
