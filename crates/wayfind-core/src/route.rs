//! Stitching discrete graph routes (named nodes, floor transitions) with grid paths.
//!
//! The graph layer itself lives with a collaborator; this module only fixes its contract
//! and turns its output into concrete walking legs.

use serde::Serialize;

use crate::{NavError, PathResult, Result, Vec2, Wayfinder};

/// Ordered node ids with the weight of each edge between consecutive nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRoute {
    pub nodes: Vec<String>,
    pub weights: Vec<f32>,
}

impl GraphRoute {
    pub fn total_weight(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Weighted-graph shortest path over named location nodes.
pub trait RouteGraph {
    fn shortest_route(&self, from: &str, to: &str) -> Option<GraphRoute>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteSegment {
    /// Walking leg on one floor, extracted from a value field.
    Walk {
        floor: i32,
        to: String,
        path: PathResult,
    },
    /// Elevator or stairs edge between floors. Bypasses the grid.
    Transition {
        from: String,
        to: String,
        from_floor: i32,
        to_floor: i32,
        weight: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiFloorPath {
    pub success: bool,
    pub segments: Vec<RouteSegment>,
}

impl Wayfinder {
    /// Turn a graph route into walking legs and floor transitions.
    ///
    /// Node ids must name destinations. Walking starts at `start` on `floor`; each node on
    /// the current floor is reached over the grid, and a node on another floor is entered
    /// through a transition that resumes walking from that node's position. Stitching stops
    /// at the first leg that does not reach its node. A route needs exactly one weight per
    /// edge; an empty route stitches to an empty, successful trip.
    pub fn stitch_route(
        &self,
        start: Vec2,
        floor: i32,
        route: &GraphRoute,
    ) -> Result<MultiFloorPath> {
        let expected = route.nodes.len().saturating_sub(1);
        if route.weights.len() != expected {
            return Err(NavError::Route(format!(
                "{} nodes need {expected} weights, got {}",
                route.nodes.len(),
                route.weights.len()
            )));
        }

        let mut segments = Vec::new();
        let mut position = start;
        let mut current_floor = floor;
        let mut previous: Option<&str> = None;

        for (i, node) in route.nodes.iter().enumerate() {
            let dest = self.destination(node)?;

            if dest.floor != current_floor {
                let Some(from) = previous else {
                    return Err(NavError::Route(format!(
                        "route starts on floor {current_floor} but first node {node} is on floor {}",
                        dest.floor
                    )));
                };
                segments.push(RouteSegment::Transition {
                    from: from.to_string(),
                    to: node.clone(),
                    from_floor: current_floor,
                    to_floor: dest.floor,
                    weight: route.weights.get(i - 1).copied().unwrap_or(0.0),
                });
                current_floor = dest.floor;
                position = dest.position();
                previous = Some(node.as_str());
                continue;
            }

            let path = self.find_path(position, dest.position(), node, Some(current_floor))?;
            let reached = path.success;
            if let Some(last) = path.path.last() {
                position = *last;
            }
            segments.push(RouteSegment::Walk {
                floor: current_floor,
                to: node.clone(),
                path,
            });
            if !reached {
                tracing::warn!(node = %node, "route leg did not reach its node");
                return Ok(MultiFloorPath {
                    success: false,
                    segments,
                });
            }
            previous = Some(node.as_str());
        }

        Ok(MultiFloorPath {
            success: true,
            segments,
        })
    }

    /// Ask `graph` for a node route from `from` to `to`, then stitch it starting at `start`.
    pub fn route_via(
        &self,
        graph: &impl RouteGraph,
        start: Vec2,
        floor: i32,
        from: &str,
        to: &str,
    ) -> Result<MultiFloorPath> {
        let route = graph
            .shortest_route(from, to)
            .ok_or_else(|| NavError::Route(format!("no graph route from {from} to {to}")))?;
        self.stitch_route(start, floor, &route)
    }
}
