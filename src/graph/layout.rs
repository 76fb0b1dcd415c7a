//! Force-directed graph layout algorithm.
//!
//! Implements a simple force-directed layout with:
//! - Repulsion between all nodes (Coulomb's law)
//! - Attraction along edges toward a length that shrinks with multiplicity
//! - Centering force toward graph center
//! - Damping to settle the simulation

use super::builder::FilteredGraph;
use crate::data::ItemId;
use egui::{Pos2, Rect, Vec2};
use rand::Rng;
use std::collections::HashMap;

/// Node positions and velocities, kept across rebuilds so the graph
/// doesn't jump when the filter changes
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    pub positions: HashMap<ItemId, Pos2>,
    pub velocities: HashMap<ItemId, Vec2>,
}

impl LayoutState {
    /// Match the node set of `graph`. Surviving nodes keep their place,
    /// new ones start at a random spot inside `bounds`.
    pub fn sync(&mut self, graph: &FilteredGraph, bounds: Rect) {
        self.positions.retain(|id, _| graph.nodes.contains(id));
        self.velocities.retain(|id, _| graph.nodes.contains(id));

        let mut rng = rand::thread_rng();
        for id in &graph.nodes {
            if !self.positions.contains_key(id) {
                let x = if bounds.width() > 0.0 {
                    rng.gen_range(bounds.min.x..bounds.max.x)
                } else {
                    bounds.min.x
                };
                let y = if bounds.height() > 0.0 {
                    rng.gen_range(bounds.min.y..bounds.max.y)
                } else {
                    bounds.min.y
                };
                self.positions.insert(id.clone(), Pos2::new(x, y));
                self.velocities.insert(id.clone(), Vec2::ZERO);
            }
        }
    }

    pub fn position(&self, id: &str) -> Option<Pos2> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Force-directed layout parameters
#[derive(Debug, Clone)]
pub struct ForceLayout {
    /// Repulsion strength between nodes
    pub repulsion: f32,
    /// Attraction strength along edges
    pub attraction: f32,
    /// Centering force strength
    pub centering: f32,
    /// Damping factor (0.0 - 1.0)
    pub damping: f32,
    /// Minimum distance to prevent division by zero
    pub min_distance: f32,
    /// Maximum velocity
    pub max_velocity: f32,
    /// Edge length for a pair that co-occurs once
    pub link_distance: f32,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            repulsion: 2000.0,
            attraction: 0.05,
            centering: 0.002,
            damping: 0.85,
            min_distance: 10.0,
            max_velocity: 40.0,
            link_distance: 160.0,
        }
    }
}

impl ForceLayout {
    /// Target length of an edge seen on `multiplicity` days
    pub fn ideal_length(&self, multiplicity: usize) -> f32 {
        self.link_distance / multiplicity.max(1) as f32
    }

    /// Run one iteration of the force simulation
    pub fn step(&self, state: &mut LayoutState, graph: &FilteredGraph, center: Pos2) {
        let node_ids: Vec<&ItemId> = graph.nodes.iter().filter(|id| state.positions.contains_key(*id)).collect();
        if node_ids.is_empty() {
            return;
        }

        let index: HashMap<&str, usize> = node_ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
        let positions: Vec<Pos2> = node_ids.iter().map(|id| state.positions[*id]).collect();
        let mut forces = vec![Vec2::ZERO; node_ids.len()];

        // Pairwise repulsion
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let delta = positions[i] - positions[j];
                let distance = delta.length().max(self.min_distance);
                let direction = if delta.length() > f32::EPSILON {
                    delta / delta.length()
                } else {
                    // Coincident nodes: push apart along a fixed axis
                    Vec2::new(1.0, 0.0)
                };
                let force = direction * (self.repulsion / (distance * distance));
                forces[i] += force;
                forces[j] -= force;
            }
        }

        // Edge attraction
        for (pair, &count) in &graph.edges {
            let (Some(&a), Some(&b)) = (index.get(pair.low()), index.get(pair.high())) else {
                continue;
            };
            let delta = positions[b] - positions[a];
            let distance = delta.length().max(self.min_distance);
            let displacement = distance - self.ideal_length(count);
            let force = delta.normalized() * (self.attraction * displacement);
            forces[a] += force;
            forces[b] -= force;
        }

        // Centering force
        for (i, pos) in positions.iter().enumerate() {
            forces[i] += (center - *pos) * self.centering;
        }

        for (i, id) in node_ids.iter().enumerate() {
            let vel = state.velocities.entry((*id).clone()).or_insert(Vec2::ZERO);
            *vel = (*vel + forces[i]) * self.damping;

            // Clamp velocity
            if vel.length() > self.max_velocity {
                *vel = vel.normalized() * self.max_velocity;
            }

            let vel = *vel;
            if let Some(pos) = state.positions.get_mut(*id) {
                *pos += vel;
            }
        }
    }

    /// Check if the simulation has settled
    pub fn is_settled(&self, state: &LayoutState) -> bool {
        let (total, count) = state
            .velocities
            .values()
            .fold((0.0_f32, 0_usize), |(sum, cnt), v| (sum + v.length(), cnt + 1));
        total / (count.max(1) as f32) < 0.5
    }
}
