pub mod mesher;
pub mod style;

pub use mesher::HexBranchBuilder;
pub use style::{BranchStyle, ColliderMode};

use crate::mesh::{triangle_mesh, Collider, MeshBuilder};
use bevy::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BranchError {
	#[error("branch style '{style}' has no material")]
	MissingMaterial { style: String },
	#[error("branch style '{style}' is degenerate: {reason}")]
	DegenerateStyle { style: String, reason: &'static str },
}

/// Anchor at the distal tip of a branch. Consecutive branches are chained through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
	pub position: Vec3,
	pub forward: Vec3,
}

impl Connector {
	pub fn transformed(&self, transform: &Transform) -> Connector {
		Connector {
			position: transform.transform_point(self.position),
			forward: (transform.rotation * self.forward).normalize_or(Vec3::Z),
		}
	}
}

/// Geometry for one branch in its local frame: root at the origin, growing along `+Z`.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchMesh {
	pub style: String,
	pub material: String,
	pub positions: Vec<Vec3>,
	pub indices: Vec<u32>,
	pub ring_centers: Vec<Vec3>,
	pub ring_radii: Vec<f32>,
	pub colliders: Vec<Collider>,
}

impl BranchMesh {
	/// The tip anchor, at the final ring centre facing the root's forward.
	pub fn connector(&self) -> Option<Connector> {
		self.ring_centers.last().map(|&position| Connector { position, forward: Vec3::Z })
	}
}

impl MeshBuilder for BranchMesh {
	fn build_mesh(&self) -> Option<Mesh> {
		triangle_mesh(&self.positions, &self.indices, None)
	}
}
