use crate::config::ConfigError;
use crate::corridor::Placement;
use crate::math::look_rotation;
use crate::mesh::{triangle_mesh, Collider, MeshBuilder};
use bevy::prelude::*;
use sdf::{OrientedBoxSdf, Sdf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outward-facing triangles over the corners of [`OrientedBoxSdf::corners`].
const BOX_INDICES: [u32; 36] = [
	0, 2, 1, 0, 3, 2, // back (-z)
	5, 6, 4, 6, 7, 4, // front (+z)
	4, 7, 0, 7, 3, 0, // left
	1, 2, 5, 2, 6, 5, // right
	3, 7, 2, 7, 6, 2, // top
	4, 0, 5, 0, 1, 5, // bottom
];

#[derive(Debug, Error, PartialEq)]
pub enum EndVolumeError {
	#[error("no placement to put the level end on")]
	MissingPlacement,
	#[error("placement at path index {0} has its connector on its root")]
	DegenerateConnector(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndVolumeConfig {
	/// Width, height and depth of the trigger box.
	pub size: [f32; 3],
	/// Only traversers carrying this tag complete the level.
	pub traverser_tag: String,
}

impl Default for EndVolumeConfig {
	fn default() -> Self {
		Self { size: [4.0, 4.0, 2.0], traverser_tag: "Player".to_string() }
	}
}

impl EndVolumeConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
			return Err(ConfigError::EndVolumeSize(self.size));
		}
		Ok(())
	}
}

/// Trigger box at the end of the main corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct EndVolume {
	pub transform: Transform,
	pub shape: OrientedBoxSdf,
	pub collider: Collider,
	traverser_tag: String,
	triggered: bool,
}

impl EndVolume {
	pub fn new(transform: Transform, size: Vec3, traverser_tag: impl Into<String>) -> Self {
		let shape = OrientedBoxSdf::new(transform.translation, transform.rotation, size);
		let collider = Collider::Box { shape: shape.clone(), trigger: true };
		Self { transform, shape, collider, traverser_tag: traverser_tag.into(), triggered: false }
	}

	/// Box corners in the volume's local frame.
	pub fn local_positions(&self) -> Vec<Vec3> {
		let local = OrientedBoxSdf { center: Vec3::ZERO, rotation: Quat::IDENTITY, ..self.shape.clone() };
		local.corners().to_vec()
	}

	pub fn traverser_tag(&self) -> &str {
		&self.traverser_tag
	}

	pub fn is_triggered(&self) -> bool {
		self.triggered
	}

	/// Reports whether a traverser at `position` carrying `tag` has just reached the end.
	/// Fires once; later calls return `false`.
	pub fn observe(&mut self, position: Vec3, tag: &str) -> bool {
		if self.triggered || tag != self.traverser_tag {
			return false;
		}
		self.triggered = self.shape.contains(position);
		self.triggered
	}
}

impl MeshBuilder for EndVolume {
	fn build_mesh(&self) -> Option<Mesh> {
		triangle_mesh(&self.local_positions(), &BOX_INDICES, None)
	}
}

/// Places the end volume halfway between the last branch's root and its connector, looking
/// from the root toward the connector.
pub fn build_end_volume(
	placement: Option<&Placement>,
	config: &EndVolumeConfig,
) -> Result<EndVolume, EndVolumeError> {
	let placement = placement.ok_or(EndVolumeError::MissingPlacement)?;

	let root = placement.root();
	let connector = placement.connector.position;
	let direction = (connector - root).normalize_or_zero();
	if direction == Vec3::ZERO {
		return Err(EndVolumeError::DegenerateConnector(placement.path_index));
	}

	let transform = Transform::from_translation(root.lerp(connector, 0.5))
		.with_rotation(look_rotation(direction, Vec3::Y));

	Ok(EndVolume::new(transform, Vec3::from_array(config.size), config.traverser_tag.clone()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::branch::{BranchStyle, HexBranchBuilder};
	use crate::corridor::CorridorKind;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	fn placement(root: Vec3, tip: Vec3) -> Placement {
		let style = BranchStyle::default();
		let mesh = HexBranchBuilder::new(&style).build(&mut StdRng::seed_from_u64(0)).unwrap();
		Placement {
			kind: CorridorKind::Main,
			path_index: 9,
			style_index: 0,
			transform: Transform::from_translation(root),
			connector: crate::branch::Connector { position: tip, forward: Vec3::Z },
			mesh,
		}
	}

	#[test]
	fn test_midpoint_and_orientation() {
		let last = placement(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 10.0));
		let volume = build_end_volume(Some(&last), &EndVolumeConfig::default()).unwrap();

		assert!(volume.transform.translation.abs_diff_eq(Vec3::new(0.0, 1.0, 5.0), 1e-5));
		assert!((volume.transform.rotation * Vec3::Z).abs_diff_eq(Vec3::Z, 1e-5));
		assert!(volume.collider.is_trigger());
		assert_eq!(volume.shape.size(), Vec3::new(4.0, 4.0, 2.0));
	}

	#[test]
	fn test_missing_placement() {
		assert_eq!(
			build_end_volume(None, &EndVolumeConfig::default()),
			Err(EndVolumeError::MissingPlacement)
		);
		let collapsed = placement(Vec3::ONE, Vec3::ONE);
		assert_eq!(
			build_end_volume(Some(&collapsed), &EndVolumeConfig::default()),
			Err(EndVolumeError::DegenerateConnector(9))
		);
	}

	#[test]
	fn test_observe_fires_once_for_tag() {
		let last = placement(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
		let mut volume = build_end_volume(Some(&last), &EndVolumeConfig::default()).unwrap();
		let center = volume.transform.translation;

		assert!(!volume.observe(center + Vec3::Y * 10.0, "Player"));
		assert!(!volume.observe(center, "Enemy"));
		assert!(volume.observe(center, "Player"));
		assert!(!volume.observe(center, "Player"));
		assert!(volume.is_triggered());
	}

	#[test]
	fn test_box_faces_point_outward() {
		let volume = EndVolume::new(Transform::IDENTITY, Vec3::new(4.0, 4.0, 2.0), "Player");
		let corners = volume.local_positions();
		for triangle in BOX_INDICES.chunks(3) {
			let [a, b, c] = [0, 1, 2].map(|k| corners[triangle[k] as usize]);
			let normal = (b - a).cross(c - a);
			let centroid = (a + b + c) / 3.0;
			assert!(normal.dot(centroid) > 0.0);
		}
	}
}
