use crate::{Bounds, Sdf};
use bevy::prelude::*;

/// A box SDF with arbitrary orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedBoxSdf {
	pub center: Vec3,
	pub rotation: Quat,
	/// Half of the box size along its local axes.
	pub half_extents: Vec3,
}

impl OrientedBoxSdf {
	pub fn new(center: Vec3, rotation: Quat, size: Vec3) -> Self {
		Self { center, rotation, half_extents: size.abs() * 0.5 }
	}

	pub fn size(&self) -> Vec3 {
		self.half_extents * 2.0
	}

	/// Maps a world point into the box's local frame.
	pub fn to_local(&self, p: Vec3) -> Vec3 {
		self.rotation.inverse() * (p - self.center)
	}

	/// The eight world space corners, in the order
	/// `(-x,-y,-z) (x,-y,-z) (x,y,-z) (-x,y,-z)` then the same at `+z`.
	pub fn corners(&self) -> [Vec3; 8] {
		let h = self.half_extents;
		[
			Vec3::new(-h.x, -h.y, -h.z),
			Vec3::new(h.x, -h.y, -h.z),
			Vec3::new(h.x, h.y, -h.z),
			Vec3::new(-h.x, h.y, -h.z),
			Vec3::new(-h.x, -h.y, h.z),
			Vec3::new(h.x, -h.y, h.z),
			Vec3::new(h.x, h.y, h.z),
			Vec3::new(-h.x, h.y, h.z),
		]
		.map(|corner| self.center + self.rotation * corner)
	}
}

impl Sdf for OrientedBoxSdf {
	fn distance(&self, p: Vec3) -> f32 {
		let q = self.to_local(p).abs() - self.half_extents;
		q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
	}

	fn bounds(&self) -> Bounds {
		Bounds::from_points(self.corners())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::f32::consts::FRAC_PI_2;

	#[test]
	fn test_axis_aligned_distance() {
		let cube = OrientedBoxSdf::new(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(2.0));
		assert!((cube.distance(Vec3::new(3.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
		assert!((cube.distance(Vec3::ZERO) + 1.0).abs() < 1e-6);
		assert!(cube.contains(Vec3::new(0.9, 0.9, 0.9)));
	}

	#[test]
	fn test_rotated_box() {
		// long along local x, rotated so local x points along world z
		let slab = OrientedBoxSdf::new(
			Vec3::new(0.0, 0.0, 10.0),
			Quat::from_rotation_y(-FRAC_PI_2),
			Vec3::new(6.0, 1.0, 1.0),
		);
		assert!(slab.contains(Vec3::new(0.0, 0.0, 12.5)));
		assert!(!slab.contains(Vec3::new(2.5, 0.0, 10.0)));
	}

	#[test]
	fn test_corners_in_bounds() {
		let tilted = OrientedBoxSdf::new(Vec3::ONE, Quat::from_rotation_z(0.3), Vec3::new(4.0, 2.0, 1.0));
		let bounds = tilted.bounds();
		for corner in tilted.corners() {
			assert!(bounds.contains_point(corner));
			assert!(tilted.distance(corner).abs() < 1e-4);
		}
	}
}
