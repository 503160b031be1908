use crate::{Bounds, Sdf};
use bevy::prelude::*;

/// A capsule SDF (cylinder with rounded ends)
#[derive(Debug, Clone, PartialEq)]
pub struct CapsuleSdf {
	pub start: Vec3,
	pub end: Vec3,
	pub radius: f32,
}

impl CapsuleSdf {
	pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
		Self { start, end, radius }
	}

	/// Builds a capsule from its midpoint, axis and the length of the inner segment.
	pub fn from_center_axis(center: Vec3, axis: Vec3, length: f32, radius: f32) -> Self {
		let half = axis.normalize_or_zero() * (length * 0.5);
		Self { start: center - half, end: center + half, radius }
	}

	pub fn transformed(&self, transform: &Transform) -> Self {
		Self {
			start: transform.transform_point(self.start),
			end: transform.transform_point(self.end),
			radius: self.radius * transform.scale.max_element(),
		}
	}
}

impl Sdf for CapsuleSdf {
	fn distance(&self, p: Vec3) -> f32 {
		let pa = p - self.start;
		let ba = self.end - self.start;
		let length_squared = ba.length_squared();
		// degenerate capsule is a sphere
		let h = if length_squared > f32::EPSILON {
			(pa.dot(ba) / length_squared).clamp(0.0, 1.0)
		} else {
			0.0
		};
		let closest_point = self.start + ba * h;
		(p - closest_point).length() - self.radius
	}

	fn bounds(&self) -> Bounds {
		let r = Vec3::splat(self.radius);
		Bounds::from_points([self.start - r, self.start + r, self.end - r, self.end + r])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_distance_along_axis() {
		let capsule = CapsuleSdf::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.5);
		assert!((capsule.distance(Vec3::new(1.0, 1.0, 0.0)) - 0.5).abs() < 1e-6);
		assert!((capsule.distance(Vec3::new(0.0, 3.0, 0.0)) - 0.5).abs() < 1e-6);
		assert!(capsule.contains(Vec3::new(0.2, 1.0, 0.0)));
	}

	#[test]
	fn test_degenerate_capsule_is_sphere() {
		let capsule = CapsuleSdf::new(Vec3::ONE, Vec3::ONE, 1.0);
		assert!((capsule.distance(Vec3::new(1.0, 3.0, 1.0)) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn test_from_center_axis() {
		let capsule = CapsuleSdf::from_center_axis(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, 4.0, 0.25);
		assert!(capsule.start.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-6));
		assert!(capsule.end.abs_diff_eq(Vec3::new(0.0, 0.0, 7.0), 1e-6));
		assert!((capsule.start.distance(capsule.end) - 4.0).abs() < 1e-6);
		assert!(capsule.bounds().contains_point(Vec3::new(0.25, 0.0, 7.25)));
	}
}
