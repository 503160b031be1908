use super::BranchError;
use serde::{Deserialize, Serialize};

/// Collision shape generated for a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColliderMode {
	/// One capsule per segment.
	#[default]
	Capsules,
	/// A single convex hull around the whole tube.
	ConvexHull,
}

/// Recipe for a tapered, twisted hexagonal branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchStyle {
	pub name: String,
	pub length: f32,
	pub base_radius: f32,
	pub tip_radius: f32,
	pub segment_count: usize,
	/// Largest angle, in degrees, the tube may curl away from its root's forward.
	pub max_deviation_angle: f32,
	/// Per-ring twist bounds in degrees about X, Y and Z.
	pub twist_bounds: [f32; 3],
	/// Per-ring sideways wobble.
	pub ring_jitter: f32,
	pub collider: ColliderMode,
	pub material: Option<String>,
}

impl Default for BranchStyle {
	fn default() -> Self {
		Self {
			name: "hex".to_string(),
			length: 12.0,
			base_radius: 0.2,
			tip_radius: 0.05,
			segment_count: 5,
			max_deviation_angle: 45.0,
			twist_bounds: [20.0, 20.0, 90.0],
			ring_jitter: 0.1,
			collider: ColliderMode::default(),
			material: Some("branch".to_string()),
		}
	}
}

impl BranchStyle {
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_collider(mut self, collider: ColliderMode) -> Self {
		self.collider = collider;
		self
	}

	pub fn with_length(mut self, length: f32) -> Self {
		self.length = length;
		self
	}

	/// Radius of ring `ring` out of `segment_count + 1`.
	pub fn radius_at(&self, ring: usize) -> f32 {
		let t = ring as f32 / self.segment_count.max(1) as f32;
		self.base_radius + (self.tip_radius - self.base_radius) * t
	}

	pub fn validate(&self) -> Result<(), BranchError> {
		let degenerate = |reason| BranchError::DegenerateStyle { style: self.name.clone(), reason };

		if self.segment_count == 0 {
			return Err(degenerate("segment count is zero"));
		}
		if !self.length.is_finite() || self.length <= 0.0 {
			return Err(degenerate("length must be positive"));
		}
		if self.base_radius < 0.0 || self.tip_radius < 0.0 {
			return Err(degenerate("radii must not be negative"));
		}
		if self.twist_bounds.iter().chain([&self.ring_jitter]).any(|b| !b.is_finite()) {
			return Err(degenerate("twist and jitter bounds must be finite"));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_radius_taper() {
		let style = BranchStyle::default();
		assert_eq!(style.radius_at(0), 0.2);
		assert!((style.radius_at(5) - 0.05).abs() < 1e-6);
		assert!(style.radius_at(2) < style.radius_at(1));
	}

	#[test]
	fn test_validate() {
		assert_eq!(BranchStyle::default().validate(), Ok(()));

		let style = BranchStyle { segment_count: 0, ..Default::default() };
		assert!(matches!(style.validate(), Err(BranchError::DegenerateStyle { .. })));

		let style = BranchStyle::default().with_length(-1.0);
		assert!(matches!(style.validate(), Err(BranchError::DegenerateStyle { .. })));
	}

	#[test]
	fn test_style_from_json() {
		let style: BranchStyle =
			serde_json::from_str(r#"{ "name": "thick", "base_radius": 0.5, "collider": "ConvexHull" }"#).unwrap();
		assert_eq!(style.name, "thick");
		assert_eq!(style.base_radius, 0.5);
		assert_eq!(style.collider, ColliderMode::ConvexHull);
		assert_eq!(style.segment_count, 5);
	}
}
