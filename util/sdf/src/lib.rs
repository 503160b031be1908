pub mod analysis;
pub mod capsule;
pub mod oriented_box;

pub use analysis::bounds::Bounds;
pub use capsule::CapsuleSdf;
pub use oriented_box::OrientedBoxSdf;

use bevy::prelude::*;

/// Trait for Signed Distance Fields
/// Returns the signed distance from a point to the surface:
/// - Negative: inside the shape
/// - Zero: on the surface
/// - Positive: outside the shape
pub trait Sdf: Send + Sync {
	fn distance(&self, p: Vec3) -> f32;

	/// Whether the point lies inside or on the surface of the shape.
	fn contains(&self, p: Vec3) -> bool {
		self.distance(p) <= 0.0
	}

	/// Returns the bounds of the SDF, i.e., the region over which the SDF is non-positive.
	/// This can form pessimistic boundaries for analysis of the SDF.
	///
	/// Often times, you can compute tighter bounds. But, this is useful when doing so is computationally expensive.
	fn bounds(&self) -> Bounds {
		Bounds::Unbounded
	}
}
