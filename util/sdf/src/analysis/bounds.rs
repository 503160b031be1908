use bevy::math::bounding::{Aabb3d, BoundingVolume};
use bevy::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Bounds {
	Cuboid(Aabb3d),
	Unbounded,
}

impl Bounds {
	/// Axis aligned bounds enclosing all the given points.
	pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
		let mut iter = points.into_iter();
		let Some(first) = iter.next() else {
			return Bounds::Unbounded;
		};
		let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
		Bounds::Cuboid(Aabb3d { min: min.into(), max: max.into() })
	}

	/// Smallest bounds enclosing both.
	pub fn union(&self, other: &Bounds) -> Bounds {
		match (self, other) {
			(Bounds::Cuboid(a), Bounds::Cuboid(b)) => Bounds::Cuboid(a.merge(b)),
			_ => Bounds::Unbounded,
		}
	}

	pub fn contains_point(&self, p: Vec3) -> bool {
		match self {
			Bounds::Cuboid(aabb) => {
				let min: Vec3 = aabb.min.into();
				let max: Vec3 = aabb.max.into();
				p.cmpge(min).all() && p.cmple(max).all()
			}
			Bounds::Unbounded => true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_points() {
		let bounds = Bounds::from_points([Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, -1.0, 5.0)]);
		assert!(bounds.contains_point(Vec3::new(0.0, 0.0, 2.0)));
		assert!(!bounds.contains_point(Vec3::new(0.0, 0.0, 6.0)));
	}

	#[test]
	fn test_empty_is_unbounded() {
		assert_eq!(Bounds::from_points(Vec::<Vec3>::new()), Bounds::Unbounded);
	}

	#[test]
	fn test_union() {
		let a = Bounds::from_points([Vec3::ZERO, Vec3::ONE]);
		let b = Bounds::from_points([Vec3::splat(2.0), Vec3::splat(3.0)]);
		let merged = a.union(&b);
		assert!(merged.contains_point(Vec3::splat(1.5)));
		assert_eq!(a.union(&Bounds::Unbounded), Bounds::Unbounded);
	}
}
