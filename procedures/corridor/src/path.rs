pub mod secondary;
pub mod spline;

pub use secondary::{make_branch_path, plan_secondary_paths, SecondaryPlan};
pub use spline::{catmull_rom, resample, resample_by_arclength};

use crate::config::GenerationConfig;
use crate::random::RandomSource;
use bevy::prelude::*;

/// Generates the main path centreline: `count` points starting one step ahead of `start`.
///
/// Each step turns the running heading by a random yaw, advances by a random forward
/// offset and moves up or down by a random height delta. The raw control points are
/// then resampled through a Catmull-Rom spline. When `min_height` is set the whole path
/// is lifted so its lowest point sits on the floor.
pub fn generate_path(
	start: Vec3,
	initial_forward: Vec3,
	count: usize,
	config: &GenerationConfig,
	rng: &mut impl RandomSource,
) -> Vec<Vec3> {
	if count == 0 {
		return Vec::new();
	}

	let mut forward = Vec3::new(initial_forward.x, 0.0, initial_forward.z).normalize_or(Vec3::Z);
	let mut position = start;
	let mut controls = Vec::with_capacity(count);

	for _ in 0..count {
		let yaw = rng.symmetric(config.max_yaw_angle);
		forward = Quat::from_rotation_y(yaw.to_radians()) * forward;

		let offset = rng.range_f32(config.min_forward_offset, config.max_forward_offset);
		let vertical = rng.symmetric(config.max_height_delta);

		position += forward * offset + Vec3::Y * vertical;
		controls.push(position);
	}

	let mut points = resample(&controls, count);

	if let Some(floor) = config.min_height {
		lift_to_floor(&mut points, floor);
	}

	points
}

/// Shifts every point up by the amount the lowest one sits below `floor`.
pub fn lift_to_floor(points: &mut [Vec3], floor: f32) {
	let lowest = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
	if lowest < floor {
		let deficit = floor - lowest;
		for point in points.iter_mut() {
			point.y += deficit;
		}
	}
}

/// Direction of travel at `index`: toward the next point, or from the previous one at the end.
pub fn tangent_at(points: &[Vec3], index: usize) -> Vec3 {
	let direction = if index + 1 < points.len() {
		points[index + 1] - points[index]
	} else if index > 0 {
		points[index] - points[index - 1]
	} else {
		Vec3::Z
	};
	direction.normalize_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	fn straight_config() -> GenerationConfig {
		GenerationConfig {
			branch_count: 10,
			min_forward_offset: 4.0,
			max_forward_offset: 4.0,
			max_yaw_angle: 0.0,
			max_height_delta: 0.0,
			start_height: 0.0,
			..Default::default()
		}
	}

	#[test]
	fn test_straight_line() {
		let config = straight_config();
		let mut rng = StdRng::seed_from_u64(1);
		let points = generate_path(Vec3::ZERO, Vec3::Z, 10, &config, &mut rng);

		assert_eq!(points.len(), 10);
		for (i, point) in points.iter().enumerate() {
			assert!(point.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0 * (i as f32 + 1.0)), 1e-4));
		}
		for pair in points.windows(2) {
			assert!((pair[1].distance(pair[0]) - 4.0).abs() < 1e-4);
		}
	}

	#[test]
	fn test_count_and_distinct_points() {
		let config = GenerationConfig::default();
		for seed in 0..20 {
			let mut rng = StdRng::seed_from_u64(seed);
			let points = generate_path(Vec3::new(0.0, 3.0, 0.0), Vec3::Z, 50, &config, &mut rng);
			assert_eq!(points.len(), 50);
			for pair in points.windows(2) {
				assert!(pair[0].distance(pair[1]) > 1e-3);
			}
		}
	}

	#[test]
	fn test_same_seed_same_path() {
		let config = GenerationConfig::default();
		let a = generate_path(Vec3::ZERO, Vec3::Z, 30, &config, &mut StdRng::seed_from_u64(9));
		let b = generate_path(Vec3::ZERO, Vec3::Z, 30, &config, &mut StdRng::seed_from_u64(9));
		assert_eq!(a, b);
	}

	#[test]
	fn test_min_height_floor() {
		let config = GenerationConfig {
			max_height_delta: 3.0,
			min_height: Some(1.0),
			..Default::default()
		};
		let mut rng = StdRng::seed_from_u64(5);
		let points = generate_path(Vec3::new(0.0, 0.0, 0.0), Vec3::Z, 40, &config, &mut rng);

		let lowest = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
		assert!(lowest >= 1.0 - 1e-4);
	}

	#[test]
	fn test_lift_preserves_shape() {
		let mut points = vec![Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, 1.0, 1.0)];
		lift_to_floor(&mut points, 0.0);
		assert_eq!(points, vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 1.0)]);

		// already above the floor
		lift_to_floor(&mut points, -5.0);
		assert_eq!(points[0].y, 0.0);
	}

	#[test]
	fn test_tangent_at_ends() {
		let points = vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), Vec3::new(2.0, 0.0, 2.0)];
		assert_eq!(tangent_at(&points, 0), Vec3::Z);
		assert_eq!(tangent_at(&points, 2), Vec3::X);
		assert_eq!(tangent_at(&points[..1], 0), Vec3::Z);
	}
}
