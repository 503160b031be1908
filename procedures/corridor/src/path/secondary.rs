use super::spline::{resample, resample_by_arclength};
use crate::config::{BridgeCurve, GenerationConfig};
use crate::math::lateral_axis;
use crate::random::RandomSource;
use bevy::prelude::*;

const DENSE_STEPS_PER_SPACING: f32 = 8.0;
const SPACING_SLACK: f32 = 1e-3;

/// Where one secondary path leaves and rejoins the main path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryPlan {
	/// Position of this path among the configured secondary paths; picks its side.
	pub index: usize,
	pub split_index: usize,
	pub join_index: usize,
}

/// Picks split/join indices for every configured secondary path.
///
/// The split is drawn uniformly in `[min_split_index, max_join_index - secondary_branches)`
/// and the join lies `secondary_branches` points further on. Plans whose join falls off the
/// end of the main path are dropped.
pub fn plan_secondary_paths(
	main_len: usize,
	config: &GenerationConfig,
	rng: &mut impl RandomSource,
) -> Vec<SecondaryPlan> {
	let upper = config.max_join_index.saturating_sub(config.secondary_branches);

	(0..config.secondary_path_count)
		.filter_map(|index| {
			let split_index = rng.range_usize(config.min_split_index, upper);
			let join_index = split_index + config.secondary_branches;
			if join_index >= main_len {
				log::debug!(
					"skipping secondary path {index}: join {join_index} is past the main path ({main_len} points)"
				);
				return None;
			}
			Some(SecondaryPlan { index, split_index, join_index })
		})
		.collect()
}

/// Builds a path that leaves `main[split_index]` and rejoins at `main[join_index]`, bowing
/// out to the right for even `side` and to the left for odd `side`.
///
/// Returns `None` when the indices do not describe a forward span of `main`.
pub fn make_branch_path(
	main: &[Vec3],
	split_index: usize,
	join_index: usize,
	side: usize,
	config: &GenerationConfig,
	rng: &mut impl RandomSource,
) -> Option<Vec<Vec3>> {
	if split_index >= join_index || join_index >= main.len() {
		return None;
	}

	let split = main[split_index];
	let join = main[join_index];

	let mut lateral = lateral_axis(join - split);
	if side % 2 == 1 {
		lateral = -lateral;
	}
	let bow = lateral * config.curvature + Vec3::Y * config.curvature * 0.5;

	let path = match config.bridge_curve {
		BridgeCurve::LateralArc => lateral_arc(split, join, bow, config, rng),
		BridgeCurve::Bezier => bezier_bridge(split, join, bow, config.secondary_branches),
	};

	Some(path)
}

fn lateral_arc(
	split: Vec3,
	join: Vec3,
	bow: Vec3,
	config: &GenerationConfig,
	rng: &mut impl RandomSource,
) -> Vec<Vec3> {
	// 1. Three-point control polygon through a displaced midpoint
	let mid = split.lerp(join, 0.5) + bow;
	let controls = [split, mid, join];

	// 2. Dense sampling to measure distance along the arc, fine enough that chords between
	// emitted points stay close to their arc length
	let min_spacing = config.min_forward_offset;
	let max_spacing = config.max_forward_offset;
	let dense_step = min_spacing / DENSE_STEPS_PER_SPACING;
	let longest = split.distance(mid).max(mid.distance(join));
	let needed = if dense_step > 0.0 { (longest / dense_step).ceil() as usize } else { 0 };
	let per_segment = config.arc_samples_per_segment.max(needed).max(1);
	let dense = resample(&controls, (controls.len() - 1) * per_segment + 1);

	// 3. Emit points at random spacing
	let mut points = resample_by_arclength(&dense, || rng.range_f32(min_spacing, max_spacing));

	// 4. Pin the ends to the main path
	if let Some(first) = points.first_mut() {
		*first = split;
	}
	close_at_join(&mut points, join, min_spacing, max_spacing);

	points
}

/// Appends `join`, folding a tail shorter than `min_spacing` into the previous gap. When the
/// folded gap would exceed `max_spacing` the last point moves to the middle of it instead.
fn close_at_join(points: &mut Vec<Vec3>, join: Vec3, min_spacing: f32, max_spacing: f32) {
	let Some(last) = points.len().checked_sub(1) else {
		points.push(join);
		return;
	};
	if last == 0 || points[last].distance(join) >= min_spacing {
		points.push(join);
		return;
	}

	let previous = points[last - 1];
	if previous.distance(join) <= max_spacing + SPACING_SLACK {
		points[last] = join;
	} else {
		points[last] = previous.lerp(join, 0.5);
		points.push(join);
	}
}

fn bezier_bridge(split: Vec3, join: Vec3, bow: Vec3, samples: usize) -> Vec<Vec3> {
	let handle_a = split.lerp(join, 1.0 / 3.0) + bow;
	let handle_b = split.lerp(join, 2.0 / 3.0) + bow;
	let samples = samples.max(1);

	(0..=samples)
		.map(|k| {
			let t = k as f32 / samples as f32;
			cubic_bezier(split, handle_a, handle_b, join, t)
		})
		.collect()
}

fn cubic_bezier(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
	let u = 1.0 - t;
	u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	fn main_path() -> Vec<Vec3> {
		(0..50).map(|i| Vec3::new(0.0, 3.0, 6.0 * i as f32)).collect()
	}

	#[test]
	fn test_plan_respects_split_bounds() {
		let config = GenerationConfig { secondary_path_count: 8, ..Default::default() };
		let mut rng = StdRng::seed_from_u64(3);
		let plans = plan_secondary_paths(50, &config, &mut rng);

		assert_eq!(plans.len(), 8);
		for plan in plans {
			assert!(plan.split_index >= config.min_split_index);
			assert!(plan.split_index < config.max_join_index - config.secondary_branches);
			assert_eq!(plan.join_index, plan.split_index + config.secondary_branches);
		}
	}

	#[test]
	fn test_plan_skips_out_of_range_join() {
		let config = GenerationConfig::default();
		let mut rng = StdRng::seed_from_u64(3);
		// any split in [10, 20) joins at 30 or later
		assert!(plan_secondary_paths(25, &config, &mut rng).is_empty());
	}

	#[test]
	fn test_out_of_range_join_is_rejected() {
		let main = main_path();
		let config = GenerationConfig::default();
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(make_branch_path(&main, 5, 50, 0, &config, &mut rng), None);
		assert_eq!(make_branch_path(&main, 20, 10, 0, &config, &mut rng), None);
	}

	#[test]
	fn test_lateral_arc_meets_main_path() {
		let main = main_path();
		let config = GenerationConfig::default();
		let mut rng = StdRng::seed_from_u64(17);
		let path = make_branch_path(&main, 5, 45, 0, &config, &mut rng).unwrap();

		assert!(path.len() >= 2);
		assert!(path[0].distance(main[5]) <= config.max_forward_offset);
		assert!(path[path.len() - 1].distance(main[45]) <= config.max_forward_offset);

		for pair in path.windows(2) {
			assert!(pair[0].distance(pair[1]) > 1e-3);
		}
	}

	#[test]
	fn test_sides_alternate() {
		let main = main_path();
		let config = GenerationConfig::default();
		let mut rng = StdRng::seed_from_u64(2);
		let right = make_branch_path(&main, 10, 30, 0, &config, &mut rng).unwrap();
		let left = make_branch_path(&main, 10, 30, 1, &config, &mut rng).unwrap();

		// main path runs along +Z, so its right is +X
		assert!(right[right.len() / 2].x > 1.0);
		assert!(left[left.len() / 2].x < -1.0);
	}

	#[test]
	fn test_bezier_bridge() {
		let main = main_path();
		let config = GenerationConfig { bridge_curve: BridgeCurve::Bezier, ..Default::default() };
		let mut rng = StdRng::seed_from_u64(4);
		let path = make_branch_path(&main, 5, 25, 0, &config, &mut rng).unwrap();

		assert_eq!(path.len(), config.secondary_branches + 1);
		assert!(path[0].abs_diff_eq(main[5], 1e-5));
		assert!(path[path.len() - 1].abs_diff_eq(main[25], 1e-4));
		assert!(path[path.len() / 2].y > main[15].y);
	}

	#[test]
	fn test_lateral_arc_spacing_stays_in_range() {
		let main: Vec<Vec3> = (0..50).map(|i| Vec3::new(0.0, 3.0, 8.0 * i as f32)).collect();
		let config = GenerationConfig::default();
		let tolerance = 0.05;

		for seed in 0..50 {
			let mut rng = StdRng::seed_from_u64(seed);
			let path = make_branch_path(&main, 10, 30, 0, &config, &mut rng).unwrap();
			assert!(path[0].abs_diff_eq(main[10], 1e-5));
			assert!(path[path.len() - 1].abs_diff_eq(main[30], 1e-5));

			for pair in path.windows(2) {
				let gap = pair[0].distance(pair[1]);
				assert!(
					gap >= config.min_forward_offset - tolerance
						&& gap <= config.max_forward_offset + tolerance,
					"seed {seed}: gap {gap} outside [{}, {}]",
					config.min_forward_offset,
					config.max_forward_offset
				);
			}
		}
	}

	#[test]
	fn test_short_tail_folds_into_previous_gap() {
		let mut points = vec![Vec3::ZERO, Vec3::Z * 4.0];
		close_at_join(&mut points, Vec3::Z * 5.0, 4.0, 8.0);
		assert_eq!(points, vec![Vec3::ZERO, Vec3::Z * 5.0]);

		// folding would leave a gap past the maximum, so the last point recentres
		let mut points = vec![Vec3::ZERO, Vec3::Z * 7.0];
		close_at_join(&mut points, Vec3::Z * 10.0, 4.0, 8.0);
		assert_eq!(points, vec![Vec3::ZERO, Vec3::Z * 5.0, Vec3::Z * 10.0]);
	}
}
