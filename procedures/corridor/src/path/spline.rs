use bevy::prelude::*;

/// Uniform Catmull-Rom interpolation between `p1` and `p2`, `t` in `[0, 1]`.
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
	let t2 = t * t;
	let t3 = t2 * t;

	0.5 * ((2.0 * p1)
		+ (p2 - p0) * t
		+ (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
		+ (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Resamples a control polygon into exactly `count` points along its Catmull-Rom spline.
///
/// A virtual point is extrapolated before the first and after the last control so the
/// real endpoints are interpolated. The parameter spans all segments uniformly, so when
/// `count` equals the number of controls the controls themselves come back.
pub fn resample(controls: &[Vec3], count: usize) -> Vec<Vec3> {
	match (controls.len(), count) {
		(_, 0) | (0, _) => return Vec::new(),
		(1, _) => return vec![controls[0]; count],
		(_, 1) => return vec![controls[0]],
		_ => {}
	}

	let last = controls.len() - 1;
	let mut extended = Vec::with_capacity(controls.len() + 2);
	extended.push(controls[0] - (controls[1] - controls[0]));
	extended.extend_from_slice(controls);
	extended.push(controls[last] + (controls[last] - controls[last - 1]));

	let segments = last;
	(0..count)
		.map(|k| {
			let t = k as f32 * segments as f32 / (count - 1) as f32;
			let segment = (t.floor() as usize).min(segments - 1);
			let local = t - segment as f32;
			catmull_rom(
				extended[segment],
				extended[segment + 1],
				extended[segment + 2],
				extended[segment + 3],
				local,
			)
		})
		.collect()
}

/// Walks a densely sampled curve and emits a point each time the distance travelled along
/// it reaches the next spacing drawn from `next_spacing`. Crossings are interpolated inside
/// the dense segment and the overshoot carries into the next spacing, so emitted points sit
/// exactly one spacing apart along the polyline. The first dense point is always emitted;
/// the tail is left to the caller.
pub fn resample_by_arclength(dense: &[Vec3], mut next_spacing: impl FnMut() -> f32) -> Vec<Vec3> {
	let Some(&first) = dense.first() else {
		return Vec::new();
	};

	let mut points = vec![first];
	let mut travelled = 0.0;
	let mut threshold = next_spacing();

	for pair in dense.windows(2) {
		let (start, end) = (pair[0], pair[1]);
		let length = start.distance(end);
		let mut consumed = 0.0;

		while threshold > 0.0 && travelled + (length - consumed) >= threshold {
			consumed += threshold - travelled;
			points.push(start.lerp(end, consumed / length));
			travelled = 0.0;
			threshold = next_spacing();
		}
		travelled += length - consumed;
	}

	points
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_catmull_rom_endpoints() {
		let (p0, p1, p2, p3) = (Vec3::ZERO, Vec3::X, Vec3::new(2.0, 1.0, 0.0), Vec3::new(3.0, 1.0, 0.0));
		assert!(catmull_rom(p0, p1, p2, p3, 0.0).abs_diff_eq(p1, 1e-6));
		assert!(catmull_rom(p0, p1, p2, p3, 1.0).abs_diff_eq(p2, 1e-6));
	}

	#[test]
	fn test_resample_passes_through_controls() {
		let controls = vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 3.0), Vec3::new(4.0, 1.0, 5.0), Vec3::new(4.0, 0.0, 9.0)];
		let points = resample(&controls, controls.len());
		for (point, control) in points.iter().zip(&controls) {
			assert!(point.abs_diff_eq(*control, 1e-5));
		}
	}

	#[test]
	fn test_resample_dense() {
		let controls = vec![Vec3::ZERO, Vec3::Z * 2.0, Vec3::Z * 4.0];
		let points = resample(&controls, 9);
		assert_eq!(points.len(), 9);
		assert!(points[0].abs_diff_eq(Vec3::ZERO, 1e-6));
		assert!(points[8].abs_diff_eq(Vec3::Z * 4.0, 1e-5));
		// collinear controls stay on the line
		assert!(points.iter().all(|p| p.x.abs() < 1e-6 && p.y.abs() < 1e-6));
	}

	#[test]
	fn test_resample_short_inputs() {
		assert!(resample(&[], 4).is_empty());
		assert_eq!(resample(&[Vec3::ONE], 2), vec![Vec3::ONE, Vec3::ONE]);
		assert_eq!(resample(&[Vec3::ONE, Vec3::ZERO], 1), vec![Vec3::ONE]);
	}

	#[test]
	fn test_arclength_spacing() {
		let dense: Vec<Vec3> = (0..=20).map(|i| Vec3::Z * i as f32 * 0.5).collect();
		let points = resample_by_arclength(&dense, || 2.0);
		assert_eq!(points.len(), 6);
		for pair in points.windows(2) {
			assert!((pair[1].z - pair[0].z - 2.0).abs() < 1e-6);
		}
	}

	#[test]
	fn test_arclength_carries_overshoot() {
		// dense step does not divide the spacing
		let dense: Vec<Vec3> = (0..=30).map(|i| Vec3::Z * i as f32 * 0.7).collect();
		let points = resample_by_arclength(&dense, || 2.0);
		assert_eq!(points.len(), 11);
		for pair in points.windows(2) {
			assert!((pair[0].distance(pair[1]) - 2.0).abs() < 1e-4);
		}
	}

	#[test]
	fn test_arclength_follows_corners() {
		let dense = vec![Vec3::ZERO, Vec3::Z * 3.0, Vec3::new(3.0, 0.0, 3.0)];
		let points = resample_by_arclength(&dense, || 2.0);
		assert_eq!(points.len(), 4);
		assert!(points[1].abs_diff_eq(Vec3::Z * 2.0, 1e-5));
		assert!(points[2].abs_diff_eq(Vec3::new(1.0, 0.0, 3.0), 1e-5));
		assert!(points[3].abs_diff_eq(Vec3::new(3.0, 0.0, 3.0), 1e-5));
	}
}
