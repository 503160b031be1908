use bevy::prelude::*;

/// Rotation taking local `+Z` onto `forward` and local `+Y` as close to `up` as possible.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
	let forward = forward.normalize_or_zero();
	if forward == Vec3::ZERO {
		return Quat::IDENTITY;
	}

	// Pick a reference axis that is NOT parallel
	let reference = if forward.cross(up).length_squared() < 1e-8 {
		if forward.abs_diff_eq(Vec3::X, 1e-4) || forward.abs_diff_eq(Vec3::NEG_X, 1e-4) {
			Vec3::Y
		} else {
			Vec3::X
		}
	} else {
		up
	};

	let right = reference.cross(forward).normalize();
	let up = forward.cross(right);

	Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

/// Horizontal unit vector to the right of `direction`, falling back to `+X` when
/// `direction` is vertical.
pub fn lateral_axis(direction: Vec3) -> Vec3 {
	Vec3::Y.cross(direction).normalize_or(Vec3::X)
}
