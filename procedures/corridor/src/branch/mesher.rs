use super::{BranchError, BranchMesh, BranchStyle, ColliderMode};
use crate::mesh::Collider;
use crate::random::RandomSource;
use bevy::prelude::*;
use sdf::CapsuleSdf;
use std::f32::consts::TAU;

pub const SIDES: usize = 6;

/// Builds hexagonal branch meshes from a [`BranchStyle`].
#[derive(Debug, Clone, Copy)]
pub struct HexBranchBuilder<'a> {
	style: &'a BranchStyle,
}

impl<'a> HexBranchBuilder<'a> {
	pub fn new(style: &'a BranchStyle) -> Self {
		Self { style }
	}

	pub fn build(&self, rng: &mut impl RandomSource) -> Result<BranchMesh, BranchError> {
		let style = self.style;
		let material = style
			.material
			.clone()
			.ok_or_else(|| BranchError::MissingMaterial { style: style.name.clone() })?;
		style.validate()?;

		let rings = style.segment_count + 1;
		let z_step = style.length / style.segment_count as f32;
		let [twist_x, twist_y, twist_z] = style.twist_bounds;

		let mut positions = Vec::with_capacity(SIDES * rings + 2);
		let mut ring_centers = Vec::with_capacity(rings);
		let mut ring_radii = Vec::with_capacity(rings);

		let mut rotation = Quat::IDENTITY;
		let mut center = Vec3::ZERO;

		for ring in 0..rings {
			if ring != 0 {
				// 1. Twist, unless it would curl past the deviation limit
				let twist = Quat::from_euler(
					EulerRot::YXZ,
					rng.symmetric(twist_y).to_radians(),
					rng.symmetric(twist_x).to_radians(),
					rng.symmetric(twist_z).to_radians(),
				);
				let next = rotation * twist;
				if Vec3::Z.angle_between(next * Vec3::Z).to_degrees() <= style.max_deviation_angle {
					rotation = next;
				}

				// 2. Step along the spine with a little sideways wobble
				let jitter = Vec3::new(rng.symmetric(style.ring_jitter), rng.symmetric(style.ring_jitter), 0.0);
				center += rotation * (Vec3::Z * z_step + jitter);
			}

			let radius = style.radius_at(ring);
			for side in 0..SIDES {
				let angle = TAU * side as f32 / SIDES as f32;
				let local = Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0);
				positions.push(center + rotation * local);
			}

			ring_centers.push(center);
			ring_radii.push(radius);
		}

		let base_center = positions.len() as u32;
		positions.push(ring_centers[0]);
		let tip_center = positions.len() as u32;
		positions.push(ring_centers[rings - 1]);

		let indices = hex_indices(style.segment_count, base_center, tip_center);

		let colliders = match style.collider {
			ColliderMode::Capsules => segment_capsules(&positions, &ring_radii),
			ColliderMode::ConvexHull => vec![Collider::ConvexHull { points: positions.clone() }],
		};

		Ok(BranchMesh {
			style: style.name.clone(),
			material,
			positions,
			indices,
			ring_centers,
			ring_radii,
			colliders,
		})
	}
}

/// Side walls between consecutive rings plus a fan cap at each end.
fn hex_indices(segment_count: usize, base_center: u32, tip_center: u32) -> Vec<u32> {
	let mut indices = Vec::with_capacity(SIDES * segment_count * 6 + SIDES * 6);

	for segment in 0..segment_count {
		let start_a = segment * SIDES;
		let start_b = (segment + 1) * SIDES;
		for side in 0..SIDES {
			let next = (side + 1) % SIDES;
			let a = (start_a + side) as u32;
			let b = (start_a + next) as u32;
			let c = (start_b + side) as u32;
			let d = (start_b + next) as u32;
			indices.extend_from_slice(&[a, b, c, c, b, d]);
		}
	}

	let tip_start = segment_count * SIDES;
	for side in 0..SIDES {
		let next = (side + 1) % SIDES;
		indices.extend_from_slice(&[base_center, next as u32, side as u32]);
		indices.extend_from_slice(&[tip_center, (tip_start + side) as u32, (tip_start + next) as u32]);
	}

	indices
}

/// One capsule per segment, spanning the averaged ring centres and at least as thick as
/// the wider of the two rings.
fn segment_capsules(positions: &[Vec3], ring_radii: &[f32]) -> Vec<Collider> {
	let ring_center =
		|ring: usize| positions[ring * SIDES..(ring + 1) * SIDES].iter().sum::<Vec3>() / SIDES as f32;

	ring_radii
		.windows(2)
		.enumerate()
		.map(|(segment, radii)| {
			let (base, tip) = (ring_center(segment), ring_center(segment + 1));
			let radius = radii[0].max(radii[1]);
			Collider::Capsule(CapsuleSdf::from_center_axis(
				base.lerp(tip, 0.5),
				tip - base,
				base.distance(tip),
				radius,
			))
		})
		.collect()
}
