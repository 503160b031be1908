use crate::branch::{BranchMesh, BranchStyle, Connector, HexBranchBuilder};
use crate::config::GenerationConfig;
use crate::math::look_rotation;
use crate::mesh::Collider;
use crate::path::tangent_at;
use crate::random::RandomSource;
use bevy::prelude::*;

/// Which corridor a placement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorridorKind {
	Main,
	/// Secondary path, by its index among the configured secondary paths.
	Secondary(usize),
}

/// One branch placed along a corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
	pub kind: CorridorKind,
	/// Index of the path point this branch was placed at.
	pub path_index: usize,
	pub style_index: usize,
	/// World transform of the branch root.
	pub transform: Transform,
	/// Tip anchor in world space.
	pub connector: Connector,
	/// Geometry in the branch's local frame.
	pub mesh: BranchMesh,
}

impl Placement {
	pub fn root(&self) -> Vec3 {
		self.transform.translation
	}

	/// Local `+X` of the branch root in world space.
	pub fn right(&self) -> Vec3 {
		self.transform.rotation * Vec3::X
	}

	pub fn world_colliders(&self) -> Vec<Collider> {
		self.mesh.colliders.iter().map(|c| c.transformed(&self.transform)).collect()
	}
}

/// The last placed connector and the lateral axis corrections are measured along.
#[derive(Debug, Clone, Copy)]
struct Previous {
	connector: Vec3,
	right: Vec3,
}

/// Walks a path and places one branch per point, chaining them through their connectors.
#[derive(Debug, Clone, Copy)]
pub struct CorridorAssembler<'a> {
	config: &'a GenerationConfig,
	styles: &'a [BranchStyle],
	start_connector: Option<Vec3>,
}

impl<'a> CorridorAssembler<'a> {
	pub fn new(config: &'a GenerationConfig, styles: &'a [BranchStyle]) -> Self {
		Self { config, styles, start_connector: None }
	}

	/// Fixed entrance the first main branch snaps its connector to.
	pub fn with_start_connector(mut self, start_connector: Option<Vec3>) -> Self {
		self.start_connector = start_connector;
		self
	}

	/// Places branches along `path`.
	///
	/// The main corridor covers every point. Secondary corridors skip both ends, where they
	/// meet the main path.
	///
	/// # Panics
	///
	/// If `path` has fewer than 2 points.
	pub fn assemble(
		&self,
		path: &[Vec3],
		kind: CorridorKind,
		rng: &mut impl RandomSource,
	) -> Vec<Placement> {
		assert!(path.len() >= 2, "a corridor needs at least 2 path points, got {}", path.len());

		if self.styles.is_empty() {
			log::error!("no branch styles to place along {kind:?}");
			return Vec::new();
		}

		let indices = match kind {
			CorridorKind::Main => 0..path.len(),
			CorridorKind::Secondary(_) => 1..path.len() - 1,
		};

		let (placements, _) = indices.fold(
			(Vec::with_capacity(path.len()), None::<Previous>),
			|(mut placements, previous), index| {
				let Some(placement) = self.place(path, index, kind, previous, rng) else {
					return (placements, previous);
				};
				let next = Previous { connector: placement.connector.position, right: placement.right() };
				placements.push(placement);
				(placements, Some(next))
			},
		);

		log::debug!("assembled {} of {} branches for {kind:?}", placements.len(), path.len());
		placements
	}

	fn place(
		&self,
		path: &[Vec3],
		index: usize,
		kind: CorridorKind,
		previous: Option<Previous>,
		rng: &mut impl RandomSource,
	) -> Option<Placement> {
		let style_index = rng.range_usize(0, self.styles.len());
		let pitch = rng.symmetric(self.config.max_pitch_angle);

		let mesh = match HexBranchBuilder::new(&self.styles[style_index]).build(rng) {
			Ok(mesh) => mesh,
			Err(e) => {
				log::warn!("skipping {kind:?} branch {index}: {e}");
				return None;
			}
		};
		let Some(local_connector) = mesh.connector() else {
			log::warn!("skipping {kind:?} branch {index}: generated branch has no connector");
			return None;
		};

		// 1. Orient along the path with a little pitch
		let forward = tangent_at(path, index);
		let rotation = look_rotation(forward, Vec3::Y) * Quat::from_rotation_x(pitch.to_radians());

		// 2. Put the connector on the path point, or on the level entrance
		let target = match (kind, index, self.start_connector) {
			(CorridorKind::Main, 0, Some(start)) => start,
			_ => path[index],
		};
		let mut translation = target - rotation * local_connector.position;

		// 3. Pull back sideways drift beyond the allowed lateral delta
		if let Some(previous) = previous {
			let lateral = (previous.connector - target).project_onto(previous.right);
			let excess = lateral.length() - self.config.max_lateral_delta;
			if excess > 0.0 {
				translation += lateral.normalize_or_zero() * excess;
			}
		}

		let transform = Transform::from_translation(translation).with_rotation(rotation);
		let connector = local_connector.transformed(&transform);

		Some(Placement { kind, path_index: index, style_index, transform, connector, mesh })
	}
}
