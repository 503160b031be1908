use crate::config::{ConfigError, LevelConfig};
use crate::corridor::{CorridorAssembler, CorridorKind, Placement};
use crate::end_volume::{build_end_volume, EndVolume};
use crate::ground::{GroundBuilder, GroundMesh};
use crate::path::{generate_path, make_branch_path, plan_secondary_paths, SecondaryPlan};
use crate::random::RandomSource;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use sdf::Bounds;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Lifecycle of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelState {
	#[default]
	Idle,
	Generating,
	Ready,
	/// A traverser reached the end volume.
	Completed,
}

/// Fired once when a tagged traverser enters the end volume.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCompleted {
	pub generation: u64,
}

/// What a generation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
	pub generation: u64,
	pub main_placements: usize,
	pub secondary_paths: usize,
	pub secondary_placements: usize,
	pub ground_built: bool,
	pub end_volume_built: bool,
}

/// A secondary path and the plan that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryPath {
	pub plan: SecondaryPlan,
	pub points: Vec<Vec3>,
}

/// Owns everything generated for the current level.
#[derive(Resource, Debug, Default)]
pub struct LevelSession {
	state: LevelState,
	generation: u64,
	main_path: Vec<Vec3>,
	secondary_paths: Vec<SecondaryPath>,
	main_placements: Vec<Placement>,
	secondary_placements: Vec<Placement>,
	ground: GroundBuilder,
	end_volume: Option<EndVolume>,
}

impl LevelSession {
	pub fn new() -> Self {
		Self::default()
	}

	/// Generates a full level, cleaning up the previous one first.
	///
	/// Ordering: main path, main corridor, secondary corridors, ground, end volume.
	/// Configuration errors leave the session idle and empty.
	pub fn generate_level(
		&mut self,
		config: &LevelConfig,
		rng: &mut impl RandomSource,
	) -> Result<LevelSummary, LevelError> {
		if self.state != LevelState::Idle {
			log::info!("cleaning level {} before generating a new one", self.generation);
			self.clean();
		}

		if let Err(e) = config.validate() {
			log::error!("refusing to generate level: {e}");
			return Err(e.into());
		}

		self.state = LevelState::Generating;
		self.generation += 1;
		let started = Instant::now();
		let settings = &config.generation;

		// 1. Main path and corridor
		let main_path =
			generate_path(config.path_start(), Vec3::Z, settings.branch_count, settings, rng);
		let assembler = CorridorAssembler::new(settings, &config.styles)
			.with_start_connector(config.start_connector());
		let main_placements = assembler.assemble(&main_path, CorridorKind::Main, rng);

		// 2. Secondary corridors, each with a generator forked in order
		let jobs: Vec<(SecondaryPlan, StdRng)> = plan_secondary_paths(main_path.len(), settings, rng)
			.into_iter()
			.map(|plan| (plan, rng.fork()))
			.collect();

		let secondaries: Vec<(SecondaryPath, Vec<Placement>)> = jobs
			.into_par_iter()
			.filter_map(|(plan, mut rng)| {
				let points = make_branch_path(
					&main_path,
					plan.split_index,
					plan.join_index,
					plan.index,
					settings,
					&mut rng,
				)?;
				let placements = assembler.assemble(&points, CorridorKind::Secondary(plan.index), &mut rng);
				Some((SecondaryPath { plan, points }, placements))
			})
			.collect();

		let (secondary_paths, secondary_placements): (Vec<_>, Vec<_>) = secondaries.into_iter().unzip();
		let secondary_placements: Vec<Placement> = secondary_placements.into_iter().flatten().collect();

		// 3. Ground beneath the main connectors
		let connectors: Vec<Vec3> = main_placements.iter().map(|p| p.connector.position).collect();
		self.ground = GroundBuilder::new(config.ground.clone());
		if let Err(e) = self.ground.rebuild(&connectors, rng) {
			log::warn!("no ground for level {}: {e}", self.generation);
		}

		// 4. End volume on the last main branch
		self.end_volume = match build_end_volume(main_placements.last(), &config.end_volume) {
			Ok(volume) => Some(volume),
			Err(e) => {
				log::warn!("no end volume for level {}: {e}", self.generation);
				None
			}
		};

		self.main_path = main_path;
		self.main_placements = main_placements;
		self.secondary_paths = secondary_paths;
		self.secondary_placements = secondary_placements;
		self.state = LevelState::Ready;

		let summary = self.summary();
		log::info!(
			"generated level {}: {} main branches, {} secondary paths with {} branches",
			summary.generation,
			summary.main_placements,
			summary.secondary_paths,
			summary.secondary_placements
		);
		log::debug!("level {} took {:?}", summary.generation, started.elapsed());

		Ok(summary)
	}

	/// Drops everything generated for the current level and returns to idle.
	/// Returns the number of placements freed; a second call frees nothing.
	pub fn clean(&mut self) -> usize {
		let freed = self.main_placements.len() + self.secondary_placements.len();

		self.main_path.clear();
		self.secondary_paths.clear();
		self.main_placements.clear();
		self.secondary_placements.clear();
		self.ground.clear();
		self.end_volume = None;

		if self.state != LevelState::Idle {
			log::info!("cleaned level {}: freed {freed} placements", self.generation);
		}
		self.state = LevelState::Idle;
		freed
	}

	/// Checks a traverser against the end volume, completing the level the first time a
	/// tagged traverser is inside it.
	pub fn observe_traverser(&mut self, position: Vec3, tag: &str) -> Option<LevelCompleted> {
		if self.state != LevelState::Ready {
			return None;
		}
		let volume = self.end_volume.as_mut()?;
		if !volume.observe(position, tag) {
			return None;
		}

		self.state = LevelState::Completed;
		log::info!("level {} completed", self.generation);
		Some(LevelCompleted { generation: self.generation })
	}

	pub fn summary(&self) -> LevelSummary {
		LevelSummary {
			generation: self.generation,
			main_placements: self.main_placements.len(),
			secondary_paths: self.secondary_paths.len(),
			secondary_placements: self.secondary_placements.len(),
			ground_built: self.ground.current().is_some(),
			end_volume_built: self.end_volume.is_some(),
		}
	}

	pub fn state(&self) -> LevelState {
		self.state
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn main_path(&self) -> &[Vec3] {
		&self.main_path
	}

	pub fn secondary_paths(&self) -> &[SecondaryPath] {
		&self.secondary_paths
	}

	pub fn main_placements(&self) -> &[Placement] {
		&self.main_placements
	}

	pub fn secondary_placements(&self) -> &[Placement] {
		&self.secondary_placements
	}

	/// Ordered world positions of the main corridor's connectors.
	pub fn main_connector_positions(&self) -> Vec<Vec3> {
		self.main_placements.iter().map(|p| p.connector.position).collect()
	}

	pub fn last_main_placement(&self) -> Option<&Placement> {
		self.main_placements.last()
	}

	pub fn ground(&self) -> Option<&GroundMesh> {
		self.ground.current()
	}

	pub fn end_volume(&self) -> Option<&EndVolume> {
		self.end_volume.as_ref()
	}

	/// Bounds of every collider in the level, ground and end volume included.
	pub fn bounds(&self) -> Option<Bounds> {
		self.main_placements
			.iter()
			.chain(&self.secondary_placements)
			.flat_map(|p| p.world_colliders())
			.chain(self.ground().map(|g| g.collider.clone()))
			.chain(self.end_volume.as_ref().map(|v| v.collider.clone()))
			.map(|c| c.bounds())
			.reduce(|a, b| a.union(&b))
	}
}
