use crate::config::LevelConfig;
use crate::corridor::CorridorKind;
use crate::level::{LevelCompleted, LevelSession, LevelSummary};
use crate::mesh::MeshBuilder;
use crate::random::LevelRng;
use bevy::prelude::*;
use std::collections::HashMap;

/// Request to (re)generate the level. A seed reseeds the level generator first.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct GenerateLevel {
	pub seed: Option<u64>,
}

/// Request to tear down the current level.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct CleanLevel;

/// Sent after a level has been generated and spawned.
#[derive(Message, Debug, Clone, Copy)]
pub struct CorridorGenerated {
	pub summary: LevelSummary,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveLevelConfig(pub LevelConfig);

/// Materials for spawned level geometry, branch materials keyed by name.
#[derive(Resource, Debug, Clone)]
pub struct CorridorPalette {
	pub branches: HashMap<String, Handle<StandardMaterial>>,
	pub fallback: Handle<StandardMaterial>,
	pub ground: Handle<StandardMaterial>,
	pub end_volume: Handle<StandardMaterial>,
}

impl CorridorPalette {
	pub fn branch(&self, name: &str) -> Handle<StandardMaterial> {
		self.branches.get(name).unwrap_or(&self.fallback).clone()
	}
}

/// Marks every entity spawned for the current level.
#[derive(Component, Debug, Clone, Copy)]
pub struct LevelEntity;

#[derive(Component, Debug, Clone, Copy)]
pub struct BranchPlacement {
	pub kind: CorridorKind,
	pub path_index: usize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct GroundRibbon;

#[derive(Component, Debug, Clone, Copy)]
pub struct EndVolumeTrigger;

/// Something that can complete the level by reaching the end volume.
#[derive(Component, Debug, Clone)]
pub struct Traverser {
	pub tag: String,
}

impl Traverser {
	pub fn new(tag: impl Into<String>) -> Self {
		Self { tag: tag.into() }
	}
}

pub struct CorridorPlugin {
	pub seed: Option<u64>,
	pub config: LevelConfig,
	pub generate_on_startup: bool,
}

impl Default for CorridorPlugin {
	fn default() -> Self {
		Self { seed: None, config: LevelConfig::default(), generate_on_startup: true }
	}
}

impl CorridorPlugin {
	pub fn new(config: LevelConfig) -> Self {
		Self { config, ..Default::default() }
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}
}

impl Plugin for CorridorPlugin {
	fn build(&self, app: &mut App) {
		let rng = self.seed.map(LevelRng::seeded).unwrap_or_default();

		app.insert_resource(rng)
			.insert_resource(ActiveLevelConfig(self.config.clone()))
			.init_resource::<LevelSession>()
			.add_message::<GenerateLevel>()
			.add_message::<CleanLevel>()
			.add_message::<CorridorGenerated>()
			.add_message::<LevelCompleted>()
			.add_systems(Startup, setup_palette)
			.add_systems(
				Update,
				(handle_clean_requests, handle_generate_requests, detect_level_completion).chain(),
			);

		if self.generate_on_startup {
			app.add_systems(Startup, request_initial_level.after(setup_palette));
		}
	}
}

fn setup_palette(
	mut commands: Commands,
	mut materials: ResMut<Assets<StandardMaterial>>,
	config: Res<ActiveLevelConfig>,
) {
	let mut branches = HashMap::new();
	for (i, name) in config.0.styles.iter().filter_map(|s| s.material.as_ref()).enumerate() {
		// bark tones, drifting lighter per material
		let tone = 0.05 * (i % 6) as f32;
		branches.entry(name.clone()).or_insert_with(|| {
			materials.add(StandardMaterial {
				base_color: Color::srgb(0.36 + tone, 0.25 + tone * 0.5, 0.16),
				perceptual_roughness: 0.9,
				..default()
			})
		});
	}

	let fallback = materials.add(Color::srgb(0.4, 0.3, 0.2));
	let ground = materials.add(StandardMaterial {
		base_color: Color::srgb(0.3, 0.45, 0.25),
		perceptual_roughness: 1.0,
		double_sided: true,
		cull_mode: None,
		..default()
	});
	let end_volume = materials.add(StandardMaterial {
		base_color: Color::srgba(1.0, 0.85, 0.2, 0.35),
		alpha_mode: AlphaMode::Blend,
		unlit: true,
		..default()
	});

	commands.insert_resource(CorridorPalette { branches, fallback, ground, end_volume });
}

fn request_initial_level(mut requests: MessageWriter<GenerateLevel>) {
	requests.write(GenerateLevel::default());
}

fn despawn_level(commands: &mut Commands, entities: &Query<Entity, With<LevelEntity>>) -> usize {
	let mut count = 0;
	for entity in entities.iter() {
		commands.entity(entity).despawn();
		count += 1;
	}
	count
}

fn handle_clean_requests(
	mut requests: MessageReader<CleanLevel>,
	mut commands: Commands,
	mut session: ResMut<LevelSession>,
	entities: Query<Entity, With<LevelEntity>>,
) {
	if requests.read().count() == 0 {
		return;
	}

	let despawned = despawn_level(&mut commands, &entities);
	let freed = session.clean();
	log::debug!("clean request: despawned {despawned} entities, freed {freed} placements");
}

#[allow(clippy::too_many_arguments)]
fn handle_generate_requests(
	mut requests: MessageReader<GenerateLevel>,
	mut generated: MessageWriter<CorridorGenerated>,
	mut commands: Commands,
	mut session: ResMut<LevelSession>,
	mut rng: ResMut<LevelRng>,
	config: Res<ActiveLevelConfig>,
	palette: Option<Res<CorridorPalette>>,
	mut meshes: ResMut<Assets<Mesh>>,
	entities: Query<Entity, With<LevelEntity>>,
) {
	// several requests in one frame collapse into the last
	let Some(request) = requests.read().last().copied() else {
		return;
	};
	let Some(palette) = palette else {
		log::warn!("corridor palette is not ready, dropping generate request");
		return;
	};

	if let Some(seed) = request.seed {
		rng.reseed(seed);
	}

	despawn_level(&mut commands, &entities);

	match session.generate_level(&config.0, &mut rng.0) {
		Ok(summary) => {
			spawn_level(&mut commands, &session, &palette, &mut meshes);
			generated.write(CorridorGenerated { summary });
		}
		Err(e) => log::error!("level generation failed: {e}"),
	}
}

fn spawn_level(
	commands: &mut Commands,
	session: &LevelSession,
	palette: &CorridorPalette,
	meshes: &mut Assets<Mesh>,
) {
	for placement in session.main_placements().iter().chain(session.secondary_placements()) {
		let Some(mesh) = placement.mesh.build_mesh() else {
			continue;
		};
		commands.spawn((
			LevelEntity,
			BranchPlacement { kind: placement.kind, path_index: placement.path_index },
			Mesh3d(meshes.add(mesh)),
			MeshMaterial3d(palette.branch(&placement.mesh.material)),
			placement.transform,
		));
	}

	if let Some(mesh) = session.ground().and_then(|ground| ground.build_mesh()) {
		commands.spawn((
			LevelEntity,
			GroundRibbon,
			Mesh3d(meshes.add(mesh)),
			MeshMaterial3d(palette.ground.clone()),
			Transform::IDENTITY,
		));
	}

	if let Some(volume) = session.end_volume() {
		if let Some(mesh) = volume.build_mesh() {
			commands.spawn((
				LevelEntity,
				EndVolumeTrigger,
				Mesh3d(meshes.add(mesh)),
				MeshMaterial3d(palette.end_volume.clone()),
				volume.transform,
			));
		}
	}
}

fn detect_level_completion(
	mut session: ResMut<LevelSession>,
	traversers: Query<(&Transform, &Traverser)>,
	mut completed: MessageWriter<LevelCompleted>,
) {
	for (transform, traverser) in traversers.iter() {
		if let Some(done) = session.observe_traverser(transform.translation, &traverser.tag) {
			completed.write(done);
		}
	}
}
