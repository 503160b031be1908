use bevy::prelude::*;
use corridor::{CleanLevel, CorridorPlugin, GenerateLevel, LevelCompleted, LevelConfig};
use std::f32::consts::PI;

mod camera;
mod traverser;

pub use camera::CameraController;
pub use traverser::Runner;

pub struct CorridorPlaygroundPlugin {
	pub seed: u64,
	pub config: LevelConfig,
}

impl Plugin for CorridorPlaygroundPlugin {
	fn build(&self, app: &mut App) {
		app.add_plugins(CorridorPlugin::new(self.config.clone()).with_seed(self.seed));

		app.insert_resource(ClearColor(Color::hsla(201.0, 0.69, 0.62, 1.0)))
			.add_systems(Startup, (camera::setup_camera, setup_lighting))
			.add_systems(
				Update,
				(
					level_controls,
					next_level_on_completion,
					traverser::spawn_runner,
					traverser::run_along_corridor,
					camera::orbit_controls,
					camera::follow_runner,
				)
					.chain(),
			);
	}
}

fn setup_lighting(mut commands: Commands) {
	commands.insert_resource(AmbientLight {
		color: Color::WHITE,
		brightness: 2.0,
		affects_lightmapped_meshes: true,
	});

	// Sun
	commands.spawn((
		DirectionalLight { illuminance: 10000.0, shadows_enabled: true, ..default() },
		Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -PI / 4.0, PI / 4.0, 0.0)),
	));

	// Fill from the opposite side
	commands.spawn((
		DirectionalLight { illuminance: 500.0, shadows_enabled: false, ..default() },
		Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, PI / 4.0, -PI / 4.0, 0.0)),
	));
}

/// R regenerates with the running generator, N with a fresh seed, C cleans.
fn level_controls(
	keyboard_input: Res<ButtonInput<KeyCode>>,
	mut generate: MessageWriter<GenerateLevel>,
	mut clean: MessageWriter<CleanLevel>,
	time: Res<Time>,
) {
	if keyboard_input.just_pressed(KeyCode::KeyR) {
		log::info!("Regenerating level");
		generate.write(GenerateLevel::default());
	}
	if keyboard_input.just_pressed(KeyCode::KeyN) {
		let seed = time.elapsed().as_nanos() as u64;
		log::info!("Generating level with seed {}", seed);
		generate.write(GenerateLevel { seed: Some(seed) });
	}
	if keyboard_input.just_pressed(KeyCode::KeyC) {
		log::info!("Cleaning level");
		clean.write(CleanLevel);
	}
}

fn next_level_on_completion(
	mut completed: MessageReader<LevelCompleted>,
	mut generate: MessageWriter<GenerateLevel>,
) {
	for done in completed.read() {
		log::info!("Level {} completed, generating the next one", done.generation);
		generate.write(GenerateLevel::default());
	}
}
