use bevy::prelude::*;
use corridor::{CorridorGenerated, LevelEntity, LevelSession, Traverser};

/// Auto-runner that follows the main corridor's connectors into the end volume.
#[derive(Component, Debug, Clone)]
pub struct Runner {
	pub speed: f32,
	/// Height above the connectors.
	pub hover: f32,
	waypoints: Vec<Vec3>,
	next: usize,
}

impl Runner {
	pub fn is_finished(&self) -> bool {
		self.next >= self.waypoints.len()
	}
}

pub fn spawn_runner(
	mut generated: MessageReader<CorridorGenerated>,
	mut commands: Commands,
	session: Res<LevelSession>,
	mut meshes: ResMut<Assets<Mesh>>,
	mut materials: ResMut<Assets<StandardMaterial>>,
) {
	if generated.read().last().is_none() {
		return;
	}

	let hover = 0.6;
	let mut waypoints: Vec<Vec3> =
		session.main_connector_positions().into_iter().map(|p| p + Vec3::Y * hover).collect();
	if let Some(volume) = session.end_volume() {
		waypoints.push(volume.transform.translation);
	}
	let Some(&start) = waypoints.first() else {
		return;
	};

	let tag = session.end_volume().map(|v| v.traverser_tag().to_string()).unwrap_or_default();
	log::info!("Spawning runner '{}' with {} waypoints", tag, waypoints.len());
	if let Some(bounds) = session.bounds() {
		log::debug!("Level bounds: {:?}", bounds);
	}

	commands.spawn((
		LevelEntity,
		Traverser::new(tag),
		Runner { speed: 12.0, hover, waypoints, next: 1 },
		Mesh3d(meshes.add(Sphere::new(0.4))),
		MeshMaterial3d(materials.add(Color::srgb(0.9, 0.2, 0.2))),
		Transform::from_translation(start),
	));
}

pub fn run_along_corridor(time: Res<Time>, mut runners: Query<(&mut Transform, &mut Runner)>) {
	for (mut transform, mut runner) in runners.iter_mut() {
		let mut budget = runner.speed * time.delta_secs();

		while budget > 0.0 && !runner.is_finished() {
			let target = runner.waypoints[runner.next];
			let to_target = target - transform.translation;
			let distance = to_target.length();

			if distance <= budget {
				transform.translation = target;
				budget -= distance;
				runner.next += 1;
			} else {
				transform.translation += to_target / distance * budget;
				budget = 0.0;
			}
		}
	}
}
