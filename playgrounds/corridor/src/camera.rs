use crate::traverser::Runner;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

/// Where the chase camera looks when no runner is on the corridor.
const LEVEL_START: Vec3 = Vec3::new(0.0, 3.0, 0.0);

/// Chase camera orbiting the runner. Drag with the right mouse button to orbit, scroll to zoom.
#[derive(Component)]
pub struct CameraController {
	pub distance: f32,
	/// Angle around the world Y axis, zero looking down +Z.
	pub azimuth: f32,
	pub elevation: f32,
	pub sensitivity: f32,
}

impl Default for CameraController {
	fn default() -> Self {
		Self { distance: 13.4, azimuth: 0.0, elevation: 0.46, sensitivity: 0.005 }
	}
}

impl CameraController {
	/// Offset from the chase target to the camera.
	pub fn offset(&self) -> Vec3 {
		let (sin_az, cos_az) = self.azimuth.sin_cos();
		let (sin_el, cos_el) = self.elevation.sin_cos();
		Vec3::new(-sin_az * cos_el, sin_el, -cos_az * cos_el) * self.distance
	}
}

pub fn setup_camera(mut commands: Commands) {
	let controller = CameraController::default();
	let camera_pos = LEVEL_START + controller.offset();

	log::info!("Setting up chase camera at position: {:?}, looking at: {:?}", camera_pos, LEVEL_START);

	commands.spawn((
		Camera3d::default(),
		Transform::from_translation(camera_pos).looking_at(LEVEL_START, Vec3::Y),
		Projection::Perspective(PerspectiveProjection { near: 0.1, far: 2000.0, ..default() }),
		controller,
	));
}

pub fn orbit_controls(
	mouse_buttons: Res<ButtonInput<MouseButton>>,
	mut mouse_motion: MessageReader<MouseMotion>,
	mut mouse_wheel: MessageReader<MouseWheel>,
	mut query: Query<&mut CameraController>,
) {
	let Ok(mut controller) = query.single_mut() else {
		return;
	};

	let drag: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
	if mouse_buttons.pressed(MouseButton::Right) {
		controller.azimuth -= drag.x * controller.sensitivity;
		controller.elevation = (controller.elevation + drag.y * controller.sensitivity).clamp(0.05, 1.4);
	}

	let scroll: f32 = mouse_wheel.read().map(|wheel| wheel.y).sum();
	if scroll != 0.0 {
		controller.distance = (controller.distance * (1.0 - scroll * 0.1)).clamp(4.0, 80.0);
	}
}

pub fn follow_runner(
	time: Res<Time>,
	runners: Query<&Transform, (With<Runner>, Without<CameraController>)>,
	mut cameras: Query<(&mut Transform, &CameraController)>,
) {
	let Ok((mut transform, controller)) = cameras.single_mut() else {
		return;
	};
	let target = runners.single().map_or(LEVEL_START, |runner| runner.translation);

	let desired = target + controller.offset();
	let blend = (time.delta_secs() * 3.0).min(1.0);
	transform.translation = transform.translation.lerp(desired, blend);
	transform.look_at(target, Vec3::Y);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_offset_trails_behind() {
		let offset = CameraController::default().offset();
		assert!(offset.z < -11.0 && offset.z > -13.0);
		assert!(offset.y > 5.0 && offset.y < 7.0);
		assert!(offset.x.abs() < 1e-5);
	}

	#[test]
	fn test_offset_keeps_distance() {
		let controller = CameraController { azimuth: 1.2, elevation: 0.8, ..Default::default() };
		assert!((controller.offset().length() - controller.distance).abs() < 1e-4);
	}
}
