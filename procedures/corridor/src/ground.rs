use crate::config::ConfigError;
use crate::math::lateral_axis;
use crate::mesh::{triangle_mesh, Collider, MeshBuilder};
use crate::random::RandomSource;
use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GroundError {
	#[error("ground needs at least 2 points, got {0}")]
	NotEnoughPoints(usize),
}

/// How far below the path each ground sample sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum GroundDrop {
	/// The larger of the minimum and target distances.
	#[default]
	Fixed,
	/// Uniformly random between the minimum and target distances.
	Uniform,
	/// Coherent noise over the ground plane between the minimum and target distances.
	Perlin { frequency: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkirtConfig {
	/// How far the skirt walls drop below the ribbon.
	pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
	pub width: f32,
	pub target_distance_below: f32,
	pub min_distance_below: f32,
	pub drop: GroundDrop,
	/// Passes of neighbour averaging applied to the input points.
	pub smoothing_iterations: usize,
	/// Fraction of the way each pass moves a point toward its neighbours' mean.
	pub smoothing_strength: f32,
	/// Points on either side used for interior tangents.
	pub tangent_window: usize,
	pub skirt: Option<SkirtConfig>,
}

impl Default for GroundConfig {
	fn default() -> Self {
		Self {
			width: 12.0,
			target_distance_below: 3.0,
			min_distance_below: 1.5,
			drop: GroundDrop::default(),
			smoothing_iterations: 0,
			smoothing_strength: 0.5,
			tangent_window: 1,
			skirt: None,
		}
	}
}

impl GroundConfig {
	pub fn with_skirt(mut self, height: f32) -> Self {
		self.skirt = Some(SkirtConfig { height });
		self
	}

	pub fn with_smoothing(mut self, iterations: usize, strength: f32) -> Self {
		self.smoothing_iterations = iterations;
		self.smoothing_strength = strength;
		self
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.width.is_finite() || self.width <= 0.0 {
			return Err(ConfigError::Ground(format!("width must be positive, got {}", self.width)));
		}
		if self.min_distance_below < 0.0 || self.target_distance_below < 0.0 {
			return Err(ConfigError::Ground("distances below the path must not be negative".to_string()));
		}
		if !(0.0..=1.0).contains(&self.smoothing_strength) {
			return Err(ConfigError::Ground(format!(
				"smoothing strength must be within [0, 1], got {}",
				self.smoothing_strength
			)));
		}
		if self.tangent_window == 0 {
			return Err(ConfigError::Ground("tangent window must be at least 1".to_string()));
		}
		if let Some(skirt) = self.skirt {
			if !skirt.height.is_finite() || skirt.height <= 0.0 {
				return Err(ConfigError::Ground(format!("skirt height must be positive, got {}", skirt.height)));
			}
		}
		Ok(())
	}

	fn drop_range(&self) -> (f32, f32) {
		(self.min_distance_below, self.min_distance_below.max(self.target_distance_below))
	}
}

/// Ribbon (and optional skirt walls) laid beneath a path.
///
/// Ribbon vertices come in left/right pairs, `2i` and `2i + 1`. With a skirt, the lowered
/// rails follow at `2n + 2i` and `2n + 2i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundMesh {
	pub positions: Vec<Vec3>,
	pub uvs: Vec<[f32; 2]>,
	pub indices: Vec<u32>,
	pub point_count: usize,
	pub collider: Collider,
}

impl GroundMesh {
	pub fn has_skirt(&self) -> bool {
		self.positions.len() == self.point_count * 4
	}

	/// Centre of the ribbon at sample `i`.
	pub fn center(&self, i: usize) -> Option<Vec3> {
		let left = self.positions.get(i * 2)?;
		let right = self.positions.get(i * 2 + 1)?;
		(i < self.point_count).then(|| (*left + *right) * 0.5)
	}
}

impl MeshBuilder for GroundMesh {
	fn build_mesh(&self) -> Option<Mesh> {
		triangle_mesh(&self.positions, &self.indices, Some(&self.uvs))
	}
}

/// Builds the ground mesh beneath `points`.
pub fn build_ground(
	points: &[Vec3],
	config: &GroundConfig,
	rng: &mut impl RandomSource,
) -> Result<GroundMesh, GroundError> {
	let n = points.len();
	if n < 2 {
		return Err(GroundError::NotEnoughPoints(n));
	}

	let points = smooth(points, config.smoothing_iterations, config.smoothing_strength);
	let depths = drop_depths(&points, config, rng);
	let half_width = config.width * 0.5;

	// 1. Ground centres and their lateral axes
	let centers: Vec<Vec3> = points.iter().zip(&depths).map(|(p, d)| *p - Vec3::Y * *d).collect();
	let rights: Vec<Vec3> = (0..n).map(|i| lateral_axis(tangent(&points, i, config.tangent_window))).collect();
	let vs = arclength_params(&centers);

	let vertex_count = if config.skirt.is_some() { n * 4 } else { n * 2 };
	let mut positions = Vec::with_capacity(vertex_count);
	let mut uvs = Vec::with_capacity(vertex_count);

	// 2. Ribbon rails
	for i in 0..n {
		positions.push(centers[i] - rights[i] * half_width);
		positions.push(centers[i] + rights[i] * half_width);
		uvs.push([0.0, vs[i]]);
		uvs.push([1.0, vs[i]]);
	}

	// 3. Skirt rails
	if let Some(skirt) = config.skirt {
		let overhang = skirt.height / config.width;
		for i in 0..n {
			positions.push(positions[i * 2] - Vec3::Y * skirt.height);
			positions.push(positions[i * 2 + 1] - Vec3::Y * skirt.height);
			uvs.push([-overhang, vs[i]]);
			uvs.push([1.0 + overhang, vs[i]]);
		}
	}

	let indices = ground_indices(n, config.skirt.is_some());
	let collider = Collider::TriMesh { positions: positions.clone(), indices: indices.clone() };

	Ok(GroundMesh { positions, uvs, indices, point_count: n, collider })
}

fn ground_indices(n: usize, skirt: bool) -> Vec<u32> {
	let per_gap = if skirt { 18 } else { 6 };
	let mut indices = Vec::with_capacity((n - 1) * per_gap);
	let rail = (n * 2) as u32;

	for i in 0..(n - 1) as u32 {
		let (bl, br) = (i * 2, i * 2 + 1);
		let (tl, tr) = ((i + 1) * 2, (i + 1) * 2 + 1);
		indices.extend_from_slice(&[bl, tl, br, br, tl, tr]);

		if skirt {
			// outer walls, left then right
			let (b0, b1) = (rail + bl, rail + tl);
			indices.extend_from_slice(&[b0, b1, bl, bl, b1, tl]);

			let (b0, b1) = (rail + br, rail + tr);
			indices.extend_from_slice(&[b0, br, b1, br, tr, b1]);
		}
	}

	indices
}

/// Neighbour averaging with fixed endpoints.
fn smooth(points: &[Vec3], iterations: usize, strength: f32) -> Vec<Vec3> {
	let mut current = points.to_vec();
	if current.len() < 3 {
		return current;
	}

	for _ in 0..iterations {
		let previous = current.clone();
		for i in 1..previous.len() - 1 {
			let mean = (previous[i - 1] + previous[i + 1]) * 0.5;
			current[i] = previous[i].lerp(mean, strength);
		}
	}
	current
}

fn tangent(points: &[Vec3], i: usize, window: usize) -> Vec3 {
	let last = points.len() - 1;
	let ahead = (i + window).min(last);
	let behind = i.saturating_sub(window);
	(points[ahead] - points[behind]).normalize_or(Vec3::Z)
}

fn drop_depths(points: &[Vec3], config: &GroundConfig, rng: &mut impl RandomSource) -> Vec<f32> {
	let (min, max) = config.drop_range();
	match config.drop {
		GroundDrop::Fixed => vec![max; points.len()],
		GroundDrop::Uniform => points.iter().map(|_| rng.range_f32(min, max)).collect(),
		GroundDrop::Perlin { frequency } => {
			let perlin = Perlin::new(rng.seed_u32());
			points
				.iter()
				.map(|p| {
					let sample = perlin.get([p.x as f64 * frequency, p.z as f64 * frequency]) as f32;
					// Map [-1,1] → [0,1]
					let t = (sample * 0.5 + 0.5).clamp(0.0, 1.0);
					min + (max - min) * t
				})
				.collect()
		}
	}
}

/// Cumulative distance along `points`, normalised to `[0, 1]`.
fn arclength_params(points: &[Vec3]) -> Vec<f32> {
	let mut params = Vec::with_capacity(points.len());
	let mut travelled = 0.0;
	params.push(0.0);
	for pair in points.windows(2) {
		travelled += pair[0].distance(pair[1]);
		params.push(travelled);
	}

	if travelled > 0.0 {
		params.iter_mut().for_each(|v| *v /= travelled);
	} else {
		let last = (points.len() - 1).max(1) as f32;
		params.iter_mut().enumerate().for_each(|(i, v)| *v = i as f32 / last);
	}
	params
}

/// Holds the current ground mesh and replaces it on every rebuild.
#[derive(Debug, Clone, Default)]
pub struct GroundBuilder {
	config: GroundConfig,
	current: Option<GroundMesh>,
}

impl GroundBuilder {
	pub fn new(config: GroundConfig) -> Self {
		Self { config, current: None }
	}

	pub fn current(&self) -> Option<&GroundMesh> {
		self.current.as_ref()
	}

	/// Replaces the current mesh with one built beneath `points`. On failure the old mesh is
	/// still dropped.
	pub fn rebuild(
		&mut self,
		points: &[Vec3],
		rng: &mut impl RandomSource,
	) -> Result<&GroundMesh, GroundError> {
		self.current = None;
		let mesh = build_ground(points, &self.config, rng)?;
		Ok(self.current.insert(mesh))
	}

	pub fn clear(&mut self) -> Option<GroundMesh> {
		self.current.take()
	}
}
