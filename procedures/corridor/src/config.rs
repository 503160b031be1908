use crate::branch::BranchStyle;
use crate::end_volume::EndVolumeConfig;
use crate::ground::GroundConfig;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
	#[error("a corridor needs at least 2 branches, got {0}")]
	TooFewBranches(usize),
	#[error("minimum forward offset must be positive, got {0}")]
	NonPositiveForwardOffset(f32),
	#[error("forward offset range is inverted: min {min} > max {max}")]
	InvertedForwardRange { min: f32, max: f32 },
	#[error("{name} must be finite and non-negative, got {value}")]
	NegativeRange { name: &'static str, value: f32 },
	#[error("split index {min_split_index} must be below join bound {max_join_index} minus {secondary_branches} secondary branches")]
	InvalidSplitRange { min_split_index: usize, max_join_index: usize, secondary_branches: usize },
	#[error("secondary paths need at least 2 branches, got {0}")]
	TooFewSecondaryBranches(usize),
	#[error("arc sampling needs at least one sample per segment")]
	NoArcSamples,
	#[error("branch style list is empty")]
	NoBranchStyles,
	#[error("invalid ground configuration: {0}")]
	Ground(String),
	#[error("end volume size must be positive on every axis, got {0:?}")]
	EndVolumeSize([f32; 3]),
	#[error("failed to parse level configuration: {0}")]
	Parse(String),
}

/// How secondary paths bridge from their split point to their join point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BridgeCurve {
	/// Catmull-Rom arc through a raised, sideways midpoint, resampled at random spacing.
	#[default]
	LateralArc,
	/// Cubic Bézier with fixed handles, sampled at evenly spaced parameters.
	Bezier,
}

/// Parameters for path generation and corridor assembly.
/// Angles are in degrees, distances in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
	/// Number of branches (path points) on the main corridor.
	pub branch_count: usize,
	pub min_forward_offset: f32,
	pub max_forward_offset: f32,
	/// Path turn per step.
	pub max_yaw_angle: f32,
	/// Visual tilt of each branch.
	pub max_pitch_angle: f32,
	pub max_height_delta: f32,
	pub start_height: f32,
	/// Largest sideways offset tolerated between consecutive connectors.
	pub max_lateral_delta: f32,
	/// Hard floor for the main path; the whole path is lifted to respect it.
	pub min_height: Option<f32>,

	pub secondary_path_count: usize,
	/// Main path points spanned by each secondary path.
	pub secondary_branches: usize,
	pub min_split_index: usize,
	pub max_join_index: usize,
	pub curvature: f32,
	pub bridge_curve: BridgeCurve,
	/// Minimum dense samples per control segment when measuring arc length.
	pub arc_samples_per_segment: usize,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			branch_count: 50,
			min_forward_offset: 4.0,
			max_forward_offset: 8.0,
			max_yaw_angle: 10.0,
			max_pitch_angle: 5.0,
			max_height_delta: 1.0,
			start_height: 3.0,
			max_lateral_delta: 0.5,
			min_height: None,
			secondary_path_count: 2,
			secondary_branches: 20,
			min_split_index: 10,
			max_join_index: 40,
			curvature: 5.0,
			bridge_curve: BridgeCurve::default(),
			arc_samples_per_segment: 32,
		}
	}
}

impl GenerationConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.branch_count < 2 {
			return Err(ConfigError::TooFewBranches(self.branch_count));
		}
		if self.min_forward_offset <= 0.0 || !self.min_forward_offset.is_finite() {
			return Err(ConfigError::NonPositiveForwardOffset(self.min_forward_offset));
		}
		if self.min_forward_offset > self.max_forward_offset {
			return Err(ConfigError::InvertedForwardRange {
				min: self.min_forward_offset,
				max: self.max_forward_offset,
			});
		}

		for (name, value) in [
			("max_forward_offset", self.max_forward_offset),
			("max_yaw_angle", self.max_yaw_angle),
			("max_pitch_angle", self.max_pitch_angle),
			("max_height_delta", self.max_height_delta),
			("max_lateral_delta", self.max_lateral_delta),
			("curvature", self.curvature),
		] {
			if !value.is_finite() || value < 0.0 {
				return Err(ConfigError::NegativeRange { name, value });
			}
		}

		if self.secondary_path_count > 0 {
			if self.secondary_branches < 2 {
				return Err(ConfigError::TooFewSecondaryBranches(self.secondary_branches));
			}
			let valid_split = self
				.max_join_index
				.checked_sub(self.secondary_branches)
				.is_some_and(|upper| self.min_split_index < upper);
			if !valid_split {
				return Err(ConfigError::InvalidSplitRange {
					min_split_index: self.min_split_index,
					max_join_index: self.max_join_index,
					secondary_branches: self.secondary_branches,
				});
			}
			if self.bridge_curve == BridgeCurve::LateralArc && self.arc_samples_per_segment == 0 {
				return Err(ConfigError::NoArcSamples);
			}
		}

		Ok(())
	}
}

/// Everything a level generation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
	pub generation: GenerationConfig,
	/// Branch recipes picked from at random for every placement.
	pub styles: Vec<BranchStyle>,
	pub ground: GroundConfig,
	pub end_volume: EndVolumeConfig,
	/// Horizontal start of the main path; its height comes from `start_height`.
	pub origin: [f32; 3],
	/// Fixed level entrance the first main connector snaps to.
	pub start_connector: Option<[f32; 3]>,
}

impl Default for LevelConfig {
	fn default() -> Self {
		Self {
			generation: GenerationConfig::default(),
			styles: vec![BranchStyle::default()],
			ground: GroundConfig::default(),
			end_volume: EndVolumeConfig::default(),
			origin: [0.0, 0.0, 0.0],
			start_connector: None,
		}
	}
}

impl LevelConfig {
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
	}

	pub fn to_json_string(&self) -> Result<String, ConfigError> {
		serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		self.generation.validate()?;
		if self.styles.is_empty() {
			return Err(ConfigError::NoBranchStyles);
		}
		self.ground.validate()?;
		self.end_volume.validate()?;
		Ok(())
	}

	/// Start of the main path: the origin raised to the configured start height.
	pub fn path_start(&self) -> Vec3 {
		Vec3::new(self.origin[0], self.generation.start_height, self.origin[2])
	}

	pub fn start_connector(&self) -> Option<Vec3> {
		self.start_connector.map(Vec3::from_array)
	}
}
