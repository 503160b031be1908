//! Procedural corridor levels: a spline main path, secondary paths that split from and
//! rejoin it, hexagonal branch segments chained along both, a ground ribbon beneath the
//! main path and a trigger volume at its end.

pub mod branch;
pub mod config;
pub mod corridor;
pub mod end_volume;
pub mod ground;
pub mod level;
pub mod math;
pub mod mesh;
pub mod path;
pub mod plugin;
pub mod random;

pub use branch::{BranchError, BranchMesh, BranchStyle, ColliderMode, Connector, HexBranchBuilder};
pub use config::{BridgeCurve, ConfigError, GenerationConfig, LevelConfig};
pub use corridor::{CorridorAssembler, CorridorKind, Placement};
pub use end_volume::{build_end_volume, EndVolume, EndVolumeConfig, EndVolumeError};
pub use ground::{build_ground, GroundBuilder, GroundConfig, GroundDrop, GroundError, GroundMesh, SkirtConfig};
pub use level::{LevelCompleted, LevelError, LevelSession, LevelState, LevelSummary, SecondaryPath};
pub use mesh::{Collider, MeshBuilder};
pub use path::{generate_path, make_branch_path, plan_secondary_paths, SecondaryPlan};
pub use plugin::{
	ActiveLevelConfig, BranchPlacement, CleanLevel, CorridorGenerated, CorridorPalette, CorridorPlugin,
	EndVolumeTrigger, GenerateLevel, GroundRibbon, LevelEntity, Traverser,
};
pub use random::{LevelRng, RandomSource};
