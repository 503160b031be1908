use anyhow::Context;
use bevy::prelude::*;
use corridor::LevelConfig;
use corridor_playground::CorridorPlaygroundPlugin;
use std::path::Path;

fn load_config(path: &Path) -> anyhow::Result<LevelConfig> {
	let json = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read level config {}", path.display()))?;
	let config = LevelConfig::from_json_str(&json)
		.with_context(|| format!("failed to parse level config {}", path.display()))?;
	config.validate().with_context(|| format!("invalid level config {}", path.display()))?;
	Ok(config)
}

fn main() -> anyhow::Result<()> {
	// Parse seed and optional config path from command line
	let mut args = std::env::args().skip(1);
	let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(12345);
	let config = match args.next() {
		Some(path) => load_config(Path::new(&path))?,
		None => LevelConfig::default(),
	};

	println!("Starting corridor playground with seed: {}", seed);

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: "Corridor Playground".to_string(),
				resolution: (1280, 720).into(),
				..default()
			}),
			..default()
		}))
		.add_plugins(CorridorPlaygroundPlugin { seed, config })
		.run();

	Ok(())
}
