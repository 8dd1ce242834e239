use bevy::{
	app::{App, AppExit},
	log::LogPlugin,
};
use puzzle_state_graph::{explorer::run_state_explorer, ExplorerOptions};

const USAGE: &str = "Usage: puzzle_state_graph <puzzle-file> [max-depth]";

fn explore_state_space(puzzle_file: &str, options: ExplorerOptions) -> AppExit {
	let result = std::fs::read_to_string(puzzle_file)
		.map_err(|e| format!("Could not open {puzzle_file}: {e}"))
		.and_then(|source| run_state_explorer(&source, &mut std::io::stdout().lock(), options));
	match result {
		Ok(()) => {
			log::info!("Explored {puzzle_file}");
			AppExit::Success
		}
		Err(err) => {
			log::error!("{err}");
			AppExit::error()
		}
	}
}

fn main() -> AppExit {
	// Building the plugin installs the global subscriber that prints log records
	let mut app = App::new();
	app.add_plugins(LogPlugin::default());

	let argv = std::env::args().skip(1).collect::<Vec<_>>();
	match argv.as_slice() {
		[puzzle_file] => explore_state_space(puzzle_file, ExplorerOptions::default()),
		[puzzle_file, max_depth] => match max_depth.parse() {
			Ok(max_depth) => explore_state_space(puzzle_file, ExplorerOptions { max_depth }),
			Err(e) => {
				eprintln!("Invalid max depth {max_depth:?}: {e}\n{USAGE}");
				AppExit::error()
			}
		},
		_ => {
			eprintln!("{USAGE}");
			AppExit::error()
		}
	}
}
