//! Fixture engine demo runner.
//!
//! Loads the physics configuration, builds a scene (from a JSON file or the
//! built-in default), runs a fixed number of steps and logs the player's
//! state and every contact effect.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --steps 240 --scene scene.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use fixtureengine::components::actiontask::ActionTask;
use fixtureengine::components::body::Body;
use fixtureengine::engine::Engine;
use fixtureengine::error::EngineError;
use fixtureengine::resources::physicsconfig::PhysicsConfig;
use fixtureengine::scene::SceneDescription;

/// Headless fixture engine runner
#[derive(Parser)]
#[command(version, about = "Runs a fixture engine scene for a number of fixed steps.")]
struct Cli {
    /// Physics configuration INI file.
    #[arg(long, value_name = "PATH", default_value = "./physics.ini")]
    config: PathBuf,

    /// Number of fixed steps to simulate.
    #[arg(long, default_value_t = 120)]
    steps: u32,

    /// JSON scene file. The built-in scene is used when omitted.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Write the effective configuration back to `--config` and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = PhysicsConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("Using default physics config: {}", e);
    }

    if cli.dump_config {
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Configuration written to {}", config.config_path.display());
        return;
    }

    if let Err(e) = run(config, &cli) {
        log::error!("Simulation stopped: {}", e);
        std::process::exit(1);
    }
}

fn run(config: PhysicsConfig, cli: &Cli) -> Result<(), EngineError> {
    let scene = match &cli.scene {
        Some(path) => SceneDescription::load(path)?,
        None => SceneDescription::default(),
    };

    let step = config.fixed_step;
    let mut engine = Engine::new(config);
    let handles = scene.spawn(&mut engine)?;

    for frame in 0..cli.steps {
        engine.step(step)?;

        for effect in engine.read_effects() {
            log::info!("[{frame}] {:?}", effect);
        }

        let Some(player) = handles.player else {
            continue;
        };
        let Some(body) = engine.world().get::<Body>(player) else {
            log::info!("[{frame}] player is gone");
            break;
        };
        let task = engine.world().get::<ActionTask>(player).copied();
        let senses: Vec<_> = body.senses.iter().collect();
        log::debug!(
            "[{frame}] pos=({:.3}, {:.3}) vel=({:.3}, {:.3}) task={:?} senses={:?}",
            body.position().x,
            body.position().y,
            body.velocity.x,
            body.velocity.y,
            task,
            senses
        );
    }

    log::info!(
        "Finished {} steps, {} contacts in the last one",
        cli.steps,
        engine.last_contacts().contacts.len()
    );
    Ok(())
}
