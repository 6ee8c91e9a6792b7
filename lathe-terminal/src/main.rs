/// Lathe Terminal Viewer - Revolved parametric meshes
///
/// Generates the sphere, torus and spike meshes up front and renders the
/// selected one in the terminal.
/// Controls:
///   - 1-4: Select scene
///   - M: Cycle display mode
///   - WASD / Arrow Keys: Rotate the mesh
///   - Space: Toggle auto-spin
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use lathe_terminal::{DisplayMode, Scene, SceneConfig, SceneSet, TerminalApp};

#[derive(Debug, Parser)]
#[command(name = "lathe-terminal", about = "Render revolved parametric meshes in the terminal")]
struct Args {
    /// Scene shown at startup
    #[arg(long, value_enum, default_value_t = Scene::Sphere)]
    scene: Scene,

    /// Display mode at startup
    #[arg(long, value_enum, default_value_t = DisplayMode::Shaded)]
    mode: DisplayMode,

    /// Profile and revolution steps of the high-resolution scene
    #[arg(long, default_value_t = SceneConfig::default().high_res_steps)]
    high_res_steps: u32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn main() -> Result<()> {
    // Logs go to stderr so they stay out of the alternate screen's way
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    println!("Lathe Terminal Viewer - Generating meshes...");
    let config = SceneConfig {
        high_res_steps: args.high_res_steps,
    };
    let scenes = SceneSet::build(&config).context("failed to generate scene meshes")?;

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scenes, args.scene, args.mode, args.fps)
        .context("failed to initialise terminal")?;
    app.run().context("terminal renderer failed")?;

    println!("Thank you for using the Lathe Terminal Viewer!");
    Ok(())
}
