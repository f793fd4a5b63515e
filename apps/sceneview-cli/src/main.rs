use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use sceneview_assets::{load_font, load_obj, load_texture};
use sceneview_common::{AssetId, Shape, ViewerConfig};
use sceneview_input::Input;
use sceneview_render::{DebugTextRenderer, Renderer};
use sceneview_scene::{FrameReport, Scene, ViewerState};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sceneview-cli", about = "Headless tool for the scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML file overriding the default viewer configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Asset root directory (overrides the config)
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the panel layout
    Info,
    /// Load every configured asset and report what fails
    CheckAssets,
    /// Run the frame update with scripted input and print the last frame
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct SimulateArgs {
    /// Number of frames to run
    #[arg(short, long, default_value = "1")]
    frames: u32,
    /// Keys held for every frame, e.g. "wd"
    #[arg(short, long, default_value = "")]
    keys: String,
    /// Wheel delta fed on every frame
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    wheel: f32,
    /// Mouse motion "dx,dy" per frame with the left button held over the viewport
    #[arg(short, long, value_parser = parse_drag, allow_hyphen_values = true)]
    drag: Option<Vec2>,
    /// Shade objects with the point light
    #[arg(long)]
    lit: bool,
}

fn parse_drag(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"dx,dy\", got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad dx: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad dy: {e}"))?;
    Ok(Vec2::new(x, y))
}

/// Drive `Scene::update` for `args.frames` frames of scripted input.
fn simulate(config: &ViewerConfig, args: &SimulateArgs) -> (Scene, ViewerState, Vec<FrameReport>) {
    // Textures are irrelevant without a GPU; every object gets the same id.
    let mut scene = Scene::from_config(config, |_| AssetId(0));
    let mut state = ViewerState {
        is_lit: args.lit,
        ..ViewerState::default()
    };
    let mut input = Input::new();
    for key in args.keys.chars() {
        input.key_pressed(key);
    }
    let viewport = scene.camera.viewport();
    input.cursor_moved(
        (viewport.x + viewport.width / 2) as f32,
        (viewport.y + viewport.height / 2) as f32,
    );
    input.left_button(args.drag.is_some());

    let mut reports = Vec::with_capacity(args.frames as usize);
    for frame in 0..args.frames {
        if args.wheel != 0.0 {
            input.wheel(args.wheel);
        }
        if let Some(delta) = args.drag {
            input.mouse_motion(delta.x, delta.y);
        }
        let report = scene.update(&input.snapshot(), &mut state);
        tracing::debug!(frame, ?report, "frame");
        reports.push(report);
    }
    (scene, state, reports)
}

fn check_assets(config: &ViewerConfig) -> usize {
    let assets = &config.assets;
    let mut failures = 0;
    let mut report = |kind: &str, path: &str, result: Result<String, String>| match result {
        Ok(detail) => println!("  ok    {kind:<8} {path} ({detail})"),
        Err(e) => {
            failures += 1;
            println!("  FAIL  {kind:<8} {path}: {e}");
        }
    };

    let mut textures: Vec<&str> = config.objects.iter().map(|o| o.texture.as_str()).collect();
    textures.extend(assets.swap_textures.iter().map(String::as_str));
    textures.sort_unstable();
    textures.dedup();
    for path in textures {
        let result = load_texture(assets.resolve(path))
            .map(|t| format!("{}x{}", t.width, t.height))
            .map_err(|e| e.to_string());
        report("texture", path, result);
    }

    for object in &config.objects {
        if let Shape::Model { path } = &object.shape {
            let result = load_obj(assets.resolve(path))
                .map(|m| format!("{} vertices, {} triangles", m.vertex_count(), m.triangle_count()))
                .map_err(|e| e.to_string());
            report("model", path, result);
        }
    }

    let result = load_font(assets.resolve(&assets.font))
        .map(|bytes| format!("{} bytes", bytes.len()))
        .map_err(|e| e.to_string());
    report("font", &assets.font, result);

    for path in [&assets.default_shader, &assets.lit_shader] {
        let detail = if assets.resolve(path).exists() {
            "override"
        } else {
            "built-in"
        };
        report("shader", path, Ok(detail.to_owned()));
    }

    failures
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(root) = cli.assets {
        config.assets.root = root;
    }

    match cli.command {
        Commands::Info => {
            let layout = config.layout();
            println!("sceneview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "window: {} {}x{}",
                config.window.title, config.window.width, config.window.height
            );
            for (name, r) in [
                ("viewport", layout.viewport),
                ("console", layout.console),
                ("properties", layout.properties),
            ] {
                println!("{name:<11} {}x{} at ({}, {})", r.width, r.height, r.x, r.y);
            }
            println!("asset root: {}", config.assets.root.display());
            println!("objects: {}", config.objects.len());
        }
        Commands::CheckAssets => {
            println!("checking assets under {}", config.assets.root.display());
            let failures = check_assets(&config);
            if failures > 0 {
                anyhow::bail!("{failures} asset(s) failed to load");
            }
            println!("all assets loaded");
        }
        Commands::Simulate(args) => {
            let (scene, state, reports) = simulate(&config, &args);
            let dragged = reports.iter().filter(|r| r.grid_dragged).count();
            let lights = reports.iter().filter(|r| r.light_move.is_some()).count();
            println!(
                "{} frames: {dragged} grid drags, {lights} light moves",
                reports.len()
            );
            print!("{}", DebugTextRenderer::new().render(&scene, &state));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use sceneview_input::CameraDolly;

    #[test]
    fn drag_argument_parses() {
        assert_eq!(parse_drag("5,0").unwrap(), Vec2::new(5.0, 0.0));
        assert_eq!(parse_drag(" -1.5 , 2 ").unwrap(), Vec2::new(-1.5, 2.0));
        assert!(parse_drag("5").is_err());
        assert!(parse_drag("a,b").is_err());
    }

    #[test]
    fn negative_wheel_and_drag_parse_from_the_command_line() {
        let cli = Cli::try_parse_from([
            "sceneview-cli",
            "simulate",
            "--wheel",
            "-1",
            "--drag",
            "-5,0",
        ])
        .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("expected the simulate subcommand");
        };
        assert_eq!(args.wheel, -1.0);
        assert_eq!(args.drag, Some(Vec2::new(-5.0, 0.0)));

        let cli = Cli::try_parse_from(["sceneview-cli", "simulate", "-w", "-2.5", "-d", "-1,-3"]).unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("expected the simulate subcommand");
        };
        assert_eq!(args.wheel, -2.5);
        assert_eq!(args.drag, Some(Vec2::new(-1.0, -3.0)));
    }

    #[test]
    fn negative_wheel_dollies_backward() {
        let config = ViewerConfig::default();
        let start = Scene::from_config(&config, |_| AssetId(0)).camera.position;
        let args = SimulateArgs {
            wheel: -1.0,
            ..SimulateArgs::default()
        };
        let (scene, _, reports) = simulate(&config, &args);
        assert_eq!(reports[0].dolly, Some(CameraDolly::Backward));
        assert_ne!(scene.camera.position, start);
    }

    #[test]
    fn simulated_drag_accumulates_on_the_grid() {
        let args = SimulateArgs {
            frames: 3,
            drag: Some(Vec2::new(5.0, 0.0)),
            ..SimulateArgs::default()
        };
        let (scene, _, reports) = simulate(&ViewerConfig::default(), &args);
        assert!(reports.iter().all(|r| r.grid_dragged));
        assert_eq!(scene.grid.transform().rotation, Vec3::new(15.0, 0.0, 0.0));
    }

    #[test]
    fn simulated_keys_follow_priority() {
        let args = SimulateArgs {
            frames: 2,
            keys: "dw".into(),
            ..SimulateArgs::default()
        };
        let config = ViewerConfig::default();
        let start = Scene::from_config(&config, |_| AssetId(0)).light.position();
        let (scene, _, _) = simulate(&config, &args);
        assert_eq!(scene.light.position() - start, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn lit_flag_reaches_the_state() {
        let args = SimulateArgs {
            lit: true,
            ..SimulateArgs::default()
        };
        let (scene, state, _) = simulate(&ViewerConfig::default(), &args);
        assert!(state.is_lit);
        assert!(state.running);
        let text = DebugTextRenderer::new().render(&scene, &state);
        assert!(text.contains("Lit"));
    }
}
