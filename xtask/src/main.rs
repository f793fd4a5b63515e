use anyhow::Result;
use clap::{Parser, Subcommand};
use sceneview_common::{AssetConfig, ViewerConfig};
use std::path::PathBuf;
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for sceneview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Verify the default asset files exist under an asset root
    Assets {
        #[arg(long, default_value = "assets")]
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            doc()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Doc => doc()?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Assets { root } => assets(root)?,
    }

    Ok(())
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt check", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("tests", &["test", "--workspace"])
}

fn doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}

/// Files the viewer expects at startup. Shaders are optional overrides and
/// are only reported.
fn assets(root: PathBuf) -> Result<()> {
    let config = ViewerConfig {
        assets: AssetConfig {
            root,
            ..AssetConfig::default()
        },
        ..ViewerConfig::default()
    };
    let assets = &config.assets;

    let mut required: Vec<&str> = config.objects.iter().map(|o| o.texture.as_str()).collect();
    required.extend(assets.swap_textures.iter().map(String::as_str));
    required.push(&assets.font);
    required.sort_unstable();
    required.dedup();

    let missing: Vec<&str> = required
        .into_iter()
        .filter(|path| !assets.resolve(path).is_file())
        .collect();
    for path in [&assets.default_shader, &assets.lit_shader] {
        if !assets.resolve(path).is_file() {
            println!("note: {path} not present, built-in shader will be used");
        }
    }
    if !missing.is_empty() {
        anyhow::bail!(
            "missing under {}: {}",
            assets.root.display(),
            missing.join(", ")
        );
    }
    println!("==> all default assets present under {}", assets.root.display());
    Ok(())
}
