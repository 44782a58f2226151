use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

#[derive(Parser, Debug)]
#[command(name = "promoreel", version, about = "Assemble narrated promo videos")]
struct Cli {
    /// Engine config JSON. Environment overrides still apply.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for random music selection.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List background music tracks in the configured music directory.
    Tracks,
    /// Render a zooming slideshow timed to a voiceover (requires `ffmpeg` on PATH).
    Slideshow(SlideshowArgs),
    /// Loop a motion clip to a voiceover's length (requires `ffmpeg` on PATH).
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Voiceover audio file.
    #[arg(long)]
    voice: PathBuf,

    /// `no music`, `random`, or an exact track file name.
    #[arg(long, default_value = "random")]
    music: String,

    /// Output file name, written under the configured output directory.
    #[arg(long)]
    out: String,
}

#[derive(Args, Debug)]
struct SlideshowArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Scene images in playback order.
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct MergeArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Base motion clip.
    #[arg(long)]
    clip: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = promoreel::EngineConfig::load(cli.config.as_deref())
        .context("load engine configuration")?;
    init_logging(&config.log_level);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.cmd {
        Command::Tracks => cmd_tracks(&config),
        Command::Slideshow(args) => cmd_slideshow(&config, args, &mut rng),
        Command::Merge(args) => cmd_merge(&config, args, &mut rng),
    }
}

fn init_logging(default_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn cmd_tracks(config: &promoreel::EngineConfig) -> anyhow::Result<()> {
    let tracks = promoreel::list_tracks(&config.music_dir);
    if tracks.is_empty() {
        eprintln!("no tracks in {}", config.music_dir.display());
    }
    for track in tracks {
        println!("{}", track.name);
    }
    Ok(())
}

fn cmd_slideshow(
    config: &promoreel::EngineConfig,
    args: SlideshowArgs,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    let request = promoreel::SlideshowRequest {
        voice_path: args.common.voice,
        images: args.images,
        music: parse_choice(&args.common.music),
        output_name: args.common.out,
    };
    let out = promoreel::render_slideshow(config, &request, rng)
        .with_context(|| format!("render slideshow '{}'", request.output_name))?;
    report(&out);
    Ok(())
}

fn cmd_merge(
    config: &promoreel::EngineConfig,
    args: MergeArgs,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    let request = promoreel::MotionRequest {
        voice_path: args.common.voice,
        clip_path: args.clip,
        music: parse_choice(&args.common.music),
        output_name: args.common.out,
    };
    let out = promoreel::render_motion(config, &request, rng)
        .with_context(|| format!("merge clip '{}'", request.clip_path.display()))?;
    report(&out);
    Ok(())
}

fn parse_choice(raw: &str) -> promoreel::MusicChoice {
    match raw.parse() {
        Ok(choice) => choice,
        Err(never) => match never {},
    }
}

fn report(out: &promoreel::RenderOutput) {
    eprintln!(
        "wrote {} ({}, {}/{}, {:.2}s, {} frames)",
        out.path.display(),
        out.container,
        out.video_codec,
        out.audio_codec,
        out.duration_sec,
        out.frames
    );
    println!("{}", out.path.display());
}
