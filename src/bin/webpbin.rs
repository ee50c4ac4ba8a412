use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use webpbin::{DecodedGif, FrameSpec, Gif2Webp, Img2Webp, ToolConfig};

#[derive(Parser, Debug)]
#[command(name = "webpbin", version)]
struct Cli {
    /// JSON tool configuration (exec_path, bin_dir, env).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing gif2webp/img2webp. Overrides the config file.
    #[arg(long, global = true)]
    bin_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a GIF to WebP with gif2webp.
    Gif(GifArgs),
    /// Assemble still frames into an animated WebP with img2webp.
    Frames(FramesArgs),
    /// Print the version reported by a tool.
    Version(VersionArgs),
}

#[derive(Parser, Debug)]
struct GifArgs {
    /// Input GIF path, or `-` for stdin.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output WebP path, or `-` for stdout.
    #[arg(long)]
    out: PathBuf,

    /// Compression factor 0..=100 (values above 100 are clamped).
    #[arg(short, long)]
    quality: Option<u32>,

    /// Crop rectangle as `x,y,width,height`.
    #[arg(long, value_parser = parse_crop)]
    crop: Option<[u32; 4]>,

    /// Let the tool pick lossy or lossless per frame.
    #[arg(long)]
    mixed: bool,

    /// Decode the GIF here and re-encode it onto the tool's stdin.
    #[arg(long)]
    decode: bool,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Frame as `path` or `path:duration_ms`, in animation order. Repeatable.
    #[arg(long = "frame", required = true, value_parser = parse_frame)]
    frames: Vec<FrameSpec>,

    /// Output WebP path, or `-` for stdout.
    #[arg(long)]
    out: PathBuf,

    /// Disable mixed lossy/lossless mode (on by default).
    #[arg(long)]
    no_mixed: bool,

    /// Loop count (0 = forever).
    #[arg(long = "loop")]
    loop_count: Option<u32>,

    /// Minimum distance between key-frames (requires --kmax).
    #[arg(long, requires = "kmax")]
    kmin: Option<u32>,

    /// Maximum distance between key-frames (requires --kmin).
    #[arg(long, requires = "kmin")]
    kmax: Option<u32>,
}

#[derive(Parser, Debug)]
struct VersionArgs {
    /// Which tool to query.
    #[arg(value_enum, default_value_t = ToolChoice::Gif2webp)]
    tool: ToolChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ToolChoice {
    Gif2webp,
    Img2webp,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.bin_dir)?;
    match cli.cmd {
        Command::Gif(args) => cmd_gif(config, args),
        Command::Frames(args) => cmd_frames(config, args),
        Command::Version(args) => cmd_version(config, args),
    }
}

fn load_config(path: Option<&Path>, bin_dir: Option<PathBuf>) -> anyhow::Result<ToolConfig> {
    let mut config = match path {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::new(),
    };
    if let Some(bin_dir) = bin_dir {
        config.bin_dir = Some(bin_dir);
    }
    Ok(config)
}

fn is_stream(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn cmd_gif(config: ToolConfig, args: GifArgs) -> anyhow::Result<()> {
    let mut stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let decoded = if args.decode {
        Some(read_gif(&args.in_path)?)
    } else {
        None
    };

    let mut tool = Gif2Webp::new(config);
    match &decoded {
        Some(gif) => tool.set_input_image(gif),
        None if is_stream(&args.in_path) => tool.set_input_stream(&mut stdin),
        None => tool.set_input_file(&args.in_path),
    };
    if is_stream(&args.out) {
        tool.set_output_stream(&mut stdout);
    } else {
        ensure_parent_dir(&args.out)?;
        tool.set_output_file(&args.out);
    }
    if let Some(quality) = args.quality {
        tool.set_quality(quality);
    }
    if let Some([x, y, width, height]) = args.crop {
        tool.set_crop(x, y, width, height);
    }
    tool.set_mixed(args.mixed);

    tool.run()?;
    if !is_stream(&args.out) {
        eprintln!("wrote {}", args.out.display());
    }
    Ok(())
}

fn cmd_frames(config: ToolConfig, args: FramesArgs) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let mut tool = Img2Webp::new(config);
    tool.set_frames(args.frames).set_mixed(!args.no_mixed);
    if let Some(loop_count) = args.loop_count {
        tool.set_loop_count(loop_count);
    }
    if let (Some(kmin), Some(kmax)) = (args.kmin, args.kmax) {
        tool.set_keyframes(kmin, kmax);
    }
    if is_stream(&args.out) {
        tool.set_output_stream(&mut stdout);
    } else {
        ensure_parent_dir(&args.out)?;
        tool.set_output_file(&args.out);
    }

    tool.run()?;
    if !is_stream(&args.out) {
        eprintln!("wrote {}", args.out.display());
    }
    Ok(())
}

fn cmd_version(config: ToolConfig, args: VersionArgs) -> anyhow::Result<()> {
    let version = match args.tool {
        ToolChoice::Gif2webp => Gif2Webp::new(config).version()?,
        ToolChoice::Img2webp => Img2Webp::new(config).version()?,
    };
    println!("{version}");
    Ok(())
}

fn read_gif(path: &Path) -> anyhow::Result<DecodedGif> {
    let gif = if is_stream(path) {
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut std::io::stdin(), &mut bytes)
            .context("read gif from stdin")?;
        DecodedGif::decode(std::io::Cursor::new(bytes))?
    } else {
        let f = File::open(path).with_context(|| format!("open gif '{}'", path.display()))?;
        DecodedGif::decode(BufReader::new(f))?
    };
    Ok(gif)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn parse_crop(s: &str) -> Result<[u32; 4], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected x,y,width,height, got '{s}'"));
    };
    let num = |v: &str| {
        v.parse::<u32>()
            .map_err(|e| format!("invalid crop value '{v}': {e}"))
    };
    Ok([num(*x)?, num(*y)?, num(*w)?, num(*h)?])
}

fn parse_frame(s: &str) -> Result<FrameSpec, String> {
    if s.is_empty() {
        return Err("frame locator must not be empty".to_string());
    }
    match s.rsplit_once(':') {
        Some((locator, ms))
            if !locator.is_empty() && !ms.is_empty() && ms.bytes().all(|b| b.is_ascii_digit()) =>
        {
            let duration_ms = ms
                .parse::<u32>()
                .map_err(|e| format!("invalid frame duration '{ms}': {e}"))?;
            Ok(FrameSpec::new(locator).with_duration_ms(duration_ms))
        }
        _ => Ok(FrameSpec::new(s)),
    }
}
