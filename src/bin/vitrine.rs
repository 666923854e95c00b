use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vitrine", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the state after one frame as a PNG.
    Frame(FrameArgs),
    /// Render a frame sequence as numbered PNGs.
    Render(RenderArgs),
    /// Write the bundled demo stage as JSON.
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input stage JSON.
    #[arg(long)]
    stage: PathBuf,

    /// Optional input script JSON, events scheduled by frame.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Font file for the title; overrides the stage's `font_source`.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Frame index (0-based). The session ticks through this frame.
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input stage JSON.
    #[arg(long)]
    stage: PathBuf,

    /// Optional input script JSON, events scheduled by frame.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Font file for the title; overrides the stage's `font_source`.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Number of frames to render, starting at frame 0.
    #[arg(long)]
    frames: u64,

    /// Output directory; frames land as `frame_00000.png` onward.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output stage JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn read_stage_json(path: &Path) -> anyhow::Result<vitrine::Stage> {
    let f = File::open(path).with_context(|| format!("open stage '{}'", path.display()))?;
    let r = BufReader::new(f);
    let stage: vitrine::Stage = serde_json::from_reader(r).with_context(|| "parse stage JSON")?;
    Ok(stage)
}

fn read_script_json(path: &Path) -> anyhow::Result<vitrine::InputScript> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let r = BufReader::new(f);
    let script: vitrine::InputScript =
        serde_json::from_reader(r).with_context(|| "parse script JSON")?;
    script.validate()?;
    Ok(script)
}

/// An explicit `--font` wins; otherwise the stage's `font_source` resolves
/// relative to the stage file. No font at all is valid: the title dissolve
/// then takes its particle-free fallback path.
fn resolve_font_bytes(
    stage: &vitrine::Stage,
    stage_path: &Path,
    font_arg: Option<&Path>,
) -> anyhow::Result<Option<Vec<u8>>> {
    let path = match font_arg {
        Some(p) => Some(p.to_path_buf()),
        None => stage.title.font_source.as_ref().map(|source| {
            let dir = stage_path.parent().unwrap_or_else(|| Path::new("."));
            dir.join(source)
        }),
    };
    match path {
        Some(p) => {
            let bytes =
                std::fs::read(&p).with_context(|| format!("read font '{}'", p.display()))?;
            Ok(Some(bytes))
        }
        None => Ok(None),
    }
}

fn make_director(
    stage_path: &Path,
    font_arg: Option<&Path>,
) -> anyhow::Result<vitrine::Director> {
    let stage = read_stage_json(stage_path)?;
    let font_bytes = resolve_font_bytes(&stage, stage_path, font_arg)?;
    Ok(vitrine::Director::new(stage, font_bytes)?)
}

fn save_png(frame: &mut vitrine::FramePixels, out: &Path) -> anyhow::Result<()> {
    frame.unpremultiply_in_place();
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut director = make_director(&args.stage, args.font.as_deref())?;
    let script = args.script.as_deref().map(read_script_json).transpose()?;

    for _ in 0..=args.frame {
        match &script {
            Some(script) => director.tick_scripted(script)?,
            None => director.tick(&[])?,
        }
    }

    let mut frame = vitrine::render_frame(&mut director)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    save_png(&mut frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut director = make_director(&args.stage, args.font.as_deref())?;
    let script = args.script.as_deref().map(read_script_json).transpose()?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for i in 0..args.frames {
        match &script {
            Some(script) => director.tick_scripted(script)?,
            None => director.tick(&[])?,
        }
        let mut frame = vitrine::render_frame(&mut director)?;
        let out = args.out_dir.join(format!("frame_{i:05}.png"));
        save_png(&mut frame, &out)?;
    }

    eprintln!(
        "wrote {} frames to {}",
        args.frames,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let stage = vitrine::Stage::demo();
    let json = serde_json::to_string_pretty(&stage).context("serialize demo stage")?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, json)
        .with_context(|| format!("write stage '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
