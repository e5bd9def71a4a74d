use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use gifatlas::{
    AtlasOptions, EffectParameters, FrameSequence, ProgressCallback, ProgressInfo, RasterFormat,
    ScriptFormat, TRANSPARENT, export, naming, script,
};
use image::Rgba;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

#[cfg(feature = "gif")]
use gifatlas::GifOptions;

const CLI_AFTER_HELP: &str = "Examples:\n  gifatlas info dance.gif --json\n  gifatlas atlas dance.gif --out textures --width 1024 --height 1024 --borderless --progress\n  gifatlas script dance.gif --out dance.lsl\n  gifatlas preview dance.gif --frame 3 --out frame3.png --grayscale\n  gifatlas completions zsh > _gifatlas";

#[derive(Debug, Parser)]
#[command(
    name = "gifatlas",
    version,
    about = "Turn animated GIFs into texture atlases and animation scripts",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar where supported.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,
}

/// Effect toggles shared by every rendering command. A flag that is absent
/// leaves its effect disabled.
#[derive(Debug, Args, Clone, Default)]
struct EffectArgs {
    /// Convert to grayscale.
    #[arg(long)]
    grayscale: bool,
    /// Sharpen by the given amount (0.0 - 10.0, 1.0 = unchanged).
    #[arg(long, value_name = "AMOUNT")]
    sharpen: Option<f32>,
    /// Gaussian blur with the given radius in pixels (0.0 - 10.0).
    #[arg(long, value_name = "RADIUS")]
    blur: Option<f32>,
    /// Multiply alpha by the given factor (0.0 - 1.0).
    #[arg(long, value_name = "FACTOR")]
    transparency: Option<f32>,
    /// Color intensity (0.0 - 1.0, 0.5 = unchanged).
    #[arg(long, value_name = "LEVEL")]
    color_intensity: Option<f32>,
}

impl EffectArgs {
    fn to_parameters(&self) -> Result<EffectParameters, Box<dyn std::error::Error>> {
        let mut params = EffectParameters::new().with_grayscale(self.grayscale);
        if let Some(amount) = self.sharpen {
            params = params.with_sharpen(amount);
        }
        if let Some(radius) = self.blur {
            params = params.with_blur(radius);
        }
        if let Some(factor) = self.transparency {
            params = params.with_transparency(factor);
        }
        if let Some(level) = self.color_intensity {
            params = params.with_color_intensity(level);
        }
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print frame count, grid, and texture name for an animation.
    #[command(
        about = "Print animation info",
        after_help = "Examples:\n  gifatlas info dance.gif\n  gifatlas info dance.gif --json"
    )]
    Info {
        /// Input GIF path.
        input: PathBuf,

        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compose all frames into one texture atlas.
    #[command(
        about = "Build a texture atlas",
        after_help = "Examples:\n  gifatlas atlas dance.gif --out textures\n  gifatlas atlas dance.gif --out sheet.jpg --width 1024 --height 512 --background ffffffff"
    )]
    Atlas {
        /// Input GIF path.
        input: PathBuf,
        /// Output file, or a directory to save under the conventional texture name.
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Canvas width in pixels (non-positive = 2048).
        #[arg(long, default_value_t = 2048, allow_negative_numbers = true)]
        width: i64,
        /// Canvas height in pixels (non-positive = 2048).
        #[arg(long, default_value_t = 2048, allow_negative_numbers = true)]
        height: i64,
        /// Crop fully transparent margins.
        #[arg(long)]
        borderless: bool,
        /// Background color as RRGGBB or RRGGBBAA hex, or "transparent".
        #[arg(long, default_value = "transparent")]
        background: String,
        /// Image format when saving into a directory (png, jpg, bmp).
        #[arg(long, default_value = "png")]
        format: String,
        /// Playback speed encoded into the texture name.
        #[arg(long, default_value_t = naming::DEFAULT_SPEED)]
        speed: f64,
        /// Append a copy of this frame before composing (repeatable).
        #[arg(long, value_name = "INDEX")]
        duplicate: Vec<usize>,
        /// Refuse to grow the sequence beyond this many frames.
        #[arg(long)]
        max_frames: Option<usize>,
        #[command(flatten)]
        effects: EffectArgs,
    },

    /// Write the in-world animation script.
    #[command(
        about = "Export the animation script",
        after_help = "Examples:\n  gifatlas script dance.gif\n  gifatlas script dance.gif --out dance.txt"
    )]
    Script {
        /// Input GIF path.
        input: PathBuf,
        /// Output file (.lsl or .txt). Defaults to `<name>.lsl`.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Render one frame with the preview effects.
    #[command(
        about = "Render a single frame",
        after_help = "Examples:\n  gifatlas preview dance.gif --frame 0 --out first.png --blur 2"
    )]
    Preview {
        /// Input GIF path.
        input: PathBuf,
        /// Output image path.
        #[arg(long)]
        out: PathBuf,
        /// Frame index.
        #[arg(long, default_value_t = 0)]
        frame: usize,
        /// Preview width (0 = 256).
        #[arg(long, default_value_t = 0)]
        width: u32,
        /// Preview height (0 = 256).
        #[arg(long, default_value_t = 0)]
        height: u32,
        #[command(flatten)]
        effects: EffectArgs,
    },

    #[cfg(feature = "gif")]
    /// Re-encode the animation with effects applied.
    #[command(about = "Export an animated GIF")]
    Gif {
        /// Input GIF path.
        input: PathBuf,
        /// Output GIF path.
        #[arg(long)]
        out: PathBuf,
        /// Output width (defaults to the source width).
        #[arg(long)]
        width: Option<u32>,
        /// Output height (defaults to the source height).
        #[arg(long)]
        height: Option<u32>,
        #[command(flatten)]
        effects: EffectArgs,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim().trim_start_matches('#');
    if value.eq_ignore_ascii_case("transparent") {
        return Some(TRANSPARENT);
    }
    if !value.is_ascii() || (value.len() != 6 && value.len() != 8) {
        return None;
    }

    let channel = |index: usize| u8::from_str_radix(&value[index * 2..index * 2 + 2], 16).ok();
    let alpha = if value.len() == 8 { channel(3)? } else { 255 };
    Some(Rgba([channel(0)?, channel(1)?, channel(2)?, alpha]))
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if info.total == Some(info.current) {
            self.bar.finish_with_message("done");
        }
    }
}

fn progress_callback(
    global: &GlobalOptions,
) -> Result<Option<Arc<dyn ProgressCallback>>, Box<dyn std::error::Error>> {
    if global.progress {
        Ok(Some(Arc::new(TerminalProgress::new()?)))
    } else {
        Ok(None)
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, json } => {
            let frames = FrameSequence::open(&input)?;
            let grid = frames.grid()?;
            let first = frames.get(0)?;
            let texture_name = naming::texture_file_name(
                frames.base_name(),
                grid,
                naming::DEFAULT_SPEED,
                RasterFormat::Png.extension(),
            );
            if json {
                let payload = json!({
                    "name": frames.base_name(),
                    "frame_count": frames.len(),
                    "width": first.width(),
                    "height": first.height(),
                    "frame_delay_ms": frames.frame_delay().as_millis() as u64,
                    "columns": grid.columns,
                    "rows": grid.rows,
                    "texture_name": texture_name,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Name: {}", frames.base_name());
                println!(
                    "Frames: {} ({}x{}, {:?} per frame)",
                    frames.len(),
                    first.width(),
                    first.height(),
                    frames.frame_delay()
                );
                println!("Grid: {}x{}", grid.columns, grid.rows);
                println!("Texture: {texture_name}");
            }
        }
        Commands::Atlas {
            input,
            out,
            width,
            height,
            borderless,
            background,
            format,
            speed,
            duplicate,
            max_frames,
            effects,
        } => {
            let background = parse_color(&background)
                .ok_or(format!("unsupported --background: {background}"))?;
            let mut frames = FrameSequence::open(&input)?;

            for index in duplicate {
                let added = match max_frames {
                    Some(capacity) => frames.push_duplicate_within(index, capacity)?,
                    None => frames.push_duplicate(index)?,
                };
                if cli.global.verbose {
                    eprintln!("duplicated frame {index} as frame {added}");
                }
            }

            let mut options = AtlasOptions::new()
                .with_canvas_size(width, height)
                .with_background(background)
                .with_borderless(borderless)
                .with_effects(effects.to_parameters()?);
            if let Some(callback) = progress_callback(&cli.global)? {
                options = options.with_progress(callback);
            }

            let atlas = gifatlas::compose(&frames, &options)?;
            if cli.global.verbose {
                let (atlas_width, atlas_height) = atlas.dimensions();
                eprintln!(
                    "{}x{} grid, tile {}x{}, atlas {atlas_width}x{atlas_height}",
                    atlas.grid.columns, atlas.grid.rows, atlas.tile_width, atlas.tile_height
                );
            }

            let grid = atlas.grid;
            let image = atlas.into_image();
            let path = if out.is_dir() {
                let format = RasterFormat::from_extension(&format)
                    .ok_or(format!("unsupported --format: {format}"))?;
                let path = out.join(naming::texture_file_name(
                    frames.base_name(),
                    grid,
                    speed,
                    format.extension(),
                ));
                ensure_writable_path(&path, cli.global.overwrite)?;
                export::save_texture(&image, &path, format)?;
                path
            } else {
                ensure_writable_path(&out, cli.global.overwrite)?;
                export::save_texture(&image, &out, RasterFormat::from_path(&out))?;
                out
            };

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Composed {} frame(s) into {}", frames.len(), path.display()).green()
            );
        }
        Commands::Script { input, out } => {
            let frames = FrameSequence::open(&input)?;
            let text = script::emit_for_frames(&frames, naming::DEFAULT_SPEED)?;
            let out = out.unwrap_or_else(|| {
                PathBuf::from(script::script_file_name(
                    frames.base_name(),
                    ScriptFormat::Lsl,
                ))
            });
            ensure_writable_path(&out, cli.global.overwrite)?;
            script::write_script(&out, &text)?;
            println!("{} {}", "saved".green().bold(), out.display());
        }
        Commands::Preview {
            input,
            out,
            frame,
            width,
            height,
            effects,
        } => {
            let frames = FrameSequence::open(&input)?;
            let image =
                gifatlas::render_preview(&frames, frame, width, height, &effects.to_parameters()?)?;
            ensure_writable_path(&out, cli.global.overwrite)?;
            export::save_texture(&image, &out, RasterFormat::from_path(&out))?;
            println!("{} {}", "saved".green().bold(), out.display());
        }
        #[cfg(feature = "gif")]
        Commands::Gif {
            input,
            out,
            width,
            height,
            effects,
        } => {
            let frames = FrameSequence::open(&input)?;
            let mut options = GifOptions::new()
                .frame_delay_duration(frames.frame_delay())
                .effects(effects.to_parameters()?);
            options.width = width;
            options.height = height;
            if let Some(callback) = progress_callback(&cli.global)? {
                options = options.progress(callback);
            }
            ensure_writable_path(&out, cli.global.overwrite)?;
            gifatlas::gif::export_gif(&out, &frames, &options)?;
            println!("{} {}", "saved".green().bold(), out.display());
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "gifatlas", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::{EffectArgs, parse_color};

    #[test]
    fn parse_color_forms() {
        assert_eq!(parse_color("transparent"), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(parse_color("ff0000"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_color("#00ff0080"), Some(Rgba([0, 255, 0, 128])));
        assert!(parse_color("red").is_none());
        assert!(parse_color("12345").is_none());
        assert!(parse_color("zzzzzz").is_none());
    }

    #[test]
    fn effect_args_only_enable_given_flags() {
        let args = EffectArgs {
            blur: Some(2.0),
            ..EffectArgs::default()
        };
        let params = args.to_parameters().unwrap();
        assert!(params.blur);
        assert_eq!(params.blur_radius, 2.0);
        assert!(!params.sharpen);
        assert!(!params.grayscale);
    }

    #[test]
    fn effect_args_reject_out_of_range() {
        let args = EffectArgs {
            transparency: Some(1.5),
            ..EffectArgs::default()
        };
        assert!(args.to_parameters().is_err());
    }
}
