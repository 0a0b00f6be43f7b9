//! Command-line interface implementation

use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::composite::TextureSpec;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, LoadedConfig};
use crate::loader::{
    CompositeLoader, FlatLoader, Loader, PatchLoader, RawLoader, RowMajorLoader, TextureLoader,
};
use crate::output::{generate_output_path, save_png, scale_image, texture_to_image};
use crate::palette::Palette;
use crate::patch::PatchInfo;
use crate::resource::{fetch, DirectoryAccessor, ResourceLookup};
use crate::texture::Texture;
use crate::translation::TranslationTable;
use crate::warning::Warning;

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// lumptex - Decode legacy patch, flat and composite textures to PNG
#[derive(Parser)]
#[command(name = "lumptex")]
#[command(about = "Decode legacy patch, flat and composite textures to PNG")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How a single resource is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Column-oriented patch with header and post runs
    Patch,
    /// Headerless square flat, size inferred from length
    Flat,
    /// 320x200 fullscreen image
    Raw,
    /// Headerless row-major image of explicit size
    RowMajor,
}

/// Options shared by every command that writes images
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Path to lumptex.toml (default: search upward from the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory of raw resource files
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Palette resource name (PLAYPAL layout); grayscale if omitted
    #[arg(long)]
    pub palette: Option<String>,

    /// 256-byte translation table resource applied while decoding
    #[arg(long)]
    pub translation: Option<String>,

    /// Scale output by integer factor (1-16)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub scale: Option<u8>,

    /// Keep the mask color opaque instead of writing it transparent
    #[arg(long)]
    pub opaque: bool,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a single resource to PNG
    Render {
        /// Resource name (file stem, case-insensitive)
        name: String,

        /// Resource layout
        #[arg(short, long, value_enum, default_value = "patch")]
        format: Format,

        /// Width for row-major resources
        #[arg(long, required_if_eq("format", "row-major"))]
        width: Option<u16>,

        /// Height for row-major resources
        #[arg(long, required_if_eq("format", "row-major"))]
        height: Option<u16>,

        /// Output file or directory (ends with /)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Compose textures defined in lumptex.toml
    Composite {
        /// Only render the texture with this name (default: all)
        name: Option<String>,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Report header and structure of a patch resource
    Inspect {
        /// Resource name
        name: String,

        /// Directory of raw resource files
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Path to lumptex.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            name,
            format,
            width,
            height,
            output,
            common,
        } => run_render(&name, format, width, height, output.as_deref(), &common),
        Commands::Composite { name, out, common } => run_composite(name.as_deref(), out, &common),
        Commands::Inspect {
            name,
            dir,
            config,
            json,
        } => run_inspect(&name, dir, config.as_deref(), json),
    }
}

/// Everything a command needs once arguments and config are resolved
struct Session {
    config: LoadedConfig,
    accessor: DirectoryAccessor,
    palette: Palette,
    translation: Option<TranslationTable>,
}

impl Session {
    fn open(common: &CommonArgs, out: Option<PathBuf>) -> Result<Self, String> {
        let mut config = load_config(common.config.as_deref()).map_err(|e| e.to_string())?;

        let overrides = CliOverrides {
            dir: common.dir.clone(),
            out,
            scale: common.scale,
            palette: common.palette.clone(),
            transparent: common.opaque.then_some(false),
        };
        merge_cli_overrides(&mut config.config, &overrides);

        let accessor = open_accessor(&config)?;

        let palette = match &config.config.output.palette {
            Some(name) => {
                let id = accessor
                    .find(name)
                    .ok_or_else(|| format!("palette '{}' not found", name))?;
                Palette::from_bytes(&fetch(&accessor, id))
                    .map_err(|e| format!("palette '{}': {}", name, e))?
            }
            None => Palette::grayscale(),
        };

        let translation = match &common.translation {
            Some(name) => {
                let id = accessor
                    .find(name)
                    .ok_or_else(|| format!("translation '{}' not found", name))?;
                let table = TranslationTable::from_bytes(&fetch(&accessor, id))
                    .map_err(|e| format!("translation '{}': {}", name, e))?;
                Some(table)
            }
            None => None,
        };

        Ok(Self {
            config,
            accessor,
            palette,
            translation,
        })
    }

    /// Convert, scale and save one decoded texture.
    fn save(&self, texture: &Texture, path: &Path) -> Result<(), String> {
        let output = &self.config.config.output;
        let image = texture_to_image(texture, &self.palette, output.transparent);
        let image = scale_image(image, output.scale);
        save_png(&image, path).map_err(|e| format!("Failed to save '{}': {}", path.display(), e))
    }
}

fn open_accessor(config: &LoadedConfig) -> Result<DirectoryAccessor, String> {
    DirectoryAccessor::open(&config.resource_dir()).map_err(|e| e.to_string())
}

/// Print warnings; in strict mode report them as errors and return false.
fn report_warnings(context: &str, warnings: &[Warning], strict: bool) -> bool {
    let label = if strict { "Error" } else { "Warning" };
    for warning in warnings {
        eprintln!("{}: {}: {}", label, context, warning);
    }
    !(strict && !warnings.is_empty())
}

/// Execute the render command
fn run_render(
    name: &str,
    format: Format,
    width: Option<u16>,
    height: Option<u16>,
    output: Option<&Path>,
    common: &CommonArgs,
) -> ExitCode {
    let session = match Session::open(common, None) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let Some(id) = session.accessor.find(name) else {
        eprintln!("Error: resource '{}' not found in '{}'", name, session.accessor.root().display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    };

    let accessor = &session.accessor;
    let loader: Loader = match format {
        Format::Patch => PatchLoader::new(accessor, id).into(),
        Format::Flat => FlatLoader::new(accessor, id).into(),
        Format::Raw => RawLoader::new(accessor, id).into(),
        Format::RowMajor => {
            RowMajorLoader::new(accessor, id, width.unwrap_or(0), height.unwrap_or(0)).into()
        }
    };
    let loader = match &session.translation {
        Some(table) => loader.with_translation(table),
        None => loader,
    };

    let (texture, warnings) = loader.decode();
    if !report_warnings(name, &warnings, common.strict) {
        return ExitCode::from(EXIT_ERROR);
    }

    let path = generate_output_path(&session.config.output_dir(), name, output);
    if let Err(e) = session.save(&texture, &path) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", path.display());
    ExitCode::from(EXIT_SUCCESS)
}

/// Decode one composite texture and save it, returning its warnings.
fn render_composite(
    session: &Session,
    name: &str,
    spec: &TextureSpec,
) -> Result<(PathBuf, Vec<Warning>), String> {
    let (definition, mut warnings) = spec.resolve(&session.accessor);

    let loader = CompositeLoader::new(&session.accessor, &definition);
    let loader = match &session.translation {
        Some(table) => loader.with_translation(table),
        None => loader,
    };
    let (texture, load_warnings) = loader.decode();
    warnings.extend(load_warnings);

    let path = generate_output_path(&session.config.output_dir(), name, None);
    session.save(&texture, &path)?;
    Ok((path, warnings))
}

/// Execute the composite command
fn run_composite(name: Option<&str>, out: Option<PathBuf>, common: &CommonArgs) -> ExitCode {
    let session = match Session::open(common, out) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut textures: Vec<(&String, &TextureSpec)> = session.config.config.textures.iter().collect();
    if let Some(filter) = name {
        textures.retain(|(n, _)| n.eq_ignore_ascii_case(filter));
        if textures.is_empty() {
            eprintln!("Error: No texture named '{}' in config", filter);
            return ExitCode::from(EXIT_ERROR);
        }
    }
    if textures.is_empty() {
        eprintln!("Error: No textures defined in config");
        return ExitCode::from(EXIT_ERROR);
    }

    // Each texture decodes into its own buffer; only the accessor is shared.
    let results: Vec<_> = textures
        .par_iter()
        .map(|(name, spec)| (*name, render_composite(&session, name, spec)))
        .collect();

    let mut failed = false;
    for (name, result) in results {
        match result {
            Ok((path, warnings)) => {
                if !report_warnings(name, &warnings, common.strict) {
                    failed = true;
                }
                println!("Saved: {}", path.display());
            }
            Err(e) => {
                eprintln!("Error: {}: {}", name, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

/// Execute the inspect command
fn run_inspect(name: &str, dir: Option<PathBuf>, config: Option<&Path>, json: bool) -> ExitCode {
    let mut loaded = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let overrides = CliOverrides {
        dir,
        ..Default::default()
    };
    merge_cli_overrides(&mut loaded.config, &overrides);

    let accessor = match open_accessor(&loaded) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let Some(id) = accessor.find(name) else {
        eprintln!("Error: resource '{}' not found in '{}'", name, accessor.root().display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    };

    let info = PatchInfo::from_bytes(&fetch(&accessor, id));

    if json {
        match serde_json::to_string_pretty(&info) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("{} ({} bytes)", name, info.size);
        match info.header {
            Some(h) => {
                println!("  size:    {}x{}", h.width, h.height);
                println!("  offset:  {},{}", h.left_offset, h.top_offset);
            }
            None => println!("  no patch header"),
        }
        println!("  valid:   {}", if info.valid { "yes" } else { "no" });
        if info.valid {
            println!("  posts:   {}", info.posts);
            println!("  truncated columns: {}", info.truncated_columns);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
