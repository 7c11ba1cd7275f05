// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use voicevtt::annotation;
use voicevtt::app_config::{self, Config};
use voicevtt::file_utils::FileManager;
use voicevtt::renderer;
use voicevtt::segmentation::{DisplayReflow, DurationSegmenter, SentenceSegmenter};
use voicevtt::validation::{TimecodeValidator, check_subtitles_times_equivalency};

/// Suffixes of files this tool writes, skipped when scanning directories
const GENERATED_SUFFIXES: [&str; 3] = [".sentences", ".display", ".styled"];

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-segment subtitles into one sentence per cue
    Sentences {
        /// Input subtitle file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output file (single input only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Voice for cues without a voice tag
        #[arg(long)]
        speaker: Option<String>,
    },

    /// Re-flow sentence cues into display cues
    Reflow {
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Longest plain-text cue left whole
        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Cut subtitles into HLS segments with a playlist
    Segment {
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output directory (defaults to <name>_hls next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target segment length in seconds
        #[arg(long)]
        segment_length: Option<f64>,

        /// MPEG-TS timestamp of the stream start
        #[arg(long)]
        start_offset: Option<String>,
    },

    /// Convert SRT subtitles to WebVTT
    Srt2vtt {
        /// Input SRT file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the speakers of a subtitle
    Speakers {
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Set the style of one cue
    Style {
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// 0-based cue index
        #[arg(short, long)]
        index: usize,

        /// Emphasis level, e.g. "happy"
        #[arg(long)]
        style: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the speech-synthesis JSON document
    Json {
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Speaker models as [["speaker","model","style"], ...]
        #[arg(long)]
        speaker_models: Option<String>,
    },

    /// Export the noise-gate envelope as JSON
    NoiseGate {
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ramp length in seconds
        #[arg(long)]
        transition: Option<f64>,
    },

    /// Check timing, and equivalency with a parallel subtitle
    Check {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Parallel subtitle (e.g. a translation)
        #[arg(value_name = "TARGET")]
        target: Option<PathBuf>,

        /// Allowed start/end difference in seconds
        #[arg(long, default_value_t = 0.0)]
        tolerance: f64,
    },

    /// Generate shell completions for voicevtt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// voicevtt - WebVTT tooling for speech-synthesis dubbing
///
/// Re-segments subtitles into sentences for speech synthesis, re-flows them for
/// display and cuts them into HLS segments.
#[derive(Parser, Debug)]
#[command(name = "voicevtt")]
#[command(version)]
#[command(about = "WebVTT tooling for speech-synthesis dubbing")]
#[command(long_about = "voicevtt prepares WebVTT subtitles for voice dubbing and HLS streaming.

EXAMPLES:
    voicevtt sentences talk.vtt                    # Write talk.sentences.vtt
    voicevtt sentences /subtitles/                 # Process a whole directory
    voicevtt reflow talk.sentences.vtt             # Display cues for the player
    voicevtt segment talk.vtt -o hls/              # HLS segments and playlist
    voicevtt json talk.sentences.vtt -l de         # Synthesis document
    voicevtt check talk.vtt talk.de.vtt            # Compare parallel subtitles
    voicevtt completions bash > voicevtt.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Force overwrite of existing output files
    #[arg(short, long, global = true)]
    force_overwrite: bool,

    /// Subtitle language code (e.g., 'en', 'es', 'fr')
    #[arg(short = 'l', long, global = true)]
    language: Option<String>,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger itself lets everything through; set_max_level filters
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "voicevtt", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;
    let force = cli.force_overwrite;

    match cli.command {
        Commands::Sentences {
            input_path,
            output,
            speaker,
        } => {
            let speaker = speaker.unwrap_or_else(|| config.segmentation.default_speaker.clone());
            let segmenter = SentenceSegmenter::with_default_speaker(&speaker);
            for_each_input(&input_path, output, force, "sentences", "vtt", false, |path| {
                let cues = FileManager::read_subtitles(path)?;
                Ok(renderer::render_cues(&segmenter.segment(&cues)))
            })
        }
        Commands::Reflow {
            input_path,
            output,
            max_chars,
        } => {
            let reflow = DisplayReflow::new(max_chars.unwrap_or(config.segmentation.display_max_chars));
            let cues = FileManager::read_subtitles(&input_path)?;
            let target = output_or_default(&input_path, output, "display", "vtt");
            write_output(&target, &renderer::render_cues(&reflow.reflow(&cues)), force)
        }
        Commands::Segment {
            input_path,
            output,
            segment_length,
            start_offset,
        } => run_segment(&config, &input_path, output, segment_length, start_offset, force),
        Commands::Srt2vtt { input_path, output } => {
            for_each_input(&input_path, output, force, "", "vtt", true, |path| {
                if !FileManager::is_srt(path) {
                    return Err(anyhow!("Not an SRT file: {:?}", path));
                }
                FileManager::read_vtt_text(path)
            })
        }
        Commands::Speakers { input_path } => {
            let cues = FileManager::read_subtitles(&input_path)?;
            for speaker in annotation::get_speakers(&cues) {
                println!("{}", speaker);
            }
            Ok(())
        }
        Commands::Style {
            input_path,
            index,
            style,
            output,
        } => {
            let cues = FileManager::read_subtitles(&input_path)?;
            let styled = annotation::assign_style_to_cue(&cues, &style, index)?;
            let target = output_or_default(&input_path, output, "styled", "vtt");
            write_output(&target, &renderer::render_cues(&styled), force)
        }
        Commands::Json {
            input_path,
            output,
            speaker_models,
        } => {
            let models = match speaker_models {
                Some(json) => annotation::parse_speaker_models(&json)?,
                None => config.speaker_models.clone(),
            };
            let cues = FileManager::read_subtitles(&input_path)?;
            let json = annotation::synthesis_json(&config.language, &models, &cues)?;
            let target = output_or_default(&input_path, output, "", "json");
            write_output(&target, &json, force)
        }
        Commands::NoiseGate {
            input_path,
            output,
            transition,
        } => {
            let cues = FileManager::read_subtitles(&input_path)?;
            let json = annotation::noise_gate_json(&cues, transition.unwrap_or(config.noise_gate_transition))?;
            let target = output_or_default(&input_path, output, "gate", "json");
            write_output(&target, &json, force)
        }
        Commands::Check {
            source,
            target,
            tolerance,
        } => run_check(&source, target.as_deref(), tolerance),
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    // Override config with CLI options if provided
    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn output_or_default(input: &Path, output: Option<PathBuf>, suffix: &str, extension: &str) -> PathBuf {
    output.unwrap_or_else(|| {
        let dir = input.parent().unwrap_or(Path::new("."));
        FileManager::generate_output_path(input, dir, suffix, extension)
    })
}

fn write_output(path: &Path, content: &str, force_overwrite: bool) -> Result<()> {
    if path.exists() && !force_overwrite {
        warn!("Output file already exists: {:?}. Use -f to force overwrite.", path);
        return Ok(());
    }
    FileManager::write_to_file(path, content)?;
    info!("Success: {:?}", path);
    Ok(())
}

fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .is_some_and(|stem| GENERATED_SUFFIXES.iter().any(|suffix| stem.ends_with(suffix)))
}

// Runs `process` on a file, or on every subtitle file of a directory with a progress bar
fn for_each_input<F>(
    input_path: &Path,
    output: Option<PathBuf>,
    force_overwrite: bool,
    suffix: &str,
    extension: &str,
    srt_only: bool,
    process: F,
) -> Result<()>
where
    F: Fn(&Path) -> Result<String>,
{
    if input_path.is_file() {
        let content = process(input_path)?;
        let target = output_or_default(input_path, output, suffix, extension);
        return write_output(&target, &content, force_overwrite);
    }

    if !input_path.is_dir() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }
    if output.is_some() {
        warn!("--output is ignored for directory input");
    }

    let files: Vec<PathBuf> = FileManager::find_subtitle_files(input_path)?
        .into_iter()
        .filter(|path| !is_generated(path))
        .filter(|path| !srt_only || FileManager::is_srt(path))
        .collect();

    info!("Processing {} files in {:?}", files.len(), input_path);

    let progress_bar = ProgressBar::new(files.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar.set_message("Processing files");

    let mut success_count = 0;
    let mut error_count = 0;

    for path in &files {
        let file_name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        progress_bar.set_message(file_name);

        let result = process(path).and_then(|content| {
            let target = output_or_default(path, None, suffix, extension);
            if target.exists() && !force_overwrite {
                debug!("Skipping existing output {:?}", target);
                return Ok(());
            }
            FileManager::write_to_file(&target, &content)
        });

        match result {
            Ok(()) => success_count += 1,
            Err(e) => {
                progress_bar.suspend(|| error!("Error processing {:?}: {:#}", path, e));
                error_count += 1;
            }
        }
        progress_bar.inc(1);
    }

    progress_bar.finish_and_clear();
    info!("Finished processing {} files ({} failed)", success_count, error_count);
    Ok(())
}

fn run_segment(
    config: &Config,
    input_path: &Path,
    output: Option<PathBuf>,
    segment_length: Option<f64>,
    start_offset: Option<String>,
    force_overwrite: bool,
) -> Result<()> {
    let segmenter = DurationSegmenter::new(segment_length.unwrap_or(config.segmentation.segment_length))?;
    let start_offset = start_offset.unwrap_or_else(|| config.segmentation.hls_start_offset.clone());

    let output_dir = output.unwrap_or_else(|| {
        let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
        input_path
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("{}_hls", stem))
    });
    if output_dir.exists() && !force_overwrite {
        warn!("Output directory already exists: {:?}. Use -f to force overwrite.", output_dir);
        return Ok(());
    }

    let cues = FileManager::read_subtitles(input_path)?;
    let segments = segmenter.segment(&cues);
    let files = renderer::hls_segment_files(&segments, &start_offset);
    let playlist = renderer::hls_playlist(&segments);

    let playlist_path = FileManager::write_hls_dir(&output_dir, &files, &playlist)?;
    info!("Success: {} segments, playlist {:?}", segments.len(), playlist_path);
    Ok(())
}

fn run_check(source: &Path, target: Option<&Path>, tolerance: f64) -> Result<()> {
    let source_cues = FileManager::read_subtitles(source).context("Error in src subtitle")?;

    let report = TimecodeValidator::new().validate(&source_cues);
    for issue in &report.issues {
        warn!("{}", issue);
    }
    if !report.is_well_formed() {
        return Err(anyhow!("{:?} has {} timing issues", source, report.issues.len()));
    }
    info!("{:?}: {} cues, timing OK", source, source_cues.len());

    if let Some(target) = target {
        let target_cues = FileManager::read_subtitles(target).context("Error in target subtitle")?;
        check_subtitles_times_equivalency(&source_cues, &target_cues, tolerance)?;
        info!("{:?} and {:?} are equivalent", source, target);
    }

    Ok(())
}
