use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use env_logger::Env;
use slow_movie::{
    CachingSource, FfmpegLogLevel, PlaybackConfig, PlaybackController, PlaybackSummary,
    ReopeningSource, Sdl2Display, SlowMovieError, error_log, video_candidates,
};

const CLI_AFTER_HELP: &str = "Examples:\n  slow-movie metropolis.mkv --delay 60\n  slow-movie metropolis.mkv -d 10 -f 5 --initial_frame 2400\n  slow-movie --random ~/films -d 300\n  slow-movie metropolis.mkv --test_mode\n\nPress Escape or close the window to stop.";

#[derive(Debug, Parser)]
#[command(
    name = "slow-movie",
    version,
    about = "Play a movie one frame at a time on a fullscreen display",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// File name of the movie to play (optional with --random).
    filename: Option<PathBuf>,

    /// Delay between frames in seconds.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    delay: u64,

    /// Frame increment (1 plays every frame, 10 plays every 10th frame).
    #[arg(
        short = 'f',
        long = "frames_increment",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    frames_increment: u64,

    /// Frame to start from on every pass (sequential mode only).
    #[arg(short = 'i', long = "initial_frame", default_value_t = 0)]
    initial_frame: u64,

    /// Do not scale movie frames to fit the display.
    #[arg(short = 'n', long = "no_scale")]
    no_scale: bool,

    /// Show one random frame from a random movie in DIR per iteration.
    #[arg(
        short = 'r',
        long,
        value_name = "DIR",
        num_args = 0..=1,
        default_missing_value = "."
    )]
    random: Option<PathBuf>,

    /// Show debug messages and the on-screen overlay.
    #[arg(short = 'x', long)]
    debug: bool,

    /// Test mode: 1 second delay, every 10th frame, scaled, debug on.
    #[arg(short = 't', long = "test_mode")]
    test_mode: bool,

    /// Keep the decoder open between frames instead of reopening the file.
    #[arg(long = "keep_open")]
    keep_open: bool,

    /// TrueType font for the debug overlay.
    #[arg(long)]
    font: Option<PathBuf>,

    /// File that fatal errors are appended to.
    #[arg(long = "error_log", default_value = error_log::DEFAULT_ERROR_LOG)]
    error_log: PathBuf,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long = "ffmpeg_log_level", default_value = "error")]
    ffmpeg_log_level: String,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Turn the parsed command line into a playback configuration.
fn resolve_config(cli: &Cli) -> Result<PlaybackConfig, SlowMovieError> {
    let missing_file = || {
        SlowMovieError::Config(
            "a movie file name is required unless --random is given".to_string(),
        )
    };

    let base = match (&cli.random, &cli.filename) {
        // Test mode always plays a single file.
        (_, Some(file)) if cli.test_mode => PlaybackConfig::sequential(file),
        (_, None) if cli.test_mode => return Err(missing_file()),
        (Some(directory), _) => PlaybackConfig::random(directory),
        (None, Some(file)) => PlaybackConfig::sequential(file),
        (None, None) => return Err(missing_file()),
    };

    let mut config = base
        .with_delay(cli.delay)
        .with_frame_increment(cli.frames_increment)
        .with_initial_frame(cli.initial_frame)
        .with_scaling(!cli.no_scale)
        .with_debug(cli.debug)
        .with_keep_open(cli.keep_open);
    if let Some(font) = &cli.font {
        config = config.with_font(font);
    }
    if cli.test_mode {
        config = config.with_test_mode();
    }
    Ok(config)
}

/// Fail early on anything that makes playback impossible.
fn check_config(config: &PlaybackConfig) -> Result<(), SlowMovieError> {
    config.validate()?;
    if config.is_random() && video_candidates(config.source_path())?.is_empty() {
        return Err(SlowMovieError::NoCandidates {
            directory: config.source_path().to_path_buf(),
        });
    }
    Ok(())
}

fn play(config: &PlaybackConfig) -> Result<PlaybackSummary, SlowMovieError> {
    let display = Sdl2Display::fullscreen("slow-movie")?;
    if config.keep_open() {
        PlaybackController::new(config, CachingSource::new(), display).run()
    } else {
        PlaybackController::new(config, ReopeningSource, display).run()
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = cli.ffmpeg_log_level.parse::<FfmpegLogLevel>()?;
    slow_movie::set_ffmpeg_log_level(level);

    let config = resolve_config(cli)?;
    log::debug!("{config:#?}");
    check_config(&config)?;

    error_log::install_panic_hook(cli.error_log.clone());
    if let Err(error) = play(&config) {
        if let Err(log_error) = error_log::append(&cli.error_log, &error) {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("could not write {}: {log_error}", cli.error_log.display()).yellow()
            );
        }
        return Err(error.into());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "slow-movie", &mut std::io::stdout());
        return;
    }

    let default_level = if cli.debug || cli.test_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();

    if let Err(error) = run(&cli) {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{Cli, check_config, resolve_config};
    use clap::Parser;
    use slow_movie::SlowMovieError;

    fn parse(arguments: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("slow-movie").chain(arguments.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults() {
        let config = resolve_config(&parse(&["movie.mp4"])).unwrap();
        assert_eq!(config.delay_seconds(), 1);
        assert_eq!(config.frame_increment(), 1);
        assert_eq!(config.initial_frame(), 0);
        assert!(config.scale_to_fit());
        assert!(!config.is_random());
        assert!(!config.debug());
    }

    #[test]
    fn short_flags() {
        let config =
            resolve_config(&parse(&["movie.mp4", "-d", "30", "-f", "5", "-i", "7", "-n", "-x"]))
                .unwrap();
        assert_eq!(config.delay_seconds(), 30);
        assert_eq!(config.frame_increment(), 5);
        assert_eq!(config.initial_frame(), 7);
        assert!(!config.scale_to_fit());
        assert!(config.debug());
    }

    #[test]
    fn test_mode_overrides_everything() {
        let config = resolve_config(&parse(&[
            "movie.mp4",
            "--delay",
            "600",
            "--frames_increment",
            "3",
            "--no_scale",
            "--random",
            "films",
            "--test_mode",
        ]))
        .unwrap();
        assert_eq!(config.delay_seconds(), 1);
        assert_eq!(config.frame_increment(), 10);
        assert!(config.scale_to_fit());
        assert!(config.debug());
        assert!(!config.is_random());
        assert_eq!(config.source_path(), Path::new("movie.mp4"));
    }

    #[test]
    fn random_without_value_uses_current_directory() {
        let config = resolve_config(&parse(&["--random"])).unwrap();
        assert!(config.is_random());
        assert_eq!(config.source_path(), Path::new("."));
    }

    #[test]
    fn filename_required_without_random() {
        let result = resolve_config(&parse(&["-d", "5"]));
        assert!(matches!(result, Err(SlowMovieError::Config(_))));
    }

    #[test]
    fn zero_delay_is_rejected() {
        assert!(Cli::try_parse_from(["slow-movie", "movie.mp4", "--delay", "0"]).is_err());
    }

    #[test]
    fn empty_random_directory_has_no_candidates() {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(directory.path().join("notes.txt"), b"not a movie")
            .expect("Failed to write file");
        let config = resolve_config(&parse(&["--random", directory.path().to_str().unwrap()]))
            .unwrap();
        assert!(matches!(
            check_config(&config),
            Err(SlowMovieError::NoCandidates { .. })
        ));
    }

    #[test]
    fn missing_movie_is_reported() {
        let config = resolve_config(&parse(&["no_such_movie.mp4"])).unwrap();
        assert!(matches!(
            check_config(&config),
            Err(SlowMovieError::SourceNotFound { .. })
        ));
    }
}
