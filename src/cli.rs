//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download videos and optionally extract their audio.
///
/// Each URL must be a watch page (`https://www.youtube.com/watch?v=ID`).
/// Values not given on the command line fall back to
/// `$XDG_CONFIG_HOME/tubegrab/config.toml`.
#[derive(Parser, Debug)]
#[command(name = "tubegrab")]
#[command(author, version, about)]
pub struct Args {
    /// Watch-page URLs to download
    #[arg(value_name = "URLS", required = true, num_args = 1..)]
    pub urls: Vec<String>,

    /// Directory to write videos into (must exist) [default: .]
    #[arg(short = 'o', long = "outdir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Show a progress bar per download
    #[arg(short, long)]
    pub progress: bool,

    /// Extract an MP3 audio track with ffmpeg after each download
    #[arg(short, long)]
    pub audio: bool,

    /// Maximum concurrent downloads (1-100) [default: 10]
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.youtube.com/watch?v=abc";

    #[test]
    fn test_cli_minimal_args_parse_successfully() {
        let args = Args::try_parse_from(["tubegrab", URL]).unwrap();
        assert_eq!(args.urls, vec![URL.to_string()]);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.progress);
        assert!(!args.audio);
        assert!(args.output_dir.is_none());
        assert!(args.concurrency.is_none());
    }

    #[test]
    fn test_cli_requires_at_least_one_url() {
        let err = Args::try_parse_from(["tubegrab"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_accepts_multiple_urls() {
        let args = Args::try_parse_from(["tubegrab", URL, "https://www.youtube.com/watch?v=def"])
            .unwrap();
        assert_eq!(args.urls.len(), 2);
    }

    #[test]
    fn test_cli_outdir_short_and_long() {
        let args = Args::try_parse_from(["tubegrab", "-o", "/tmp/v", URL]).unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/v")));

        let args = Args::try_parse_from(["tubegrab", "--outdir", "videos", URL]).unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("videos")));
    }

    #[test]
    fn test_cli_progress_and_audio_flags() {
        let args = Args::try_parse_from(["tubegrab", "-p", "-a", URL]).unwrap();
        assert!(args.progress);
        assert!(args.audio);

        let args = Args::try_parse_from(["tubegrab", "--progress", "--audio", URL]).unwrap();
        assert!(args.progress);
        assert!(args.audio);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["tubegrab", "-v", URL]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["tubegrab", "-vv", URL]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let err = Args::try_parse_from(["tubegrab", "-q", "-v", URL]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["tubegrab", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["tubegrab", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_concurrency_bounds() {
        let args = Args::try_parse_from(["tubegrab", "-c", "1", URL]).unwrap();
        assert_eq!(args.concurrency, Some(1));
        let args = Args::try_parse_from(["tubegrab", "--concurrency", "100", URL]).unwrap();
        assert_eq!(args.concurrency, Some(100));

        for bad in ["0", "101"] {
            let err = Args::try_parse_from(["tubegrab", "-c", bad, URL]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["tubegrab", "--invalid-flag", URL]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
