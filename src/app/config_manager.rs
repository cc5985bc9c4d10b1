//! Configuration lifecycle: load file config, merge CLI flags, resolve run settings.

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;
use tubegrab_core::DEFAULT_CONCURRENCY;
use tubegrab_core::http_client::{CONNECT_TIMEOUT_SECS, HttpTimeouts, READ_TIMEOUT_SECS};
use tubegrab_core::resolver::DEFAULT_METADATA_HOST;

use crate::app_config::{FileConfig, load_default_file_config};
use crate::cli::Args;

/// Everything a batch run needs, with CLI flags applied over file values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSettings {
    pub(crate) urls: Vec<String>,
    pub(crate) output_dir: PathBuf,
    pub(crate) progress: bool,
    pub(crate) audio: bool,
    pub(crate) concurrency: usize,
    pub(crate) metadata_host: String,
    pub(crate) ffmpeg_path: Option<PathBuf>,
    pub(crate) timeouts: HttpTimeouts,
}

/// Loads the default config file (if any) and merges the CLI over it.
pub(crate) fn resolve_config(args: &Args) -> Result<RunSettings> {
    let loaded = load_default_file_config()?;
    if let Some(path) = loaded.path.as_deref()
        && loaded.config.is_some()
    {
        debug!(path = %path.display(), "loaded config file");
    }
    Ok(merge_settings(args, loaded.config.as_ref()))
}

/// Boolean flags can only be switched on from the CLI, so a `true` in the
/// file stays in effect when the flag is absent.
pub(crate) fn merge_settings(args: &Args, file: Option<&FileConfig>) -> RunSettings {
    let defaults = FileConfig::default();
    let file = file.unwrap_or(&defaults);

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let concurrency = args
        .concurrency
        .or(file.concurrency)
        .map_or(DEFAULT_CONCURRENCY, usize::from);
    let metadata_host = file
        .metadata_host
        .clone()
        .unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string());

    RunSettings {
        urls: args.urls.clone(),
        output_dir,
        progress: args.progress || file.progress.unwrap_or(false),
        audio: args.audio || file.audio.unwrap_or(false),
        concurrency,
        metadata_host,
        ffmpeg_path: file.ffmpeg_path.clone(),
        timeouts: HttpTimeouts {
            connect_secs: file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
            read_secs: file.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const URL: &str = "https://www.youtube.com/watch?v=abc";

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["tubegrab"];
        argv.extend_from_slice(extra);
        argv.push(URL);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_merge_without_file_uses_defaults() {
        let settings = merge_settings(&args(&[]), None);
        assert_eq!(settings.urls, vec![URL.to_string()]);
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert!(!settings.progress);
        assert!(!settings.audio);
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(settings.metadata_host, DEFAULT_METADATA_HOST);
        assert!(settings.ffmpeg_path.is_none());
        assert_eq!(settings.timeouts, HttpTimeouts::default());
    }

    #[test]
    fn test_merge_file_values_apply_when_flags_absent() {
        let file = FileConfig {
            output_dir: Some(PathBuf::from("/srv/videos")),
            progress: Some(true),
            audio: Some(true),
            concurrency: Some(3),
            metadata_host: Some("http://127.0.0.1:9000".to_string()),
            ffmpeg_path: Some(PathBuf::from("/opt/ffmpeg")),
            connect_timeout_secs: Some(5),
            read_timeout_secs: Some(60),
        };
        let settings = merge_settings(&args(&[]), Some(&file));
        assert_eq!(settings.output_dir, PathBuf::from("/srv/videos"));
        assert!(settings.progress);
        assert!(settings.audio);
        assert_eq!(settings.concurrency, 3);
        assert_eq!(settings.metadata_host, "http://127.0.0.1:9000");
        assert_eq!(settings.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg")));
        assert_eq!(settings.timeouts.connect_secs, 5);
        assert_eq!(settings.timeouts.read_secs, 60);
    }

    #[test]
    fn test_merge_cli_overrides_file() {
        let file = FileConfig {
            output_dir: Some(PathBuf::from("/srv/videos")),
            concurrency: Some(3),
            ..FileConfig::default()
        };
        let settings = merge_settings(&args(&["-o", "local", "-c", "7", "-a"]), Some(&file));
        assert_eq!(settings.output_dir, PathBuf::from("local"));
        assert_eq!(settings.concurrency, 7);
        assert!(settings.audio);
    }
}
