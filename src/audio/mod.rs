//! Audio track extraction through an external `ffmpeg` binary.
//!
//! The tool is located once at startup; a missing binary is reported before
//! any download starts. Each extraction runs
//! `ffmpeg -i {video} -vn -ar 44100 -ac 1 -b:a 32k -f mp3 {audio}`.

mod error;

pub use error::AudioError;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Name of the extraction binary searched on `PATH`.
pub const FFMPEG_BINARY: &str = "ffmpeg";

const STDERR_TAIL_LINES: usize = 5;

/// Runs the external audio extraction tool.
#[derive(Debug, Clone)]
pub struct AudioExtractor {
    binary_path: PathBuf,
}

impl AudioExtractor {
    /// Uses an explicit binary path without checking it.
    #[must_use]
    pub fn with_binary(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Searches `PATH` for `ffmpeg`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::ToolNotFound`] when no executable is found.
    pub fn discover() -> Result<Self, AudioError> {
        Self::locate(None)
    }

    /// Resolves the tool from an explicit path, or from `PATH` when `None`.
    ///
    /// An explicit path must point at an executable file.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::ToolNotFound`] when the binary cannot be found.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, AudioError> {
        let (tool, lookup) = match explicit {
            Some(path) => (path.display().to_string(), which::which(path)),
            None => (FFMPEG_BINARY.to_string(), which::which(FFMPEG_BINARY)),
        };
        let binary_path = lookup.map_err(|e| AudioError::tool_not_found(tool, e.to_string()))?;
        debug!(path = %binary_path.display(), "located audio extraction tool");
        Ok(Self { binary_path })
    }

    /// Path of the binary that will be executed.
    #[must_use]
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Extracts a mono 44.1 kHz 32 kbit/s MP3 from `video` into `audio`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Spawn`] if the tool cannot be started and
    /// [`AudioError::Failed`] if it exits unsuccessfully.
    #[instrument(skip(self), fields(video = %video.display(), audio = %audio.display()))]
    pub async fn extract(&self, video: &Path, audio: &Path) -> Result<(), AudioError> {
        debug!(tool = %self.binary_path.display(), "starting audio extraction");
        let output = Command::new(&self.binary_path)
            .args(extraction_args(video, audio))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AudioError::spawn(&self.binary_path, e))?;

        if !output.status.success() {
            return Err(AudioError::Failed {
                tool: self.binary_path.clone(),
                status: output.status.to_string(),
                output: audio.to_path_buf(),
                stderr_tail: stderr_tail(&output.stderr),
            });
        }

        info!(path = %audio.display(), "audio extracted");
        Ok(())
    }
}

/// Output path for the audio track of `video`: same stem, `.mp3` extension.
#[must_use]
pub fn audio_path_for(video: &Path) -> PathBuf {
    video.with_extension("mp3")
}

fn extraction_args<'a>(video: &'a Path, audio: &'a Path) -> [&'a OsStr; 12] {
    [
        OsStr::new("-i"),
        video.as_os_str(),
        OsStr::new("-vn"),
        OsStr::new("-ar"),
        OsStr::new("44100"),
        OsStr::new("-ac"),
        OsStr::new("1"),
        OsStr::new("-b:a"),
        OsStr::new("32k"),
        OsStr::new("-f"),
        OsStr::new("mp3"),
        audio.as_os_str(),
    ]
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_path_for_swaps_extension() {
        assert_eq!(
            audio_path_for(Path::new("/tmp/out/my_video.mp4")),
            PathBuf::from("/tmp/out/my_video.mp3")
        );
        assert_eq!(
            audio_path_for(Path::new("clip")),
            PathBuf::from("clip.mp3")
        );
    }

    #[test]
    fn test_extraction_args_follow_fixed_contract() {
        let args: Vec<String> = extraction_args(Path::new("in.mp4"), Path::new("out.mp3"))
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "-i", "in.mp4", "-vn", "-ar", "44100", "-ac", "1", "-b:a", "32k", "-f", "mp3",
                "out.mp3"
            ]
        );
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let stderr = b"l1\nl2\n\nl3\nl4\nl5\nl6\n";
        assert_eq!(stderr_tail(stderr), "l2 | l3 | l4 | l5 | l6");
    }

    #[test]
    fn test_locate_missing_explicit_binary() {
        let err = AudioExtractor::locate(Some(Path::new("/nonexistent/tubegrab-ffmpeg-xyz")))
            .unwrap_err();
        assert!(matches!(err, AudioError::ToolNotFound { .. }));
    }

    #[tokio::test]
    async fn test_extract_with_missing_binary_is_spawn_error() {
        let extractor = AudioExtractor::with_binary("/nonexistent/tubegrab-ffmpeg-xyz");
        let err = extractor
            .extract(Path::new("in.mp4"), Path::new("out.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, AudioError::Spawn { .. }), "got {err:?}");
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-ffmpeg");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extract_passes_arguments_to_tool() {
        let dir = tempfile::tempdir().unwrap();
        let args_file = dir.path().join("args.txt");
        let script = write_script(
            dir.path(),
            &format!("printf '%s\\n' \"$@\" > '{}'", args_file.display()),
        );

        let extractor = AudioExtractor::locate(Some(&script)).unwrap();
        extractor
            .extract(Path::new("v.mp4"), Path::new("v.mp3"))
            .await
            .unwrap();

        let recorded = std::fs::read_to_string(&args_file).unwrap();
        assert_eq!(
            recorded.lines().collect::<Vec<_>>(),
            [
                "-i", "v.mp4", "-vn", "-ar", "44100", "-ac", "1", "-b:a", "32k", "-f", "mp3",
                "v.mp3"
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extract_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo 'v.mp4: Invalid data' >&2; exit 3");

        let err = AudioExtractor::with_binary(script)
            .extract(Path::new("v.mp4"), Path::new("v.mp3"))
            .await
            .unwrap_err();
        match err {
            AudioError::Failed { stderr_tail, .. } => {
                assert!(stderr_tail.contains("Invalid data"), "{stderr_tail}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
