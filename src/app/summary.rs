//! End-of-run report: one line per job plus totals.

use std::path::Path;

use tracing::info;
use tubegrab_core::{BatchReport, JobOutcome};
use tubegrab_core::download::JobReport;

/// Renders the status line of a single job.
pub(crate) fn render_job_line(report: &JobReport) -> String {
    match &report.outcome {
        JobOutcome::Completed(outcome) => {
            let mut line = format!(
                "OK    {} -> {} ({} bytes)",
                report.input_url,
                outcome.path.display(),
                outcome.bytes_written
            );
            if let Some(audio) = &outcome.audio_path {
                line.push_str(&format!(", audio {}", audio.display()));
            }
            line
        }
        JobOutcome::Failed(error) => format!("FAIL  {error}"),
        JobOutcome::Canceled => format!("SKIP  {} (batch canceled)", report.input_url),
    }
}

pub(crate) fn render_totals_line(report: &BatchReport) -> String {
    format!(
        "{} completed, {} failed, {} canceled",
        report.stats.completed(),
        report.stats.failed(),
        report.stats.canceled()
    )
}

/// Failures always reach stderr; everything else is suppressed by `quiet`.
pub(crate) fn print_completion_summary(report: &BatchReport, output_dir: &Path, quiet: bool) {
    info!(
        completed = report.stats.completed(),
        failed = report.stats.failed(),
        canceled = report.stats.canceled(),
        output_dir = %output_dir.display(),
        "Download Summary"
    );

    for job in &report.jobs {
        let line = render_job_line(job);
        if job.outcome.error().is_some() {
            eprintln!("{line}");
        } else if !quiet {
            println!("{line}");
        }
    }
    if !quiet {
        println!("{}", render_totals_line(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tubegrab_core::download::TransferOutcome;

    fn completed(url: &str, audio: Option<&str>) -> JobReport {
        JobReport {
            input_url: url.to_string(),
            outcome: JobOutcome::Completed(TransferOutcome {
                path: PathBuf::from("out/clip.mp4"),
                bytes_written: 42,
                total_bytes: Some(42),
                audio_path: audio.map(PathBuf::from),
            }),
        }
    }

    #[test]
    fn test_render_completed_line() {
        let line = render_job_line(&completed("https://www.youtube.com/watch?v=a", None));
        assert_eq!(
            line,
            "OK    https://www.youtube.com/watch?v=a -> out/clip.mp4 (42 bytes)"
        );
    }

    #[test]
    fn test_render_completed_line_with_audio() {
        let line = render_job_line(&completed("u", Some("out/clip.mp3")));
        assert!(line.ends_with(", audio out/clip.mp3"), "{line}");
    }

    #[test]
    fn test_render_failed_line_names_url() {
        let error = tubegrab_core::parse_video_url("not a url").unwrap_err();
        let report = JobReport {
            input_url: "not a url".to_string(),
            outcome: JobOutcome::Failed(tubegrab_core::JobError::InvalidUrl {
                url: "not a url".to_string(),
                source: error,
            }),
        };
        let line = render_job_line(&report);
        assert!(line.starts_with("FAIL  "), "{line}");
        assert!(line.contains("not a url"), "{line}");
    }

    #[test]
    fn test_render_canceled_line() {
        let report = JobReport {
            input_url: "u".to_string(),
            outcome: JobOutcome::Canceled,
        };
        assert_eq!(render_job_line(&report), "SKIP  u (batch canceled)");
    }
}
