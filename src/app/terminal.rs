//! Terminal capability checks (color, progress bars) and tracing subscriber setup.

use crate::cli::Args;

pub(crate) fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub(crate) fn should_disable_color(no_color_env: bool, dumb_terminal: bool) -> bool {
    no_color_env || dumb_terminal
}

/// Default filter directive when `RUST_LOG` is unset.
pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Progress bars are drawn only on an interactive, non-quiet stderr.
pub(crate) fn should_draw_progress(
    requested: bool,
    stderr_is_terminal: bool,
    quiet: bool,
    dumb_terminal: bool,
) -> bool {
    requested && stderr_is_terminal && !quiet && !dumb_terminal
}

pub(crate) fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let no_color = should_disable_color(no_color_env_requested(), is_dumb_terminal());
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["tubegrab"];
        argv.extend_from_slice(extra);
        argv.push("https://www.youtube.com/watch?v=abc");
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_log_level_follows_flags() {
        assert_eq!(resolve_default_log_level(&args(&[])), "info");
        assert_eq!(resolve_default_log_level(&args(&["-v"])), "debug");
        assert_eq!(resolve_default_log_level(&args(&["-vvv"])), "trace");
        assert_eq!(resolve_default_log_level(&args(&["-q"])), "error");
    }

    #[test]
    fn test_should_disable_color_any_signal() {
        assert!(!should_disable_color(false, false));
        assert!(should_disable_color(true, false));
        assert!(should_disable_color(false, true));
    }

    #[test]
    fn test_should_draw_progress_requires_interactive_stderr() {
        assert!(should_draw_progress(true, true, false, false));
        assert!(!should_draw_progress(false, true, false, false));
        assert!(!should_draw_progress(true, false, false, false));
        assert!(!should_draw_progress(true, true, true, false));
        assert!(!should_draw_progress(true, true, false, true));
    }
}
