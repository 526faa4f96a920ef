//! Face framing guide: replay a recorded landmark session and print guidance.

use anyhow::{Context, Result};
use clap::Parser;
use face_framing_guide::{
    config::{Config, EXAMPLE_CONFIG},
    replay::Recording,
    session::{FrameOutcome, FramingSession},
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded landmark session to replay (YAML)
    #[arg(short, long, required_unless_present = "print_default_config")]
    recording: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Print one line per frame instead of full YAML reports
    #[arg(short, long)]
    summary: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_default_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Face Framing Guide");

    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        Config::from_file(config_path).with_context(|| format!("Failed to load config file {config_path}"))?
    } else {
        Config::default()
    };

    let recording_path = args.recording.context("No recording given")?;
    let recording = Recording::from_file(&recording_path).with_context(|| format!("Failed to load recording {recording_path}"))?;

    let mut session = FramingSession::new(config)?;
    let mut tracked = 0usize;
    for (frame, outcome) in recording.replay(&mut session) {
        if let FrameOutcome::Tracked(_) = outcome {
            tracked += 1;
        }

        if args.summary {
            println!("{:>8} ms  {}", frame.timestamp_ms, outcome.guidance());
        } else {
            println!("---\ntimestamp_ms: {}", frame.timestamp_ms);
            match &outcome {
                FrameOutcome::Tracked(report) => print!("{}", serde_yaml::to_string(report)?),
                FrameOutcome::NoSubject(reason) => println!("no_subject: {reason:?}"),
            }
        }
    }

    let workflow = session.workflow();
    println!(
        "Tracked {tracked}/{} frames; completed steps {:?}; workflow {}",
        recording.frames.len(),
        workflow.completed_steps(),
        if workflow.is_complete() { "complete" } else { "incomplete" }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_recording_args() {
        let args = Args::try_parse_from(["framing-guide", "-r", "session.yaml", "-C", "framing.yaml", "--summary"]).unwrap();
        assert_eq!(args.recording.as_deref(), Some("session.yaml"));
        assert_eq!(args.config.as_deref(), Some("framing.yaml"));
        assert!(args.summary);
        assert!(!args.debug);
    }

    #[test]
    fn test_recording_required_unless_printing_config() {
        let err = Args::try_parse_from(["framing-guide"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let args = Args::try_parse_from(["framing-guide", "--print-default-config"]).unwrap();
        assert!(args.print_default_config);
        assert!(args.recording.is_none());
    }
}
