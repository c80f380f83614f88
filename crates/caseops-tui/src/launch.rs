//! Process entry: argument parsing, config, logging and mode selection.

use std::io::IsTerminal;

use tracing::info;

use caseops_core::config::load_config;
use caseops_core::logging;
use caseops_tui_adapter::input::{InputEvent, ResizeEvent};

use crate::app::TabHost;
use crate::interactive_runtime::{build_controller, theme_from_config};

pub const USAGE: &str = "\
Usage: caseops-tui [--config <path>] [--snapshot]

  --config <path>  YAML config file (default: ~/.config/caseops/config.yaml)
  --snapshot       print one rendered frame and exit
  -h, --help       show this help
";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub config: Option<String>,
    pub snapshot: bool,
    pub help: bool,
}

pub fn parse_args(args: &[String]) -> Result<LaunchOptions, String> {
    let mut options = LaunchOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{arg} requires a path"))?;
                options.config = Some(value.clone());
            }
            "--snapshot" => options.snapshot = true,
            "-h" | "--help" => options.help = true,
            other => match other.strip_prefix("--config=") {
                Some(value) => options.config = Some(value.to_owned()),
                None => return Err(format!("unknown argument {other:?}")),
            },
        }
    }
    Ok(options)
}

/// Run the dashboard; returns the process exit code.
pub fn run_from_args(args: &[String]) -> i32 {
    match run(args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("caseops-tui: {err}");
            1
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let options = parse_args(args)?;
    if options.help {
        print!("{USAGE}");
        return Ok(());
    }

    let (config, loaded_from) =
        load_config(options.config.as_deref()).map_err(|err| err.to_string())?;
    logging::init(&config.logging).map_err(|err| err.to_string())?;
    info!(
        config = %loaded_from.as_ref().map_or_else(|| "<defaults>".to_owned(), |p| p.display().to_string()),
        base_url = %config.api.base_url,
        "configuration loaded"
    );

    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    if interactive && !options.snapshot {
        crate::interactive_runtime::run(&config)
    } else {
        print!("{}", render_snapshot_text(&config)?);
        Ok(())
    }
}

/// One frame of the dashboard, after a blocking health probe.
fn render_snapshot_text(config: &caseops_core::config::Config) -> Result<String, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("start async runtime: {err}"))?;
    let controller = build_controller(config)?;
    let health = runtime.block_on(controller.health());
    let mut host = TabHost::new(controller, theme_from_config(config));
    host.set_health(health);
    let _ = host.update(InputEvent::Resize(ResizeEvent {
        width: 100,
        height: 24,
    }));
    let mut text = host.render().snapshot();
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::{parse_args, LaunchOptions};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn parses_config_and_snapshot() {
        assert_eq!(
            parse_args(&args(&["--config", "/etc/caseops.yaml", "--snapshot"])),
            Ok(LaunchOptions {
                config: Some("/etc/caseops.yaml".into()),
                snapshot: true,
                help: false,
            })
        );
        assert_eq!(
            parse_args(&args(&["--config=x.yaml"])).map(|o| o.config),
            Ok(Some("x.yaml".into()))
        );
    }

    #[test]
    fn rejects_unknown_and_dangling_flags() {
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert_eq!(
            parse_args(&args(&["--config"])),
            Err("--config requires a path".to_owned())
        );
    }
}
