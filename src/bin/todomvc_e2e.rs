//! TodoMVC end-to-end suite
//!
//! Runs every scenario (or the ones named with `--scenario`) against the
//! application at `BASE_URL`, one browser session per scenario, and exits
//! non-zero when any of them fails.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use todomvc_e2e::{Runner, SuiteConfig, scenarios};

#[derive(Parser)]
#[command(name = "todomvc-e2e")]
#[command(version)]
#[command(about = "End-to-end suite for TodoMVC-style applications", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: SuiteConfig,

    /// Only run the named scenario; repeatable
    #[arg(long = "scenario", short = 's', value_name = "NAME")]
    scenarios: Vec<String>,

    /// List scenario names and exit
    #[arg(long)]
    list: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Directory for screenshots of failed scenarios
    #[arg(long, value_name = "DIR")]
    screenshots: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.list {
        for scenario in scenarios::all() {
            println!("{}", scenario.name);
        }
        return Ok(());
    }

    let selected = if cli.scenarios.is_empty() {
        scenarios::all().to_vec()
    } else {
        cli.scenarios
            .iter()
            .map(|name| scenarios::find(name).copied().with_context(|| format!("Unknown scenario '{}'", name)))
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    log::info!("Running {} scenario(s) against {}", selected.len(), cli.config.base_url);

    let mut runner = Runner::new(cli.config);
    if let Some(dir) = cli.screenshots {
        runner = runner.screenshots(dir);
    }

    let report = runner.run(&selected);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        for outcome in &report.outcomes {
            match &outcome.failure {
                None => println!("ok      {} ({} ms)", outcome.name, outcome.duration_ms),
                Some(reason) => println!("FAILED  {} ({} ms): {}", outcome.name, outcome.duration_ms, reason),
            }
        }
        println!();
        println!("{} passed, {} failed", report.passed(), report.failed());
    }

    std::process::exit(report.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_suite_flags_and_scenario_filter() {
        let cli = Cli::try_parse_from([
            "todomvc-e2e",
            "--base-url",
            "http://localhost:8080",
            "--headless",
            "-s",
            "add_multiple_todos",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.config.base_url, "http://localhost:8080");
        assert!(cli.config.headless);
        assert_eq!(cli.scenarios, vec!["add_multiple_todos"]);
        assert!(cli.json);
    }
}
