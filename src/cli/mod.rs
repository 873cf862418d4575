//! CLI argument parsing and console output

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use besiege_core::{CtrlC, OrchestratorBuilder, Report, SiegeConfig, StopTrigger};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

/// besiege - concurrent HTTP load generator
///
/// Hammers a URL with GET requests from a fixed pool of workers until Ctrl+C,
/// then prints how many requests succeeded and the overall throughput.
#[derive(Parser, Debug)]
#[command(name = "besiege")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target URL to send GET requests to
    #[arg(short, long, env = "BESIEGE_URL")]
    pub url: String,

    /// Number of concurrent workers
    #[arg(short, long, default_value = "10")]
    pub concurrency: usize,

    /// Per-request timeout in milliseconds (connect and response)
    #[arg(short, long, default_value = "1000")]
    pub timeout: u64,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Siege configuration described by the arguments
    pub fn config(&self) -> SiegeConfig {
        SiegeConfig::new(self.url.clone())
            .with_concurrency(self.concurrency)
            .with_request_timeout(Duration::from_millis(self.timeout))
    }

    /// Run the siege described by the arguments
    pub async fn run(&self) -> Result<()> {
        let config = self.config();

        tracing::info!("Target: {}", config.target_url);
        tracing::info!("Concurrency: {}", config.concurrency);
        tracing::info!("Timeout: {} ms", self.timeout);

        // Fails before anything is spawned
        let orchestrator = OrchestratorBuilder::new(config.clone())
            .build()
            .context("Invalid configuration")?;

        println!(
            "besiege: recruiting {} concurrent workers against {}",
            config.concurrency, config.target_url
        );
        println!("besiege is running - press Ctrl+C to stop");

        let trigger = ConsoleTrigger::new(config.concurrency);
        let outcome = orchestrator.run(trigger).await?;

        let report = Report::new(&config, &outcome);
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?
            );
        } else {
            println!();
            println!("{report}");
        }

        Ok(())
    }
}

/// Ctrl+C trigger that keeps the console informed while waiting
struct ConsoleTrigger {
    inner: CtrlC,
    spinner: ProgressBar,
    concurrency: usize,
}

impl ConsoleTrigger {
    fn new(concurrency: usize) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("{concurrency} workers sieging"));

        Self {
            inner: CtrlC,
            spinner,
            concurrency,
        }
    }
}

#[async_trait]
impl StopTrigger for ConsoleTrigger {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn wait(&mut self) -> besiege_core::Result<()> {
        self.spinner.enable_steady_tick(Duration::from_millis(120));
        let result = self.inner.wait().await;
        self.spinner.finish_and_clear();

        println!("Stopping {} workers...", self.concurrency);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["besiege", "--url", "http://localhost:8080/"]).unwrap();

        assert_eq!(cli.url, "http://localhost:8080/");
        assert_eq!(cli.concurrency, 10);
        assert_eq!(cli.timeout, 1000);
        assert!(!cli.json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_config_from_args() {
        let cli = Cli::try_parse_from([
            "besiege",
            "--url",
            "http://localhost:8080/health",
            "--concurrency",
            "32",
            "--timeout",
            "250",
        ])
        .unwrap();

        let config = cli.config();
        assert_eq!(config.target_url, "http://localhost:8080/health");
        assert_eq!(config.concurrency, 32);
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["besiege", "-u", "http://a/", "-c", "3", "-t", "50", "-v"])
            .unwrap();
        assert_eq!(cli.concurrency, 3);
        assert_eq!(cli.timeout, 50);
        assert!(cli.verbose);
    }

    #[test]
    fn test_negative_concurrency_rejected_by_parser() {
        let result = Cli::try_parse_from(["besiege", "--url", "http://a/", "--concurrency", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_concurrency_fails_validation() {
        let cli =
            Cli::try_parse_from(["besiege", "--url", "http://a/", "--concurrency", "0"]).unwrap();
        assert!(cli.config().validate().is_err());
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config_before_starting() {
        let cli = Cli::try_parse_from(["besiege", "--url", "http://a/", "--timeout", "0"]).unwrap();
        let err = cli.run().await.unwrap_err();
        assert!(format!("{err:#}").contains("Invalid configuration"));
    }
}
