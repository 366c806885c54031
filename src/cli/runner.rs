//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, LocatorConfig, TraversalConfig};
use crate::dom::HtmlDocument;
use crate::error::{Error, Result, ResultExt};
use crate::pagination::{PaginationLocator, PaginationStateInspector};
use crate::traversal::TraversalController;
use serde::Serialize;
use serde_json::json;
use std::fs;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, printing its output
    pub async fn run(&self) -> Result<()> {
        let output = self.execute().await?;
        println!("{output}");
        Ok(())
    }

    /// Run the CLI command and return its output
    pub async fn execute(&self) -> Result<String> {
        match &self.cli.command {
            Commands::Locate { explain } => self.locate(*explain),
            Commands::Inspect => self.inspect(),
            Commands::Probe => self.probe(),
            Commands::Advance { max_wait_ms } => self.advance(*max_wait_ms).await,
            Commands::Defaults => LocatorConfig::default().to_yaml(),
        }
    }

    /// Load the locator configuration (built-in unless `-C` is given)
    fn load_config(&self) -> Result<LocatorConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => Ok(LocatorConfig::default()),
        }
    }

    /// Load the HTML snapshot
    fn load_document(&self) -> Result<HtmlDocument> {
        let path = self
            .cli
            .html
            .as_ref()
            .ok_or_else(|| Error::config("HTML snapshot not specified (use --html)"))?;

        let html = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot '{}'", path.display()))?;
        HtmlDocument::parse(&html, &self.cli.location).context("Invalid --location")
    }

    fn render(&self, value: &impl Serialize) -> Result<String> {
        Ok(match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        })
    }

    fn locate(&self, explain: bool) -> Result<String> {
        let locator = PaginationLocator::new(&self.load_config()?)?;
        let doc = self.load_document()?;

        if explain {
            self.render(&locator.evaluate_all(&doc))
        } else {
            self.render(&locator.locate(&doc))
        }
    }

    fn inspect(&self) -> Result<String> {
        let locator = PaginationLocator::new(&self.load_config()?)?;
        let doc = self.load_document()?;
        let state = PaginationStateInspector::new(&locator).inspect(&doc);
        self.render(&state)
    }

    fn probe(&self) -> Result<String> {
        let locator = PaginationLocator::new(&self.load_config()?)?;
        let doc = self.load_document()?;
        self.render(&json!({
            "infiniteScroll": locator.probe_infinite_scroll_markup(&doc),
        }))
    }

    async fn advance(&self, max_wait_ms: Option<u64>) -> Result<String> {
        let config = self.load_config()?;
        let locator = PaginationLocator::new(&config)?;
        let doc = self.load_document()?;

        let traversal = match max_wait_ms {
            Some(ms) => TraversalConfig::new(ms, config.traversal.poll_interval_ms.min(ms.max(1))),
            None => config.traversal,
        };
        let controller = TraversalController::new(traversal);

        let candidate = locator.locate(&doc);
        let advanced = controller.advance(&doc, candidate.as_ref()).await;

        self.render(&json!({
            "candidate": candidate,
            "advanced": advanced,
            "navigations": doc.navigations(),
            "clicks": doc.clicks(),
        }))
    }
}
