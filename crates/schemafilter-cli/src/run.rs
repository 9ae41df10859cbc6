//! Main execution logic for the schemafilter CLI.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use schemafilter::{FilterChain, FilterRequest, FilterSettings, MoreInput, SharedContext};
use schemafilter_query::Query;
use serde::Serialize;

use crate::args::Cli;
use crate::fixture::Fixture;
use crate::resolver::FixtureResolver;

/// What running a filter specification produced.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A filter lacks arguments; `prompt` says what to ask for.
    NeedsInput { prompt: MoreInput },
    /// A street filter lacks a radius; resubmit at `url`.
    Redirect { url: String },
    Results(Results),
}

#[derive(Debug, Serialize)]
pub struct Results {
    /// Canonical re-encoding of the applied chain.
    pub spec: String,
    pub filters: Vec<FilterSummary>,
    pub context: SharedContext,
    pub items: Vec<ItemSummary>,
}

#[derive(Debug, Serialize)]
pub struct FilterSummary {
    pub key: String,
    pub label: String,
    pub value: String,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemSummary {
    pub id: i64,
    pub title: String,
    pub item_date: NaiveDate,
}

/// Loads the fixture and settings named on the command line and runs the
/// specification against them.
pub fn execute(cli: &Cli) -> Result<Outcome> {
    let fixture = Fixture::load(&cli.fixture)?;
    let settings = match &cli.settings {
        Some(path) => FilterSettings::load(path)
            .with_context(|| format!("failed to load settings {}", path.display()))?,
        None => FilterSettings::default(),
    };
    let path = cli
        .path
        .clone()
        .unwrap_or_else(|| format!("/{}/filter/{}/", fixture.schema.slug, cli.spec));

    run(
        &fixture,
        &settings,
        &Options {
            spec: &cli.spec,
            path: &path,
            block_radius: cli.block_radius.as_deref(),
            normalize: cli.normalize,
        },
    )
}

/// Per-run inputs that do not come from the fixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options<'a> {
    pub spec: &'a str,
    pub path: &'a str,
    pub block_radius: Option<&'a str>,
    pub normalize: bool,
}

/// Parses, validates, optionally normalizes, and applies `options.spec`.
pub fn run(fixture: &Fixture, settings: &FilterSettings, options: &Options<'_>) -> Result<Outcome> {
    let mut request = FilterRequest::new(&fixture.schema, settings).with_path(options.path);
    if let Some(radius) = options.block_radius {
        request = request.with_block_radius(radius);
    }
    let fields = fixture.field_registry();
    let catalog = fixture.catalog();

    let mut chain = match FilterChain::from_spec(&request, options.spec, &fields, &catalog) {
        Ok(chain) => chain,
        Err(err) => {
            if let Some(url) = err.redirect_url() {
                tracing::info!(url, "redirecting to add a block radius");
                return Ok(Outcome::Redirect {
                    url: url.to_string(),
                });
            }
            return Err(err).context("invalid filter specification");
        }
    };

    if let Some(prompt) = chain.validate(&catalog)? {
        return Ok(Outcome::NeedsInput { prompt });
    }

    if options.normalize {
        chain = chain.normalized();
    }

    let resolver = FixtureResolver::new(&fixture.locations, &fixture.blocks);
    let mut context = SharedContext::new();
    context.insert("schema", fixture.schema.slug.clone());
    let query = chain
        .apply(&request, Query::new().order_desc("item_date"), &mut context, &resolver)
        .context("failed to apply filters")?;

    let items = query
        .filter(&fixture.items)
        .into_iter()
        .map(|item| ItemSummary {
            id: item.id,
            title: item.title.clone(),
            item_date: item.item_date,
        })
        .collect();

    let filters = chain
        .iter()
        .map(|(key, filter)| FilterSummary {
            key: key.to_string(),
            label: filter.label().to_string(),
            value: filter.value().to_string(),
            url: filter.url().map(str::to_string),
        })
        .collect();

    tracing::debug!(filters = chain.len(), "applied filter chain");
    Ok(Outcome::Results(Results {
        spec: chain.to_spec(),
        filters,
        context,
        items,
    }))
}

/// Renders an outcome as indented JSON.
pub fn render_json(outcome: &Outcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Renders an outcome for a terminal.
pub fn render_text(outcome: &Outcome) -> String {
    let mut out = String::new();
    match outcome {
        Outcome::Redirect { url } => {
            out.push_str(&format!("Missing block radius. Try: {url}\n"));
        }
        Outcome::NeedsInput { prompt } => {
            out.push_str(&format!(
                "Choose a {} ({}=...):\n",
                prompt.required_field_label, prompt.resubmit_arg_name
            ));
            for candidate in prompt.candidates.iter().flatten() {
                out.push_str(&format!("  {:<16} {}\n", candidate.slug, candidate.display_name));
            }
        }
        Outcome::Results(results) => {
            for filter in &results.filters {
                if filter.label.is_empty() {
                    out.push_str(&format!("{}\n", filter.value));
                } else {
                    out.push_str(&format!("{}: {}\n", filter.label, filter.value));
                }
            }
            if !results.spec.is_empty() {
                out.push_str(&format!("Filter: {}\n", results.spec));
            }
            out.push_str(&format!("{} item(s)\n", results.items.len()));
            for item in &results.items {
                out.push_str(&format!("  {}  {}\n", item.item_date, item.title));
            }
        }
    }
    out
}
