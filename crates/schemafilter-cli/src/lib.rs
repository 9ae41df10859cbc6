//! Command-line front end for schemafilter.
//!
//! Loads a YAML [`Fixture`] of news items, runs a filter specification
//! against it with [`run`], and renders the [`Outcome`] as text or JSON.

pub mod args;
pub mod fixture;
pub mod logging;
pub mod resolver;
pub mod run;

pub use args::{Cli, LogLevel, OutputFormat};
pub use fixture::{FieldValue, Fixture, NewsItem};
pub use logging::init_logging;
pub use resolver::FixtureResolver;
pub use run::{execute, render_json, render_text, run, Options, Outcome};
