//! Startup banner.

use crate::Cli;
use runtime::DEFAULT_MODEL;

const RULE: &str = "============================================================";

/// Render the banner for the given flags and access url.
pub fn render(cli: &Cli, url: &str) -> String {
    let mut lines = vec![
        RULE.to_owned(),
        "MOVIE RECOMMENDER AGENT".to_owned(),
        RULE.to_owned(),
        "Purpose: personalized movie recommendations".to_owned(),
        "Powered by: Exa search for current movie data".to_owned(),
    ];
    if present(&cli.openrouter_api_key) {
        let model = cli.model.as_deref().unwrap_or(DEFAULT_MODEL);
        lines.push(format!("Model: {model}"));
    }
    if present(&cli.exa_api_key) {
        lines.push("Exa: movie information and ratings".to_owned());
    }
    if present(&cli.mem0_api_key) {
        lines.push("Memory: conversation context enabled".to_owned());
    }
    lines.push(RULE.to_owned());
    lines.push("Example queries:".to_owned());
    for example in [
        "Suggest thriller movies similar to Inception",
        "Top-rated comedy movies from last 2 years",
        "Korean movies similar to Parasite and Oldboy",
        "Family-friendly adventure movies with good ratings",
    ] {
        lines.push(format!("  - '{example}'"));
    }
    lines.push(RULE.to_owned());
    lines.push(format!("Access at: {url}"));
    lines.join("\n")
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
