//! Offline page subcommands: extract, fill, profiles, validate.

use std::path::Path;

use anyhow::{Result, bail};
use tracing::info;

use pagebridge_config::{ConfigLoader, ConfigValidator};
use pagebridge_content::{FormFiller, NO_FILLABLE_FIELD, resolve};
use pagebridge_dom::HostBehavior;
use pagebridge_protocols::DocumentProvider;

use crate::setup::{Components, read_page};

/// Print the page context of a saved page as JSON.
pub(crate) fn extract(components: &Components, file: &Path, url: &str) -> Result<()> {
    let doc = read_page(file, url)?;
    let profile = components.profiles.for_url(url);
    let context = components.extractor.extract(profile, &doc);
    if context.is_empty() {
        info!(platform = %profile.platform, "no context found on page");
    }
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

/// Fill the composer of a saved page and print the report and the element.
pub(crate) fn fill(
    components: &Components,
    file: &Path,
    url: &str,
    text: &str,
    selector: Option<&str>,
    paste_handled: bool,
) -> Result<()> {
    let mut doc = read_page(file, url)?;
    if paste_handled {
        doc.set_host(HostBehavior {
            paste_handled: true,
            ..HostBehavior::default()
        });
    }
    let profile = components.profiles.for_url(url);

    let target = match selector {
        Some(selector) => doc.query_selector(None, selector)?,
        None => resolve(&doc, None, &profile.input)?,
    };
    let Some(target) = target else {
        bail!("{NO_FILLABLE_FIELD} on {url}");
    };

    let report = FormFiller::for_profile(profile).fill_with_report(&mut doc, target, text);
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("{}", doc.outer_html(target)?);
    info!(events = doc.events().len(), success = report.success, "fill finished");
    Ok(())
}

/// List the site profiles in effect.
pub(crate) fn profiles(components: &Components, format: &str) -> Result<()> {
    let profiles: Vec<_> = components.profiles.profiles().collect();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&profiles)?),
        "table" => {
            println!("{:<12} {:<8} {:<10} HOSTS", "PLATFORM", "FILL", "MAX CHARS");
            for profile in profiles {
                let limit = profile
                    .max_reply_chars
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let fill = serde_json::to_value(profile.fill)?;
                println!(
                    "{:<12} {:<8} {:<10} {}",
                    profile.platform,
                    fill.as_str().unwrap_or("auto"),
                    limit,
                    profile.hosts.join(", ")
                );
            }
        }
        other => bail!("unknown format: {other} (expected table or json)"),
    }
    Ok(())
}

/// Report configuration errors and warnings.
pub(crate) fn validate(path: &Path) -> Result<()> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config)?;
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !result.is_valid() {
        bail!("{} error(s) in {}", result.errors.len(), path.display());
    }
    println!("{} is valid", path.display());
    Ok(())
}
