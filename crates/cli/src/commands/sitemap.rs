use std::fs;
use std::path::Path;

use chrono::Utc;
use presente_core::config::{AppConfig, LoadOptions};
use presente_core::sitemap::SitemapBuilder;
use url::Url;

use crate::commands::{CommandResult, EXIT_CONFIG, EXIT_RUNTIME};

pub fn run(output: Option<&Path>) -> CommandResult {
    run_with(LoadOptions::default(), output)
}

pub fn run_with(options: LoadOptions, output: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("sitemap", "config_validation", error.to_string(), EXIT_CONFIG)
        }
    };
    let base_url = match Url::parse(&config.site.base_url) {
        Ok(url) => url,
        Err(error) => {
            return CommandResult::failure(
                "sitemap",
                "config_validation",
                format!("site.base_url: {error}"),
                EXIT_CONFIG,
            )
        }
    };

    let builder = SitemapBuilder::default();
    let xml = match builder.render_xml(&base_url, Utc::now().date_naive()) {
        Ok(xml) => xml,
        Err(error) => return CommandResult::failure("sitemap", "render", error.to_string(), EXIT_RUNTIME),
    };

    let Some(path) = output else {
        return CommandResult::raw(xml);
    };
    match fs::write(path, &xml) {
        Ok(()) => CommandResult::success(
            "sitemap",
            format!("wrote {} urls to {}", builder.paths().len(), path.display()),
        ),
        Err(error) => CommandResult::failure(
            "sitemap",
            "io",
            format!("could not write {}: {error}", path.display()),
            EXIT_RUNTIME,
        ),
    }
}
