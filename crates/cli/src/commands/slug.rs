use presente_core::config::{AppConfig, LoadOptions};
use presente_core::sitemap::LANDING_PREFIX;
use presente_core::slug::{ProfileSlug, SlugCodec};
use serde_json::json;

use crate::commands::{CommandResult, EXIT_INPUT};

pub fn encode(relationship: &str, personality: Option<&str>, occasion: Option<&str>) -> CommandResult {
    let mut profile = ProfileSlug::new(relationship);
    if let Some(personality) = personality {
        profile = profile.with_personality(personality);
    }
    if let Some(occasion) = occasion {
        profile = profile.with_occasion(occasion);
    }

    let slug = SlugCodec::default().encode(&profile);
    if slug.is_empty() {
        return CommandResult::failure(
            "slug.encode",
            "unmapped_relationship",
            format!("relationship `{relationship}` has no slug token"),
            EXIT_INPUT,
        );
    }

    let path = format!("{LANDING_PREFIX}{slug}");
    // A broken config only costs the absolute URL.
    let url = AppConfig::load(LoadOptions::default())
        .ok()
        .and_then(|config| url::Url::parse(&config.site.base_url).ok())
        .and_then(|base| base.join(&path).ok())
        .map(String::from);

    CommandResult::success_with("slug.encode", slug.clone(), Some(json!({ "slug": slug, "path": path, "url": url })))
}

pub fn decode(slug: &str) -> CommandResult {
    match SlugCodec::default().decode(slug) {
        Ok(profile) => CommandResult::success_with(
            "slug.decode",
            format!("`{slug}` resolves to {}", profile.relationship),
            serde_json::to_value(&profile).ok(),
        ),
        Err(error) => CommandResult::failure("slug.decode", "unknown_slug", error.to_string(), EXIT_INPUT),
    }
}
