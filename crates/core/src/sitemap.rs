//! Enumerates every landing page the slug tables can produce and renders the
//! sitemap served at `/sitemap.xml`.

use chrono::NaiveDate;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;
use url::Url;

use crate::slug::SlugTables;

pub const LANDING_PREFIX: &str = "/presente-para/";
pub const TOP_OCCASIONS: &[&str] = &["aniversario", "natal", "dia-dos-namorados"];

const TEMPLATE_NAME: &str = "sitemap.xml";
const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{%- for url in urls %}
  <url>
    <loc>{{ url.loc | escape_xml }}</loc>
    <lastmod>{{ lastmod }}</lastmod>
    <changefreq>{{ url.changefreq }}</changefreq>
    <priority>{{ url.priority }}</priority>
  </url>
{%- endfor %}
</urlset>
"#;

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("invalid sitemap url `{path}`: {source}")]
    Url { path: String, source: url::ParseError },
    #[error("sitemap rendering failed: {0}")]
    Render(#[from] tera::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Home,
    Relationship,
    Combination,
}

impl PageKind {
    pub fn changefreq(self) -> &'static str {
        match self {
            Self::Home => "daily",
            Self::Relationship | Self::Combination => "weekly",
        }
    }

    pub fn priority(self) -> &'static str {
        match self {
            Self::Home => "1.0",
            Self::Relationship => "0.9",
            Self::Combination => "0.8",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SitemapPath {
    pub path: String,
    pub kind: PageKind,
}

#[derive(Debug, Serialize)]
struct UrlEntry {
    loc: String,
    changefreq: &'static str,
    priority: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct SitemapBuilder {
    tables: SlugTables,
    top_occasions: &'static [&'static str],
}

impl Default for SitemapBuilder {
    fn default() -> Self {
        Self::new(SlugTables::builtin())
    }
}

impl SitemapBuilder {
    pub fn new(tables: SlugTables) -> Self {
        Self { tables, top_occasions: TOP_OCCASIONS }
    }

    pub fn with_top_occasions(mut self, top_occasions: &'static [&'static str]) -> Self {
        self.top_occasions = top_occasions;
        self
    }

    /// Home first, then per relationship: the relationship page, each
    /// personality with its top-occasion variants, then every occasion.
    pub fn paths(&self) -> Vec<SitemapPath> {
        let page = |slug: String, kind: PageKind| SitemapPath {
            path: format!("{LANDING_PREFIX}{slug}"),
            kind,
        };
        let mut paths = vec![SitemapPath { path: "/".to_string(), kind: PageKind::Home }];

        for relationship in self.tables.relationships {
            let rel = relationship.token;
            paths.push(page(rel.to_string(), PageKind::Relationship));

            for personality in self.tables.personalities {
                let pers = personality.token;
                paths.push(page(format!("{rel}-{pers}"), PageKind::Combination));
                for occasion in self.top_occasions {
                    paths.push(page(format!("{rel}-{pers}-{occasion}"), PageKind::Combination));
                }
            }

            for occasion in self.tables.occasions {
                paths.push(page(format!("{rel}-{}", occasion.token), PageKind::Combination));
            }
        }

        paths
    }

    pub fn render_xml(&self, base_url: &Url, lastmod: NaiveDate) -> Result<String, SitemapError> {
        let urls = self
            .paths()
            .into_iter()
            .map(|entry| {
                let loc = base_url
                    .join(&entry.path)
                    .map_err(|source| SitemapError::Url { path: entry.path.clone(), source })?;
                Ok(UrlEntry {
                    loc: loc.to_string(),
                    changefreq: entry.kind.changefreq(),
                    priority: entry.kind.priority(),
                })
            })
            .collect::<Result<Vec<_>, SitemapError>>()?;

        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

        let mut context = Context::new();
        context.insert("urls", &urls);
        context.insert("lastmod", &lastmod.format("%Y-%m-%d").to_string());

        Ok(tera.render(TEMPLATE_NAME, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use url::Url;

    use super::{PageKind, SitemapBuilder, TOP_OCCASIONS};
    use crate::slug::{SlugCodec, SlugEntry, SlugTables};

    #[test]
    fn path_count_matches_table_sizes() {
        let tables = SlugTables::builtin();
        let relationships = tables.relationships.len();
        let personalities = tables.personalities.len();
        let occasions = tables.occasions.len();
        let expected = 1
            + relationships
            + relationships * personalities
            + relationships * personalities * TOP_OCCASIONS.len()
            + relationships * occasions;

        let paths = SitemapBuilder::default().paths();
        assert_eq!(paths.len(), expected);
        assert_eq!(paths.len(), 1585);
    }

    #[test]
    fn paths_follow_declared_order() {
        let paths = SitemapBuilder::default().paths();

        assert_eq!(paths[0].path, "/");
        assert_eq!(paths[0].kind, PageKind::Home);
        assert_eq!(paths[1].path, "/presente-para/mae");
        assert_eq!(paths[1].kind, PageKind::Relationship);
        assert_eq!(paths[2].path, "/presente-para/mae-criativa");
        assert_eq!(paths[3].path, "/presente-para/mae-criativa-aniversario");
        assert_eq!(paths[5].path, "/presente-para/mae-criativa-dia-dos-namorados");
    }

    #[test]
    fn every_non_home_path_decodes() {
        let codec = SlugCodec::default();
        for entry in SitemapBuilder::default().paths().into_iter().skip(1) {
            let slug = entry.path.trim_start_matches("/presente-para/");
            assert!(codec.decode(slug).is_ok(), "`{slug}` should decode");
        }
    }

    #[test]
    fn renders_xml_with_priorities_and_encoded_urls() {
        let base = Url::parse("https://presentecerto.com.br").expect("valid base");
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        let xml = SitemapBuilder::default().render_xml(&base, date).expect("render should work");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://presentecerto.com.br/</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<loc>https://presentecerto.com.br/presente-para/pai</loc>"));
        assert!(xml.contains("<loc>https://presentecerto.com.br/presente-para/av%C3%B3</loc>"));
        assert!(xml.contains("<lastmod>2026-10-18</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), 1585);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn locations_are_xml_escaped() {
        const RELATIONSHIPS: &[SlugEntry] = &[SlugEntry { token: "a&b", label: "A e B" }];
        let tables = SlugTables {
            relationships: RELATIONSHIPS,
            personalities: &[],
            occasions: &[],
            known: &[],
        };
        let base = Url::parse("https://presentecerto.com.br").expect("valid base");
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        let xml = SitemapBuilder::new(tables).render_xml(&base, date).expect("render should work");

        assert!(xml.contains("<loc>https://presentecerto.com.br/presente-para/a&amp;b</loc>"));
        assert!(!xml.contains("a&b"));
    }
}
