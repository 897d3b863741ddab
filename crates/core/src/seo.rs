//! Landing page metadata for decoded slugs, plus `robots.txt`.

use serde::Serialize;
use url::Url;

use crate::sitemap::LANDING_PREFIX;
use crate::slug::ProfileSlug;

pub const SITE_NAME: &str = "PresenteCerto";
pub const DEFAULT_OG_IMAGE: &str =
    "https://images.pexels.com/photos/264985/pexels-photo-264985.jpeg?auto=compress&cs=tinysrgb&w=1200&h=630";

const BASE_KEYWORDS: &[&str] =
    &["presente personalizado", "gift recommendation", "presente ideal", "sugestão de presente"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoPage {
    pub title: String,
    pub meta_title: String,
    pub meta_description: String,
    pub h1: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical_url: String,
    pub og_image: String,
    pub profile: ProfileSlug,
}

impl SeoPage {
    pub fn for_profile(profile: &ProfileSlug, slug: &str, base_url: &Url) -> Self {
        let occasion = profile.named_occasion();
        let personality = profile.personality.as_deref();

        let (h1, description, meta_description) = if profile.is_generic() {
            generic_copy(personality, occasion)
        } else {
            relationship_copy(&profile.relationship, personality, occasion)
        };

        let mut keywords: Vec<String> = BASE_KEYWORDS.iter().map(|keyword| keyword.to_string()).collect();
        if !profile.is_generic() {
            keywords.push(format!("presente para {}", profile.relationship.to_lowercase()));
        }
        if let Some(personality) = personality {
            keywords.push(format!("presente {}", personality.to_lowercase()));
        }
        if let Some(occasion) = occasion {
            keywords.push(format!("presente {}", occasion.to_lowercase()));
        }

        let canonical_path = format!("{LANDING_PREFIX}{slug}");
        let canonical_url = base_url
            .join(&canonical_path)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("{}{canonical_path}", base_url.as_str().trim_end_matches('/')));

        Self {
            title: h1.clone(),
            meta_title: format!("{h1} | {SITE_NAME}"),
            meta_description,
            h1,
            description,
            keywords,
            canonical_url,
            og_image: DEFAULT_OG_IMAGE.to_string(),
            profile: profile.clone(),
        }
    }
}

fn generic_copy(personality: Option<&str>, occasion: Option<&str>) -> (String, String, String) {
    if let Some(occasion) = occasion {
        let lower = occasion.to_lowercase();
        return (
            format!("Presentes de {occasion}"),
            format!("Encontre presentes especiais para {lower}. Sugestões personalizadas para diferentes perfis, explicações emocionais e links diretos para compra."),
            format!("Descubra presentes únicos para {lower}. Recomendações personalizadas com explicações emocionais. Encontre o presente ideal em minutos!"),
        );
    }

    if let Some(personality) = personality {
        let lower = personality.to_lowercase();
        return (
            format!("Presentes {personality}"),
            format!("Encontre presentes {lower} para pessoas especiais. Sugestões personalizadas com explicações emocionais e links diretos para compra."),
            format!("Descubra presentes {lower} únicos. Recomendações personalizadas com explicações emocionais. Encontre o presente ideal!"),
        );
    }

    (
        "Presentes Especiais".to_string(),
        "Encontre presentes especiais para pessoas queridas. Sugestões personalizadas com explicações emocionais.".to_string(),
        "Descubra presentes únicos e especiais. Recomendações personalizadas com explicações emocionais.".to_string(),
    )
}

fn relationship_copy(
    relationship: &str,
    personality: Option<&str>,
    occasion: Option<&str>,
) -> (String, String, String) {
    let relationship_lower = relationship.to_lowercase();

    let mut h1 = format!("Presentes para {relationship}");
    let mut description = format!("Encontre o presente perfeito para {relationship_lower}");
    let mut meta_description = format!("Descubra presentes únicos para {relationship_lower}");

    if let Some(personality) = personality {
        let lower = personality.to_lowercase();
        h1.push_str(&format!(" {personality}"));
        description.push_str(&format!(" {lower}"));
        meta_description.push_str(&format!(" {lower}"));
    }

    if let Some(occasion) = occasion {
        let lower = occasion.to_lowercase();
        h1.push_str(&format!(" - {occasion}"));
        description.push_str(&format!(" para {lower}"));
        meta_description.push_str(&format!(" em {lower}"));
    }

    description.push_str(". Veja as nossas sugestões personalizadas com base no perfil único da pessoa com explicações emocionais e os links diretos para compra.");
    meta_description.push_str(". Recomendações personalizadas com explicações emocionais. Encontre o presente ideal em minutos!");

    (h1, description, meta_description)
}

pub fn robots_txt(base_url: &Url) -> String {
    let sitemap = base_url
        .join("/sitemap.xml")
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}/sitemap.xml", base_url.as_str().trim_end_matches('/')));

    format!(
        "User-agent: *\n\
         Allow: /\n\
         \n\
         # Sitemap\n\
         Sitemap: {sitemap}\n\
         \n\
         Crawl-delay: 1\n\
         \n\
         Allow: {LANDING_PREFIX}\n\
         Allow: /sitemap.xml\n\
         Allow: /robots.txt\n"
    )
}
