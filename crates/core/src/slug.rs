//! Bidirectional mapping between a partial recipient profile and the URL slug
//! used by `/presente-para/<slug>` landing pages.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::quiz::RecipientProfile;

/// Relationship used by the curated occasion and style landing pages.
pub const GENERIC_RELATIONSHIP: &str = "Pessoa Especial";
pub const NO_SPECIAL_OCCASION: &str = "Sem ocasião especial";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlugEntry {
    pub token: &'static str,
    pub label: &'static str,
}

/// A slug that maps straight to a complete profile without token parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnownSlug {
    pub slug: &'static str,
    pub relationship: &'static str,
    pub personality: Option<&'static str>,
    pub occasion: Option<&'static str>,
}

const fn entry(token: &'static str, label: &'static str) -> SlugEntry {
    SlugEntry { token, label }
}

const fn known(
    slug: &'static str,
    relationship: &'static str,
    personality: Option<&'static str>,
    occasion: Option<&'static str>,
) -> KnownSlug {
    KnownSlug { slug, relationship, personality, occasion }
}

const RELATIONSHIPS: &[SlugEntry] = &[
    entry("mae", "Mãe"),
    entry("pai", "Pai"),
    entry("namorado", "Namorado"),
    entry("namorada", "Namorada"),
    entry("marido", "Marido"),
    entry("esposa", "Esposa"),
    entry("amigo", "Amigo"),
    entry("amiga", "Amiga"),
    entry("irmao", "Irmão"),
    entry("irma", "Irmã"),
    entry("filho", "Filho"),
    entry("filha", "Filha"),
    entry("sogra", "Sogra"),
    entry("sogro", "Sogro"),
    entry("cunhada", "Cunhada"),
    entry("cunhado", "Cunhado"),
    entry("prima", "Prima"),
    entry("primo", "Primo"),
    entry("tia", "Tia"),
    entry("tio", "Tio"),
    entry("avo", "Avô"),
    entry("avó", "Avó"),
];

// Several tokens share a label; encoding picks the first one listed.
const PERSONALITIES: &[SlugEntry] = &[
    entry("criativa", "Criativa e artística"),
    entry("aventureira", "Aventureira e espontânea"),
    entry("aventureiro", "Aventureiro e espontâneo"),
    entry("calma", "Calma e reflexiva"),
    entry("zen", "Calma e reflexiva"),
    entry("pratica", "Prática e organizada"),
    entry("pratico", "Prática e organizada"),
    entry("sociavel", "Sociável e extrovertida"),
    entry("extrovertida", "Sociável e extrovertida"),
    entry("extrovertido", "Sociável e extrovertida"),
    entry("romantica", "Romântica e sensível"),
    entry("romantico", "Romântica e sensível"),
    entry("esportiva", "Ativa e esportiva"),
    entry("esportivo", "Ativa e esportiva"),
    entry("intelectual", "Intelectual e curiosa"),
];

const OCCASIONS: &[SlugEntry] = &[
    entry("aniversario", "Aniversário"),
    entry("natal", "Natal"),
    entry("dia-dos-namorados", "Dia dos Namorados"),
    entry("dia-das-maes", "Dia das Mães"),
    entry("dia-dos-pais", "Dia dos Pais"),
    entry("casamento", "Casamento"),
    entry("formatura", "Formatura"),
    entry("promocao", "Promoção"),
    entry("aposentadoria", "Aposentadoria"),
    entry("mudanca", "Mudança"),
    entry("novo-emprego", "Novo Emprego"),
];

const KNOWN_SLUGS: &[KnownSlug] = &[
    known("mae", "Mãe", None, Some(NO_SPECIAL_OCCASION)),
    known("pai", "Pai", None, Some(NO_SPECIAL_OCCASION)),
    known("namorada", "Namorada", None, Some(NO_SPECIAL_OCCASION)),
    known("namorado", "Namorado", None, Some(NO_SPECIAL_OCCASION)),
    known("amigo", "Amigo", None, Some(NO_SPECIAL_OCCASION)),
    known("irma", "Irmã", None, Some(NO_SPECIAL_OCCASION)),
    known("natal", GENERIC_RELATIONSHIP, None, Some("Natal")),
    known("aniversario", GENERIC_RELATIONSHIP, None, Some("Aniversário")),
    known("dia-das-maes", GENERIC_RELATIONSHIP, None, Some("Dia das mães")),
    known("dia-dos-namorados", GENERIC_RELATIONSHIP, None, Some("Dia dos namorados")),
    known("formatura", GENERIC_RELATIONSHIP, None, Some("Formatura")),
    known("criativo-economico", GENERIC_RELATIONSHIP, Some("criativos e econômicos"), None),
    known("luxo-sofisticacao", GENERIC_RELATIONSHIP, Some("sofisticados e luxuosos"), None),
    known("tecnologico-moderno", GENERIC_RELATIONSHIP, Some("tecnológicos e modernos"), None),
    known("esportivo-ativo", GENERIC_RELATIONSHIP, Some("esportivos e ativos"), None),
    known("musical-artistico", GENERIC_RELATIONSHIP, Some("musicais e artisticos"), None),
    known("casa-decoracao", GENERIC_RELATIONSHIP, Some("de casa e decoração"), None),
];

/// The lookup tables a codec works from. Process-wide and read-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlugTables {
    pub relationships: &'static [SlugEntry],
    pub personalities: &'static [SlugEntry],
    pub occasions: &'static [SlugEntry],
    pub known: &'static [KnownSlug],
}

impl Default for SlugTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SlugTables {
    pub const fn builtin() -> Self {
        Self {
            relationships: RELATIONSHIPS,
            personalities: PERSONALITIES,
            occasions: OCCASIONS,
            known: KNOWN_SLUGS,
        }
    }
}

fn label_for(table: &[SlugEntry], token: &str) -> Option<&'static str> {
    table.iter().find(|entry| entry.token == token).map(|entry| entry.label)
}

fn token_for(table: &[SlugEntry], label: &str) -> Option<&'static str> {
    table.iter().find(|entry| entry.label == label).map(|entry| entry.token)
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,
    #[error("unknown relationship `{token}`")]
    UnknownRelationship { token: String },
}

/// The subset of a profile a slug can carry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSlug {
    pub relationship: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
}

impl ProfileSlug {
    pub fn new(relationship: impl Into<String>) -> Self {
        Self { relationship: relationship.into(), personality: None, occasion: None }
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = Some(personality.into());
        self
    }

    pub fn with_occasion(mut self, occasion: impl Into<String>) -> Self {
        self.occasion = Some(occasion.into());
        self
    }

    pub fn is_generic(&self) -> bool {
        self.relationship == GENERIC_RELATIONSHIP
    }

    /// Occasion worth showing; the "no special occasion" marker is dropped.
    pub fn named_occasion(&self) -> Option<&str> {
        self.occasion.as_deref().filter(|occasion| *occasion != NO_SPECIAL_OCCASION)
    }

    /// Fills the remaining quiz fields with their usual defaults.
    pub fn into_recipient_profile(self) -> RecipientProfile {
        let defaults = RecipientProfile::default();
        RecipientProfile {
            relationship: self.relationship,
            personality: self.personality.unwrap_or(defaults.personality),
            occasion: self.occasion.unwrap_or(defaults.occasion),
            ..defaults
        }
    }
}

impl From<KnownSlug> for ProfileSlug {
    fn from(value: KnownSlug) -> Self {
        Self {
            relationship: value.relationship.to_string(),
            personality: value.personality.map(str::to_string),
            occasion: value.occasion.map(str::to_string),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SlugCodec {
    tables: SlugTables,
}

impl SlugCodec {
    pub fn new(tables: SlugTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &SlugTables {
        &self.tables
    }

    /// Joins relationship, personality and occasion tokens with `-`, skipping
    /// fields that are absent or have no token. An unmapped relationship gives
    /// an empty slug.
    pub fn encode(&self, profile: &ProfileSlug) -> String {
        let Some(relationship) = token_for(self.tables.relationships, &profile.relationship) else {
            return String::new();
        };

        let personality = profile
            .personality
            .as_deref()
            .and_then(|label| token_for(self.tables.personalities, label));
        let occasion =
            profile.occasion.as_deref().and_then(|label| token_for(self.tables.occasions, label));

        std::iter::once(relationship)
            .chain(personality)
            .chain(occasion)
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn decode(&self, slug: &str) -> Result<ProfileSlug, SlugError> {
        let slug = slug.trim().trim_matches('/').to_lowercase();
        if slug.is_empty() {
            return Err(SlugError::Empty);
        }

        if let Some(known) = self.tables.known.iter().find(|known| known.slug == slug) {
            debug!(event_name = "slug.decode.known", slug = %slug, "matched curated slug");
            return Ok(ProfileSlug::from(*known));
        }

        let tokens: Vec<&str> = slug.split('-').collect();
        let first = tokens[0];
        let relationship = label_for(self.tables.relationships, first)
            .ok_or_else(|| SlugError::UnknownRelationship { token: first.to_string() })?;

        let mut profile = ProfileSlug::new(relationship);
        let mut index = 1;
        while index < tokens.len() {
            let token = tokens[index];

            if let Some(label) = label_for(self.tables.personalities, token) {
                profile.personality = Some(label.to_string());
                index += 1;
                continue;
            }

            if let Some(label) = label_for(self.tables.occasions, token) {
                profile.occasion = Some(label.to_string());
                index += 1;
                continue;
            }

            if index + 2 < tokens.len() {
                let compound = tokens[index..=index + 2].join("-");
                if let Some(label) = label_for(self.tables.occasions, &compound) {
                    profile.occasion = Some(label.to_string());
                    index += 3;
                    continue;
                }
            }

            if index + 1 < tokens.len() {
                let compound = tokens[index..=index + 1].join("-");
                if let Some(label) = label_for(self.tables.occasions, &compound) {
                    profile.occasion = Some(label.to_string());
                    index += 2;
                    continue;
                }
            }

            debug!(
                event_name = "slug.decode.ignored_token",
                token = %token,
                "ignoring unknown slug token"
            );
            index += 1;
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ProfileSlug, SlugCodec, SlugEntry, SlugError, SlugTables, GENERIC_RELATIONSHIP,
        NO_SPECIAL_OCCASION,
    };

    fn codec() -> SlugCodec {
        SlugCodec::default()
    }

    #[test]
    fn encodes_fields_in_fixed_order() {
        let profile = ProfileSlug::new("Mãe")
            .with_personality("Criativa e artística")
            .with_occasion("Dia das Mães");

        assert_eq!(codec().encode(&profile), "mae-criativa-dia-das-maes");
    }

    #[test]
    fn encode_skips_unmapped_optional_fields() {
        let profile = ProfileSlug::new("Tio")
            .with_personality("Misteriosa")
            .with_occasion("Natal");

        assert_eq!(codec().encode(&profile), "tio-natal");
    }

    #[test]
    fn encode_without_relationship_token_is_empty() {
        let profile = ProfileSlug::new("Chefe").with_occasion("Natal");
        assert_eq!(codec().encode(&profile), "");
    }

    #[test]
    fn decodes_three_token_compound_occasion() {
        let profile = codec().decode("namorada-romantica-dia-dos-namorados");

        assert_eq!(
            profile,
            Ok(ProfileSlug::new("Namorada")
                .with_personality("Romântica e sensível")
                .with_occasion("Dia dos Namorados"))
        );
    }

    #[test]
    fn decodes_two_token_compound_occasion() {
        let profile = codec().decode("pai-novo-emprego");
        assert_eq!(profile, Ok(ProfileSlug::new("Pai").with_occasion("Novo Emprego")));
    }

    #[test]
    fn known_slugs_bypass_token_parsing() {
        assert_eq!(
            codec().decode("mae"),
            Ok(ProfileSlug::new("Mãe").with_occasion(NO_SPECIAL_OCCASION))
        );

        let style = codec().decode("luxo-sofisticacao");
        assert_eq!(
            style,
            Ok(ProfileSlug::new(GENERIC_RELATIONSHIP).with_personality("sofisticados e luxuosos"))
        );
    }

    #[test]
    fn unknown_relationship_fails_explicitly() {
        assert_eq!(
            codec().decode("xyz-foo"),
            Err(SlugError::UnknownRelationship { token: "xyz".to_string() })
        );
        assert_eq!(codec().decode("  / "), Err(SlugError::Empty));
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let profile = codec().decode("tia-banana-calma");
        assert_eq!(profile, Ok(ProfileSlug::new("Tia").with_personality("Calma e reflexiva")));

        let profile = codec().decode("pai-xyz-natal");
        assert_eq!(profile, Ok(ProfileSlug::new("Pai").with_occasion("Natal")));
    }

    #[test]
    fn decodes_relationship_with_compound_occasion_only() {
        let profile = codec().decode("mae-dia-dos-namorados");
        assert_eq!(profile, Ok(ProfileSlug::new("Mãe").with_occasion("Dia dos Namorados")));
    }

    #[test]
    fn surrounding_slashes_are_stripped() {
        let expected = Ok(ProfileSlug::new("Pai").with_occasion("Natal"));

        assert_eq!(codec().decode("/pai-natal"), expected);
        assert_eq!(codec().decode("pai-natal/"), expected);
        assert_eq!(codec().decode("/pai-natal/"), expected);
    }

    #[test]
    fn every_table_combination_round_trips() {
        let codec = codec();
        let tables = SlugTables::builtin();

        for relationship in tables.relationships {
            for personality in tables.personalities {
                for occasion in tables.occasions {
                    let profile = ProfileSlug::new(relationship.label)
                        .with_personality(personality.label)
                        .with_occasion(occasion.label);
                    let slug = codec.encode(&profile);
                    assert_eq!(codec.decode(&slug), Ok(profile), "slug `{slug}`");
                }
            }
        }
    }

    #[test]
    fn relationship_only_round_trip_ignores_added_occasion() {
        let codec = codec();
        for relationship in SlugTables::builtin().relationships {
            let profile = ProfileSlug::new(relationship.label);
            let decoded = codec.decode(&codec.encode(&profile)).expect("slug should decode");
            assert_eq!(decoded.relationship, profile.relationship);
            assert_eq!(decoded.personality, None);
            assert!(decoded.named_occasion().is_none());
        }
    }

    #[test]
    fn injected_tables_replace_builtin_ones() {
        const RELATIONSHIPS: &[SlugEntry] = &[SlugEntry { token: "chefe", label: "Chefe" }];
        let tables =
            SlugTables { relationships: RELATIONSHIPS, known: &[], ..SlugTables::builtin() };
        let codec = SlugCodec::new(tables);

        assert_eq!(
            codec.decode("chefe-natal"),
            Ok(ProfileSlug::new("Chefe").with_occasion("Natal"))
        );
        assert!(codec.decode("mae").is_err());
    }

    #[test]
    fn decoded_slug_fills_remaining_profile_defaults() {
        let profile = ProfileSlug::new("Pai").with_occasion("Natal").into_recipient_profile();

        assert_eq!(profile.relationship, "Pai");
        assert_eq!(profile.occasion, "Natal");
        assert_eq!(profile.personality, "Sociável e extrovertida");
        assert_eq!(profile.budget, "R$ 51 - R$ 150");
    }
}
