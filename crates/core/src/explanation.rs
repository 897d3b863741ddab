//! Emotional explanation text shown under each recommendation.

use std::sync::Arc;

use serde::Serialize;

use crate::random::{RandomSource, ThreadRandom};

pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EmotionalMotivation {
    LoveAndAffection,
    GratitudeAndRecognition,
    SupportAndEncouragement,
    FunAndJoy,
    CareAndProtection,
}

impl EmotionalMotivation {
    pub const ALL: [EmotionalMotivation; 5] = [
        Self::LoveAndAffection,
        Self::GratitudeAndRecognition,
        Self::SupportAndEncouragement,
        Self::FunAndJoy,
        Self::CareAndProtection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LoveAndAffection => "Amor e carinho",
            Self::GratitudeAndRecognition => "Gratidão e reconhecimento",
            Self::SupportAndEncouragement => "Apoio e encorajamento",
            Self::FunAndJoy => "Diversão e alegria",
            Self::CareAndProtection => "Cuidado e proteção",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|motivation| motivation.label() == label)
    }

    /// Missing or unrecognized answers resolve to love and affection.
    pub fn resolve(label: Option<&str>) -> Self {
        label.and_then(Self::from_label).unwrap_or(Self::LoveAndAffection)
    }

    pub fn templates(self) -> &'static [&'static str; 3] {
        match self {
            Self::LoveAndAffection => &[
                "Este presente é uma expressão pura do seu amor e carinho. {name} foi escolhido especialmente para demonstrar o quanto ela significa para você.",
                "Cada detalhe de {name} reflete o cuidado e amor que você sente. É um presente que fala diretamente ao coração.",
                "Com {name}, você está dizendo \"eu te amo\" de uma forma única e especial que ela nunca esquecerá.",
            ],
            Self::GratitudeAndRecognition => &[
                "{name} é a forma perfeita de expressar sua gratidão por tudo que ela representa em sua vida.",
                "Este presente reconhece e celebra a pessoa incrível que ela é. {name} é um símbolo da sua admiração.",
                "Escolher {name} mostra que você valoriza profundamente sua presença e contribuição em sua vida.",
            ],
            Self::SupportAndEncouragement => &[
                "{name} é mais que um presente: é um voto de confiança nos sonhos e objetivos dela.",
                "Com {name}, você está dizendo \"eu acredito em você\" de uma forma tangível e motivadora.",
                "Este presente simboliza seu apoio incondicional e encorajamento para todos os desafios que ela enfrentar.",
            ],
            Self::FunAndJoy => &[
                "{name} foi escolhido para trazer sorrisos e momentos de pura alegria ao dia a dia dela.",
                "Este presente promete diversão e risadas, criando memórias felizes que durarão para sempre.",
                "Com {name}, você está investindo na felicidade dela e criando oportunidades para momentos especiais juntos.",
            ],
            Self::CareAndProtection => &[
                "{name} demonstra seu instinto protetor e o cuidado genuíno que você tem por ela.",
                "Este presente é um abraço em forma de objeto, mostrando que você sempre quer o melhor para ela.",
                "Escolher {name} revela sua preocupação amorosa com o bem-estar e conforto dela.",
            ],
        }
    }
}

#[derive(Clone)]
pub struct ExplanationGenerator {
    random: Arc<dyn RandomSource>,
}

impl Default for ExplanationGenerator {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

impl std::fmt::Debug for ExplanationGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplanationGenerator").finish_non_exhaustive()
    }
}

impl ExplanationGenerator {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    pub fn generate(&self, product_name: &str, motivation: Option<&str>) -> String {
        let templates = EmotionalMotivation::resolve(motivation).templates();
        let template = templates[self.random.pick(templates.len())];
        render(template, product_name)
    }
}

pub fn render(template: &str, product_name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, product_name)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{EmotionalMotivation, ExplanationGenerator, NAME_PLACEHOLDER};
    use crate::random::{FixedRandom, SequenceRandom};

    #[test]
    fn love_templates_always_mention_the_product() {
        let generator = ExplanationGenerator::new(Arc::new(SequenceRandom::new(vec![0.0, 0.4, 0.9])));

        for _ in 0..3 {
            let text = generator.generate("Kit Spa", Some("Amor e carinho"));
            assert!(text.contains("Kit Spa"), "missing product name in `{text}`");
            assert!(!text.contains(NAME_PLACEHOLDER));
        }
    }

    #[test]
    fn unknown_or_missing_motivation_defaults_to_love() {
        assert_eq!(EmotionalMotivation::resolve(None), EmotionalMotivation::LoveAndAffection);
        assert_eq!(
            EmotionalMotivation::resolve(Some("Saudade")),
            EmotionalMotivation::LoveAndAffection
        );

        let generator = ExplanationGenerator::new(Arc::new(FixedRandom(0.0)));
        let text = generator.generate("Relógio", Some("Saudade"));
        assert!(text.starts_with("Este presente é uma expressão pura do seu amor e carinho."));
    }

    #[test]
    fn picks_template_for_the_stated_motivation() {
        let generator = ExplanationGenerator::new(Arc::new(FixedRandom(0.5)));
        let text = generator.generate("Agenda", Some("Cuidado e proteção"));

        assert_eq!(
            text,
            "Este presente é um abraço em forma de objeto, mostrando que você sempre quer o melhor para ela."
        );
    }

    #[test]
    fn every_template_is_non_empty_even_without_a_name() {
        let generator = ExplanationGenerator::default();
        for motivation in EmotionalMotivation::ALL {
            assert_eq!(EmotionalMotivation::from_label(motivation.label()), Some(motivation));
            assert!(!generator.generate("", Some(motivation.label())).trim().is_empty());
        }
    }
}
