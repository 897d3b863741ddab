use std::fmt::Write as _;

use presente_core::domain::product::Product;
use presente_core::domain::quiz::RecommendationRequest;

use crate::llm::ChatPrompt;

pub const SYSTEM_PROMPT: &str = "Você é um especialista em recomendação de presentes personalizados com profundo conhecimento em psicologia emocional e relacionamentos humanos.

Sua missão é analisar o perfil emocional de uma pessoa e uma lista de produtos disponíveis para sugerir os 3 presentes mais adequados.

CRITÉRIOS DE ANÁLISE:
1. Compatibilidade emocional com a personalidade
2. Adequação ao tipo de relacionamento
3. Relevância para a ocasião
4. Impacto emocional positivo
5. Valor simbólico do presente

FORMATO DE RESPOSTA (JSON válido):
[
  {
    \"product\": \"Nome exato do produto da lista\",
    \"reason\": \"Explicação emocional de 1-2 frases sobre por que é perfeito\",
    \"emotional_score\": 95
  }
]

REGRAS:
- Use APENAS produtos da lista fornecida
- Nomes dos produtos devem ser EXATOS
- Explicações devem ser calorosas e pessoais
- Foque no impacto emocional, não apenas nas características
- Ordene por relevância emocional (maior score primeiro)
- Retorne exatamente 3 recomendações";

const CLOSING: &str = "Analise este perfil e sugira os 3 presentes mais emocionalmente adequados da lista, explicando por que cada um é perfeito para esta pessoa específica.";

/// Emotional answer first, then surprise, then the profile interests.
pub fn emotional_tags(request: &RecommendationRequest) -> Vec<&str> {
    let mut tags: Vec<&str> = Vec::new();
    let answers = request.emotional.as_deref().into_iter().chain(request.surprise.as_deref());
    for tag in answers.chain(request.profile.interests.iter().map(String::as_str)) {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

pub fn build_prompt(request: &RecommendationRequest, candidates: &[Product]) -> ChatPrompt {
    ChatPrompt { system: SYSTEM_PROMPT.to_string(), user: user_prompt(request, candidates) }
}

pub fn user_prompt(request: &RecommendationRequest, candidates: &[Product]) -> String {
    let profile = &request.profile;
    let mut out = String::new();

    out.push_str("PERFIL DA PESSOA:\n");
    let _ = writeln!(out, "- Relacionamento: {}", profile.relationship);
    let _ = writeln!(out, "- Personalidade: {}", profile.personality);
    let _ = writeln!(out, "- Ocasião: {}", profile.occasion);
    let _ = writeln!(out, "- Orçamento: {}", profile.budget);
    let _ = writeln!(out, "- Tags emocionais: {}", emotional_tags(request).join(", "));
    if !profile.age.trim().is_empty() {
        let _ = writeln!(out, "- Idade: {}", profile.age);
    }
    if !profile.interests.is_empty() {
        let _ = writeln!(out, "- Interesses: {}", profile.interests.join(", "));
    }

    out.push_str("\nPRODUTOS DISPONÍVEIS:\n");
    for (index, product) in candidates.iter().enumerate() {
        let _ = write!(
            out,
            "{}. {} - {} - {}",
            index + 1,
            product.name,
            product.display_price(),
            product.source_label()
        );
        if !product.emotional_tags.is_empty() {
            let _ = write!(out, " (Tags: {})", product.emotional_tags.join(", "));
        }
        if !product.personality_match.is_empty() {
            let _ = write!(out, " (Personalidade: {})", product.personality_match.join(", "));
        }
        out.push('\n');
    }

    out.push('\n');
    out.push_str(CLOSING);
    out
}

#[cfg(test)]
mod tests {
    use presente_core::domain::product::Product;
    use presente_core::domain::quiz::{RecipientProfile, RecommendationRequest};
    use rust_decimal::Decimal;

    use super::{build_prompt, emotional_tags, user_prompt, SYSTEM_PROMPT};
    use crate::llm::Role;

    fn request() -> RecommendationRequest {
        RecommendationRequest::new(RecipientProfile {
            relationship: "Mãe/Pai".to_string(),
            personality: "Criativa e artística".to_string(),
            interests: vec!["Arte e criatividade".to_string(), "Amor e carinho".to_string()],
            ..RecipientProfile::default()
        })
        .with_emotional("Amor e carinho")
    }

    #[test]
    fn candidates_are_numbered_with_price_source_and_tags() {
        let mut kit = Product::new("p1", "Kit Spa Relaxante Casa", Decimal::new(8990, 2));
        kit.source = Some("amazon".to_string());
        kit.emotional_tags = vec!["relaxamento".to_string(), "autocuidado".to_string()];
        kit.personality_match = vec!["Calma e reflexiva".to_string()];
        let book = Product::new("p2", "Livro de Receitas", Decimal::new(4590, 2));

        let text = user_prompt(&request(), &[kit, book]);

        assert!(text.starts_with("PERFIL DA PESSOA:\n- Relacionamento: Mãe/Pai\n"));
        assert!(text.contains(
            "1. Kit Spa Relaxante Casa - R$ 89,90 - amazon (Tags: relaxamento, autocuidado) (Personalidade: Calma e reflexiva)\n"
        ));
        assert!(text.contains("2. Livro de Receitas - R$ 45,90 - Loja\n"));
        assert!(text.ends_with("para esta pessoa específica."));
    }

    #[test]
    fn emotional_tags_lead_with_answers_and_skip_duplicates() {
        assert_eq!(emotional_tags(&request()), vec!["Amor e carinho", "Arte e criatividade"]);
    }

    #[test]
    fn prompt_carries_fixed_instructions_as_system_message() {
        let prompt = build_prompt(&request(), &[]);
        let messages = prompt.messages();
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, Role::User);
    }
}
