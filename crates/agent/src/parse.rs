//! Tolerant reading of the oracle's ranked list.
//!
//! The oracle is asked for a bare JSON array but often wraps it in markdown
//! fences, prose or trailing commas. Parsing strips fences, keeps the text
//! between the first `[` and the last `]`, removes control characters and
//! trailing commas, then resolves each entry's product name against the
//! candidates. When no entry survives, a line scan looks for candidate names
//! quoted verbatim in the raw text.

use std::sync::OnceLock;

use presente_core::domain::product::Product;
use presente_core::recommend::{match_by_name, MIN_RECOMMENDATIONS};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_EMOTIONAL_SCORE: f64 = 85.0;
pub const TEXT_SCAN_SCORE: f64 = 80.0;
pub const TEXT_SCAN_REASON: &str = "Recomendado pela análise de IA baseada no seu perfil emocional.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    Json,
    TextScan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OracleChoice<'a> {
    pub product: &'a Product,
    pub reason: String,
    pub emotional_score: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedList<'a> {
    pub choices: Vec<OracleChoice<'a>>,
    pub mode: ParseMode,
}

fn control_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\x00-\x1F\x7F-\x{9F}]").expect("static pattern compiles"))
}

fn trailing_commas() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r",\s*([}\]])").expect("static pattern compiles"))
}

/// At most three choices, best first. Empty when nothing matched.
pub fn parse_ranked_list<'a>(content: &str, candidates: &'a [Product]) -> RankedList<'a> {
    match parse_json(content, candidates) {
        Some(choices) if !choices.is_empty() => RankedList { choices, mode: ParseMode::Json },
        _ => {
            warn!(
                event_name = "oracle.response.unparseable",
                length = content.len(),
                "falling back to line scan"
            );
            RankedList { choices: scan_lines(content, candidates), mode: ParseMode::TextScan }
        }
    }
}

/// The JSON array slice of `content`, cleaned up for `serde_json`.
pub fn extract_json_array(content: &str) -> Option<String> {
    let mut body = content.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    let body = body.trim();

    let start = body.find('[')?;
    let end = body.rfind(']')?;
    if start >= end {
        return None;
    }

    let without_controls = control_chars().replace_all(&body[start..=end], "");
    Some(trailing_commas().replace_all(&without_controls, "$1").into_owned())
}

fn parse_json<'a>(content: &str, candidates: &'a [Product]) -> Option<Vec<OracleChoice<'a>>> {
    let json = extract_json_array(content)?;
    let entries = match serde_json::from_str::<Value>(&json) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => return None,
        Err(error) => {
            debug!(event_name = "oracle.response.invalid_json", error = %error, "json rejected");
            return None;
        }
    };

    let mut choices: Vec<OracleChoice<'a>> = Vec::new();
    for entry in &entries {
        let name = non_blank(entry.get("product"));
        let reason = non_blank(entry.get("reason"));
        let (Some(name), Some(reason)) = (name, reason) else {
            continue;
        };
        let Some(product) = match_by_name(name, candidates) else {
            debug!(event_name = "oracle.choice.unmatched", product = name, "dropping unknown product");
            continue;
        };
        if choices.iter().any(|choice| choice.product.id == product.id) {
            continue;
        }

        let emotional_score = entry
            .get("emotional_score")
            .and_then(Value::as_f64)
            .filter(|score| *score > 0.0)
            .unwrap_or(DEFAULT_EMOTIONAL_SCORE);
        choices.push(OracleChoice { product, reason: reason.to_string(), emotional_score });
    }

    choices.truncate(MIN_RECOMMENDATIONS);
    Some(choices)
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).map(str::trim).filter(|text| !text.is_empty())
}

fn scan_lines<'a>(content: &str, candidates: &'a [Product]) -> Vec<OracleChoice<'a>> {
    let mut choices: Vec<OracleChoice<'a>> = Vec::new();

    for line in content.lines() {
        let line = line.to_lowercase();
        let mentioned = candidates.iter().find(|product| {
            let name = product.name.trim().to_lowercase();
            !name.is_empty() && line.contains(&name)
        });
        if let Some(product) = mentioned {
            if !choices.iter().any(|choice| choice.product.id == product.id) {
                choices.push(OracleChoice {
                    product,
                    reason: TEXT_SCAN_REASON.to_string(),
                    emotional_score: TEXT_SCAN_SCORE,
                });
            }
        }
        if choices.len() >= MIN_RECOMMENDATIONS {
            break;
        }
    }

    choices
}

#[cfg(test)]
mod tests {
    use presente_core::domain::product::Product;
    use rust_decimal::Decimal;

    use super::{
        extract_json_array, parse_ranked_list, ParseMode, DEFAULT_EMOTIONAL_SCORE,
        TEXT_SCAN_REASON, TEXT_SCAN_SCORE,
    };

    fn catalog() -> Vec<Product> {
        ["Kit Spa Relaxante Casa", "Livro de Receitas Gourmet", "Caneca Azul", "Vaso de Suculentas"]
            .iter()
            .enumerate()
            .map(|(index, name)| Product::new(format!("p{index}"), *name, Decimal::from(50)))
            .collect()
    }

    #[test]
    fn fenced_array_with_trailing_commas_is_accepted() {
        let products = catalog();
        let content = "```json\n[\n  {\"product\": \"Caneca Azul\", \"reason\": \"Todo dia lembra de você.\", \"emotional_score\": 92,},\n]\n```";

        let list = parse_ranked_list(content, &products);

        assert_eq!(list.mode, ParseMode::Json);
        assert_eq!(list.choices.len(), 1);
        assert_eq!(list.choices[0].product.name, "Caneca Azul");
        assert_eq!(list.choices[0].emotional_score, 92.0);
    }

    #[test]
    fn prose_around_the_array_is_ignored() {
        let content = "Aqui estão minhas sugestões:\n[{\"product\":\"Caneca Azul\",\"reason\":\"x\"}]\nEspero ter ajudado!";
        assert_eq!(
            extract_json_array(content).as_deref(),
            Some("[{\"product\":\"Caneca Azul\",\"reason\":\"x\"}]")
        );
        assert_eq!(extract_json_array("sem lista aqui"), None);
        assert_eq!(extract_json_array("] antes ["), None);
    }

    #[test]
    fn entries_need_product_and_reason_and_a_known_name() {
        let products = catalog();
        let content = r#"[
            {"product": "Caneca Azul"},
            {"reason": "sem produto"},
            {"product": "Bicicleta Elétrica", "reason": "não existe"},
            {"product": "kit spa", "reason": "Relaxar."},
            {"product": "Livro de Receitas Gourmet Edição Especial", "reason": "Cozinhar."}
        ]"#;

        let list = parse_ranked_list(content, &products);
        let names: Vec<&str> = list.choices.iter().map(|choice| choice.product.name.as_str()).collect();

        assert_eq!(list.mode, ParseMode::Json);
        assert_eq!(names, vec!["Kit Spa Relaxante Casa", "Livro de Receitas Gourmet"]);
        assert!(list.choices.iter().all(|choice| choice.emotional_score == DEFAULT_EMOTIONAL_SCORE));
    }

    #[test]
    fn at_most_three_choices_are_kept() {
        let products = catalog();
        let content = r#"[
            {"product": "Vaso de Suculentas", "reason": "a"},
            {"product": "Caneca Azul", "reason": "b"},
            {"product": "Kit Spa Relaxante Casa", "reason": "c"},
            {"product": "Livro de Receitas Gourmet", "reason": "d"}
        ]"#;

        let list = parse_ranked_list(content, &products);
        assert_eq!(list.choices.len(), 3);
        assert_eq!(list.choices[0].product.name, "Vaso de Suculentas");
    }

    #[test]
    fn unparseable_text_falls_back_to_line_scan() {
        let products = catalog();
        let content = "1. Caneca Azul: perfeita para o café\n2. Um passeio no parque\n3. KIT SPA RELAXANTE CASA para relaxar\n4. caneca azul de novo";

        let list = parse_ranked_list(content, &products);
        let names: Vec<&str> = list.choices.iter().map(|choice| choice.product.name.as_str()).collect();

        assert_eq!(list.mode, ParseMode::TextScan);
        assert_eq!(names, vec!["Caneca Azul", "Kit Spa Relaxante Casa"]);
        assert!(list
            .choices
            .iter()
            .all(|choice| choice.reason == TEXT_SCAN_REASON && choice.emotional_score == TEXT_SCAN_SCORE));
    }

    #[test]
    fn nothing_recognisable_yields_an_empty_list() {
        let products = catalog();
        let list = parse_ranked_list("[{\"product\": \"Drone\", \"reason\": \"voar\"}]", &products);
        assert!(list.choices.is_empty());
        assert_eq!(list.mode, ParseMode::TextScan);
    }
}
