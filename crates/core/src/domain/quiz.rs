use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::questions::{question, QuestionId};

pub const DEFAULT_RELATIONSHIP: &str = "Amigo(a)";
pub const DEFAULT_AGE: &str = "26-35 anos";
pub const DEFAULT_PERSONALITY: &str = "Sociável e extrovertida";
pub const DEFAULT_OCCASION: &str = "Aniversário";
pub const DEFAULT_BUDGET: &str = "R$ 51 - R$ 150";
pub const DEFAULT_INTEREST: &str = "Moda e beleza";
pub const DEFAULT_SURPRISE: &str = "Algo útil para o dia a dia";
pub const DEFAULT_EMOTIONAL: &str = "Amor e carinho";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("question `{question}` has no option with value {value}")]
    UnknownOption { question: QuestionId, value: u8 },
    #[error("question `{question}` has no option labelled `{label}`")]
    UnknownLabel { question: QuestionId, label: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: QuestionId,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub value: u8,
}

impl QuizAnswer {
    pub fn from_choice(question_id: QuestionId, value: u8) -> Result<Self, QuizError> {
        let option = question(question_id)
            .option(value)
            .ok_or(QuizError::UnknownOption { question: question_id, value })?;
        Ok(Self { question_id, answer: option.text.to_string(), value })
    }

    pub fn from_label(question_id: QuestionId, label: &str) -> Result<Self, QuizError> {
        let option = question(question_id).option_by_text(label).ok_or_else(|| {
            QuizError::UnknownLabel { question: question_id, label: label.trim().to_string() }
        })?;
        Ok(Self { question_id, answer: option.text.to_string(), value: option.value })
    }

    /// Re-reads the option from the question table, by value first and then
    /// by label.
    pub fn resolved(&self) -> Result<Self, QuizError> {
        Self::from_choice(self.question_id, self.value)
            .or_else(|_| Self::from_label(self.question_id, &self.answer))
    }
}

/// One answer per question. Recording an answer for a question that was
/// already answered replaces the earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<QuizAnswer>", into = "Vec<QuizAnswer>")]
pub struct QuizAnswers {
    answers: BTreeMap<QuestionId, QuizAnswer>,
}

impl QuizAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, answer: QuizAnswer) -> Option<QuizAnswer> {
        self.answers.insert(answer.question_id, answer)
    }

    pub fn get(&self, question_id: QuestionId) -> Option<&QuizAnswer> {
        self.answers.get(&question_id)
    }

    pub fn label(&self, question_id: QuestionId) -> Option<&str> {
        self.get(question_id).map(|answer| answer.answer.as_str())
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == QuestionId::ALL.len()
    }

    /// Every answer checked against the question table.
    pub fn resolved(&self) -> Result<Self, QuizError> {
        self.iter().map(QuizAnswer::resolved).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuizAnswer> {
        self.answers.values()
    }
}

impl FromIterator<QuizAnswer> for QuizAnswers {
    fn from_iter<I: IntoIterator<Item = QuizAnswer>>(iter: I) -> Self {
        let mut answers = Self::new();
        for answer in iter {
            answers.record(answer);
        }
        answers
    }
}

impl From<Vec<QuizAnswer>> for QuizAnswers {
    fn from(value: Vec<QuizAnswer>) -> Self {
        value.into_iter().collect()
    }
}

impl From<QuizAnswers> for Vec<QuizAnswer> {
    fn from(value: QuizAnswers) -> Self {
        value.answers.into_values().collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientProfile {
    pub relationship: String,
    pub age: String,
    pub personality: String,
    pub occasion: String,
    pub budget: String,
    pub interests: Vec<String>,
}

impl Default for RecipientProfile {
    fn default() -> Self {
        Self::from_answers(&QuizAnswers::default())
    }
}

impl RecipientProfile {
    /// Every field is filled, falling back to fixed per-question defaults.
    pub fn from_answers(answers: &QuizAnswers) -> Self {
        let pick = |id: QuestionId, fallback: &str| {
            answers.label(id).unwrap_or(fallback).to_string()
        };

        Self {
            relationship: pick(QuestionId::Relationship, DEFAULT_RELATIONSHIP),
            age: pick(QuestionId::Age, DEFAULT_AGE),
            personality: pick(QuestionId::Personality, DEFAULT_PERSONALITY),
            occasion: pick(QuestionId::Occasion, DEFAULT_OCCASION),
            budget: pick(QuestionId::Budget, DEFAULT_BUDGET),
            interests: vec![
                pick(QuestionId::Interests, DEFAULT_INTEREST),
                pick(QuestionId::Surprise, DEFAULT_SURPRISE),
                pick(QuestionId::Emotional, DEFAULT_EMOTIONAL),
            ],
        }
    }
}

/// The profile plus the two free-text answers the scorer and explanations use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub profile: RecipientProfile,
    #[serde(default)]
    pub emotional: Option<String>,
    #[serde(default)]
    pub surprise: Option<String>,
}

impl RecommendationRequest {
    pub fn new(profile: RecipientProfile) -> Self {
        Self { profile, emotional: None, surprise: None }
    }

    pub fn from_answers(answers: &QuizAnswers) -> Self {
        Self {
            profile: RecipientProfile::from_answers(answers),
            emotional: answers.label(QuestionId::Emotional).map(str::to_string),
            surprise: answers.label(QuestionId::Surprise).map(str::to_string),
        }
    }

    pub fn with_emotional(mut self, emotional: impl Into<String>) -> Self {
        self.emotional = Some(emotional.into());
        self
    }

    pub fn with_surprise(mut self, surprise: impl Into<String>) -> Self {
        self.surprise = Some(surprise.into());
        self
    }

    /// Tags compared against product tags: interests, then the emotional and
    /// surprise answers when present.
    pub fn user_tags(&self) -> Vec<&str> {
        self.profile
            .interests
            .iter()
            .map(String::as_str)
            .chain(self.emotional.as_deref())
            .chain(self.surprise.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        QuizAnswer, QuizAnswers, QuizError, RecipientProfile, RecommendationRequest,
        DEFAULT_AGE, DEFAULT_BUDGET, DEFAULT_RELATIONSHIP,
    };
    use crate::domain::questions::QuestionId;

    #[test]
    fn empty_answers_produce_fully_defaulted_profile() {
        let profile = RecipientProfile::from_answers(&QuizAnswers::new());

        assert_eq!(profile.relationship, DEFAULT_RELATIONSHIP);
        assert_eq!(profile.age, DEFAULT_AGE);
        assert_eq!(profile.budget, DEFAULT_BUDGET);
        assert_eq!(
            profile.interests,
            vec!["Moda e beleza", "Algo útil para o dia a dia", "Amor e carinho"]
        );
    }

    #[test]
    fn later_answer_overwrites_earlier_one() -> Result<(), QuizError> {
        let mut answers = QuizAnswers::new();
        answers.record(QuizAnswer::from_choice(QuestionId::Relationship, 1)?);
        let previous = answers.record(QuizAnswer::from_choice(QuestionId::Relationship, 3)?);

        assert_eq!(previous.map(|answer| answer.answer), Some("Namorado(a)".to_string()));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.label(QuestionId::Relationship), Some("Mãe/Pai"));
        Ok(())
    }

    #[test]
    fn unknown_option_value_is_rejected() {
        let error = QuizAnswer::from_choice(QuestionId::Age, 6);
        assert_eq!(error, Err(QuizError::UnknownOption { question: QuestionId::Age, value: 6 }));
    }

    #[test]
    fn answers_deserialize_from_wire_list_with_overwrite() {
        let raw = r#"[
            {"questionId": "budget", "answer": "Até R$ 50", "value": 1},
            {"questionId": "budget", "answer": "R$ 301 - R$ 500", "value": 4},
            {"questionId": "emotional", "answer": "Diversão e alegria", "value": 4}
        ]"#;

        let answers: QuizAnswers = serde_json::from_str(raw).expect("answers should parse");
        let request = RecommendationRequest::from_answers(&answers);

        assert_eq!(request.profile.budget, "R$ 301 - R$ 500");
        assert_eq!(request.emotional.as_deref(), Some("Diversão e alegria"));
        assert_eq!(request.surprise, None);
        assert_eq!(request.profile.interests[2], "Diversão e alegria");
    }

    #[test]
    fn user_tags_include_free_text_answers() {
        let request = RecommendationRequest::new(RecipientProfile::default())
            .with_emotional("Gratidão e reconhecimento")
            .with_surprise("Experiências memoráveis");

        let tags = request.user_tags();
        assert_eq!(tags.len(), 5);
        assert_eq!(tags[3], "Gratidão e reconhecimento");
        assert_eq!(tags[4], "Experiências memoráveis");
    }

    #[test]
    fn resolution_accepts_value_or_label_and_rejects_strangers() {
        let by_label: QuizAnswers = serde_json::from_str(r#"[{"questionId": "occasion", "answer": "Natal"}]"#)
            .expect("answers should parse");
        let resolved = by_label.resolved().expect("known label");
        assert_eq!(resolved.get(QuestionId::Occasion).map(|answer| answer.value), Some(3));

        let stranger = QuizAnswer {
            question_id: QuestionId::Budget,
            answer: "Um milhão".to_string(),
            value: 9,
        };
        assert_eq!(
            stranger.resolved(),
            Err(QuizError::UnknownLabel { question: QuestionId::Budget, label: "Um milhão".to_string() })
        );
    }
}
