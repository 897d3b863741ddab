//! The fixed eight-question quiz shown to the gift giver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionId {
    Relationship,
    Age,
    Personality,
    Interests,
    Occasion,
    Budget,
    Surprise,
    Emotional,
}

impl QuestionId {
    pub const ALL: [QuestionId; 8] = [
        Self::Relationship,
        Self::Age,
        Self::Personality,
        Self::Interests,
        Self::Occasion,
        Self::Budget,
        Self::Surprise,
        Self::Emotional,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relationship => "relationship",
            Self::Age => "age",
            Self::Personality => "personality",
            Self::Interests => "interests",
            Self::Occasion => "occasion",
            Self::Budget => "budget",
            Self::Surprise => "surprise",
            Self::Emotional => "emotional",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| format!("unknown question `{}`", value.trim()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub text: &'static str,
    pub value: u8,
    pub emoji: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: &'static str,
    pub options: &'static [QuestionOption],
}

impl Question {
    pub fn option(&self, value: u8) -> Option<&'static QuestionOption> {
        self.options.iter().find(|option| option.value == value)
    }

    pub fn option_by_text(&self, text: &str) -> Option<&'static QuestionOption> {
        let text = text.trim();
        self.options.iter().find(|option| option.text == text)
    }
}

const fn opt(text: &'static str, value: u8, emoji: &'static str) -> QuestionOption {
    QuestionOption { text, value, emoji }
}

pub const QUESTIONS: &[Question] = &[
    Question {
        id: QuestionId::Relationship,
        text: "Qual o seu relacionamento com a pessoa?",
        options: &[
            opt("Namorado(a)", 1, "💕"),
            opt("Marido/Esposa", 2, "💑"),
            opt("Mãe/Pai", 3, "👨‍👩‍👧‍👦"),
            opt("Irmão/Irmã", 4, "👫"),
            opt("Amigo(a)", 5, "🤝"),
            opt("Outro familiar", 6, "👪"),
        ],
    },
    Question {
        id: QuestionId::Age,
        text: "Qual a faixa etária da pessoa?",
        options: &[
            opt("18-25 anos", 1, "🎓"),
            opt("26-35 anos", 2, "💼"),
            opt("36-50 anos", 3, "🏡"),
            opt("51-65 anos", 4, "👨‍💼"),
            opt("65+ anos", 5, "👴"),
        ],
    },
    Question {
        id: QuestionId::Personality,
        text: "Como você descreveria a personalidade dela?",
        options: &[
            opt("Aventureira e espontânea", 1, "🌟"),
            opt("Calma e reflexiva", 2, "🧘‍♀️"),
            opt("Criativa e artística", 3, "🎨"),
            opt("Prática e organizada", 4, "📋"),
            opt("Sociável e extrovertida", 5, "🎉"),
        ],
    },
    Question {
        id: QuestionId::Interests,
        text: "Quais são os principais interesses dela?",
        options: &[
            opt("Esportes e fitness", 1, "🏃‍♀️"),
            opt("Leitura e cultura", 2, "📚"),
            opt("Tecnologia e gadgets", 3, "📱"),
            opt("Culinária e gastronomia", 4, "👨‍🍳"),
            opt("Moda e beleza", 5, "💄"),
            opt("Viagens e aventuras", 6, "✈️"),
        ],
    },
    Question {
        id: QuestionId::Occasion,
        text: "Qual é a ocasião do presente?",
        options: &[
            opt("Aniversário", 1, "🎂"),
            opt("Dia dos Namorados", 2, "💝"),
            opt("Natal", 3, "🎄"),
            opt("Dia das Mães/Pais", 4, "🌹"),
            opt("Sem ocasião especial", 5, "💐"),
            opt("Conquista pessoal", 6, "🏆"),
        ],
    },
    Question {
        id: QuestionId::Budget,
        text: "Qual o seu orçamento?",
        options: &[
            opt("Até R$ 50", 1, "💰"),
            opt("R$ 51 - R$ 150", 2, "💸"),
            opt("R$ 151 - R$ 300", 3, "💳"),
            opt("R$ 301 - R$ 500", 4, "🏦"),
            opt("Acima de R$ 500", 5, "💎"),
        ],
    },
    Question {
        id: QuestionId::Surprise,
        text: "Que tipo de surpresa ela mais aprecia?",
        options: &[
            opt("Algo útil para o dia a dia", 1, "🏠"),
            opt("Experiências memoráveis", 2, "🎪"),
            opt("Algo feito à mão/personalizado", 3, "💝"),
            opt("Luxo e sofisticação", 4, "👑"),
            opt("Algo engraçado e divertido", 5, "😄"),
        ],
    },
    Question {
        id: QuestionId::Emotional,
        text: "O que você mais quer transmitir com este presente?",
        options: &[
            opt("Amor e carinho", 1, "❤️"),
            opt("Gratidão e reconhecimento", 2, "🙏"),
            opt("Apoio e encorajamento", 3, "💪"),
            opt("Diversão e alegria", 4, "😊"),
            opt("Cuidado e proteção", 5, "🛡️"),
        ],
    },
];

pub fn question(id: QuestionId) -> &'static Question {
    // QUESTIONS is declared in QuestionId::ALL order.
    &QUESTIONS[id as usize]
}
