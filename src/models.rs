use serde::Deserialize;

/// The closed set of question types. Adding a variant is a
/// compile-time-checked change across the value codec, the form
/// builder and the aggregator, all of which match exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Boolean,
    Num,
    Star,
    Text,
    Choice,
}

impl QuestionKind {
    /// Single-letter storage code for the `questions.question_type` column.
    pub fn code(self) -> &'static str {
        match self {
            QuestionKind::Boolean => "B",
            QuestionKind::Num => "N",
            QuestionKind::Star => "S",
            QuestionKind::Text => "T",
            QuestionKind::Choice => "C",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(QuestionKind::Boolean),
            "N" => Some(QuestionKind::Num),
            "S" => Some(QuestionKind::Star),
            "T" => Some(QuestionKind::Text),
            "C" => Some(QuestionKind::Choice),
            _ => None,
        }
    }
}

/// Star ratings use a fixed discrete range.
pub const STAR_MIN: i64 = 0;
pub const STAR_MAX: i64 = 5;

// --- Survey definition structs, consumed by `Db::load_survey`.
// Operator tooling feeds these in as JSON; tests build them directly.

#[derive(Debug, Deserialize)]
pub struct SurveyDef {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub outro: String,
    pub pages: Vec<PageDef>,
}

#[derive(Debug, Deserialize)]
pub struct PageDef {
    #[serde(default)]
    pub intro: String,
    pub questions: Vec<QuestionDef>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionDef {
    pub kind: QuestionKind,
    pub text: String,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Ordered (value, label) pairs; only meaningful for CHOICE.
    #[serde(default)]
    pub choices: Vec<(String, String)>,
    #[serde(default)]
    pub choices_blank_allowed: bool,
    #[serde(default)]
    pub num_min: Option<i64>,
    #[serde(default)]
    pub num_max: Option<i64>,
}

fn default_required() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_round_trip() {
        for kind in [
            QuestionKind::Boolean,
            QuestionKind::Num,
            QuestionKind::Star,
            QuestionKind::Text,
            QuestionKind::Choice,
        ] {
            assert_eq!(QuestionKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(QuestionKind::from_code("X"), None);
    }

    #[test]
    fn question_def_defaults() {
        let def: QuestionDef =
            serde_json::from_str(r#"{"kind": "text", "text": "Any comments?"}"#).unwrap();
        assert_eq!(def.kind, QuestionKind::Text);
        assert!(def.required);
        assert!(def.choices.is_empty());
        assert!(def.num_min.is_none());
    }
}
