// Database model structs

use crate::models::QuestionKind;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Survey {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
    pub editable: bool,
    /// Result-access capability token, generated once at creation.
    pub token: String,
    pub intro: String,
    pub outro: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Page {
    pub id: i64,
    pub survey_id: i64,
    pub rank: i64,
    pub intro: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub page_id: i64,
    pub rank: i64,
    pub question_type: String,
    pub question_text: String,
    pub required: bool,
    /// JSON-encoded ordered (value, label) pairs; CHOICE only.
    pub choices: Option<String>,
    pub choices_blank_allowed: bool,
    pub num_answer_min: Option<i64>,
    pub num_answer_max: Option<i64>,
}

impl Question {
    /// Decode the stored type code. An unknown code is unreachable under
    /// valid configuration and surfaces as an integrity error.
    pub fn kind(&self) -> Result<QuestionKind, ValueError> {
        QuestionKind::from_code(&self.question_type).ok_or_else(|| ValueError::Integrity {
            question_id: self.id,
            detail: format!("unknown question type `{}`", self.question_type),
        })
    }

    pub fn choice_pairs(&self) -> Vec<(String, String)> {
        self.choices
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default()
    }

    /// First few words of the question text, for result headings.
    pub fn short_text(&self) -> String {
        let mut words = self.question_text.split_whitespace();
        let short: Vec<&str> = words.by_ref().take(5).collect();
        if words.next().is_some() {
            format!("{} ...", short.join(" "))
        } else {
            short.join(" ")
        }
    }
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct AnswerGroup {
    pub id: i64,
    pub survey_id: i64,
    /// Page currently being filled; NULL once the session is complete.
    pub page_id: Option<i64>,
    /// Respondent session token; distinct namespace from `Survey::token`.
    pub token: String,
}

impl AnswerGroup {
    pub fn is_complete(&self) -> bool {
        self.page_id.is_none()
    }
}

/// A stored answer value in its storage representation.
#[derive(Clone, Debug, PartialEq)]
pub enum AnswerValue {
    Bool(bool),
    Num(i64),
    Star(i64),
    Text(String),
    Choice(String),
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub answer_group_id: i64,
    pub bool_answer: Option<bool>,
    pub num_answer: Option<i64>,
    pub star_answer: Option<i64>,
    pub text_answer: Option<String>,
    pub choices_answer: Option<String>,
    /// Whole Unix seconds; drives chart staleness checks.
    pub updated_at: i64,
}

impl Answer {
    /// Whether the slot selected by the question's type is populated.
    /// This is the sole "answered" predicate used for form resumption
    /// and aggregation denominators.
    pub fn has_value(&self, kind: QuestionKind) -> bool {
        match kind {
            QuestionKind::Boolean => self.bool_answer.is_some(),
            QuestionKind::Num => self.num_answer.is_some(),
            QuestionKind::Star => self.star_answer.is_some(),
            QuestionKind::Text => self.text_answer.is_some(),
            QuestionKind::Choice => self.choices_answer.is_some(),
        }
    }

    /// The populated slot in its storage representation, or `None` when
    /// the question has not been answered yet.
    pub fn value(&self, kind: QuestionKind) -> Option<AnswerValue> {
        match kind {
            QuestionKind::Boolean => self.bool_answer.map(AnswerValue::Bool),
            QuestionKind::Num => self.num_answer.map(AnswerValue::Num),
            QuestionKind::Star => self.star_answer.map(AnswerValue::Star),
            QuestionKind::Text => self.text_answer.clone().map(AnswerValue::Text),
            QuestionKind::Choice => self.choices_answer.clone().map(AnswerValue::Choice),
        }
    }

    /// The exact string token the form widgets expect: "1"/"0" for
    /// boolean, the numeric string for star, the plain value otherwise.
    pub fn form_value(&self, kind: QuestionKind) -> Option<String> {
        match kind {
            QuestionKind::Boolean => self
                .bool_answer
                .map(|b| if b { "1" } else { "0" }.to_string()),
            QuestionKind::Num => self.num_answer.map(|n| n.to_string()),
            QuestionKind::Star => self.star_answer.map(|n| n.to_string()),
            QuestionKind::Text => self.text_answer.clone(),
            QuestionKind::Choice => self.choices_answer.clone(),
        }
    }
}

/// Generation record for a question's chart artifact. One per
/// question; the path and timestamp here are authoritative, the
/// filename is informational.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ChartArtifact {
    pub id: i64,
    pub survey_id: i64,
    pub question_id: i64,
    pub path: String,
    /// Whole Unix seconds, compared against `answers.updated_at`.
    pub generated_at: i64,
}

/// Errors from the value codec.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// A submitted value does not convert to the question type's storage
    /// representation, or violates a declared bound. Recovered locally.
    #[error("value `{value}` is not valid for question {question_id}")]
    Validation { question_id: i64, value: String },

    /// A question's stored state does not match any known handling
    /// branch. Unreachable under valid configuration; signals corruption.
    #[error("integrity error for question {question_id}: {detail}")]
    Integrity { question_id: i64, detail: String },
}

/// Chart-ready aggregate: ordered (label, count) buckets, with the
/// implicit "no answer" bucket appended last.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub buckets: Vec<(String, i64)>,
}

impl Dataset {
    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<i64> {
        self.buckets.iter().map(|&(_, count)| count).collect()
    }

    pub fn total(&self) -> i64 {
        self.counts().iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer() -> Answer {
        Answer {
            id: 1,
            question_id: 1,
            answer_group_id: 1,
            bool_answer: None,
            num_answer: None,
            star_answer: None,
            text_answer: None,
            choices_answer: None,
            updated_at: 0,
        }
    }

    #[test]
    fn slots_are_selected_by_kind() {
        let mut a = answer();
        a.bool_answer = Some(true);
        assert!(a.has_value(QuestionKind::Boolean));
        assert!(!a.has_value(QuestionKind::Num));
        assert_eq!(a.value(QuestionKind::Boolean), Some(AnswerValue::Bool(true)));
        assert_eq!(a.value(QuestionKind::Text), None);
    }

    #[test]
    fn form_values_use_widget_tokens() {
        let mut a = answer();
        a.bool_answer = Some(false);
        a.star_answer = Some(4);
        assert_eq!(a.form_value(QuestionKind::Boolean).as_deref(), Some("0"));
        assert_eq!(a.form_value(QuestionKind::Star).as_deref(), Some("4"));
    }

    #[test]
    fn short_text_truncates_at_five_words() {
        let q = Question {
            id: 1,
            page_id: 1,
            rank: 1,
            question_type: "T".into(),
            question_text: "How did you hear about our service this year?".into(),
            required: true,
            choices: None,
            choices_blank_allowed: false,
            num_answer_min: None,
            num_answer_max: None,
        };
        assert_eq!(q.short_text(), "How did you hear about ...");
    }
}
