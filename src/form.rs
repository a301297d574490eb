//! Form builder: turns a page's questions and any existing answers into
//! a data-only field-descriptor list, and validates submitted data
//! against it. Rendering lives in the view layer; persistence in the
//! value codec. Field-level checks here are independent of, and happen
//! before, codec-level persistence.

use std::collections::HashMap;

use crate::db::models::{Answer, Question, ValueError};
use crate::models::{QuestionKind, STAR_MAX, STAR_MIN};
use crate::names;

#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    /// Binary choice rendered as a "1"/"0" radio pair.
    Boolean,
    /// Bounded integer; absent bounds mean unbounded.
    Number { min: Option<i64>, max: Option<i64> },
    /// Integer restricted to the fixed 0-5 set.
    Star,
    /// Free-form multiline string.
    Text,
    /// Single select over declared (value, label) pairs; a blank option
    /// is injected iff the question allows it.
    Choice {
        options: Vec<(String, String)>,
        blank_allowed: bool,
    },
}

#[derive(Clone, Debug)]
pub struct Field {
    /// Stable per-question key, `question-<id>`.
    pub name: String,
    pub question_id: i64,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
    /// Current value: the stored answer on initial render, the raw
    /// submission on re-render.
    pub value: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Form {
    pub fields: Vec<Field>,
}

impl Form {
    /// One field per question, in question rank order, prefilled from
    /// the respondent's existing answers.
    pub fn build(
        questions: &[Question],
        answers: &HashMap<i64, Answer>,
    ) -> Result<Self, ValueError> {
        let mut fields = Vec::with_capacity(questions.len());

        for question in questions {
            let question_kind = question.kind()?;
            let kind = match question_kind {
                QuestionKind::Boolean => FieldKind::Boolean,
                QuestionKind::Num => FieldKind::Number {
                    min: question.num_answer_min,
                    max: question.num_answer_max,
                },
                QuestionKind::Star => FieldKind::Star,
                QuestionKind::Text => FieldKind::Text,
                QuestionKind::Choice => FieldKind::Choice {
                    options: question.choice_pairs(),
                    blank_allowed: question.choices_blank_allowed,
                },
            };

            let value = answers
                .get(&question.id)
                .filter(|answer| answer.has_value(question_kind))
                .and_then(|answer| answer.form_value(question_kind));

            fields.push(Field {
                name: names::question_field_name(question.id),
                question_id: question.id,
                label: question.question_text.clone(),
                required: question.required,
                kind,
                value,
                error: None,
            });
        }

        Ok(Form { fields })
    }

    /// Validate submitted key-value data against each field descriptor,
    /// recording a reason on every invalid field. Returns the overall
    /// outcome. Submitted raw values replace the fields' values so an
    /// invalid page re-renders with what the respondent typed.
    pub fn validate(&mut self, data: &HashMap<String, String>) -> bool {
        let mut valid = true;

        for field in &mut self.fields {
            let raw = data
                .get(&field.name)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            field.value = raw.map(str::to_string);
            field.error = match raw {
                None if field.required => Some("This field is required".to_string()),
                None => None,
                Some(raw) => check_field(&field.kind, raw),
            };
            valid &= field.error.is_none();
        }

        valid
    }

    pub fn field(&self, question_id: i64) -> Option<&Field> {
        self.fields.iter().find(|f| f.question_id == question_id)
    }
}

fn check_field(kind: &FieldKind, raw: &str) -> Option<String> {
    match kind {
        FieldKind::Boolean => {
            (raw != "1" && raw != "0").then(|| "Select one of the options".to_string())
        }
        FieldKind::Number { min, max } => match raw.parse::<i64>() {
            Err(_) => Some("Enter a whole number".to_string()),
            Ok(value) => {
                if let Some(min) = min {
                    if value < *min {
                        return Some(format!("Value must be at least {min}"));
                    }
                }
                if let Some(max) = max {
                    if value > *max {
                        return Some(format!("Value must be at most {max}"));
                    }
                }
                None
            }
        },
        FieldKind::Star => match raw.parse::<i64>() {
            Ok(value) if (STAR_MIN..=STAR_MAX).contains(&value) => None,
            _ => Some(format!("Pick a rating between {STAR_MIN} and {STAR_MAX}")),
        },
        FieldKind::Text => None,
        FieldKind::Choice { options, .. } => {
            // A submitted blank never reaches this point; it is treated
            // as absent and caught by the required check instead.
            let known = options.iter().any(|(value, _)| value == raw);
            (!known).then(|| "Select a valid choice".to_string())
        }
    }
}
