use color_eyre::Result;
use std::collections::HashMap;

use super::models::{Answer, AnswerValue, Question, ValueError};
use super::Db;
use crate::models::QuestionKind;

#[derive(Debug, thiserror::Error)]
pub enum SetValueError {
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Convert a raw submitted scalar into the question type's storage
/// representation. All conversion failures normalize to a single
/// validation error naming the offending value and question.
pub(crate) fn parse_value(question: &Question, raw: &str) -> Result<AnswerValue, ValueError> {
    let invalid = || ValueError::Validation {
        question_id: question.id,
        value: raw.to_string(),
    };

    match question.kind()? {
        QuestionKind::Boolean => {
            let value = match raw {
                "true" => true,
                "false" => false,
                _ => raw.parse::<i64>().map_err(|_| invalid())? != 0,
            };
            Ok(AnswerValue::Bool(value))
        }
        QuestionKind::Num => {
            let value = raw.parse::<i64>().map_err(|_| invalid())?;
            if let Some(min) = question.num_answer_min {
                if value < min {
                    return Err(invalid());
                }
            }
            if let Some(max) = question.num_answer_max {
                if value > max {
                    return Err(invalid());
                }
            }
            Ok(AnswerValue::Num(value))
        }
        // Star range is enforced by the storage constraint, not here.
        QuestionKind::Star => Ok(AnswerValue::Star(
            raw.parse::<i64>().map_err(|_| invalid())?,
        )),
        QuestionKind::Text => Ok(AnswerValue::Text(raw.to_string())),
        // Validity against the declared choice set is the form layer's job.
        QuestionKind::Choice => Ok(AnswerValue::Choice(raw.to_string())),
    }
}

impl Db {
    /// Store one submitted value into the answer slot matching the
    /// question's type: create-on-first-write, update thereafter. A
    /// rejected value leaves any previously stored value unchanged.
    pub async fn set_answer_value(
        &self,
        group_id: i64,
        question: &Question,
        raw: &str,
    ) -> Result<(), SetValueError> {
        let value = parse_value(question, raw)?;

        let column = match value {
            AnswerValue::Bool(_) => "bool_answer",
            AnswerValue::Num(_) => "num_answer",
            AnswerValue::Star(_) => "star_answer",
            AnswerValue::Text(_) => "text_answer",
            AnswerValue::Choice(_) => "choices_answer",
        };
        let sql = format!(
            r#"
            INSERT INTO answers (answer_group_id, question_id, {column})
            VALUES ($1, $2, $3)
            ON CONFLICT(answer_group_id, question_id)
            DO UPDATE SET {column} = excluded.{column}, updated_at = strftime('%s', 'now')
            "#,
        );

        let query = sqlx::query(&sql).bind(group_id).bind(question.id);
        let query = match &value {
            AnswerValue::Bool(b) => query.bind(*b),
            AnswerValue::Num(n) | AnswerValue::Star(n) => query.bind(*n),
            AnswerValue::Text(s) | AnswerValue::Choice(s) => query.bind(s),
        };
        query.execute(&self.pool).await?;

        tracing::debug!(
            "answer stored for group={group_id} question={}: {value:?}",
            question.id
        );
        Ok(())
    }

    pub async fn answer(&self, group_id: i64, question_id: i64) -> Result<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, answer_group_id, bool_answer, num_answer,
                   star_answer, text_answer, choices_answer, updated_at
            FROM answers
            WHERE answer_group_id = $1 AND question_id = $2
            "#,
        )
        .bind(group_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(answer)
    }

    /// All answers of one respondent session, keyed by question id.
    /// Used to prefill the page form on re-render and resume.
    pub async fn answers_for_group(&self, group_id: i64) -> Result<HashMap<i64, Answer>> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, answer_group_id, bool_answer, num_answer,
                   star_answer, text_answer, choices_answer, updated_at
            FROM answers
            WHERE answer_group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers.into_iter().map(|a| (a.question_id, a)).collect())
    }

    /// Number of answers stored for a question across the whole survey.
    pub async fn answers_count(&self, question_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM answers WHERE question_id = $1")
            .bind(question_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Most recent modification time (whole Unix seconds) over all
    /// answers to a question. `None` when the question has no answers.
    pub async fn latest_answer_update(&self, question_id: i64) -> Result<Option<i64>> {
        let latest: Option<i64> =
            sqlx::query_scalar("SELECT MAX(updated_at) FROM answers WHERE question_id = $1")
                .bind(question_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(latest)
    }
}
