use std::collections::HashMap;

use color_eyre::Result;

use super::models::{Dataset, Question};
use super::Db;
use crate::models::QuestionKind;

impl Db {
    /// Compute the per-question aggregate distribution over all answers
    /// of a survey: ordered (label, count) buckets plus the implicit
    /// "None" bucket. Returns `Ok(None)` when there is nothing to chart
    /// (no answers at all, or a TEXT question).
    ///
    /// For every type the bucket counts and the "None" bucket sum to the
    /// number of answer groups of the survey, exactly.
    pub async fn aggregate(&self, survey_id: i64, question: &Question) -> Result<Option<Dataset>> {
        let kind = question.kind()?;

        if self.answers_count(question.id).await? == 0 {
            return Ok(None);
        }

        let denominator = self.answer_groups_count(survey_id).await?;

        let dataset = match kind {
            QuestionKind::Boolean => {
                let (total_true, total_false) = self.bool_counts(survey_id, question.id).await?;
                let dna = denominator - (total_true + total_false);
                Dataset {
                    buckets: vec![
                        ("True".to_string(), total_true),
                        ("False".to_string(), total_false),
                        ("None".to_string(), dna),
                    ],
                }
            }
            QuestionKind::Num => {
                let counts = self
                    .int_slot_counts(survey_id, question.id, "num_answer")
                    .await?;
                // Declared bounds win; otherwise fall back to the
                // observed extremes.
                let observed_min = counts.keys().min().copied();
                let observed_max = counts.keys().max().copied();
                let (Some(bottom), Some(top)) = (
                    question.num_answer_min.or(observed_min),
                    question.num_answer_max.or(observed_max),
                ) else {
                    return Ok(None);
                };

                let mut buckets = Vec::new();
                let mut answered = 0;
                for num in bottom..=top {
                    let count = counts.get(&num).copied().unwrap_or(0);
                    answered += count;
                    buckets.push((num.to_string(), count));
                }
                buckets.push(("None".to_string(), denominator - answered));
                Dataset { buckets }
            }
            QuestionKind::Star => {
                let counts = self
                    .int_slot_counts(survey_id, question.id, "star_answer")
                    .await?;
                let mut buckets = Vec::new();
                let mut answered = 0;
                for num in (1..=5).rev() {
                    let count = counts.get(&num).copied().unwrap_or(0);
                    answered += count;
                    buckets.push((num.to_string(), count));
                }
                buckets.push(("None".to_string(), denominator - answered));
                Dataset { buckets }
            }
            // Free-form text has no aggregate representation.
            QuestionKind::Text => return Ok(None),
            QuestionKind::Choice => {
                let counts = self.choice_counts(survey_id, question.id).await?;
                let mut buckets = Vec::new();
                let mut answered = 0;
                for (value, label) in question.choice_pairs() {
                    let count = counts.get(&value).copied().unwrap_or(0);
                    answered += count;
                    buckets.push((label, count));
                }
                buckets.push(("None".to_string(), denominator - answered));
                Dataset { buckets }
            }
        };

        Ok(Some(dataset))
    }

    async fn bool_counts(&self, survey_id: i64, question_id: i64) -> Result<(i64, i64)> {
        let rows: Vec<(bool, i64)> = sqlx::query_as(
            r#"
            SELECT a.bool_answer, COUNT(*)
            FROM answers a
            JOIN answer_groups g ON g.id = a.answer_group_id
            WHERE g.survey_id = $1 AND a.question_id = $2 AND a.bool_answer IS NOT NULL
            GROUP BY a.bool_answer
            "#,
        )
        .bind(survey_id)
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        let mut total_true = 0;
        let mut total_false = 0;
        for (value, count) in rows {
            if value {
                total_true = count;
            } else {
                total_false = count;
            }
        }
        Ok((total_true, total_false))
    }

    /// Per-value counts for an integer slot (`num_answer` or `star_answer`).
    async fn int_slot_counts(
        &self,
        survey_id: i64,
        question_id: i64,
        column: &str,
    ) -> Result<HashMap<i64, i64>> {
        let sql = format!(
            r#"
            SELECT a.{column}, COUNT(*)
            FROM answers a
            JOIN answer_groups g ON g.id = a.answer_group_id
            WHERE g.survey_id = $1 AND a.question_id = $2 AND a.{column} IS NOT NULL
            GROUP BY a.{column}
            "#,
        );
        let rows: Vec<(i64, i64)> = sqlx::query_as(&sql)
            .bind(survey_id)
            .bind(question_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }

    async fn choice_counts(
        &self,
        survey_id: i64,
        question_id: i64,
    ) -> Result<HashMap<String, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT a.choices_answer, COUNT(*)
            FROM answers a
            JOIN answer_groups g ON g.id = a.answer_group_id
            WHERE g.survey_id = $1 AND a.question_id = $2 AND a.choices_answer IS NOT NULL
            GROUP BY a.choices_answer
            "#,
        )
        .bind(survey_id)
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
