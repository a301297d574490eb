use color_eyre::{eyre::OptionExt, Result};

use super::models::AnswerGroup;
use super::Db;
use crate::utils;

impl Db {
    /// Start a fresh respondent session for a survey: new opaque token,
    /// page pointer at the rank-1 page.
    pub async fn create_answer_group(&self, survey_id: i64) -> Result<AnswerGroup> {
        let token = utils::generate_token();
        let first_page = self
            .page_by_rank(survey_id, 1)
            .await?
            .ok_or_eyre("survey has no pages")?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO answer_groups (survey_id, page_id, token) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(survey_id)
        .bind(first_page.id)
        .bind(&token)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("answer group created: id={id} survey={survey_id}");

        Ok(AnswerGroup {
            id,
            survey_id,
            page_id: Some(first_page.id),
            token,
        })
    }

    /// Resolve a respondent credential. `None` means the token is
    /// unknown or stale; callers start a fresh session in that case.
    pub async fn answer_group(&self, survey_id: i64, token: &str) -> Result<Option<AnswerGroup>> {
        let group = sqlx::query_as::<_, AnswerGroup>(
            "SELECT id, survey_id, page_id, token FROM answer_groups WHERE survey_id = $1 AND token = $2",
        )
        .bind(survey_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Move the page pointer. `None` marks the session complete; the
    /// pointer only ever moves forward, and never away from complete.
    pub async fn set_current_page(&self, group_id: i64, page_id: Option<i64>) -> Result<()> {
        sqlx::query(
            "UPDATE answer_groups SET page_id = $1, updated_at = strftime('%s', 'now') WHERE id = $2",
        )
        .bind(page_id)
        .bind(group_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Aggregation denominator: every respondent session counts once,
    /// answered or not.
    pub async fn answer_groups_count(&self, survey_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM answer_groups WHERE survey_id = $1")
                .bind(survey_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
