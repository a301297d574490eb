use color_eyre::Result;

use super::models::{Page, Survey};
use super::Db;
use crate::models::SurveyDef;
use crate::utils;

impl Db {
    /// Insert a survey with all its pages and questions atomically in a
    /// transaction. Page and question ranks are assigned as a dense
    /// 1-based sequence in definition order. The result-access token is
    /// generated here, once, and never reassigned.
    pub async fn load_survey(&self, def: SurveyDef) -> Result<i64> {
        let token = utils::generate_token();
        let mut tx = self.pool.begin().await?;

        let survey_id: i64 = sqlx::query_scalar(
            "INSERT INTO surveys (name, slug, logo, token, intro, outro) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&def.name)
        .bind(&def.slug)
        .bind(&def.logo)
        .bind(&token)
        .bind(&def.intro)
        .bind(&def.outro)
        .fetch_one(&mut *tx)
        .await?;

        for (page_idx, page) in def.pages.iter().enumerate() {
            let page_id: i64 = sqlx::query_scalar(
                "INSERT INTO pages (survey_id, rank, intro) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(survey_id)
            .bind(page_idx as i64 + 1)
            .bind(&page.intro)
            .fetch_one(&mut *tx)
            .await?;

            for (question_idx, question) in page.questions.iter().enumerate() {
                let choices = if question.choices.is_empty() {
                    None
                } else {
                    Some(serde_json::to_string(&question.choices)?)
                };

                sqlx::query(
                    r#"
                    INSERT INTO questions
                        (page_id, rank, question_type, question_text, required,
                         choices, choices_blank_allowed, num_answer_min, num_answer_max)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    "#,
                )
                .bind(page_id)
                .bind(question_idx as i64 + 1)
                .bind(question.kind.code())
                .bind(&question.text)
                .bind(question.required)
                .bind(&choices)
                .bind(question.choices_blank_allowed)
                .bind(question.num_min)
                .bind(question.num_max)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!("survey loaded: id={survey_id} slug={}", def.slug);
        Ok(survey_id)
    }

    pub async fn survey_by_slug(&self, slug: &str) -> Result<Option<Survey>> {
        let survey = sqlx::query_as::<_, Survey>(
            "SELECT id, name, slug, logo, editable, token, intro, outro FROM surveys WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(survey)
    }

    pub async fn survey_by_id(&self, survey_id: i64) -> Result<Option<Survey>> {
        let survey = sqlx::query_as::<_, Survey>(
            "SELECT id, name, slug, logo, editable, token, intro, outro FROM surveys WHERE id = $1",
        )
        .bind(survey_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(survey)
    }

    /// Result-view lookup: the survey token is the access capability.
    pub async fn survey_by_id_and_token(
        &self,
        survey_id: i64,
        token: &str,
    ) -> Result<Option<Survey>> {
        let survey = sqlx::query_as::<_, Survey>(
            "SELECT id, name, slug, logo, editable, token, intro, outro FROM surveys WHERE id = $1 AND token = $2",
        )
        .bind(survey_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(survey)
    }

    pub async fn page_by_rank(&self, survey_id: i64, rank: i64) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            "SELECT id, survey_id, rank, intro FROM pages WHERE survey_id = $1 AND rank = $2",
        )
        .bind(survey_id)
        .bind(rank)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    pub async fn page_by_id(&self, page_id: i64) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            "SELECT id, survey_id, rank, intro FROM pages WHERE id = $1",
        )
        .bind(page_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    pub async fn last_page(&self, survey_id: i64) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            "SELECT id, survey_id, rank, intro FROM pages WHERE survey_id = $1 ORDER BY rank DESC LIMIT 1",
        )
        .bind(survey_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }
}
