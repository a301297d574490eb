use color_eyre::Result;

use super::models::{Question, Survey};
use super::Db;

impl Db {
    pub async fn question_by_id(&self, question_id: i64) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, page_id, rank, question_type, question_text, required,
                   choices, choices_blank_allowed, num_answer_min, num_answer_max
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    /// Questions of one page, in rank order.
    pub async fn questions_for_page(&self, page_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, page_id, rank, question_type, question_text, required,
                   choices, choices_blank_allowed, num_answer_min, num_answer_max
            FROM questions
            WHERE page_id = $1
            ORDER BY rank
            "#,
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// All questions of a survey in presentation order (page rank, then
    /// question rank). Used by the results view.
    pub async fn questions_for_survey(&self, survey_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT q.id, q.page_id, q.rank, q.question_type, q.question_text, q.required,
                   q.choices, q.choices_blank_allowed, q.num_answer_min, q.num_answer_max
            FROM questions q
            JOIN pages p ON p.id = q.page_id
            WHERE p.survey_id = $1
            ORDER BY p.rank, q.rank
            "#,
        )
        .bind(survey_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// The survey a question belongs to, through its page.
    pub async fn survey_for_question(&self, question_id: i64) -> Result<Option<Survey>> {
        let survey = sqlx::query_as::<_, Survey>(
            r#"
            SELECT s.id, s.name, s.slug, s.logo, s.editable, s.token, s.intro, s.outro
            FROM surveys s
            JOIN pages p ON p.survey_id = s.id
            JOIN questions q ON q.page_id = p.id
            WHERE q.id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(survey)
    }
}
