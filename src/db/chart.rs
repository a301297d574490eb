use color_eyre::Result;

use super::models::ChartArtifact;
use super::Db;

impl Db {
    pub async fn chart_artifact(&self, question_id: i64) -> Result<Option<ChartArtifact>> {
        let artifact = sqlx::query_as::<_, ChartArtifact>(
            r#"
            SELECT id, survey_id, question_id, path, generated_at
            FROM chart_artifacts
            WHERE question_id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(artifact)
    }

    /// Record a freshly rendered artifact, replacing any previous
    /// record for the question.
    pub async fn record_chart_artifact(
        &self,
        survey_id: i64,
        question_id: i64,
        path: &str,
        generated_at: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chart_artifacts (survey_id, question_id, path, generated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(question_id)
            DO UPDATE SET path = excluded.path, generated_at = excluded.generated_at
            "#,
        )
        .bind(survey_id)
        .bind(question_id)
        .bind(path)
        .bind(generated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_chart_artifact(&self, question_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM chart_artifacts WHERE question_id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
