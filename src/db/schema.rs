// Database schema initialization

use color_eyre::Result;
use sqlx::SqlitePool;

pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS surveys (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            logo TEXT,
            editable BOOLEAN NOT NULL DEFAULT 0,
            token TEXT NOT NULL,
            intro TEXT NOT NULL DEFAULT '',
            outro TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pages (
            id INTEGER PRIMARY KEY,
            survey_id INTEGER NOT NULL,
            rank INTEGER NOT NULL,
            intro TEXT NOT NULL DEFAULT '',
            FOREIGN KEY(survey_id) REFERENCES surveys(id) ON DELETE CASCADE,
            UNIQUE(survey_id, rank)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY,
            page_id INTEGER NOT NULL,
            rank INTEGER NOT NULL,
            question_type TEXT NOT NULL CHECK(question_type IN ('B', 'N', 'S', 'T', 'C')),
            question_text TEXT NOT NULL,
            required BOOLEAN NOT NULL DEFAULT 1,
            choices TEXT,
            choices_blank_allowed BOOLEAN NOT NULL DEFAULT 0,
            num_answer_min INTEGER,
            num_answer_max INTEGER,
            FOREIGN KEY(page_id) REFERENCES pages(id) ON DELETE CASCADE,
            UNIQUE(page_id, rank)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS answer_groups (
            id INTEGER PRIMARY KEY,
            survey_id INTEGER NOT NULL,
            page_id INTEGER,
            token TEXT NOT NULL,
            created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            FOREIGN KEY(survey_id) REFERENCES surveys(id) ON DELETE CASCADE,
            FOREIGN KEY(page_id) REFERENCES pages(id) ON DELETE CASCADE,
            UNIQUE(survey_id, token)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One answer per (group, question); exactly one value slot is
    // populated, selected by the question's type.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS answers (
            id INTEGER PRIMARY KEY,
            question_id INTEGER NOT NULL,
            answer_group_id INTEGER NOT NULL,
            bool_answer BOOLEAN,
            num_answer INTEGER,
            star_answer INTEGER CHECK(star_answer IS NULL OR star_answer BETWEEN 0 AND 5),
            text_answer TEXT,
            choices_answer TEXT,
            created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            FOREIGN KEY(question_id) REFERENCES questions(id) ON DELETE CASCADE,
            FOREIGN KEY(answer_group_id) REFERENCES answer_groups(id) ON DELETE CASCADE,
            UNIQUE(answer_group_id, question_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Generation metadata for chart artifacts; freshness checks read
    // this record, never the artifact filename.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chart_artifacts (
            id INTEGER PRIMARY KEY,
            survey_id INTEGER NOT NULL,
            question_id INTEGER NOT NULL UNIQUE,
            path TEXT NOT NULL,
            generated_at INTEGER NOT NULL,
            FOREIGN KEY(survey_id) REFERENCES surveys(id) ON DELETE CASCADE,
            FOREIGN KEY(question_id) REFERENCES questions(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_answer_groups_token
        ON answer_groups(survey_id, token)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_answers_question
        ON answers(question_id, updated_at)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
