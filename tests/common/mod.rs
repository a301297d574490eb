use surveyor::db::Db;
use surveyor::models::{PageDef, QuestionDef, QuestionKind, SurveyDef};

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("surveyor_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}", path.display());
    Db::new(&url).await.expect("failed to create test database")
}

/// Throwaway directory for chart artifacts, unique per call.
#[allow(dead_code)]
pub fn create_media_dir() -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir =
        std::env::temp_dir().join(format!("surveyor_media_{}_{}", std::process::id(), id));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("failed to create media directory");
    dir
}

pub fn question(kind: QuestionKind, text: &str) -> QuestionDef {
    QuestionDef {
        kind,
        text: text.to_string(),
        required: true,
        choices: Vec::new(),
        choices_blank_allowed: false,
        num_min: None,
        num_max: None,
    }
}

/// Single-page survey definition with the given questions.
pub fn survey_def(slug: &str, questions: Vec<QuestionDef>) -> SurveyDef {
    SurveyDef {
        name: format!("Survey {slug}"),
        slug: slug.to_string(),
        logo: None,
        intro: "intro".to_string(),
        outro: "outro".to_string(),
        pages: vec![PageDef {
            intro: String::new(),
            questions,
        }],
    }
}
