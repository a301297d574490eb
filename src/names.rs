pub const HOME_URL: &str = "/";

pub fn start_url(slug: &str) -> String {
    format!("/survey/{slug}")
}

pub fn page_url(survey_id: i64, token: &str, rank: i64) -> String {
    format!("/survey/{survey_id}/{token}/page/{rank}")
}

pub fn done_url(survey_id: i64, token: &str) -> String {
    format!("/survey/{survey_id}/{token}/done")
}

pub fn results_url(survey_id: i64, token: &str) -> String {
    format!("/results/{survey_id}/{token}")
}

pub fn chart_url(question_id: i64, token: &str) -> String {
    format!("/chart/{question_id}/{token}")
}

/// Form field key for a question, stable across render and submit.
pub fn question_field_name(question_id: i64) -> String {
    format!("question-{question_id}")
}

/// Home page form field carrying the survey slug. The respondent
/// session cookie itself is named after the slug, one per survey.
pub const SLUG_FIELD_NAME: &str = "start-slug";
