use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use maud::Markup;

use crate::rejections::{AppError, OptionExt, ResultExt};
use crate::{views, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/results/{survey_id}/{token}", get(results))
        .route("/chart/{question_id}/{token}", get(chart))
}

/// Results are gated by the survey token, not a respondent session.
async fn results(
    State(state): State<AppState>,
    Path((survey_id, token)): Path<(i64, String)>,
) -> Result<Markup, AppError> {
    let survey = state
        .db
        .survey_by_id_and_token(survey_id, &token)
        .await
        .reject("could not look up survey")?
        .or_not_found()?;

    let questions = state
        .db
        .questions_for_survey(survey.id)
        .await
        .reject("could not get questions")?;

    Ok(views::page(
        &survey.name,
        views::results::results(&survey, &questions),
    ))
}

/// Serve the chart artifact for one question. Any failure along the way
/// degrades to a 404 so the results page falls back to its placeholder
/// instead of breaking.
async fn chart(
    State(state): State<AppState>,
    Path((question_id, token)): Path<(i64, String)>,
) -> Result<Response, AppError> {
    let question = state
        .db
        .question_by_id(question_id)
        .await
        .reject("could not look up question")?
        .or_not_found()?;
    let survey = state
        .db
        .survey_for_question(question_id)
        .await
        .reject("could not look up survey")?
        .or_not_found()?;

    if survey.token != token {
        return Err(AppError::NotFound);
    }

    let path = match state.charts.chart_for(&state.db, &survey, &question).await {
        Ok(Some(path)) => path,
        Ok(None) => return Err(AppError::NotFound),
        Err(e) => {
            tracing::error!("could not produce chart for question {question_id}: {e}");
            return Err(AppError::NotFound);
        }
    };

    let bytes = std::fs::read(&path).reject("could not read chart artifact")?;

    Ok(([(CONTENT_TYPE, "image/svg+xml")], bytes).into_response())
}
