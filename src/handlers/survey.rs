use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use axum_extra::extract::CookieJar;
use maud::Markup;

use crate::db::models::{AnswerGroup, Page, Survey};
use crate::db::{Db, SetValueError};
use crate::form::Form;
use crate::rejections::{AppError, OptionExt, ResultExt};
use crate::{names, utils, views, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/survey/{slug}", get(start_survey))
        .route(
            "/survey/{survey_id}/{token}/page/{rank}",
            get(show_page).post(submit_page),
        )
        .route("/survey/{survey_id}/{token}/done", get(done))
}

/// Start-or-resume: the respondent credential lives in a cookie named
/// after the survey slug, one credential per survey. A stale or unknown
/// credential is recovered silently by starting a fresh session.
async fn start_survey(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Result<axum::response::Response, AppError> {
    let survey = state
        .db
        .survey_by_slug(&slug)
        .await
        .reject("could not look up survey")?
        .or_not_found()?;

    if let Some(token) = jar.get(&slug).map(|c| c.value().to_string()) {
        let group = state
            .db
            .answer_group(survey.id, &token)
            .await
            .reject("could not look up session")?;

        match group {
            Some(group) => {
                // Existing session: resume where the respondent left off.
                let target = match group.page_id {
                    Some(page_id) => {
                        let page = state
                            .db
                            .page_by_id(page_id)
                            .await
                            .reject("could not get current page")?
                            .or_not_found()?;
                        names::page_url(survey.id, &group.token, page.rank)
                    }
                    None => names::done_url(survey.id, &group.token),
                };
                let headers = session_cookie(&slug, &token, state.secure_cookies)?;
                return Ok((headers, Redirect::to(&target)).into_response());
            }
            None => {
                tracing::info!("stale session token for survey {slug}, starting fresh");
            }
        }
    }

    let group = state
        .db
        .create_answer_group(survey.id)
        .await
        .reject("could not create session")?;

    let start_page = views::page(
        &survey.name,
        views::survey::start(&survey, &names::page_url(survey.id, &group.token, 1)),
    );
    let headers = session_cookie(&slug, &group.token, state.secure_cookies)?;

    Ok((headers, start_page).into_response())
}

async fn show_page(
    State(state): State<AppState>,
    Path((survey_id, token, rank)): Path<(i64, String, i64)>,
) -> Result<Markup, AppError> {
    let (survey, group, page) = lookup(&state.db, survey_id, &token, rank).await?;

    let questions = state
        .db
        .questions_for_page(page.id)
        .await
        .reject("could not get questions")?;
    let answers = state
        .db
        .answers_for_group(group.id)
        .await
        .reject("could not get answers")?;

    let form = Form::build(&questions, &answers).reject("invalid question configuration")?;

    Ok(render_page(&survey, &page, &form, &token))
}

/// One page submission: validate, persist best-effort, then advance the
/// session state machine. The page pointer only ever moves forward and
/// a completed session stays complete.
async fn submit_page(
    State(state): State<AppState>,
    Path((survey_id, token, rank)): Path<(i64, String, i64)>,
    axum::Form(data): axum::Form<HashMap<String, String>>,
) -> Result<axum::response::Response, AppError> {
    let (survey, group, page) = lookup(&state.db, survey_id, &token, rank).await?;

    let questions = state
        .db
        .questions_for_page(page.id)
        .await
        .reject("could not get questions")?;
    let answers = state
        .db
        .answers_for_group(group.id)
        .await
        .reject("could not get answers")?;

    let mut form = Form::build(&questions, &answers).reject("invalid question configuration")?;
    let valid = form.validate(&data);

    // Best-effort partial saves: every submitted value is offered to the
    // codec, even when its field failed validation, so a respondent
    // never loses previously entered answers over one bad field. The
    // codec itself still rejects values it cannot store.
    for question in &questions {
        let name = names::question_field_name(question.id);
        let Some(raw) = data.get(&name).map(|s| s.trim()).filter(|s| !s.is_empty()) else {
            continue;
        };

        match state.db.set_answer_value(group.id, question, raw).await {
            Ok(()) => {}
            Err(SetValueError::Value(e)) => tracing::warn!("value not stored: {e}"),
            Err(SetValueError::Db(e)) => {
                tracing::warn!("could not store answer for question {}: {e}", question.id);
            }
        }
    }

    if !valid {
        return Ok(render_page(&survey, &page, &form, &token).into_response());
    }

    let current_rank = match group.page_id {
        Some(page_id) => Some(
            state
                .db
                .page_by_id(page_id)
                .await
                .reject("could not get current page")?
                .or_not_found()?
                .rank,
        ),
        None => None,
    };

    let next = state
        .db
        .page_by_rank(survey_id, rank + 1)
        .await
        .reject("could not get next page")?;

    match next {
        Some(next) => {
            // Only move the pointer when the submitted page is at or
            // beyond it; re-submitting an earlier page never rewinds.
            if let Some(current_rank) = current_rank {
                if next.rank > current_rank {
                    state
                        .db
                        .set_current_page(group.id, Some(next.id))
                        .await
                        .reject("could not advance session")?;
                }
            }
            Ok(Redirect::to(&names::page_url(survey_id, &token, next.rank)).into_response())
        }
        None => {
            // Last page passed: the session is complete.
            if current_rank.is_some() {
                state
                    .db
                    .set_current_page(group.id, None)
                    .await
                    .reject("could not complete session")?;
            }
            Ok(Redirect::to(&names::done_url(survey_id, &token)).into_response())
        }
    }
}

async fn done(
    State(state): State<AppState>,
    Path((survey_id, token)): Path<(i64, String)>,
) -> Result<Markup, AppError> {
    let survey = state
        .db
        .survey_by_id(survey_id)
        .await
        .reject("could not look up survey")?
        .or_not_found()?;
    state
        .db
        .answer_group(survey_id, &token)
        .await
        .reject("could not look up session")?
        .or_not_found()?;

    let last_page = state
        .db
        .last_page(survey_id)
        .await
        .reject("could not get last page")?;
    let prev_url = last_page
        .map(|page| names::page_url(survey_id, &token, page.rank))
        .unwrap_or_else(|| names::HOME_URL.to_string());

    Ok(views::page(
        &survey.name,
        views::survey::done(&survey, &prev_url),
    ))
}

// --- Helpers ---

async fn lookup(
    db: &Db,
    survey_id: i64,
    token: &str,
    rank: i64,
) -> Result<(Survey, AnswerGroup, Page), AppError> {
    let survey = db
        .survey_by_id(survey_id)
        .await
        .reject("could not look up survey")?
        .or_not_found()?;
    let group = db
        .answer_group(survey_id, token)
        .await
        .reject("could not look up session")?
        .or_not_found()?;
    let page = db
        .page_by_rank(survey_id, rank)
        .await
        .reject("could not look up page")?
        .or_not_found()?;

    Ok((survey, group, page))
}

fn render_page(survey: &Survey, page: &Page, form: &Form, token: &str) -> Markup {
    let prev_url =
        (page.rank > 1).then(|| names::page_url(survey.id, token, page.rank - 1));

    views::page(
        &survey.name,
        views::survey::page_form(views::survey::PageFormData {
            survey,
            page,
            form,
            action_url: names::page_url(survey.id, token, page.rank),
            prev_url,
        }),
    )
}

fn session_cookie(slug: &str, token: &str, secure: bool) -> Result<HeaderMap, AppError> {
    let cookie = utils::cookie(slug, token, secure)
        .parse()
        .reject_input("invalid cookie value")?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok(headers)
}
