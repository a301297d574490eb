use maud::{html, Markup};

use crate::db::models::{Question, Survey};
use crate::names;

/// Aggregate results: one section per question. Charts load from the
/// per-question endpoint; the fallback body shows when no chart exists.
pub fn results(survey: &Survey, questions: &[Question]) -> Markup {
    html! {
        h1 { (survey.name) " - results" }

        @for question in questions {
            article {
                h4 { (question.short_text()) }
                object data=(names::chart_url(question.id, &survey.token))
                       type="image/svg+xml"
                       width="640" height="400" {
                    p { "No chart available" }
                }
            }
        }
    }
}
