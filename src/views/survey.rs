use maud::{html, Markup};

use crate::db::models::{Page, Survey};
use crate::form::{Field, FieldKind, Form};
use crate::models::{STAR_MAX, STAR_MIN};
use crate::names;

pub fn home() -> Markup {
    html! {
        h1 { "Welcome" }
        p { "Enter the code of the survey you were invited to." }
        form method="post" action=(names::HOME_URL) {
            input type="text" name=(names::SLUG_FIELD_NAME) placeholder="survey code" required;
            button type="submit" { "Go" }
        }
    }
}

pub fn start(survey: &Survey, first_page_url: &str) -> Markup {
    html! {
        h1 { (survey.name) }
        @if let Some(logo) = &survey.logo {
            img src=(logo) alt=(survey.name);
        }
        p { (survey.intro) }
        a role="button" href=(first_page_url) { "Start" }
    }
}

pub struct PageFormData<'a> {
    pub survey: &'a Survey,
    pub page: &'a Page,
    pub form: &'a Form,
    pub action_url: String,
    pub prev_url: Option<String>,
}

pub fn page_form(data: PageFormData<'_>) -> Markup {
    html! {
        h1 { (data.survey.name) }
        @if !data.page.intro.is_empty() {
            p { (data.page.intro) }
        }

        form method="post" action=(data.action_url) {
            @for field in &data.form.fields {
                (field_widget(field))
            }
            button type="submit" { "Next" }
        }

        @if let Some(prev_url) = &data.prev_url {
            p { a href=(prev_url) { "Back" } }
        }
    }
}

fn field_widget(field: &Field) -> Markup {
    let value = field.value.as_deref();

    html! {
        fieldset {
            label for=(field.name) {
                (field.label)
                @if field.required { " *" }
            }

            @match &field.kind {
                FieldKind::Boolean => {
                    @for (token, label) in [("1", "Yes"), ("0", "No")] {
                        label {
                            input type="radio" name=(field.name) value=(token)
                                  checked[value == Some(token)];
                            (label)
                        }
                    }
                }
                FieldKind::Number { min, max } => {
                    input type="number" id=(field.name) name=(field.name)
                          value=[value]
                          min=[min.map(|n| n.to_string())]
                          max=[max.map(|n| n.to_string())];
                }
                FieldKind::Star => {
                    @for star in STAR_MIN..=STAR_MAX {
                        @let token = star.to_string();
                        label {
                            input type="radio" name=(field.name) value=(token)
                                  checked[value == Some(token.as_str())];
                            (token)
                        }
                    }
                }
                FieldKind::Text => {
                    textarea id=(field.name) name=(field.name) rows="4" {
                        @if let Some(value) = value { (value) }
                    }
                }
                FieldKind::Choice { options, blank_allowed } => {
                    select id=(field.name) name=(field.name) {
                        @if *blank_allowed {
                            option value="" selected[value.is_none()] { "---------" }
                        }
                        @for (choice, label) in options {
                            option value=(choice) selected[value == Some(choice.as_str())] {
                                (label)
                            }
                        }
                    }
                }
            }

            @if let Some(error) = &field.error {
                small."error" { (error) }
            }
        }
    }
}

pub fn done(survey: &Survey, prev_url: &str) -> Markup {
    html! {
        h1 { (survey.name) }
        p { (survey.outro) }
        p { a href=(prev_url) { "Back" } }
    }
}
