use maud::{html, Markup, DOCTYPE};

use crate::utils;

fn header() -> Markup {
    html! {
        header {
            nav {
                ul {
                    li."secondary" {
                        a href="/" {
                            strong { "Surveyor" }
                        }
                    }
                }
                ul {
                    li."secondary" { (utils::VERSION) }
                }
            }
        }
    }
}

fn main(body: Markup) -> Markup {
    html! {
        main { (body) }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";

            title { (format!("{title} - Surveyor")) }
        }

        body."container" {
            (header())
            (main(body))
        }
    }
}
