use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    auth::Session,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
};

/// The name of the multipart field that carries the uploaded file.
pub(crate) const FILE_FIELD: &str = "file";

fn import_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::IMPORT)
            enctype="multipart/form-data"
            hx-disabled-elt="#file, #submit-button"
            hx-indicator="#indicator"
            hx-swap="none"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for=(FILE_FIELD) class=(FORM_LABEL_STYLE) { "Choose a CSV file" }

                input
                    id=(FILE_FIELD)
                    type="file"
                    name=(FILE_FIELD)
                    accept=".csv,text/csv"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-2 text-sm text-gray-500 dark:text-gray-400"
                {
                    "The backend reads the rows and adds them to your cash book."
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                " Upload"
            }
        }
    }
}

/// Route handler for the import page.
pub async fn get_import_page(Extension(session): Extension<Session>) -> Response {
    let nav_bar = NavBar::new(endpoints::IMPORT_VIEW, &session.username).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h2 class="text-xl font-bold" { "Import Transactions" }
                (import_form_view())
            }
        }
    };

    base("Import Transactions", &[], &content).into_response()
}

#[cfg(test)]
mod import_page_tests {
    use axum::Extension;
    use scraper::{ElementRef, Selector};
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::Session,
        endpoints,
        test_utils::{
            assert_content_type, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_import_page;

    fn session() -> Session {
        Session {
            access_token: "token".to_owned(),
            username: "alice".to_owned(),
            expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn render_page() {
        let response = get_import_page(Extension(session())).await;

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::IMPORT, "hx-post");
        assert_form_enctype(&form, "multipart/form-data");
        assert_single_file_input(&form);
        assert_form_submit_button(&form);
    }

    #[track_caller]
    fn assert_form_enctype(form: &ElementRef, enctype: &str) {
        let form_enctype = form
            .value()
            .attr("enctype")
            .expect("enctype attribute missing");

        assert_eq!(form_enctype, enctype);
    }

    #[track_caller]
    fn assert_single_file_input(form: &ElementRef) {
        let inputs: Vec<_> = form
            .select(&Selector::parse("input[type=file]").unwrap())
            .collect();

        assert_eq!(inputs.len(), 1, "want exactly one file input");
        let input = inputs[0].value();
        assert_eq!(input.attr("name"), Some("file"));
        assert!(input.attr("required").is_some(), "file input should be required");
        assert!(input.attr("multiple").is_none(), "file input should take one file");
        assert!(input.attr("accept").unwrap_or_default().contains("text/csv"));
    }
}
