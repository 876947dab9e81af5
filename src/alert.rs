//! Success and error messages shown in the floating alert container.
//!
//! Alerts are sent as out-of-band swaps so that any htmx response can carry
//! one alongside its main content.

use maud::{Markup, html};

/// An alert message.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action worked.
    Success {
        /// The headline.
        message: String,
        /// Extra context below the headline.
        details: String,
    },
    /// The action failed.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and how to fix it.
        details: String,
    },
    /// The action failed and the headline says it all.
    ErrorSimple {
        /// The headline.
        message: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band swap into `#alert-container`.
    pub fn into_html(self) -> Markup {
        let alert = self.render("this.closest('#alert-container').classList.add('hidden')");

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                (alert)
            }
        }
    }

    /// Render the alert for swapping into the request's own target, e.g. a form.
    pub fn into_inline_html(self) -> Markup {
        self.render("this.closest('[role=alert]').remove()")
    }

    fn render(self, dismiss_script: &str) -> Markup {
        let (is_error, message, details) = match self {
            Alert::Success { message, details } => (false, message, details),
            Alert::Error { message, details } => (true, message, details),
            Alert::ErrorSimple { message } => (true, message, String::new()),
        };

        let container_style = if is_error {
            "p-4 mb-4 text-sm rounded-lg border text-red-800 bg-red-50 border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "p-4 mb-4 text-sm rounded-lg border text-green-800 bg-green-50 border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        html! {
            div
                class=(container_style)
                role="alert"
                data-alert-kind=(if is_error { "error" } else { "success" })
            {
                div class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        p class="font-semibold" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold"
                        onclick=(dismiss_script)
                    {
                        "×"
                    }
                }
            }
        }
    }
}
