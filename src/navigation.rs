//! The navigation bar shown at the top of every page for a logged-in user.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
    /// Set for links to files rather than pages, e.g. the CSV export.
    is_download: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html! {
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
                download[self.is_download]
            {
                (self.title)
            }
        }
    }
}

/// The navigation bar with a greeting for the logged-in user.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    username: &'a str,
}

impl<'a> NavBar<'a> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str, username: &'a str) -> NavBar<'a> {
        let link = |url: &'a str, title: &'a str| Link {
            url,
            title,
            is_current: active_endpoint == url,
            is_download: false,
        };

        let links = vec![
            link(endpoints::DASHBOARD_VIEW, "Dashboard"),
            link(endpoints::TRANSACTIONS_VIEW, "Transactions"),
            link(endpoints::NEW_TRANSACTION_VIEW, "New"),
            link(endpoints::IMPORT_VIEW, "Import"),
            Link {
                url: endpoints::EXPORT,
                title: "Export",
                is_current: false,
                is_download: true,
            },
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
                is_download: false,
            },
        ];

        NavBar { links, username }
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Cash Book"
                        }
                    }

                    span
                        id="user-greeting"
                        class="text-sm text-gray-600 dark:text-gray-300"
                    {
                        "Hi, " (self.username)
                    }

                    div class="w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in self.links {
                                li { (link.into_html()) }
                            }
                        }
                    }
                }
            }
        )
    }
}
