use chrono::NaiveDate;
use dioxus::prelude::*;
use satfinder_shared::page::SearchPage;
use satfinder_shared::results::generated_feature_id;

use crate::api;
use crate::bridge;
use crate::components::map_view::MapView;
use crate::components::results_list::ResultsList;
use crate::components::search_form::SearchForm;

#[component]
pub fn Search() -> Element {
    let mut page = use_signal(|| SearchPage::new(today()));
    // Commands queue up in `page` until the Leaflet map exists.
    let map_ready = use_signal(|| false);

    let on_submit = move |_| {
        let request = page.write().begin_search();
        bridge::flush(page, map_ready);
        let Some(request) = request else {
            return;
        };
        spawn(async move {
            let outcome = api::search(&request).await;
            if let Err(e) = &outcome {
                tracing::error!(error = %e, "Search request failed");
            }
            page.write().finish_search(outcome, next_feature_id);
            bridge::flush(page, map_ready);
        });
    };

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Satellite Image Search" }
            }
            div { class: "sidebar",
                SearchForm { page, map_ready, on_submit }
                ResultsList { page }
            }
            MapView { page, map_ready }
        }
    }
}

/// Today's date in UTC, from the browser clock.
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_utc_full_year() as i32,
        now.get_utc_month() + 1,
        now.get_utc_date(),
    )
    .unwrap_or_default()
}

fn next_feature_id() -> String {
    generated_feature_id(js_sys::Date::now() as u64, js_sys::Math::random())
}
