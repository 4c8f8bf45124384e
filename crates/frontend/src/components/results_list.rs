use dioxus::prelude::*;
use satfinder_shared::page::{ResultsList as Results, SearchPage};
use satfinder_shared::results::{
    Downloads, ResultEntry, HIGHLIGHT_CLASS, NO_RESULTS_MESSAGE, SEARCHING_MESSAGE,
};

#[component]
pub fn ResultsList(page: Signal<SearchPage>) -> Element {
    let state = page.read();
    let highlighted = state.highlighted().map(str::to_string);
    let results = state.results().clone();
    drop(state);

    rsx! {
        div { class: "panel results-panel",
            h3 { "Results" }
            ul { id: "results-list",
                {match results {
                    Results::Empty => rsx! {},
                    Results::Searching => rsx! { li { "{SEARCHING_MESSAGE}" } },
                    Results::NoResults => rsx! { li { "{NO_RESULTS_MESSAGE}" } },
                    Results::Entries(entries) => rsx! {
                        for entry in entries {
                            ResultItem {
                                key: "{entry.dom_id}",
                                highlighted: highlighted.as_deref() == Some(entry.dom_id.as_str()),
                                entry: entry.clone(),
                            }
                        }
                    },
                }}
            }
        }
    }
}

#[component]
fn ResultItem(entry: ResultEntry, highlighted: bool) -> Element {
    let empty = entry.downloads.empty_message().unwrap_or_default();

    rsx! {
        li {
            id: "{entry.dom_id}",
            class: if highlighted { HIGHLIGHT_CLASS } else { "" },
            strong { "ID:" }
            " {entry.id}"
            br {}
            strong { "Acquired:" }
            " {entry.acquired}"
            br {}
            strong { "Sensor:" }
            " {entry.sensor}"
            br {}
            strong { "Resolution:" }
            " {entry.resolution}"
            br {}
            strong { "Downloads:" }
            " "
            {match &entry.downloads {
                Downloads::Links(links) => rsx! {
                    for (i, link) in links.iter().enumerate() {
                        if i > 0 { " | " }
                        a { href: "{link.url}", target: "_blank", "{link.label}" }
                    }
                },
                _ => rsx! { "{empty}" },
            }}
        }
    }
}
