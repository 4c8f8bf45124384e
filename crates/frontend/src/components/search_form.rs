use dioxus::prelude::*;
use satfinder_shared::models::AoiMode;
use satfinder_shared::page::SearchPage;

use crate::bridge;

#[component]
pub fn SearchForm(
    page: Signal<SearchPage>,
    map_ready: Signal<bool>,
    on_submit: EventHandler<()>,
) -> Element {
    let state = page.read();
    let form = state.form().clone();
    let mode = state.aoi_mode();
    let loading = state.is_loading();
    let instructions_visible = state.instructions_visible();
    let error = state.error().map(str::to_string);
    drop(state);

    let mut select_mode = move |mode: AoiMode| {
        page.write().set_aoi_mode(mode);
        bridge::flush(page, map_ready);
    };

    rsx! {
        form {
            id: "search-form",
            class: "panel",
            onsubmit: move |evt: Event<FormData>| {
                evt.prevent_default();
                on_submit.call(());
            },

            h3 { "Credentials" }
            label { r#for: "api-username", "Username" }
            input {
                id: "api-username",
                r#type: "text",
                autocomplete: "username",
                value: "{form.username}",
                oninput: move |evt: Event<FormData>| page.write().set_username(evt.value()),
            }
            label { r#for: "api-password", "Password" }
            input {
                id: "api-password",
                r#type: "password",
                autocomplete: "current-password",
                value: "{form.password}",
                oninput: move |evt: Event<FormData>| page.write().set_password(evt.value()),
            }

            h3 { "Date range" }
            div { class: "date-row",
                label { r#for: "startdate", "From" }
                input {
                    id: "startdate",
                    r#type: "date",
                    value: "{form.start_date}",
                    oninput: move |evt: Event<FormData>| page.write().set_start_date(evt.value()),
                }
                label { r#for: "enddate", "To" }
                input {
                    id: "enddate",
                    r#type: "date",
                    value: "{form.end_date}",
                    oninput: move |evt: Event<FormData>| page.write().set_end_date(evt.value()),
                }
            }

            h3 { "Area of interest" }
            div { class: "aoi-modes",
                for option in [AoiMode::Country, AoiMode::Custom] {
                    label {
                        input {
                            r#type: "radio",
                            name: "aoi_mode",
                            value: option.as_str(),
                            checked: mode == option,
                            onchange: move |evt: Event<FormData>| {
                                if let Some(mode) = AoiMode::parse(&evt.value()) {
                                    select_mode(mode);
                                }
                            },
                        }
                        {match option {
                            AoiMode::Country => "Entire country",
                            AoiMode::Custom => "Draw on map",
                        }}
                    }
                }
            }
            p {
                id: "aoi-instructions",
                display: if instructions_visible { "block" } else { "none" },
                "Use the polygon or rectangle tool on the map to draw your area. Drawing again replaces it."
            }

            div { class: "submit-row",
                button {
                    id: "search-button",
                    r#type: "submit",
                    disabled: loading,
                    "Search"
                }
                span {
                    id: "loading-indicator",
                    display: if loading { "inline-block" } else { "none" },
                    "Searching..."
                }
            }

            if let Some(message) = error {
                div { id: "error-message-area", class: "error", "{message}" }
            }
        }
    }
}
