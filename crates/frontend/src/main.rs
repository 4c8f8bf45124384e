mod api;
mod bridge;
mod components;
mod pages;

use dioxus::prelude::*;

const CSS: Asset = asset!("/assets/main.css");
const MAP_BRIDGE: Asset = asset!("/assets/map_bridge.js");

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_DRAW_CSS: &str = "https://unpkg.com/leaflet-draw@1.0.4/dist/leaflet.draw.css";

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Stylesheet { href: LEAFLET_CSS }
        document::Stylesheet { href: LEAFLET_DRAW_CSS }
        document::Stylesheet { href: CSS }
        document::Script { src: MAP_BRIDGE }
        pages::search::Search {}
    }
}

fn main() {
    launch(App);
}
