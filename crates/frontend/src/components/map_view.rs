use dioxus::prelude::*;
use futures::StreamExt;
use gloo_timers::future::TimeoutFuture;
use satfinder_shared::page::SearchPage;

use crate::bridge::{self, BridgeEvent, MAP_CONTAINER_ID};

/// Leaflet and Leaflet.Draw load from a CDN; keep retrying until both are up.
const INIT_RETRY_MS: u32 = 100;
const INIT_ATTEMPTS: u32 = 100;

#[component]
pub fn MapView(page: Signal<SearchPage>, map_ready: Signal<bool>) -> Element {
    use_future(move || async move {
        let mut attempts = 0;
        loop {
            match bridge::init_map() {
                Ok(()) => break,
                Err(e) if attempts < INIT_ATTEMPTS => {
                    attempts += 1;
                    tracing::debug!(error = %e, attempts, "Map not ready yet");
                    TimeoutFuture::new(INIT_RETRY_MS).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Map failed to initialize");
                    return;
                }
            }
        }

        tracing::info!("Map initialized");
        map_ready.set(true);
        bridge::flush(page, map_ready);

        let (tx, mut rx) = futures::channel::mpsc::unbounded();
        if let Err(e) = bridge::listen(tx) {
            tracing::error!(error = %e, "Could not subscribe to map events");
            return;
        }
        while let Some(event) = rx.next().await {
            handle_event(page, event);
            bridge::flush(page, map_ready);
        }
    });

    rsx! {
        div { id: MAP_CONTAINER_ID, class: "map-container" }
    }
}

fn handle_event(mut page: Signal<SearchPage>, event: BridgeEvent) {
    match event {
        BridgeEvent::AoiDrawn(geometry) => page.write().aoi_drawn(geometry),
        BridgeEvent::AoiEdited(geometry) => page.write().aoi_edited(geometry),
        BridgeEvent::AoiDeleted { remaining } => page.write().aoi_deleted(remaining),
        BridgeEvent::ResultClicked(id) => {
            let target = page.write().overlay_clicked(&id);
            if let Some(dom_id) = target {
                bridge::scroll_into_view(&dom_id);
            }
        }
    }
}
