use std::cell::Cell;

use chrono::NaiveDate;
use satfinder_shared::models::{AoiMode, Geometry, SearchRequest};
use satfinder_shared::page::{MapCommand, ResultsList, SearchPage};
use satfinder_shared::response::HttpReply;
use satfinder_shared::results::NO_RESULTS_MESSAGE;

/// Stands in for `POST /search`, counting how often it is hit.
struct FakeTransport {
    calls: Cell<usize>,
    status: u16,
    body: String,
}

impl FakeTransport {
    fn new(status: u16, body: &str) -> Self {
        FakeTransport {
            calls: Cell::new(0),
            status,
            body: body.to_string(),
        }
    }

    fn send(&self, request: &SearchRequest) -> Result<HttpReply, String> {
        self.calls.set(self.calls.get() + 1);
        // The body must always be serializable JSON.
        serde_json::to_string(request).map_err(|e| e.to_string())?;
        Ok(HttpReply {
            status: self.status,
            status_text: String::new(),
            body: self.body.clone(),
        })
    }
}

/// Submit the page the way the frontend does.
fn submit(page: &mut SearchPage, transport: &FakeTransport) {
    let Some(request) = page.begin_search() else {
        return;
    };
    let outcome = transport.send(&request);
    let mut n = 0;
    page.finish_search(outcome, || {
        n += 1;
        format!("genid-0-{:07}", n)
    });
}

fn page() -> SearchPage {
    let mut page = SearchPage::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    page.set_username("analyst".into());
    page.set_password("hunter2".into());
    page.take_map_commands();
    page
}

fn drawn_polygon() -> Geometry {
    Geometry::Polygon(vec![vec![
        vec![4.8, 52.3],
        vec![5.0, 52.3],
        vec![5.0, 52.4],
        vec![4.8, 52.3],
    ]])
}

fn features_body(n: usize) -> String {
    let features: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "type": "Feature",
                "id": format!("img-{}", i),
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[4.0 + i as f64, 52.0], [4.5 + i as f64, 52.0], [4.5 + i as f64, 52.5], [4.0 + i as f64, 52.0]]]
                },
                "properties": {
                    "acquired": "2024-05-20T09:15:00Z",
                    "sensorname": "RadarSat-2",
                    "resolution": 3,
                    "downloads": [{"href": format!("https://portal.example/{}.zip", i), "productname": "SLC"}]
                }
            })
        })
        .collect();
    serde_json::json!({ "type": "FeatureCollection", "features": features }).to_string()
}

#[test]
fn test_missing_required_fields_never_send() {
    let transport = FakeTransport::new(200, &features_body(1));
    let setters: [fn(&mut SearchPage); 4] = [
        |p| p.set_username(String::new()),
        |p| p.set_password(String::new()),
        |p| p.set_start_date(String::new()),
        |p| p.set_end_date(String::new()),
    ];
    for clear in setters {
        let mut p = page();
        clear(&mut p);
        submit(&mut p, &transport);
        assert_eq!(
            p.error(),
            Some("Please fill in all required fields (Credentials, Dates).")
        );
        assert!(!p.is_loading());
    }
    assert_eq!(transport.calls.get(), 0);
}

#[test]
fn test_reversed_dates_never_send() {
    let transport = FakeTransport::new(200, &features_body(1));
    let mut p = page();
    p.set_start_date("2024-07-01".into());
    submit(&mut p, &transport);
    assert_eq!(p.error(), Some("Start date cannot be after end date."));
    assert_eq!(transport.calls.get(), 0);
}

#[test]
fn test_custom_mode_without_shape_never_sends() {
    let transport = FakeTransport::new(200, &features_body(1));
    let mut p = page();
    p.set_aoi_mode(AoiMode::Custom);
    submit(&mut p, &transport);
    assert_eq!(
        p.error(),
        Some("AOI Mode selected, but no Area of Interest has been drawn.")
    );
    assert_eq!(transport.calls.get(), 0);
}

#[test]
fn test_custom_mode_with_shape_sends_geometry() {
    let transport = FakeTransport::new(200, &features_body(1));
    let mut p = page();
    p.set_aoi_mode(AoiMode::Custom);
    p.aoi_drawn(drawn_polygon());
    let request = p.begin_search().unwrap();
    assert_eq!(request.aoi_geojson, Some(drawn_polygon()));
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["aoi_mode"], "custom");
    assert_eq!(json["sensorname"], "RadarSat-2");
    p.finish_search(transport.send(&request), || unreachable!());
    assert_eq!(transport.calls.get(), 1);
}

#[test]
fn test_empty_response_renders_single_no_results_entry() {
    let transport = FakeTransport::new(200, r#"{"type":"FeatureCollection","features":[]}"#);
    let mut p = page();
    submit(&mut p, &transport);
    assert_eq!(p.results(), &ResultsList::NoResults);
    let overlays_added = p
        .take_map_commands()
        .iter()
        .any(|c| matches!(c, MapCommand::AddResultOverlays(_)));
    assert!(!overlays_added);
    assert_eq!(NO_RESULTS_MESSAGE, "No images found for the specified criteria.");
}

#[test]
fn test_n_features_pair_entries_with_overlays() {
    let transport = FakeTransport::new(200, &features_body(3));
    let mut p = page();
    submit(&mut p, &transport);

    let ResultsList::Entries(entries) = p.results().clone() else {
        panic!("expected entries");
    };
    let commands = p.take_map_commands();
    assert_eq!(commands[0], MapCommand::ClearResultOverlays);
    let overlays = commands
        .iter()
        .find_map(|c| match c {
            MapCommand::AddResultOverlays(o) => Some(o.clone()),
            _ => None,
        })
        .unwrap();
    assert!(matches!(commands.last(), Some(MapCommand::FitBounds(_))));

    assert_eq!(entries.len(), 3);
    assert_eq!(overlays.len(), 3);
    for (entry, overlay) in entries.iter().zip(&overlays) {
        assert_eq!(entry.id, overlay.id);
        assert_eq!(entry.dom_id, format!("result-item-{}", overlay.id));
        assert_eq!(entry.acquired, "2024-05-20 09:15:00 UTC");
        assert_eq!(entry.resolution, "3m");
    }
}

#[test]
fn test_clicking_overlays_keeps_one_highlight() {
    let transport = FakeTransport::new(200, &features_body(2));
    let mut p = page();
    submit(&mut p, &transport);

    assert_eq!(p.overlay_clicked("img-0").as_deref(), Some("result-item-img-0"));
    assert_eq!(p.overlay_clicked("img-1").as_deref(), Some("result-item-img-1"));
    assert_eq!(p.highlighted(), Some("result-item-img-1"));
}

#[test]
fn test_switching_back_to_country_clears_aoi() {
    let mut p = page();
    p.set_aoi_mode(AoiMode::Custom);
    p.aoi_drawn(drawn_polygon());
    p.take_map_commands();
    p.set_aoi_mode(AoiMode::Country);
    assert!(p.aoi().is_none());
    assert!(p.take_map_commands().contains(&MapCommand::ClearDrawnShapes));
}

#[test]
fn test_server_error_message_is_prefixed() {
    let transport = FakeTransport::new(401, r#"{"error":"X"}"#);
    let mut p = page();
    submit(&mut p, &transport);
    assert_eq!(transport.calls.get(), 1);
    assert_eq!(p.error(), Some("Search failed: X"));
    assert_eq!(p.results(), &ResultsList::Empty);
    assert!(!p.is_loading());
}

#[test]
fn test_form_usable_after_failure() {
    let failing = FakeTransport::new(500, "");
    let mut p = page();
    submit(&mut p, &failing);
    assert!(p.error().is_some());

    let working = FakeTransport::new(200, &features_body(1));
    submit(&mut p, &working);
    assert!(p.error().is_none());
    assert!(matches!(p.results(), ResultsList::Entries(e) if e.len() == 1));
}
