//! The search page controller.
//!
//! `SearchPage` owns every piece of page state (form values, the drawn AOI,
//! the results list, the highlighted entry, the error and loading flags).
//! Event methods mutate that state and queue [`MapCommand`]s; the frontend
//! drains the queue after each event and replays it against the map.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::SearchError;
use crate::form::SearchForm;
use crate::geo::{combined_bounds, LatLngBounds, FIT_PADDING};
use crate::models::{AoiMode, Feature, Geometry, SearchRequest};
use crate::response::{interpret_reply, HttpReply};
use crate::results::{list_item_dom_id, ResultEntry};

/// A result footprint handed to the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultOverlay {
    pub id: String,
    pub geometry: Geometry,
    pub popup_html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    ShowDrawControl,
    HideDrawControl,
    ClearDrawnShapes,
    ClearResultOverlays,
    AddResultOverlays(Vec<ResultOverlay>),
    FitBounds(LatLngBounds),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsList {
    #[default]
    Empty,
    Searching,
    NoResults,
    Entries(Vec<ResultEntry>),
}

#[derive(Debug, Clone)]
pub struct SearchPage {
    form: SearchForm,
    aoi: Option<Geometry>,
    draw_control_active: bool,
    highlighted: Option<String>,
    results: ResultsList,
    error: Option<String>,
    loading: bool,
    commands: Vec<MapCommand>,
}

impl SearchPage {
    /// Fresh page with the default date range ending `today`.
    pub fn new(today: NaiveDate) -> Self {
        let mut page = SearchPage {
            form: SearchForm::with_default_dates(today),
            aoi: None,
            draw_control_active: false,
            highlighted: None,
            results: ResultsList::Empty,
            error: None,
            loading: false,
            commands: Vec::new(),
        };
        page.set_aoi_mode(page.form.aoi_mode);
        page
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn set_username(&mut self, value: String) {
        self.form.username = value;
    }

    pub fn set_password(&mut self, value: String) {
        self.form.password = value;
    }

    pub fn set_start_date(&mut self, value: String) {
        self.form.start_date = value;
    }

    pub fn set_end_date(&mut self, value: String) {
        self.form.end_date = value;
    }

    pub fn aoi_mode(&self) -> AoiMode {
        self.form.aoi_mode
    }

    pub fn aoi(&self) -> Option<&Geometry> {
        self.aoi.as_ref()
    }

    pub fn draw_control_active(&self) -> bool {
        self.draw_control_active
    }

    /// Drawing instructions are shown only while drawing is possible.
    pub fn instructions_visible(&self) -> bool {
        self.form.aoi_mode == AoiMode::Custom
    }

    /// DOM id of the highlighted list entry.
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn results(&self) -> &ResultsList {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Commands queued since the last call, in order.
    pub fn take_map_commands(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn set_aoi_mode(&mut self, mode: AoiMode) {
        self.form.aoi_mode = mode;
        match mode {
            AoiMode::Custom => {
                if !self.draw_control_active {
                    self.commands.push(MapCommand::ShowDrawControl);
                    self.draw_control_active = true;
                }
            }
            AoiMode::Country => {
                if self.draw_control_active {
                    self.commands.push(MapCommand::HideDrawControl);
                    self.draw_control_active = false;
                }
                self.commands.push(MapCommand::ClearDrawnShapes);
                self.aoi = None;
            }
        }
    }

    /// A new shape replaced whatever was drawn before.
    pub fn aoi_drawn(&mut self, geometry: Geometry) {
        if self.form.aoi_mode != AoiMode::Custom {
            tracing::warn!("Ignoring AOI drawn outside custom mode");
            self.commands.push(MapCommand::ClearDrawnShapes);
            return;
        }
        tracing::debug!(?geometry, "AOI drawn");
        self.aoi = Some(geometry);
    }

    pub fn aoi_edited(&mut self, geometry: Geometry) {
        if self.form.aoi_mode != AoiMode::Custom {
            return;
        }
        tracing::debug!(?geometry, "AOI edited");
        self.aoi = Some(geometry);
    }

    /// Shapes were deleted; `remaining` is what is left on the drawing layer.
    pub fn aoi_deleted(&mut self, remaining: usize) {
        if remaining == 0 {
            tracing::debug!("AOI deleted");
            self.aoi = None;
        }
    }

    /// Validate the form and enter the loading state.
    ///
    /// Returns the request to send, or `None` when nothing must be sent: a
    /// search is already running, or validation failed (the error is then
    /// set on the page).
    pub fn begin_search(&mut self) -> Option<SearchRequest> {
        if self.loading {
            return None;
        }
        self.error = None;
        self.highlighted = None;

        let request = match self.form.validate(self.aoi.as_ref()) {
            Ok(r) => r,
            Err(e) => {
                self.error = Some(e.inline_message());
                self.results = ResultsList::Empty;
                self.commands.push(MapCommand::ClearResultOverlays);
                return None;
            }
        };

        self.results = ResultsList::Searching;
        self.commands.push(MapCommand::ClearResultOverlays);
        self.loading = true;
        Some(request)
    }

    /// Leave the loading state and render the outcome of the request.
    ///
    /// `outcome` is the reply, or the transport error message. `next_id`
    /// supplies ids for features the server sent without one.
    pub fn finish_search(
        &mut self,
        outcome: Result<HttpReply, String>,
        next_id: impl FnMut() -> String,
    ) {
        self.loading = false;

        let collection = outcome
            .map_err(SearchError::Transport)
            .and_then(|reply| interpret_reply(&reply));

        match collection {
            Ok(fc) if fc.features.is_empty() => {
                self.results = ResultsList::NoResults;
            }
            Ok(fc) => self.render_features(fc.features, next_id),
            Err(e) => {
                tracing::error!(error = %e, "Search failed");
                self.results = ResultsList::Empty;
                self.error = Some(e.inline_message());
            }
        }
    }

    fn render_features(
        &mut self,
        features: Vec<serde_json::Value>,
        mut next_id: impl FnMut() -> String,
    ) {
        tracing::info!(count = features.len(), "Found images");

        let mut entries = Vec::with_capacity(features.len());
        let mut overlays = Vec::with_capacity(features.len());
        for raw in features {
            let feature = match Feature::from_value(raw) {
                Ok(f) => f,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed feature");
                    continue;
                }
            };
            // Footprint-less features get neither an overlay nor a list entry.
            let Some(geometry) = feature.geometry else {
                tracing::warn!(id = ?feature.id, "Skipping feature without geometry");
                continue;
            };
            let id = match feature.id.filter(|id| !id.is_blank()) {
                Some(id) => id.to_string(),
                None => {
                    let generated = next_id();
                    tracing::warn!(id = %generated, "Feature missing ID, generated one");
                    generated
                }
            };
            let entry = ResultEntry::new(&id, &feature.properties);
            overlays.push(ResultOverlay {
                id,
                geometry,
                popup_html: entry.popup_html(),
            });
            entries.push(entry);
        }

        if let Some(bounds) = combined_bounds(overlays.iter().map(|o| &o.geometry)) {
            self.commands.push(MapCommand::AddResultOverlays(overlays));
            self.commands.push(MapCommand::FitBounds(bounds.pad(FIT_PADDING)));
        } else if !overlays.is_empty() {
            self.commands.push(MapCommand::AddResultOverlays(overlays));
        }
        self.results = if entries.is_empty() {
            ResultsList::NoResults
        } else {
            ResultsList::Entries(entries)
        };
    }

    /// A result footprint was clicked on the map.
    ///
    /// Returns the DOM id of the list entry to scroll into view.
    pub fn overlay_clicked(&mut self, feature_id: &str) -> Option<String> {
        let dom_id = list_item_dom_id(feature_id);
        let exists = matches!(
            &self.results,
            ResultsList::Entries(entries) if entries.iter().any(|e| e.dom_id == dom_id)
        );
        if exists {
            self.highlighted = Some(dom_id.clone());
            Some(dom_id)
        } else {
            tracing::warn!(dom_id = %dom_id, "List item not found for clicked overlay");
            self.highlighted = None;
            None
        }
    }
}
