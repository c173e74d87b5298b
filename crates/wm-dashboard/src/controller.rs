//! Reactive driver for the filter holder and the marker controller
//!
//! The core state machines live in `StoredValue`s; everything the views
//! read is mirrored into signals after each transition. Timers are
//! `set_timeout` callbacks that fire the ticket they were given.

use crate::api::ApiClient;
use leptos::*;
use std::time::Duration;
use wm_core::boundary::{self, Boundary};
use wm_core::markers::{MapCommand, MarkerPlan, SiteDetail};
use wm_core::{
    CollectionRecord, DashboardConfig, DashboardData, DebounceTicket, FilterCriteria, FilterField,
    FilterState, LatLng, MapMarker, MarkerController, MarkerId, PopupTicket, QueryTicket,
    SiteCatalog,
};

/// Where the map should be looking, and how long the move takes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapFocus {
    pub center: LatLng,
    pub duration: Duration,
}

#[derive(Clone, Copy)]
pub struct DashboardController {
    filter: StoredValue<FilterState>,
    markers: StoredValue<MarkerController>,
    config: StoredValue<DashboardConfig>,
    catalog: StoredValue<SiteCatalog>,
    client: StoredValue<ApiClient>,

    pub criteria: RwSignal<FilterCriteria>,
    pub selection: RwSignal<Option<MapMarker>>,
    pub records: RwSignal<Vec<CollectionRecord>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub open_popup: RwSignal<Option<MarkerId>>,
    pub focus: RwSignal<Option<MapFocus>>,
    pub map_markers: RwSignal<Vec<MapMarker>>,
    pub dashboard: RwSignal<Option<DashboardData>>,
    pub boundary: RwSignal<Option<Boundary>>,
    /// Bumped whenever criteria change without the user typing them
    pub revision: RwSignal<u64>,
}

impl DashboardController {
    pub fn new(catalog: SiteCatalog, config: DashboardConfig, client: ApiClient) -> Self {
        let markers = MarkerController::from_catalog(&catalog, &config);
        let map_markers = markers.markers().cloned().collect();

        Self {
            filter: store_value(FilterState::new()),
            markers: store_value(markers),
            config: store_value(config),
            catalog: store_value(catalog),
            client: store_value(client),
            criteria: create_rw_signal(FilterCriteria::default()),
            selection: create_rw_signal(None),
            records: create_rw_signal(Vec::new()),
            loading: create_rw_signal(false),
            error: create_rw_signal(None),
            open_popup: create_rw_signal(None),
            focus: create_rw_signal(None),
            map_markers: create_rw_signal(map_markers),
            dashboard: create_rw_signal(None),
            boundary: create_rw_signal(None),
            revision: create_rw_signal(0),
        }
    }

    pub fn catalog(&self) -> SiteCatalog {
        self.catalog.get_value()
    }

    pub fn detail(&self, id: &MarkerId) -> Option<SiteDetail> {
        let catalog = self.catalog.get_value();
        self.markers.with_value(|m| m.detail(&catalog, id))
    }

    /// Initial load: site aggregates, boundary outline, unfiltered records
    pub fn load(&self) {
        let this = *self;
        spawn_local(async move {
            match this.client.get_value().dashboard().await {
                Ok(data) => {
                    this.markers.update_value(|m| m.merge(data.markers.clone()));
                    this.map_markers
                        .set(this.markers.with_value(|m| m.markers().cloned().collect()));
                    this.dashboard.set(Some(data));
                }
                Err(e) => this.error.set(Some(e.to_string())),
            }
        });

        if let Some(url) = self.config.with_value(|c| c.boundary_url.clone()) {
            let this = *self;
            spawn_local(async move {
                let outline = boundary::fetch(&reqwest::Client::new(), &url).await;
                this.boundary.set(outline);
            });
        }

        self.refresh();
    }

    pub fn refresh(&self) {
        let query = self.filter.try_update_value(FilterState::issue);
        if let Some(query) = query {
            self.run_query(query);
        }
    }

    pub fn update_filter(&self, field: FilterField, raw: &str) {
        let Some(ticket) = self.filter.try_update_value(|f| f.update(field, raw)) else {
            return;
        };

        let pinned = match field {
            FilterField::SiteName => {
                let name = self.filter.with_value(|f| f.criteria().site_name.clone());
                name.and_then(|name| self.markers.with_value(|m| m.find_by_site(&name).cloned()))
            }
            _ => None,
        };

        match pinned {
            Some(marker) => {
                let id = marker.id.clone();
                self.filter.update_value(|f| {
                    f.pin(marker);
                });
                let plan = self.markers.try_update_value(|m| m.external_select(&id));
                self.dispatch(plan.unwrap_or_default());
            }
            None => {
                let released = self.markers.try_update_value(|m| m.release());
                self.apply(released.unwrap_or_default());
            }
        }

        self.sync();
        self.schedule_query(ticket);
    }

    pub fn click_marker(&self, id: &MarkerId) {
        let plan = self.markers.try_update_value(|m| m.click(id));
        self.dispatch(plan.unwrap_or_default());
        self.revision.update(|r| *r += 1);
        self.sync();
    }

    pub fn reset(&self) {
        let Some(ticket) = self.filter.try_update_value(FilterState::reset) else {
            return;
        };
        let released = self.markers.try_update_value(|m| m.release());
        self.apply(released.unwrap_or_default());
        self.focus.set(None);
        self.revision.update(|r| *r += 1);
        self.sync();
        self.schedule_query(ticket);
    }

    pub fn close_popup(&self, id: &MarkerId) {
        self.markers.update_value(|m| m.popup_closed(id));
        self.apply(vec![MapCommand::ClosePopup(id.clone())]);
    }

    pub fn dismiss_error(&self) {
        self.error.set(None);
    }

    fn dispatch(&self, plan: MarkerPlan) {
        let mut forward = Vec::with_capacity(plan.commands.len());
        for command in plan.commands {
            match command {
                MapCommand::Select(marker) => {
                    if let Some(ticket) = self.filter.try_update_value(|f| f.select_site(marker)) {
                        self.schedule_query(ticket);
                    }
                }
                other => forward.push(other),
            }
        }
        self.apply(forward);

        if let Some(ticket) = plan.popup {
            self.schedule_popup(ticket);
        }
    }

    fn apply(&self, commands: Vec<MapCommand>) {
        for command in commands {
            match command {
                MapCommand::PanTo { lat, lng, duration, .. } => self.focus.set(Some(MapFocus {
                    center: LatLng::new(lat, lng),
                    duration,
                })),
                MapCommand::OpenPopup(id) => self.open_popup.set(Some(id)),
                MapCommand::ClosePopup(id) => {
                    if self.open_popup.get_untracked().as_ref() == Some(&id) {
                        self.open_popup.set(None);
                    }
                }
                MapCommand::Select(_) => {}
            }
        }
    }

    fn schedule_query(&self, ticket: DebounceTicket) {
        let this = *self;
        let delay = self.config.with_value(|c| c.debounce);

        set_timeout(
            move || {
                if let Some(query) = this.filter.try_update_value(|f| f.fire(ticket)).flatten() {
                    this.run_query(query);
                }
            },
            delay,
        );
    }

    fn schedule_popup(&self, ticket: PopupTicket) {
        let this = *self;
        let delay = ticket.delay;

        set_timeout(
            move || {
                let commands = this.markers.try_update_value(|m| m.fire_popup(&ticket));
                this.apply(commands.unwrap_or_default());
            },
            delay,
        );
    }

    fn run_query(&self, query: QueryTicket) {
        let this = *self;
        self.loading.set(true);

        spawn_local(async move {
            let result = this.client.get_value().collections(&query.criteria).await;
            if !this.filter.with_value(|f| f.accept(&query)) {
                return;
            }

            this.loading.set(false);
            match result {
                Ok(records) => {
                    this.records.set(records);
                    this.error.set(None);
                }
                Err(e) => this.error.set(Some(e.to_string())),
            }
        });
    }

    fn sync(&self) {
        self.criteria
            .set(self.filter.with_value(|f| f.criteria().clone()));
        self.selection
            .set(self.filter.with_value(|f| f.selection().cloned()));
    }
}

pub fn use_controller() -> DashboardController {
    expect_context::<DashboardController>()
}
