//! Marker selection state machine
//!
//! `Idle -> Selected(marker)` on a click or an external selection, back to
//! `Idle` on release. Selecting pans the view and schedules the marker's
//! popup; the popup only opens when its ticket is fired and is still the
//! current one, so a newer selection silently supersedes an older one.

use super::directions::{DirectionsLink, SiteDetail};
use super::{MapMarker, MarkerId};
use crate::catalog::SiteCatalog;
use crate::config::{DashboardConfig, PanTiming};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Controller state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MarkerState {
    #[default]
    Idle,
    Selected(MarkerId),
}

/// Instruction for the map widget or the filter holder
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// Pin the dashboard to this marker's site
    Select(MapMarker),
    /// Animated, non-blocking move of the view
    PanTo {
        id: MarkerId,
        lat: f64,
        lng: f64,
        duration: Duration,
    },
    OpenPopup(MarkerId),
    ClosePopup(MarkerId),
}

/// Deferred popup opening for one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupTicket {
    seq: u64,
    pub id: MarkerId,
    pub delay: Duration,
}

/// Immediate commands plus the popup to open later
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerPlan {
    pub commands: Vec<MapCommand>,
    pub popup: Option<PopupTicket>,
}

impl MarkerPlan {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.popup.is_none()
    }
}

/// Keyed marker registry with selection, pan and popup sequencing
#[derive(Debug, Clone)]
pub struct MarkerController {
    markers: BTreeMap<MarkerId, MapMarker>,
    state: MarkerState,
    open_popup: Option<MarkerId>,
    seq: u64,
    // seq of the last ticket that opened its popup
    fired: Option<u64>,
    click: PanTiming,
    external_select: PanTiming,
    directions_base: String,
}

impl MarkerController {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            markers: BTreeMap::new(),
            state: MarkerState::Idle,
            open_popup: None,
            seq: 0,
            fired: None,
            click: config.click,
            external_select: config.external_select,
            directions_base: config.directions_base.clone(),
        }
    }

    /// Controller preloaded with one marker per catalog site
    pub fn from_catalog(catalog: &SiteCatalog, config: &DashboardConfig) -> Self {
        let mut controller = Self::new(config);
        controller.insert_all(catalog.markers());
        controller
    }

    pub fn insert_all<I>(&mut self, markers: I)
    where
        I: IntoIterator<Item = MapMarker>,
    {
        for marker in markers {
            self.markers.insert(marker.id.clone(), marker);
        }
    }

    /// Fold aggregated markers in: known ids keep their pin position and
    /// take the aggregate fields, unknown ids are added.
    pub fn merge<I>(&mut self, markers: I)
    where
        I: IntoIterator<Item = MapMarker>,
    {
        for marker in markers {
            match self.markers.get_mut(&marker.id) {
                Some(existing) => {
                    existing.waste_type = marker.waste_type;
                    existing.volume = marker.volume;
                    existing.date = marker.date;
                }
                None => {
                    self.markers.insert(marker.id.clone(), marker);
                }
            }
        }
    }

    pub fn get(&self, id: &MarkerId) -> Option<&MapMarker> {
        self.markers.get(id)
    }

    pub fn markers(&self) -> impl Iterator<Item = &MapMarker> {
        self.markers.values()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn state(&self) -> &MarkerState {
        &self.state
    }

    pub fn selected(&self) -> Option<&MapMarker> {
        match &self.state {
            MarkerState::Selected(id) => self.markers.get(id),
            MarkerState::Idle => None,
        }
    }

    pub fn open_popup(&self) -> Option<&MarkerId> {
        self.open_popup.as_ref()
    }

    /// Marker for a site name, for selections that arrive by name
    pub fn find_by_site(&self, site_name: &str) -> Option<&MapMarker> {
        self.markers.get(&MarkerId::from_site_name(site_name))
    }

    /// Direct click on a marker: pin the filter, pan, then popup.
    /// Unknown ids are a no-op.
    pub fn click(&mut self, id: &MarkerId) -> MarkerPlan {
        let Some(marker) = self.markers.get(id).cloned() else {
            debug!("Click on unknown marker {}", id);
            return MarkerPlan::default();
        };

        let mut plan = self.begin(&marker, self.click);
        plan.commands.insert(0, MapCommand::Select(marker));
        plan
    }

    /// Selection decided elsewhere (filter or dashboard layer): same pan
    /// and popup sequence without echoing a selection back.
    pub fn external_select(&mut self, id: &MarkerId) -> MarkerPlan {
        let Some(marker) = self.markers.get(id).cloned() else {
            debug!("External selection of unrendered marker {}", id);
            return MarkerPlan::default();
        };

        self.begin(&marker, self.external_select)
    }

    fn begin(&mut self, marker: &MapMarker, timing: PanTiming) -> MarkerPlan {
        self.seq += 1;
        self.state = MarkerState::Selected(marker.id.clone());

        MarkerPlan {
            commands: vec![MapCommand::PanTo {
                id: marker.id.clone(),
                lat: marker.lat,
                lng: marker.lng,
                duration: timing.pan,
            }],
            popup: Some(PopupTicket {
                seq: self.seq,
                id: marker.id.clone(),
                delay: timing.popup_delay,
            }),
        }
    }

    /// Open the popup for a ticket if it still belongs to the current
    /// selection, closing whichever popup was open before.
    pub fn fire_popup(&mut self, ticket: &PopupTicket) -> Vec<MapCommand> {
        let current = matches!(&self.state, MarkerState::Selected(id) if *id == ticket.id);
        if ticket.seq != self.seq || !current {
            debug!("Dropping superseded popup for {}", ticket.id);
            return Vec::new();
        }
        if self.fired == Some(ticket.seq) {
            debug!("Popup for {} already opened", ticket.id);
            return Vec::new();
        }
        self.fired = Some(ticket.seq);

        let mut commands = Vec::with_capacity(2);
        if let Some(previous) = self.open_popup.take() {
            if previous != ticket.id {
                commands.push(MapCommand::ClosePopup(previous));
            }
        }
        commands.push(MapCommand::OpenPopup(ticket.id.clone()));
        self.open_popup = Some(ticket.id.clone());
        commands
    }

    /// Return to `Idle`, invalidating any pending popup
    pub fn release(&mut self) -> Vec<MapCommand> {
        self.seq += 1;
        self.state = MarkerState::Idle;
        self.open_popup
            .take()
            .map(MapCommand::ClosePopup)
            .into_iter()
            .collect()
    }

    /// The popup was closed by the map widget itself
    pub fn popup_closed(&mut self, id: &MarkerId) {
        if self.open_popup.as_ref() == Some(id) {
            self.open_popup = None;
        }
    }

    pub fn directions(&self, id: &MarkerId) -> Option<DirectionsLink> {
        self.markers
            .get(id)
            .map(|m| DirectionsLink::new(&self.directions_base, m.lat, m.lng))
    }

    pub fn detail(&self, catalog: &SiteCatalog, id: &MarkerId) -> Option<SiteDetail> {
        catalog
            .get(id)
            .map(|site| SiteDetail::new(site, &self.directions_base))
    }
}
