//! Debounced filter state
//!
//! The holder owns the current criteria and the pinned site selection.
//! Edits return a [`DebounceTicket`]; the driver waits out the quiet period
//! and fires the ticket, which yields a [`QueryTicket`] only if no newer
//! edit arrived in the meantime. Query results are accepted only for the
//! latest query issued and only while the criteria still match the
//! snapshot the query was built from.

use crate::criteria::{FilterCriteria, FilterField};
use crate::markers::MapMarker;
use tracing::debug;

/// Pending debounce for one edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    generation: u64,
}

/// An issued query and the criteria it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    seq: u64,
    pub criteria: FilterCriteria,
}

impl QueryTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterState {
    criteria: FilterCriteria,
    selection: Option<MapMarker>,
    generation: u64,
    issued: u64,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn selection(&self) -> Option<&MapMarker> {
        self.selection.as_ref()
    }

    /// Apply a form edit. Any edit other than the site name unpins the
    /// selected site; editing the site name to something else also drops
    /// the selection.
    pub fn update(&mut self, field: FilterField, raw: &str) -> DebounceTicket {
        field.apply(&mut self.criteria, raw);

        match field {
            FilterField::SiteName => {
                let still_pinned = match (&self.selection, &self.criteria.site_name) {
                    (Some(selected), Some(name)) => &selected.site_name == name,
                    _ => false,
                };
                if !still_pinned {
                    self.selection = None;
                }
            }
            _ => {
                self.criteria.site_name = None;
                self.selection = None;
            }
        }

        self.bump()
    }

    /// Pin the dashboard to a marker's site, replacing every other criterion
    pub fn select_site(&mut self, marker: MapMarker) -> DebounceTicket {
        self.criteria = FilterCriteria::for_site(marker.site_name.clone());
        self.selection = Some(marker);
        self.bump()
    }

    /// Record `marker` as selected after the site name was typed in.
    /// Other criteria are kept. Ignored unless the marker is the site the
    /// criteria already name.
    pub fn pin(&mut self, marker: MapMarker) -> bool {
        if self.criteria.site_name.as_deref() != Some(marker.site_name.as_str()) {
            return false;
        }
        self.selection = Some(marker);
        true
    }

    /// Clear criteria and selection
    pub fn reset(&mut self) -> DebounceTicket {
        self.criteria = FilterCriteria::default();
        self.selection = None;
        self.bump()
    }

    /// Replace the criteria wholesale, as when restoring from a query string
    pub fn replace(&mut self, criteria: FilterCriteria) -> DebounceTicket {
        if let (Some(selected), Some(name)) = (&self.selection, &criteria.site_name) {
            if &selected.site_name != name {
                self.selection = None;
            }
        } else {
            self.selection = None;
        }
        self.criteria = criteria;
        self.bump()
    }

    fn bump(&mut self) -> DebounceTicket {
        self.generation += 1;
        DebounceTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: DebounceTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Quiet period elapsed for `ticket`. Returns the query to issue, or
    /// `None` if a later edit superseded it.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<QueryTicket> {
        if !self.is_current(ticket) {
            return None;
        }
        Some(self.issue())
    }

    /// Issue a query for the current criteria without waiting, for the
    /// initial load and explicit refreshes
    pub fn issue(&mut self) -> QueryTicket {
        self.issued += 1;
        debug!("Issuing query #{} for {:?}", self.issued, self.criteria);
        QueryTicket {
            seq: self.issued,
            criteria: self.criteria.clone(),
        }
    }

    /// Whether results for `ticket` may replace what is displayed
    pub fn accept(&self, ticket: &QueryTicket) -> bool {
        let fresh = ticket.seq == self.issued && ticket.criteria == self.criteria;
        if !fresh {
            debug!("Discarding stale results for query #{}", ticket.seq);
        }
        fresh
    }
}
