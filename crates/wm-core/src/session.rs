//! Tokio driver for the dashboard state machines
//!
//! [`DashboardSession`] owns a [`FilterState`] and a [`MarkerController`]
//! and supplies what they leave out: timers and store calls. Debounce and
//! popup delays run as spawned `sleep` tasks that fire their ticket when
//! they wake; whatever a newer edit or selection superseded is dropped by
//! the state machines themselves. The rendered state is published on a
//! `watch` channel and map commands on an `mpsc` channel.

use crate::catalog::SiteCatalog;
use crate::config::DashboardConfig;
use crate::criteria::{FilterCriteria, FilterField};
use crate::filter_state::{DebounceTicket, FilterState, QueryTicket};
use crate::markers::{MapCommand, MapMarker, MarkerController, MarkerId, MarkerPlan, PopupTicket};
use crate::pipeline::{summarize, trend, Summary, Trend};
use crate::records::CollectionRecord;
use crate::store::{DashboardData, RecordStore};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Everything the dashboard renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub selection: Option<MapMarker>,
    pub records: Vec<CollectionRecord>,
    pub summary: Summary,
    pub trend: Trend,
    pub loading: bool,
    pub error: Option<String>,
    pub open_popup: Option<MarkerId>,
    pub dashboard: Option<DashboardData>,
}

struct SessionState {
    filter: FilterState,
    markers: MarkerController,
}

struct Inner {
    store: Arc<dyn RecordStore>,
    config: DashboardConfig,
    state: Mutex<SessionState>,
    view: watch::Sender<DashboardView>,
    commands: mpsc::UnboundedSender<MapCommand>,
}

#[derive(Clone)]
pub struct DashboardSession {
    inner: Arc<Inner>,
}

impl DashboardSession {
    /// New session plus the receiving end of the map command stream
    pub fn new(
        store: Arc<dyn RecordStore>,
        catalog: &SiteCatalog,
        config: DashboardConfig,
    ) -> (Self, mpsc::UnboundedReceiver<MapCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (view, _) = watch::channel(DashboardView::default());

        let state = SessionState {
            filter: FilterState::new(),
            markers: MarkerController::from_catalog(catalog, &config),
        };

        let session = Self {
            inner: Arc::new(Inner {
                store,
                config,
                state: Mutex::new(state),
                view,
                commands,
            }),
        };
        (session, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.inner.view.subscribe()
    }

    pub fn view(&self) -> DashboardView {
        self.inner.view.borrow().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A filter form edit
    pub fn update_filter(&self, field: FilterField, raw: &str) {
        let (ticket, plan, released) = {
            let mut state = self.lock();
            let ticket = state.filter.update(field, raw);

            let pinned = match field {
                FilterField::SiteName => state
                    .filter
                    .criteria()
                    .site_name
                    .clone()
                    .and_then(|name| state.markers.find_by_site(&name).cloned()),
                _ => None,
            };
            match pinned {
                Some(marker) => {
                    let id = marker.id.clone();
                    state.filter.pin(marker);
                    (ticket, state.markers.external_select(&id), Vec::new())
                }
                None => (ticket, MarkerPlan::default(), state.markers.release()),
            }
        };

        self.send_commands(released);
        self.dispatch(plan);
        self.sync_view();
        self.schedule_query(ticket);
    }

    /// A direct click on a map marker
    pub fn click_marker(&self, id: &MarkerId) {
        let plan = self.lock().markers.click(id);
        self.dispatch(plan);
        self.sync_view();
    }

    /// A selection arriving from outside the map
    pub fn external_select(&self, id: &MarkerId) {
        let plan = self.lock().markers.external_select(id);
        self.dispatch(plan);
        self.sync_view();
    }

    /// Clear every filter and the selection
    pub fn reset(&self) {
        let (ticket, released) = {
            let mut state = self.lock();
            (state.filter.reset(), state.markers.release())
        };

        self.send_commands(released);
        self.sync_view();
        self.schedule_query(ticket);
    }

    /// Query the current criteria now, bypassing the debounce
    pub async fn refresh(&self) {
        let query = self.lock().filter.issue();
        self.run_query(query).await;
    }

    /// Load the per-site aggregates and fold them into the marker registry
    pub async fn load_dashboard(&self) {
        match self.inner.store.dashboard_data().await {
            Ok(data) => {
                self.lock().markers.merge(data.markers.clone());
                self.inner.view.send_modify(|view| view.dashboard = Some(data));
            }
            Err(e) => {
                warn!("Failed to load dashboard data: {}", e);
                self.inner.view.send_modify(|view| view.error = Some(e.to_string()));
            }
        }
    }

    /// Dismiss the error banner
    pub fn clear_error(&self) {
        self.inner.view.send_modify(|view| view.error = None);
    }

    fn dispatch(&self, plan: MarkerPlan) {
        let mut forward = Vec::with_capacity(plan.commands.len());
        for command in plan.commands {
            match command {
                MapCommand::Select(marker) => {
                    let ticket = self.lock().filter.select_site(marker);
                    self.schedule_query(ticket);
                }
                other => forward.push(other),
            }
        }
        self.send_commands(forward);

        if let Some(ticket) = plan.popup {
            self.schedule_popup(ticket);
        }
    }

    fn send_commands(&self, commands: Vec<MapCommand>) {
        for command in commands {
            if self.inner.commands.send(command).is_err() {
                debug!("Map command receiver dropped");
                return;
            }
        }
    }

    fn schedule_query(&self, ticket: DebounceTicket) {
        let session = self.clone();
        let delay = self.inner.config.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let query = session.lock().filter.fire(ticket);
            if let Some(query) = query {
                session.run_query(query).await;
            }
        });
    }

    fn schedule_popup(&self, ticket: PopupTicket) {
        let session = self.clone();

        tokio::spawn(async move {
            tokio::time::sleep(ticket.delay).await;
            let commands = session.lock().markers.fire_popup(&ticket);
            if !commands.is_empty() {
                session.send_commands(commands);
                session.sync_view();
            }
        });
    }

    async fn run_query(&self, query: QueryTicket) {
        self.inner.view.send_modify(|view| view.loading = true);

        let result = self.inner.store.filtered(&query.criteria).await;

        if !self.lock().filter.accept(&query) {
            return;
        }

        let aggregated = result.and_then(|records| {
            let summary = summarize(&records)?;
            let trend = trend(&records)?;
            Ok((records, summary, trend))
        });

        self.inner.view.send_modify(|view| {
            view.loading = false;
            match aggregated {
                Ok((records, summary, trend)) => {
                    view.records = records;
                    view.summary = summary;
                    view.trend = trend;
                    view.error = None;
                }
                Err(e) => {
                    warn!("Query #{} failed: {}", query.seq(), e);
                    view.error = Some(e.to_string());
                }
            }
        });
    }

    fn sync_view(&self) {
        let (criteria, selection, open_popup) = {
            let state = self.lock();
            (
                state.filter.criteria().clone(),
                state.filter.selection().cloned(),
                state.markers.open_popup().cloned(),
            )
        };

        self.inner.view.send_modify(|view| {
            view.criteria = criteria;
            view.selection = selection;
            view.open_popup = open_popup;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{NewCollection, WasteType};
    use crate::store::MemoryStore;
    use crate::CoreResult;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use tokio::sync::mpsc::error::TryRecvError;

    /// Memory store that records every query and answers unfiltered
    /// queries slowly
    struct ScriptedStore {
        inner: MemoryStore,
        queries: Mutex<Vec<FilterCriteria>>,
        slow: Duration,
    }

    #[async_trait]
    impl RecordStore for ScriptedStore {
        async fn submit(&self, input: NewCollection) -> CoreResult<CollectionRecord> {
            self.inner.submit(input).await
        }

        async fn filtered(&self, criteria: &FilterCriteria) -> CoreResult<Vec<CollectionRecord>> {
            self.queries.lock().unwrap().push(criteria.clone());
            if criteria.is_unconstrained() {
                tokio::time::sleep(self.slow).await;
            }
            self.inner.filtered(criteria).await
        }

        async fn dashboard_data(&self) -> CoreResult<DashboardData> {
            self.inner.dashboard_data().await
        }
    }

    impl ScriptedStore {
        fn queries(&self) -> Vec<FilterCriteria> {
            self.queries.lock().unwrap().clone()
        }
    }

    async fn fixture(slow: Duration) -> (Arc<ScriptedStore>, DashboardSession, mpsc::UnboundedReceiver<MapCommand>) {
        let catalog = Arc::new(SiteCatalog::builtin().unwrap());
        let inner = MemoryStore::new(catalog.clone());
        for (site, waste_type, day, volume) in [
            ("Rosterman Dumpsite", WasteType::Organic, 20, dec!(10.5)),
            ("Shirere Waste Collection", WasteType::Mixed, 20, dec!(7.5)),
            ("Rosterman Dumpsite", WasteType::Mixed, 21, dec!(18.3)),
        ] {
            inner
                .submit(NewCollection {
                    site_name: site.to_string(),
                    waste_type,
                    collection_date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
                    total_volume: volume,
                    waste_separated: false,
                    organic_volume: None,
                    inorganic_volume: None,
                    collection_count: 1,
                    latitude: 0.28,
                    longitude: 34.75,
                    comments: None,
                })
                .await
                .unwrap();
        }

        let store = Arc::new(ScriptedStore {
            inner,
            queries: Mutex::new(Vec::new()),
            slow,
        });
        let (session, commands) =
            DashboardSession::new(store.clone(), &catalog, DashboardConfig::default());
        (store, session, commands)
    }

    fn rosterman() -> MarkerId {
        MarkerId::from_site_name("Rosterman Dumpsite")
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_runs_one_query() {
        let (store, session, _commands) = fixture(Duration::ZERO).await;

        for raw in ["1", "12", "12.5"] {
            session.update_filter(FilterField::MinVolume, raw);
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert!(store.queries().is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;

        let queries = store.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].min_volume, Some(dec!(12.5)));

        let view = session.view();
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.summary.total_volume, dec!(18.3));
        assert!(!view.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let (_store, session, _commands) = fixture(Duration::from_secs(2)).await;

        // Slow unfiltered load still in flight when the filter changes
        let slow = session.clone();
        let refresh = tokio::spawn(async move { slow.refresh().await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        session.update_filter(FilterField::WasteType, "Organic");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(session.view().summary.total_records, 1);

        refresh.await.unwrap();
        let view = session.view();
        assert_eq!(view.summary.total_records, 1);
        assert_eq!(view.records[0].waste_type, WasteType::Organic);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_pans_then_opens_popup() {
        let (store, session, mut commands) = fixture(Duration::ZERO).await;

        session.click_marker(&rosterman());
        assert!(matches!(commands.try_recv(), Ok(MapCommand::PanTo { .. })));
        assert!(matches!(commands.try_recv(), Err(TryRecvError::Empty)));

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert!(matches!(commands.try_recv(), Err(TryRecvError::Empty)));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(commands.try_recv().unwrap(), MapCommand::OpenPopup(rosterman()));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let view = session.view();
        assert_eq!(view.open_popup, Some(rosterman()));
        assert_eq!(view.criteria, FilterCriteria::for_site("Rosterman Dumpsite"));
        assert_eq!(view.summary.total_records, 2);
        assert_eq!(store.queries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_edit_releases_selection() {
        let (_store, session, mut commands) = fixture(Duration::ZERO).await;

        session.click_marker(&rosterman());
        tokio::time::sleep(Duration::from_millis(450)).await;
        while commands.try_recv().is_ok() {}

        session.update_filter(FilterField::WasteSeparated, "no");
        assert_eq!(commands.try_recv().unwrap(), MapCommand::ClosePopup(rosterman()));

        let view = session.view();
        assert!(view.selection.is_none());
        assert_eq!(view.criteria.site_name, None);
        assert_eq!(view.open_popup, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_site_name_edit_selects_marker() {
        let (_store, session, mut commands) = fixture(Duration::ZERO).await;

        session.update_filter(FilterField::SiteName, "Rosterman Dumpsite");
        assert!(matches!(
            commands.try_recv(),
            Ok(MapCommand::PanTo { duration, .. }) if duration == Duration::from_millis(500)
        ));

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(commands.try_recv().unwrap(), MapCommand::OpenPopup(rosterman()));

        tokio::time::sleep(Duration::from_millis(400)).await;
        let view = session.view();
        assert_eq!(view.selection.map(|m| m.id), Some(rosterman()));
        assert_eq!(view.open_popup, Some(rosterman()));
        assert_eq!(view.criteria, FilterCriteria::for_site("Rosterman Dumpsite"));

        // a name with no marker drops the selection and its popup
        session.update_filter(FilterField::SiteName, "Backyard Pit");
        assert_eq!(commands.try_recv().unwrap(), MapCommand::ClosePopup(rosterman()));
        let view = session.view();
        assert!(view.selection.is_none());
        assert_eq!(view.open_popup, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_defaults() {
        let (_store, session, _commands) = fixture(Duration::ZERO).await;

        session.click_marker(&rosterman());
        session.reset();
        tokio::time::sleep(Duration::from_millis(600)).await;

        let view = session.view();
        assert!(view.criteria.is_unconstrained());
        assert!(view.selection.is_none());
        assert_eq!(view.summary.total_records, 3);
    }

    #[tokio::test]
    async fn test_load_dashboard_merges_markers() {
        let (_store, session, _commands) = fixture(Duration::ZERO).await;
        session.load_dashboard().await;

        let dashboard = session.view().dashboard.unwrap();
        assert_eq!(dashboard.total_records, 3);
        assert_eq!(dashboard.total_volume, dec!(36.3));

        let marker = session.lock().markers.get(&rosterman()).cloned().unwrap();
        assert_eq!(marker.volume, dec!(28.8));
        assert_ne!(marker.volume, Decimal::ZERO);
    }
}
