use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use shared::alerts::AlertBoard;
use shared::feed::{FeedHandle, Poller, PollerConfig};
use shared::lanes::LaneTable;
use shared::types::Junction;
use tokio::sync::watch;
use tracing::info;

use crate::router::Route;

/// Which data source backs the session.
pub enum FeedMode {
    /// Poll the traffic-data endpoint once a second.
    Live { base_url: String, client: reqwest::Client },
    /// The bundled dataset, loaded once.
    Static,
}

/// Keyboard focus on the map page: the marker list or the alert stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Markers,
    Alerts,
}

struct LiveFeed {
    rx: watch::Receiver<Option<Junction>>,
    handle: FeedHandle,
}

/// All dashboard state, owned in one place with three update points: on poll
/// tick, on dismiss, on navigation.
pub struct App {
    pub mode: FeedMode,
    pub route: Route,
    /// Current snapshot set. Live mode replaces it wholesale per tick; the
    /// iteration over it is what the map renders, however many junctions the
    /// feed happens to yield.
    pub junctions: Vec<Junction>,
    /// False until the mounted view has received its first (matching)
    /// snapshot; the live variant shows a connecting placeholder meanwhile.
    pub connected: bool,
    pub alerts: AlertBoard,
    pub focus: Focus,
    pub marker_cursor: usize,
    pub alert_cursor: usize,
    pub last_update: Option<DateTime<Local>>,
    pub lanes: LaneTable,
    should_quit: bool,
    feed: Option<LiveFeed>,
}

impl App {
    #[must_use]
    pub fn live(client: reqwest::Client, base_url: String, initial: Route) -> Self {
        let mut app = Self::empty(FeedMode::Live { base_url, client });
        app.enter_route(initial);
        app
    }

    /// Static variant: the dataset is final, so alerts derive from it once
    /// and the view is immediately ready.
    #[must_use]
    pub fn with_dataset(junctions: Vec<Junction>, initial: Route) -> Self {
        let mut app = Self::empty(FeedMode::Static);
        for junction in &junctions {
            app.alerts.reconcile(junction);
        }
        app.junctions = junctions;
        app.connected = true;
        app.route = initial;
        app
    }

    fn empty(mode: FeedMode) -> Self {
        Self {
            mode,
            route: Route::Map,
            junctions: Vec::new(),
            connected: false,
            alerts: AlertBoard::new(),
            focus: Focus::Markers,
            marker_cursor: 0,
            alert_cursor: 0,
            last_update: None,
            lanes: LaneTable::default(),
            should_quit: false,
            feed: None,
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.mode, FeedMode::Live { .. })
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The junction the current detail route points at, if the snapshot set
    /// has it.
    #[must_use]
    pub fn current_junction(&self) -> Option<&Junction> {
        match &self.route {
            Route::Junction(id) => self.junctions.iter().find(|j| &j.id == id),
            Route::Map => None,
        }
    }

    #[must_use]
    pub fn selected_junction(&self) -> Option<&Junction> {
        self.junctions.get(self.marker_cursor)
    }

    /// Route transition. The leaving view's poller is cancelled before the
    /// new one starts, so exactly one timer exists per mounted view and a
    /// response racing the transition is never applied.
    pub fn enter_route(&mut self, route: Route) {
        if let Some(feed) = self.feed.take() {
            feed.handle.cancel();
        }

        info!(path = %route.path(), "navigating");
        self.route = route;
        self.focus = Focus::Markers;
        self.marker_cursor = 0;
        self.alert_cursor = 0;

        if let FeedMode::Live { base_url, client } = &self.mode {
            // Each view owns its snapshot state from scratch.
            self.junctions.clear();
            self.connected = false;
            let (rx, handle) =
                Poller::start(client.clone(), PollerConfig::new(base_url.clone()));
            self.feed = Some(LiveFeed { rx, handle });
        }
    }

    /// Pulls the newest published snapshot out of the feed, if any.
    pub fn drain_feed(&mut self) {
        let snapshot = match self.feed.as_mut() {
            Some(feed) if feed.rx.has_changed().unwrap_or(false) => {
                feed.rx.borrow_and_update().clone()
            }
            _ => None,
        };
        if let Some(snapshot) = snapshot {
            self.apply_snapshot(snapshot);
        }
    }

    /// One poll tick's worth of state change: alerts reconcile against every
    /// snapshot; the visible set updates only when the snapshot belongs to
    /// the mounted view (the detail page filters to its route id and keeps
    /// waiting otherwise).
    pub fn apply_snapshot(&mut self, snapshot: Junction) {
        self.alerts.reconcile(&snapshot);
        self.last_update = Some(Local::now());

        let matches_view = match &self.route {
            Route::Map => true,
            Route::Junction(id) => &snapshot.id == id,
        };
        if matches_view {
            self.junctions = vec![snapshot];
            self.connected = true;
        }

        self.clamp_cursors();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        if matches!(self.route, Route::Map) {
            self.handle_map_key(key);
        } else {
            self.handle_detail_key(key);
        }
    }

    fn handle_map_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Markers if !self.alerts.is_empty() => Focus::Alerts,
                    _ => Focus::Markers,
                };
            }
            KeyCode::Up | KeyCode::Left => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Right => self.move_cursor(1),
            KeyCode::Enter => self.open_selection(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.focus == Focus::Alerts {
                    self.dismiss_selected_alert();
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.enter_route(Route::Map);
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            Focus::Markers => (&mut self.marker_cursor, self.junctions.len()),
            Focus::Alerts => (&mut self.alert_cursor, self.alerts.len()),
        };
        if len == 0 {
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn open_selection(&mut self) {
        let id = match self.focus {
            Focus::Markers => self.junctions.get(self.marker_cursor).map(|j| j.id.clone()),
            Focus::Alerts => {
                self.alerts.alerts().get(self.alert_cursor).map(|a| a.id.clone())
            }
        };
        if let Some(id) = id {
            self.enter_route(Route::Junction(id));
        }
    }

    fn dismiss_selected_alert(&mut self) {
        if let Some(alert) = self.alerts.alerts().get(self.alert_cursor) {
            let id = alert.id.clone();
            self.alerts.dismiss(&id);
            self.clamp_cursors();
        }
    }

    fn clamp_cursors(&mut self) {
        if self.marker_cursor >= self.junctions.len() {
            self.marker_cursor = self.junctions.len().saturating_sub(1);
        }
        if self.alert_cursor >= self.alerts.len() {
            self.alert_cursor = self.alerts.len().saturating_sub(1);
        }
        if self.alerts.is_empty() {
            self.focus = Focus::Markers;
        }
    }

    /// Stops the current view's poller, if one is running.
    pub fn shutdown(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.handle.cancel();
        }
    }
}
