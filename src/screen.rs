//! Weather screen controller
//!
//! Owns the screen state and the three user actions (search, locate,
//! refresh) plus the unit toggle. State changes are published on a
//! [`tokio::sync::watch`] channel for whatever view is attached.
//!
//! A new action aborts the fetch still in flight, and a result is only
//! applied if it belongs to the most recent action, so a slow earlier
//! response can never overwrite a newer one. Actions spawn onto the current
//! Tokio runtime and must be called from within one.

use crate::aggregator::aggregate_daily;
use crate::error::Notice;
use crate::location_resolver::{LocationParser, LocationResolver};
use crate::models::{CurrentConditions, ForecastDay, LocationQuery, ResolvedPlace, WeatherReport};
use crate::sensor::{LocationSensor, PermissionStatus};
use crate::units::DisplayUnit;
use crate::weather::WeatherProvider;
use crate::{Result, SkycastError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Everything the view needs to draw the screen
#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    /// Heading shown above the current conditions
    pub city: String,
    /// Place the displayed data belongs to
    pub place: Option<ResolvedPlace>,
    pub unit: DisplayUnit,
    pub loading: bool,
    pub current: Option<CurrentConditions>,
    /// At most five upcoming days
    pub forecast: Vec<ForecastDay>,
    /// Alert raised by the last failed action
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone)]
enum Request {
    Query(LocationQuery),
    Device,
    Place(ResolvedPlace),
}

pub struct WeatherScreen {
    provider: Arc<dyn WeatherProvider>,
    sensor: Arc<dyn LocationSensor>,
    state: Arc<watch::Sender<ScreenState>>,
    generation: Arc<AtomicU64>,
    in_flight: Option<JoinHandle<()>>,
}

impl WeatherScreen {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        sensor: Arc<dyn LocationSensor>,
        city: impl Into<String>,
        unit: DisplayUnit,
    ) -> Self {
        let (state, _) = watch::channel(ScreenState {
            city: city.into(),
            unit,
            ..ScreenState::default()
        });

        Self {
            provider,
            sensor,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
        }
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> ScreenState {
        self.state.borrow().clone()
    }

    /// Receive every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.state.subscribe()
    }

    /// Load weather for the city the screen was opened with
    pub fn open(&mut self) {
        let city = self.state.borrow().city.clone();
        info!("Opening screen for {}", city);
        self.search(&city);
    }

    /// Search for a city name or `lat,lon` pair.
    ///
    /// Blank queries are ignored without touching the state or the network;
    /// returns whether a fetch was started.
    pub fn search(&mut self, query: &str) -> bool {
        match LocationParser::parse(query) {
            Ok(query) => {
                info!("Search triggered: {:?}", query);
                self.start(Request::Query(query));
                true
            }
            Err(e) => {
                debug!("Ignoring search: {}", e);
                false
            }
        }
    }

    /// Fetch weather for the device's own position
    pub fn locate(&mut self) {
        info!("Locate triggered");
        self.start(Request::Device);
    }

    /// Fetch again for the place currently shown, or the heading city
    pub fn refresh(&mut self) -> bool {
        let (place, city) = {
            let state = self.state.borrow();
            (state.place.clone(), state.city.clone())
        };

        match place {
            Some(place) => {
                info!("Refresh triggered for {}", place.name);
                self.start(Request::Place(place));
                true
            }
            None => self.search(&city),
        }
    }

    /// Flip between Celsius and Fahrenheit; display only, nothing is fetched
    pub fn toggle_units(&mut self) -> DisplayUnit {
        let mut unit = DisplayUnit::default();
        self.state.send_modify(|state| {
            state.unit = state.unit.toggled();
            unit = state.unit;
        });
        info!("Display unit set to {}", unit);
        unit
    }

    /// Clear the current notice once the user has seen it
    pub fn dismiss_notice(&mut self) {
        self.state.send_if_modified(|state| state.notice.take().is_some());
    }

    /// Wait for the in-flight fetch, if any, to finish
    pub async fn settled(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("Weather fetch task failed: {}", e);
                }
            }
        }
    }

    fn start(&mut self, request: Request) {
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                debug!("Cancelling superseded fetch");
            }
            previous.abort();
        }

        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.loading = true);

        let task = FetchTask {
            provider: Arc::clone(&self.provider),
            sensor: Arc::clone(&self.sensor),
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
            token,
        };
        self.in_flight = Some(tokio::spawn(task.run(request)));
    }
}

impl Drop for WeatherScreen {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// One spawned fetch, tagged with the generation that started it
struct FetchTask {
    provider: Arc<dyn WeatherProvider>,
    sensor: Arc<dyn LocationSensor>,
    state: Arc<watch::Sender<ScreenState>>,
    generation: Arc<AtomicU64>,
    token: u64,
}

impl FetchTask {
    fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.token
    }

    #[instrument(name = "fetch_weather", skip(self), fields(generation = self.token))]
    async fn run(self, request: Request) {
        // Clears the loading flag on every exit, including abort
        let _loading = LoadingGuard {
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
            token: self.token,
        };

        let result = load(self.provider.as_ref(), self.sensor.as_ref(), request).await;

        self.state.send_if_modified(|state| {
            if !self.is_current() {
                debug!("Discarding result of superseded fetch");
                return false;
            }

            match result {
                Ok((report, forecast)) => {
                    info!(
                        "Showing weather for {} ({} forecast days)",
                        report.place.name,
                        forecast.len()
                    );
                    state.city = report.place.name.clone();
                    state.place = Some(report.place);
                    state.current = Some(report.current);
                    state.forecast = forecast;
                    state.notice = None;
                    true
                }
                Err(e) => {
                    // Previously shown data stays on screen
                    error!("Weather action failed: {}", e);
                    match e.notice() {
                        Some(notice) => {
                            state.notice = Some(notice);
                            true
                        }
                        None => false,
                    }
                }
            }
        });
    }
}

struct LoadingGuard {
    state: Arc<watch::Sender<ScreenState>>,
    generation: Arc<AtomicU64>,
    token: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) == self.token && state.loading {
                state.loading = false;
                true
            } else {
                false
            }
        });
    }
}

/// Resolve, fetch and aggregate for one request
async fn load(
    provider: &dyn WeatherProvider,
    sensor: &dyn LocationSensor,
    request: Request,
) -> Result<(WeatherReport, Vec<ForecastDay>)> {
    let place = match request {
        Request::Query(query) => LocationResolver::resolve(provider, query).await?,
        Request::Device => {
            if sensor.request_permission().await == PermissionStatus::Denied {
                return Err(SkycastError::LocationPermissionDenied);
            }
            let (lat, lon) = sensor.current_position().await?;
            debug!("Device position: {:.4}, {:.4}", lat, lon);
            LocationResolver::resolve(provider, LocationQuery::Coordinates(lat, lon)).await?
        }
        Request::Place(place) => place,
    };

    let report = provider.fetch(&place).await?;
    let forecast = aggregate_daily(&report.points, report.today);
    Ok((report, forecast))
}
