use crate::config::SimulationConfig;
use crate::model::{AiSuggestion, Alert, Device, EfficiencyData};
use crate::store::ticker::{spawn_updater, UpdaterHandle};
use crate::store::update::{DashboardSnapshot, Lifecycle, StoreUpdate};
use crate::telemetry::{self, SimRng};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Collections owned by the store
#[derive(Default)]
struct DashboardState {
    devices: Vec<Device>,
    alerts: Vec<Alert>,
    efficiency: VecDeque<EfficiencyData>,
    suggestions: Vec<AiSuggestion>,
}

/// Single source of truth for one dashboard session
///
/// Readers get owned copies of the collections. Mutation happens through
/// `acknowledge_alert`, `refresh_data` and the updater ticks. Lock order is
/// rng before state.
pub struct DashboardStore {
    state: RwLock<DashboardState>,

    rng: Mutex<SimRng>,

    config: SimulationConfig,

    /// Broadcast channel for store changes
    update_tx: broadcast::Sender<StoreUpdate>,

    /// False until the first generation; updates are not broadcast before that
    live: AtomicBool,

    /// Running updater task, if started
    updater: Mutex<Option<UpdaterHandle>>,
}

impl DashboardStore {
    /// Create an uninitialized store; the random source is seeded from
    /// `config.seed` when set
    pub fn new(config: SimulationConfig) -> Self {
        let rng = telemetry::seeded_rng(config.seed);
        Self::with_rng(config, rng, 256)
    }

    /// Create an uninitialized store with an injected random source
    pub fn with_rng(config: SimulationConfig, rng: SimRng, broadcast_capacity: usize) -> Self {
        let (update_tx, _) = broadcast::channel(broadcast_capacity.max(1));

        Self {
            state: RwLock::new(DashboardState::default()),
            rng: Mutex::new(rng),
            config,
            update_tx,
            live: AtomicBool::new(false),
            updater: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.live.load(Ordering::SeqCst) {
            Lifecycle::Live
        } else {
            Lifecycle::Uninitialized
        }
    }

    /// Generate the initial data set unless the store is already live
    pub fn initialize(&self) {
        if self.lifecycle() == Lifecycle::Uninitialized {
            self.refresh_data();
        }
    }

    /// Discard all collections and regenerate them
    pub fn refresh_data(&self) {
        let now = Utc::now();

        {
            let mut rng = self.lock_rng();
            let devices = telemetry::generate_devices(&mut *rng, now, self.config.device_count);
            let alerts =
                telemetry::generate_alerts(&mut *rng, now, &devices, self.config.alert_count);
            let efficiency = telemetry::generate_efficiency_history(
                &mut *rng,
                now,
                self.config.initial_samples,
            );
            let suggestions = telemetry::generate_suggestions(&mut *rng);

            let mut state = self.write_state();
            state.devices = devices;
            state.alerts = alerts;
            state.efficiency = efficiency.into();
            // Initial sample count may exceed a small history capacity
            while state.efficiency.len() > self.config.history_capacity.max(1) {
                state.efficiency.pop_front();
            }
            state.suggestions = suggestions;

            info!(
                devices = state.devices.len(),
                alerts = state.alerts.len(),
                samples = state.efficiency.len(),
                suggestions = state.suggestions.len(),
                "Dashboard data generated"
            );
        }

        self.live.store(true, Ordering::SeqCst);
        let _ = self.update_tx.send(StoreUpdate::Refreshed { timestamp: now });
    }

    /// Mark an alert acknowledged
    ///
    /// Unknown ids are ignored. Acknowledging twice leaves the same state.
    pub fn acknowledge_alert(&self, alert_id: &str) {
        let changed = {
            let mut state = self.write_state();
            match state.alerts.iter_mut().find(|alert| alert.id == alert_id) {
                Some(alert) if !alert.acknowledged => {
                    alert.acknowledged = true;
                    true
                }
                Some(_) => false,
                None => {
                    debug!(alert_id = %alert_id, "Acknowledge for unknown alert ignored");
                    false
                }
            }
        };

        if changed {
            debug!(alert_id = %alert_id, "Alert acknowledged");
            if self.live.load(Ordering::Relaxed) {
                let _ = self.update_tx.send(StoreUpdate::AlertAcknowledged {
                    alert_id: alert_id.to_string(),
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Apply one updater step at `now`; returns false while uninitialized
    pub fn tick(&self, now: DateTime<Utc>) -> bool {
        self.apply_tick(now, None)
    }

    /// Apply one updater step unless `cancelled` is set
    ///
    /// The flag is read under the state write lock, so a canceller that sets
    /// it and then takes the lock observes no further mutation.
    pub(crate) fn tick_unless_cancelled(&self, now: DateTime<Utc>, cancelled: &AtomicBool) -> bool {
        self.apply_tick(now, Some(cancelled))
    }

    fn apply_tick(&self, now: DateTime<Utc>, cancelled: Option<&AtomicBool>) -> bool {
        if !self.live.load(Ordering::SeqCst) {
            return false;
        }

        let (devices, sample, evicted) = {
            let mut rng = self.lock_rng();
            let mut state = self.write_state();

            if cancelled.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
                return false;
            }

            telemetry::update_devices(&mut state.devices, &mut *rng, now);

            let sample = telemetry::next_efficiency_sample(state.efficiency.back(), &mut *rng, now);
            let evicted = telemetry::push_bounded(
                &mut state.efficiency,
                sample.clone(),
                self.config.history_capacity,
            );

            (state.devices.clone(), sample, evicted)
        };

        debug!(
            devices = devices.len(),
            overall_score = sample.overall_score,
            evicted = evicted,
            "Telemetry tick applied"
        );

        // No subscribers is fine
        let _ = self.update_tx.send(StoreUpdate::DevicesUpdated {
            devices,
            timestamp: now,
        });
        let _ = self.update_tx.send(StoreUpdate::EfficiencySample { sample, evicted });

        true
    }

    /// Generate data if needed and spawn the periodic updater
    ///
    /// Must be called from within a tokio runtime. Calling it while the updater
    /// is already running does nothing.
    pub fn start(self: &Arc<Self>) {
        self.initialize();

        let mut updater = self.lock_updater();
        if updater.is_some() {
            return;
        }

        let period = Duration::from_millis(self.config.tick_interval_ms.max(1));
        *updater = Some(spawn_updater(Arc::clone(self), period));
        info!(tick_interval_ms = period.as_millis() as u64, "Telemetry updater started");
    }

    /// Cancel the periodic updater
    ///
    /// No tick mutates the store after this returns.
    pub fn stop(&self) {
        let handle = self.lock_updater().take();

        if let Some(handle) = handle {
            handle.stop();
            // Wait out a tick that may hold the lock right now
            drop(self.write_state());
            info!("Telemetry updater stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_updater().is_some()
    }

    /// Subscribe to store updates
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.update_tx.subscribe()
    }

    pub fn devices(&self) -> Vec<Device> {
        self.read_state().devices.clone()
    }

    /// Get device by ID
    pub fn get_device(&self, device_id: &str) -> Option<Device> {
        self.read_state()
            .devices
            .iter()
            .find(|device| device.id == device_id)
            .cloned()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.read_state().alerts.clone()
    }

    /// Efficiency history, oldest first
    pub fn efficiency_data(&self) -> Vec<EfficiencyData> {
        self.read_state().efficiency.iter().cloned().collect()
    }

    pub fn ai_suggestions(&self) -> Vec<AiSuggestion> {
        self.read_state().suggestions.clone()
    }

    /// Consistent copy of all four collections
    pub fn snapshot(&self) -> DashboardSnapshot {
        let state = self.read_state();
        DashboardSnapshot {
            devices: state.devices.clone(),
            alerts: state.alerts.clone(),
            efficiency_data: state.efficiency.iter().cloned().collect(),
            ai_suggestions: state.suggestions.clone(),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, DashboardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_rng(&self) -> MutexGuard<'_, SimRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_updater(&self) -> MutexGuard<'_, Option<UpdaterHandle>> {
        self.updater.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
