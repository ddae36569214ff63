// monitor is a background task (entirely separate from axum) which probes
// every configured service and keeps the shared state the routes read from

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::{task, time};
use tracing::{debug, error};

use crate::config::ServiceConfig;
use crate::models::{round2, ProbeResult, ProbeStatus};
use crate::probe;

/// Cadence of scheduled passes, and the staleness bound for lazy refresh.
pub const PASS_INTERVAL: Duration = Duration::from_secs(30);
/// Delay before retrying after a failed pass.
pub const ERROR_BACKOFF: Duration = Duration::from_secs(60);
/// Rolling average samples kept, one per pass.
const RESPONSE_WINDOW: usize = 100;

#[derive(Default)]
struct MonitorState {
    services: HashMap<String, ProbeResult>,
    response_times: VecDeque<f64>,
    last_pass: Option<DateTime<Utc>>,
}

impl MonitorState {
    fn record_sample(&mut self, average_ms: f64) {
        if self.response_times.len() >= RESPONSE_WINDOW {
            self.response_times.pop_front();
        }
        self.response_times.push_back(round2(average_ms));
    }
}

pub struct Monitor {
    services: Vec<ServiceConfig>,
    client: reqwest::Client,
    state: RwLock<MonitorState>,
    // serializes scheduled and lazy passes, so the state only ever holds
    // one coherent pass per service
    pass_lock: Mutex<()>,
}

impl Monitor {
    pub fn new(services: Vec<ServiceConfig>) -> anyhow::Result<Self> {
        Ok(Self {
            services,
            client: probe::build_client()?,
            state: RwLock::new(MonitorState::default()),
            pass_lock: Mutex::new(()),
        })
    }

    /// Probes every configured service once and applies the results as a
    /// single state update.
    pub async fn run_pass(&self) -> anyhow::Result<()> {
        let _guard = self.pass_lock.lock().await;
        self.run_pass_locked().await
    }

    /// Runs a pass only if the last one is older than the staleness bound.
    /// Returns whether a pass actually ran.
    pub async fn refresh_if_stale(&self) -> anyhow::Result<bool> {
        let _guard = self.pass_lock.lock().await;
        // re-check under the lock: a scheduled pass may have just finished
        if self.seconds_since_last_pass().await <= PASS_INTERVAL.as_secs_f64() {
            return Ok(false);
        }
        self.run_pass_locked().await?;
        Ok(true)
    }

    async fn run_pass_locked(&self) -> anyhow::Result<()> {
        let mut handles = Vec::with_capacity(self.services.len());
        for service in &self.services {
            let client = self.client.clone();
            let service = service.clone();
            handles.push(task::spawn(async move {
                let result = probe::check_endpoint(&client, &service.endpoint).await;
                (service.label, result)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        let mut timings = Vec::new();
        for handle in handles {
            let (label, result) = handle.await?;
            debug!(
                service = %label,
                status = ?result.status,
                response_time_ms = ?result.response_time_ms,
                "probe finished"
            );
            if let Some(ms) = result.response_time_ms {
                timings.push(ms);
            }
            results.push((label, result));
        }

        let mut state = self.state.write().await;
        for (label, result) in results {
            state.services.insert(label, result);
        }
        if !timings.is_empty() {
            let average = timings.iter().sum::<f64>() / timings.len() as f64;
            state.record_sample(average);
        }
        state.last_pass = Some(Utc::now());

        Ok(())
    }

    pub async fn get_status(&self, service: &str) -> Option<ProbeResult> {
        self.state.read().await.services.get(service).cloned()
    }

    /// Average over the rolling window, 0 until a pass has produced timings.
    pub async fn rolling_average_response_time(&self) -> f64 {
        let state = self.state.read().await;
        if state.response_times.is_empty() {
            return 0.0;
        }
        let sum: f64 = state.response_times.iter().sum();
        round2(sum / state.response_times.len() as f64)
    }

    pub async fn seconds_since_last_pass(&self) -> f64 {
        match self.state.read().await.last_pass {
            Some(at) => (Utc::now() - at).num_milliseconds() as f64 / 1000.0,
            None => f64::INFINITY,
        }
    }

    /// Share of services currently operational, as a percentage. Reads as
    /// fully available until the first pass has something to say.
    pub async fn uptime_percent(&self) -> f64 {
        let state = self.state.read().await;
        if state.services.is_empty() {
            return 99.98;
        }
        let operational = state
            .services
            .values()
            .filter(|result| result.status == ProbeStatus::Operational)
            .count();
        round2(operational as f64 / state.services.len() as f64 * 100.0)
    }

    /// Latest result per configured service, in configuration order.
    pub async fn snapshot(&self) -> Vec<(String, Option<ProbeResult>)> {
        let state = self.state.read().await;
        self.services
            .iter()
            .map(|service| {
                (
                    service.label.clone(),
                    state.services.get(&service.label).cloned(),
                )
            })
            .collect()
    }
}

pub async fn start(monitor: Arc<Monitor>) -> anyhow::Result<()> {
    let forever = task::spawn(async move {
        loop {
            let delay = match monitor.run_pass().await {
                Ok(()) => PASS_INTERVAL,
                Err(err) => {
                    error!(error = %err, "monitoring pass failed");
                    ERROR_BACKOFF
                }
            };
            time::sleep(delay).await;
        }
    });

    forever.await?;
    Ok(())
}
