use axum::{Extension, Json};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::error;

use crate::config::load_status_log;
use crate::models::{DayRecord, ProbeStatus, StatusLog};
use crate::severity::{self, Severity};
use crate::{timeline, AppContext};

/// Live view of every monitored service, refreshed first if stale.
pub async fn services(ctx: Extension<AppContext>) -> Json<ServicesResponse> {
    if let Err(err) = ctx.monitor.refresh_if_stale().await {
        // stale data is still served; the scheduler will catch up
        error!(error = %err, "lazy refresh failed");
    }

    let mut services = Vec::new();
    let mut live_ids = Vec::new();
    for (label, result) in ctx.monitor.snapshot().await {
        match result {
            Some(result) => {
                live_ids.push(result.status.status_id());
                services.push(ServiceStatus {
                    label,
                    status: Some(result.status),
                    response_time_ms: result.response_time_ms,
                    checked_at: Some(result.observed_at),
                });
            }
            None => services.push(ServiceStatus {
                label,
                status: None,
                response_time_ms: None,
                checked_at: None,
            }),
        }
    }

    Json(ServicesResponse {
        overall: severity::resolve(&live_ids),
        average_response_time_ms: ctx.monitor.rolling_average_response_time().await,
        uptime: ctx.monitor.uptime_percent().await,
        services,
    })
}

/// Day-by-day status for the trailing 90 days.
pub async fn history(ctx: Extension<AppContext>) -> Json<Vec<DayRecord>> {
    let log = load_status_log(&ctx.config.status.log).await;
    Json(timeline::build(&log, Local::now()))
}

/// Raw status log for programmatic consumers, exactly as curated.
pub async fn api_status(ctx: Extension<AppContext>) -> Json<StatusLog> {
    Json(load_status_log(&ctx.config.status.log).await)
}

#[derive(Serialize)]
pub struct ServicesResponse {
    pub overall: Severity,
    pub average_response_time_ms: f64,
    pub uptime: f64,
    pub services: Vec<ServiceStatus>,
}

#[derive(Serialize)]
pub struct ServiceStatus {
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ProbeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checked_at: Option<DateTime<Utc>>,
}
