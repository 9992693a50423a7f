use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use sysinfo::{Disks, System};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::api::schemas::ErrorResponse;
use crate::modules::users::application::ports::outgoing::AccountMetrics;
use crate::shared::api::ApiResponse;
use crate::shared::config::ProjectSettings;

const DEGRADED_THRESHOLD: f64 = 80.0;
const UNHEALTHY_THRESHOLD: f64 = 90.0;

/// Dependencies of the health and readiness checks.
pub struct HealthState {
    settings: ProjectSettings,
    db: Arc<DatabaseConnection>,
    redis: Arc<Pool>,
    metrics: Arc<dyn AccountMetrics>,
    // CPU usage is measured between two refreshes, so the sampler is kept
    system: Arc<Mutex<System>>,
}

impl HealthState {
    pub fn new(
        settings: ProjectSettings,
        db: Arc<DatabaseConnection>,
        redis: Arc<Pool>,
        metrics: Arc<dyn AccountMetrics>,
    ) -> Self {
        Self {
            settings,
            db,
            redis,
            metrics,
            system: Arc::new(Mutex::new(System::new())),
        }
    }
}

/// Reads procfs and statfs, so it runs on the blocking pool.
fn sample_system(system: &Mutex<System>) -> SystemInfo {
    let mut system = system
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    system.refresh_cpu_usage();
    system.refresh_memory();

    let total = system.total_memory();
    let available = system.available_memory();
    let memory = MemoryInfo {
        total,
        available,
        percent: percent_of(total.saturating_sub(available), total),
        used: system.used_memory(),
        free: system.free_memory(),
    };

    SystemInfo {
        hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
        cpu_percent: round_percent(f64::from(system.global_cpu_usage())),
        memory,
        disk: root_disk(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }

    /// The worst reading decides: above 90% is unhealthy, above 80% degraded.
    pub fn classify(readings: &[f64]) -> Self {
        if readings.iter().any(|r| *r > UNHEALTHY_THRESHOLD) {
            HealthStatus::Unhealthy
        } else if readings.iter().any(|r| *r > DEGRADED_THRESHOLD) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemoryInfo {
    #[schema(example = 17179869184u64)]
    pub total: u64,
    pub available: u64,
    #[schema(example = 25.0)]
    pub percent: f64,
    pub used: u64,
    pub free: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiskInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    #[schema(example = 50.0)]
    pub percent: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemInfo {
    #[schema(example = "a2f460aba47d")]
    pub hostname: String,
    #[schema(example = 15.5)]
    pub cpu_percent: f64,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[schema(example = "InitStack")]
    pub app: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(example = "production")]
    pub environment: String,
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
}

#[derive(Serialize)]
struct HealthBody {
    success: bool,
    data: HealthReport,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    #[schema(example = "ok")]
    pub database: &'static str,
    #[schema(example = "ok")]
    pub redis: &'static str,
}

fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_percent(part as f64 * 100.0 / total as f64)
}

fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Usage of the disk mounted at `/`, or the first disk when there is none.
fn root_disk() -> DiskInfo {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| disks.list().first());

    match disk {
        Some(disk) => {
            let total = disk.total_space();
            let free = disk.available_space();
            let used = total.saturating_sub(free);
            DiskInfo {
                total,
                used,
                free,
                percent: percent_of(used, total),
            }
        }
        None => DiskInfo {
            total: 0,
            used: 0,
            free: 0,
            percent: 0.0,
        },
    }
}

/// Service health with host resource usage
///
/// Answers 503 whenever the status is not `healthy`.
#[utoipa::path(
    get,
    path = "/health/",
    tag = "health",
    responses(
        (status = 200, description = "Healthy", body = HealthReport),
        (status = 503, description = "Degraded or unhealthy", body = HealthReport),
        (status = 500, description = "Sampling failed", body = ErrorResponse),
    )
)]
#[get("/health/")]
pub async fn health(state: web::Data<HealthState>) -> impl Responder {
    let started = Instant::now();
    let sampler = state.system.clone();

    let system = match web::block(move || sample_system(&sampler)).await {
        Ok(system) => system,
        Err(e) => {
            error!(error = %e, "Health sampling task failed");
            state
                .metrics
                .record_health_check("health", "error", started.elapsed().as_secs_f64());
            return ApiResponse::internal_error();
        }
    };

    let status = HealthStatus::classify(&[
        system.cpu_percent,
        system.memory.percent,
        system.disk.percent,
    ]);
    state
        .metrics
        .record_health_check("health", status.as_str(), started.elapsed().as_secs_f64());

    let report = HealthReport {
        status,
        app: state.settings.name.clone(),
        version: state.settings.version.clone(),
        environment: state.settings.environment.clone(),
        timestamp: Utc::now(),
        system,
    };

    if status == HealthStatus::Healthy {
        HttpResponse::Ok().json(HealthBody {
            success: true,
            data: report,
        })
    } else {
        warn!(
            status = status.as_str(),
            cpu = report.system.cpu_percent,
            memory = report.system.memory.percent,
            disk = report.system.disk.percent,
            "Health check above threshold"
        );
        HttpResponse::ServiceUnavailable().json(HealthBody {
            success: false,
            data: report,
        })
    }
}

/// Readiness of Postgres and Redis
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Both dependencies reachable", body = ReadinessResponse),
        (status = 503, description = "A dependency is down", body = ReadinessResponse),
    )
)]
#[get("/ready")]
pub async fn readiness(state: web::Data<HealthState>) -> impl Responder {
    let started = Instant::now();
    let db_status = match state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1",
        ))
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            warn!(error = %e, "Database readiness check failed");
            "unhealthy"
        }
    };

    let redis_status = match state.redis.get().await {
        Ok(mut conn) => {
            match deadpool_redis::redis::cmd("PING")
                .query_async::<String>(&mut conn)
                .await
            {
                Ok(_) => "ok",
                Err(e) => {
                    warn!(error = %e, "Redis readiness check failed");
                    "unhealthy"
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "Redis pool unavailable");
            "unhealthy"
        }
    };

    let ready = db_status == "ok" && redis_status == "ok";
    state.metrics.record_health_check(
        "ready",
        if ready { "ok" } else { "unhealthy" },
        started.elapsed().as_secs_f64(),
    );

    if ready {
        HttpResponse::Ok().json(ReadinessResponse {
            status: "ok",
            database: db_status,
            redis: redis_status,
        })
    } else {
        HttpResponse::ServiceUnavailable().json(ReadinessResponse {
            status: "unhealthy",
            database: db_status,
            redis: redis_status,
        })
    }
}
