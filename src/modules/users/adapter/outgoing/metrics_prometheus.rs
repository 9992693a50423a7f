//! Prometheus adapter for account metrics.
//!
//! Counters are registered on the same registry the HTTP middleware exports,
//! so everything shows up under `/metrics`.

use prometheus::{Counter, CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::ports::outgoing::{AccountMetrics, UserAction};

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

fn register_counter_vec(
    registry: &Registry,
    namespace: &str,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<CounterVec, prometheus::Error> {
    let counter = CounterVec::new(Opts::new(name, help).namespace(namespace), labels)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

pub struct PrometheusAccountMetrics {
    user_actions_total: CounterVec,
    tokens_revoked_total: CounterVec,
    cache_operations_total: CounterVec,
    token_validations_total: CounterVec,
    users_purged_total: Counter,
    health_checks_total: CounterVec,
    health_check_duration_seconds: HistogramVec,
}

impl PrometheusAccountMetrics {
    /// Creates the counters under `namespace` and registers them.
    ///
    /// # Errors
    ///
    /// Fails when a metric with the same name is already registered.
    pub fn new(registry: &Registry, namespace: &str) -> Result<Self, prometheus::Error> {
        let counter_vec = |name: &str, help: &str, labels: &[&str]| {
            register_counter_vec(registry, namespace, name, help, labels)
        };

        let user_actions_total = counter_vec(
            "user_actions_total",
            "Account operations by action and outcome",
            &["action", "outcome"],
        )?;
        let tokens_revoked_total = counter_vec(
            "tokens_revoked_total",
            "Cached tokens revoked by token type",
            &["token_type"],
        )?;
        let cache_operations_total = counter_vec(
            "cache_operations_total",
            "Token cache operations by operation and outcome",
            &["operation", "outcome"],
        )?;
        let token_validations_total = counter_vec(
            "token_validations_total",
            "Token validations by token type and outcome",
            &["token_type", "outcome"],
        )?;
        let health_checks_total = counter_vec(
            "health_checks_total",
            "Health and readiness answers by endpoint and status",
            &["endpoint", "status"],
        )?;

        let health_check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "health_check_duration_seconds",
                "Time spent answering a health or readiness check",
            )
            .namespace(namespace)
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["endpoint"],
        )?;
        registry.register(Box::new(health_check_duration_seconds.clone()))?;

        let users_purged_total = Counter::with_opts(
            Opts::new(
                "users_purged_total",
                "Unactivated accounts removed by the purge worker",
            )
            .namespace(namespace),
        )?;
        registry.register(Box::new(users_purged_total.clone()))?;

        Ok(Self {
            user_actions_total,
            tokens_revoked_total,
            cache_operations_total,
            token_validations_total,
            users_purged_total,
            health_checks_total,
            health_check_duration_seconds,
        })
    }
}

impl AccountMetrics for PrometheusAccountMetrics {
    fn record_user_action(&self, action: UserAction, success: bool) {
        self.user_actions_total
            .with_label_values(&[action.as_str(), outcome(success)])
            .inc();
    }

    fn record_tokens_revoked(&self, purpose: TokenPurpose) {
        self.tokens_revoked_total
            .with_label_values(&[purpose.as_str()])
            .inc();
    }

    fn record_cache_operation(&self, operation: &'static str, success: bool) {
        self.cache_operations_total
            .with_label_values(&[operation, outcome(success)])
            .inc();
    }

    fn record_token_validation(&self, purpose: TokenPurpose, success: bool) {
        self.token_validations_total
            .with_label_values(&[purpose.as_str(), outcome(success)])
            .inc();
    }

    fn record_users_purged(&self, count: u64) {
        self.users_purged_total.inc_by(count as f64);
    }

    fn record_health_check(&self, endpoint: &'static str, status: &'static str, duration_secs: f64) {
        self.health_checks_total
            .with_label_values(&[endpoint, status])
            .inc();
        self.health_check_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration_secs);
    }
}
