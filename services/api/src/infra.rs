use metrics_exporter_prometheus::PrometheusHandle;
use school_outcomes::analysis::RankDirection;
use school_outcomes::pipeline::SchoolKind;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_school_kind(raw: &str) -> Result<SchoolKind, String> {
    raw.parse()
}

pub(crate) fn parse_direction(raw: &str) -> Result<RankDirection, String> {
    raw.parse()
}
