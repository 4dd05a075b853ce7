use crate::cli::ServeArgs;
use crate::infra::{build_runner, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use patient_triage::config::AppConfig;
use patient_triage::error::AppError;
use patient_triage::telemetry;
use patient_triage::workflows::assessment::{
    AssessmentReport, AssessmentRunner, AssessmentSubmitter, PagedPatientSource,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if args.skip_startup_run {
        config.assessment.run_on_startup = false;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let runner = build_runner(&config)?;
    let app = with_service_routes(runner.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    if config.assessment.run_on_startup {
        startup_assessment(runner, config.assessment.startup_failure_fatal).await?;
    }
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        api = %config.api.base_url,
        "patient triage service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Kicks off the startup run. In fatal mode the run is awaited and its failure returned;
/// otherwise it runs in the background and failures are only logged.
pub(crate) async fn startup_assessment<S, U>(
    runner: Arc<AssessmentRunner<S, U>>,
    fatal: bool,
) -> Result<(), AppError>
where
    S: PagedPatientSource + 'static,
    U: AssessmentSubmitter + 'static,
{
    if fatal {
        let report = runner.run().await?;
        log_startup_report(&report);
        return Ok(());
    }

    tokio::spawn(async move {
        match runner.run().await {
            Ok(report) => log_startup_report(&report),
            Err(err) => error!(stage = err.stage(), error = %err, "startup assessment failed"),
        }
    });
    Ok(())
}

fn log_startup_report(report: &AssessmentReport) {
    info!(
        patients = report.patients_fetched,
        success = report.submission.success,
        "startup assessment finished"
    );
}

/// One-shot assessment for the `run` subcommand.
pub(crate) async fn run_once() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let runner = build_runner(&config)?;
    info!(api = %config.api.base_url, "running assessment");
    let report = runner.run().await?;
    println!("{}", report.render());
    Ok(())
}
