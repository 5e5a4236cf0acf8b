use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::{JobSettings, JobsConfig};
use crate::graphql::CrmSchema;

use super::{heartbeat, low_stock, reminders, report, JobError, LogSink};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs every job on its own interval until [`Scheduler::shutdown`].
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn start(schema: CrmSchema, config: &JobsConfig) -> Result<Self, JobError> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let (shutdown, signal) = watch::channel(false);
        let mut handles = Vec::with_capacity(4);

        let url = config.graphql_url.clone();
        handles.push(spawn_job(
            "heartbeat",
            &config.heartbeat,
            signal.clone(),
            move |sink| {
                let client = client.clone();
                let url = url.clone();
                async move { heartbeat::run(&client, &url, &sink).await.map(|_| ()) }
            },
        ));

        let low_stock_schema = schema.clone();
        handles.push(spawn_job(
            "low-stock",
            &config.low_stock,
            signal.clone(),
            move |sink| {
                let schema = low_stock_schema.clone();
                async move { low_stock::run(&schema, &sink).await.map(|_| ()) }
            },
        ));

        let reminders_schema = schema.clone();
        handles.push(spawn_job(
            "order-reminders",
            &config.reminders,
            signal.clone(),
            move |sink| {
                let schema = reminders_schema.clone();
                async move { reminders::run(&schema, &sink).await.map(|_| ()) }
            },
        ));

        handles.push(spawn_job("crm-report", &config.report, signal, move |sink| {
            let schema = schema.clone();
            async move { report::run(&schema, &sink).await.map(|_| ()) }
        }));

        Ok(Self { shutdown, handles })
    }

    /// Signals every job loop and waits for in-flight runs to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            if let Err(e) = handle.await {
                log::warn!("Job task ended abnormally: {}", e);
            }
        }
    }
}

fn spawn_job<F, Fut>(
    name: &'static str,
    settings: &JobSettings,
    mut shutdown: watch::Receiver<bool>,
    job: F,
) -> JoinHandle<()>
where
    F: Fn(LogSink) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send,
{
    let period = settings.interval;
    let sink = LogSink::new(settings.log_path.clone());

    tokio::spawn(async move {
        log::info!("Job {} scheduled every {:?}", name, period);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    log::info!("Job {} received shutdown signal", name);
                    break;
                }
                _ = ticker.tick() => {
                    log::info!("Job {} started", name);
                    match job(sink.clone()).await {
                        Ok(()) => log::info!("Job {} finished", name),
                        Err(e) => log::error!("Job {} failed: {}", name, e),
                    }
                }
            }
        }
    })
}
