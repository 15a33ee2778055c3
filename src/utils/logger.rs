use crate::utils::error::{LessonGenError, Result};
use tracing::Subscriber;
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type FormatLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// 已安裝的 subscriber 的輸出格式切換把手
pub struct LoggerHandle {
    handle: reload::Handle<FormatLayer, Registry>,
}

impl LoggerHandle {
    /// JSON lines for log collectors when running behind the bot backend.
    pub fn switch_to_json(&self) -> Result<()> {
        self.handle
            .reload(json_layer())
            .map_err(|e| LessonGenError::ConfigError {
                message: format!("Failed to switch to JSON logging: {}", e),
            })?;
        tracing::debug!("Switched log output to JSON");
        Ok(())
    }
}

fn compact_layer() -> FormatLayer {
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .boxed()
}

fn json_layer() -> FormatLayer {
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .json()
        .boxed()
}

fn build(verbose: bool) -> (impl Subscriber + Send + Sync + 'static, LoggerHandle) {
    let default_directive = if verbose {
        "lesson_gen=debug,info"
    } else {
        "lesson_gen=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let (format, handle) = reload::Layer::new(compact_layer());
    let subscriber = tracing_subscriber::registry().with(format).with(filter);

    (subscriber, LoggerHandle { handle })
}

/// Installs the compact CLI subscriber. Call once, right after argument parsing,
/// so config loading errors are logged too.
pub fn init_cli_logger(verbose: bool) -> LoggerHandle {
    let (subscriber, handle) = build(verbose);
    subscriber.init();
    handle
}
