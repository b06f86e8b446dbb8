use tracing::Level;
use tracing_subscriber::{filter::FilterFn, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(target_os = "android")]
const LOGCAT_TAG: &str = "TreasureHunt-Rust";

/// Only events from our own crates, at `info` and above unless verbose.
fn keeps(module_path: Option<&str>, level: Level, verbose: bool) -> bool {
    let max = if verbose { Level::DEBUG } else { Level::INFO };
    module_path.unwrap_or_default().starts_with("treasure_hunt") && level <= max
}

fn filter(verbose: bool) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool> {
    FilterFn::new(move |metadata| keeps(metadata.module_path(), *metadata.level(), verbose))
}

#[cfg(target_os = "android")]
pub(crate) fn setup(verbose: bool) {
    use tracing_logcat::{LogcatMakeWriter, LogcatTag};
    use tracing_subscriber::fmt::format::Format;

    let writer = match LogcatMakeWriter::new(LogcatTag::Fixed(LOGCAT_TAG.to_owned())) {
        Ok(writer) => writer,
        Err(error) => {
            eprintln!("Failed to initialize logcat writer: {error}");
            return;
        }
    };
    let layer = tracing_subscriber::fmt::layer()
        .event_format(Format::default().with_level(false).without_time())
        .with_writer(writer)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(filter(verbose))
        .try_init();
}

#[cfg(not(target_os = "android"))]
pub(crate) fn setup(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(filter(verbose))
        .try_init();
}
