//! Log backend setup.

use log::LevelFilter;

/// Install the `env_logger` backend.
///
/// `RUST_LOG` wins when set; otherwise warnings are shown, or debug output
/// with `--verbose`.
pub(crate) fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.format_timestamp(None).format_target(false);

    let _ = builder.try_init();
}
