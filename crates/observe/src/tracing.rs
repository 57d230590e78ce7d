use {
    crate::Config,
    std::{io::IsTerminal, panic::PanicHookInfo, sync::Once},
    time::macros::format_description,
    tracing::Level,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes tracing setup that is shared between the binaries.
/// `env_filter` has similar syntax to env_logger. It is documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    std::panic::set_hook(Box::new(tracing_panic_hook));
}

/// Like [`initialize`], but can be called multiple times in a row. Later calls
/// are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(env_filter: &str) {
    // The tracing subscriber below is global object so initializing it again in the
    // same process by a different thread would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        set_tracing_subscriber(&Config::default().with_env_filter(env_filter));
        std::panic::set_hook(Box::new(tracing_panic_hook));
    });
}

fn set_tracing_subscriber(config: &Config) {
    let threshold = stderr_threshold(config);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(
            std::io::stderr
                .with_filter(move |meta| goes_to_stderr(threshold, meta.level()))
                .or_else(std::io::stdout),
        )
        .with_timer(UtcTime::new(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        )))
        .with_ansi(std::io::stderr().is_terminal());

    let fmt_layer = if config.use_json_format {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    let result = tracing_subscriber::registry()
        .with(fmt_layer.with_filter(EnvFilter::new(&config.env_filter)))
        .try_init();
    if let Err(err) = result {
        // Only happens if something else already installed a global subscriber.
        eprintln!("failed to initialize tracing: {err}");
        return;
    }
    tracing::debug!(filter = %config.env_filter, json = config.use_json_format, "initialized tracing");
}

/// Stdout carries the output of the tools, so logs only go there below an
/// explicitly configured threshold.
fn stderr_threshold(config: &Config) -> Level {
    config.stderr_threshold.unwrap_or(Level::TRACE)
}

/// Whether an event of `level` is as or more severe than `threshold`.
fn goes_to_stderr(threshold: Level, level: &Level) -> bool {
    *level <= threshold
}

/// Panic hook that prints roughly the same message as the default panic hook
/// but uses tracing:error instead of stderr.
fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_keeps_stdout_free_of_logs() {
        let threshold = stderr_threshold(&Config::default());

        for level in [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::DEBUG,
            Level::TRACE,
        ] {
            assert!(goes_to_stderr(threshold, &level), "{level}");
        }
    }

    #[test]
    fn threshold_splits_streams() {
        let threshold = stderr_threshold(&Config::new("info", Some(Level::WARN), false));

        assert!(goes_to_stderr(threshold, &Level::ERROR));
        assert!(goes_to_stderr(threshold, &Level::WARN));
        assert!(!goes_to_stderr(threshold, &Level::INFO));
        assert!(!goes_to_stderr(threshold, &Level::DEBUG));
    }
}
