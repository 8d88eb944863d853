//! Formatting macros for channel loggers

/// Emit a `format!`-style message through a [`ChannelLogger`](crate::ChannelLogger)
///
/// ```rust,no_run
/// use nebula_log_router::{ModuleConfig, RouterConfig, RoutingEngine, Severity, route_log};
///
/// let engine = RoutingEngine::new(RouterConfig::new("logs"));
/// engine.load([ModuleConfig::new("parser", "1", "0")])?;
/// let log = engine.channel("parser.1.0");
///
/// route_log!(log, Severity::Warning, "retrying after {} ms", 250);
/// # Ok::<(), nebula_log_router::LogError>(())
/// ```
#[macro_export]
macro_rules! route_log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, ::std::format!($($arg)+))
    };
}
