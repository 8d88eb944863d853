//! End-to-end routing tests against the real filesystem
//!
//! Every test writes into its own temporary directory through the standard
//! backend, then reads the produced files back.

use nebula_log_router::prelude::*;
use nebula_log_router::sink::{RouteFilter, Target};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

fn modules() -> Vec<ModuleConfig> {
    vec![
        ModuleConfig::new("parser", "1", "0"),
        ModuleConfig::new("net", "2", "1"),
    ]
}

fn engine(dir: &Path) -> RoutingEngine {
    let engine = RoutingEngine::new(RouterConfig::new(dir));
    engine.load(modules()).unwrap();
    engine
}

#[test]
fn test_debug_is_filtered_and_error_is_aggregated() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(dir.path());
    let log = engine.channel("parser.1.0");

    assert_eq!(log.debug("tokenizing input").delivered, 0);
    assert_eq!(log.error("unexpected token").delivered, 2);

    let module = read(dir.path().join("parser10.log"));
    let aggregated = read(dir.path().join("critical.log"));
    assert!(!module.contains("tokenizing input"));
    assert!(!aggregated.contains("tokenizing input"));
    assert!(module.contains("(error)"));
    assert!(module.contains("[parser.1.0] unexpected token"));
    assert!(aggregated.contains("[parser.1.0] unexpected token"));
}

#[test]
fn test_disabled_level_still_reaches_aggregator() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(dir.path());

    let report = engine.disable("parser.1.0", Severity::Error).unwrap();
    assert!(report.rebuilt);
    assert!(report.is_clean());
    assert_eq!(
        engine.lookup("parser.1.0"),
        SeverityMask::INFO | SeverityMask::WARNING
    );

    engine.channel("parser.1.0").error("lost connection");

    assert!(!read(dir.path().join("parser10.log")).contains("lost connection"));
    assert!(read(dir.path().join("critical.log")).contains("lost connection"));
}

#[test]
fn test_enable_takes_effect_for_later_records() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(dir.path());
    let log = engine.channel("net.2.1");

    log.debug("before enable");
    engine.enable("net.2.1", Severity::Debug).unwrap();
    log.debug("after enable");

    let module = read(dir.path().join("net21.log"));
    assert!(!module.contains("before enable"));
    assert!(module.contains("after enable"));
    assert!(!read(dir.path().join("critical.log")).contains("after enable"));
}

#[test]
fn test_records_stay_on_their_channel() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(dir.path());

    engine.channel("net.2.1").warning("slow peer");

    assert!(read(dir.path().join("net21.log")).contains("slow peer"));
    assert!(!read(dir.path().join("parser10.log")).contains("slow peer"));
}

#[test]
fn test_critical_reaches_every_module_file() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(dir.path());
    engine.set_mask("net.2.1", SeverityMask::empty()).unwrap();

    // net21.log is no longer installed once its mask is empty
    assert_eq!(engine.channel("parser.1.0").critical("out of memory").delivered, 2);

    assert!(read(dir.path().join("parser10.log")).contains("out of memory"));
    assert!(read(dir.path().join("critical.log")).contains("(critical)"));
    assert!(!read(dir.path().join("net21.log")).contains("out of memory"));
}

#[test]
fn test_rebuild_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(dir.path());
    engine.enable("parser.1.0", Severity::Debug).unwrap();

    let before = engine.installed();
    let report = engine.rebuild().unwrap();
    assert!(report.rebuilt);
    assert_eq!(report.destinations, before.len());
    assert_eq!(engine.installed(), before);
    assert_eq!(engine.rebuild().unwrap(), report);
}

#[test]
fn test_installed_layout() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RoutingEngine::new(RouterConfig::new(dir.path()).with_console(true));
    engine.load(modules()).unwrap();

    let targets: Vec<Target> = engine.installed().into_iter().map(|d| d.target).collect();
    assert_eq!(
        targets,
        vec![
            Target::File(dir.path().join("parser10.log")),
            Target::File(dir.path().join("net21.log")),
            Target::File(dir.path().join("critical.log")),
            Target::Console,
        ]
    );

    let console = engine.installed().pop().unwrap();
    assert_eq!(console.filter, RouteFilter::All);
    assert_eq!(
        engine
            .channel("parser.1.0")
            .debug("mirrored only to the console")
            .delivered,
        1
    );
}

#[test]
fn test_empty_load_keeps_previous_routing() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(dir.path());
    let before = engine.installed();

    let error = engine.load(Vec::new()).unwrap_err();
    assert!(error.is_configuration());
    assert_eq!(engine.installed(), before);
    assert_eq!(engine.modules(), modules());

    engine.channel("parser.1.0").info("still routed");
    assert!(read(dir.path().join("parser10.log")).contains("still routed"));
}

#[test]
fn test_duplicate_load_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RoutingEngine::new(RouterConfig::new(dir.path()));

    let error = engine
        .load([
            ModuleConfig::new("parser", "1", "0"),
            ModuleConfig::new("parser", "1", "0"),
        ])
        .unwrap_err();
    assert!(error.is_configuration());
    assert!(engine.installed().is_empty());
}

#[test]
fn test_unwritable_log_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"").unwrap();

    let engine = RoutingEngine::new(RouterConfig::new(blocker.join("logs")));
    let error = engine.load(modules()).unwrap_err();

    assert!(matches!(error, LogError::LogDirectory { .. }));
    assert!(engine.installed().is_empty());
    assert_eq!(engine.lookup("parser.1.0"), SeverityMask::empty());
}

#[test]
fn test_init_with_and_route_log() {
    let dir = tempfile::tempdir().unwrap();
    let engine = nebula_log_router::init_with(RouterConfig::new(dir.path()), modules()).unwrap();
    let log = engine.channel("parser.1.0");

    route_log!(log, Severity::Warning, "retry {} of {}", 2, 5);

    assert!(read(dir.path().join("parser10.log")).contains("(warning)"));
    assert!(read(dir.path().join("parser10.log")).contains("retry 2 of 5"));
}

#[test]
fn test_emitters_run_during_reconfiguration() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(engine(dir.path()));

    let emitters: Vec<_> = (0..4)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let log = engine.channel("parser.1.0");
                for i in 0..100 {
                    log.error(format!("worker {worker} record {i}"));
                }
            })
        })
        .collect();

    for round in 0..20 {
        let level = if round % 2 == 0 {
            Severity::Debug
        } else {
            Severity::Notification
        };
        engine.enable("parser.1.0", level).unwrap();
        engine.disable("parser.1.0", level).unwrap();
    }

    for emitter in emitters {
        emitter.join().unwrap();
    }
    engine.flush().unwrap();

    // Error stays enabled throughout, so no record may be lost or torn.
    for path in ["parser10.log", "critical.log"] {
        let content = read(dir.path().join(path));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 400, "{path}");
        assert!(lines.iter().all(|line| line.starts_with("(error) ")));
    }
    assert_eq!(engine.lookup("parser.1.0"), SeverityMask::MODULE_DEFAULT);
}

fn installed_mask(engine: &RoutingEngine, id: &str) -> Option<SeverityMask> {
    engine
        .installed()
        .into_iter()
        .find_map(|destination| match destination.filter {
            RouteFilter::Module { channel, mask } if channel.as_str() == id => Some(mask),
            _ => None,
        })
}

#[test]
fn test_concurrent_reconfigurations_do_not_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(engine(dir.path()));

    // Each thread owns one bit of parser.1.0 and finishes in a known state.
    let toggles = [
        (Severity::Debug, true),
        (Severity::Notification, false),
        (Severity::Warning, false),
        (Severity::Critical, true),
    ];
    let mut workers: Vec<_> = toggles
        .into_iter()
        .map(|(level, end_enabled)| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..25 {
                    if i % 2 == 0 {
                        engine.enable("parser.1.0", level).unwrap();
                    } else {
                        engine.disable("parser.1.0", level).unwrap();
                    }
                }
                if end_enabled {
                    engine.enable("parser.1.0", level).unwrap();
                } else {
                    engine.disable("parser.1.0", level).unwrap();
                }
            })
        })
        .collect();

    let net = Arc::clone(&engine);
    workers.push(thread::spawn(move || {
        for mask in [SeverityMask::all(), SeverityMask::DEBUG, SeverityMask::empty()]
            .into_iter()
            .cycle()
            .take(30)
        {
            net.set_mask("net.2.1", mask).unwrap();
        }
        net.set_mask("net.2.1", SeverityMask::AGGREGATED).unwrap();
    }));

    for worker in workers {
        worker.join().unwrap();
    }

    let expected = (SeverityMask::INFO | SeverityMask::ERROR)
        .with(Severity::Debug)
        .with(Severity::Critical);
    assert_eq!(engine.lookup("parser.1.0"), expected);
    assert_eq!(installed_mask(&engine, "parser.1.0"), Some(expected));

    assert_eq!(engine.lookup("net.2.1"), SeverityMask::AGGREGATED);
    assert_eq!(
        installed_mask(&engine, "net.2.1"),
        Some(SeverityMask::AGGREGATED)
    );
}
