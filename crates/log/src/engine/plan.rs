//! Translating a filter table into destination descriptors
//!
//! Planning is pure: it decides which destinations exist and what they admit,
//! without touching the filesystem. Opening happens in the engine.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::RouterConfig;
use crate::core::RoutingWarning;
use crate::format::Formatter;
use crate::module::ModuleId;
use crate::severity::SeverityMask;
use crate::sink::{DestinationSpec, RouteFilter, Target};
use crate::table::ModuleFilterTable;

/// What a planned destination is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RouteRole {
    Module(ModuleId),
    Aggregator,
    Console,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedRoute {
    pub role: RouteRole,
    pub spec: DestinationSpec,
}

#[derive(Debug, Default)]
pub(crate) struct RoutePlan {
    pub routes: Vec<PlannedRoute>,
    pub warnings: Vec<RoutingWarning>,
}

/// Per-module files in registration order, then the aggregator, then the
/// optional console mirror.
pub(crate) fn plan(table: &ModuleFilterTable, config: &RouterConfig) -> RoutePlan {
    let mut plan = RoutePlan::default();
    let mut file_owners: HashMap<String, &ModuleId> = HashMap::new();

    for entry in table.entries().filter(|entry| entry.run_enabled()) {
        let module = entry.module();
        if let Err(reason) = module.validate() {
            plan.warnings.push(RoutingWarning::MalformedModule {
                id: entry.id().to_string(),
                reason,
            });
            continue;
        }

        // A module whose mask is empty gets no file at all.
        if entry.mask().is_empty() {
            continue;
        }

        let file_name = module.file_name();
        if let Some(owner) = file_owners.get(&file_name) {
            plan.warnings.push(RoutingWarning::MalformedModule {
                id: entry.id().to_string(),
                reason: format!("log file '{file_name}' already belongs to '{owner}'"),
            });
            continue;
        }

        plan.routes.push(PlannedRoute {
            role: RouteRole::Module(entry.id().clone()),
            spec: file_spec(
                config,
                config.log_dir.join(&file_name),
                RouteFilter::Module {
                    channel: entry.id().clone(),
                    mask: entry.mask(),
                },
            ),
        });
        file_owners.insert(file_name, entry.id());
    }

    plan.routes.push(PlannedRoute {
        role: RouteRole::Aggregator,
        spec: file_spec(
            config,
            config.aggregator_path(),
            RouteFilter::Severities(SeverityMask::AGGREGATED),
        ),
    });

    if config.console {
        plan.routes.push(PlannedRoute {
            role: RouteRole::Console,
            spec: DestinationSpec {
                target: Target::Console,
                filter: RouteFilter::All,
                rotation: None,
                formatter: if config.console_colors {
                    Formatter::colored()
                } else {
                    Formatter::plain()
                },
                auto_flush: config.auto_flush,
            },
        });
    }

    plan
}

fn file_spec(config: &RouterConfig, path: PathBuf, filter: RouteFilter) -> DestinationSpec {
    DestinationSpec {
        target: Target::File(path),
        filter,
        rotation: Some(config.rotation),
        formatter: Formatter::plain(),
        auto_flush: config.auto_flush,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleConfig;
    use crate::severity::Severity;
    use pretty_assertions::assert_eq;

    fn table(modules: Vec<ModuleConfig>) -> ModuleFilterTable {
        let mut table = ModuleFilterTable::new();
        table.load(modules).unwrap();
        table
    }

    fn targets(plan: &RoutePlan) -> Vec<Target> {
        plan.routes.iter().map(|route| route.spec.target.clone()).collect()
    }

    #[test]
    fn test_plan_layout() {
        let config = RouterConfig::new("/tmp/logs").with_console(true);
        let plan = plan(
            &table(vec![
                ModuleConfig::new("parser", "1", "0"),
                ModuleConfig::new("net", "2", "1"),
            ]),
            &config,
        );

        assert_eq!(
            targets(&plan),
            vec![
                Target::File(PathBuf::from("/tmp/logs/parser10.log")),
                Target::File(PathBuf::from("/tmp/logs/net21.log")),
                Target::File(PathBuf::from("/tmp/logs/critical.log")),
                Target::Console,
            ]
        );
        assert_eq!(plan.routes[2].role, RouteRole::Aggregator);
        assert_eq!(
            plan.routes[2].spec.target,
            Target::File(config.aggregator_path())
        );
        assert_eq!(
            plan.routes[2].spec.filter,
            RouteFilter::Severities(SeverityMask::AGGREGATED)
        );
        assert_eq!(plan.routes[3].spec.filter, RouteFilter::All);
        assert!(plan.routes[3].spec.formatter.colors());
        assert!(!plan.routes[0].spec.formatter.colors());
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_disabled_modules_get_no_file() {
        let plan = plan(
            &table(vec![
                ModuleConfig::new("parser", "1", "0").with_run_enabled(false),
            ]),
            &RouterConfig::new("logs"),
        );
        assert_eq!(
            targets(&plan),
            vec![Target::File(PathBuf::from("logs/critical.log"))]
        );
    }

    #[test]
    fn test_empty_mask_gets_no_file() {
        let mut table = table(vec![ModuleConfig::new("parser", "1", "0")]);
        table.set_mask("parser.1.0", SeverityMask::empty());
        let plan = plan(&table, &RouterConfig::new("logs"));
        assert_eq!(plan.routes.len(), 1);

        table.set_mask("parser.1.0", SeverityMask::CRITICAL);
        let plan = super::plan(&table, &RouterConfig::new("logs"));
        assert_eq!(plan.routes.len(), 2);
    }

    #[test]
    fn test_module_filter_carries_mask() {
        let mut table = table(vec![ModuleConfig::new("parser", "1", "0")]);
        table.enable("parser.1.0", Severity::Debug);
        let plan = plan(&table, &RouterConfig::new("logs"));
        assert_eq!(
            plan.routes[0].spec.filter,
            RouteFilter::Module {
                channel: ModuleId::from("parser.1.0"),
                mask: SeverityMask::MODULE_DEFAULT.with(Severity::Debug),
            }
        );
    }

    #[test]
    fn test_malformed_and_colliding_modules_are_skipped() {
        let plan = plan(
            &table(vec![
                ModuleConfig::new("", "1", "0"),
                ModuleConfig::new("ab", "1", "0"),
                ModuleConfig::new("a", "b1", "0"),
            ]),
            &RouterConfig::new("logs"),
        );

        assert_eq!(
            targets(&plan),
            vec![
                Target::File(PathBuf::from("logs/ab10.log")),
                Target::File(PathBuf::from("logs/critical.log")),
            ]
        );
        assert_eq!(plan.warnings.len(), 2);
        assert!(matches!(
            &plan.warnings[1],
            RoutingWarning::MalformedModule { id, .. } if id == "a.b1.0"
        ));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let table = table(vec![
            ModuleConfig::new("parser", "1", "0"),
            ModuleConfig::new("net", "2", "1"),
        ]);
        let config = RouterConfig::new("logs").with_console(true);
        assert_eq!(plan(&table, &config).routes, plan(&table, &config).routes);
    }
}
