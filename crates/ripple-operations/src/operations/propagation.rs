//! Bump propagation over the package graph.
//!
//! Pass one asks the change detector about every versioned package. Pass two
//! walks the graph in dependency order and decides, per package, whether the
//! updates of its dependencies force a bump of its own:
//!
//! - a dependency matters only when the package's requirement no longer
//!   allows the dependency's new version;
//! - a direct change always wins and collects those dependency changes;
//! - exactly pinned dependencies hand their bump type down, unless several
//!   of them disagree, in which case no forced update is made;
//! - otherwise the package takes a dependency-change bump, carrying the first
//!   pre-release flag found among its dependency changes.

use chrono::NaiveDate;
use indexmap::IndexMap;
use ripple_changelog::ChangelogPatch;
use ripple_core::{BumpType, DependencyBump, Package};
use ripple_graph::PackageGraph;
use ripple_version::bump_version;
use semver::Version;
use tracing::{debug, info, warn};

use crate::Result;
use crate::error::OperationError;
use crate::traits::ChangeDetector;
use crate::types::{BumpPlan, PackageUpdate, UpdateOrigin};

enum LockedBump {
    None,
    Determined(BumpType),
    Ambiguous,
}

/// Computes the bump plan for every package of `graph`.
///
/// The plan lists updates in dependency order. Nothing is written.
///
/// # Errors
///
/// Returns an error if the detector fails or a new version cannot be computed.
pub fn compute_bumps<D>(graph: &PackageGraph, detector: &D, date: NaiveDate) -> Result<BumpPlan>
where
    D: ChangeDetector + ?Sized,
{
    let direct = detect_direct_changes(graph, detector)?;
    debug!(count = direct.len(), "detected direct changes");

    let mut plan = BumpPlan::new();
    graph.visit_in_dependency_order(|package| {
        if let Some(update) = resolve_package(graph, &plan, &direct, package, detector, date)? {
            info!(
                package = %update.name(),
                from = %update.current_version,
                to = %update.new_version,
                origin = %update.origin,
                "planned update"
            );
            plan.insert(update.package.name.clone(), update);
        }
        Ok::<_, OperationError>(())
    })?;

    Ok(plan)
}

fn detect_direct_changes<D>(graph: &PackageGraph, detector: &D) -> Result<IndexMap<String, BumpType>>
where
    D: ChangeDetector + ?Sized,
{
    let mut direct = IndexMap::new();
    for name in graph.dependency_order() {
        let Some(package) = graph.get(name) else {
            continue;
        };
        if package.version.is_none() {
            debug!(package = %name, "skipping unversioned package");
            continue;
        }
        if let Some(bump_type) = detector.try_detect(package)? {
            debug!(package = %name, bump = %bump_type, "direct change");
            direct.insert(name.to_string(), bump_type);
        }
    }
    Ok(direct)
}

fn resolve_package<D>(
    graph: &PackageGraph,
    plan: &BumpPlan,
    direct: &IndexMap<String, BumpType>,
    package: &Package,
    detector: &D,
    date: NaiveDate,
) -> Result<Option<PackageUpdate>>
where
    D: ChangeDetector + ?Sized,
{
    let dependency_changes: Vec<DependencyBump> = graph
        .dependencies_in_workspace(&package.name)
        .filter_map(|dependency| plan.get(&dependency.name))
        .filter(|update| !package.allows(update.name(), &update.new_version))
        .map(PackageUpdate::as_dependency_bump)
        .collect();

    let direct_bump = direct.get(&package.name).cloned();

    if dependency_changes.is_empty() {
        return match direct_bump {
            Some(bump_type) => direct_update(package, bump_type, Vec::new(), detector, date),
            None => Ok(None),
        };
    }

    if let Some(bump_type) = direct_bump {
        return direct_update(package, bump_type, dependency_changes, detector, date);
    }

    let Some(current) = &package.version else {
        debug!(package = %package.name, "unversioned package is not updated");
        return Ok(None);
    };

    let locked_type = match locked_bump_type(package, &dependency_changes, current) {
        LockedBump::None => None,
        LockedBump::Determined(bump_type) => Some(bump_type),
        LockedBump::Ambiguous => {
            warn!(
                package = %package.name,
                "pinned dependencies changed with different bump types, not updating"
            );
            return Ok(None);
        }
    };

    let (bump_type, origin) = match locked_type {
        Some(bump_type) => (bump_type, UpdateOrigin::Locked),
        None => (
            BumpType::DependencyChange {
                base: current.clone(),
                prerelease: inherited_prerelease(&dependency_changes),
            },
            UpdateOrigin::Dependency,
        ),
    };

    let new_version = next_version(package, current, &bump_type)?;
    let changelog = package.changelog_path().map(|path| {
        ChangelogPatch::new(&package.name, path, new_version.clone(), date)
            .with_dependency_changes(&dependency_changes)
    });

    Ok(Some(PackageUpdate {
        package: package.clone(),
        bump_type,
        origin,
        current_version: current.clone(),
        new_version,
        dependency_changes,
        changelog,
    }))
}

fn direct_update<D>(
    package: &Package,
    bump_type: BumpType,
    dependency_changes: Vec<DependencyBump>,
    detector: &D,
    date: NaiveDate,
) -> Result<Option<PackageUpdate>>
where
    D: ChangeDetector + ?Sized,
{
    let Some(current) = &package.version else {
        return Ok(None);
    };

    let mut update = PackageUpdate {
        package: package.clone(),
        new_version: next_version(package, current, &bump_type)?,
        bump_type,
        origin: UpdateOrigin::Direct,
        current_version: current.clone(),
        dependency_changes,
        changelog: None,
    };
    update.changelog = detector.changelog_patch(&update, date);

    Ok(Some(update))
}

/// The single bump type shared by all changed dependencies `package` pins
/// exactly, rebased onto `current` before comparison.
fn locked_bump_type(
    package: &Package,
    dependency_changes: &[DependencyBump],
    current: &Version,
) -> LockedBump {
    let mut locked = dependency_changes
        .iter()
        .filter(|change| package.is_locked_to(&change.name))
        .map(|change| rebase(change.bump_type.clone(), current));

    let Some(first) = locked.next() else {
        return LockedBump::None;
    };

    if locked.all(|other| other == first) {
        LockedBump::Determined(first)
    } else {
        LockedBump::Ambiguous
    }
}

/// A dependency-change bump taken over from a pinned dependency is computed
/// from the dependent's own version.
fn rebase(bump_type: BumpType, current: &Version) -> BumpType {
    match bump_type {
        BumpType::DependencyChange { prerelease, .. } => BumpType::DependencyChange {
            base: current.clone(),
            prerelease,
        },
        other => other,
    }
}

fn inherited_prerelease(dependency_changes: &[DependencyBump]) -> Option<String> {
    dependency_changes
        .iter()
        .find_map(|change| change.bump_type.prerelease_flag().filter(|f| !f.is_empty()))
        .map(str::to_string)
}

fn next_version(package: &Package, current: &Version, bump_type: &BumpType) -> Result<Version> {
    bump_version(current, bump_type).map_err(|source| OperationError::VersionCalculation {
        package: package.name.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use ripple_graph::FilterPolicy;

    use super::*;
    use crate::mocks::MockChangeDetector;
    use crate::mocks::fixtures::{package, req, unversioned};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn graph(packages: Vec<Package>) -> PackageGraph {
        PackageGraph::load(packages, &FilterPolicy::default()).expect("graph loads")
    }

    fn plan(packages: Vec<Package>, detector: &MockChangeDetector) -> BumpPlan {
        compute_bumps(&graph(packages), detector, date()).expect("compute succeeds")
    }

    fn v(s: &str) -> Version {
        s.parse().expect("valid version")
    }

    fn names(plan: &BumpPlan) -> Vec<&str> {
        plan.keys().map(String::as_str).collect()
    }

    fn change_names(update: &PackageUpdate) -> Vec<&str> {
        update
            .dependency_changes
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    #[test]
    fn empty_change_set_yields_empty_plan() {
        let plan = plan(
            vec![
                package("app", "1.0.0").with_dependency("core", req("^1.0.0")),
                package("core", "1.0.0"),
            ],
            &MockChangeDetector::new(),
        );

        assert!(plan.is_empty());
    }

    #[test]
    fn direct_change_is_recorded() {
        let detector = MockChangeDetector::new().with_bump("core", BumpType::Minor);

        let plan = plan(vec![package("core", "1.2.3")], &detector);

        let update = &plan["core"];
        assert_eq!(update.origin, UpdateOrigin::Direct);
        assert_eq!(update.bump_type, BumpType::Minor);
        assert_eq!(update.current_version, v("1.2.3"));
        assert_eq!(update.new_version, v("1.3.0"));
        assert!(update.dependency_changes.is_empty());
    }

    #[test]
    fn satisfied_requirement_does_not_propagate() {
        let detector = MockChangeDetector::new().with_bump("core", BumpType::Minor);

        let plan = plan(
            vec![
                package("app", "0.4.0").with_dependency("core", req("^1.0.0")),
                package("core", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(names(&plan), vec!["core"]);
    }

    #[test]
    fn violated_range_forces_dependency_change() {
        let detector = MockChangeDetector::new().with_bump("core", BumpType::Major);

        let plan = plan(
            vec![
                package("app", "0.4.1").with_dependency("core", req("^1.0.0")),
                package("core", "1.0.0"),
            ],
            &detector,
        );

        let app = &plan["app"];
        assert_eq!(app.origin, UpdateOrigin::Dependency);
        assert_eq!(
            app.bump_type,
            BumpType::DependencyChange {
                base: v("0.4.1"),
                prerelease: None,
            }
        );
        assert_eq!(app.new_version, v("0.4.2"));
        assert_eq!(change_names(app), vec!["core"]);
        assert_eq!(app.dependency_changes[0].new_version, v("2.0.0"));
    }

    #[test]
    fn chain_stops_where_requirement_is_satisfied() {
        let detector = MockChangeDetector::new().with_bump("c", BumpType::Major);

        let plan = plan(
            vec![
                package("a", "3.1.0").with_dependency("b", req("^2.0.0")),
                package("b", "2.0.0").with_dependency("c", req("^1.0.0")),
                package("c", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(names(&plan), vec!["c", "b"]);
        assert_eq!(plan["c"].bump_type, BumpType::Major);
        assert_eq!(plan["c"].new_version, v("2.0.0"));
        assert_eq!(plan["b"].origin, UpdateOrigin::Dependency);
        assert_eq!(plan["b"].new_version, v("2.0.1"));
        assert_eq!(change_names(&plan["b"]), vec!["c"]);
    }

    #[test]
    fn propagation_is_transitive() {
        let detector = MockChangeDetector::new().with_bump("c", BumpType::Major);

        let plan = plan(
            vec![
                package("a", "0.1.0").with_dependency("b", req("=2.0.0")),
                package("b", "2.0.0").with_dependency("c", req("^1.0.0")),
                package("c", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(names(&plan), vec!["c", "b", "a"]);
        let a = &plan["a"];
        assert_eq!(a.origin, UpdateOrigin::Locked);
        assert_eq!(
            a.bump_type,
            BumpType::DependencyChange {
                base: v("0.1.0"),
                prerelease: None,
            }
        );
        assert_eq!(a.new_version, v("0.1.1"));
    }

    #[test]
    fn locked_dependency_hands_down_its_bump_type() {
        let detector = MockChangeDetector::new().with_bump("core", BumpType::Major);

        let plan = plan(
            vec![
                package("app", "0.3.2").with_dependency("core", req("=1.0.0")),
                package("core", "1.0.0"),
            ],
            &detector,
        );

        let app = &plan["app"];
        assert_eq!(app.origin, UpdateOrigin::Locked);
        assert_eq!(app.bump_type, BumpType::Major);
        assert_eq!(app.new_version, v("1.0.0"));
    }

    #[test]
    fn locked_dependencies_agreeing_on_type_propagate() {
        let detector = MockChangeDetector::new()
            .with_bump("left", BumpType::Minor)
            .with_bump("right", BumpType::Minor);

        let plan = plan(
            vec![
                package("app", "1.0.0")
                    .with_dependency("left", req("=1.0.0"))
                    .with_dependency("right", req("=1.0.0")),
                package("left", "1.0.0"),
                package("right", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(plan["app"].bump_type, BumpType::Minor);
        assert_eq!(plan["app"].new_version, v("1.1.0"));
    }

    #[test]
    fn conflicting_locked_types_skip_the_forced_update() {
        let detector = MockChangeDetector::new()
            .with_bump("left", BumpType::Major)
            .with_bump("right", BumpType::Minor);

        let plan = plan(
            vec![
                package("app", "1.0.0")
                    .with_dependency("left", req("=1.0.0"))
                    .with_dependency("right", req("=1.0.0")),
                package("left", "1.0.0"),
                package("right", "1.0.0"),
            ],
            &detector,
        );

        assert!(!plan.contains_key("app"));
        assert_eq!(names(&plan), vec!["left", "right"]);
    }

    #[test]
    fn pinned_dependency_changes_from_different_versions_agree() {
        let detector = MockChangeDetector::new().with_bump("base", BumpType::Major);

        let plan = plan(
            vec![
                package("app", "0.5.0")
                    .with_dependency("left", req("=1.0.0"))
                    .with_dependency("right", req("=2.0.0")),
                package("left", "1.0.0").with_dependency("base", req("^1")),
                package("right", "2.0.0").with_dependency("base", req("^1")),
                package("base", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(names(&plan), vec!["base", "left", "right", "app"]);
        let app = &plan["app"];
        assert_eq!(app.origin, UpdateOrigin::Locked);
        assert_eq!(
            app.bump_type,
            BumpType::DependencyChange {
                base: v("0.5.0"),
                prerelease: None,
            }
        );
        assert_eq!(app.new_version, v("0.5.1"));
        assert_eq!(change_names(app), vec!["left", "right"]);
    }

    #[test]
    fn direct_change_survives_lock_conflict_and_keeps_dependency_changes() {
        let detector = MockChangeDetector::new()
            .with_bump("left", BumpType::Major)
            .with_bump("right", BumpType::Minor)
            .with_bump("app", BumpType::Patch);

        let plan = plan(
            vec![
                package("app", "1.0.0")
                    .with_dependency("left", req("=1.0.0"))
                    .with_dependency("right", req("=1.0.0")),
                package("left", "1.0.0"),
                package("right", "1.0.0"),
            ],
            &detector,
        );

        let app = &plan["app"];
        assert_eq!(app.origin, UpdateOrigin::Direct);
        assert_eq!(app.bump_type, BumpType::Patch);
        assert_eq!(app.new_version, v("1.0.1"));
        assert_eq!(change_names(app), vec!["left", "right"]);
    }

    #[test]
    fn direct_change_beats_propagation() {
        let detector = MockChangeDetector::new()
            .with_bump("core", BumpType::Major)
            .with_bump("app", BumpType::Minor);

        let plan = plan(
            vec![
                package("app", "1.0.0").with_dependency("core", req("=1.0.0")),
                package("core", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(plan["app"].bump_type, BumpType::Minor);
        assert_eq!(change_names(&plan["app"]), vec!["core"]);
    }

    #[test]
    fn prerelease_flag_is_inherited() {
        let detector =
            MockChangeDetector::new().with_bump("core", BumpType::PreRelease("beta".to_string()));

        let plan = plan(
            vec![
                package("app", "2.0.0").with_dependency("core", req("^1.0.0")),
                package("core", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(plan["core"].new_version, v("1.0.1-beta.1"));
        let app = &plan["app"];
        assert_eq!(
            app.bump_type,
            BumpType::DependencyChange {
                base: v("2.0.0"),
                prerelease: Some("beta".to_string()),
            }
        );
        assert_eq!(app.new_version, v("2.0.1-beta.1"));
    }

    #[test]
    fn prerelease_flag_travels_through_dependency_changes() {
        let detector =
            MockChangeDetector::new().with_bump("c", BumpType::PreRelease("rc".to_string()));

        let plan = plan(
            vec![
                package("a", "5.0.0").with_dependency("b", req("^3.0.0")),
                package("b", "3.0.0").with_dependency("c", req("^1.0.0")),
                package("c", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(plan["b"].new_version, v("3.0.1-rc.1"));
        assert_eq!(plan["a"].new_version, v("5.0.1-rc.1"));
    }

    #[test]
    fn unversioned_packages_are_never_updated() {
        let detector = MockChangeDetector::new()
            .with_bump("core", BumpType::Major)
            .with_bump("tool", BumpType::Patch);

        let plan = plan(
            vec![
                unversioned("tool").with_dependency("core", req("^1.0.0")),
                package("core", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(names(&plan), vec!["core"]);
        assert!(!detector.asked().contains(&"tool".to_string()));
    }

    #[test]
    fn dev_dependency_requirement_counts() {
        let detector = MockChangeDetector::new().with_bump("fixtures", BumpType::Major);

        let plan = plan(
            vec![
                package("app", "1.0.0").with_dev_dependency("fixtures", req("^0.2")),
                package("fixtures", "0.2.0"),
            ],
            &detector,
        );

        assert_eq!(change_names(&plan["app"]), vec!["fixtures"]);
    }

    #[test]
    fn any_disallowing_reference_forces_update() {
        let detector = MockChangeDetector::new().with_bump("core", BumpType::Major);

        let plan = plan(
            vec![
                package("app", "1.0.0")
                    .with_dependency("core", req("*"))
                    .with_dev_dependency("core", req("^1")),
                package("core", "1.0.0"),
            ],
            &detector,
        );

        assert!(plan.contains_key("app"));
    }

    #[test]
    fn dependencies_outside_the_graph_are_ignored() {
        let detector = MockChangeDetector::new().with_bump("core", BumpType::Major);
        let graph = PackageGraph::load(
            vec![
                package("app", "1.0.0").with_dependency("core", req("^1.0.0")),
                package("core", "1.0.0"),
            ],
            &FilterPolicy::default().with_exclude("core"),
        )
        .expect("graph loads");

        let plan = compute_bumps(&graph, &detector, date()).expect("compute succeeds");

        assert!(plan.is_empty());
    }

    #[test]
    fn plan_lists_dependencies_before_dependents() {
        let detector = MockChangeDetector::new().with_bump("base", BumpType::Major);

        let plan = plan(
            vec![
                package("top", "1.0.0")
                    .with_dependency("left", req("^1.0.0"))
                    .with_dependency("right", req("^1.0.0")),
                package("right", "1.0.0").with_dependency("base", req("^1.0.0")),
                package("left", "1.0.0").with_dependency("base", req("^1.0.0")),
                package("base", "1.0.0"),
            ],
            &detector,
        );

        assert_eq!(names(&plan), vec!["base", "right", "left", "top"]);
        for (index, update) in plan.values().enumerate() {
            for change in &update.dependency_changes {
                let position = plan.get_index_of(&change.name).expect("dependency planned");
                assert!(position < index);
            }
        }
        assert_eq!(change_names(&plan["top"]), vec!["left", "right"]);
    }

    #[test]
    fn computing_twice_gives_the_same_plan() {
        let packages = vec![
            package("d", "1.0.0")
                .with_dependency("b", req("^1"))
                .with_dependency("c", req("=1.0.0")),
            package("c", "1.0.0").with_dependency("a", req("^1")),
            package("b", "1.0.0").with_dependency("a", req("^1")),
            package("a", "1.0.0"),
        ];
        let detector = MockChangeDetector::new().with_bump("a", BumpType::Major);

        let first = plan(packages.clone(), &detector);
        for _ in 0..5 {
            assert_eq!(plan(packages.clone(), &detector), first);
        }
    }

    #[test]
    fn propagated_update_gets_changelog_patch_when_file_exists() {
        let detector = MockChangeDetector::new().with_bump("core", BumpType::Major);

        let plan = plan(
            vec![
                package("app", "1.0.0")
                    .with_dependency("core", req("^1.0.0"))
                    .with_changelog("/mock/workspace/crates/app/CHANGELOG.md"),
                package("lib", "1.0.0").with_dependency("core", req("^1.0.0")),
                package("core", "1.0.0"),
            ],
            &detector,
        );

        let patch = plan["app"].changelog.as_ref().expect("app has a changelog");
        assert_eq!(patch.version(), &v("1.0.1"));
        assert_eq!(
            patch.section(),
            "## [1.0.1] - 2025-06-01\n\n- `core` upgraded to `2.0.0`"
        );
        assert!(plan["lib"].changelog.is_none());
    }

    #[test]
    fn direct_update_changelog_comes_from_detector() {
        let detector = MockChangeDetector::new()
            .with_bump("core", BumpType::Minor)
            .with_summary("core", "Add streaming API");

        let plan = plan(
            vec![package("core", "1.0.0").with_changelog("/mock/workspace/crates/core/CHANGELOG.md")],
            &detector,
        );

        let patch = plan["core"].changelog.as_ref().expect("detector supplies a patch");
        assert_eq!(
            patch.section(),
            "## [1.1.0] - 2025-06-01\n\n- Add streaming API"
        );
    }

    #[test]
    fn invalid_prerelease_flag_is_reported_with_package() {
        let detector =
            MockChangeDetector::new().with_bump("core", BumpType::PreRelease(String::new()));

        let result = compute_bumps(&graph(vec![package("core", "1.0.0")]), &detector, date());

        assert!(matches!(
            result,
            Err(OperationError::VersionCalculation { ref package, .. }) if package == "core"
        ));
    }
}
