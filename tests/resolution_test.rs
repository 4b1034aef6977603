//! Tests for candidate selection and constructor resolution

use std::sync::Arc;

use wireup::{
    candidate, DomainError, HarnessError, ManifestRegistry, ModuleManifest, Overrides, Settings,
    TestHarness,
};

trait Service: Send + Sync {}

struct Clock {
    now: u64,
}

struct Store;

// Name pair for prefix-residual selection: requesting `Report` must pick
// `Report` itself over the longer `ReportArchiver`.
struct Report {
    source: &'static str,
    seen_at: u64,
}

impl Report {
    fn new(clock: Arc<Clock>) -> Self {
        Self {
            source: "report",
            seen_at: clock.now,
        }
    }
}

impl Service for Report {}

#[derive(Debug)]
struct ReportArchiver;

impl ReportArchiver {
    fn new(_clock: Arc<Clock>, _store: Arc<Store>) -> Self {
        Self
    }
}

impl Service for ReportArchiver {}

// Two constructors; only the smaller one is ever attempted.
struct Mailer {
    configured: bool,
}

impl Mailer {
    fn unconfigured(clock: Arc<Clock>) -> Self {
        let _ = clock;
        Self { configured: false }
    }

    fn configured(clock: Arc<Clock>, store: Arc<Store>) -> Self {
        let _ = (clock, store);
        Self { configured: true }
    }
}

impl Service for Mailer {}

fn registry() -> Arc<ManifestRegistry> {
    Arc::new(
        ManifestRegistry::default().with_module(
            ModuleManifest::new("app::reports")
                .candidate(candidate! { Report as dyn Service { new(clock: Clock); } })
                .candidate(
                    candidate! { ReportArchiver as dyn Service { new(clock: Clock, store: Store); } },
                )
                .candidate(candidate! { Mailer as dyn Service {
                    configured(clock: Clock, store: Store);
                    unconfigured(clock: Clock);
                } }),
        ),
    )
}

fn harness() -> TestHarness<dyn Service> {
    TestHarness::<dyn Service>::builder(registry(), "app::reports")
        .supply_config(|| Some(Settings::default()))
        .configure_services(|services, _| {
            services.register_instance(Clock { now: 1_700_000_000 });
            services.register_instance(Store);
        })
        .build()
}

#[test]
fn given_shorter_and_longer_name_matches_when_getting_then_smallest_residual_wins() {
    let harness = harness();
    harness.checkpoint().expect("ready");

    let report = harness
        .get::<Report>()
        .expect("resolvable")
        .expect("exact name is the shortest match");
    assert_eq!(report.source, "report");
}

#[test]
fn given_multiple_constructors_when_getting_then_smallest_is_used() {
    let harness = harness();

    let mailer = harness.get::<Mailer>().expect("resolvable").expect("match");
    assert!(!mailer.configured);
}

#[test]
fn given_no_matching_candidate_when_getting_then_none_not_error() {
    struct Unregistered;

    let harness = harness();
    let resolved = harness.get::<Unregistered>().expect("absence is not an error");
    assert!(resolved.is_none());
}

#[test]
fn given_unresolvable_parameter_when_getting_then_missing_service_error() {
    let harness = TestHarness::<dyn Service>::builder(registry(), "app::reports")
        .supply_config(|| Some(Settings::default()))
        .configure_services(|services, _| {
            // Clock only: the archiver's Store parameter stays unmet.
            services.register_instance(Clock { now: 0 });
        })
        .build();

    let err = harness
        .get::<ReportArchiver>()
        .expect_err("second parameter has no registration");
    match err {
        HarnessError::Domain(DomainError::MissingService(key)) => {
            assert_eq!(key.name, std::any::type_name::<Store>());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_override_when_getting_then_it_beats_the_container() {
    let harness = harness();

    // The constructed instance must see the override's value, not the
    // container registration's.
    let overrides = Overrides::new().with(Clock { now: 42 });
    let report = harness
        .get_with::<Report>(&overrides)
        .expect("resolvable")
        .expect("match");
    assert_eq!(report.seen_at, 42);

    // An override-free call falls back to the container registration.
    let plain = harness.get::<Report>().expect("resolvable").expect("match");
    assert_eq!(plain.seen_at, 1_700_000_000);
}

#[test]
fn given_override_for_missing_dependency_when_getting_then_it_fills_the_gap() {
    let harness = TestHarness::<dyn Service>::builder(registry(), "app::reports")
        .supply_config(|| Some(Settings::default()))
        .configure_services(|services, _| {
            services.register_instance(Clock { now: 0 });
        })
        .build();

    let overrides = Overrides::new().with(Store);
    let archiver = harness
        .get_with::<ReportArchiver>(&overrides)
        .expect("override supplies the missing Store");
    assert!(archiver.is_some());
}

#[test]
fn given_each_get_call_then_a_fresh_instance_is_constructed() {
    let harness = harness();

    let first = harness.get::<Report>().unwrap().unwrap();
    let second = harness.get::<Report>().unwrap().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}
