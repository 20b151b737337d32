//! Many writers and readers on one engine.

use std::sync::atomic::{AtomicBool, Ordering};

use starmap_integration_tests::{assert_links_consistent, engine_shape, sol_bodies, SOL};
use starmap_tree::{
    BarycentreObservation, BodyHint, BodyId, BodyRecord, Engine, SurfaceFeature, SystemAddress,
};

fn system_bodies(address: SystemAddress, name: &str) -> Vec<BodyRecord> {
    let mut records = vec![BodyRecord::new(address, name, name, BodyHint::Star).with_body_id(0)];
    for planet in 1..=6u32 {
        records.push(
            BodyRecord::new(address, name, format!("{name} {planet}"), BodyHint::Planet)
                .with_body_id(planet * 10),
        );
        for moon in ['a', 'b'] {
            records.push(
                BodyRecord::new(address, name, format!("{name} {planet} {moon}"), BodyHint::Planet)
                    .with_body_id(planet * 10 + if moon == 'a' { 1 } else { 2 }),
            );
        }
    }
    records
}

#[test]
fn test_parallel_systems_do_not_interfere() {
    starmap_logging::init_for_tests();
    let engine = Engine::default();
    let systems: Vec<_> = (0..8u64)
        .map(|i| (SystemAddress(5_000 + i), format!("Test Sector AB-C d{i}")))
        .collect();

    std::thread::scope(|scope| {
        for (address, name) in &systems {
            let engine = &engine;
            scope.spawn(move || {
                for record in system_bodies(*address, name) {
                    engine.ingest_body(&record).unwrap();
                }
            });
        }
    });

    assert_eq!(engine.systems().len(), systems.len());
    for (address, _) in &systems {
        let handle = engine.snapshot(*address).unwrap();
        let registry = handle.lock();
        // star, six planets, twelve moons
        assert_eq!(registry.len(), 19);
        assert_links_consistent(&registry);
    }
}

#[test]
fn test_racing_writers_on_one_system_agree_with_serial() {
    let serial = Engine::default();
    for record in sol_bodies() {
        serial.ingest_body(&record).unwrap();
    }

    let parallel = Engine::default();
    std::thread::scope(|scope| {
        for offset in 0..4 {
            let engine = &parallel;
            scope.spawn(move || {
                let mut records = sol_bodies();
                records.rotate_left(offset * 2);
                for record in &records {
                    engine.ingest_body(record).unwrap();
                }
            });
        }
    });

    assert_eq!(engine_shape(&parallel, SOL), engine_shape(&serial, SOL));
}

#[test]
fn test_readers_see_consistent_trees_during_writes() {
    let engine = Engine::default();
    let done = AtomicBool::new(false);
    let address = SystemAddress(42_000);

    std::thread::scope(|scope| {
        let writer_engine = &engine;
        let done_flag = &done;
        scope.spawn(move || {
            for record in system_bodies(address, "Reader Test") {
                writer_engine.ingest_body(&record).unwrap();
            }
            done_flag.store(true, Ordering::Release);
        });

        for _ in 0..3 {
            let engine = &engine;
            let done = &done;
            scope.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    if let Some(handle) = engine.snapshot(address) {
                        assert_links_consistent(&handle.lock());
                    }
                    std::thread::yield_now();
                }
            });
        }
    });

    assert_eq!(engine.snapshot(address).unwrap().lock().len(), 19);
}

#[test]
fn test_deferrals_racing_first_body_are_never_lost() {
    // Non-body records race the first body of their system. Each must end up
    // either applied directly or replayed from the queue.
    for round in 0..20u64 {
        let engine = Engine::default();
        let address = SystemAddress(90_000 + round);
        let detail = starmap_tree::ScanDetail {
            parents: (0..8)
                .map(|i| starmap_tree::ParentLink::new(starmap_tree::ParentKind::Null, 100 + i))
                .collect(),
            ..Default::default()
        };

        std::thread::scope(|scope| {
            let engine_ref = &engine;
            scope.spawn(move || {
                for i in 0..8u32 {
                    engine_ref.ingest_barycentre(address, BodyId(100 + i), BarycentreObservation::default());
                }
            });
            let engine_ref = &engine;
            let detail = detail.clone();
            scope.spawn(move || {
                let record = BodyRecord::new(address, "Race", "Race 1", BodyHint::Planet)
                    .with_body_id(1)
                    .with_detail(detail);
                engine_ref.ingest_body(&record).unwrap();
            });
        });

        assert_eq!(engine.deferred_len(address), 0);
        let handle = engine.snapshot(address).unwrap();
        let registry = handle.lock();
        assert_eq!(registry.barycentres().count(), 8);
        let planet = registry.node_by_body_id(BodyId(1)).unwrap();
        assert!(planet.ancestry().iter().all(|link| link.barycentre.is_some()));
    }
}

#[test]
fn test_surface_features_from_many_threads() {
    let engine = Engine::default();
    engine
        .ingest_body(&BodyRecord::new(SOL, "Sol", "Sol 3", BodyHint::Planet).with_body_id(3))
        .unwrap();

    std::thread::scope(|scope| {
        for t in 0..4u64 {
            let engine = &engine;
            scope.spawn(move || {
                for i in 0..10u64 {
                    let lat = (t * 10 + i) as f64;
                    let feature = SurfaceFeature::touchdown(lat, 0.0, t * 100 + i).on_body(3);
                    engine.ingest_surface_feature(SOL, feature, None).unwrap();
                }
            });
        }
    });

    let handle = engine.snapshot(SOL).unwrap();
    let registry = handle.lock();
    assert_eq!(registry.node_by_body_id(BodyId(3)).unwrap().surface_features().len(), 40);
}
