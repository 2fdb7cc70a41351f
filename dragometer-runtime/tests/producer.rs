use connection::ConnectionConfig;
use dragometer_core::{dashboard_channel, PlotRegistry};
use dragometer_plugin::ffi::{ApiStatus, RemoteDashboard};
use dragometer_plugin::{Dashboard, ProducerResult};
use dragometer_runtime::{
    builtin_producer_names, library_candidates, resolve_producer, spawn_producer, DynamicProducer,
    HostApi, Producer, ProducerError,
};
use std::env::consts::{DLL_EXTENSION, DLL_PREFIX};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn platoon_is_built_in() {
    assert!(builtin_producer_names().any(|name| name == "platoon"));
    let producer = resolve_producer("platoon").unwrap();
    assert!(matches!(producer, Producer::BuiltIn { ref name, .. } if name == "platoon"));
}

#[test]
fn malformed_identifiers_are_rejected() {
    for identifier in ["", "   ", ".", "bad\0name"] {
        assert!(
            matches!(
                resolve_producer(identifier),
                Err(ProducerError::InvalidIdentifier(_))
            ),
            "{identifier:?} should be rejected"
        );
    }
}

#[test]
fn candidates_strip_the_extension() {
    let candidates = library_candidates("plugins/producer.py").unwrap();
    assert_eq!(
        candidates[0],
        PathBuf::from(format!("plugins/producer.{DLL_EXTENSION}"))
    );
    assert_eq!(
        candidates.last().unwrap(),
        &PathBuf::from(format!("plugins/{DLL_PREFIX}producer.{DLL_EXTENSION}"))
    );
}

#[test]
fn candidates_keep_inner_dots() {
    let candidates = library_candidates("my.producer.so").unwrap();
    assert_eq!(
        candidates[0],
        PathBuf::from(format!("my.producer.{DLL_EXTENSION}"))
    );
}

#[test]
fn missing_library_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let identifier = dir.path().join("absent");
    let err = resolve_producer(identifier.to_str().unwrap()).unwrap_err();
    match err {
        ProducerError::NotFound { tried, .. } => assert!(tried.contains("absent")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn garbage_library_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("broken.{DLL_EXTENSION}"));
    std::fs::write(&path, b"not a shared object").unwrap();
    let err = resolve_producer(dir.path().join("broken").to_str().unwrap()).unwrap_err();
    assert!(matches!(err, ProducerError::Load { .. }), "{err}");
}

/// A shared library present on common systems that exports no producer symbols.
fn system_library() -> Option<&'static Path> {
    [
        "/lib/x86_64-linux-gnu/libm.so.6",
        "/usr/lib/x86_64-linux-gnu/libm.so.6",
        "/lib/aarch64-linux-gnu/libm.so.6",
        "/usr/lib/aarch64-linux-gnu/libm.so.6",
        "/lib64/libm.so.6",
        "/usr/lib64/libm.so.6",
        "/usr/lib/libm.so.6",
        "C:\\Windows\\System32\\kernel32.dll",
    ]
    .into_iter()
    .map(Path::new)
    .find(|path| path.is_file())
}

#[test]
fn library_without_entry_point_is_rejected() {
    let Some(path) = system_library() else {
        eprintln!("no system library found, skipping");
        return;
    };
    let err = unsafe { DynamicProducer::load(path) }.unwrap_err();
    match err {
        ProducerError::MissingEntryPoint(missing) => assert_eq!(missing, path),
        other => panic!("unexpected error: {other}"),
    }
    let message = ProducerError::MissingEntryPoint(path.to_path_buf()).to_string();
    assert!(message.contains("dragometer_main"), "{message}");
}

#[test]
fn host_table_forwards_to_the_controller() {
    let (controller, mut pump) = dashboard_channel(&ConnectionConfig::default());
    let host = HostApi::new(&controller);
    let remote = RemoteDashboard::new(host.table());

    remote.add_plot("1").unwrap();
    remote.set_subplots("1", 2).unwrap();
    remote.set_title("1", "Vehicle 1").unwrap();
    remote.set_y_axis_title("1", "Drag coefficient").unwrap();
    remote.set_x_max("1", 10.0).unwrap();
    remote.plot_on("1", 1.0, 0.24, 1).unwrap();
    remote.plot("1", 2.0, 0.2).unwrap();

    let mut registry = PlotRegistry::new();
    let report = pump.drain(&mut registry, usize::MAX);
    assert_eq!(report.applied, 7);
    assert_eq!(report.failed, 0);

    let plot = registry.get("1").unwrap();
    assert_eq!(plot.title(), "Vehicle 1");
    assert_eq!(plot.y_axis_title(), "Drag coefficient");
    assert_eq!(plot.series()[0].points(), &[(2.0, 0.2)]);
    assert_eq!(plot.series()[1].points(), &[(1.0, 0.24)]);
    assert_eq!(plot.bounds().x_max, Some(10.0));
}

#[test]
fn host_table_rejects_bad_raw_arguments() {
    let (controller, _pump) = dashboard_channel(&ConnectionConfig::default());
    let host = HostApi::new(&controller);
    let table = host.table();
    let id = "1";

    let code = unsafe { (table.plot)(table.ctx, id.as_ptr(), id.len(), 1.0, 2.0, -1) };
    assert_eq!(code, ApiStatus::InvalidArgument as i32);

    let bad = [0xffu8, 0xfe];
    let code = unsafe { (table.add_plot)(table.ctx, bad.as_ptr(), bad.len()) };
    assert_eq!(code, ApiStatus::InvalidArgument as i32);

    let code = unsafe { (table.set_bound)(table.ctx, id.as_ptr(), id.len(), 7, 1.0) };
    assert_eq!(code, ApiStatus::InvalidArgument as i32);

    let code = unsafe { (table.add_plot)(table.ctx, std::ptr::null(), 0) };
    assert_eq!(code, ApiStatus::InvalidArgument as i32);
}

#[test]
fn host_table_reports_a_closed_dashboard() {
    let (controller, pump) = dashboard_channel(&ConnectionConfig::default());
    drop(pump);
    let host = HostApi::new(&controller);
    let remote = RemoteDashboard::new(host.table());
    assert_eq!(
        remote.add_plot("1"),
        Err(dragometer_plugin::DashboardError::Disconnected)
    );
}

fn failing(_dashboard: &dyn Dashboard) -> ProducerResult {
    Err("sensor offline".into())
}

fn panicking(_dashboard: &dyn Dashboard) -> ProducerResult {
    panic!("lost track of vehicle");
}

fn one_point(dashboard: &dyn Dashboard) -> ProducerResult {
    dashboard.add_plot("p")?;
    dashboard.plot("p", 0.0, 1.0)?;
    Ok(())
}

#[test]
fn producer_errors_and_panics_become_failures() {
    let (controller, _pump) = dashboard_channel(&ConnectionConfig::default());
    let producer = Producer::BuiltIn {
        name: "failing".to_string(),
        entry: failing,
    };
    match producer.run(&controller) {
        Err(ProducerError::Failed(message)) => assert_eq!(message, "sensor offline"),
        other => panic!("unexpected result: {other:?}"),
    }

    let producer = Producer::BuiltIn {
        name: "panicking".to_string(),
        entry: panicking,
    };
    match producer.run(&controller) {
        Err(ProducerError::Failed(message)) => {
            assert!(message.contains("lost track of vehicle"), "{message}")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn spawned_producer_reports_its_outcome() {
    let (controller, mut pump) = dashboard_channel(&ConnectionConfig::default());
    let producer = Producer::BuiltIn {
        name: "one_point".to_string(),
        entry: one_point,
    };
    let (done_tx, done_rx) = mpsc::channel();
    spawn_producer(producer, controller, move |result| {
        let _ = done_tx.send(result.is_ok());
    })
    .unwrap();

    assert!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap());
    let mut registry = PlotRegistry::new();
    let report = pump.drain(&mut registry, usize::MAX);
    assert_eq!(report.applied, 2);
    assert!(report.producer_gone);
    assert_eq!(registry.get("p").unwrap().series()[0].len(), 1);
}
