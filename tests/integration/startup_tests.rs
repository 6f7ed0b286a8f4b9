//! Integration tests for the fallible bootstrap path.

use std::cell::Cell;
use std::fs;
use std::io;
use std::rc::Rc;

use intruder_alert::Error;
use intruder_alert::adapters::log_sink::FileDetectionLog;
use intruder_alert::app::alarm::AlarmState;
use intruder_alert::app::shutdown::ShutdownToken;
use intruder_alert::app::startup::{self, Hardware};
use intruder_alert::config::AlertConfig;

use super::mock_hw::{Echo, MemorySink, RecordingAlarm, SimBus, SimEcho, SimTrigger};

fn sim_hardware(
    bus: &SimBus,
    alarm: &RecordingAlarm,
) -> Hardware<SimTrigger, SimEcho, RecordingAlarm> {
    let (trigger, echo, _) = bus.pins();
    Hardware {
        trigger,
        echo,
        alarm: alarm.clone(),
    }
}

#[test]
fn unopenable_log_aborts_before_any_output() {
    let bus = SimBus::new([Echo::at_cm(10.0)]);
    let (_, _, clock) = bus.pins();
    let alarm = RecordingAlarm::new();

    let result = startup::start(
        AlertConfig::default(),
        clock,
        ShutdownToken::new(),
        || Ok(sim_hardware(&bus, &alarm)),
        |_path| -> io::Result<MemorySink> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only fs"))
        },
    );

    assert!(matches!(result, Err(Error::Sink(_))));
    assert!(alarm.calls().is_empty(), "alarm must not be touched");
    assert_eq!(bus.trigger_writes(), 0, "trigger must not be touched");
}

#[test]
fn hardware_failure_skips_log_open() {
    let bus = SimBus::default();
    let (_, _, clock) = bus.pins();
    let opened = Rc::new(Cell::new(false));
    let opened_flag = Rc::clone(&opened);

    let result = startup::start(
        AlertConfig::default(),
        clock,
        ShutdownToken::new(),
        || -> intruder_alert::Result<Hardware<SimTrigger, SimEcho, RecordingAlarm>> {
            Err(Error::Init("no /dev/gpiomem".into()))
        },
        move |_path| {
            opened_flag.set(true);
            Ok(MemorySink::new())
        },
    );

    assert!(matches!(result, Err(Error::Init(_))));
    assert!(!opened.get());
}

#[test]
fn invalid_config_rejected_up_front() {
    let bus = SimBus::default();
    let (_, _, clock) = bus.pins();
    let alarm = RecordingAlarm::new();
    let cfg = AlertConfig {
        threshold_cm: 0.0,
        ..AlertConfig::default()
    };

    let result = startup::start(
        cfg,
        clock,
        ShutdownToken::new(),
        || Ok(sim_hardware(&bus, &alarm)),
        |_path| Ok(MemorySink::new()),
    );

    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(bus.trigger_writes(), 0);
}

#[test]
fn successful_start_primes_trigger() {
    let bus = SimBus::new([Echo::at_cm(50.0)]);
    let (_, _, clock) = bus.pins();
    let alarm = RecordingAlarm::new();

    let mut alert = startup::start(
        AlertConfig::default(),
        clock,
        ShutdownToken::new(),
        || Ok(sim_hardware(&bus, &alarm)),
        |_path| Ok(MemorySink::new()),
    )
    .unwrap();

    assert_eq!(bus.trigger_writes(), 1, "trigger driven low once");
    assert_eq!(bus.now_us(), 2_000, "2 ms settle");
    assert_eq!(alert.state(), AlarmState::Idle);
    assert!(alarm.calls().is_empty());

    let report = alert.cycle();
    assert!(report.reading.valid);
    assert_eq!(report.state, AlarmState::Idle);
}

#[test]
fn file_log_end_to_end() {
    let path = std::env::temp_dir().join(format!("ia-e2e-{}.txt", std::process::id()));
    let _ = fs::remove_file(&path);

    let bus = SimBus::new([40.0, 25.0, 25.0, 45.0].map(Echo::at_cm));
    let (_, _, clock) = bus.pins();
    let alarm = RecordingAlarm::new();
    let token = ShutdownToken::new();
    let hook_token = token.clone();
    bus.on_trigger(move |n| {
        if n == 5 {
            hook_token.cancel();
        }
    });

    let cfg = AlertConfig {
        poll_interval_ms: 1,
        log_path: path.clone(),
        ..AlertConfig::default()
    };
    let alert = startup::start(
        cfg,
        clock,
        token,
        || Ok(sim_hardware(&bus, &alarm)),
        FileDetectionLog::open,
    )
    .unwrap();

    let summary = alert.run();
    assert_eq!(summary.detections, 2);
    assert_eq!(summary.log_failures, 0);

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!(
            line.starts_with("Intruder detected at 2024-05-01 12:00:00 - Distance: 25.0"),
            "{line}"
        );
        assert!(line.ends_with(" cm"));
    }
    fs::remove_file(&path).unwrap();
}
