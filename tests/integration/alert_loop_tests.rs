//! Integration tests for the RangeSensor → AlertLoop → outputs pipeline.

use std::time::{Duration, Instant};

use intruder_alert::adapters::hardware::AlarmHandle;
use intruder_alert::adapters::signal::handle_shutdown_signal;
use intruder_alert::app::alarm::AlarmState;
use intruder_alert::app::ports::AlarmPort;
use intruder_alert::app::service::AlertLoop;
use intruder_alert::app::shutdown::ShutdownToken;
use intruder_alert::config::AlertConfig;
use intruder_alert::sensors::RangeSensor;

use super::mock_hw::{
    AlarmCall, Echo, MemorySink, RecordingAlarm, SimBus, SimClock, SimEcho, SimTrigger,
};

type SimLoop<A> = AlertLoop<SimTrigger, SimEcho, SimClock, A, MemorySink>;

fn config(threshold_cm: f32, poll_interval_ms: u32) -> AlertConfig {
    AlertConfig {
        threshold_cm,
        poll_interval_ms,
        ..AlertConfig::default()
    }
}

fn make_loop(
    script: impl IntoIterator<Item = Echo>,
    cfg: AlertConfig,
) -> (SimLoop<RecordingAlarm>, SimBus, RecordingAlarm, MemorySink) {
    let bus = SimBus::new(script);
    let (trigger, echo, clock) = bus.pins();
    let alarm = RecordingAlarm::new();
    let sink = MemorySink::new();
    let alert = AlertLoop::new(
        cfg,
        RangeSensor::new(trigger, echo),
        clock,
        alarm.clone(),
        sink.clone(),
        ShutdownToken::new(),
    );
    (alert, bus, alarm, sink)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.05
}

// ── Threshold scenario: 40, 25, 25, 45 at 30 cm ─────────────

#[test]
fn scenario_crossing_and_clearing() {
    let distances = [40.0, 25.0, 25.0, 45.0];
    let (mut alert, _bus, alarm, sink) =
        make_loop(distances.map(Echo::at_cm), config(30.0, 500));

    let reports: Vec<_> = (0..4).map(|_| alert.cycle()).collect();

    let states: Vec<_> = reports.iter().map(|r| r.state).collect();
    assert_eq!(
        states,
        [
            AlarmState::Idle,
            AlarmState::Alarmed,
            AlarmState::Alarmed,
            AlarmState::Idle
        ]
    );

    let fired: Vec<bool> = reports.iter().map(|r| r.detection.is_some()).collect();
    assert_eq!(fired, [false, true, true, false]);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| approx(e.distance_cm, 25.0)));

    assert_eq!(
        alarm.calls(),
        [
            AlarmCall::Set(false),
            AlarmCall::Set(true),
            AlarmCall::Set(true),
            AlarmCall::Set(false)
        ]
    );
}

#[test]
fn detection_logged_every_cycle_below_threshold() {
    let (mut alert, _bus, alarm, sink) = make_loop([Echo::at_cm(10.0); 5], config(30.0, 500));

    for _ in 0..5 {
        alert.cycle();
    }

    assert_eq!(alert.state(), AlarmState::Alarmed);
    assert_eq!(sink.events().len(), 5, "one event per cycle, not only on entry");
    assert!(alarm.level());
    assert_eq!(alert.stats().detections, 5);
}

#[test]
fn log_lines_use_wall_clock_and_two_decimals() {
    let (mut alert, _bus, _alarm, sink) = make_loop([Echo::at_cm(20.0)], config(30.0, 500));
    alert.cycle();

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].starts_with("Intruder detected at 2024-05-01 12:00:00 - Distance: "),
        "{}",
        lines[0]
    );
    assert!(lines[0].ends_with(" cm"));
    let value = lines[0]
        .trim_end_matches(" cm")
        .rsplit(' ')
        .next()
        .unwrap();
    assert_eq!(value.split('.').nth(1).map(str::len), Some(2));
}

// ── Invalid readings ─────────────────────────────────────────

#[test]
fn invalid_readings_leave_state_and_outputs_alone() {
    let script = [
        Echo::at_cm(12.0),
        Echo::Silent,
        Echo::StuckHigh,
        Echo::Pulse(40_000), // ≈ 686 cm
    ];
    let (mut alert, _bus, alarm, sink) = make_loop(script, config(30.0, 500));

    alert.cycle();
    assert_eq!(alert.state(), AlarmState::Alarmed);
    let calls_before = alarm.calls();

    for _ in 0..3 {
        let report = alert.cycle();
        assert!(!report.reading.valid);
        assert_eq!(report.state, AlarmState::Alarmed);
        assert!(report.detection.is_none());
    }

    assert_eq!(alarm.calls(), calls_before, "no output writes on invalid readings");
    assert_eq!(sink.events().len(), 1);
    assert_eq!(alert.stats().invalid_readings, 3);
}

#[test]
fn invalid_reading_from_idle_writes_nothing() {
    let (mut alert, _bus, alarm, _sink) = make_loop([Echo::Silent], config(30.0, 500));
    let report = alert.cycle();
    assert_eq!(report.state, AlarmState::Idle);
    assert!(alarm.calls().is_empty());
}

#[test]
fn timeout_is_bounded() {
    let (mut alert, bus, _alarm, _sink) =
        make_loop([Echo::Silent, Echo::StuckHigh], config(30.0, 500));

    let t0 = bus.now_us();
    alert.cycle();
    let silent = bus.now_us() - t0;
    assert!(silent < 50_000 + 200, "silent echo took {silent} µs");

    let t1 = bus.now_us();
    alert.cycle();
    let stuck = bus.now_us() - t1;
    assert!(stuck < 50_000 + 200, "stuck echo took {stuck} µs");
}

#[test]
fn reading_above_threshold_clears_alarm() {
    let (mut alert, _bus, alarm, _sink) =
        make_loop([Echo::at_cm(5.0), Echo::at_cm(100.0)], config(30.0, 500));
    alert.cycle();
    assert!(alarm.level());
    alert.cycle();
    assert_eq!(alert.state(), AlarmState::Idle);
    assert!(!alarm.level());
}

#[test]
fn sink_failure_does_not_stop_alarm() {
    let bus = SimBus::new([Echo::at_cm(10.0), Echo::at_cm(10.0)]);
    let (trigger, echo, clock) = bus.pins();
    let alarm = RecordingAlarm::new();
    let mut alert = AlertLoop::new(
        config(30.0, 500),
        RangeSensor::new(trigger, echo),
        clock,
        alarm.clone(),
        MemorySink::failing(),
        ShutdownToken::new(),
    );

    for _ in 0..2 {
        let report = alert.cycle();
        assert_eq!(report.state, AlarmState::Alarmed);
        assert!(report.detection.is_some());
    }
    assert!(alarm.level());
    assert_eq!(alert.stats().detections, 0, "nothing reached the log");
    assert_eq!(alert.stats().log_failures, 2);
}

// ── run() and shutdown ───────────────────────────────────────

#[test]
fn cancellation_mid_cycle_while_alarmed() {
    let bus = SimBus::new([Echo::at_cm(10.0); 10]);
    let (trigger, echo, clock) = bus.pins();
    let recorder = RecordingAlarm::new();
    let alarm = AlarmHandle::new(recorder.clone());
    let sink = MemorySink::new();
    let token = ShutdownToken::new();

    // The third trigger pulse plays the part of Ctrl+C arriving mid-measurement.
    let (hook_token, hook_alarm) = (token.clone(), alarm.clone());
    bus.on_trigger(move |n| {
        if n == 3 {
            assert!(handle_shutdown_signal(&hook_token, &hook_alarm));
            assert!(!handle_shutdown_signal(&hook_token, &hook_alarm));
        }
    });

    let alert = AlertLoop::new(
        config(30.0, 1),
        RangeSensor::new(trigger, echo),
        clock,
        alarm,
        sink.clone(),
        token.clone(),
    );
    let summary = alert.run();

    assert!(token.is_cancelled());
    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.detections, 2);
    assert_eq!(sink.events().len(), 2);
    assert_eq!(sink.closes(), 1, "log closed exactly once");
    assert_eq!(
        recorder.calls(),
        [
            AlarmCall::Set(true),
            AlarmCall::Set(true),
            AlarmCall::AllOff, // signal path, immediate
            AlarmCall::AllOff, // shutdown sequence
        ]
    );
    assert!(!recorder.level());
}

/// Delivers the shutdown signal right before forwarding an assert, i.e.
/// after the loop's cancellation check but before the pins move.
struct SignalOnAssert {
    inner: AlarmHandle<RecordingAlarm>,
    token: ShutdownToken,
}

impl AlarmPort for SignalOnAssert {
    fn set_alarm(&mut self, on: bool) {
        if on {
            handle_shutdown_signal(&self.token, &self.inner);
        }
        self.inner.set_alarm(on);
    }

    fn all_off(&mut self) {
        self.inner.all_off();
    }

    fn is_alarm_on(&self) -> bool {
        self.inner.is_alarm_on()
    }
}

#[test]
fn signal_during_alarm_write_keeps_outputs_off() {
    let bus = SimBus::new([Echo::at_cm(10.0)]);
    let (trigger, echo, clock) = bus.pins();
    let recorder = RecordingAlarm::new();
    let sink = MemorySink::new();
    let token = ShutdownToken::new();
    let alarm = SignalOnAssert {
        inner: AlarmHandle::new(recorder.clone()),
        token: token.clone(),
    };

    let mut alert = AlertLoop::new(
        config(30.0, 500),
        RangeSensor::new(trigger, echo),
        clock,
        alarm,
        sink.clone(),
        token.clone(),
    );
    let report = alert.cycle();

    assert!(token.is_cancelled());
    assert_eq!(recorder.calls(), [AlarmCall::AllOff], "assert after silencing dropped");
    assert!(!recorder.level());
    assert!(alert.alarm().inner.is_silenced());
    assert!(report.detection.is_none());
    assert!(sink.events().is_empty());
    assert_eq!(alert.stats().detections, 0);
}

#[test]
fn run_stops_before_first_cycle_if_already_cancelled() {
    let bus = SimBus::new([Echo::at_cm(10.0)]);
    let (trigger, echo, clock) = bus.pins();
    let alarm = RecordingAlarm::new();
    let sink = MemorySink::new();
    let token = ShutdownToken::new();
    token.cancel();

    let alert = AlertLoop::new(
        config(30.0, 1),
        RangeSensor::new(trigger, echo),
        clock,
        alarm.clone(),
        sink.clone(),
        token,
    );

    let summary = alert.run();
    assert_eq!(summary.cycles, 0);
    assert_eq!(bus.triggers(), 0);
    assert_eq!(alarm.calls(), [AlarmCall::AllOff]);
    assert_eq!(sink.closes(), 1);
}

#[test]
fn invalid_readings_still_wait_poll_interval() {
    let bus = SimBus::new([Echo::Silent, Echo::Silent, Echo::Silent]);
    let (trigger, echo, clock) = bus.pins();
    let token = ShutdownToken::new();
    let hook_token = token.clone();
    bus.on_trigger(move |n| {
        if n == 3 {
            hook_token.cancel();
        }
    });

    let alert = AlertLoop::new(
        config(30.0, 25),
        RangeSensor::new(trigger, echo),
        clock,
        RecordingAlarm::new(),
        MemorySink::new(),
        token,
    );

    let started = Instant::now();
    let summary = alert.run();
    assert_eq!(summary.invalid_readings, 2);
    assert!(
        started.elapsed() >= Duration::from_millis(50),
        "two full poll intervals expected, got {:?}",
        started.elapsed()
    );
}
