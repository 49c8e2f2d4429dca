use std::io::Cursor;

use countup::config::{GameConfig, Variant};
use countup::headless::{forward_commands, parse_line, pump_lines, Command, TapGate};
use countup::kernel::event::InputEvent;
use countup::kernel::phase::Phase;
use countup::kernel::telemetry::event::TelemetryEvent;
use countup::kernel::time::ticks_for;
use countup::outputs::Capabilities;
use countup::Driver;
use tokio::sync::mpsc;
use uuid::Uuid;

fn driver(variant: Variant) -> Driver {
    let config = GameConfig {
        variant,
        ..GameConfig::default()
    };
    let mut driver = Driver::new(&config, Capabilities::none());
    driver.step();
    driver
}

fn send_lines(driver: &mut Driver, lines: &[&str]) -> bool {
    let (tx, mut rx) = mpsc::channel(16);
    for line in lines {
        let command = parse_line(line).expect("known command");
        tx.try_send(command).expect("queue command");
    }
    let running = forward_commands(driver, &mut rx);
    driver.step();
    running
}

fn clear_level(driver: &mut Driver) {
    let taps: Vec<String> = (0..driver.view().level).map(|i| format!("tap {i}")).collect();
    let taps: Vec<&str> = taps.iter().map(String::as_str).collect();
    send_lines(driver, &taps);
    for _ in 0..ticks_for(GameConfig::default().timings.celebration_ms) {
        driver.step();
    }
}

#[test]
fn test_parse_commands() {
    assert_eq!(parse_line("tap 3"), Some(Command::Input(InputEvent::tap("stdin", 3))));
    assert_eq!(parse_line("  TAP   0 "), Some(Command::Input(InputEvent::tap("stdin", 0))));
    assert_eq!(parse_line("reset"), Some(Command::Input(InputEvent::reset("stdin"))));
    assert_eq!(parse_line("quit"), Some(Command::Quit));
    assert_eq!(parse_line("exit"), Some(Command::Quit));
}

#[test]
fn test_rejects_garbage() {
    assert_eq!(parse_line(""), None);
    assert_eq!(parse_line("tap"), None);
    assert_eq!(parse_line("tap -1"), None);
    assert_eq!(parse_line("tap two"), None);
    assert_eq!(parse_line("jump"), None);
}

#[test]
fn test_out_of_range_tap_leaves_state_unchanged() {
    let mut driver = driver(Variant::Full);
    let before = driver.view();
    assert_eq!(before.level, 1);

    assert!(send_lines(&mut driver, &["tap 7"]));

    let after = driver.view();
    assert_eq!(after.level, 1);
    assert!(after.tapped.is_empty(), "No target was counted");
    assert_eq!(after.phase, Phase::AwaitingTaps);
    let stats = driver.reactor.telemetry().snapshot().tap_stats;
    assert_eq!(stats.out_of_range, 0, "The tap never reached the kernel");
    assert_eq!(stats.accepted, 0);

    assert!(send_lines(&mut driver, &["tap 0"]));
    assert_eq!(driver.view().phase, Phase::Celebrating, "Valid taps still go through");
    println!("Headless Out Of Range Passed");
}

#[test]
fn test_tap_after_reset_checked_against_first_level() {
    let mut driver = driver(Variant::Full);
    clear_level(&mut driver);
    clear_level(&mut driver);
    assert_eq!(driver.view().level, 3);

    // Index 2 is on screen before the reset but not after it.
    assert!(send_lines(&mut driver, &["reset", "tap 2"]));
    let view = driver.view();
    assert_eq!(view.level, 1);
    assert!(view.tapped.is_empty());
    assert_eq!(view.phase, Phase::AwaitingTaps);
}

#[test]
fn test_gate_drops_taps_while_locked() {
    let mut driver = driver(Variant::Basic);
    send_lines(&mut driver, &["tap 0"]);
    assert_eq!(driver.view().phase, Phase::Celebrating);

    let mut gate = TapGate::new(&driver.view());
    assert_eq!(gate.admit(InputEvent::tap("stdin", 0)), None);
    assert_eq!(
        gate.admit(InputEvent::reset("stdin")),
        Some(InputEvent::reset("stdin")),
        "Reset is always allowed"
    );
    assert_eq!(
        gate.admit(InputEvent::tap("stdin", 0)),
        Some(InputEvent::tap("stdin", 0)),
        "Reset reopens input on level 1"
    );
    assert_eq!(gate.admit(InputEvent::tap("stdin", 1)), None);
}

#[test]
fn test_quit_stops_forwarding() {
    let mut driver = driver(Variant::Basic);
    assert!(!send_lines(&mut driver, &["tap 0", "quit"]));
    assert_eq!(
        driver.view().phase,
        Phase::Celebrating,
        "Inputs before quit are still applied"
    );
}

#[test]
fn test_reader_forwards_until_quit() {
    let input = Cursor::new("tap 0\n\nbogus\nreset\nquit\ntap 1\n");
    let (tx, mut rx) = mpsc::channel(16);
    pump_lines(input, tx);

    let mut received = Vec::new();
    while let Ok(command) = rx.try_recv() {
        received.push(command);
    }
    assert_eq!(
        received,
        vec![
            Command::Input(InputEvent::tap("stdin", 0)),
            Command::Input(InputEvent::reset("stdin")),
            Command::Quit,
        ],
        "Blank and unknown lines are skipped, nothing after quit is read"
    );
    assert!(rx.try_recv().is_err(), "Sender dropped when the reader returns");
}

#[test]
fn test_reader_stops_at_eof_and_hangs_up() {
    let (tx, mut rx) = mpsc::channel(16);
    pump_lines(Cursor::new("tap 0"), tx);
    assert_eq!(rx.try_recv().ok(), Some(Command::Input(InputEvent::tap("stdin", 0))));

    let driver = driver(Variant::Basic);
    assert!(!forward_commands(&driver, &mut rx), "EOF ends the session");
}

#[test]
fn test_reader_stops_when_receiver_gone() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    pump_lines(Cursor::new("tap 0\ntap 1\n"), tx);
}

#[test]
fn test_one_session_id_per_run() {
    let id = Uuid::new_v4();
    let mut driver = Driver::with_session(&GameConfig::default(), Capabilities::none(), id);
    assert_eq!(driver.session_id(), id);
    assert_eq!(driver.reactor.telemetry().session_id(), id);

    driver.step();
    match driver.shutdown() {
        TelemetryEvent::SessionSummary { session_id, .. } => {
            assert_eq!(session_id, id, "Summary carries the id given to the driver")
        }
        other => panic!("Expected a session summary, got {other:?}"),
    }
    println!("Session Id Passed");
}
