use countup::config::{GameConfig, Variant};
use countup::kernel::event::InputEvent;
use countup::kernel::scheduler::{BurstSpec, SideEffect};
use countup::kernel::telemetry::event::TelemetryEvent;
use countup::kernel::time::ticks_for;
use countup::outputs::mock_audio::{RecordingParticles, RecordingSpeech, RecordingTones};
use countup::outputs::Capabilities;
use countup::Driver;

struct Fakes {
    tones: RecordingTones,
    particles: RecordingParticles,
    speech: RecordingSpeech,
}

fn driver_with_fakes(variant: Variant) -> (Driver, Fakes) {
    let fakes = Fakes {
        tones: RecordingTones::new(),
        particles: RecordingParticles::new(),
        speech: RecordingSpeech::new(),
    };
    let caps = Capabilities::none()
        .with_tones(fakes.tones.clone())
        .with_particles(fakes.particles.clone())
        .with_speech(fakes.speech.clone());
    let config = GameConfig {
        variant,
        ..GameConfig::default()
    };
    (Driver::new(&config, caps), fakes)
}

fn run(driver: &mut Driver, ticks: u64) {
    for _ in 0..ticks {
        driver.step();
    }
}

#[tokio::test]
async fn test_tones_dropped_before_first_gesture() {
    let tones = RecordingTones::new();
    let mut caps = Capabilities::none().with_tones(tones.clone());

    caps.dispatch(&SideEffect::PlayTone {
        frequency_hz: 440.0,
        duration_ms: 100,
    });
    assert_eq!(tones.dropped(), 1, "Tone before unlock is dropped");
    assert!(tones.played().is_empty());

    caps.unlock();
    caps.dispatch(&SideEffect::PlayTone {
        frequency_hz: 440.0,
        duration_ms: 100,
    });
    assert_eq!(tones.frequencies(), vec![440.0]);
    assert!(caps.is_unlocked());
}

#[tokio::test]
async fn test_first_input_unlocks_tones() {
    let (mut driver, fakes) = driver_with_fakes(Variant::Full);
    run(&mut driver, 3);
    assert!(!fakes.tones.is_unlocked(), "No gesture yet");

    driver.submit(InputEvent::tap("test", 0));
    driver.step();
    assert!(fakes.tones.is_unlocked(), "First tap unlocks audio");
    assert_eq!(fakes.tones.frequencies(), vec![400.0], "The unlocking tap is itself audible");
    assert_eq!(fakes.tones.dropped(), 0);
}

#[tokio::test]
async fn test_reset_gesture_unlocks_tones() {
    let (mut driver, fakes) = driver_with_fakes(Variant::Basic);
    driver.submit(InputEvent::reset("test"));
    driver.step();
    assert!(fakes.tones.is_unlocked());
    assert_eq!(fakes.speech.last().as_deref(), Some("Let's start again! One star!"));
}

#[tokio::test]
async fn test_full_level_through_fakes() {
    let (mut driver, fakes) = driver_with_fakes(Variant::Full);
    run(&mut driver, ticks_for(1000) + 1);
    assert_eq!(fakes.speech.spoken(), vec!["Let's count! Tap one star!".to_string()]);

    driver.submit(InputEvent::tap("test", 0));
    driver.step();
    run(&mut driver, ticks_for(GameConfig::default().timings.celebration_ms));

    assert_eq!(
        fakes.tones.frequencies(),
        vec![400.0, 523.0, 659.0, 784.0, 1047.0],
        "Tap tone then the reward chord"
    );
    assert_eq!(fakes.particles.bursts().len(), 3);
    assert_eq!(
        fakes.speech.spoken(),
        vec![
            "Let's count! Tap one star!".to_string(),
            "Great job! You counted 1 star!".to_string(),
            "2 hearts".to_string(),
        ]
    );
    assert_eq!(fakes.speech.interrupted(), 2, "Each announcement cuts off the last");
    assert_eq!(driver.view().level, 2);
}

#[tokio::test]
async fn test_absent_capabilities_are_noops() {
    let config = GameConfig::default();
    let mut driver = Driver::new(&config, Capabilities::none());
    assert!(!driver.capabilities().has_tones());
    assert!(!driver.capabilities().has_speech());

    driver.submit(InputEvent::tap("test", 0));
    driver.step();
    for _ in 0..ticks_for(config.timings.celebration_ms) {
        driver.step();
    }
    assert_eq!(driver.view().level, 2, "Gameplay continues without any output");

    let mut caps = Capabilities::none();
    caps.unlock();
    caps.dispatch(&SideEffect::Burst(BurstSpec::new(10, 30.0)));
    caps.dispatch(&SideEffect::Announce("nobody hears this".into()));
    caps.shutdown();
}

#[tokio::test]
async fn test_shutdown_tears_down_and_summarizes() {
    let (mut driver, fakes) = driver_with_fakes(Variant::Basic);
    driver.submit(InputEvent::tap("test", 0));
    driver.step();
    run(&mut driver, ticks_for(GameConfig::default().timings.celebration_ms));

    let summary = driver.shutdown();
    assert!(fakes.tones.is_shut_down());
    match summary {
        TelemetryEvent::SessionSummary {
            levels_completed,
            taps,
            resets,
            duration_ticks,
            ..
        } => {
            assert_eq!(levels_completed, 1);
            assert_eq!(taps, 1);
            assert_eq!(resets, 0);
            assert_eq!(duration_ticks, 1 + ticks_for(3000));
        }
        other => panic!("Expected a session summary, got {other:?}"),
    }

    // Tones after shutdown go nowhere.
    let before = fakes.tones.played().len();
    driver.submit(InputEvent::tap("test", 0));
    driver.step();
    assert_eq!(fakes.tones.played().len(), before);
}
