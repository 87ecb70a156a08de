use voxptt_vox::{SampleFormat, VoxConfig};

use crate::fixtures::test_rig::{PTT_PIN, SQUELCH_PIN, TestRig};

#[tokio::test(start_paused = true)]
async fn hold_timeline_threshold_60_hold_1000() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    // tick 0: below the -60 cutoff
    assert!(!rig.step(&mut chain, -65.0).await);
    // tick 1: voice, hold re-armed
    assert!(rig.step(&mut chain, -50.0).await);
    // ticks 2..=10: quiet, hold decays
    for tick in 2..=10 {
        assert!(rig.step(&mut chain, -70.0).await, "PTT dropped at tick {}", tick);
    }
    // tick 11: hold expired
    assert!(!rig.step(&mut chain, -70.0).await);

    assert_eq!(rig.ptt_writes(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn hold_lasts_hold_ms_for_several_hold_times() {
    for hold_ms in [100, 300, 1000, 1550, 2500] {
        let rig = TestRig::with_config(VoxConfig {
            hold_ms,
            ptt_pin: Some(PTT_PIN),
            squelch_pin: Some(SQUELCH_PIN),
            ..Default::default()
        });
        let mut chain = rig.attach(SampleFormat::S16le).await;

        assert!(rig.step(&mut chain, -20.0).await);
        let mut on_ticks = 1;
        while rig.step(&mut chain, -90.0).await {
            on_ticks += 1;
            assert!(on_ticks <= 100, "PTT never released");
        }

        assert_eq!(on_ticks, hold_ms / 100, "hold_ms={}", hold_ms);
    }
}

#[tokio::test(start_paused = true)]
async fn voice_during_hold_rearms() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    assert!(rig.step(&mut chain, -30.0).await);
    for _ in 0..6 {
        assert!(rig.step(&mut chain, -80.0).await);
    }
    // Fresh voice: a full hold from here.
    assert!(rig.step(&mut chain, -30.0).await);
    for _ in 0..9 {
        assert!(rig.step(&mut chain, -80.0).await);
    }
    assert!(!rig.step(&mut chain, -80.0).await);
    assert_eq!(rig.ptt_writes(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn sustained_voice_writes_once() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    for _ in 0..30 {
        assert!(rig.step(&mut chain, -12.0).await);
    }
    assert_eq!(rig.ptt_writes(), vec![true]);
}

#[tokio::test(start_paused = true)]
async fn quiet_session_never_writes() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    for _ in 0..20 {
        assert!(!rig.step(&mut chain, -75.0).await);
    }
    assert!(rig.ptt_writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn last_level_is_held_between_frames() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    // One loud frame, then no audio at all: each tick re-reads the same
    // level, so the hold keeps being re-armed.
    assert!(rig.step(&mut chain, -40.0).await);
    rig.idle(25).await;
    assert!(rig.ptt());
    assert_eq!(rig.ptt_writes(), vec![true]);
}

#[tokio::test(start_paused = true)]
async fn ticks_before_first_frame_do_nothing() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    rig.set_squelch(true);
    rig.idle(30).await;
    assert!(rig.ptt_writes().is_empty());

    rig.set_squelch(false);
    assert!(rig.step(&mut chain, -30.0).await);
}
