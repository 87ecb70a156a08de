use voxptt_vox::{SampleFormat, VoxConfig};

use crate::fixtures::test_rig::{PTT_PIN, TestRig};

#[tokio::test(start_paused = true)]
async fn squelch_cuts_hold_in_the_same_tick() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    // tick 0 voice, ticks 1..=4 quiet: five periods of hold left.
    assert!(rig.step(&mut chain, -45.0).await);
    for _ in 1..=4 {
        assert!(rig.step(&mut chain, -80.0).await);
    }

    rig.set_squelch(true);
    assert!(!rig.step(&mut chain, -80.0).await);

    // The hold does not come back once squelch clears.
    rig.set_squelch(false);
    assert!(!rig.step(&mut chain, -80.0).await);
    assert_eq!(rig.ptt_writes(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn squelch_wins_over_voice() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    rig.set_squelch(true);
    for _ in 0..10 {
        assert!(!rig.step(&mut chain, -5.0).await);
    }
    assert!(rig.ptt_writes().is_empty());

    rig.set_squelch(false);
    assert!(rig.step(&mut chain, -5.0).await);
}

#[tokio::test(start_paused = true)]
async fn squelch_pulse_during_voice() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    assert!(rig.step(&mut chain, -20.0).await);
    rig.set_squelch(true);
    assert!(!rig.step(&mut chain, -20.0).await);
    rig.set_squelch(false);
    assert!(rig.step(&mut chain, -20.0).await);

    assert_eq!(rig.ptt_writes(), vec![true, false, true]);
}

#[tokio::test(start_paused = true)]
async fn without_squelch_pin_nothing_is_read() {
    let rig = TestRig::with_config(VoxConfig {
        ptt_pin: Some(PTT_PIN),
        squelch_pin: None,
        ..Default::default()
    });
    let mut chain = rig.attach(SampleFormat::S16le).await;

    // Driving the would-be squelch pin has no effect.
    rig.set_squelch(true);
    assert!(rig.step(&mut chain, -20.0).await);
}
