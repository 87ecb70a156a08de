use voxptt_vox::{SampleFormat, Samples, VOX_FILTER_NAME, VoxError};

use crate::fixtures::signal::tone_s16;
use crate::fixtures::test_rig::{FRAME_SAMPLES, TestRig};

#[tokio::test(start_paused = true)]
async fn teardown_mid_hold_stops_all_writes() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;

    assert!(rig.step(&mut chain, -30.0).await);
    assert!(rig.step(&mut chain, -80.0).await);
    drop(chain);

    // The hold would have expired long ago; the dead session must not
    // touch the line.
    rig.idle(50).await;
    assert!(rig.ptt());
    assert_eq!(rig.ptt_writes(), vec![true]);
    assert_eq!(rig.module().filter().live_sessions(), 0);
}

#[tokio::test(start_paused = true)]
async fn module_close_forces_ptt_off() {
    let mut rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;
    assert!(rig.step(&mut chain, -30.0).await);
    drop(chain);

    rig.close();
    assert!(!rig.ptt());
    assert_eq!(rig.ptt_writes(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn module_close_writes_even_when_already_off() {
    let mut rig = TestRig::spawn();
    rig.close();
    assert_eq!(rig.ptt_writes(), vec![false]);
}

#[tokio::test(start_paused = true)]
async fn module_close_terminates_live_sessions() {
    let mut rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;
    assert!(rig.step(&mut chain, -30.0).await);

    rig.close();
    assert!(rig.registry.names().is_empty());

    let err = chain
        .decode(Samples::S16(&tone_s16(-30.0, FRAME_SAMPLES)))
        .unwrap_err();
    assert!(matches!(err, VoxError::InvalidArgument(_)));

    rig.idle(20).await;
    assert_eq!(rig.ptt_writes(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn sessions_are_tracked_until_dropped() {
    let rig = TestRig::spawn();
    let first = rig.attach(SampleFormat::S16le).await;
    let second = rig.attach(SampleFormat::Float).await;

    assert_eq!(first.attached(), vec![VOX_FILTER_NAME]);
    assert_ne!(first.params().session, second.params().session);
    assert_eq!(rig.module().filter().live_sessions(), 2);

    drop(first);
    assert_eq!(rig.module().filter().live_sessions(), 1);
    drop(second);
    assert_eq!(rig.module().filter().live_sessions(), 0);
}

#[tokio::test(start_paused = true)]
async fn chain_detach_is_session_teardown() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;
    assert!(rig.step(&mut chain, -30.0).await);

    assert!(chain.detach(VOX_FILTER_NAME));
    assert_eq!(rig.module().filter().live_sessions(), 0);

    // Nothing is attached any more, so frames pass through untouched.
    chain
        .decode(Samples::S16(&tone_s16(-80.0, FRAME_SAMPLES)))
        .unwrap();
    rig.idle(20).await;
    assert_eq!(rig.ptt_writes(), vec![true]);
}

#[tokio::test(start_paused = true)]
async fn update_after_attach_keeps_session_state() {
    let rig = TestRig::spawn();
    let mut chain = rig.attach(SampleFormat::S16le).await;
    assert!(rig.step(&mut chain, -30.0).await);

    assert_eq!(chain.update(&rig.registry).unwrap(), 0);
    assert_eq!(rig.module().filter().live_sessions(), 1);
    // Hold keeps counting down from the same session.
    assert!(rig.step(&mut chain, -80.0).await);
}
