//! End-to-end snapshot capture and restore against the simulated host

use rfads::platform::{
    MediaSource, Platform, Player, PlayerEvent, ReadyState, SimPlayer, SimTech, TextTrackKind,
    TextTrackMode, TimeRanges,
};
use rfads::{AdSession, AdsConfig, ResumeOutcome};

fn content_player() -> SimPlayer {
    SimPlayer::new(MediaSource::new("content.mp4", "video/mp4"))
        .with_current_time(42.0)
        .with_duration(300.0)
        .with_tech(Some(SimTech {
            poster: "poster.jpg".into(),
            style: Some("width: 640px".into()),
            ..Default::default()
        }))
}

fn stalled_tech() -> SimTech {
    SimTech {
        ready_state: ReadyState::HaveNothing,
        seekable: Some(TimeRanges::empty()),
        ..Default::default()
    }
}

fn ready_tech() -> SimTech {
    SimTech {
        ready_state: ReadyState::HaveEnoughData,
        ..Default::default()
    }
}

fn start(player: SimPlayer) -> AdSession<SimPlayer> {
    AdSession::start(player, AdsConfig::default())
}

#[test]
fn roundtrip_without_recycling_restores_tracks_and_position() {
    let mut player = content_player();
    let showing = player.add_track("en", TextTrackKind::Captions, TextTrackMode::Showing, true);
    let hidden = player.add_track("fr", TextTrackKind::Subtitles, TextTrackMode::Hidden, false);
    let disabled = player.add_track("meta", TextTrackKind::Metadata, TextTrackMode::Disabled, false);
    let mut s = start(player);

    s.begin_ad_break();
    assert_eq!(showing.mode(), TextTrackMode::Disabled);
    assert_eq!(hidden.mode(), TextTrackMode::Disabled);

    assert!(!s.end_ad_break());
    assert_eq!(showing.mode(), TextTrackMode::Showing);
    assert_eq!(hidden.mode(), TextTrackMode::Hidden);
    assert_eq!(disabled.mode(), TextTrackMode::Disabled);
    assert_eq!(s.player().current_time(), 42.0);
    assert_eq!(s.player().play_calls(), 1);
    assert_eq!(s.player().loads(), 0);
}

#[test]
fn disabled_restore_is_skipped_once() {
    let mut player = content_player();
    let track = player.add_track("en", TextTrackKind::Captions, TextTrackMode::Showing, true);
    let mut s = start(player);

    s.begin_ad_break();
    s.player_mut().tech_state_mut().unwrap().style = Some("display: none".into());
    s.disable_next_snapshot_restore();
    assert!(!s.end_ad_break());

    assert!(!s.ads().disable_next_snapshot_restore);
    assert_eq!(track.mode(), TextTrackMode::Disabled);
    assert_eq!(s.player().tech().unwrap().style().as_deref(), Some("display: none"));
    assert_eq!(s.player().play_calls(), 0);
    assert!(s.player().seeks().is_empty());

    // The next break restores normally
    s.begin_ad_break();
    s.end_ad_break();
    assert_eq!(s.player().play_calls(), 1);
}

#[test]
fn empty_saved_style_clears_ad_styling() {
    let player = content_player().with_tech(Some(SimTech::default()));
    let mut s = start(player);
    s.begin_ad_break();
    s.player_mut().tech_state_mut().unwrap().style = Some("visibility: hidden".into());
    s.end_ad_break();
    assert_eq!(s.player().tech().unwrap().style().as_deref(), Some(""));
}

#[test]
fn recycled_element_reloads_content_and_restores_element_state() {
    let mut player = content_player();
    let track = player.add_track("en", TextTrackKind::Captions, TextTrackMode::Showing, true);
    let mut s = start(player);

    s.begin_ad_break();
    s.player_mut().load_ad_source(MediaSource::new("ad.mp4", "video/mp4"));
    s.player_mut().swap_tech(ready_tech());

    assert!(s.end_ad_break());
    assert_eq!(s.player().current_src(), "content.mp4");
    assert_eq!(s.player().current_type(), "video/mp4");
    assert_eq!(s.player().loads(), 1);
    assert_eq!(s.player().tech().unwrap().poster(), "poster.jpg");
    assert_eq!(s.player().tech().unwrap().style().as_deref(), Some("width: 640px"));

    // Tracks wait for metadata
    assert_eq!(track.mode(), TextTrackMode::Disabled);
    assert!(s.handle_event(&PlayerEvent::ContentLoadedMetadata));
    assert_eq!(track.mode(), TextTrackMode::Showing);
    assert!(!s.handle_event(&PlayerEvent::ContentLoadedMetadata));

    assert!(s.handle_event(&PlayerEvent::ContentCanPlay));
    assert_eq!(s.player().seeks(), [42.0]);
    assert_eq!(s.player().play_calls(), 1);
    assert!(!s.restore_pending());
    assert_eq!(s.restore().unwrap().outcome(), Some(ResumeOutcome::Resumed));
}

#[test]
fn canplay_disarms_the_timeout() {
    let mut s = start(content_player());
    s.begin_ad_break();
    s.player_mut().swap_tech(ready_tech());
    s.end_ad_break();

    let timeout = s.ads().try_to_resume_timeout.expect("timeout armed");
    assert!(s.handle_event(&PlayerEvent::ContentCanPlay));
    assert!(s.ads().try_to_resume_timeout.is_none());
    assert!(s.player().pending_timers().is_empty());

    // A late timer firing must not resume a second time
    assert!(!s.fire_timer(timeout));
    assert_eq!(s.player().seeks(), [42.0]);
    assert_eq!(s.player().play_calls(), 1);
}

#[test]
fn timeout_disarms_canplay() {
    let mut s = start(content_player());
    s.begin_ad_break();
    s.player_mut().swap_tech(ready_tech());
    s.end_ad_break();

    assert_eq!(s.run_timers(), 1);
    assert_eq!(s.player().play_calls(), 1);
    assert!(!s.handle_event(&PlayerEvent::ContentCanPlay));
    assert_eq!(s.player().seeks(), [42.0]);
    assert_eq!(s.player().play_calls(), 1);
}

#[test]
fn polls_until_the_element_becomes_seekable() {
    let mut s = start(content_player());
    s.begin_ad_break();
    s.player_mut().swap_tech(stalled_tech());
    s.end_ad_break();

    assert!(s.handle_event(&PlayerEvent::ContentCanPlay));
    assert!(s.player().seeks().is_empty());

    for _ in 0..3 {
        let id = s.player_mut().pop_due_timer().expect("poll scheduled");
        assert!(s.fire_timer(id));
    }
    assert!(s.player().seeks().is_empty());
    assert_eq!(s.restore().unwrap().attempts_remaining(), 16);

    s.player_mut().tech_state_mut().unwrap().seekable = Some(TimeRanges::new(vec![(0.0, 300.0)]));
    assert_eq!(s.run_timers(), 1);
    assert_eq!(s.player().seeks(), [42.0]);
    assert_eq!(s.player().play_calls(), 1);
    assert_eq!(s.restore().unwrap().resume_checks(), 5);
}

#[test]
fn exhausted_polls_resume_exactly_once() {
    let mut s = start(content_player());
    s.begin_ad_break();
    s.player_mut().swap_tech(stalled_tech());
    s.end_ad_break();

    // restore timeout plus twenty polls
    assert_eq!(s.run_timers(), 21);
    let task = s.restore().unwrap();
    assert_eq!(task.resume_checks(), 21);
    assert_eq!(task.attempts_remaining(), 0);
    assert_eq!(task.outcome(), Some(ResumeOutcome::Resumed));
    assert_eq!(s.player().seeks(), [42.0]);
    assert_eq!(s.player().play_calls(), 1);
    assert!(s.player().pending_timers().is_empty());
}

#[test]
fn failed_resume_is_swallowed() {
    let mut s = start(content_player());
    s.begin_ad_break();
    s.player_mut().swap_tech(stalled_tech());
    s.end_ad_break();
    s.player_mut().fail_seeks(true);

    assert_eq!(s.run_timers(), 21);
    assert_eq!(s.restore().unwrap().outcome(), Some(ResumeOutcome::Failed));
    assert!(s.player().seeks().is_empty());
    assert_eq!(s.player().play_calls(), 0);
}

#[test]
fn failed_play_without_recycling_is_swallowed() {
    let mut s = start(content_player());
    s.begin_ad_break();
    s.player_mut().fail_play("NotAllowedError");
    assert!(!s.end_ad_break());
    assert_eq!(s.player().play_calls(), 0);
}

#[test]
fn postroll_seeks_to_duration_without_playing() {
    let mut s = start(content_player());
    s.player_mut().set_ended(true);
    s.begin_ad_break();
    s.player_mut().load_ad_source(MediaSource::new("postroll.mp4", "video/mp4"));
    s.end_ad_break();
    s.handle_event(&PlayerEvent::ContentCanPlay);
    assert_eq!(s.player().seeks(), [300.0]);
    assert_eq!(s.player().play_calls(), 0);
}

#[test]
fn ios_live_restores_offset_from_new_live_edge() {
    let player = content_player()
        .with_platform(Platform::ios())
        .with_live(true)
        .with_current_time(90.0)
        .with_seekable(TimeRanges::new(vec![(0.0, 100.0)]));
    let mut s = start(player);

    assert_eq!(s.begin_ad_break().current_time(), -10.0);
    s.player_mut().load_ad_source(MediaSource::new("ad.mp4", "video/mp4"));
    s.player_mut().set_seekable(TimeRanges::new(vec![(30.0, 130.0)]));
    s.end_ad_break();
    s.handle_event(&PlayerEvent::ContentCanPlay);

    assert_eq!(s.player().seeks(), [120.0]);
    assert_eq!(s.player().play_calls(), 1);
}

#[test]
fn custom_poll_budget_is_honoured() {
    let config = AdsConfig {
        resume_poll_attempts: 2,
        ..Default::default()
    };
    let mut s = AdSession::start(content_player(), config);
    s.begin_ad_break();
    s.player_mut().swap_tech(stalled_tech());
    s.end_ad_break();
    assert_eq!(s.run_timers(), 3);
    assert_eq!(s.player().play_calls(), 1);
}
