use rfads::platform::sim::SimPlayerConfig;
use rfads::platform::{Player, ReadyState, SimPlayer, TextTrackMode};

#[test]
fn sim_player_from_json_config() {
    let config: SimPlayerConfig = serde_json::from_str(
        r#"{
            "platform": { "is_ios": true },
            "live": true,
            "src": "live.m3u8",
            "type": "application/x-mpegURL",
            "current_time": 95.0,
            "seekable": [[0.0, 100.0]],
            "tech": { "poster": "p.jpg", "ready_state": "have_metadata", "seekable": [] },
            "tracks": [
                { "id": "en", "kind": "captions", "mode": "showing", "remote": true },
                { "id": "cc1", "mode": "hidden" }
            ]
        }"#,
    )
    .expect("config should parse");

    let p = SimPlayer::from_config(&config);
    assert!(p.platform().is_ios);
    assert!(p.is_live());
    assert_eq!(p.current_src(), "live.m3u8");
    assert_eq!(p.current_type(), "application/x-mpegURL");
    assert_eq!(p.seekable().end(0), Some(100.0));
    let tech = p.tech().expect("tech present");
    assert_eq!(tech.poster(), "p.jpg");
    assert_eq!(tech.ready_state(), ReadyState::HaveMetadata);
    assert_eq!(tech.seekable().map(|r| r.len()), Some(0));
    assert_eq!(p.remote_text_tracks().len(), 1);
    assert_eq!(p.text_tracks()[1].mode(), TextTrackMode::Hidden);
}
