// Browser-only checks: run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use repex_engine::{BrowserClock, Clock, IncidentPlayer};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn browser_clock_resolves() {
    BrowserClock.sleep(Duration::from_millis(10)).await;
}

#[wasm_bindgen_test]
async fn play_resolves_on_last_step() {
    let player = IncidentPlayer::new(r#"{"scenario":"mooring_line_parting","playback":{"speed":4.0}}"#)
        .unwrap();
    let first = player.play();
    let second = player.play();

    let second = JsFuture::from(second).await.unwrap();
    assert_eq!(second.as_string().as_deref(), Some("ignored"));

    let first = JsFuture::from(first).await.unwrap();
    assert_eq!(first.as_string().as_deref(), Some("completed"));
    assert_eq!(player.current_step(), player.step_count() - 1);
}

#[wasm_bindgen_test]
async fn reset_cancels_playback() {
    let player = IncidentPlayer::new("{}").unwrap();
    let running = player.play();
    BrowserClock.sleep(Duration::from_millis(50)).await;
    player.reset();

    let outcome = JsFuture::from(running).await.unwrap();
    assert_eq!(outcome.as_string().as_deref(), Some("cancelled"));
    assert_eq!(player.current_step(), 0);
}

#[wasm_bindgen_test]
async fn throwing_listener_does_not_stop_playback() {
    let player = IncidentPlayer::new(r#"{"scenario":"mooring_line_parting","playback":{"speed":4.0}}"#)
        .unwrap();
    player.set_listener(js_sys::Function::new_with_args("state", "throw new Error(state)"));

    let outcome = JsFuture::from(player.play()).await.unwrap();
    assert_eq!(outcome.as_string().as_deref(), Some("completed"));
    assert_eq!(player.current_step(), player.step_count() - 1);
}
