//! Audio controller - owns the hidden audio element and its lifecycle
//! outside of the component render cycle.

use dioxus::prelude::*;

use crate::components::{PhaseSignal, PromptVisibleSignal};

#[cfg(target_arch = "wasm32")]
use crate::db;
#[cfg(target_arch = "wasm32")]
use crate::diagnostics::log_event;
#[cfg(target_arch = "wasm32")]
use crate::playback::{self, PlaybackEvent};

#[cfg(target_arch = "wasm32")]
use std::cell::Cell;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement, HtmlMediaElement};

/// Relative path the deployment serves the track from. The audio file is
/// not part of this repository.
#[cfg(target_arch = "wasm32")]
const AUDIO_SRC: &str = "/assets/ambient-loop.mp3";

/// Cadence of the position persistence timer.
#[cfg(target_arch = "wasm32")]
const PERSIST_INTERVAL_MS: u32 = 1_000;

/// Global audio state that persists across renders
#[derive(Clone)]
pub struct AudioState {
    pub current_time: Signal<f64>,
    pub duration: Signal<f64>,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            current_time: Signal::new(0.0),
            duration: Signal::new(0.0),
        }
    }
}

/// Initialize the global audio element once
#[cfg(target_arch = "wasm32")]
pub fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    // Reuse the element if a previous initialization already attached it
    if let Some(existing) = document.get_element_by_id("undertone-audio") {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id("undertone-audio");
    audio.set_src(AUDIO_SRC);
    audio.set_autoplay(true);
    // Preload the whole file so the resume seek has metadata to work with
    audio.set_attribute("preload", "auto").ok()?;
    audio.set_attribute("style", "display:none").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(dead_code)]
pub fn get_or_create_audio_element() -> Option<()> {
    None
}

/// Ask the element to start playing and route the outcome into the phase
/// machine. Rejection means the autoplay policy wants a user gesture, so
/// the manual-start prompt goes up.
#[cfg(target_arch = "wasm32")]
pub fn request_playback(phase: PhaseSignal, prompt_visible: PromptVisibleSignal) {
    let Some(audio) = get_or_create_audio_element() else {
        return;
    };

    let mut phase = phase.0;
    let mut prompt_visible = prompt_visible.0;
    match audio.play() {
        Ok(promise) => {
            spawn(async move {
                match wasm_bindgen_futures::JsFuture::from(promise).await {
                    Ok(_) => {
                        let next = phase.peek().advance(PlaybackEvent::PlaybackAccepted);
                        phase.set(next);
                        prompt_visible.set(false);
                    }
                    Err(_) => {
                        log_event("audio", "playback rejected, waiting for a user gesture");
                        let next = phase.peek().advance(PlaybackEvent::PlaybackRejected);
                        phase.set(next);
                        prompt_visible.set(true);
                    }
                }
            });
        }
        Err(_) => {
            let next = phase.peek().advance(PlaybackEvent::PlaybackRejected);
            phase.set(next);
            prompt_visible.set(true);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn request_playback(_phase: PhaseSignal, _prompt_visible: PromptVisibleSignal) {}

/// Playback is a web behavior; native builds only keep the component tree
/// compiling.
#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn AudioController() -> Element {
    rsx! {}
}

#[cfg(target_arch = "wasm32")]
#[component]
pub fn AudioController() -> Element {
    let phase = use_context::<PhaseSignal>();
    let prompt_visible = use_context::<PromptVisibleSignal>();
    let audio_state = use_context::<Signal<AudioState>>();

    // Non-reactive guards so a remount cannot double-start the element,
    // the metadata handler, or the persistence loop
    thread_local! {
        static STARTED: Cell<bool> = Cell::new(false);
        static PERSIST_STOPPED: Cell<bool> = Cell::new(false);
    }

    use_effect(move || {
        if STARTED.with(|c| c.replace(true)) {
            return;
        }

        let Some(audio) = get_or_create_audio_element() else {
            return;
        };

        {
            let mut phase_signal = phase.0;
            let next = phase_signal.peek().advance(PlaybackEvent::DocumentReady);
            phase_signal.set(next);
        }

        // Startup seek: resume the session position, or fall back to the
        // fixed initial offset
        let offset = playback::resolve_start_offset(db::load_position());
        log_event("audio", &format!("start requested at {offset:.1}s"));

        if audio.ready_state() >= HtmlMediaElement::HAVE_METADATA {
            seek_and_play(&audio, offset, phase, prompt_visible, audio_state);
        } else {
            let meta_cb = Closure::wrap(Box::new(move || {
                if let Some(audio) = get_or_create_audio_element() {
                    // One-shot: drop the handler before seeking
                    audio.set_onloadedmetadata(None);
                    seek_and_play(&audio, offset, phase, prompt_visible, audio_state);
                }
            }) as Box<dyn FnMut()>);
            audio.set_onloadedmetadata(Some(meta_cb.as_ref().unchecked_ref()));
            meta_cb.forget();
        }

        // Persist the position once a second while the page is up
        {
            let mut current_time_signal = audio_state.peek().current_time;
            spawn(async move {
                let mut last_media_error: Option<String> = None;
                loop {
                    gloo_timers::future::TimeoutFuture::new(PERSIST_INTERVAL_MS).await;
                    if PERSIST_STOPPED.with(|c| c.get()) {
                        break;
                    }
                    let Some(audio) = get_or_create_audio_element() else {
                        continue;
                    };

                    let time = audio.current_time();
                    current_time_signal.set(time);
                    persist_position(time);

                    let media_error = media_error_message(&audio);
                    if media_error != last_media_error {
                        if let Some(ref message) = media_error {
                            log_event("audio", message);
                        }
                        last_media_error = media_error;
                    }
                }
            });
        }

        // Flush the position when the tab goes hidden or the page unloads;
        // pagehide also stops the timer
        if let Some(doc) = window().and_then(|w| w.document()) {
            let vis_cb = Closure::wrap(Box::new(move || {
                let Some(doc) = window().and_then(|w| w.document()) else {
                    return;
                };
                if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                    if let Some(audio) = get_or_create_audio_element() {
                        persist_position(audio.current_time());
                    }
                }
            }) as Box<dyn FnMut()>);
            let _ = doc.add_event_listener_with_callback(
                "visibilitychange",
                vis_cb.as_ref().unchecked_ref(),
            );
            vis_cb.forget();
        }
        if let Some(win) = window() {
            let unload_cb = Closure::wrap(Box::new(move || {
                if let Some(audio) = get_or_create_audio_element() {
                    persist_position(audio.current_time());
                }
            }) as Box<dyn FnMut()>);
            let _ = win.add_event_listener_with_callback(
                "beforeunload",
                unload_cb.as_ref().unchecked_ref(),
            );
            unload_cb.forget();

            let hide_cb = Closure::wrap(Box::new(move || {
                PERSIST_STOPPED.with(|c| c.set(true));
            }) as Box<dyn FnMut()>);
            let _ =
                win.add_event_listener_with_callback("pagehide", hide_cb.as_ref().unchecked_ref());
            hide_cb.forget();
        }
    });

    // Return empty element - this component just manages state
    rsx! {}
}

/// Seek to the clamped start offset and request playback. The seek comes
/// first so a rejected play still leaves the position ready for the
/// manual start.
#[cfg(target_arch = "wasm32")]
fn seek_and_play(
    audio: &HtmlAudioElement,
    offset: f64,
    phase: PhaseSignal,
    prompt_visible: PromptVisibleSignal,
    audio_state: Signal<AudioState>,
) {
    let target = playback::clamp_offset_to_duration(offset, audio.duration());
    audio.set_current_time(target);

    let duration = audio.duration();
    if duration.is_finite() {
        let mut duration_signal = audio_state.peek().duration;
        duration_signal.set(duration);
    }
    let mut current_time_signal = audio_state.peek().current_time;
    current_time_signal.set(target);

    request_playback(phase, prompt_visible);
}

#[cfg(target_arch = "wasm32")]
fn persist_position(time: f64) {
    if let Err(err) = db::save_position(time) {
        log_event("storage", &format!("could not persist the position: {err}"));
    }
}

/// Map the element's MediaError, if any, to a log line.
#[cfg(target_arch = "wasm32")]
fn media_error_message(audio: &HtmlAudioElement) -> Option<String> {
    let audio_js = wasm_bindgen::JsValue::from(audio.clone());
    let error_js = js_sys::Reflect::get(&audio_js, &"error".into()).ok()?;
    if error_js.is_null() || error_js.is_undefined() {
        return None;
    }
    let code = js_sys::Reflect::get(&error_js, &"code".into())
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0) as u16;

    Some(match code {
        1 => "playback was aborted before the track loaded".to_string(),
        2 => "network error while loading the track".to_string(),
        3 => "the track failed to decode".to_string(),
        4 => "no supported source was found for the track".to_string(),
        _ => "the track could not be loaded".to_string(),
    })
}
