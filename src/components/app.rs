use crate::components::{AudioController, AudioState, SessionToast, StartPrompt};
use crate::db;
use crate::diagnostics::log_event;
use crate::playback::PlaybackPhase;
use dioxus::prelude::*;

/// Startup phase, newtype-wrapped for context.
#[derive(Clone, Copy)]
pub struct PhaseSignal(pub Signal<PlaybackPhase>);

/// Visibility of the one-time session toast.
#[derive(Clone, Copy)]
pub struct ToastVisibleSignal(pub Signal<bool>);

/// Visibility of the manual-start prompt.
#[derive(Clone, Copy)]
pub struct PromptVisibleSignal(pub Signal<bool>);

#[component]
pub fn AppShell() -> Element {
    let phase = use_signal(PlaybackPhase::default);
    let toast_visible = use_signal(|| false);
    let prompt_visible = use_signal(|| false);
    let audio_state = use_signal(AudioState::default);

    // Provide state via context
    use_context_provider(|| PhaseSignal(phase));
    use_context_provider(|| ToastVisibleSignal(toast_visible));
    use_context_provider(|| PromptVisibleSignal(prompt_visible));
    use_context_provider(|| audio_state);

    // Show the "now playing" notice once per session
    use_effect(move || {
        let mut toast_visible = toast_visible.clone();
        if !db::was_notified() {
            toast_visible.set(true);
            if let Err(err) = db::mark_notified() {
                log_event("storage", &format!("could not set the notified flag: {err}"));
            }
        }
    });

    rsx! {
        if toast_visible() {
            SessionToast {}
        }
        if prompt_visible() {
            StartPrompt {}
        }

        // Audio controller - manages playback separately from the UI
        AudioController {}
    }
}
