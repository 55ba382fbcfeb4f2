use crate::components::{request_playback, PhaseSignal, PromptVisibleSignal};
use dioxus::prelude::*;

/// Floating "click to enable audio" panel shown while autoplay is blocked.
#[component]
pub fn StartPrompt() -> Element {
    let phase = use_context::<PhaseSignal>();
    let prompt_visible = use_context::<PromptVisibleSignal>();

    rsx! {
        div { id: "undertone-prompt", class: "undertone-prompt",
            p { class: "undertone-prompt-message",
                "This site plays an ambient track. Click start to enable audio."
            }
            button {
                class: "undertone-prompt-button",
                r#type: "button",
                // The click is the user gesture the autoplay policy wants.
                // Success unmounts the panel; renewed rejection leaves it up.
                onclick: move |_| request_playback(phase, prompt_visible),
                "Start"
            }
        }
    }
}
