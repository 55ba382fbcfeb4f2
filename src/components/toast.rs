use crate::components::ToastVisibleSignal;
use dioxus::prelude::*;

/// How long the startup toast stays up before it fades.
const TOAST_DURATION_MS: u32 = 4_500;
/// Delay between starting the fade and unmounting, slightly longer than
/// the stylesheet's 300ms opacity transition.
const TOAST_REMOVE_DELAY_MS: u32 = 350;

/// One-time "now playing" notice for the session.
#[component]
pub fn SessionToast() -> Element {
    let toast_visible = use_context::<ToastVisibleSignal>();
    let mut fading = use_signal(|| false);

    // Auto-hide
    use_effect(move || {
        let mut toast_visible = toast_visible.0;
        let mut fading = fading.clone();
        spawn(async move {
            sleep_ms(TOAST_DURATION_MS).await;
            fading.set(true);
            sleep_ms(TOAST_REMOVE_DELAY_MS).await;
            toast_visible.set(false);
        });
    });

    let toast_class = if fading() {
        "undertone-toast undertone-toast--fading"
    } else {
        "undertone-toast"
    };

    rsx! {
        div { id: "undertone-toast", class: "{toast_class}",
            "This site is playing an ambient track."
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_ms(_ms: u32) {}
