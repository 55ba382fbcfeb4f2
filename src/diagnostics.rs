/// Developer-facing diagnostics. Nothing here reaches the page itself.
#[cfg(target_arch = "wasm32")]
pub fn log_event(scope: &str, details: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&format!(
        "[{scope}] {details}"
    )));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_event(scope: &str, details: &str) {
    eprintln!("[{scope}] {details}");
}
