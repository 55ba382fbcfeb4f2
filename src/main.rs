use dioxus::prelude::*;

mod components;
mod db;
mod diagnostics;
mod playback;

use components::AppShell;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#141414" }
        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}
