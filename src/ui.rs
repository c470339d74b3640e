use crate::ai::{SharedResponder, responder_from_env};
use crate::views::ChatView;
use dioxus::prelude::*;

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Composition root: builds the responder once and hands it to the view tree.
#[component]
pub fn App() -> Element {
    use_context_provider::<SharedResponder>(responder_from_env);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        div { class: "app-shell",
            AppHeader {}
            ChatView {}
        }
    }
}

#[component]
fn AppHeader() -> Element {
    rsx! {
        div { class: "header no-divider",
            div { class: "header-content",
                div { class: "header-avatar",
                    span { class: "avatar assistant", "AI" }
                    span { class: "status-dot", aria_hidden: "true" }
                }
                div {
                    h1 { class: "header-title", "AI Assistant" }
                    p { class: "header-status", "Online - always here to help" }
                }
            }
        }
    }
}
