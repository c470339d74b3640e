use crate::ai::SharedResponder;
use crate::session::{ChatSession, format_message_time};
use crate::types::{Message, Sender};
use dioxus::events::{Key, MountedData, ScrollBehavior};
use dioxus::prelude::*;
use std::rc::Rc;

const THINKING_LABEL: &str = "AI is thinking…";
const INPUT_HINT: &str = "Press Enter to send, Shift + Enter for a new line";

fn sender_class(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "user",
        Sender::Ai => "assistant",
    }
}

#[component]
pub fn ChatView() -> Element {
    let responder = use_context::<SharedResponder>();
    let responder = use_signal(move || responder);
    let mut session = use_signal(ChatSession::new);
    let mut draft_field = use_signal(|| Option::<Rc<MountedData>>::None);
    let mut list_end = use_signal(|| Option::<Rc<MountedData>>::None);

    // Follow the newest entry, including the transient thinking row.
    use_effect(move || {
        let _entries = session.read().transcript().len();
        let _busy = session.read().is_busy();
        if let Some(anchor) = list_end() {
            spawn(async move {
                let _ = anchor.scroll_to(ScrollBehavior::Smooth).await;
            });
        }
    });

    // Runs after the render that re-enables the draft field.
    use_effect(move || {
        let (busy, wants_focus) = {
            let current = session.read();
            (current.is_busy(), current.wants_focus())
        };
        if busy || !wants_focus {
            return;
        }
        session.write().take_focus_request();
        if let Some(field) = draft_field() {
            spawn(async move {
                let _ = field.set_focus(true).await;
            });
        }
    });

    let send_message = {
        let mut session = session;
        move |text: String| {
            let responder = responder();
            spawn(async move {
                let outcome = responder.reply(&text).await;
                session.write().finish_submit(outcome);
            });
        }
    };

    let messages_snapshot = session.read().transcript().to_vec();
    let busy = session.read().is_busy();
    let draft = session.read().draft().to_string();
    let can_submit = session.read().can_submit();

    rsx! {
        div { class: "main-container",
            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    for msg in messages_snapshot.iter() {
                        MessageRow { key: "{msg.id}", message: msg.clone() }
                    }
                    if busy {
                        ThinkingRow {}
                    }
                    div {
                        class: "chat-end",
                        onmounted: move |ev| list_end.set(Some(ev.data())),
                    }
                }
            }

            form { class: "composer no-divider",
                div { class: "composer-inner",
                    div { class: "hstack", style: "gap: 0.5rem; width: 100%; align-items: flex-end;",
                        textarea {
                            class: "", rows: "1", placeholder: "Type your question...",
                            value: "{draft}",
                            oninput: move |ev| session.write().set_draft(ev.value()),
                            onkeydown: move |ev| {
                                let is_enter = ev.key() == Key::Enter;
                                let shift_held = ev.modifiers().shift();
                                if is_enter && !shift_held {
                                    ev.prevent_default();
                                }
                                let started = session.write().on_key(is_enter, shift_held);
                                if let Some(text) = started {
                                    send_message(text);
                                }
                            },
                            onmounted: move |ev| draft_field.set(Some(ev.data())),
                            disabled: busy, autofocus: true,
                        }
                        button {
                            class: "btn btn-primary", r#type: "button",
                            disabled: !can_submit,
                            onclick: move |_| {
                                let started = session.write().begin_submit();
                                if let Some(text) = started {
                                    send_message(text);
                                }
                            },
                            if busy { span { class: "spinner", aria_hidden: "true" } } else { "Send" }
                        }
                    }
                    div { class: "composer-hint", "{INPUT_HINT}" }
                }
            }
        }
    }
}

#[component]
fn MessageRow(message: Message) -> Element {
    let class = sender_class(message.sender);
    let timestamp = format_message_time(message.timestamp);
    rsx! {
        div { class: format_args!("message-row {}", class),
            if message.sender == Sender::Ai { div { class: "avatar assistant", "AI" } }
            div { class: "message-stack",
                div { class: format_args!("bubble {}", class), "{message.content}" }
                div { class: format_args!(
                        "message-meta {}",
                        match message.sender { Sender::User => "align-end", Sender::Ai => "align-start" }
                    ),
                    span { class: "message-timestamp", "{timestamp}" }
                }
            }
            if message.sender == Sender::User { div { class: "avatar user", "You" } }
        }
    }
}

#[component]
fn ThinkingRow() -> Element {
    rsx! {
        div { class: "message-row assistant",
            div { class: "avatar assistant", "AI" }
            div { class: "message-stack",
                div { class: "shimmer-line",
                    span { class: "spinner", aria_hidden: "true" }
                    span { class: "shimmer-text", "{THINKING_LABEL}" }
                }
            }
        }
    }
}
