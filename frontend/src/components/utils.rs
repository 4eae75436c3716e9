use super::super::{Model, Msg};
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use shared::DemoVariant;
use shared::widget::{Notice, NoticeKind};
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::JsCast;
use web_sys::{FileList, HtmlInputElement};
use yew::html::Scope;
use yew::prelude::*;

pub const FILE_INPUT_ID: &str = "file-input";

/// Variant baked in at build time, e.g. `DEMO_VARIANT=space-station trunk build`.
pub fn demo_variant() -> DemoVariant {
    option_env!("DEMO_VARIANT")
        .and_then(|raw| DemoVariant::from_str(raw).ok())
        .unwrap_or_default()
}

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || {
            inner_callback();
        }));
    })
}

/// Only the first file of a multi-file drop or paste is used.
pub fn first_file(file_list: &FileList) -> Option<GlooFile> {
    file_list.item(0).map(GlooFile::from)
}

pub fn clear_file_input() {
    if let Some(input) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(FILE_INPUT_ID))
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value("");
    }
}

pub fn open_file_picker() {
    if let Some(input) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(FILE_INPUT_ID))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    {
        input.click();
    }
}

pub fn render_notice(notice: Option<&Notice>, link: &Scope<Model>) -> Html {
    let Some(notice) = notice else {
        return html! {};
    };
    let (class, icon) = match notice.kind {
        NoticeKind::Success => ("toast toast-success", "fa-solid fa-circle-check"),
        NoticeKind::Error => ("toast toast-error", "fa-solid fa-circle-exclamation"),
    };
    html! {
        <div class={class} role="status" onclick={link.callback(|_| Msg::DismissNotice)}>
            <i class={icon}></i>
            <div>
                <strong>{ &notice.title }</strong>
                <p>{ &notice.text }</p>
            </div>
        </div>
    }
}
