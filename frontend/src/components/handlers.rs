use super::super::{Model, Msg};
use super::utils::{clear_file_input, first_file};
use crate::api;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::PredictionResponse;
use shared::widget::{FileCandidate, Ticket};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

const NOTICE_DISMISS_MS: u32 = 5000;

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    let candidate = FileCandidate {
        name: file.name(),
        mime: file.raw_mime_type(),
        size: file.size(),
    };

    let preview_url = ObjectUrl::from(file.clone());
    match model.widget.select(&candidate, preview_url.to_string()) {
        Ok(ticket) => {
            model.preview_url = Some(preview_url);
            send_prediction_request(ctx, ticket, file);
        }
        Err(rejection) => {
            log::warn!("Rejected {}: {}", candidate.name, rejection);
        }
    }
    schedule_notice_dismiss(model, ctx);
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.widget.set_dragging(false);

    if let Some(file) = event
        .data_transfer()
        .and_then(|dt| dt.files())
        .and_then(|files| first_file(&files))
    {
        ctx.link().send_message(Msg::FileChosen(file));
    }
    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    // Pasting only makes sense while the drop zone is showing.
    if model.widget.preview.is_some() {
        return false;
    }
    if let Some(file) = event
        .clipboard_data()
        .and_then(|dt| dt.files())
        .and_then(|files| first_file(&files))
    {
        event.prevent_default();
        ctx.link().send_message(Msg::FileChosen(file));
    }
    false
}

pub fn handle_reset(model: &mut Model) -> bool {
    model.widget.reset();
    model.preview_url = None;
    model.notice_timeout = None;
    clear_file_input();
    true
}

pub fn handle_prediction_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    ticket: Ticket,
    outcome: Result<PredictionResponse, String>,
) -> bool {
    if !model.widget.resolve(ticket, outcome) {
        log::debug!("Dropped stale prediction response #{}", ticket);
        return false;
    }
    log::debug!(
        "Widget state: {}",
        serde_json::to_string(&model.widget).unwrap_or_default()
    );
    schedule_notice_dismiss(model, ctx);
    true
}

fn schedule_notice_dismiss(model: &mut Model, ctx: &Context<Model>) {
    if model.widget.notice.is_none() {
        return;
    }
    let link = ctx.link().clone();
    model.notice_timeout = Some(Timeout::new(NOTICE_DISMISS_MS, move || {
        link.send_message(Msg::DismissNotice);
    }));
}

fn send_prediction_request(ctx: &Context<Model>, ticket: Ticket, file: GlooFile) {
    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = api::submit_image(&file).await;
        if let Err(e) = &outcome {
            gloo_console::error!(format!("Prediction error: {}", e));
        }
        link.send_message(Msg::PredictionFinished(ticket, outcome));
    });
}
