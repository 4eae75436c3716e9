mod api;
mod components;

use components::handlers;
use components::header::{render_hero, render_navigation};
use components::live_camera::LiveCamera;
use components::sections::{render_about, render_footer, render_how_to_use, render_tech_stack};
use components::upload_section::render_demo_section;
use components::utils::{demo_variant, render_notice};
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::DemoVariant;
use shared::PredictionResponse;
use shared::widget::{Ticket, UploadWidget};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // File operations
    FileChosen(GlooFile),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
    Reset,

    // Prediction
    PredictionFinished(Ticket, Result<PredictionResponse, String>),

    // UI states
    SetDragging(bool),
    DismissNotice,
}

// Main component
pub struct Model {
    variant: DemoVariant,
    widget: UploadWidget,
    preview_url: Option<ObjectUrl>,
    paste_listener: Option<EventListener>,
    notice_timeout: Option<Timeout>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            variant: demo_variant(),
            widget: UploadWidget::new(),
            preview_url: None,
            paste_listener: None,
            notice_timeout: None,
        };

        let link = ctx.link().clone();
        if let Some(window) = web_sys::window() {
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
            Msg::Reset => handlers::handle_reset(self),
            Msg::PredictionFinished(ticket, outcome) => {
                handlers::handle_prediction_finished(self, ctx, ticket, outcome)
            }
            Msg::SetDragging(is_dragging) => {
                self.widget.set_dragging(is_dragging);
                true
            }
            Msg::DismissNotice => {
                self.widget.dismiss_notice();
                self.notice_timeout = None;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_navigation(self.variant) }
                { render_notice(self.widget.notice.as_ref(), ctx.link()) }

                <main class="main-content">
                    { render_hero(self.variant) }
                    { render_about(self.variant) }
                    { render_how_to_use(self.variant) }
                    { render_tech_stack() }
                    { render_demo_section(self, ctx) }
                    <LiveCamera variant={self.variant} />
                </main>

                { render_footer(self.variant) }
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());

    yew::Renderer::<Model>::new().render();
}
