use super::super::{Model, Msg};
use super::results::render_results;
use super::utils::{FILE_INPUT_ID, debounce, open_file_picker};
use gloo_file::File as GlooFile;
use shared::widget::View;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_demo_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <section id="demo" class="section demo-section">
            <h2>{"Try the Demo"}</h2>
            <p class="subtitle">{"Upload an image and experience real-time object detection"}</p>
            <div class="glass demo-card">
                {
                    match model.widget.view() {
                        View::Upload => render_file_input_area(model, ctx),
                        View::Loading => render_loading(),
                        view => render_outcome(model, ctx, view),
                    }
                }
            </div>
        </section>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input
            .files()
            .and_then(|files| files.item(0))
            .map(|file| Msg::FileChosen(GlooFile::from(file)))
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);

    html! {
        <>
            <div
                id="drop-zone"
                class={classes!("upload-area", model.widget.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, open_file_picker)}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <h3>{"Drop your image here"}</h3>
                    <p>{"or click to browse files"}</p>
                    <button class="analyze-btn">{"Choose File"}</button>
                    <p class="file-types">{"Supports JPG, PNG, WEBP • Max 10MB"}</p>
                </div>
            </div>
            <input
                type="file"
                id={FILE_INPUT_ID}
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />
        </>
    }
}

fn render_loading() -> Html {
    html! {
        <div class="loading-preview">
            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
            <h3>{"Analyzing Image..."}</h3>
            <p>{"Our AI is detecting objects in your image"}</p>
        </div>
    }
}

fn render_outcome(model: &Model, ctx: &Context<Model>, view: View) -> Html {
    let alt = model.widget.file_name.clone().unwrap_or_else(|| "Uploaded".to_string());
    html! {
        <>
            <div class="results-grid">
                <div class="glass-dark panel">
                    <h3>{"Uploaded Image"}</h3>
                    {
                        if let Some(url) = &model.widget.preview {
                            html! { <img id="actual-image-preview" src={url.clone()} alt={alt} /> }
                        } else {
                            html! { <div class="unavailable-preview"><p>{"Preview unavailable"}</p></div> }
                        }
                    }
                </div>
                <div class="glass-dark panel">
                    <h3>{"Detection Results"}</h3>
                    { render_results(&view, model.widget.overall_map) }
                </div>
            </div>
            <div class="button-container">
                <button class="analyze-btn" onclick={ctx.link().callback(|_| Msg::Reset)}>
                    <i class="fa-solid fa-rotate"></i>{" Try Another Image"}
                </button>
            </div>
        </>
    }
}
