use shared::widget::{ResultRow, View};
use yew::prelude::*;

const ROW_COLORS: [&str; 6] = ["green", "blue", "purple", "pink", "yellow", "red"];

pub fn render_results(view: &View, overall_map: Option<f64>) -> Html {
    match view {
        View::Results(rows) => html! {
            <div class="result-bars">
                { for rows.iter().enumerate().map(|(i, row)| render_row(i, row)) }
                {
                    if let Some(map) = overall_map {
                        html! { <p class="overall-map">{ format!("Overall mAP@0.5: {:.3}", map) }</p> }
                    } else {
                        html! {}
                    }
                }
            </div>
        },
        View::Failed => html! {
            <div class="no-results-message">
                <i class="fa-solid fa-triangle-exclamation"></i>
                <h4>{"Analysis Failed"}</h4>
                <p>{"Something went wrong. Try the same image again or pick another one."}</p>
            </div>
        },
        _ => html! {
            <div class="no-results-message">
                <i class="fa-solid fa-magnifying-glass"></i>
                <h4>{"No Objects Detected"}</h4>
                <p>{"Try uploading a different image with clearer objects"}</p>
            </div>
        },
    }
}

pub fn render_row(index: usize, row: &ResultRow) -> Html {
    let color = ROW_COLORS[index % ROW_COLORS.len()];
    html! {
        <div class="result-item">
            <div class="result-label">
                <span class={classes!("dot", color)}></span>
                <span class="capitalize">{ &row.label }</span>
            </div>
            {
                if let Some(map) = &row.map_score {
                    html! { <span class="result-map">{ format!("mAP {}", map) }</span> }
                } else {
                    html! {}
                }
            }
            <div class={classes!("result-value", color)}>{ &row.confidence }</div>
        </div>
    }
}
