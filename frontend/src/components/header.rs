use shared::DemoVariant;
use yew::prelude::*;

const NAV_ITEMS: [(&str, &str); 5] = [
    ("About", "#about"),
    ("How to Use", "#how-to-use"),
    ("Tech Stack", "#tech-stack"),
    ("Demo", "#demo"),
    ("Live Camera", "#live-camera"),
];

pub fn render_navigation(variant: DemoVariant) -> Html {
    html! {
        <nav class="app-nav">
            <a class="brand" href="#hero">
                <i class="fa-solid fa-eye"></i>{ format!(" {}", variant.title()) }
            </a>
            <ul>
                { for NAV_ITEMS.iter().map(|(label, href)| html! {
                    <li><a href={*href}>{ *label }</a></li>
                })}
            </ul>
        </nav>
    }
}

/// Renders the landing hero
pub fn render_hero(variant: DemoVariant) -> Html {
    let (headline, subtitle) = match variant {
        DemoVariant::AiVision => (
            "See the World Through AI",
            "Real-time object detection powered by deep learning. Upload an image and watch the model find every object in it.",
        ),
        DemoVariant::SpaceStation => (
            "Equipment Detection for Space Stations",
            "Locate toolboxes, oxygen tanks and fire extinguishers across station modules with YOLO-based detection.",
        ),
    };

    html! {
        <header id="hero" class="app-header hero">
            <h1>{ headline }</h1>
            <p class="subtitle">{ subtitle }</p>
            <div class="button-container">
                <a class="analyze-btn" href="#demo">{"Try the Demo"}</a>
                <a class="analyze-btn secondary" href="#how-to-use">{"Learn More"}</a>
            </div>
        </header>
    }
}
