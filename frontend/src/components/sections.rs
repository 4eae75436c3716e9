use shared::DemoVariant;
use yew::prelude::*;

struct Card {
    icon: &'static str,
    title: &'static str,
    text: &'static str,
}

const AI_VISION_FEATURES: [Card; 3] = [
    Card {
        icon: "fa-solid fa-bolt",
        title: "Real-time Detection",
        text: "Objects are located and labelled in milliseconds.",
    },
    Card {
        icon: "fa-solid fa-bullseye",
        title: "High Accuracy",
        text: "A model trained on everyday scenes with confidence scores for every find.",
    },
    Card {
        icon: "fa-solid fa-layer-group",
        title: "Many Classes",
        text: "People, vehicles, animals and common household objects.",
    },
];

const STATION_FEATURES: [Card; 3] = [
    Card {
        icon: "fa-solid fa-toolbox",
        title: "Critical Equipment",
        text: "Finds toolboxes, oxygen tanks and fire extinguishers in cluttered modules.",
    },
    Card {
        icon: "fa-solid fa-chart-line",
        title: "mAP@0.5 Scoring",
        text: "Every class reports its mean average precision alongside the confidence.",
    },
    Card {
        icon: "fa-solid fa-satellite",
        title: "Station Cameras",
        text: "Continuous monitoring through the live camera feed.",
    },
];

const AI_VISION_STEPS: [Card; 3] = [
    Card {
        icon: "fa-solid fa-upload",
        title: "1. Upload",
        text: "Drop a JPG, PNG or WEBP image up to 10MB into the demo.",
    },
    Card {
        icon: "fa-solid fa-microchip",
        title: "2. Detect",
        text: "The image is sent to the detection service for analysis.",
    },
    Card {
        icon: "fa-solid fa-list-check",
        title: "3. Review",
        text: "Read each detected object with its confidence score.",
    },
];

const STATION_STEPS: [Card; 3] = [
    Card {
        icon: "fa-solid fa-camera",
        title: "1. Capture",
        text: "Upload a station module photo (JPG, PNG or WEBP, up to 10MB) or start the live camera.",
    },
    Card {
        icon: "fa-solid fa-microchip",
        title: "2. Detect",
        text: "The YOLO model searches the frame for toolboxes, oxygen tanks and fire extinguishers.",
    },
    Card {
        icon: "fa-solid fa-chart-line",
        title: "3. Review",
        text: "Check each find with its confidence and mAP@0.5 score, plus the overall mAP.",
    },
];

fn how_to_use_steps(variant: DemoVariant) -> &'static [Card; 3] {
    match variant {
        DemoVariant::AiVision => &AI_VISION_STEPS,
        DemoVariant::SpaceStation => &STATION_STEPS,
    }
}

const TECH: [(&str, &str); 6] = [
    ("YOLOv8", "Object detection model"),
    ("Rust", "Backend and frontend"),
    ("Actix Web", "HTTP server"),
    ("Yew", "WebAssembly UI"),
    ("Flask", "Model service"),
    ("WebRTC", "Camera capture"),
];

fn render_cards(cards: &[Card]) -> Html {
    html! {
        <div class="card-grid">
            { for cards.iter().map(|card| html! {
                <div class="glass card">
                    <i class={card.icon}></i>
                    <h3>{ card.title }</h3>
                    <p>{ card.text }</p>
                </div>
            })}
        </div>
    }
}

pub fn render_about(variant: DemoVariant) -> Html {
    let (intro, features) = match variant {
        DemoVariant::AiVision => (
            "AI Vision turns any photo into a list of the objects it contains.",
            &AI_VISION_FEATURES,
        ),
        DemoVariant::SpaceStation => (
            "Keeping track of safety equipment matters on a space station. This demo detects it from camera imagery.",
            &STATION_FEATURES,
        ),
    };

    html! {
        <section id="about" class="section">
            <h2>{"About"}</h2>
            <p class="subtitle">{ intro }</p>
            { render_cards(features) }
        </section>
    }
}

pub fn render_how_to_use(variant: DemoVariant) -> Html {
    html! {
        <section id="how-to-use" class="section">
            <h2>{"How to Use"}</h2>
            { render_cards(how_to_use_steps(variant)) }
        </section>
    }
}

pub fn render_tech_stack() -> Html {
    html! {
        <section id="tech-stack" class="section">
            <h2>{"Tech Stack"}</h2>
            <div class="card-grid">
                { for TECH.iter().map(|(name, role)| html! {
                    <div class="glass card">
                        <h3>{ *name }</h3>
                        <p>{ *role }</p>
                    </div>
                })}
            </div>
        </section>
    }
}

pub fn render_footer(variant: DemoVariant) -> Html {
    html! {
        <footer class="app-footer">
            <p>{ format!("{} Demo | Fullstack Rust WASM", variant.title()) }</p>
        </footer>
    }
}
