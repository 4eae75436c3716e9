use super::results::render_row;
use crate::api::{self, js_error};
use gloo_timers::callback::Interval;
use shared::DemoVariant;
use shared::PredictionResponse;
use shared::live::{FRAME_INTERVAL_MS, LiveCapture};
use shared::widget::{Ticket, result_rows};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::prelude::*;

pub enum LiveMsg {
    Toggle,
    StreamReady(MediaStream),
    CameraDenied(String),
    Tick,
    FrameFinished(Ticket, Result<PredictionResponse, String>),
}

#[derive(Properties, PartialEq)]
pub struct LiveCameraProps {
    pub variant: DemoVariant,
}

pub struct LiveCamera {
    live: LiveCapture,
    video_ref: NodeRef,
    stream: Option<MediaStream>,
    interval: Option<Interval>,
    requesting: bool,
}

impl Component for LiveCamera {
    type Message = LiveMsg;
    type Properties = LiveCameraProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            live: LiveCapture::new(),
            video_ref: NodeRef::default(),
            stream: None,
            interval: None,
            requesting: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LiveMsg::Toggle => {
                if self.live.streaming {
                    self.release();
                } else if !self.requesting {
                    self.requesting = true;
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        match request_camera().await {
                            Ok(stream) => link.send_message(LiveMsg::StreamReady(stream)),
                            Err(reason) => link.send_message(LiveMsg::CameraDenied(reason)),
                        }
                    });
                }
                true
            }
            LiveMsg::StreamReady(stream) => {
                self.requesting = false;
                if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
                    video.set_src_object(Some(&stream));
                    if let Err(e) = video.play() {
                        log::warn!("Video playback did not start: {:?}", e);
                    }
                }
                self.stream = Some(stream);
                self.live.start();

                let link = ctx.link().clone();
                self.interval = Some(Interval::new(FRAME_INTERVAL_MS, move || {
                    link.send_message(LiveMsg::Tick);
                }));
                true
            }
            LiveMsg::CameraDenied(reason) => {
                self.requesting = false;
                gloo_console::error!(format!("Camera access failed: {}", reason));
                self.live.camera_denied(format!("Camera unavailable: {}", reason));
                true
            }
            LiveMsg::Tick => {
                let Some(frame) = self.video_ref.cast::<HtmlVideoElement>().and_then(|v| capture_frame(&v))
                else {
                    return false;
                };
                let Some(ticket) = self.live.tick() else {
                    return false;
                };

                let link = ctx.link().clone();
                spawn_local(async move {
                    let outcome = api::submit_frame(frame).await;
                    link.send_message(LiveMsg::FrameFinished(ticket, outcome));
                });
                true
            }
            LiveMsg::FrameFinished(ticket, Ok(response)) => {
                if !self.live.apply(ticket, response) {
                    log::debug!("Dropped stale frame response #{}", ticket);
                    return false;
                }
                true
            }
            LiveMsg::FrameFinished(ticket, Err(e)) => {
                gloo_console::error!(format!("Frame #{} failed: {}", ticket, e));
                self.live.frame_failed(ticket)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let streaming = self.live.streaming;
        let feed_title = match ctx.props().variant {
            DemoVariant::AiVision => "Camera Feed",
            DemoVariant::SpaceStation => "Station Camera Feed",
        };

        html! {
            <section id="live-camera" class="section live-section">
                <h2>{"Live Camera Detection"}</h2>
                <p class="subtitle">{"Real-time object detection with continuous monitoring"}</p>
                <div class="glass results-grid">
                    <div class="glass-dark panel">
                        <div class="panel-header">
                            <h3>{ feed_title }</h3>
                            <button
                                class={classes!("analyze-btn", if streaming { "stop" } else { "start" })}
                                disabled={self.requesting}
                                onclick={ctx.link().callback(|_| LiveMsg::Toggle)}
                            >
                                { if streaming { "Stop Stream" } else { "Start Stream" } }
                            </button>
                        </div>
                        <div class="video-frame">
                            <video
                                ref={self.video_ref.clone()}
                                autoplay=true
                                muted=true
                                playsinline=true
                                style={if streaming { "" } else { "display: none;" }}
                            />
                            {
                                if !streaming {
                                    html! { <p class="feed-idle">{"Camera is off"}</p> }
                                } else {
                                    html! {}
                                }
                            }
                        </div>
                        {
                            if let Some(error) = &self.live.error {
                                html! { <p class="error-message">{ error }</p> }
                            } else {
                                html! {}
                            }
                        }
                        <p class="feed-stats">
                            { format!("Frames sent: {} • Failed: {}", self.live.frames_sent, self.live.frames_failed) }
                        </p>
                    </div>
                    <div class="glass-dark panel">
                        <h3>{"Detections"}</h3>
                        { self.render_detections() }
                    </div>
                </div>
            </section>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.release();
    }
}

impl LiveCamera {
    /// Stops the timer and every camera track.
    fn release(&mut self) {
        self.interval = None;
        if let Some(stream) = self.stream.take() {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
            video.set_src_object(None);
        }
        self.live.stop();
    }

    fn render_detections(&self) -> Html {
        if !self.live.streaming {
            return html! { <p class="no-results-message">{"Start the stream to see detections"}</p> };
        }
        if self.live.detections.is_empty() {
            return html! { <p class="no-results-message">{"Waiting for detections..."}</p> };
        }
        let rows = result_rows(&self.live.detections);
        html! {
            <div class="result-bars">
                { for rows.iter().enumerate().map(|(i, row)| render_row(i, row)) }
                {
                    if let Some(map) = self.live.overall_map {
                        html! { <p class="overall-map">{ format!("mAP: {:.3}", map) }</p> }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }
}

async fn request_camera() -> Result<MediaStream, String> {
    let window = web_sys::window().ok_or("no window available")?;
    let devices = window.navigator().media_devices().map_err(js_error)?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(js_error)?;
    let stream = JsFuture::from(promise).await.map_err(js_error)?;
    stream.dyn_into::<MediaStream>().map_err(js_error)
}

/// Draws the current video frame to an offscreen canvas and encodes it as a
/// JPEG data URL. `None` until the video has dimensions.
fn capture_frame(video: &HtmlVideoElement) -> Option<String> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return None;
    }
    let document = web_sys::window()?.document()?;
    let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let context: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
    context
        .draw_image_with_html_video_element(video, 0.0, 0.0)
        .ok()?;
    canvas.to_data_url_with_type("image/jpeg").ok()
}
