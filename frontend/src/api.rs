use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use shared::{FrameRequest, PredictionResponse};
use wasm_bindgen::JsValue;
use web_sys::FormData;

const PREDICT_URL: &str = "/api/predict";
const PREDICT_FRAME_URL: &str = "/api/predict-frame";

pub fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Sends one image as the multipart `image` field.
pub async fn submit_image(file: &GlooFile) -> Result<PredictionResponse, String> {
    let form_data = FormData::new().map_err(js_error)?;
    form_data
        .append_with_blob_and_filename("image", file.as_ref(), &file.name())
        .map_err(js_error)?;

    let response = Request::post(PREDICT_URL)
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_predictions(response).await
}

/// Sends one captured camera frame as a data URL.
pub async fn submit_frame(image: String) -> Result<PredictionResponse, String> {
    let response = Request::post(PREDICT_FRAME_URL)
        .json(&FrameRequest { image })
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_predictions(response).await
}

async fn read_predictions(response: Response) -> Result<PredictionResponse, String> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Server error: {} - {}", status, body));
    }
    response
        .json::<PredictionResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
