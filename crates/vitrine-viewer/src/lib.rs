//! Vitrine Viewer - interactive 3D scene viewer
//!
//! One object on a floor under a point light, edited live from a control
//! panel. Runs in the browser (wasm) or as a native window.

pub mod app;

pub use app::run;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build()
    );

    // A ?config=<url> parameter points at a JSON configuration
    match config_url_parameter() {
        Some(url) => wasm_bindgen_futures::spawn_local(async move {
            let config = match fetch_config(&url).await {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Using default configuration, {} failed: {}", url, e);
                    vitrine_core::ViewerConfig::default()
                }
            };
            app::run(config);
        }),
        None => app::run(vitrine_core::ViewerConfig::default()),
    }
}

#[cfg(target_arch = "wasm32")]
fn config_url_parameter() -> Option<String> {
    let href = web_sys::window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    url.search_params().get("config")
}

#[cfg(target_arch = "wasm32")]
async fn fetch_config(url: &str) -> Result<vitrine_core::ViewerConfig, String> {
    use wasm_bindgen::JsCast;

    let window = web_sys::window().ok_or("No window")?;

    let resp = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: web_sys::Response = resp.dyn_into().map_err(|_| "Response cast failed")?;

    if !resp.ok() {
        return Err(format!("HTTP {}: {}", resp.status(), resp.status_text()));
    }

    let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(|_| "Failed to get text")?)
        .await
        .map_err(|e| format!("Text read failed: {:?}", e))?;

    let json = text.as_string().ok_or("Response is not text")?;
    vitrine_core::ViewerConfig::from_json(&json).map_err(|e| e.to_string())
}
