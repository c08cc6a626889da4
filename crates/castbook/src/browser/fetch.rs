//! Dataset fetch over `window.fetch`.

use castbook_core::Dataset;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

async fn body_text(response: JsValue, url: &str) -> Result<String, JsValue> {
    let response: Response = response.dyn_into()?;
    if !response.ok() {
        return Err(js_sys::Error::new(&format!("{url}: HTTP {}", response.status())).into());
    }
    JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| js_sys::Error::new(&format!("{url}: body is not text")).into())
}

/// Fetch both documents and build a snapshot.
///
/// Both requests are in flight before either is awaited; the snapshot is
/// only built once both bodies have arrived.
pub async fn fetch_dataset(actors_url: &str, movies_url: &str) -> Result<Dataset, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let actors = JsFuture::from(window.fetch_with_str(actors_url));
    let movies = JsFuture::from(window.fetch_with_str(movies_url));

    let actors = body_text(actors.await?, actors_url).await?;
    let movies = body_text(movies.await?, movies_url).await?;

    Dataset::from_json(&actors, &movies).map_err(|e| js_sys::Error::new(&e.to_string()).into())
}
