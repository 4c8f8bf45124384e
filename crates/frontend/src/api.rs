use reqwest::header::ACCEPT;
use satfinder_shared::models::{SearchRequest, SEARCH_PATH};
use satfinder_shared::response::HttpReply;

/// Build an absolute endpoint URL on the page's own origin.
pub fn build_api_url(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}

fn api_url(path: &str) -> Result<String, String> {
    let origin = web_sys::window()
        .ok_or("no window")?
        .location()
        .origin()
        .map_err(|_| "page origin unavailable".to_string())?;
    Ok(build_api_url(&origin, path))
}

/// `POST /search`. Any HTTP status is a reply; only transport failures are errors.
pub async fn search(request: &SearchRequest) -> Result<HttpReply, String> {
    let resp = reqwest::Client::new()
        .post(api_url(SEARCH_PATH)?)
        .header(ACCEPT, "application/json")
        .json(request)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| e.to_string())?;

    Ok(HttpReply {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}
