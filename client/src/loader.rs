use regionmap_shared::{AssetLoader, CancelToken, LoadError};

/// Fetches the region image with `gloo-net`, aborting the request through an
/// `AbortController` when the token fires.
pub(crate) struct FetchLoader;

fn transport_error(token: &CancelToken, detail: String) -> LoadError {
    if token.is_cancelled() {
        LoadError::Cancelled
    } else {
        LoadError::Transport(detail)
    }
}

impl AssetLoader for FetchLoader {
    async fn load(&self, source: &str, token: &CancelToken) -> Result<String, LoadError> {
        token.check()?;

        let controller = web_sys::AbortController::new()
            .map_err(|e| LoadError::Transport(format!("abort controller: {e:?}")))?;
        let signal = controller.signal();
        token.on_cancel(move || controller.abort());

        let resp = gloo_net::http::Request::get(source)
            .abort_signal(Some(&signal))
            .send()
            .await
            .map_err(|e| transport_error(token, format!("fetch error: {e}")))?;
        if !resp.ok() {
            return Err(LoadError::Status(resp.status()));
        }
        let text = resp.text().await.map_err(|e| {
            if token.is_cancelled() {
                LoadError::Cancelled
            } else {
                LoadError::Body(e.to_string())
            }
        })?;

        token.check()?;
        Ok(text)
    }
}
