use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::response::Html;

use crate::helpers::{file_data_uri, preview_data_uri};
use crate::http::error::HttpError;
use crate::http::page::{self, PredictionView};
use crate::http::state::HttpState;
use crate::registry::ModelKind;

pub async fn home(State(st): State<HttpState>) -> Html<String> {
    let banner = file_data_uri(&st.static_dir.join("img").join("banner.jpg"));
    Html(page::home(&banner))
}

pub async fn index() -> Html<String> {
    Html(page::predict(None))
}

pub async fn predict(
    State(st): State<HttpState>,
    mut multipart: Multipart,
) -> Result<Html<String>, HttpError> {
    let mut file: Option<Bytes> = None;
    let mut selected_model = ModelKind::default().as_str().to_string();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => file = Some(field.bytes().await?),
            "selected_model" => selected_model = field.text().await?,
            _ => {}
        }
    }
    // browsers submit an empty part when no file was chosen
    let image_bytes = file.filter(|b| !b.is_empty()).ok_or(HttpError::MissingFile)?;

    let classifier = st.classifier.clone();
    let view = tokio::task::spawn_blocking(move || -> Result<PredictionView, HttpError> {
        let prediction = classifier.predict(&image_bytes, &selected_model)?;
        let image = preview_data_uri(&image_bytes).map_err(HttpError::Preview)?;
        let used_model = selected_model.parse::<ModelKind>()?;
        Ok(PredictionView::new(&prediction, image, used_model))
    })
    .await??;

    Ok(Html(page::predict(Some(&view))))
}
