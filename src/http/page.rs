//! Server-rendered HTML pages.

use axum::http::StatusCode;

use crate::mapping::capitalize;
use crate::registry::ModelKind;
use crate::service::Prediction;

const SITE_TITLE: &str = "Image Processing Suite";
const PREDICT_TITLE: &str = "Image Classification";

/// A finished classification, ready to render.
#[derive(Debug, Clone)]
pub struct PredictionView {
    pub prediction: String,
    pub image: String,
    pub used_model: ModelKind,
}

impl PredictionView {
    pub fn new(prediction: &Prediction, image: String, used_model: ModelKind) -> Self {
        Self {
            prediction: format_prediction(prediction),
            image,
            used_model,
        }
    }
}

/// "An airplane (Confidence: 97.32%)"
pub fn format_prediction(prediction: &Prediction) -> String {
    format!(
        "{} (Confidence: {:.2}%)",
        capitalize(prediction.label),
        prediction.confidence * 100.0
    )
}

pub fn home(banner: &str) -> String {
    let banner = if banner.is_empty() {
        String::new()
    } else {
        format!(r#"<img class="banner" src="{}" alt="">"#, escape(banner))
    };
    layout(
        SITE_TITLE,
        &format!(
            r#"{banner}
<h1>{SITE_TITLE}</h1>
<ul class="tools">
  <li><a href="/predict/">Image Classification</a> &ndash; classify a photo with one of three pretrained models</li>
</ul>"#
        ),
    )
}

pub fn predict(result: Option<&PredictionView>) -> String {
    let selected = result.map(|r| r.used_model).unwrap_or_default();
    let options: String = ModelKind::ALL
        .iter()
        .map(|kind| {
            let checked = if *kind == selected { " checked" } else { "" };
            format!(
                r#"
    <label class="model-badge"><input type="radio" name="selected_model" value="{value}"{checked}> {name}</label>"#,
                value = kind.as_str(),
                name = kind.display_name(),
            )
        })
        .collect();

    let result_html = match result {
        Some(view) => format!(
            r#"
<section class="result">
  <img id="result-image" src="{image}" alt="uploaded image">
  <p class="prediction">{prediction}</p>
  <p class="used-model">Model: {model}</p>
</section>"#,
            image = escape(&view.image),
            prediction = escape(&view.prediction),
            model = view.used_model.as_str(),
        ),
        None => String::new(),
    };

    layout(
        PREDICT_TITLE,
        &format!(
            r#"<h1>{PREDICT_TITLE}</h1>
<form method="post" action="/predict/" enctype="multipart/form-data">
  <div id="upload-area">
    <input type="file" id="file" name="file" accept="image/*" required>
    <p id="upload-text">Drop an image here or choose a file</p>
    <div id="image-preview-container" class="d-none">
      <img id="image-preview" alt="selected image">
      <button type="button" id="remove-image">Remove</button>
    </div>
  </div>
  <fieldset class="models">{options}
  </fieldset>
  <button type="submit" id="classify-btn">Classify</button>
</form>{result_html}
<script src="/predict/static/js/script.js"></script>"#
        ),
    )
}

pub fn error(status: StatusCode, message: &str) -> String {
    layout(
        PREDICT_TITLE,
        &format!(
            r#"<h1>{code} {reason}</h1>
<p class="error">{message}</p>
<p><a href="/predict/">Try again</a></p>"#,
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("Error"),
            message = escape(message),
        ),
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Prediction { label: "an airplane", confidence: 0.973_24 }, "An airplane (Confidence: 97.32%)")]
    #[case(Prediction { label: "a cat", confidence: 1.0 }, "A cat (Confidence: 100.00%)")]
    #[case(Prediction { label: "a truck", confidence: 0.0 }, "A truck (Confidence: 0.00%)")]
    fn formats_prediction(#[case] prediction: Prediction, #[case] expected: &str) {
        assert_eq!(format_prediction(&prediction), expected);
    }

    #[rstest]
    fn form_preselects_resnet18() {
        let html = predict(None);
        assert!(html.contains(r#"value="resnet18" checked"#));
        assert!(!html.contains(r#"class="result""#));
    }

    #[rstest]
    fn form_has_client_side_preview_hooks() {
        let html = predict(None);
        for id in [
            "upload-text",
            "image-preview-container",
            "image-preview",
            "remove-image",
            "classify-btn",
        ] {
            assert!(html.contains(&format!(r#"id="{id}""#)), "missing #{id}");
        }
        assert!(html.contains(r#"id="image-preview-container" class="d-none""#));
        assert!(html.contains(r#"<script src="/predict/static/js/script.js"></script>"#));
    }

    #[rstest]
    fn result_page_keeps_used_model_selected() {
        let view = PredictionView::new(
            &Prediction { label: "a ship", confidence: 0.5 },
            "data:image/png;base64,AAAA".into(),
            ModelKind::MobilenetV2,
        );
        let html = predict(Some(&view));
        assert!(html.contains("A ship (Confidence: 50.00%)"));
        assert!(html.contains(r#"src="data:image/png;base64,AAAA""#));
        assert!(html.contains(r#"value="mobilenet_v2" checked"#));
    }

    #[rstest]
    fn error_page_escapes_message() {
        let html = error(StatusCode::BAD_REQUEST, "Invalid model name: <script>");
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("Invalid model name: &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[rstest]
    fn home_omits_missing_banner() {
        assert!(!home("").contains("banner"));
        assert!(home("data:image/jpeg;base64,AA").contains(r#"class="banner""#));
    }
}
