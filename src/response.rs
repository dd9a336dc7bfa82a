use std::path::Path;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::{self, Header, HeaderMapExt};
use lol_html::{HtmlRewriter, Settings, element};
use maud::Markup;
use once_cell::sync::Lazy;
use tokio::fs;

use crate::errors::AppError;

const SHELL_FILE: &str = "index.html";

static HX_REQUEST: Lazy<HeaderName> = Lazy::new(|| HeaderName::from_static("hx-request"));

/// Nagłówek `HX-Request: true`, który htmx dokleja do każdego swojego żądania.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl Header for HxRequest {
    fn name() -> &'static HeaderName {
        &HX_REQUEST
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let text = value.to_str().map_err(|_| headers::Error::invalid())?;
        Ok(HxRequest(text.trim().eq_ignore_ascii_case("true")))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        let value = if self.0 {
            HeaderValue::from_static("true")
        } else {
            HeaderValue::from_static("false")
        };
        values.extend(std::iter::once(value));
    }
}

/// Wczytuje szablon strony i wstawia treść w miejsce `#content`.
/// Usuwa atrybuty HTMX inicjujące ładowanie, żeby htmx nie nadpisał treści
/// wyrenderowanej po stronie serwera.
async fn serve_full_page(static_dir: &Path, content_markup: Markup) -> Result<Response, AppError> {
    let shell_path = static_dir.join(SHELL_FILE);
    let shell_content = match fs::read(&shell_path).await {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            tracing::error!(
                "Nie można wczytać pliku szablonu {}: {}",
                shell_path.display(),
                e
            );
            return Err(AppError::InternalServerError(
                "Błąd wczytywania szablonu strony".to_string(),
            ));
        }
    };

    let content_string = content_markup.into_string();
    let mut response_body = Vec::new();

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("#content", |el| {
                el.set_inner_content(&content_string, lol_html::html_content::ContentType::Html);
                el.remove_attribute("hx-trigger");
                el.remove_attribute("hx-get");
                Ok(())
            })],
            ..Settings::default()
        },
        |c: &[u8]| response_body.extend_from_slice(c),
    );

    if let Err(e) = rewriter.write(&shell_content) {
        tracing::error!("Błąd przetwarzania szablonu HTML: {}", e);
        return Err(AppError::InternalServerError(
            "Błąd budowania strony".to_string(),
        ));
    }
    if let Err(e) = rewriter.end() {
        tracing::error!("Błąd kończenia przetwarzania szablonu HTML: {}", e);
        return Err(AppError::InternalServerError(
            "Błąd budowania strony".to_string(),
        ));
    }

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(response_body))
        .map_err(|e| AppError::InternalServerError(format!("Błąd budowania odpowiedzi: {}", e)))
}

/// Dla żądań htmx zwraca sam fragment, dla pełnego odświeżenia całą stronę.
pub async fn build_response(
    headers: &HeaderMap,
    static_dir: &Path,
    page_content: Markup,
) -> Result<Response, AppError> {
    match headers.typed_get::<HxRequest>() {
        Some(HxRequest(true)) => Ok(page_content.into_response()),
        _ => serve_full_page(static_dir, page_content).await,
    }
}
