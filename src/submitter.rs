// src/submitter.rs

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::{Client, multipart};

use crate::errors::SubmissionError;
use crate::models::{Color, FormState, ImageFile};
use crate::state::{AppState, BackendConfig};

pub const ADD_PRODUCT_PATH: &str = "/api/product/add";

/// Dane produktu w kolejności, w jakiej trafiają do żądania multipart.
///
/// Lista kolorów i części `images` pochodzą z tej samej listy `images`,
/// więc ich kolejność i długość są zawsze zgodne.
#[derive(Debug, Clone)]
pub struct ProductPayload {
    pub text_fields: Vec<(&'static str, String)>,
    pub images: Vec<(Color, ImageFile)>,
}

impl ProductPayload {
    pub fn from_form(form: &FormState) -> Self {
        let text_fields = vec![
            ("name", form.name.clone()),
            ("price", form.price.clone()),
            ("category", form.category.clone()),
            ("subcategory", form.subcategory.clone()),
            ("stock", form.stock.clone()),
            ("bestseller", form.bestseller.to_string()),
            ("description", form.description.clone()),
            ("details", form.details.clone()),
            ("size", form.joined_sizes()),
        ];

        let images = form
            .images
            .iter()
            .map(|(color, file)| (*color, file.clone()))
            .collect();

        ProductPayload {
            text_fields,
            images,
        }
    }

    pub fn colors(&self) -> Vec<String> {
        self.images
            .iter()
            .map(|(color, _)| color.to_string())
            .collect()
    }

    pub fn colors_json(&self) -> Result<String, SubmissionError> {
        serde_json::to_string(&self.colors())
            .map_err(|e| SubmissionError::Payload(format!("serializacja listy kolorów: {}", e)))
    }

    pub fn into_multipart(self) -> Result<multipart::Form, SubmissionError> {
        let colors_json = self.colors_json()?;

        let mut form = multipart::Form::new();
        for (name, value) in self.text_fields {
            form = form.text(name, value);
        }
        form = form.text("colors", colors_json);

        for (color, image) in self.images {
            let part = multipart::Part::bytes(image.bytes.to_vec())
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(|e| {
                    tracing::error!(
                        "Błąd ustawiania typu MIME '{}' dla koloru {}: {}",
                        image.content_type,
                        color,
                        e
                    );
                    SubmissionError::Payload(format!("nieprawidłowy typ pliku dla koloru {}", color))
                })?;
            form = form.part("images", part);
        }

        Ok(form)
    }
}

/// Flaga "w trakcie wysyłki". Nie kolejkuje, tylko blokuje ponowne wysłanie.
#[derive(Debug, Default)]
pub struct SubmissionGate {
    busy: AtomicBool,
}

impl SubmissionGate {
    pub fn try_acquire(&self) -> Option<SubmissionTicket<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionTicket { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Zwalnia flagę przy zniszczeniu, niezależnie od wyniku wysyłki.
#[derive(Debug)]
pub struct SubmissionTicket<'a> {
    gate: &'a SubmissionGate,
}

impl Drop for SubmissionTicket<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Busy,
    Submitted,
    Failed,
}

pub async fn submit_product(
    client: &Client,
    backend: &BackendConfig,
    form: &FormState,
) -> Result<(), SubmissionError> {
    let payload = ProductPayload::from_form(form);
    tracing::debug!(
        "Przygotowano produkt '{}': kolory={:?}, liczba obrazów={}",
        form.name,
        payload.colors(),
        payload.images.len()
    );
    let multipart_form = payload.into_multipart()?;

    let url = backend.add_product_url();
    let resp = client
        .post(&url)
        .bearer_auth(&backend.token)
        .multipart(multipart_form)
        .send()
        .await?;

    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Brak treści błędu".to_string());
        Err(SubmissionError::Rejected { status, body })
    }
}

/// Wysyła bieżący stan formularza.
///
/// Przed zrobieniem snapshotu czeka, aż zakończą się rozpoczęte aktualizacje
/// formularza, i trzyma `update_order` aż do resetu, więc późna aktualizacja
/// nie trafi do wyczyszczonego formularza poprzedniego produktu.
/// Po sukcesie stan wraca do wartości domyślnych, po błędzie zostaje bez zmian.
pub async fn submit_current_form(app_state: &AppState) -> SubmissionOutcome {
    let Some(_ticket) = app_state.submission_gate.try_acquire() else {
        tracing::warn!("Wysyłka produktu już trwa, ignoruję ponowne żądanie");
        return SubmissionOutcome::Busy;
    };

    let _update_order = app_state.update_order.write().await;
    let snapshot = app_state.form.lock().await.clone();

    match submit_product(&app_state.http_client, &app_state.backend, &snapshot).await {
        Ok(()) => {
            tracing::info!("Produkt '{}' dodany pomyślnie", snapshot.name);
            *app_state.form.lock().await = FormState::default();
            SubmissionOutcome::Submitted
        }
        Err(e) => {
            tracing::error!("Błąd wysyłania formularza produktu: {}", e);
            SubmissionOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormField, Size};
    use axum::body::Bytes;

    fn filled_form() -> FormState {
        FormState::default()
            .with_field(FormField::Name, "Kolczyki")
            .with_field(FormField::Price, "89.90")
            .with_field(FormField::Category, "Biżuteria")
            .with_field(FormField::Stock, "12")
            .with_field(FormField::Bestseller, "on")
            .with_size_toggled(Size::L)
            .with_size_toggled(Size::S)
            .with_image(
                Color::Black,
                Some(ImageFile::new("black.jpg", Some("image/jpeg"), Bytes::from_static(b"B"))),
            )
            .with_image(
                Color::Gold,
                Some(ImageFile::new("gold.jpg", Some("image/jpeg"), Bytes::from_static(b"G"))),
            )
    }

    #[test]
    fn payload_flattens_scalar_fields_in_wire_order() {
        let payload = ProductPayload::from_form(&filled_form());
        let names: Vec<&str> = payload.text_fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "price",
                "category",
                "subcategory",
                "stock",
                "bestseller",
                "description",
                "details",
                "size"
            ]
        );

        let value = |key: &str| {
            payload
                .text_fields
                .iter()
                .find(|(n, _)| *n == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(value("bestseller"), Some("true"));
        assert_eq!(value("size"), Some("S, L"));
        assert_eq!(value("subcategory"), Some(""));
    }

    #[test]
    fn color_list_matches_image_order_and_count() {
        let payload = ProductPayload::from_form(&filled_form());
        assert_eq!(payload.colors(), vec!["gold", "black"]);
        assert_eq!(payload.colors().len(), payload.images.len());
        assert_eq!(payload.images[0].1.file_name, "gold.jpg");
        assert_eq!(payload.images[1].1.file_name, "black.jpg");
        assert_eq!(payload.colors_json().unwrap(), r#"["gold","black"]"#);
    }

    #[test]
    fn empty_form_sends_empty_color_list() {
        let payload = ProductPayload::from_form(&FormState::default());
        assert!(payload.images.is_empty());
        assert_eq!(payload.colors_json().unwrap(), "[]");
        assert!(payload.into_multipart().is_ok());
    }

    #[test]
    fn invalid_mime_type_is_a_payload_error() {
        let form = FormState::default().with_image(
            Color::Silver,
            Some(ImageFile::new("x", Some("not a mime"), Bytes::from_static(b"x"))),
        );
        let result = ProductPayload::from_form(&form).into_multipart();
        assert!(matches!(result, Err(SubmissionError::Payload(_))));
    }

    #[test]
    fn gate_admits_one_holder_and_releases_on_drop() {
        let gate = SubmissionGate::default();
        let ticket = gate.try_acquire();
        assert!(ticket.is_some());
        assert!(gate.is_busy());
        assert!(gate.try_acquire().is_none());

        drop(ticket);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }
}
