// src/htmx_handlers.rs

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Form,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use strum::IntoEnumIterator;

use crate::{
    errors::AppError,
    models::{Color, FormField, FormState, ImageFile, Size},
    notifications::Notification,
    response::build_response,
    state::AppState,
    submitter::{SubmissionOutcome, submit_current_form},
};

const FORM_BASE_PATH: &str = "/htmx/admin/product-form";
// Żądania pól czekają w kolejce formularza, więc submit wychodzi po nich
const FIELD_SYNC: &str = "closest form:queue all";

fn field_url(field: FormField) -> String {
    format!("{}/fields/{}", FORM_BASE_PATH, field)
}

fn size_url(size: Size) -> String {
    format!("{}/sizes/{}", FORM_BASE_PATH, size)
}

fn image_url(color: Color) -> String {
    format!(
        "{}/images/{}",
        FORM_BASE_PATH,
        urlencoding::encode(&color.to_string())
    )
}

fn image_input_name(color: Color) -> String {
    format!("image-{}", color.slug())
}

// --- Renderowanie ---

fn render_text_input(
    form: &FormState,
    field: FormField,
    placeholder: &str,
    input_type: &str,
    required: bool,
) -> Markup {
    html! {
        input name=(field.input_name()) value=(form.text_value(field)) placeholder=(placeholder) type=(input_type)
              required[required]
              "hx-post"=(field_url(field)) "hx-trigger"="change" "hx-params"=(field.input_name()) "hx-swap"="none"
              "hx-sync"=(FIELD_SYNC)
              class="p-2 border rounded";
    }
}

fn render_textarea(form: &FormState, field: FormField, placeholder: &str, rows: u8) -> Markup {
    html! {
        textarea name=(field.input_name()) placeholder=(placeholder) rows=(rows) required
                 "hx-post"=(field_url(field)) "hx-trigger"="change" "hx-params"=(field.input_name()) "hx-swap"="none"
                 "hx-sync"=(FIELD_SYNC)
                 class="w-full border p-2 rounded" {
            (form.text_value(field))
        }
    }
}

/// Renderuje grupę checkboxów rozmiarów (podmieniana po każdym przełączeniu).
pub fn render_size_options(selected: &BTreeSet<Size>) -> Markup {
    html! {
        div #size-options ."flex gap-2 flex-wrap" {
            @for size in Size::iter() {
                label ."inline-flex items-center" {
                    input type="checkbox" checked[selected.contains(&size)]
                          "hx-post"=(size_url(size)) "hx-trigger"="change" "hx-params"="none"
                          "hx-target"="#size-options" "hx-swap"="outerHTML"
                          "hx-sync"=(FIELD_SYNC)
                          class="mr-1";
                    (size.to_string())
                }
            }
        }
    }
}

/// Renderuje pole wyboru zdjęcia dla jednego koloru.
pub fn render_color_slot(color: Color, selected: Option<&ImageFile>) -> Markup {
    let slot_id = format!("image-slot-{}", color.slug());
    html! {
        div id=(slot_id) {
            label ."block text-sm font-medium" { (color.to_string()) }
            input type="file" accept="image/*" name=(image_input_name(color))
                  "hx-post"=(image_url(color)) "hx-trigger"="change"
                  "hx-encoding"="multipart/form-data" "hx-params"=(image_input_name(color))
                  "hx-target"=(format!("#{}", slot_id)) "hx-swap"="outerHTML"
                  "hx-sync"=(FIELD_SYNC)
                  class="mt-1 block w-full border p-1";
            @if let Some(file) = selected {
                p ."text-xs text-gray-600 mt-1" { "Selected: " (file.file_name) }
            }
        }
    }
}

fn render_image_slots(images: &BTreeMap<Color, ImageFile>) -> Markup {
    html! {
        div ."grid grid-cols-2 gap-4" {
            @for color in Color::iter() {
                (render_color_slot(color, images.get(&color)))
            }
        }
    }
}

/// Renderuje cały formularz dodawania produktu na podstawie bieżącego stanu.
pub fn render_product_form(form: &FormState, busy: bool) -> Markup {
    html! {
        div #product-form-container ."max-w-4xl mx-auto p-6 bg-white rounded-lg shadow-md" {
            h2 ."text-2xl font-bold mb-6" { "Add Product" }
            form #product-form ."space-y-6"
                 "hx-post"=(format!("{}/submit", FORM_BASE_PATH))
                 "hx-params"="none"
                 "hx-target"="#product-form-container" "hx-swap"="outerHTML"
                 "hx-disabled-elt"="find button[type='submit']"
                 "hx-sync"="this:queue all" {
                div ."grid grid-cols-1 md:grid-cols-2 gap-4" {
                    (render_text_input(form, FormField::Name, "Product Name", "text", true))
                    (render_text_input(form, FormField::Price, "Price", "number", true))
                    (render_text_input(form, FormField::Category, "Category", "text", true))
                    (render_text_input(form, FormField::Subcategory, "Subcategory", "text", false))
                    (render_text_input(form, FormField::Stock, "Stock", "number", true))
                }

                div {
                    label ."block font-medium" { "Sizes" }
                    (render_size_options(&form.sizes))
                }

                (render_textarea(form, FormField::Details, "Details", 2))
                (render_textarea(form, FormField::Description, "Description", 3))

                div ."flex items-center" {
                    input type="checkbox" name=(FormField::Bestseller.input_name()) value="on" checked[form.bestseller]
                          "hx-post"=(field_url(FormField::Bestseller)) "hx-trigger"="change"
                          "hx-params"=(FormField::Bestseller.input_name()) "hx-swap"="none"
                          "hx-sync"=(FIELD_SYNC)
                          class="mr-2";
                    label { "Bestseller" }
                }

                div {
                    h3 ."font-medium mb-2" { "Upload One Image per Color" }
                    (render_image_slots(&form.images))
                }

                button type="submit" disabled[busy]
                       class="bg-blue-600 text-white py-2 px-6 rounded disabled:opacity-50" {
                    @if busy { "Adding..." } @else { "Add Product" }
                }
            }
        }
    }
}

// --- Handlery ---

// GET / oraz GET /htmx/admin/product-form
pub async fn product_form_page_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let form = app_state.form.lock().await.clone();
    let page = render_product_form(&form, app_state.submission_gate.is_busy());
    build_response(&headers, &app_state.static_dir, page).await
}

// POST /htmx/admin/product-form/fields/{field}
pub async fn update_field_htmx_handler(
    State(app_state): State<Arc<AppState>>,
    Path(field_name): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Result<StatusCode, AppError> {
    let field = FormField::from_str(&field_name).map_err(|_| {
        tracing::warn!("Nieznane pole formularza: {}", field_name);
        AppError::BadRequest(format!("Nieznane pole formularza: {}", field_name))
    })?;

    // Odznaczony checkbox nie jest wysyłany wcale, stąd pusta wartość domyślna
    let value = params
        .get(field.input_name())
        .map(String::as_str)
        .unwrap_or_default();

    let mut form = app_state.form.lock().await;
    *form = std::mem::take(&mut *form).with_field(field, value);
    tracing::debug!("Zaktualizowano pole formularza: {}", field);

    Ok(StatusCode::NO_CONTENT)
}

// POST /htmx/admin/product-form/sizes/{size}
pub async fn toggle_size_htmx_handler(
    State(app_state): State<Arc<AppState>>,
    Path(size_str): Path<String>,
) -> Result<Markup, AppError> {
    let size = Size::from_str(&size_str)
        .map_err(|_| AppError::BadRequest(format!("Nieznany rozmiar: {}", size_str)))?;

    let mut form = app_state.form.lock().await;
    *form = std::mem::take(&mut *form).with_size_toggled(size);
    tracing::debug!("Przełączono rozmiar {}, wybrane: {:?}", size, form.sizes);

    Ok(render_size_options(&form.sizes))
}

// POST /htmx/admin/product-form/images/{color}
pub async fn upload_image_htmx_handler(
    State(app_state): State<Arc<AppState>>,
    Path(color_str): Path<String>,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let color = Color::from_str(&color_str)
        .map_err(|_| AppError::BadRequest(format!("Nieznany kolor: {}", color_str)))?;

    let expected_name = image_input_name(color);
    let mut selected: Option<ImageFile> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(expected_name.as_str()) {
            tracing::warn!(
                "Pominięto pole multipart {:?}, oczekiwano '{}'",
                field.name().unwrap_or_default(),
                expected_name
            );
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let bytes = field.bytes().await?;
        tracing::info!(
            "Odebrano plik dla koloru {}: '{}', rozmiar: {} bajtów",
            color,
            file_name,
            bytes.len()
        );
        selected = Some(ImageFile::new(file_name, content_type.as_deref(), bytes));
        break;
    }

    let Some(file) = selected else {
        return Err(AppError::UnprocessableEntity(format!(
            "Brak pliku obrazu dla koloru {}",
            color
        )));
    };

    if file.is_unselected() {
        tracing::info!("Wyczyszczono wybór zdjęcia dla koloru {}", color);
    }

    let mut form = app_state.form.lock().await;
    *form = std::mem::take(&mut *form).with_image(color, Some(file));

    Ok(render_color_slot(color, form.images.get(&color)))
}

// POST /htmx/admin/product-form/submit
pub async fn submit_product_form_htmx_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    tracing::info!("Obsłużono zapytanie POST {}/submit", FORM_BASE_PATH);

    let notification = match submit_current_form(&app_state).await {
        SubmissionOutcome::Busy => return Ok(StatusCode::NO_CONTENT.into_response()),
        SubmissionOutcome::Submitted => Notification::product_added(),
        SubmissionOutcome::Failed => Notification::product_failed(),
    };

    let form = app_state.form.lock().await.clone();
    let page = render_product_form(&form, app_state.submission_gate.is_busy());
    Ok((notification.into_headers(), page).into_response())
}
