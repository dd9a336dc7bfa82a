// src/models.rs

use std::collections::{BTreeMap, BTreeSet};

use axum::body::Bytes;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Rozmiary dostępne w formularzu. Kolejność wariantów to kolejność wyświetlania.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Display, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
}

/// Kolory, dla których operator może wybrać jedno zdjęcie.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Display, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Color {
    #[strum(serialize = "gold")]
    Gold,
    #[strum(serialize = "silver")]
    Silver,
    #[strum(serialize = "rose gold")]
    RoseGold,
    #[strum(serialize = "black")]
    Black,
}

impl Color {
    /// Wersja nazwy bezpieczna dla atrybutów `id` i `name` w HTML.
    pub fn slug(&self) -> String {
        self.to_string().replace(' ', "-")
    }
}

/// Pola skalarne formularza, aktualizowane pojedynczo po nazwie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FormField {
    Name,
    Price,
    Category,
    Subcategory,
    Stock,
    Description,
    Details,
    Bestseller,
}

impl FormField {
    /// Nazwa atrybutu `name` w formularzu i klucz parametru w żądaniu.
    pub fn input_name(&self) -> &str {
        self.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Bytes) -> Self {
        ImageFile {
            file_name: file_name.into(),
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string(),
            bytes,
        }
    }

    /// Przeglądarka bez wybranego pliku wysyła część z pustą nazwą pliku.
    pub fn is_unselected(&self) -> bool {
        self.file_name.is_empty()
    }
}

/// Stan formularza dodawania produktu.
///
/// Każda operacja konsumuje poprzedni snapshot i zwraca nowy, więc posiadacz
/// stanu zawsze podmienia całą wartość zamiast modyfikować ją w miejscu.
/// Klucz w `images` istnieje wtedy i tylko wtedy, gdy dla koloru wybrano plik.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub price: String,
    pub category: String,
    pub subcategory: String,
    pub stock: String,
    pub sizes: BTreeSet<Size>,
    pub bestseller: bool,
    pub description: String,
    pub details: String,
    pub images: BTreeMap<Color, ImageFile>,
}

impl FormState {
    #[must_use]
    pub fn with_field(self, field: FormField, value: &str) -> Self {
        let value_owned = value.to_string();
        match field {
            FormField::Name => FormState {
                name: value_owned,
                ..self
            },
            FormField::Price => FormState {
                price: value_owned,
                ..self
            },
            FormField::Category => FormState {
                category: value_owned,
                ..self
            },
            FormField::Subcategory => FormState {
                subcategory: value_owned,
                ..self
            },
            FormField::Stock => FormState {
                stock: value_owned,
                ..self
            },
            FormField::Description => FormState {
                description: value_owned,
                ..self
            },
            FormField::Details => FormState {
                details: value_owned,
                ..self
            },
            FormField::Bestseller => FormState {
                bestseller: is_checkbox_checked(value),
                ..self
            },
        }
    }

    #[must_use]
    pub fn with_size_toggled(self, size: Size) -> Self {
        let mut next = self;
        if !next.sizes.remove(&size) {
            next.sizes.insert(size);
        }
        next
    }

    /// Ustawia lub podmienia plik dla koloru. Brak wybranego pliku (lub `None`) usuwa wpis.
    #[must_use]
    pub fn with_image(self, color: Color, file: Option<ImageFile>) -> Self {
        let mut next = self;
        match file {
            Some(file) if !file.is_unselected() => {
                next.images.insert(color, file);
            }
            _ => {
                next.images.remove(&color);
            }
        }
        next
    }

    /// Wartość tekstowa pola, używana przy renderowaniu formularza.
    pub fn text_value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Price => &self.price,
            FormField::Category => &self.category,
            FormField::Subcategory => &self.subcategory,
            FormField::Stock => &self.stock,
            FormField::Description => &self.description,
            FormField::Details => &self.details,
            FormField::Bestseller => {
                if self.bestseller {
                    "true"
                } else {
                    "false"
                }
            }
        }
    }

    pub fn joined_sizes(&self) -> String {
        self.sizes
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    }
}

// Checkbox z przeglądarki wysyła "on", htmx czasem "true"
fn is_checkbox_checked(value: &str) -> bool {
    value.eq_ignore_ascii_case("on") || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn image(name: &str, bytes: &'static [u8]) -> ImageFile {
        ImageFile::new(name, Some("image/png"), Bytes::from_static(bytes))
    }

    #[test]
    fn toggling_size_twice_restores_original_set() {
        let start = FormState::default().with_size_toggled(Size::L);
        let toggled = start.clone().with_size_toggled(Size::M).with_size_toggled(Size::M);
        assert_eq!(toggled.sizes, start.sizes);

        let removed_and_back = start.clone().with_size_toggled(Size::L).with_size_toggled(Size::L);
        assert_eq!(removed_and_back, start);
    }

    #[test]
    fn sizes_are_joined_in_display_order() {
        let form = FormState::default()
            .with_size_toggled(Size::XL)
            .with_size_toggled(Size::XS)
            .with_size_toggled(Size::M);
        assert_eq!(form.joined_sizes(), "XS, M, XL");
        assert_eq!(FormState::default().joined_sizes(), "");
    }

    #[test]
    fn selecting_second_file_for_color_replaces_first() {
        let form = FormState::default()
            .with_image(Color::Gold, Some(image("a.png", b"first")))
            .with_image(Color::Gold, Some(image("b.png", b"second")));

        assert_eq!(form.images.len(), 1);
        let gold = &form.images[&Color::Gold];
        assert_eq!(gold.file_name, "b.png");
        assert_eq!(gold.bytes, Bytes::from_static(b"second"));
    }

    #[test]
    fn clearing_file_removes_color_key() {
        let form = FormState::default()
            .with_image(Color::Black, Some(image("a.png", b"data")))
            .with_image(Color::Black, Some(image("", b"")));
        assert!(!form.images.contains_key(&Color::Black));

        let form = form
            .with_image(Color::Silver, Some(image("s.png", b"data")))
            .with_image(Color::Silver, None);
        assert!(form.images.is_empty());
    }

    #[test]
    fn zero_byte_file_with_name_is_kept() {
        let form = FormState::default().with_image(Color::Gold, Some(image("pusty.png", b"")));
        assert_eq!(form.images.len(), 1);
        assert!(form.images[&Color::Gold].bytes.is_empty());
    }

    #[test]
    fn scalar_fields_are_replaced_by_name() {
        let form = FormState::default()
            .with_field(FormField::Name, "Pierścionek")
            .with_field(FormField::Price, "199")
            .with_field(FormField::Stock, "4")
            .with_field(FormField::Name, "Naszyjnik");

        assert_eq!(form.name, "Naszyjnik");
        assert_eq!(form.price, "199");
        assert_eq!(form.text_value(FormField::Stock), "4");
        assert_eq!(form.category, "");
    }

    #[test]
    fn bestseller_follows_checkbox_semantics() {
        let form = FormState::default().with_field(FormField::Bestseller, "on");
        assert!(form.bestseller);
        let form = form.with_field(FormField::Bestseller, "");
        assert!(!form.bestseller);
        let form = form.with_field(FormField::Bestseller, "TRUE");
        assert!(form.bestseller);
    }

    #[test]
    fn enums_parse_from_their_display_text() {
        for color in Color::iter() {
            assert_eq!(Color::from_str(&color.to_string()).ok(), Some(color));
        }
        assert_eq!(Color::from_str("Rose Gold").ok(), Some(Color::RoseGold));
        assert_eq!(Color::RoseGold.slug(), "rose-gold");
        assert_eq!(Size::from_str("xxl").ok(), Some(Size::XXL));
        assert_eq!(FormField::from_str("subcategory").ok(), Some(FormField::Subcategory));
        assert!(FormField::from_str("colors").is_err());
    }

    #[test]
    fn missing_content_type_falls_back_to_octet_stream() {
        let file = ImageFile::new("x.bin", None, Bytes::from_static(b"1"));
        assert_eq!(file.content_type, "application/octet-stream");
        let file = ImageFile::new("x.bin", Some(""), Bytes::from_static(b"1"));
        assert_eq!(file.content_type, "application/octet-stream");
    }
}
