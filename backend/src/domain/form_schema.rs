//! Machine-readable description of the public signup form.
//!
//! Storage and presentation are deliberately decoupled: the volunteer record
//! only knows validated values, while this module describes how a client
//! should render the fields (widget kind, placeholder, input mode, choices).
//! The schema is served by `GET /voluntarios/cadastro/`.

use serde::Serialize;
use utoipa::ToSchema;

use super::volunteer::{City, TELEFONE_MAX, VolunteerArea};

/// Widget the client should render for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    /// Single-line text input.
    Text,
    /// Email input.
    Email,
    /// Telephone input with numeric input mode.
    Tel,
    /// One radio button per choice.
    Radio,
}

/// Rendering description for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Field name as submitted in the POST body.
    pub name: &'static str,
    /// Visible label.
    pub label: &'static str,
    /// Widget kind.
    pub widget: Widget,
    /// Placeholder text, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    /// Client-side pattern hint matching the server-side check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<&'static str>,
    /// Maximum input length, when bounded for the widget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Accepted literals for radio widgets; empty for free-text fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<&'static str>,
}

/// The full signup form description, in render order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupFormSchema {
    /// Fields in the order the form presents them.
    pub fields: Vec<FormField>,
}

/// Build the schema for the volunteer signup form.
pub fn signup_form_schema() -> SignupFormSchema {
    SignupFormSchema {
        fields: vec![
            FormField {
                name: "nome",
                label: "Nome",
                widget: Widget::Text,
                placeholder: Some("Nome completo"),
                pattern: None,
                max_length: None,
                choices: Vec::new(),
            },
            FormField {
                name: "email",
                label: "E-mail",
                widget: Widget::Email,
                placeholder: Some("name@example.com"),
                pattern: None,
                max_length: None,
                choices: Vec::new(),
            },
            FormField {
                name: "telefone",
                label: "WhatsApp",
                widget: Widget::Tel,
                placeholder: Some("(99) 99999-9999"),
                pattern: Some(r"\(\d{2}\)\s?\d{5}-\d{4}"),
                max_length: Some(TELEFONE_MAX),
                choices: Vec::new(),
            },
            FormField {
                name: "endereco",
                label: "Endereço",
                widget: Widget::Text,
                placeholder: Some("Logradouro, nº, complemento"),
                pattern: None,
                max_length: None,
                choices: Vec::new(),
            },
            FormField {
                name: "cidade",
                label: "Cidade",
                widget: Widget::Radio,
                placeholder: None,
                pattern: None,
                max_length: None,
                choices: City::CHOICES.iter().map(|c| c.as_str()).collect(),
            },
            FormField {
                name: "area",
                label: "Área de atuação",
                widget: Widget::Radio,
                placeholder: None,
                pattern: None,
                max_length: None,
                choices: VolunteerArea::CHOICES.iter().map(|a| a.as_str()).collect(),
            },
        ],
    }
}
