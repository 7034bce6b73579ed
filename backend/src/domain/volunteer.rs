//! Volunteer data model and submission validation.
//!
//! The incorrect states are unrepresentable by construction: a
//! [`VolunteerDraft`] can only be built from raw form input through
//! [`VolunteerDraft::parse`], so every value that reaches the record store has
//! already passed the field constraints. Presentation hints for the public
//! form live separately in [`crate::domain::form_schema`].

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length accepted for the `nome` field.
pub const NOME_MAX: usize = 100;
/// Maximum length accepted for the `email` field.
pub const EMAIL_MAX: usize = 254;
/// Maximum length accepted for the `telefone` field, mask included.
pub const TELEFONE_MAX: usize = 16;
/// Maximum length accepted for the `endereco` field.
pub const ENDERECO_MAX: usize = 255;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static TELEFONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn telefone_regex() -> &'static Regex {
    TELEFONE_RE.get_or_init(|| {
        // Brazilian mobile numbers: 2-digit area code, 5+4 digit subscriber.
        let pattern = r"^\(\d{2}\)\s?\d{5}-\d{4}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("telefone regex failed to compile: {error}"))
    })
}

/// Category of a single field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// The field is missing or blank after trimming.
    Required,
    /// The value does not match the field's syntax or length constraints.
    InvalidFormat,
    /// The value is not a member of the field's closed enumeration.
    InvalidChoice,
}

/// A validation failure attributed to one submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Form field name as submitted (`nome`, `email`, ...).
    pub field: &'static str,
    /// Failure category.
    #[serde(rename = "code")]
    pub kind: FieldErrorKind,
    /// User-facing message, in the site's language.
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        Self {
            field,
            kind,
            message: message_for(field, kind),
        }
    }
}

fn message_for(field: &'static str, kind: FieldErrorKind) -> String {
    match (field, kind) {
        ("nome", FieldErrorKind::Required) => "Informe seu nome completo.".to_owned(),
        ("email", FieldErrorKind::Required) => "Informe seu e-mail.".to_owned(),
        ("email", FieldErrorKind::InvalidFormat) => {
            "E-mail inválido. Ex.: nome@exemplo.com".to_owned()
        }
        ("telefone", FieldErrorKind::Required) => "Informe seu WhatsApp com DDD.".to_owned(),
        ("telefone", FieldErrorKind::InvalidFormat) => {
            "Telefone inválido. Use o formato (99) 99999-9999.".to_owned()
        }
        ("endereco", FieldErrorKind::Required) => "Informe seu endereço.".to_owned(),
        ("cidade", FieldErrorKind::Required) => "Escolha sua cidade.".to_owned(),
        ("area", FieldErrorKind::Required) => "Escolha uma área de atuação.".to_owned(),
        (_, FieldErrorKind::InvalidChoice) => "Escolha uma das opções disponíveis.".to_owned(),
        (_, FieldErrorKind::Required) => "Campo obrigatório.".to_owned(),
        (_, FieldErrorKind::InvalidFormat) => "Valor inválido para o campo.".to_owned(),
    }
}

/// All field failures collected from one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("submission failed validation on {} field(s)", .errors.len())]
pub struct SignupValidationError {
    /// One entry per failed field, in form order.
    pub errors: Vec<FieldError>,
}

/// City served by the organization. Closed choice; the public form renders
/// these as radio options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum City {
    #[serde(rename = "São José dos Campos")]
    SaoJoseDosCampos,
    #[serde(rename = "Jacareí")]
    Jacarei,
    #[serde(rename = "Caçapava")]
    Cacapava,
    #[serde(rename = "Taubaté")]
    Taubate,
}

impl City {
    /// All accepted choices, in form order.
    pub const CHOICES: [Self; 4] = [
        Self::SaoJoseDosCampos,
        Self::Jacarei,
        Self::Cacapava,
        Self::Taubate,
    ];

    /// The literal stored and displayed for this city.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SaoJoseDosCampos => "São José dos Campos",
            Self::Jacarei => "Jacareí",
            Self::Cacapava => "Caçapava",
            Self::Taubate => "Taubaté",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for City {
    type Error = FieldErrorKind;

    fn try_from(value: &str) -> Result<Self, FieldErrorKind> {
        Self::CHOICES
            .into_iter()
            .find(|city| city.as_str() == value)
            .ok_or(FieldErrorKind::InvalidChoice)
    }
}

/// Area of volunteer work. Closed choice; rendered as radio options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VolunteerArea {
    #[serde(rename = "Evento de adoção")]
    AdoptionEvent,
    #[serde(rename = "Cuidados e Bem-Estar")]
    CareAndWellbeing,
    #[serde(rename = "Associado")]
    Associate,
    #[serde(rename = "Outras tarefas")]
    OtherTasks,
}

impl VolunteerArea {
    /// All accepted choices, in form order.
    pub const CHOICES: [Self; 4] = [
        Self::AdoptionEvent,
        Self::CareAndWellbeing,
        Self::Associate,
        Self::OtherTasks,
    ];

    /// The literal stored and displayed for this area.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AdoptionEvent => "Evento de adoção",
            Self::CareAndWellbeing => "Cuidados e Bem-Estar",
            Self::Associate => "Associado",
            Self::OtherTasks => "Outras tarefas",
        }
    }
}

impl fmt::Display for VolunteerArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for VolunteerArea {
    type Error = FieldErrorKind;

    fn try_from(value: &str) -> Result<Self, FieldErrorKind> {
        Self::CHOICES
            .into_iter()
            .find(|area| area.as_str() == value)
            .ok_or(FieldErrorKind::InvalidChoice)
    }
}

/// Volunteer's full name, trimmed and length-bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Validate a trimmed, non-empty name.
    pub fn parse(value: &str) -> Result<Self, FieldErrorKind> {
        if value.chars().count() > NOME_MAX {
            return Err(FieldErrorKind::InvalidFormat);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an address of the shape `local@domain.tld`.
    pub fn parse(value: &str) -> Result<Self, FieldErrorKind> {
        if value.chars().count() > EMAIL_MAX || !email_regex().is_match(value) {
            return Err(FieldErrorKind::InvalidFormat);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phone number in the fixed mask `(99) 99999-9999`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate the masked number. The space after the area code is optional.
    pub fn parse(value: &str) -> Result<Self, FieldErrorKind> {
        if value.chars().count() > TELEFONE_MAX || !telefone_regex().is_match(value) {
            return Err(FieldErrorKind::InvalidFormat);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Free-text street address (street, number, complement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct StreetAddress(String);

impl StreetAddress {
    /// Validate a trimmed, non-empty address.
    pub fn parse(value: &str) -> Result<Self, FieldErrorKind> {
        if value.chars().count() > ENDERECO_MAX {
            return Err(FieldErrorKind::InvalidFormat);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Raw, untrusted field values as received from the public form.
#[derive(Debug, Clone, Default)]
pub struct RawSignup {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub area: Option<String>,
}

/// A fully validated submission, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerDraft {
    pub nome: FullName,
    pub email: EmailAddress,
    pub telefone: PhoneNumber,
    pub endereco: StreetAddress,
    pub cidade: City,
    pub area: VolunteerArea,
}

fn require(value: Option<&str>) -> Result<&str, FieldErrorKind> {
    match value.map(str::trim) {
        None | Some("") => Err(FieldErrorKind::Required),
        Some(trimmed) => Ok(trimmed),
    }
}

fn field<T>(
    errors: &mut Vec<FieldError>,
    name: &'static str,
    parsed: Result<T, FieldErrorKind>,
) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(kind) => {
            errors.push(FieldError::new(name, kind));
            None
        }
    }
}

impl VolunteerDraft {
    /// Validate and normalize raw form input.
    ///
    /// Collects one [`FieldError`] per failed field so the form can highlight
    /// every problem at once. Whitespace around values is trimmed before any
    /// other check runs.
    ///
    /// # Errors
    ///
    /// Returns [`SignupValidationError`] when at least one field fails.
    pub fn parse(raw: &RawSignup) -> Result<Self, SignupValidationError> {
        let mut errors = Vec::new();

        let nome = field(
            &mut errors,
            "nome",
            require(raw.nome.as_deref()).and_then(FullName::parse),
        );
        let email = field(
            &mut errors,
            "email",
            require(raw.email.as_deref()).and_then(EmailAddress::parse),
        );
        let telefone = field(
            &mut errors,
            "telefone",
            require(raw.telefone.as_deref()).and_then(PhoneNumber::parse),
        );
        let endereco = field(
            &mut errors,
            "endereco",
            require(raw.endereco.as_deref()).and_then(StreetAddress::parse),
        );
        let cidade = field(
            &mut errors,
            "cidade",
            require(raw.cidade.as_deref()).and_then(City::try_from),
        );
        let area = field(
            &mut errors,
            "area",
            require(raw.area.as_deref()).and_then(VolunteerArea::try_from),
        );

        match (nome, email, telefone, endereco, cidade, area) {
            (Some(nome), Some(email), Some(telefone), Some(endereco), Some(cidade), Some(area))
                if errors.is_empty() =>
            {
                Ok(Self {
                    nome,
                    email,
                    telefone,
                    endereco,
                    cidade,
                    area,
                })
            }
            _ => Err(SignupValidationError { errors }),
        }
    }
}

/// Stable volunteer identifier, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct VolunteerId(Uuid);

impl VolunteerId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for VolunteerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored volunteer record. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub nome: FullName,
    pub email: EmailAddress,
    pub telefone: PhoneNumber,
    pub endereco: StreetAddress,
    pub cidade: City,
    pub area: VolunteerArea,
    pub created_at: DateTime<Utc>,
}

impl Volunteer {
    /// Attach identity and a creation timestamp to a validated draft.
    pub fn from_draft(draft: VolunteerDraft, id: VolunteerId, created_at: DateTime<Utc>) -> Self {
        let VolunteerDraft {
            nome,
            email,
            telefone,
            endereco,
            cidade,
            area,
        } = draft;
        Self {
            id,
            nome,
            email,
            telefone,
            endereco,
            cidade,
            area,
            created_at,
        }
    }
}
