//! Form validation. Every rule runs on each submission so all field errors are
//! reported at once; a successful pass yields the typed input for the repository.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::DbErr;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StoreViolation;
use crate::models::{
    ClassInput, DayOfWeek, InstructorInput, InstructorStatus, PaymentInput, PaymentMethod,
    ScheduleInput, parse_date, parse_time_of_day,
};
use crate::repository::{InstructorRepository, ScheduleRepository};

/// Field name to user-facing message. Empty means the form is valid.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub type Validated<T> = Result<T, FieldErrors>;

pub const DAY_TAKEN: &str = "Ya existe un horario para este día";
pub const EMAIL_TAKEN: &str = "El email ya está registrado";
pub const MEMBER_REQUIRED: &str = "Debe seleccionar un miembro";
pub const MEMBERSHIP_TYPE_REQUIRED: &str = "Debe seleccionar un tipo de membresía";

const INVALID_TIME: &str = "Formato de hora inválido (HH:MM)";
const INVALID_DATE: &str = "Formato de fecha inválido (AAAA-MM-DD)";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email regex compiles")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ClassForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub instructor: Option<String>,
    pub schedule_time: Option<String>,
    pub schedule_days: Option<String>,
    pub capacity: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct InstructorForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub hire_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PaymentForm {
    pub member_id: Option<String>,
    pub membership_type_id: Option<String>,
    pub amount: Option<String>,
    pub payment_date: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ScheduleForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub day_of_week: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    /// Checkbox: present when ticked, absent otherwise.
    pub is_active: Option<String>,
    pub notes: Option<String>,
}

/// Trimmed value, or `None` when absent or blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn optional(value: &Option<String>) -> Option<String> {
    present(value).map(str::to_owned)
}

fn positive_id(value: &Option<String>) -> Option<i64> {
    present(value)
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|id| *id > 0)
}

/// A ticked checkbox. The hidden-input fallback submits `0` when unticked.
fn is_checked(value: &Option<String>) -> bool {
    present(value)
        .is_some_and(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "off"))
}

/// Folds submitted key/value pairs into a typed form. A repeated key keeps its
/// last value; anything that still fails to map leaves an empty form.
pub fn form_from_pairs<T: DeserializeOwned + Default>(pairs: Vec<(String, String)>) -> T {
    let fields: serde_json::Map<String, serde_json::Value> = pairs
        .into_iter()
        .map(|(key, value)| (key, serde_json::Value::String(value)))
        .collect();
    serde_json::from_value(serde_json::Value::Object(fields)).unwrap_or_default()
}

/// Emails compare case-insensitively, so they are stored lowercased.
fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Maps a unique-constraint failure from the store back onto the form field that
/// owns the constraint. Other failures are left to the caller.
pub fn unique_violation_errors(
    err: &DbErr,
    field: &'static str,
    message: &str,
) -> Option<FieldErrors> {
    (StoreViolation::classify(err) == Some(StoreViolation::Unique))
        .then(|| FieldErrors::from([(field, message.to_string())]))
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

pub fn validate_class(form: &ClassForm) -> Validated<ClassInput> {
    let mut errors = FieldErrors::new();

    let name = present(&form.name);
    if name.is_none() {
        errors.insert("name", "El nombre de la clase es requerido".into());
    }
    let instructor = present(&form.instructor);
    if instructor.is_none() {
        errors.insert("instructor", "El instructor es requerido".into());
    }
    let schedule_time = match present(&form.schedule_time) {
        None => {
            errors.insert("schedule_time", "El horario es requerido".into());
            None
        }
        Some(raw) => {
            let parsed = parse_time_of_day(raw);
            if parsed.is_none() {
                errors.insert("schedule_time", INVALID_TIME.into());
            }
            parsed
        }
    };
    let schedule_days = present(&form.schedule_days);
    if schedule_days.is_none() {
        errors.insert("schedule_days", "Los días de la semana son requeridos".into());
    }
    let capacity = present(&form.capacity)
        .and_then(|v| v.parse::<i32>().ok())
        .filter(|c| *c > 0);
    if capacity.is_none() {
        errors.insert("capacity", "La capacidad debe ser un número mayor a 0".into());
    }

    match (name, instructor, schedule_time, schedule_days, capacity) {
        (Some(name), Some(instructor), Some(schedule_time), Some(schedule_days), Some(capacity))
            if errors.is_empty() =>
        {
            Ok(ClassInput {
                name: name.to_owned(),
                instructor: instructor.to_owned(),
                schedule_time,
                schedule_days: schedule_days.to_owned(),
                capacity,
                description: optional(&form.description),
            })
        }
        _ => Err(errors),
    }
}

/// Validates an instructor form. Pass the instructor's own id as `exclude_id`
/// when editing so its current email does not count as taken.
pub async fn validate_instructor(
    form: &InstructorForm,
    repo: &InstructorRepository<'_>,
    exclude_id: Option<i64>,
) -> Result<Validated<InstructorInput>, DbErr> {
    let mut errors = FieldErrors::new();

    let name = present(&form.name);
    if name.is_none() {
        errors.insert("name", "El nombre es requerido".into());
    }
    let email = match present(&form.email) {
        None => {
            errors.insert("email", "El email es requerido".into());
            None
        }
        Some(email) if !is_valid_email(email) => {
            errors.insert("email", "El email no es válido".into());
            None
        }
        Some(email) => {
            let email = normalize_email(email);
            if repo.email_exists(&email, exclude_id).await? {
                errors.insert("email", EMAIL_TAKEN.into());
                None
            } else {
                Some(email)
            }
        }
    };
    let hire_date = match present(&form.hire_date) {
        None => {
            errors.insert("hire_date", "La fecha de contratación es requerida".into());
            None
        }
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.insert("hire_date", INVALID_DATE.into());
            }
            parsed
        }
    };
    let status = match present(&form.status) {
        None => None,
        Some(raw) => {
            let parsed = InstructorStatus::parse(raw);
            if parsed.is_none() {
                errors.insert("status", "Estado inválido".into());
            }
            parsed
        }
    };

    Ok(match (name, email, hire_date) {
        (Some(name), Some(email), Some(hire_date)) if errors.is_empty() => Ok(InstructorInput {
            name: name.to_owned(),
            email,
            phone: optional(&form.phone),
            specialization: optional(&form.specialization),
            hire_date,
            status,
        }),
        _ => Err(errors),
    })
}

pub fn validate_payment(form: &PaymentForm) -> Validated<PaymentInput> {
    let mut errors = FieldErrors::new();

    let member_id = positive_id(&form.member_id);
    if member_id.is_none() {
        errors.insert("member_id", MEMBER_REQUIRED.into());
    }
    let membership_type_id = positive_id(&form.membership_type_id);
    if membership_type_id.is_none() {
        errors.insert("membership_type_id", MEMBERSHIP_TYPE_REQUIRED.into());
    }
    let amount = present(&form.amount)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|a| a.is_finite() && *a > 0.0);
    if amount.is_none() {
        errors.insert("amount", "El monto debe ser un número mayor a 0".into());
    }
    let payment_date = match present(&form.payment_date) {
        None => {
            errors.insert("payment_date", "La fecha de pago es requerida".into());
            None
        }
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.insert("payment_date", INVALID_DATE.into());
            }
            parsed
        }
    };
    let payment_method = match present(&form.payment_method) {
        None => None,
        Some(raw) => {
            let parsed = PaymentMethod::parse(raw);
            if parsed.is_none() {
                errors.insert("payment_method", "Método de pago inválido".into());
            }
            parsed
        }
    };

    match (member_id, membership_type_id, amount, payment_date) {
        (Some(member_id), Some(membership_type_id), Some(amount), Some(payment_date))
            if errors.is_empty() =>
        {
            Ok(PaymentInput {
                member_id,
                membership_type_id,
                amount,
                payment_date,
                payment_method,
                notes: optional(&form.notes),
            })
        }
        _ => Err(errors),
    }
}

/// Validates a schedule form. `exclude_id` works as in [`validate_instructor`].
/// A time range error is reported against `closing_time`.
pub async fn validate_schedule(
    form: &ScheduleForm,
    repo: &ScheduleRepository<'_>,
    exclude_id: Option<i64>,
) -> Result<Validated<ScheduleInput>, DbErr> {
    let mut errors = FieldErrors::new();

    let day_of_week = match present(&form.day_of_week) {
        None => {
            errors.insert("day_of_week", "El día de la semana es requerido".into());
            None
        }
        Some(label) => match DayOfWeek::from_label(label) {
            None => {
                errors.insert("day_of_week", "Día de la semana inválido".into());
                None
            }
            Some(day) => {
                if repo.day_exists(day, exclude_id).await? {
                    errors.insert("day_of_week", DAY_TAKEN.into());
                    None
                } else {
                    Some(day)
                }
            }
        },
    };

    let opening_raw = present(&form.opening_time);
    let opening_time = match opening_raw {
        None => {
            errors.insert("opening_time", "La hora de apertura es requerida".into());
            None
        }
        Some(raw) => {
            let parsed = parse_time_of_day(raw);
            if parsed.is_none() {
                errors.insert("opening_time", INVALID_TIME.into());
            }
            parsed
        }
    };
    let closing_raw = present(&form.closing_time);
    let closing_time = match closing_raw {
        None => {
            errors.insert("closing_time", "La hora de cierre es requerida".into());
            None
        }
        Some(raw) => {
            let parsed = parse_time_of_day(raw);
            if parsed.is_none() {
                errors.insert("closing_time", INVALID_TIME.into());
            }
            parsed
        }
    };
    if let (Some(opening), Some(closing)) = (opening_raw, closing_raw) {
        let both_parsed = opening_time.is_some() && closing_time.is_some();
        if both_parsed && !ScheduleRepository::is_valid_time_range(opening, closing) {
            errors.insert(
                "closing_time",
                "La hora de cierre debe ser posterior a la hora de apertura".into(),
            );
        }
    }

    Ok(match (day_of_week, opening_time, closing_time) {
        (Some(day_of_week), Some(opening_time), Some(closing_time)) if errors.is_empty() => {
            Ok(ScheduleInput {
                day_of_week,
                opening_time,
                closing_time,
                is_active: Some(is_checked(&form.is_active)),
                notes: optional(&form.notes),
            })
        }
        _ => Err(errors),
    })
}
