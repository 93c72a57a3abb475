use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Day labels as shown to gym staff. The declaration order is the listing order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DayOfWeek {
    #[sea_orm(string_value = "Lunes")]
    #[serde(rename = "Lunes")]
    Monday,
    #[sea_orm(string_value = "Martes")]
    #[serde(rename = "Martes")]
    Tuesday,
    #[sea_orm(string_value = "Miércoles")]
    #[serde(rename = "Miércoles")]
    Wednesday,
    #[sea_orm(string_value = "Jueves")]
    #[serde(rename = "Jueves")]
    Thursday,
    #[sea_orm(string_value = "Viernes")]
    #[serde(rename = "Viernes")]
    Friday,
    #[sea_orm(string_value = "Sábado")]
    #[serde(rename = "Sábado")]
    Saturday,
    #[sea_orm(string_value = "Domingo")]
    #[serde(rename = "Domingo")]
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Lunes",
            DayOfWeek::Tuesday => "Martes",
            DayOfWeek::Wednesday => "Miércoles",
            DayOfWeek::Thursday => "Jueves",
            DayOfWeek::Friday => "Viernes",
            DayOfWeek::Saturday => "Sábado",
            DayOfWeek::Sunday => "Domingo",
        }
    }

    /// Sort key, Monday = 1 through Sunday = 7.
    pub fn number(self) -> u8 {
        match self {
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
            DayOfWeek::Sunday => 7,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.label() == label)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum InstructorStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl InstructorStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl PaymentMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

/// Accepts `HH:MM` as sent by time inputs, or `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassInput {
    pub name: String,
    pub instructor: String,
    pub schedule_time: NaiveTime,
    pub schedule_days: String,
    pub capacity: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructorInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub hire_date: NaiveDate,
    /// `None` stores [`InstructorStatus::Active`].
    pub status: Option<InstructorStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInput {
    pub member_id: i64,
    pub membership_type_id: i64,
    pub amount: f64,
    pub payment_date: NaiveDate,
    /// `None` stores [`PaymentMethod::Cash`].
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleInput {
    pub day_of_week: DayOfWeek,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    /// `None` stores an active schedule.
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// Payment row joined with its member and membership type.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
pub struct PaymentRecord {
    pub id: i64,
    pub member_id: i64,
    pub membership_type_id: i64,
    pub amount: f64,
    #[schema(value_type = String, format = "date", example = "2025-11-24")]
    pub payment_date: NaiveDate,
    #[schema(value_type = String, example = "cash")]
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[schema(value_type = String, format = "date-time", example = "2025-11-24T06:00:00")]
    pub created_at: NaiveDateTime,
    pub member_name: String,
    pub member_email: String,
    pub membership_type_name: String,
    pub membership_price: f64,
}
