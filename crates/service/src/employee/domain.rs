use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::ServiceError;

/// Message returned when a create payload lacks one of its fields.
pub const REQUIRED_FIELDS: &str = "required fields: name, role, salary";

/// Salary as a JSON number, kept exactly as the client sent it
/// (`5000` stays an integer, `5000.5` stays a float).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Salary(Number);

impl Salary {
    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    /// Parse a numeric string: integers first so `"5000"` does not turn into `5000.0`.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Self(n.into()));
        }
        if let Ok(n) = raw.parse::<u64>() {
            return Some(Self(n.into()));
        }
        raw.parse::<f64>().ok().and_then(Number::from_f64).map(Self)
    }
}

impl From<i64> for Salary {
    fn from(n: i64) -> Self {
        Self(n.into())
    }
}

impl From<Number> for Salary {
    fn from(n: Number) -> Self {
        Self(n)
    }
}

/// One persisted employee record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub role: String,
    pub salary: Salary,
}

/// Validated create input: id is assigned by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub role: String,
    pub salary: Salary,
}

impl NewEmployee {
    /// All three fields must be present; `salary` may be `0` but not absent or null.
    pub fn from_payload(payload: &Value) -> Result<Self, ServiceError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| ServiceError::Validation(REQUIRED_FIELDS.into()))?;
        let name = text_field(obj, "name")?.filter(|s| !s.is_empty());
        let role = text_field(obj, "role")?.filter(|s| !s.is_empty());
        let salary = salary_field(obj)?;
        match (name, role, salary) {
            (Some(name), Some(role), Some(salary)) => Ok(Self { name, role, salary }),
            _ => Err(ServiceError::Validation(REQUIRED_FIELDS.into())),
        }
    }

    pub fn into_employee(self, id: u64) -> Employee {
        Employee { id, name: self.name, role: self.role, salary: self.salary }
    }
}

/// Partial update: `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub salary: Option<Salary>,
}

impl EmployeePatch {
    /// Absent and `null` fields are left untouched; empty names/roles are rejected.
    pub fn from_payload(payload: &Value) -> Result<Self, ServiceError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| ServiceError::Validation("payload must be a JSON object".into()))?;
        let name = non_empty(text_field(obj, "name")?, "name")?;
        let role = non_empty(text_field(obj, "role")?, "role")?;
        let salary = salary_field(obj)?;
        Ok(Self { name, role, salary })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.salary.is_none()
    }

    pub fn apply(self, target: &mut Employee) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(role) = self.role {
            target.role = role;
        }
        if let Some(salary) = self.salary {
            target.salary = salary;
        }
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, ServiceError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(number_text(n))),
        Some(_) => Err(ServiceError::Validation(format!("{key} must be a string"))),
    }
}

/// Text form of a number as a browser would print it: whole floats drop the
/// `.0` (`1.0` -> `"1"`).
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

fn non_empty(value: Option<String>, key: &str) -> Result<Option<String>, ServiceError> {
    match value {
        Some(s) if s.is_empty() => Err(ServiceError::Validation(format!("{key} must not be empty"))),
        other => Ok(other),
    }
}

fn salary_field(obj: &Map<String, Value>) -> Result<Option<Salary>, ServiceError> {
    let invalid = || ServiceError::Validation("salary must be a number".into());
    match obj.get("salary") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(Salary(n.clone()))),
        Some(Value::String(s)) => Salary::parse(s).map(Some).ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

/// Next id: one past the largest id present, 1 for an empty list.
pub fn next_id(employees: &[Employee]) -> Result<u64, ServiceError> {
    let max = employees.iter().map(|e| e.id).max().unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| ServiceError::Storage(format!("cannot assign a new id: largest stored id is {max}")))
}

/// Path ids are positive integers; anything else cannot name a record.
pub fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id > 0)
}
