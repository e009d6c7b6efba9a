//! Request validation from catalog column declarations.

use crate::catalog::{ColumnDef, EntityDef, FieldKind, Format};
use crate::error::{AppError, FieldFault};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"))
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body: every required column present and non-null,
    /// every supplied value matching its declared kind. All offending fields
    /// are collected into one error.
    pub fn validate(body: &HashMap<String, Value>, entity: &EntityDef) -> Result<(), AppError> {
        let mut faults = Vec::new();
        for c in &entity.columns {
            let val = body.get(c.name);
            if c.required && (val.is_none() || val == Some(&Value::Null)) {
                faults.push(FieldFault {
                    field: c.name.to_string(),
                    reason: "field required".into(),
                });
                continue;
            }
            if let Some(v) = val {
                if let Some(fault) = check_field(c, v) {
                    faults.push(fault);
                }
            }
        }
        if faults.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(faults))
        }
    }

    /// Validate only the fields present in body (for PATCH). Required-ness is
    /// not enforced for missing fields; unknown keys are ignored.
    pub fn validate_partial(
        body: &HashMap<String, Value>,
        entity: &EntityDef,
    ) -> Result<(), AppError> {
        let mut faults = Vec::new();
        for (name, v) in body {
            if let Some(c) = entity.column(name) {
                if let Some(fault) = check_field(c, v) {
                    faults.push(fault);
                }
            }
        }
        if faults.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(faults))
        }
    }
}

/// Kind and format check for one supplied value. Null passes here: required
/// nulls are caught in validate(), optional nulls are stored as NULL.
fn check_field(c: &ColumnDef, v: &Value) -> Option<FieldFault> {
    if v.is_null() {
        return None;
    }
    let fault = |reason: &str| {
        Some(FieldFault {
            field: c.name.to_string(),
            reason: reason.into(),
        })
    };
    match c.kind {
        FieldKind::Text => {
            let Some(s) = v.as_str() else {
                return fault("must be a string");
            };
            if c.format == Some(Format::Email) && !email_re().is_match(s) {
                return fault("must be a valid email");
            }
        }
        FieldKind::Integer => {
            if v.as_i64().is_none() {
                return fault("must be an integer");
            }
        }
        FieldKind::Float => {
            if !v.is_number() {
                return fault("must be a number");
            }
        }
        FieldKind::Date => {
            let Some(s) = v.as_str() else {
                return fault("must be a date string");
            };
            if chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                return fault("must be a date in YYYY-MM-DD format");
            }
        }
    }
    None
}
