//! Macros for reducing boilerplate when defining records
//!
//! Record structs stay plain serde types mirroring the API payload; the macro
//! generates the [`Record`](crate::core::record::Record) implementation that
//! exposes their fields to the pipeline by name.

/// Convert one struct field into a [`FieldValue`](crate::core::field::FieldValue)
///
/// Kinds: `text` (String), `optional_text` (Option<String>), `number` (f64),
/// `optional_number` (Option<f64>), `flag` (bool), `list` (Vec<String>,
/// comma-joined) and `date` (String timestamp).
#[doc(hidden)]
#[macro_export]
macro_rules! record_field_value {
    (text, $value:expr) => {
        $crate::core::field::FieldValue::String($value.clone())
    };
    (optional_text, $value:expr) => {
        match &$value {
            Some(v) => $crate::core::field::FieldValue::String(v.clone()),
            None => $crate::core::field::FieldValue::Null,
        }
    };
    (number, $value:expr) => {
        $crate::core::field::FieldValue::Float($value)
    };
    (optional_number, $value:expr) => {
        match $value {
            Some(v) => $crate::core::field::FieldValue::Float(v),
            None => $crate::core::field::FieldValue::Null,
        }
    };
    (flag, $value:expr) => {
        $crate::core::field::FieldValue::Boolean($value)
    };
    (list, $value:expr) => {
        if $value.is_empty() {
            $crate::core::field::FieldValue::Null
        } else {
            $crate::core::field::FieldValue::String($value.join(", "))
        }
    };
    (date, $value:expr) => {
        match $crate::core::field::parse_timestamp(&$value) {
            Some(dt) => $crate::core::field::FieldValue::DateTime(dt),
            None => $crate::core::field::FieldValue::Null,
        }
    };
}

/// Implement `Record` for a serde struct
///
/// # Example
///
/// ```rust,ignore
/// impl_record!(
///     Volunteer, "volunteer", "volunteers",
///     id: id,
///     timestamp: application_date => "applicationDate",
///     fields {
///         "fullName" => text(full_name),
///         "status" => text(status),
///         "skills" => list(skills),
///     },
///     transitions: status [Approve, Reject],
///     validate: Volunteer::check_fields,
/// );
/// ```
///
/// The timestamp field is exposed under its name as a date value. Unknown
/// field names resolve to `None`; empty optionals resolve to `FieldValue::Null`.
#[macro_export]
macro_rules! impl_record {
    (
        $type:ident, $singular:literal, $plural:literal,
        id: $id:ident,
        timestamp: $ts:ident => $ts_name:literal,
        fields { $($name:literal => $kind:ident($($path:ident).+)),* $(,)? }
        $(, transitions: $status:ident [$($transition:ident),* $(,)?])?
        $(, validate: $validator:path)?
        $(,)?
    ) => {
        impl $crate::core::record::Record for $type {
            fn record_type() -> &'static str {
                $singular
            }

            fn collection_name() -> &'static str {
                $plural
            }

            fn id(&self) -> &str {
                &self.$id
            }

            fn set_id(&mut self, id: String) {
                self.$id = id;
            }

            fn timestamp(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                $crate::core::field::parse_timestamp(&self.$ts)
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    $ts_name => Some($crate::record_field_value!(date, self.$ts)),
                    $($name => Some($crate::record_field_value!($kind, self.$($path).+)),)*
                    _ => None,
                }
            }

            fn apply_transition(&mut self, transition: $crate::core::record::StatusTransition) -> bool {
                $(
                    if [$($crate::core::record::StatusTransition::$transition),*].contains(&transition) {
                        self.$status = transition.target_status().to_string();
                        return true;
                    }
                )?
                let _ = transition;
                false
            }

            fn validate(&self) -> Vec<$crate::core::error::FieldValidationError> {
                let validators: &[fn(&Self) -> Vec<$crate::core::error::FieldValidationError>] =
                    &[$($validator)?];
                validators.iter().flat_map(|check| check(self)).collect()
            }
        }
    };
}
