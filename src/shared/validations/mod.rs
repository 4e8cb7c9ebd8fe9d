//! Helpers for turning `validator` results into client-facing messages.

use validator::{ValidationErrors, ValidationErrorsKind};

/// Flatten (possibly nested) validation errors into a sorted list of
/// human-readable messages.
///
/// Each field error contributes its `message`; errors without one fall
/// back to `"<path>: <code>"`.
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_into(errors, None, &mut messages);
    messages.sort();
    messages
}

fn collect_into(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: {}", path, e.code))
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_into(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_into(inner, Some(&format!("{}[{}]", path, index)), out);
                }
            }
        }
    }
}
