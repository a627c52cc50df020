use serde_json::{Map, Value};

use super::model::FeedbackAnswers;
use crate::error::AppError;

/// Normalises a form-builder webhook body into answers.
///
/// Accepts a flat object of named fields, or the builder's envelope whose
/// `rawRequest` holds the fields as a JSON string. Fields are matched by name
/// only; anything the schema does not know is dropped and anything missing
/// takes its default.
pub fn parse_payload(body: Value) -> Result<FeedbackAnswers, AppError> {
    let Value::Object(mut envelope) = body else {
        return Err(AppError::validation("Webhook payload must be a JSON object"));
    };

    let fields = match envelope.remove("rawRequest") {
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(inner)) => inner,
            Ok(_) => return Err(AppError::validation("rawRequest must encode a JSON object")),
            Err(e) => return Err(AppError::validation(format!("rawRequest is not valid JSON: {e}"))),
        },
        Some(Value::Object(inner)) => inner,
        _ => envelope,
    };

    let mut fields = canonical_keys(fields);
    split_compound_name(&mut fields);

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::validation(format!("Webhook payload does not match schema: {e}")))
}

// Each field accepts a snake_case and a camelCase spelling, and serde rejects
// a body carrying both. Collapse them onto the snake_case key; the snake_case
// value wins, otherwise the first camelCase value seen.
fn canonical_keys(fields: Map<String, Value>) -> Map<String, Value> {
    let (camel, snake): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .partition(|(key, _)| key.chars().any(|c| c.is_ascii_uppercase()));

    let mut out: Map<String, Value> = snake.into_iter().collect();
    for (key, value) in camel {
        out.entry(snake_case(&key)).or_insert(value);
    }
    out
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// Builders send the name widget as {"name": {"first": .., "last": ..}}.
fn split_compound_name(fields: &mut Map<String, Value>) {
    let Some(Value::Object(name)) = fields.remove("name") else {
        return;
    };
    for (part, key) in [("first", "first_name"), ("last", "last_name")] {
        if let Some(v) = name.get(part) {
            fields.entry(key).or_insert_with(|| v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_payload_maps_by_name() {
        let answers = parse_payload(json!({
            "first_name": "Ana",
            "lastName": "Lopez",
            "email": "ana@example.com",
            "taste": "5"
        }))
        .unwrap();
        assert_eq!(answers.first_name, "Ana");
        assert_eq!(answers.last_name, "Lopez");
        assert_eq!(answers.taste, Some(5));
    }

    #[test]
    fn raw_request_envelope_is_unwrapped() {
        let raw = json!({ "firstName": "Bea", "benefitsExperienced": ["Energy"] }).to_string();
        let answers = parse_payload(json!({
            "formID": "123",
            "rawRequest": raw
        }))
        .unwrap();
        assert_eq!(answers.first_name, "Bea");
        assert_eq!(answers.benefits_experienced, vec!["Energy"]);
    }

    #[test]
    fn compound_name_widget_is_split() {
        let answers = parse_payload(json!({
            "name": { "first": "Cy", "last": "Diaz" },
            "email": "cy@example.com"
        }))
        .unwrap();
        assert_eq!(answers.first_name, "Cy");
        assert_eq!(answers.last_name, "Diaz");
    }

    #[test]
    fn empty_object_yields_all_defaults() {
        let answers = parse_payload(json!({})).unwrap();
        assert_eq!(answers, FeedbackAnswers::default());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(parse_payload(json!([1, 2, 3])).is_err());
        assert!(parse_payload(json!({ "rawRequest": "{broken" })).is_err());
        assert!(parse_payload(json!({ "rawRequest": "[1]" })).is_err());
    }

    #[test]
    fn both_spellings_of_a_field_are_accepted() {
        let answers = parse_payload(json!({
            "first_name": "Ana",
            "firstName": "Ana",
            "overall_satisfaction": 4,
            "overallSatisfaction": "2"
        }))
        .unwrap();
        assert_eq!(answers.first_name, "Ana");
        assert_eq!(answers.overall_satisfaction, Some(4));
    }

    #[test]
    fn camel_case_name_beats_the_name_widget() {
        let answers = parse_payload(json!({
            "firstName": "Bea",
            "name": { "first": "Other", "last": "Diaz" }
        }))
        .unwrap();
        assert_eq!(answers.first_name, "Bea");
        assert_eq!(answers.last_name, "Diaz");
    }

    #[test]
    fn snake_case_folds_camel_keys() {
        assert_eq!(snake_case("leastFavoriteAspect"), "least_favorite_aspect");
        assert_eq!(snake_case("first_name"), "first_name");
    }

    #[test]
    fn positional_keys_are_ignored() {
        let answers = parse_payload(json!({ "q3_input3": "Ana", "q4_input4": "x@y.z" })).unwrap();
        assert_eq!(answers.first_name, "");
        assert_eq!(answers.email, "");
    }
}
