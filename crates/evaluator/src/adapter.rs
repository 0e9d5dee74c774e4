//! Normalizes the response envelopes returned by evaluation services.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EvaluatorError, Result};
use crate::models::EvaluationResult;

/// Accepts `{results: [...]}`, `{data: {results: [...]}}`, `{data: [...]}` or a bare array.
pub fn normalize_results(body: Value) -> Result<Vec<EvaluationResult>> {
    let list = take_list(body, "results")
        .ok_or_else(|| EvaluatorError::UnexpectedResponse("no evaluation results found".into()))?;
    parse_list(list)
}

fn take_list(body: Value, key: &str) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove(key) {
                return Some(items);
            }
            match map.remove("data")? {
                Value::Array(items) => Some(items),
                data @ Value::Object(_) => take_list(data, key),
                _ => None,
            }
        }
        _ => None,
    }
}

fn parse_list<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(EvaluatorError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn result_json(id: Uuid) -> Value {
        json!({"submissionId": id, "totalScore": 61.0, "scores": []})
    }

    #[test]
    fn test_all_result_envelopes_normalize() {
        let id = Uuid::new_v4();
        let envelopes = [
            json!({"results": [result_json(id)]}),
            json!({"data": {"results": [result_json(id)]}}),
            json!({"data": [result_json(id)]}),
            json!([result_json(id)]),
        ];

        for envelope in envelopes {
            let results = normalize_results(envelope).unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].submission_id, id);
            assert_eq!(results[0].total_score, 61.0);
        }
    }

    #[test]
    fn test_unknown_envelope_is_rejected() {
        assert!(matches!(
            normalize_results(json!({"message": "ok"})),
            Err(EvaluatorError::UnexpectedResponse(_))
        ));
        assert!(normalize_results(json!("done")).is_err());
    }
}
