use serde_json::Value;

/// Coerce a JSON value into an i64. Gateway metadata round-trips through form fields, so numbers frequently come
/// back as strings.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_id_in_either_form() {
        assert_eq!(value_as_i64(&json!(42)), Some(42));
        assert_eq!(value_as_i64(&json!("42")), Some(42));
        assert_eq!(value_as_i64(&json!(" 7 ")), Some(7));
        assert_eq!(value_as_i64(&json!(null)), None);
        assert_eq!(value_as_i64(&json!("forty-two")), None);
    }
}
