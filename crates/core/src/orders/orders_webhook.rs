//! Olo order-placed webhook payload and its validation into a [`NewOrder`].

use serde::Deserialize;
use serde_json::Value;

use super::olo_timestamp::OloTimestamp;
use super::orders_model::NewOrder;
use crate::errors::ValidationError;

/// Raw webhook body. Every field is kept loosely typed so presence can be
/// judged the way the platform's JavaScript clients do.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(default)]
    pub store_number: Option<Value>,
    #[serde(default)]
    pub store_name: Option<Value>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub time_placed: Option<Value>,
    #[serde(default)]
    pub time_ready: Option<Value>,
}

/// JavaScript truthiness. Numeric `0` counts as missing, so a store at
/// latitude 0 is rejected.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn store_number_from(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(invalid("storeNumber", "expected a string or number")),
    }
}

fn coordinate_from(field: &'static str, value: &Value, limit: f64) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
    .ok_or_else(|| invalid(field, "expected a number"))?;

    if parsed.abs() > limit {
        return Err(invalid(field, format!("{parsed} is outside ±{limit}")));
    }
    Ok(parsed)
}

fn timestamp_from(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    let raw = value
        .as_str()
        .ok_or_else(|| invalid(field, "expected a `YYYYMMDD HH:MM` string"))?;
    raw.parse::<OloTimestamp>()
        .map_err(|e| invalid(field, e.to_string()))?;
    Ok(raw.to_string())
}

impl WebhookPayload {
    /// Parses a request body. Only a JSON object is accepted; serde would
    /// otherwise fill the struct positionally from an array.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let invalid_payload = |e: serde_json::Error| ValidationError::InvalidPayload(e.to_string());
        match serde_json::from_slice::<Value>(body).map_err(invalid_payload)? {
            object @ Value::Object(_) => serde_json::from_value(object).map_err(invalid_payload),
            other => Err(ValidationError::InvalidPayload(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Names of the required fields that are absent or falsy, in payload order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("storeNumber", self.store_number.as_ref()),
            ("latitude", self.latitude.as_ref()),
            ("longitude", self.longitude.as_ref()),
            ("timePlaced", self.time_placed.as_ref()),
            ("timeReady", self.time_ready.as_ref()),
        ]
        .into_iter()
        .filter(|(_, value)| !is_truthy(*value))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn into_new_order(self) -> Result<NewOrder, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        // Presence was checked above, so every required field is Some.
        let required = |value: Option<Value>| value.unwrap_or(Value::Null);

        let store_number = store_number_from(&required(self.store_number))?;
        let latitude = coordinate_from("latitude", &required(self.latitude), 90.0)?;
        let longitude = coordinate_from("longitude", &required(self.longitude), 180.0)?;
        let time_placed = timestamp_from("timePlaced", &required(self.time_placed))?;
        let time_ready = timestamp_from("timeReady", &required(self.time_ready))?;
        let store_name = match self.store_name {
            Some(Value::String(name)) if !name.trim().is_empty() => Some(name.trim().to_string()),
            _ => None,
        };

        Ok(NewOrder {
            store_number,
            store_name,
            latitude,
            longitude,
            time_placed,
            time_ready,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> WebhookPayload {
        serde_json::from_value(value).unwrap()
    }

    fn valid() -> Value {
        json!({
            "storeNumber": 1042,
            "latitude": 40.7128,
            "longitude": -74.006,
            "timePlaced": "20240315 14:05",
            "timeReady": "20240315 14:30"
        })
    }

    #[test]
    fn valid_payload_converts() {
        let order = payload(valid()).into_new_order().unwrap();
        assert_eq!(order.store_number, "1042");
        assert_eq!(order.latitude, 40.7128);
        assert_eq!(order.longitude, -74.006);
        assert_eq!(order.time_ready, "20240315 14:30");
        assert_eq!(order.store_name, None);
    }

    #[test]
    fn each_missing_field_is_reported() {
        for field in ["storeNumber", "latitude", "longitude", "timePlaced", "timeReady"] {
            let mut body = valid();
            body.as_object_mut().unwrap().remove(field);
            assert_eq!(
                payload(body).into_new_order(),
                Err(ValidationError::MissingFields(vec![field])),
                "field {field}"
            );
        }
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let body = json!({
            "storeNumber": "",
            "latitude": 0,
            "longitude": null,
            "timePlaced": false,
            "timeReady": "20240315 14:30"
        });
        assert_eq!(
            payload(body).missing_fields(),
            vec!["storeNumber", "latitude", "longitude", "timePlaced"]
        );
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut body = valid();
        body["latitude"] = json!("40.5");
        body["storeNumber"] = json!(" A-17 ");
        let order = payload(body).into_new_order().unwrap();
        assert_eq!(order.latitude, 40.5);
        assert_eq!(order.store_number, "A-17");
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let mut body = valid();
        body["timeReady"] = json!("2024-03-15T14:30");
        let err = payload(body).into_new_order().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidField { field: "timeReady", .. }
        ));
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        let mut body = valid();
        body["longitude"] = json!(200.0);
        let err = payload(body).into_new_order().unwrap_err();
        assert!(err.to_string().starts_with("Invalid longitude"));
    }

    #[test]
    fn store_name_is_optional() {
        let mut body = valid();
        body["storeName"] = json!("Midtown");
        let order = payload(body).into_new_order().unwrap();
        assert_eq!(order.store_name.as_deref(), Some("Midtown"));
    }

    #[test]
    fn non_object_body_is_invalid() {
        let array = br#"["1042",null,40.7,-74.0,"20240315 14:05","20240315 14:30"]"#;
        for body in [&b"[1,2,3]"[..], &array[..], b"\"order\"", b"42", b"null"] {
            assert!(
                matches!(
                    WebhookPayload::from_json(body),
                    Err(ValidationError::InvalidPayload(_))
                ),
                "body {}",
                String::from_utf8_lossy(body)
            );
        }
        assert!(WebhookPayload::from_json(b"{}").is_ok());
        assert!(WebhookPayload::from_json(b"{").is_err());
    }
}
