use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Convert a stored document into the public wire format.
///
/// ObjectIds render as 24-char hex strings and dates as RFC 3339; every other
/// value uses relaxed extended JSON, which is plain JSON for the types
/// clients send.
pub fn document_to_api_value(document: Document) -> Value {
    bson_to_api_value(Bson::Document(document))
}

/// Convert a list of documents to API values
pub fn documents_to_api_values(documents: Vec<Document>) -> Vec<Value> {
    documents.into_iter().map(document_to_api_value).collect()
}

fn bson_to_api_value(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or(Value::Null),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(k, v)| (k, bson_to_api_value(v)))
                .collect::<Map<String, Value>>(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_api_value).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Convert a request body into a storable document.
///
/// The body must be a JSON object. A client-supplied `_id` is dropped; ids
/// are always generated by the store or taken from the path.
pub fn api_value_to_document(value: Value) -> Result<Document, ApiError> {
    let Value::Object(mut map) = value else {
        return Err(ApiError::bad_request("Request body must be a JSON object"));
    };
    map.remove("_id");
    Ok(bson::to_document(&map).map_err(crate::database::StoreError::from)?)
}

/// Parse a path id into an ObjectId; malformed ids are a client error
pub fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::bad_request(format!("Invalid id '{}'", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    #[test]
    fn object_ids_render_as_hex() {
        let id = ObjectId::new();
        let value = document_to_api_value(doc! {
            "_id": id,
            "name": "Hammer",
            "nested": { "ref": id },
            "tags": ["a", "b"],
            "price": 12.5,
            "quantity": 3_i64,
        });

        assert_eq!(value["_id"], json!(id.to_hex()));
        assert_eq!(value["nested"]["ref"], json!(id.to_hex()));
        assert_eq!(value["tags"], json!(["a", "b"]));
        assert_eq!(value["price"], json!(12.5));
        assert_eq!(value["quantity"], json!(3));
    }

    #[test]
    fn body_must_be_object_and_loses_client_id() {
        assert!(api_value_to_document(json!([1, 2])).is_err());

        let doc = api_value_to_document(json!({ "_id": "mine", "toolName": "Saw", "qty": 2 })).unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("toolName").unwrap(), "Saw");
    }

    #[test]
    fn malformed_id_is_bad_request() {
        let err = parse_object_id("not-an-id").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(parse_object_id(&ObjectId::new().to_hex()).is_ok());
    }
}
