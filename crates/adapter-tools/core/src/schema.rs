//! JSON schemas advertised in tool descriptors.
//!
//! Schemas are generated once per wire type as Draft 2020-12 with
//! `nullable: true` on optional fields, which is what MCP hosts expect.

use serde_json::{Map, Value};

pub mod mcp_schema {
    use schemars::generate::SchemaSettings;
    use schemars::transform::{AddNullable, RestrictFormats};
    use schemars::{JsonSchema, Schema};
    use std::any::TypeId;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, OnceLock, PoisonError};

    type SchemaCache = Mutex<HashMap<TypeId, Arc<Schema>>>;

    fn cache() -> &'static SchemaCache {
        static CACHE: OnceLock<SchemaCache> = OnceLock::new();
        CACHE.get_or_init(SchemaCache::default)
    }

    /// Draft 2020-12 schema for `T`, generated on first use and shared after.
    pub fn cached_schema_for<T: JsonSchema + 'static>() -> Arc<Schema> {
        let mut map = cache().lock().unwrap_or_else(PoisonError::into_inner);
        let entry = map.entry(TypeId::of::<T>()).or_insert_with(|| {
            let generator = SchemaSettings::draft2020_12()
                .with_transform(AddNullable::default())
                .with_transform(RestrictFormats::default())
                .into_generator();
            Arc::new(generator.into_root_schema_for::<T>())
        });
        Arc::clone(entry)
    }
}

/// Schema for `T` as the JSON object a descriptor carries.
///
/// The root always has `"type": "object"`; anything that does not serialize to an
/// object degrades to exactly that.
pub fn input_schema_object<T: schemars::JsonSchema + 'static>() -> Map<String, Value> {
    let schema = mcp_schema::cached_schema_for::<T>();
    let mut obj = match serde_json::to_value(schema.as_ref()) {
        Ok(Value::Object(obj)) => obj,
        _ => Map::new(),
    };
    obj.entry("type")
        .or_insert_with(|| Value::String("object".into()));
    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(schemars::JsonSchema, Deserialize)]
    struct SearchArgs {
        /// Terms to look for
        query: String,
        /// Restrict to one MIME type
        #[serde(default, rename = "mimeType")]
        mime_type: Option<String>,
    }

    #[test]
    fn optional_fields_are_nullable_and_not_required() {
        let obj = input_schema_object::<SearchArgs>();
        assert_eq!(obj["type"], "object");
        assert_eq!(obj["required"], json!(["query"]));
        assert_eq!(obj["properties"]["mimeType"]["nullable"], true);
    }

    #[test]
    fn doc_comments_become_descriptions() {
        let obj = input_schema_object::<SearchArgs>();
        assert_eq!(obj["properties"]["query"]["description"], "Terms to look for");
        assert_eq!(
            obj["properties"]["mimeType"]["description"],
            "Restrict to one MIME type"
        );
    }

    #[test]
    fn schema_is_generated_once_per_type() {
        let a = mcp_schema::cached_schema_for::<SearchArgs>();
        let b = mcp_schema::cached_schema_for::<SearchArgs>();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
