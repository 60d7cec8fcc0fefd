/**
 * a macro to create deserialize function that allow false value for optional list
 */
#[macro_export]
macro_rules! create_deserialize_fn {
    ($fn_name:ident, $item_type:ty) => {
        pub fn $fn_name<'de, D>(deserializer: D) -> Result<Vec<$item_type>, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let value: serde_json::Value = serde_json::Value::deserialize(deserializer)?;

            match value {
                // allow false value to disable the section
                serde_json::Value::Bool(false) | serde_json::Value::Null => Ok(vec![]),
                // a single object is a list of one
                serde_json::Value::Object(obj) => Ok(vec![serde_json::from_value::<$item_type>(
                    serde_json::Value::Object(obj),
                )
                .map_err(<D::Error as serde::de::Error>::custom)?]),
                serde_json::Value::Array(arr) => arr
                    .into_iter()
                    .map(|item| {
                        serde_json::from_value::<$item_type>(item)
                            .map_err(<D::Error as serde::de::Error>::custom)
                    })
                    .collect(),
                _ => Err(serde::de::Error::custom(format!(
                    "invalid `{}` value: {}",
                    stringify!($fn_name).replace("deserialize_", ""),
                    value
                ))),
            }
        }
    };
}
