use super::error::WatchError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Converts values to and from the store's string representation.
pub trait Codec<T>: Send + Sync {
    fn encode(&self, value: &T) -> Result<String, WatchError>;

    fn decode(&self, raw: &str) -> Result<T, WatchError>;
}

/// JSON codec backed by `serde_json`.
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Codec<T> for JsonCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<String, WatchError> {
        serde_json::to_string(value).map_err(WatchError::from)
    }

    fn decode(&self, raw: &str) -> Result<T, WatchError> {
        serde_json::from_str(raw).map_err(WatchError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        font_size: u8,
    }

    #[test]
    fn test_json_codec_struct() {
        let codec = JsonCodec::<Prefs>::new();
        let prefs = Prefs {
            theme: "dark".to_string(),
            font_size: 14,
        };

        let raw = codec.encode(&prefs).unwrap();
        assert_eq!(raw, r#"{"theme":"dark","font_size":14}"#);
        assert_eq!(codec.decode(&raw).unwrap(), prefs);
    }

    #[test]
    fn test_json_codec_strings_are_quoted() {
        let codec = JsonCodec::<String>::new();
        assert_eq!(codec.encode(&"dark".to_string()).unwrap(), "\"dark\"");
    }

    #[test]
    fn test_json_codec_rejects_corrupt_input() {
        let codec = JsonCodec::<Prefs>::new();
        let result = codec.decode("{not json");
        assert!(matches!(result, Err(WatchError::Serialization(_))));
    }

    #[test]
    fn test_json_codec_rejects_wrong_shape() {
        let codec = JsonCodec::<u32>::new();
        assert!(codec.decode("\"text\"").is_err());
    }
}
