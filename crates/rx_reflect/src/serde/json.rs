use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::any::Any;
use core::{error, fmt};

use serde_core::de::{DeserializeSeed, IgnoredAny};

use super::{ReflectDeserializer, ReflectSerializer, SerializeConfig};
use crate::info::{INVALID_REFLECTABLE_ID, ReflectableId};
use crate::registry::TypeInfoDatabase;
use crate::{Reflect, Reflectable};

// -----------------------------------------------------------------------------
// JsonError

/// Errors of the JSON front-end.
#[derive(Debug)]
pub enum JsonError {
    /// The document is not valid JSON. Nothing was modified.
    Parse { message: String, offset: usize },
    /// The document is valid JSON but does not fit the target.
    Data(serde_json::Error),
    /// The value could not be written.
    Serialize(serde_json::Error),
    /// No instantiator of the class accepts the given arguments.
    Instantiate { id: ReflectableId },
}

impl JsonError {
    fn parse(json: &str, err: &serde_json::Error) -> Self {
        let full = format!("{err}");
        let location = format!(" at line {} column {}", err.line(), err.column());
        let message = match full.strip_suffix(location.as_str()) {
            Some(message) => String::from(message),
            None => full,
        };

        let line_start: usize = json
            .split_inclusive('\n')
            .take(err.line().saturating_sub(1))
            .map(str::len)
            .sum();
        let offset = (line_start + err.column()).min(json.len());

        Self::Parse { message, offset }
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { message, offset } => write!(f, "JSON parse error: {message} ({offset})"),
            Self::Data(err) => write!(f, "JSON data error: {err}"),
            Self::Serialize(err) => write!(f, "JSON serialization error: {err}"),
            Self::Instantiate { id } => {
                write!(f, "no instantiator of reflectable {id} accepts these arguments")
            }
        }
    }
}

impl error::Error for JsonError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Data(err) | Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Front-end

/// Writes `value` as a JSON object.
pub fn to_json_string(
    db: &TypeInfoDatabase,
    value: &dyn Reflect,
    config: SerializeConfig,
) -> Result<String, JsonError> {
    serde_json::to_string(&ReflectSerializer::new(db, value, config)).map_err(JsonError::Serialize)
}

/// Fills `target` from a JSON object.
///
/// The whole document is checked first, so a syntax error leaves `target`
/// untouched. A data error may leave it partially filled.
pub fn from_json_str(
    db: &TypeInfoDatabase,
    json: &str,
    target: &mut dyn Reflect,
    config: SerializeConfig,
) -> Result<(), JsonError> {
    if let Err(err) = serde_json::from_str::<IgnoredAny>(json) {
        return Err(JsonError::parse(json, &err));
    }

    let mut deserializer = serde_json::Deserializer::from_str(json);
    ReflectDeserializer::new(db, target, config)
        .deserialize(&mut deserializer)
        .map_err(JsonError::Data)?;
    deserializer.end().map_err(JsonError::Data)
}

/// Instantiates `T` with `&()` arguments and fills it from `json`.
pub fn deserialize_json<T: Reflectable>(
    db: &TypeInfoDatabase,
    json: &str,
) -> Result<Box<T>, JsonError> {
    let Some(mut value) = db.instantiate_class::<T>(&()) else {
        return Err(JsonError::Instantiate {
            id: db.id_of::<T>().unwrap_or(INVALID_REFLECTABLE_ID),
        });
    };
    from_json_str(db, json, &mut *value, SerializeConfig::default())?;
    Ok(value)
}

/// Instantiates the class `id` with `args` and fills it from `json`.
pub fn deserialize_json_by_id(
    db: &TypeInfoDatabase,
    json: &str,
    id: ReflectableId,
    args: &dyn Any,
) -> Result<Box<dyn Reflect>, JsonError> {
    let Some(mut value) = db.try_instantiate(id, args) else {
        return Err(JsonError::Instantiate { id });
    };
    from_json_str(db, json, &mut *value, SerializeConfig::default())?;
    Ok(value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{JsonError, deserialize_json, deserialize_json_by_id, from_json_str, to_json_string};
    use crate::serde::SerializeConfig;
    use crate::tests_support::*;
    use alloc::string::ToString;

    #[test]
    fn golden_compound() {
        let db = database();
        let json = to_json_string(&db, &TestCompound2::default(), SerializeConfig::default());
        assert_eq!(json.unwrap(), r#"{"leet":1337,"copyable":{"aUselessProp":4.0}}"#);

        let parsed = deserialize_json::<TestCompound2>(&db, r#"{"leet":12}"#).unwrap();
        assert_eq!(parsed.leet, 12);
        assert_eq!(parsed.copyable.a_useless_prop, 4.0);
    }

    #[test]
    fn syntax_errors_leave_target_untouched() {
        let db = database();
        let mut compound = TestCompound2::default();

        for bad in [r#"{"leet": }"#, r#"{"leet": 5} x"#, "", r#"{"leet": 5"#] {
            let err = from_json_str(&db, bad, &mut compound, SerializeConfig::default())
                .unwrap_err();
            let JsonError::Parse { offset, .. } = &err else {
                panic!("`{bad}` should be a parse error, got {err}");
            };
            assert!(*offset <= bad.len());
            assert!(err.to_string().starts_with("JSON parse error: "));
            assert_eq!(compound.leet, 1337);
        }

        let err = from_json_str(&db, r#"{"leet": 5"#, &mut compound, SerializeConfig::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "JSON parse error: EOF while parsing an object (10)");
    }

    #[test]
    fn data_errors() {
        let db = database();
        let mut compound = TestCompound2::default();
        assert!(matches!(
            from_json_str(&db, "[1, 2]", &mut compound, SerializeConfig::default()),
            Err(JsonError::Data(_))
        ));
        assert!(matches!(
            from_json_str(&db, r#"{"leet": true}"#, &mut compound, SerializeConfig::default()),
            Err(JsonError::Data(_))
        ));
    }

    #[test]
    fn map_keys_round_trip() {
        let db = database();
        let mut even_odd = MapType::default();
        for i in -2..3 {
            even_odd.a_even_odd_map.insert(i, i % 2 == 0);
        }

        let json = to_json_string(&db, &even_odd, SerializeConfig::default()).unwrap();
        assert_eq!(
            json,
            r#"{"aEvenOddMap":{"-2":true,"-1":false,"0":true,"1":false,"2":true}}"#
        );
        assert_eq!(*deserialize_json::<MapType>(&db, &json).unwrap(), even_odd);

        assert!(matches!(
            deserialize_json::<MapType>(&db, r#"{"aEvenOddMap":{"one":true}}"#),
            Err(JsonError::Data(_))
        ));
    }

    #[test]
    fn instantiation() {
        let db = database();
        let c = db.id_of::<C>().unwrap();
        let value = deserialize_json_by_id(&db, r#"{"ctoto": 7, "atiti": true}"#, c, &()).unwrap();
        let value = value.downcast_ref::<C>().unwrap();
        assert_eq!(value.ctoto, 7);
        assert!(value.base.base.atiti);

        let custom = db.id_of::<CustomInstantiated>().unwrap();
        assert!(matches!(
            deserialize_json_by_id(&db, "{}", custom, &()),
            Err(JsonError::Instantiate { .. })
        ));
        assert!(deserialize_json_by_id(&db, "{}", custom, &3i32).is_ok());
        assert!(matches!(
            deserialize_json::<CustomInstantiated>(&db, "{}"),
            Err(JsonError::Instantiate { id }) if id == custom
        ));
    }
}
