use std::collections::{BTreeMap, HashMap};

use serde_json::{Value, json};
use sprocket::decode::{
    Attempt, Container, Coordinate, Decodable, DecodeError, Fields, KeyDecodable, as_container,
    decode, decode_key_value,
};
use time::{Duration, OffsetDateTime, macros::datetime};

#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum GameObjective {
    War,
    Trade,
    Fun,
}

impl KeyDecodable for GameObjective {
    fn from_key(key: &str) -> Result<Self, DecodeError> {
        match key {
            "war" => Ok(Self::War),
            "trade" => Ok(Self::Trade),
            "fun" => Ok(Self::Fun),
            _ => Err(DecodeError::invalid("GameObjective key", &json!(key))),
        }
    }
}

impl Decodable for GameObjective {
    fn from_value(value: &Value) -> Attempt<Self> {
        decode_key_value(value)
    }
}

#[derive(Debug, PartialEq)]
struct SkillInfo {
    level: i64,
    score: f64,
}

impl Decodable for SkillInfo {
    fn from_value(value: &Value) -> Attempt<Self> {
        let json = as_container(value, "skill info")?;
        Ok(Some(Self {
            level: json.require("level")?,
            score: json.require("score")?,
        }))
    }
}

fn container(value: Value) -> Container {
    match value {
        Value::Object(map) => map,
        _ => panic!("test input must be an object"),
    }
}

fn invalid(context: &str, value: Value) -> DecodeError {
    DecodeError::Invalid {
        context: context.to_owned(),
        value,
    }
}

#[test]
fn strict_matches_direct_decoding() {
    let json = container(json!({ "count": 3, "label": "three", "ratio": "0.25" }));

    assert_eq!(json.require::<i64>("count").unwrap(), 3);
    assert_eq!(
        json.require::<String>("label").unwrap(),
        decode::<String>(&json["label"]).unwrap()
    );
    assert_eq!(json.require::<f64>("ratio").unwrap(), 0.25);
}

#[test]
fn absent_key() {
    let json = container(json!({ "other": 1 }));
    let missing = DecodeError::Missing("count".to_owned());

    assert_eq!(json.require::<i64>("count").unwrap_err(), missing);
    assert_eq!(json.optional::<i64>("count").unwrap_err(), missing);
    assert_eq!(json.coerced::<i64>("count"), None);

    assert_eq!(json.require_vec::<i64>("count").unwrap_err(), missing);
    assert_eq!(json.optional_vec::<i64>("count").unwrap_err(), missing);
    assert!(json.coerced_vec::<i64>("count").is_empty());

    assert_eq!(
        json.require_map::<String, i64>("count").unwrap_err(),
        missing
    );
    assert_eq!(
        json.optional_map::<String, i64>("count").unwrap_err(),
        missing
    );
    assert!(json.coerced_map::<String, i64>("count").is_empty());
}

#[test]
fn malformed_value() {
    let json = container(json!({ "count": "three", "flag": "yes" }));

    assert_eq!(
        json.require::<i64>("count").unwrap_err(),
        invalid("count", json!("three"))
    );
    assert_eq!(json.optional::<i64>("count").unwrap(), None);
    assert_eq!(json.coerced::<i64>("count"), None);

    // Booleans fail with their own error rather than returning nothing.
    assert_eq!(
        json.require::<bool>("flag").unwrap_err(),
        invalid("Value not a valid bool string input", json!("yes"))
    );
    assert_eq!(json.optional::<bool>("flag").unwrap(), None);
    assert_eq!(json.coerced::<bool>("flag"), None);
}

#[test]
fn optional_propagates_nested_absent_key() {
    let json = container(json!({ "skill": { "level": 1 } }));

    assert_eq!(
        json.optional::<SkillInfo>("skill").unwrap_err(),
        DecodeError::Missing("score".to_owned())
    );
    assert_eq!(json.coerced::<SkillInfo>("skill"), None);
}

#[test]
fn optional_null() {
    let json = container(json!({ "nickName": null }));

    assert_eq!(json.optional::<String>("nickName").unwrap(), None);
    assert_eq!(
        json.require::<String>("nickName").unwrap_err(),
        invalid("nickName", Value::Null)
    );
}

#[test]
fn sequence_reports_first_failure() {
    let json = container(json!({ "values": [1, 2, "x", null] }));

    assert_eq!(
        json.require_vec::<i64>("values").unwrap_err(),
        invalid("Error processing array(values) element", json!("x"))
    );
    assert_eq!(json.optional_vec::<i64>("values").unwrap(), None);
    assert!(json.coerced_vec::<i64>("values").is_empty());
}

#[test]
fn sequence_of_nested_values() {
    let json = container(json!({
        "skills": [{ "level": 1, "score": 0.5 }, { "level": "2", "score": 1 }],
    }));

    assert_eq!(
        json.require_vec::<SkillInfo>("skills").unwrap(),
        vec![
            SkillInfo {
                level: 1,
                score: 0.5
            },
            SkillInfo {
                level: 2,
                score: 1.0
            },
        ]
    );
    assert_eq!(json.require::<Vec<SkillInfo>>("skills").unwrap().len(), 2);
}

#[test]
fn sequence_with_nested_absent_key() {
    let json = container(json!({ "skills": [{ "level": 1 }] }));

    assert_eq!(
        json.require_vec::<SkillInfo>("skills").unwrap_err(),
        DecodeError::Missing("score".to_owned())
    );
    assert_eq!(
        json.optional_vec::<SkillInfo>("skills").unwrap_err(),
        DecodeError::Missing("score".to_owned())
    );
    assert!(json.coerced_vec::<SkillInfo>("skills").is_empty());

    // A malformed element is still absorbed.
    let json = container(json!({ "skills": [{ "level": 1, "score": "high" }] }));

    assert_eq!(json.optional_vec::<SkillInfo>("skills").unwrap(), None);
    assert!(json.coerced_vec::<SkillInfo>("skills").is_empty());
}

#[test]
fn sequence_of_wrong_shape() {
    let json = container(json!({ "values": { "a": 1 } }));

    assert_eq!(
        json.require_vec::<i64>("values").unwrap_err(),
        invalid("Failed to convert values to array", json!({ "a": 1 }))
    );
    assert_eq!(json.optional_vec::<i64>("values").unwrap(), None);
    assert!(json.coerced_vec::<i64>("values").is_empty());

    // Through the scalar accessor, the wrong shape is reported against the key.
    assert_eq!(
        json.require::<Vec<i64>>("values").unwrap_err(),
        invalid("values", json!({ "a": 1 }))
    );
}

#[test]
fn keyed_map_with_enum_keys() {
    let json = container(json!({
        "playerAbilities": { "war": { "level": 1, "score": 0.5 } },
    }));

    let abilities = json
        .require_map::<GameObjective, SkillInfo>("playerAbilities")
        .unwrap();

    assert_eq!(abilities.len(), 1);
    assert_eq!(
        abilities[&GameObjective::War],
        SkillInfo {
            level: 1,
            score: 0.5
        }
    );
}

#[test]
fn keyed_map_with_unknown_key() {
    let json = container(json!({
        "playerAbilities": {
            "war": { "level": 1, "score": 0.5 },
            "raid": { "level": 2, "score": 0.1 },
        },
    }));

    assert_eq!(
        json.require_map::<GameObjective, SkillInfo>("playerAbilities")
            .unwrap_err(),
        invalid("GameObjective key", json!("raid"))
    );
    assert_eq!(
        json.optional_map::<GameObjective, SkillInfo>("playerAbilities")
            .unwrap(),
        None
    );
    assert!(
        json.coerced_map::<GameObjective, SkillInfo>("playerAbilities")
            .is_empty()
    );
}

#[test]
fn keyed_map_with_malformed_entry() {
    let json = container(json!({ "itemsCounts": { "a": 1, "b": "many" } }));

    assert_eq!(
        json.require_map::<String, i64>("itemsCounts").unwrap_err(),
        invalid("Error processing dictionary(itemsCounts) entry", json!("many"))
    );
    assert_eq!(
        json.optional_map::<String, i64>("itemsCounts").unwrap(),
        None
    );
    assert!(json.coerced_map::<String, i64>("itemsCounts").is_empty());
}

#[test]
fn keyed_map_with_nested_absent_key() {
    let json = container(json!({
        "playerAbilities": { "war": { "level": 1 } },
    }));

    assert_eq!(
        json.require_map::<GameObjective, SkillInfo>("playerAbilities")
            .unwrap_err(),
        DecodeError::Missing("score".to_owned())
    );
    assert_eq!(
        json.optional_map::<GameObjective, SkillInfo>("playerAbilities")
            .unwrap_err(),
        DecodeError::Missing("score".to_owned())
    );
    assert!(
        json.coerced_map::<GameObjective, SkillInfo>("playerAbilities")
            .is_empty()
    );
}

#[test]
fn keyed_map_of_wrong_shape() {
    let json = container(json!({ "itemsCounts": [1, 2] }));

    assert_eq!(
        json.require_map::<String, i64>("itemsCounts").unwrap_err(),
        invalid("Failed to convert itemsCounts to dictionary", json!([1, 2]))
    );
    assert_eq!(
        json.optional_map::<String, i64>("itemsCounts").unwrap(),
        None
    );
}

#[test]
fn keyed_map_with_integer_keys() {
    let json = container(json!({ "ranks": { "1": "gold", "2": "silver" } }));

    let ranks: BTreeMap<u32, String> = json.require("ranks").unwrap();
    assert_eq!(
        ranks.into_iter().collect::<Vec<_>>(),
        vec![(1, "gold".to_owned()), (2, "silver".to_owned())]
    );

    let json = container(json!({ "ranks": { "first": "gold" } }));
    assert!(json.require::<HashMap<u32, String>>("ranks").is_err());
}

#[test]
fn enum_values_decode_from_strings() {
    assert_eq!(
        decode::<GameObjective>(&json!("trade")).unwrap(),
        GameObjective::Trade
    );
    assert_eq!(
        decode::<GameObjective>(&json!(3)).unwrap_err(),
        invalid("Invalid key for GameObjective", json!(3))
    );
}

#[test]
fn booleans() {
    for value in [json!(true), json!("true"), json!("TRUE"), json!(1), json!("1")] {
        assert!(decode::<bool>(&value).unwrap(), "{value}");
    }

    for value in [json!(false), json!("false"), json!(0), json!("0")] {
        assert!(!decode::<bool>(&value).unwrap(), "{value}");
    }

    for value in [json!(2), json!("yes"), Value::Null] {
        assert!(
            matches!(decode::<bool>(&value), Err(DecodeError::Invalid { .. })),
            "{value}"
        );
    }
}

#[test]
fn integers() {
    assert_eq!(decode::<i64>(&json!(42)).unwrap(), 42);
    assert_eq!(decode::<i64>(&json!("-42")).unwrap(), -42);
    assert_eq!(decode::<i32>(&json!(4.0)).unwrap(), 4);
    assert_eq!(decode::<u64>(&json!(u64::MAX)).unwrap(), u64::MAX);

    assert_eq!(i64::from_value(&json!(4.5)).unwrap(), None);
    assert_eq!(u8::from_value(&json!(300)).unwrap(), None);
    assert_eq!(u32::from_value(&json!(-1)).unwrap(), None);
    assert_eq!(i64::from_value(&json!("4 2")).unwrap(), None);
    assert_eq!(i64::from_value(&json!(true)).unwrap(), None);
}

#[test]
fn floats() {
    assert_eq!(decode::<f64>(&json!(2.5)).unwrap(), 2.5);
    assert_eq!(decode::<f64>(&json!(3)).unwrap(), 3.0);
    assert_eq!(decode::<f64>(&json!("-1.5")).unwrap(), -1.5);
    assert_eq!(decode::<f32>(&json!(0.5)).unwrap(), 0.5);
    assert_eq!(f64::from_value(&json!([1.0])).unwrap(), None);
}

#[test]
fn strings() {
    assert_eq!(decode::<String>(&json!("text")).unwrap(), "text");
    assert_eq!(String::from_value(&json!(5)).unwrap(), None);
    assert_eq!(
        decode::<String>(&json!(5)).unwrap_err(),
        invalid("Failed to decode String", json!(5))
    );
}

#[test]
fn untyped_values_pass_through() {
    let json = container(json!({ "extra": { "any": ["thing"] } }));

    assert_eq!(
        json.require::<Value>("extra").unwrap(),
        json!({ "any": ["thing"] })
    );
}

#[test]
fn dates() {
    let expected = datetime!(2020-01-02 03:04:05 UTC);

    assert_eq!(
        decode::<OffsetDateTime>(&json!("2020-01-02T03:04:05+0000")).unwrap(),
        expected
    );
    assert_eq!(
        decode::<OffsetDateTime>(&json!("2020-01-02T03:04:05+00:00")).unwrap(),
        expected
    );
    assert_eq!(
        decode::<OffsetDateTime>(&json!("2020-01-02T03:04:05.500+0000")).unwrap(),
        expected + Duration::milliseconds(500)
    );
    assert_eq!(
        decode::<OffsetDateTime>(&json!("2020-01-02T03:04:05Z")).unwrap(),
        expected
    );
    assert_eq!(
        decode::<OffsetDateTime>(&json!(1577934245)).unwrap(),
        expected
    );
    assert_eq!(
        decode::<OffsetDateTime>(&json!(1577934245.25)).unwrap(),
        expected + Duration::milliseconds(250)
    );
}

#[test]
fn dates_are_normalised_to_utc() {
    let time = decode::<OffsetDateTime>(&json!("2020-01-02T05:04:05+02:00")).unwrap();

    assert_eq!(time, datetime!(2020-01-02 03:04:05 UTC));
    assert!(time.offset().is_utc());
}

#[test]
fn malformed_dates() {
    assert_eq!(
        decode::<OffsetDateTime>(&json!("not-a-date")).unwrap_err(),
        invalid("No date format matched", json!("not-a-date"))
    );
    assert_eq!(
        decode::<OffsetDateTime>(&Value::Null).unwrap_err(),
        invalid("Couldn't convert to date", Value::Null)
    );
    assert_eq!(
        decode::<OffsetDateTime>(&json!(1e30)).unwrap_err(),
        invalid("Couldn't convert to date", json!(1e30))
    );
    assert_eq!(
        decode::<OffsetDateTime>(&json!(-1e300)).unwrap_err(),
        invalid("Couldn't convert to date", json!(-1e300))
    );
    assert!(decode::<OffsetDateTime>(&json!(i64::MAX)).is_err());

    let json = container(json!({ "dateOfBirth": "yesterday" }));
    assert_eq!(json.optional::<OffsetDateTime>("dateOfBirth").unwrap(), None);
}

#[test]
fn coordinates() {
    let json = container(json!({
        "location": { "latitude": 51.5, "longitude": "-0.25" },
        "partial": { "latitude": 51.5 },
        "flat": [51.5, -0.25],
    }));

    assert_eq!(
        json.require::<Coordinate>("location").unwrap(),
        Coordinate {
            latitude: 51.5,
            longitude: -0.25
        }
    );
    assert_eq!(
        json.require::<Coordinate>("partial").unwrap_err(),
        DecodeError::Missing("longitude".to_owned())
    );
    assert!(matches!(
        json.require::<Coordinate>("flat"),
        Err(DecodeError::Invalid { .. })
    ));
}

#[test]
fn error_messages_name_the_key() {
    let missing = DecodeError::Missing("team".to_owned());
    assert_eq!(missing.to_string(), "Missing key `team`.");

    let invalid = invalid("count", json!("three"));
    assert_eq!(invalid.to_string(), "Invalid value for count: \"three\".");
}
