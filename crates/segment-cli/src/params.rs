//! Translation of parsed CLI arguments into request bodies for the
//! reservation service.

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::SegmentCliError;
use models::NetworkType;

/// Parses repeated `--extra <key>=<value>` pairs, splitting on the first `=`.
/// Multiple copies of the same key result in only the last value being kept.
pub fn parse_extras(pairs: &[String]) -> Result<BTreeMap<String, String>, SegmentCliError> {
    let mut extras = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| SegmentCliError::MalformedExtra(pair.clone()))?;
        extras.insert(key.to_string(), value.to_string());
    }
    Ok(extras)
}

/// Builds the create body, enforcing the cross-field rule: a physical
/// network must accompany a vlan segment and nothing else.
pub fn build_create_body(
    network_type: &str,
    physical_network: Option<&str>,
    segment_id: u32,
    extra: &[String],
) -> Result<Value, SegmentCliError> {
    let network_type = NetworkType::from_str(network_type)
        .map_err(|_| SegmentCliError::BadNetworkType(network_type.to_string()))?;

    match (network_type.requires_physical_network(), physical_network) {
        (true, None) => return Err(SegmentCliError::MissingPhysicalNetwork),
        (false, Some(_)) => {
            return Err(SegmentCliError::UnexpectedPhysicalNetwork(network_type));
        }
        _ => {}
    }

    let mut params = Map::new();
    params.insert("network_type".to_string(), json!(network_type));
    if let Some(physical) = physical_network {
        params.insert("physical_network".to_string(), json!(physical));
    }
    params.insert("segment_id".to_string(), json!(segment_id));
    for (key, value) in parse_extras(extra)? {
        params.insert(key, Value::String(value));
    }

    Ok(Value::Object(params))
}

/// Update bodies only carry extra-capability changes, wrapped under `values`.
pub fn build_update_body(extra: &[String]) -> Result<Value, SegmentCliError> {
    let extras = parse_extras(extra)?;
    Ok(json!({ "values": extras }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn later_extra_occurrences_override_earlier_ones() {
        let body = build_create_body("flat", None, 100, &strings(&["a=1", "a=2"])).unwrap();
        assert_eq!(body["a"], "2");
    }

    #[test]
    fn extras_split_on_the_first_equals_sign() {
        let extras = parse_extras(&strings(&["filter===v"])).unwrap();
        assert_eq!(extras.get("filter").map(String::as_str), Some("==v"));

        let err = parse_extras(&strings(&["no-separator"])).unwrap_err();
        assert!(matches!(err, SegmentCliError::MalformedExtra(_)));
    }

    #[test]
    fn vlan_requires_a_physical_network() {
        let err = build_create_body("vlan", None, 1234, &[]).unwrap_err();
        assert!(matches!(err, SegmentCliError::MissingPhysicalNetwork));

        let body = build_create_body("vlan", Some("physnet1"), 1234, &[]).unwrap();
        assert_eq!(body["network_type"], "vlan");
        assert_eq!(body["physical_network"], "physnet1");
        assert_eq!(body["segment_id"], 1234);
    }

    #[test]
    fn non_vlan_segments_reject_a_physical_network() {
        let err = build_create_body("flat", Some("physnet1"), 100, &[]).unwrap_err();
        assert!(matches!(
            err,
            SegmentCliError::UnexpectedPhysicalNetwork(NetworkType::Flat)
        ));

        let body = build_create_body("flat", None, 100, &[]).unwrap();
        assert!(body.get("physical_network").is_none());
    }

    #[test]
    fn unknown_network_types_are_rejected() {
        let err = build_create_body("token-ring", None, 1, &[]).unwrap_err();
        assert!(matches!(err, SegmentCliError::BadNetworkType(t) if t == "token-ring"));
    }

    #[test]
    fn update_body_wraps_extras_under_values() {
        let body = build_update_body(&strings(&["usage_type=storage"])).unwrap();
        assert_eq!(body["values"]["usage_type"], "storage");
    }

    proptest::proptest! {
        #[test]
        fn any_extras_map_survives_the_pair_syntax(map in testing_utils::extras_strategy()) {
            let pairs: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k}={}", v.as_str().unwrap()))
                .collect();

            let parsed = parse_extras(&pairs).unwrap();
            for (key, value) in &map {
                proptest::prop_assert_eq!(
                    parsed.get(key).map(String::as_str),
                    value.as_str()
                );
            }
        }
    }
}
