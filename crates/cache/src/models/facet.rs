//! Compact JSON shapes for list-valued columns.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use facet_json::{from_str as from_json, to_string as to_json};
use horadric_extract::models as extract;

#[derive(facet::Facet)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct ModifierProxy {
    #[facet(rename = "c")]
    code: String,
    #[facet(rename = "p", default, skip_serializing_if = String::is_empty)]
    param: String,
    #[facet(rename = "lo")]
    min: i64,
    #[facet(rename = "hi")]
    max: i64,
    #[facet(rename = "d", default, skip_serializing_if = String::is_empty)]
    detail: String,
}
impl From<&extract::Modifier> for ModifierProxy {
    fn from(modifier: &extract::Modifier) -> Self {
        Self {
            code: modifier.code.clone(),
            param: modifier.param.clone(),
            min: modifier.min,
            max: modifier.max,
            detail: modifier.detail.clone(),
        }
    }
}
impl From<ModifierProxy> for extract::Modifier {
    fn from(modifier: ModifierProxy) -> Self {
        Self {
            code: modifier.code,
            param: modifier.param,
            min: modifier.min,
            max: modifier.max,
            detail: modifier.detail,
        }
    }
}

#[derive(facet::Facet)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct SocketEffectsProxy {
    #[facet(rename = "w", default)]
    weapon: Vec<String>,
    #[facet(rename = "h", default)]
    helm: Vec<String>,
    #[facet(rename = "s", default)]
    shield: Vec<String>,
}
impl From<&extract::SocketEffects> for SocketEffectsProxy {
    fn from(effects: &extract::SocketEffects) -> Self {
        Self {
            weapon: effects.weapon.clone(),
            helm: effects.helm.clone(),
            shield: effects.shield.clone(),
        }
    }
}
impl From<SocketEffectsProxy> for extract::SocketEffects {
    fn from(effects: SocketEffectsProxy) -> Self {
        Self {
            weapon: effects.weapon,
            helm: effects.helm,
            shield: effects.shield,
        }
    }
}

pub(crate) fn modifiers_to_json(modifiers: &[extract::Modifier], field: &'static str) -> Result<String> {
    let proxies = modifiers.iter().map(ModifierProxy::from).collect::<Vec<_>>();
    to_json(&proxies).or_raise(|| ErrorKind::InvalidData(field))
}

pub(crate) fn modifiers_from_json(json: &str, field: &'static str) -> Result<Vec<extract::Modifier>> {
    Ok(from_json::<Vec<ModifierProxy>>(json)
        .or_raise(|| ErrorKind::InvalidData(field))?
        .into_iter()
        .map(extract::Modifier::from)
        .collect())
}

pub(crate) fn strings_to_json(values: &[String], field: &'static str) -> Result<String> {
    to_json(&values.to_vec()).or_raise(|| ErrorKind::InvalidData(field))
}

pub(crate) fn strings_from_json(json: &str, field: &'static str) -> Result<Vec<String>> {
    from_json::<Vec<String>>(json).or_raise(|| ErrorKind::InvalidData(field))
}

pub(crate) fn effects_to_json(effects: &extract::SocketEffects) -> Result<String> {
    to_json(&SocketEffectsProxy::from(effects)).or_raise(|| ErrorKind::InvalidData("socket effects"))
}

pub(crate) fn effects_from_json(json: &str) -> Result<extract::SocketEffects> {
    Ok(from_json::<SocketEffectsProxy>(json)
        .or_raise(|| ErrorKind::InvalidData("socket effects"))?
        .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        ModifierProxy{code: "str".to_string(), param: String::new(), min: 10, max: 20, detail: String::new()},
        r#"{"c":"str","lo":10,"hi":20}"#
    )]
    #[case(
        ModifierProxy{code: "oskill".to_string(), param: "Teleport".to_string(), min: 1, max: 1, detail: "Sorceress".to_string()},
        r#"{"c":"oskill","p":"Teleport","lo":1,"hi":1,"d":"Sorceress"}"#
    )]
    fn test_modifier_serialize(#[case] input: ModifierProxy, #[case] expected: &str) {
        assert_eq!(to_json(&input).unwrap(), expected);
    }

    #[rstest]
    #[case(r#"{"c":"str","lo":10,"hi":20}"#, "str", "")]
    #[case(r#"{"c":"oskill","p":"Teleport","lo":1,"hi":1,"d":"Sorceress"}"#, "oskill", "Sorceress")]
    fn test_modifier_deserialize(#[case] input: &str, #[case] code: &str, #[case] detail: &str) {
        let proxy = from_json::<ModifierProxy>(input).unwrap();
        assert_eq!(proxy.code, code);
        assert_eq!(proxy.detail, detail);
    }

    #[test]
    fn test_modifier_list_round_trip() {
        let modifiers = vec![
            extract::Modifier {
                code: "reanimate".to_string(),
                param: "4".to_string(),
                min: 10,
                max: 10,
                detail: "Zombie".to_string(),
            },
            extract::Modifier {
                code: "dmg%".to_string(),
                param: String::new(),
                min: -5,
                max: 300,
                detail: String::new(),
            },
        ];
        let json = modifiers_to_json(&modifiers, "modifiers").unwrap();
        assert_eq!(modifiers_from_json(&json, "modifiers").unwrap(), modifiers);
        assert_eq!(modifiers_to_json(&[], "modifiers").unwrap(), "[]");
    }

    #[test]
    fn test_effects_missing_keys_default() {
        let effects = effects_from_json(r#"{"w":["+1 Light Radius"]}"#).unwrap();
        assert_eq!(effects.weapon, vec!["+1 Light Radius"]);
        assert!(effects.helm.is_empty());
        assert!(effects_from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let err = strings_from_json("not json", "runes").unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidData("runes")));
    }
}
