//! Effect text scraped from the gems and runewords reference pages.
//!
//! Both maps are keyed by [`reference_key`] of the display name so that
//! small spelling differences between the page and the tables still join.

use super::reference_key;
use crate::html::anchored_rows;
use crate::models::SocketEffects;
use scraper::Html;
use std::collections::HashMap;
use tracing::instrument;

const NAME: &[&str] = &["Name", "Gem", "Gems", "Rune", "Runes", "Item"];
const WEAPON: &[&str] = &["Weapon", "Weapons"];
const HELM: &[&str] = &["Helm", "Helms", "Armor", "Armour", "Helm/Armor", "Armor/Helm", "Body Armor/Helm"];
const SHIELD: &[&str] = &["Shield", "Shields"];
const RUNEWORD: &[&str] = &["Runeword", "Runewords", "Rune Word", "Name"];
const EFFECTS: &[&str] = &["Stats", "Properties", "Effects", "Bonuses", "Attributes"];

/// Socket effects per gem/rune name. Pages without a recognisable table
/// produce an empty map.
#[instrument(level = "debug", skip_all, fields(html_size = html.len()))]
pub fn gem_effects(html: &str) -> HashMap<String, SocketEffects> {
    let document = Html::parse_document(html);
    let mut effects = HashMap::new();
    for row in anchored_rows(&document, &[NAME, WEAPON, HELM, SHIELD]) {
        let [name, weapon, helm, shield]: [Vec<String>; 4] = match row.try_into() {
            Ok(cells) => cells,
            Err(_) => continue,
        };
        let Some(name) = name.first() else {
            continue;
        };
        effects
            .entry(reference_key(name))
            .or_insert(SocketEffects { weapon, helm, shield });
    }
    effects
}

/// Effect lines per runeword name.
#[instrument(level = "debug", skip_all, fields(html_size = html.len()))]
pub fn runeword_effects(html: &str) -> HashMap<String, Vec<String>> {
    let document = Html::parse_document(html);
    let mut effects = HashMap::new();
    for row in anchored_rows(&document, &[RUNEWORD, EFFECTS]) {
        let [name, lines]: [Vec<String>; 2] = match row.try_into() {
            Ok(cells) => cells,
            Err(_) => continue,
        };
        if let Some(name) = name.first() {
            effects.entry(reference_key(name)).or_insert(lines);
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gem_effects() {
        let html = r#"<html><body><h2>Runes</h2><table>
            <thead><tr><th>Rune</th><th>Level</th><th>Weapon</th><th>Armor</th><th>Shield</th></tr></thead>
            <tbody>
              <tr><td>El Rune</td><td>11</td><td>+50 to Attack Rating<br>+1 Light Radius</td><td>+15 Defense</td><td>+15 Defense</td></tr>
              <tr><td>Eld Rune</td><td>11</td><td>+75% Damage to Undead</td><td>15% Slower Stamina Drain</td><td>7% Increased Chance of Blocking</td></tr>
            </tbody></table></body></html>"#;
        let effects = gem_effects(html);
        assert_eq!(effects.len(), 2);
        let el = &effects[&reference_key("El Rune")];
        assert_eq!(el.weapon, vec!["+50 to Attack Rating", "+1 Light Radius"]);
        assert_eq!(el.helm, vec!["+15 Defense"]);
    }

    #[test]
    fn test_runeword_effects() {
        let html = r#"<table>
            <tr><th>Runeword</th><th>Runes</th><th>Stats</th></tr>
            <tr><td>Spirit</td><td>Tal Thul Ort Amn</td><td>+2 To All Skills<br>+25-35% Faster Cast Rate</td></tr>
        </table>"#;
        let effects = runeword_effects(html);
        assert_eq!(effects[&reference_key("Spirit")], vec!["+2 To All Skills", "+25-35% Faster Cast Rate"]);
    }

    #[test]
    fn test_drifted_markup_is_empty_not_fatal() {
        assert!(gem_effects("<div>We moved the gems to a new page!</div>").is_empty());
        assert!(runeword_effects("").is_empty());
    }
}
