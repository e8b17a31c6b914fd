use std::fs;
use std::path::PathBuf;

use serde_json::json;

use roster_terminal::players_fetch::{
    normalize_image_url, parse_players_json, IMAGE_URL_ALIASES, OBJECT_URL_KEYS,
};
use roster_terminal::state::Sport;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_players_fixture() {
    let raw = read_fixture("players.json");
    let players = parse_players_json(&raw).expect("fixture should parse");

    // Six rows in the fixture, one without an id that must be dropped.
    assert_eq!(players.len(), 5);

    let avery = &players[0];
    assert_eq!(avery.full_name, "Avery Cole");
    assert_eq!(avery.position, "QB");
    assert_eq!(avery.jersey_number, Some(2));
    assert_eq!(avery.sport, Some(Sport::Football));
    assert_eq!(avery.team.as_deref(), Some("Ridgeview Hawks"));
    assert_eq!(
        avery.url.as_deref(),
        Some("https://cdn.example.com/players/avery-cole.png")
    );

    assert!(players.iter().all(|p| p.full_name != "Missing Id"));
}

#[test]
fn fixture_rows_keep_backend_order() {
    let raw = read_fixture("players.json");
    let players = parse_players_json(&raw).expect("fixture should parse");
    let names: Vec<&str> = players.iter().map(|p| p.full_name.as_str()).collect();
    assert_eq!(
        names,
        ["Avery Cole", "Marcus Webb", "Dane Okafor", "Silas Vann", "Jonah Price"]
    );
}

#[test]
fn alias_precedence_is_the_documented_constant() {
    assert_eq!(
        IMAGE_URL_ALIASES,
        ["url", "image_url", "photo_url", "avatar_url", "image", "photo", "avatar"]
    );
    assert_eq!(OBJECT_URL_KEYS, ["url", "fullUrl", "uri"]);
}

#[test]
fn each_alias_resolves_on_its_own() {
    for alias in IMAGE_URL_ALIASES {
        let row = json!({ "id": "p1", alias: "https://x.example/img.png" });
        assert_eq!(
            normalize_image_url(&row).as_deref(),
            Some("https://x.example/img.png"),
            "alias {alias} should resolve"
        );
    }
}

#[test]
fn first_non_null_alias_wins() {
    let row = json!({ "url": "A", "image_url": "B" });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("A"));

    // A null higher-precedence alias falls through to the next one.
    let row = json!({ "url": null, "image_url": "B" });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("B"));
}

#[test]
fn string_values_are_trimmed_and_unquoted() {
    let row = json!({ "url": "  https://x  " });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("https://x"));

    let row = json!({ "url": "\"https://x\"" });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("https://x"));

    // Only one layer of quotes is stripped.
    let row = json!({ "url": "\"\"https://x\"\"" });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("\"https://x\""));
}

#[test]
fn object_values_probe_nested_keys_in_order() {
    let row = json!({ "url": { "fullUrl": "https://y" } });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("https://y"));

    let row = json!({ "url": { "uri": "https://z" } });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("https://z"));

    let row = json!({ "url": { "url": "https://a", "fullUrl": "https://b" } });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("https://a"));
}

#[test]
fn opaque_object_falls_back_to_json_text() {
    let row = json!({ "url": {} });
    assert_eq!(normalize_image_url(&row).as_deref(), Some("{}"));
}

#[test]
fn all_aliases_null_or_absent_is_none() {
    let row = json!({ "id": "p1", "full_name": "No Image" });
    assert_eq!(normalize_image_url(&row), None);

    let row = json!({ "url": null, "image_url": null, "photo": null });
    assert_eq!(normalize_image_url(&row), None);
}

#[test]
fn numeric_ids_are_stringified() {
    let raw = json!([{ "id": 42, "full_name": "Numeric Id" }]).to_string();
    let players = parse_players_json(&raw).expect("rows should parse");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, "42");
}

#[test]
fn unknown_sport_defaults_to_none() {
    let raw = json!([{ "id": "p1", "full_name": "X", "sport": "curling" }]).to_string();
    let players = parse_players_json(&raw).expect("rows should parse");
    assert_eq!(players[0].sport, None);
}

#[test]
fn jersey_number_accepts_string_digits() {
    let raw = json!([{ "id": "p1", "jersey_number": "9" }]).to_string();
    let players = parse_players_json(&raw).expect("rows should parse");
    assert_eq!(players[0].jersey_number, Some(9));
}

#[test]
fn null_body_is_empty() {
    assert!(parse_players_json("null").expect("null should parse").is_empty());
    assert!(parse_players_json("").expect("empty should parse").is_empty());
    assert!(parse_players_json("  \n").expect("blank should parse").is_empty());
}

#[test]
fn empty_array_is_empty_not_error() {
    assert!(parse_players_json("[]").expect("[] should parse").is_empty());
}

#[test]
fn non_array_body_is_an_error() {
    assert!(parse_players_json("{\"message\":\"oops\"}").is_err());
    assert!(parse_players_json("not json").is_err());
}
