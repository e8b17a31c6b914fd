use roster_terminal::state::{sort_players, Player, SortKey, Sport};

fn player(id: &str, name: &str, position: &str, jersey: Option<u32>) -> Player {
    Player {
        id: id.to_string(),
        full_name: name.to_string(),
        position: position.to_string(),
        jersey_number: jersey,
        sport: Some(Sport::Football),
        team: None,
        bio: None,
        url: None,
    }
}

#[test]
fn jersey_sort_orders_ascending() {
    let roster = vec![player("p1", "B", "WR", Some(9)), player("p2", "A", "QB", Some(2))];
    let view = sort_players(&roster, SortKey::Jersey);
    let names: Vec<&str> = view.iter().map(|p| p.full_name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
}

#[test]
fn name_sort_orders_lexically() {
    let roster = vec![player("p1", "B", "WR", Some(9)), player("p2", "A", "QB", Some(2))];
    let view = sort_players(&roster, SortKey::Name);
    let names: Vec<&str> = view.iter().map(|p| p.full_name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
}

#[test]
fn position_sort_orders_lexically() {
    let roster = vec![
        player("p1", "A", "WR", Some(1)),
        player("p2", "B", "K", Some(2)),
        player("p3", "C", "QB", Some(3)),
    ];
    let view = sort_players(&roster, SortKey::Position);
    let positions: Vec<&str> = view.iter().map(|p| p.position.as_str()).collect();
    assert_eq!(positions, ["K", "QB", "WR"]);
}

#[test]
fn missing_jersey_sorts_first_ascending() {
    let roster = vec![
        player("p1", "A", "QB", Some(1)),
        player("p2", "B", "WR", None),
        player("p3", "C", "K", Some(12)),
    ];
    let view = sort_players(&roster, SortKey::Jersey);
    let ids: Vec<&str> = view.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p2", "p1", "p3"]);
}

#[test]
fn equal_keys_keep_backend_order() {
    let roster = vec![
        player("p1", "A", "QB", Some(7)),
        player("p2", "B", "QB", Some(7)),
        player("p3", "C", "QB", Some(7)),
    ];
    for key in [SortKey::Jersey, SortKey::Position] {
        let view = sort_players(&roster, key);
        let ids: Vec<&str> = view.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
    }
}

#[test]
fn missing_name_sorts_as_empty_string() {
    let roster = vec![player("p1", "Avery", "QB", Some(1)), player("p2", "", "WR", Some(2))];
    let view = sort_players(&roster, SortKey::Name);
    let ids: Vec<&str> = view.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p2", "p1"]);
}

#[test]
fn canonical_list_is_never_mutated() {
    let roster = vec![
        player("p1", "B", "WR", Some(9)),
        player("p2", "A", "QB", Some(2)),
    ];
    let before = roster.clone();
    let _ = sort_players(&roster, SortKey::Name);
    let _ = sort_players(&roster, SortKey::Jersey);
    assert_eq!(roster, before);
}
