use super::{NavRouter, NavigationDescription, NavigationType, RuleKind};
use crate::config::{Config, ConfigError, RuleConfig};

fn nav(from: &str, to: &str, kind: NavigationType, delta: i64) -> NavigationDescription {
    NavigationDescription::new(
        &format!("https://music.test{from}"),
        &format!("https://music.test{to}"),
        kind,
    )
    .unwrap()
    .with_delta(delta)
}

fn push(from: &str, to: &str) -> NavigationDescription {
    nav(from, to, NavigationType::Push, 0)
}

fn music_config() -> Config {
    Config::new()
        .route("home", "/app/")
        .route("playlist", "/app/playlist")
        .route("song", "/app/song/:song_id")
        .route("settings", "/app/settings")
        .rule(RuleConfig::between("home", "playlist").class("slide"))
        .rule(RuleConfig::between("playlist", "song").class("expand"))
        .rule(RuleConfig::with_route("settings").class("pop-settings"))
}

#[test]
fn test_between_matches_both_directions() {
    let router = NavRouter::new(&music_config()).unwrap();

    let forward = router.find_matching_nav(&push("/app/playlist", "/app/song/3")).unwrap();
    assert_eq!(forward.from.as_deref(), Some("playlist"));
    assert_eq!(forward.to.as_deref(), Some("song"));
    assert_eq!(forward.class.as_deref(), Some("expand"));

    let backward = router.find_matching_nav(&push("/app/song/3", "/app/playlist")).unwrap();
    assert_eq!(backward.from.as_deref(), Some("song"));
    assert_eq!(backward.to.as_deref(), Some("playlist"));
    assert_eq!(backward.class, forward.class);
    assert_eq!(backward.params, forward.params);
}

#[test]
fn test_between_rejects_other_pairs() {
    let config = Config::new()
        .route("a", "/a")
        .route("b", "/b")
        .route("c", "/c")
        .rule(RuleConfig::between("a", "b"));
    let router = NavRouter::new(&config).unwrap();
    assert!(router.find_matching_nav(&push("/a", "/c")).is_none());
    assert!(router.find_matching_nav(&push("/c", "/b")).is_none());
    assert!(router.find_matching_nav(&push("/a", "/a")).is_none());
}

#[test]
fn test_home_to_song_falls_through_to_open_rule() {
    let router = NavRouter::new(&music_config()).unwrap();
    assert!(router.find_matching_nav(&push("/app/", "/app/song/5")).is_none());

    let config = Config::new()
        .route("home", "/app/")
        .route("playlist", "/app/playlist")
        .route("song", "/app/song/:song_id")
        .rule(RuleConfig::to_route("song"))
        .rule(RuleConfig::between("playlist", "song").class("expand"));
    let router = NavRouter::new(&config).unwrap();
    let result = router.find_matching_nav(&push("/app/", "/app/song/5")).unwrap();
    assert_eq!(result.class, None);
    assert_eq!(result.from, None);
    assert_eq!(result.to.as_deref(), Some("song"));
    assert_eq!(result.params["song_id"], "5");
}

#[test]
fn test_later_rule_wins() {
    let config = Config::new()
        .route("a", "/a")
        .route("b", "/b")
        .rule(RuleConfig::from_to("a", "b").class("first"))
        .rule(RuleConfig::to_route("b").class("second"));
    let router = NavRouter::new(&config).unwrap();
    let result = router.find_matching_nav(&push("/a", "/b")).unwrap();
    assert_eq!(result.class.as_deref(), Some("second"));
}

#[test]
fn test_with_single_route_matches_either_side() {
    let router = NavRouter::new(&music_config()).unwrap();
    let leaving = router.find_matching_nav(&push("/app/settings", "/app/")).unwrap();
    assert_eq!(leaving.from.as_deref(), Some("settings"));
    assert_eq!(leaving.to, None);

    let entering = router.find_matching_nav(&push("/app/", "/app/settings")).unwrap();
    assert_eq!(entering.from, None);
    assert_eq!(entering.to.as_deref(), Some("settings"));
}

#[test]
fn test_navigation_kinds() {
    let config = Config::new()
        .route("a", "/a")
        .route("b", "/b")
        .rule(RuleConfig::from_to("a", "b").kind(RuleKind::Back).class("back"));
    let router = NavRouter::new(&config).unwrap();

    assert!(router
        .find_matching_nav(&nav("/a", "/b", NavigationType::Traverse, -1))
        .is_some());
    assert!(router
        .find_matching_nav(&nav("/a", "/b", NavigationType::Traverse, 1))
        .is_none());
    assert!(router
        .find_matching_nav(&nav("/a", "/b", NavigationType::Push, -1))
        .is_none());
}

#[test]
fn test_auto_rules_skip_reload() {
    let router = NavRouter::new(&music_config()).unwrap();
    assert!(router
        .find_matching_nav(&nav("/app/playlist", "/app/song/1", NavigationType::Reload, 0))
        .is_none());
}

#[test]
fn test_to_params_override_from_params() {
    let config = Config::new()
        .route("item", "/item/:id")
        .rule(RuleConfig::from_to("item", "item"));
    let router = NavRouter::new(&config).unwrap();
    let result = router.find_matching_nav(&push("/item/old", "/item/new")).unwrap();
    assert_eq!(result.params["id"], "new");
}

#[test]
fn test_params_merge_path_and_query_from_both_sides() {
    let config = Config::new()
        .route("list", "/list?page=:page")
        .route("detail", "/detail/:id")
        .rule(RuleConfig::from_to("list", "detail"));
    let router = NavRouter::new(&config).unwrap();
    let result = router
        .find_matching_nav(&push("/list?page=3", "/detail/42"))
        .unwrap();
    assert_eq!(result.params["page"], "3");
    assert_eq!(result.params["id"], "42");
}

#[test]
fn test_rules_listed_in_evaluation_order() {
    let router = NavRouter::new(&music_config()).unwrap();
    let order: Vec<usize> = router.rules().iter().map(|r| r.declared_at).collect();
    assert_eq!(order, vec![2, 2, 1, 1, 0, 0]);
    assert_eq!(router.rules()[0].to_string(), "#2 * -> settings [auto] .pop-settings");
}

#[test]
fn test_unknown_route_is_a_config_error() {
    let config = Config::new()
        .route("a", "/a")
        .rule(RuleConfig::from_to("a", "missing"));
    let err = NavRouter::new(&config).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownRoute {
            rule: 0,
            route: "missing".to_string()
        }
    );
}

#[test]
fn test_rule_without_routes_is_rejected() {
    let config = Config::new().route("a", "/a").rule(RuleConfig::default());
    assert_eq!(
        NavRouter::new(&config).unwrap_err(),
        ConfigError::EmptyRule { rule: 0 }
    );
}

#[test]
fn test_event_adapter_uses_index_delta() {
    use super::{HistoryEntry, NavigateEvent};
    use url::Url;

    let config = Config::new()
        .route("a", "/a")
        .route("b", "/b")
        .rule(RuleConfig::from_to("a", "b").kind(RuleKind::Forward));
    let router = NavRouter::new(&config).unwrap();
    let current = HistoryEntry::new(Url::parse("https://music.test/a").unwrap(), 2);
    let event = NavigateEvent {
        destination: HistoryEntry::new(Url::parse("https://music.test/b").unwrap(), 3),
        navigation_type: NavigationType::Traverse,
    };
    assert!(router.find_matching_nav_for_event(&current, &event).is_some());
}
