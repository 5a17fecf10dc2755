use akchars::data::character::Character;
use akchars::roster::matcher::match_page_text;
use akchars::roster::{normalize_name, MatchStrategy, RosterMatcher};

fn chars(pairs: &[(&str, &str)]) -> Vec<Character> {
    pairs.iter().map(|(id, name)| Character::new(id, name)).collect()
}

fn next_data(json: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Krooster</title></head><body>
<div id="__next"><h1>Doctor's roster</h1></div>
<script id="__NEXT_DATA__" type="application/json">{json}</script>
</body></html>"#
    )
}

#[test]
fn embedded_roster_ids_are_ground_truth() {
    let html = next_data(r#"{"roster": {"char_002_amiya": {"potential": 1, "promotion": 2}}}"#);
    let result = RosterMatcher::default().match_document(
        &html,
        &chars(&[("char_002_amiya", "Amiya"), ("char_003_kalts", "Kal'tsit")]),
    );
    assert_eq!(result.strategy, Some(MatchStrategy::RosterIds));
    assert_eq!(result.ids(), vec!["char_002_amiya"]);
}

#[test]
fn next_page_props_layout_is_accepted() {
    let html = next_data(
        r#"{"props":{"pageProps":{"data":{"roster":{"char_003_kalts":{},"char_unknown":{}}}}},"page":"/u/[user]"}"#,
    );
    let result = RosterMatcher::default().match_document(
        &html,
        &chars(&[("char_002_amiya", "Amiya"), ("char_003_kalts", "Kal'tsit")]),
    );
    assert_eq!(result.ids(), vec!["char_003_kalts"]);
}

#[test]
fn ids_win_even_when_names_disagree() {
    let html = format!(
        r#"<body><div class="css-rl7vtn"><div>Kal'tsit</div></div>{}</body>"#,
        r#"<script id="__NEXT_DATA__">{"roster":{"char_002_amiya":{}}}</script>"#
    );
    let result = RosterMatcher::default().match_document(
        &html,
        &chars(&[("char_002_amiya", "Amiya"), ("char_003_kalts", "Kal'tsit")]),
    );
    assert_eq!(result.names(), vec!["Amiya"]);
}

#[test]
fn page_text_base_name_does_not_imply_alter() {
    let catalog = chars(&[("char_1028_texas2", "Texas the Omertosa"), ("char_102_texas", "Texas")]);
    let result = RosterMatcher::default().match_document("<body><p>Texas</p></body>", &catalog);
    assert_eq!(result.strategy, Some(MatchStrategy::PageText));
    assert_eq!(result.names(), vec!["Texas"]);
}

#[test]
fn hidden_subtrees_are_ignored_in_text_fallback() {
    let html = r#"<body>
        <div class="hidden"><span>HiddenName</span></div>
        <div><span>VisibleName</span></div>
    </body>"#;
    let catalog = chars(&[("char_hidden", "HiddenName"), ("char_visible", "VisibleName")]);
    let result = RosterMatcher::default().match_document(html, &catalog);
    assert_eq!(result.names(), vec!["VisibleName"]);
}

#[test]
fn name_containers_match_with_normalization() {
    let html = r#"<body>
        <div class="css-rl7vtn"><div>Kal’tsit</div></div>
        <div class="css-rl7vtn"><div>Holungday</div><div>CH'EN</div></div>
        <div class="css-rl7vtn unowned"><div>Amiya</div></div>
        <div class="css-rl7vtn"><div>a</div><div>b</div><div>c</div></div>
    </body>"#;
    let catalog = chars(&[
        ("char_002_amiya", "Amiya"),
        ("char_003_kalts", "Kal'tsit"),
        ("char_010_chen", "Ch'en"),
        ("char_1013_chen2", "Ch'en the Holungday"),
    ]);
    let result = RosterMatcher::default().match_document(html, &catalog);
    assert_eq!(result.strategy, Some(MatchStrategy::NameContainers));
    assert_eq!(result.ids(), vec!["char_003_kalts", "char_1013_chen2"]);
}

#[test]
fn page_text_with_diacritics_and_alter_order() {
    let catalog = chars(&[
        ("char_4055_bgsnow", "Pozëmka"),
        ("char_1012_skadi2", "Skadi the Corrupting Heart"),
        ("char_263_skadi", "Skadi"),
    ]);
    let owned = match_page_text("Pozemka | Corrupting Heart Skadi | Skadi", &catalog);
    let ids: Vec<&str> = owned.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["char_4055_bgsnow", "char_1012_skadi2", "char_263_skadi"]);
}

#[test]
fn normalization_is_stable() {
    for name in ["Ch'en the Holungday", "Pozëmka", "  THRM-EX ", "W", "Ｆｉａｍｍｅｔｔａ"] {
        let once = normalize_name(name);
        assert_eq!(normalize_name(&once), once);
    }
}
