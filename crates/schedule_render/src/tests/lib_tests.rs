use super::*;
use shared::domain::{Category, TalkId};

fn speaker(first: &str, last: &str) -> Speaker {
    Speaker {
        id: None,
        first_name: first.into(),
        last_name: last.into(),
        linkedin: format!(
            "https://www.linkedin.com/in/{}{}",
            first.to_lowercase(),
            last.to_lowercase()
        ),
    }
}

fn talk(id: i64, title: &str, category: Option<&str>, speakers: Vec<Speaker>) -> Talk {
    Talk {
        id: TalkId(id),
        time: "09:00 AM - 10:00 AM".into(),
        title: title.into(),
        description: format!("About {title}"),
        category: category.map(Category::from),
        speakers,
        is_break: None,
    }
}

fn renderer() -> ScheduleRenderer {
    ScheduleRenderer::new().expect("renderer")
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn empty_list_renders_only_the_empty_state_block() {
    let markup = renderer().render(&[]).expect("render");
    assert!(markup.is_empty_state());
    assert!(markup.html.contains("No sessions found"));
    assert!(markup.html.contains("Try adjusting your search criteria"));
    assert_eq!(count(&markup.html, "class=\"talk-card"), 0);
}

#[test]
fn renders_one_card_per_talk_in_input_order() {
    let talks = vec![
        talk(8, "Cloud Migration", Some("2"), vec![]),
        talk(1, "Keynote", Some("1"), vec![]),
        talk(5, "Serverless", None, vec![]),
    ];
    let markup = renderer().render(&talks).expect("render");
    assert_eq!(markup.card_count, 3);
    assert_eq!(count(&markup.html, "class=\"talk-card"), 3);
    assert!(!markup.html.contains("No sessions found"));

    let first = markup.html.find("data-talk-id=\"8\"").expect("first card");
    let second = markup.html.find("data-talk-id=\"1\"").expect("second card");
    let third = markup.html.find("data-talk-id=\"5\"").expect("third card");
    assert!(first < second && second < third);
}

#[test]
fn category_badge_only_when_category_present() {
    let talks = vec![
        talk(1, "Keynote", Some("1"), vec![]),
        talk(2, "Untagged", None, vec![]),
        talk(3, "Blank tag", Some(""), vec![]),
    ];
    let markup = renderer().render(&talks).expect("render");
    assert_eq!(count(&markup.html, "class=\"talk-category"), 1);
    assert!(markup
        .html
        .contains("<div class=\"talk-category category-1\">Category 1</div>"));
}

#[test]
fn speaker_entries_match_speaker_count_with_initials() {
    let talks = vec![
        talk(
            2,
            "GKE",
            Some("1"),
            vec![speaker("Michael", "Rodriguez"), speaker("Emily", "Johnson")],
        ),
        talk(3, "No speakers", Some("2"), vec![]),
    ];
    let markup = renderer().render(&talks).expect("render");
    assert_eq!(count(&markup.html, "class=\"speakers\""), 1);
    assert_eq!(count(&markup.html, "class=\"speaker\""), 2);
    assert!(markup
        .html
        .contains("<div class=\"speaker-avatar\">MR</div>"));
    assert!(markup
        .html
        .contains("<div class=\"speaker-avatar\">EJ</div>"));
    assert!(markup
        .html
        .contains("<div class=\"speaker-name\">Emily Johnson</div>"));
    assert!(markup.html.contains("michaelrodriguez"));
}

#[test]
fn lunch_break_card_gets_visual_tag() {
    let mut lunch = talk(4, "Lunch Break", None, vec![]);
    lunch.description = "Networking lunch with fellow attendees".into();
    let talks = vec![talk(3, "ML", Some("2"), vec![]), lunch];
    let markup = renderer().render(&talks).expect("render");
    assert_eq!(count(&markup.html, "lunch-break"), 1);
    assert!(markup
        .html
        .contains("class=\"talk-card lunch-break\" data-talk-id=\"4\""));
}

#[test]
fn untrusted_fields_are_escaped() {
    let mut hostile = talk(
        9,
        "<script>alert('x')</script>",
        Some("1\"><img src=x>"),
        vec![speaker("<b>Eve", "Mallory</b>")],
    );
    hostile.description = "Tom & Jerry".into();
    hostile.time = "<i>noon</i>".into();
    let markup = renderer().render(&[hostile]).expect("render");

    assert!(!markup.html.contains("<script>"));
    assert!(!markup.html.contains("<img"));
    assert!(!markup.html.contains("<b>"));
    assert!(!markup.html.contains("<i>"));
    assert!(markup.html.contains("&lt;script&gt;"));
    assert!(markup.html.contains("Tom &amp; Jerry"));
}

#[test]
fn non_http_profile_links_are_neutralized() {
    let mut bad = speaker("Eve", "Mallory");
    bad.linkedin = "javascript:alert(1)".into();
    let markup = renderer()
        .render(&[talk(1, "t", None, vec![bad])])
        .expect("render");
    assert!(!markup.html.contains("javascript"));
    assert!(markup.html.contains("href=\"#\""));
}

#[test]
fn cards_get_increasing_stagger_delays() {
    let talks: Vec<Talk> = (1..=3).map(|id| talk(id, "t", None, vec![])).collect();
    let markup = renderer().render(&talks).expect("render");
    assert!(markup.html.contains("animation-delay: 0.0s"));
    assert!(markup.html.contains("animation-delay: 0.1s"));
    assert!(markup.html.contains("animation-delay: 0.2s"));
    assert_eq!(stagger_delay(7), Duration::from_millis(700));
}

#[test]
fn malformed_speaker_names_do_not_fail_rendering() {
    let markup = renderer()
        .render(&[talk(1, "t", None, vec![speaker("", "")])])
        .expect("render");
    assert!(markup.html.contains("<div class=\"speaker-avatar\"></div>"));
}

#[test]
fn legacy_json_payload_renders() {
    let raw = r#"[
        {"id": 1, "title": "Keynote: The Future of Cloud Computing", "speaker_ids": [1],
         "category": 1, "description": "d", "time": "09:00 AM - 10:00 AM",
         "speakers": [{"id": 1, "first_name": "Sarah", "last_name": "Chen",
                       "linkedin": "https://www.linkedin.com/in/sarahchen"}]},
        {"id": 4, "title": "Lunch Break", "speaker_ids": [], "category": null,
         "description": "Networking lunch", "time": "12:30 PM - 01:30 PM", "speakers": []}
    ]"#;
    let talks: Vec<Talk> = serde_json::from_str(raw).expect("decode");
    let markup = renderer().render(&talks).expect("render");
    assert_eq!(markup.card_count, 2);
    assert!(markup.html.contains("<div class=\"speaker-avatar\">SC</div>"));
    assert!(markup.html.contains("lunch-break"));
}
