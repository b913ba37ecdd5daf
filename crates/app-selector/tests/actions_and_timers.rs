use std::time::Duration;

use app_selector::{
    Actions, DefaultRegistration, LaunchRequest, SelectorLauncher, SessionOutcome, SessionPhase,
    TapOutcome, WidgetKind,
};
use app_selector_testing::prelude::*;

const VIEW: &str = "http://tizen.org/appcontrol/operation/view";

fn rule_with_list() -> SelectorTestRule {
    let mut rule = SelectorTestRule::new();
    rule.install("org.example.gallery", "Gallery")
        .install("org.example.player", "Player")
        .install("org.example.viewer", "Viewer");
    rule
}

fn launch_first(rule: &mut SelectorTestRule) {
    rule.session_mut().tap(0).unwrap();
    rule.session_mut().tap(0).unwrap();
}

#[test]
fn test_info_popup_dismisses_itself() {
    let mut rule = SelectorTestRule::new();

    let outcome = rule
        .request(LaunchRequest::new(VIEW).with_caller_pid("31"))
        .unwrap();

    assert_eq!(outcome, SessionOutcome::InfoShown);
    assert!(rule.session().has_info());
    assert_eq!(rule.live_widgets(WidgetKind::Popup), 1);

    rule.advance(Duration::from_millis(1999));
    assert_eq!(rule.session().phase(), SessionPhase::Info);

    rule.advance(Duration::from_millis(1));
    assert_eq!(rule.session().phase(), SessionPhase::Finished);
    assert_eq!(rule.fakes().window.exited(), 1);
    assert_eq!(rule.cancels(), ["31"]);
    rule.assert_no_widgets();
}

#[test]
fn test_request_without_operation_shows_info() {
    let mut rule = rule_with_list();

    let outcome = rule
        .request(LaunchRequest::without_operation().with_caller_pid("31"))
        .unwrap();

    assert_eq!(outcome, SessionOutcome::InfoShown);
    assert!(rule.session().candidates().is_empty());
}

#[test]
fn test_back_on_info_recycles_at_once() {
    let mut rule = SelectorTestRule::new();
    rule.request(LaunchRequest::new(VIEW).with_caller_pid("31"))
        .unwrap();

    rule.session_mut().back();
    rule.advance(Duration::from_secs(5));

    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
    assert_eq!(rule.cancels(), ["31"]);
    assert_eq!(rule.fakes().window.exited(), 0);
}

#[test]
fn test_resolver_failure_falls_back_to_info() {
    let mut rule = rule_with_list();
    rule.fakes().resolver.fail_resolve(true);

    let outcome = rule.request(LaunchRequest::new(VIEW)).unwrap();

    assert_eq!(outcome, SessionOutcome::InfoShown);
}

#[test]
fn test_lower_timer_recycles_after_launch() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW).with_caller_pid("44"))
        .unwrap();
    launch_first(&mut rule);
    assert!(rule.session().lower_on_pause());

    rule.advance(Duration::from_secs(4));
    assert_eq!(rule.session().phase(), SessionPhase::Launched);

    rule.advance(Duration::from_secs(1));
    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
    assert_eq!(rule.fakes().window.lowered(), 1);
    assert!(rule.cancels().is_empty());
    rule.assert_no_widgets();
}

#[test]
fn test_pause_after_launch_recycles_immediately() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW)).unwrap();
    launch_first(&mut rule);

    rule.session_mut().pause();

    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
    assert!(!rule.session().lower_on_pause());
}

#[test]
fn test_pause_before_launch_keeps_the_list() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW)).unwrap();

    rule.session_mut().pause();

    assert_eq!(rule.session().phase(), SessionPhase::Choosing);
}

#[test]
fn test_resume_cancels_the_lower_timer() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW)).unwrap();
    launch_first(&mut rule);

    rule.session_mut().resume();
    rule.advance(Duration::from_secs(10));

    assert_eq!(rule.session().phase(), SessionPhase::Launched);
    assert!(!rule.session().lower_on_pause());
}

#[test]
fn test_custom_lower_timeout() {
    let mut rule =
        SelectorTestRule::with_launcher(SelectorLauncher::new().with_lower_timeout(Duration::from_secs(1)));
    rule.install("a", "A").install("b", "B");
    rule.request(LaunchRequest::new(VIEW)).unwrap();
    launch_first(&mut rule);

    rule.advance(Duration::from_secs(1));

    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
}

#[test]
fn test_failed_launch_still_arms_the_timer_and_cancels() {
    let mut rule = rule_with_list();
    rule.fakes().launcher.fail(true);
    rule.request(LaunchRequest::new(VIEW).with_caller_pid("44"))
        .unwrap();

    rule.session_mut().tap(0).unwrap();
    assert!(rule.session_mut().tap(0).is_err());
    assert!(rule.session().lower_on_pause());

    rule.advance(Duration::from_secs(5));
    assert_eq!(rule.cancels(), ["44"]);
}

#[test]
fn test_launch_carries_usage_tag() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW)).unwrap();
    launch_first(&mut rule);

    let forwarded = rule.fakes().launcher.last_request().unwrap();
    let first = rule.displayed()[0].clone();
    assert_eq!(forwarded.usage_stat(), Some(("app-selector", first.as_str())));
}

#[test]
fn test_buttons_follow_the_selection() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW)).unwrap();
    assert_eq!(rule.session().actions(), Some(Actions::default()));
    assert!(rule.session_mut().always().is_err());
    assert!(rule.session_mut().just_once().is_err());

    rule.on_candidate(has_name("Player")).perform_click();

    assert_eq!(
        rule.session().actions(),
        Some(Actions {
            always: true,
            once: true
        })
    );
}

#[test]
fn test_tap_launch_disables_buttons() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW).with_uri("https://example.org"))
        .unwrap();

    launch_first(&mut rule);

    assert_eq!(rule.session().actions(), Some(Actions::default()));
    assert!(rule.session_mut().always().is_err());
    assert!(rule.session_mut().just_once().is_err());
    assert!(!rule.session().has_notice());
    assert!(rule.fakes().defaults.registrations().is_empty());
    assert_eq!(rule.launched().len(), 1);
}

#[test]
fn test_just_once_launches_selection() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW)).unwrap();
    rule.on_candidate(has_name("Player")).perform_click();

    let launched = rule.session_mut().just_once().unwrap();

    assert_eq!(launched, "org.example.player");
    assert_eq!(rule.launched(), ["org.example.player"]);
    assert_eq!(rule.session().actions(), Some(Actions::default()));
    assert!(rule.fakes().defaults.registrations().is_empty());
    assert!(rule.session_mut().just_once().is_err());
    assert_eq!(rule.launched().len(), 1);
}

#[test]
fn test_always_registers_default_then_launches() {
    let mut rule = rule_with_list();
    rule.request(
        LaunchRequest::new(VIEW)
            .with_uri("file:///opt/usr/media/Sounds/song.mp3")
            .with_caller_pid("8"),
    )
    .unwrap();
    rule.on_candidate(has_name("Player")).perform_click();

    rule.session_mut().always().unwrap();

    assert!(rule.session().has_notice());
    assert_eq!(
        rule.session().actions(),
        Some(Actions {
            always: true,
            once: false
        })
    );
    assert_eq!(rule.on_candidate(has_name("Viewer")).perform_click(), TapOutcome::Ignored);
    assert!(rule.launched().is_empty());

    let launched = rule.session_mut().confirm_default().unwrap();

    assert_eq!(launched, "org.example.player");
    assert!(!rule.session().has_notice());
    assert!(rule.fakes().defaults.registrations().is_empty());
    assert_eq!(rule.launched(), ["org.example.player"]);
    assert!(rule.cancels().is_empty());
}

#[test]
fn test_always_registers_web_scheme_with_mime() {
    let mut rule = rule_with_list();
    rule.request(
        LaunchRequest::new(VIEW)
            .with_uri("https://example.org/clip.mp4")
            .with_mime("video/mp4"),
    )
    .unwrap();
    rule.on_candidate(has_name("Player")).perform_click();
    rule.session_mut().always().unwrap();

    rule.session_mut().confirm_default().unwrap();

    assert_eq!(
        rule.fakes().defaults.registrations(),
        [DefaultRegistration {
            operation: VIEW.into(),
            mime: Some("video/mp4".into()),
            uri_or_scheme: Some("https".into()),
            appid: "org.example.player".into(),
        }]
    );
    assert_eq!(rule.launched(), ["org.example.player"]);
}

#[test]
fn test_always_registers_explicit_scheme() {
    let mut rule = rule_with_list();
    rule.request(
        LaunchRequest::new(VIEW)
            .with_uri("https://example.org/page")
            .with_uri_r_info("web"),
    )
    .unwrap();
    rule.session_mut().tap(1).unwrap();
    rule.session_mut().always().unwrap();

    rule.session_mut().confirm_default().unwrap();

    let registration = &rule.fakes().defaults.registrations()[0];
    assert_eq!(registration.uri_or_scheme.as_deref(), Some("web"));
    assert_eq!(registration.mime, None);
}

#[test]
fn test_failed_registration_does_not_block_launch() {
    let mut rule = rule_with_list();
    rule.fakes().defaults.fail(true);
    rule.request(LaunchRequest::new(VIEW).with_uri("https://example.org"))
        .unwrap();
    rule.session_mut().tap(2).unwrap();
    rule.session_mut().always().unwrap();

    rule.session_mut().confirm_default().unwrap();

    assert_eq!(rule.launched().len(), 1);
    assert!(rule.fakes().defaults.registrations().is_empty());
}

#[test]
fn test_back_on_notice_recycles() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW).with_caller_pid("8"))
        .unwrap();
    rule.session_mut().tap(0).unwrap();
    rule.session_mut().always().unwrap();

    rule.session_mut().back();

    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
    assert_eq!(rule.cancels(), ["8"]);
    rule.assert_no_widgets();
}

#[test]
fn test_buttons_act_on_selection_restored_by_rotation() {
    let mut rule = rule_with_list();
    rule.request(LaunchRequest::new(VIEW)).unwrap();
    rule.session_mut().tap(2).unwrap();
    rule.session_mut().rotate(90).unwrap();

    let launched = rule.session_mut().just_once().unwrap();

    assert_eq!(launched, rule.displayed()[2]);
}

#[test]
fn test_extra_list_launches_on_first_tap() {
    let mut rule = SelectorTestRule::new();
    rule.install_hidden("org.example.hidden", "Hidden")
        .install("org.example.viewer", "Viewer");

    let outcome = rule
        .request(
            LaunchRequest::new(VIEW)
                .with_extra_list(["org.example.hidden", "org.example.missing", "org.example.viewer"]),
        )
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Choosing { count: 2 });
    assert!(rule.session().is_extra());
    assert_eq!(rule.session().actions(), None);
    assert!(rule.session().candidates().iter().all(|c| c.is_extra()));

    let outcome = rule.on_candidate(has_name("Hidden")).perform_click();

    assert!(matches!(outcome, TapOutcome::Confirmed { .. }));
    assert_eq!(rule.launched(), ["org.example.hidden"]);
}

#[test]
fn test_extra_list_survives_resolver_failure() {
    let mut rule = SelectorTestRule::new();
    rule.install_hidden("x", "X").install_hidden("y", "Y");
    rule.fakes().resolver.fail_resolve(true);

    let outcome = rule
        .request(LaunchRequest::new(VIEW).with_extra_list(["x", "y"]))
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Choosing { count: 2 });
}
