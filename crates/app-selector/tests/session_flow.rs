use app_selector::{
    LaunchRequest, Orientation, RotationOutcome, Selection, SessionOutcome, SessionPhase,
    TapOutcome, WidgetKind,
};
use app_selector_testing::prelude::*;

const VIEW: &str = "http://tizen.org/appcontrol/operation/view";

fn view_request() -> LaunchRequest {
    LaunchRequest::new(VIEW).with_caller_pid("1200")
}

fn rule_with_apps(count: usize) -> SelectorTestRule {
    let mut rule = SelectorTestRule::new();
    for i in 0..count {
        rule.install(&format!("org.example.app{i}"), &format!("App {i}"));
    }
    rule
}

#[test]
fn test_single_candidate_launches_without_pages() {
    let mut rule = rule_with_apps(1);

    let outcome = rule.request(view_request()).unwrap();

    assert_eq!(outcome, SessionOutcome::Launched("org.example.app0".into()));
    assert_eq!(rule.launched(), ["org.example.app0"]);
    assert_eq!(rule.session().phase(), SessionPhase::Finished);
    assert_eq!(rule.fakes().window.exited(), 1);
    assert!(rule.cancels().is_empty());
    assert!(rule.fakes().applier.borrow().widgets_of(WidgetKind::Page).is_empty());
    rule.assert_no_widgets();
}

#[test]
fn test_failed_single_launch_reports_cancel() {
    let mut rule = rule_with_apps(1);
    rule.fakes().launcher.fail(true);

    assert!(rule.request(view_request()).is_err());
    assert_eq!(rule.session().phase(), SessionPhase::Finished);
    assert_eq!(rule.cancels(), ["1200"]);
}

#[test]
fn test_nine_candidates_in_portrait() {
    let mut rule = rule_with_apps(9);

    let outcome = rule.request(view_request()).unwrap();

    assert_eq!(outcome, SessionOutcome::Choosing { count: 9 });
    let layout = rule.session().layout().unwrap();
    assert_eq!(layout.policy().items_per_page, 8);
    assert_eq!(layout.page_count(), 2);
    assert_eq!(layout.indicator().unwrap().len(), 2);
    assert_eq!(rule.live_widgets(WidgetKind::Cell), 9);
    assert_eq!(rule.live_widgets(WidgetKind::Index), 1);
}

#[test]
fn test_preloaded_last_then_descending_appid() {
    let mut rule = SelectorTestRule::new();
    rule.install_preloaded("A", "Alpha")
        .install("B", "Beta")
        .install("C", "Gamma");

    rule.request(view_request()).unwrap();

    assert_eq!(rule.displayed(), ["C", "B", "A"]);
}

#[test]
fn test_usage_history_moves_candidates_up() {
    let mut rule = SelectorTestRule::new();
    rule.install("a", "A").install("b", "B").install("c", "C");
    rule.usage("b").usage("a");

    rule.request(view_request()).unwrap();

    assert_eq!(rule.displayed(), ["b", "a", "c"]);
    assert_eq!(rule.fakes().usage.queries(), ["app-selector"]);
    let scores: Vec<i32> = rule.session().candidates().iter().map(|c| c.score()).collect();
    assert_eq!(scores, [40, 30, 0]);
}

#[test]
fn test_rotation_keeps_selection_and_never_launches() {
    let mut rule = rule_with_apps(9);
    rule.request(view_request()).unwrap();
    let last = rule.displayed()[8].clone();
    rule.on_candidate(has_appid(last.as_str())).perform_click();

    let outcome = rule.session_mut().rotate(90).unwrap();

    assert_eq!(outcome, Some(RotationOutcome::Rotated));
    assert_eq!(rule.session().orientation(), Orientation::Landscape);
    let layout = rule.session().layout().unwrap();
    assert_eq!(layout.policy().items_per_page, 4);
    assert_eq!(layout.page_count(), 3);
    assert_eq!(layout.current_page(), Some(2));
    assert_eq!(rule.selection(), Selection::Restored(8));
    assert!(rule.launched().is_empty());

    let mut candidate = rule.on_candidate(has_appid(last.as_str()));
    candidate.assert_exists();
    assert!(matches!(
        candidate.perform_click(),
        TapOutcome::Selected { position: 8, first: false }
    ));
    assert_eq!(candidate.perform_click(), TapOutcome::Confirmed { position: 8 });
    assert_eq!(rule.launched(), [last]);
}

#[test]
fn test_same_orientation_is_not_rebuilt() {
    let mut rule = rule_with_apps(3);
    rule.request(view_request()).unwrap();

    assert_eq!(rule.session_mut().rotate(180).unwrap(), None);
}

#[test]
fn test_rotation_that_cannot_be_built_recycles() {
    let mut rule = rule_with_apps(5);
    rule.request(view_request()).unwrap();
    rule.fakes().applier.borrow_mut().fail_kind(WidgetKind::Page);

    assert!(rule.session_mut().rotate(270).is_err());

    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
    assert_eq!(rule.cancels(), ["1200"]);
    rule.assert_no_widgets();
}

#[test]
fn test_duplicate_taps_launch_once() {
    let mut rule = rule_with_apps(4);
    rule.request(view_request()).unwrap();

    let mut candidate = rule.on_candidate(has_name("App 2"));
    let outcomes = [
        candidate.perform_click(),
        candidate.perform_click(),
        candidate.perform_click(),
        candidate.perform_click(),
    ];

    assert!(matches!(outcomes[0], TapOutcome::Selected { first: true, .. }));
    assert!(matches!(outcomes[1], TapOutcome::Confirmed { .. }));
    assert_eq!(outcomes[2], TapOutcome::Ignored);
    assert_eq!(outcomes[3], TapOutcome::Ignored);
    assert_eq!(rule.launched(), ["org.example.app2"]);
    assert_eq!(rule.session().phase(), SessionPhase::Launched);
}

#[test]
fn test_tapping_another_cell_moves_selection() {
    let mut rule = rule_with_apps(4);
    rule.request(view_request()).unwrap();

    rule.session_mut().tap(0).unwrap();
    let outcome = rule.session_mut().tap(3).unwrap();

    assert_eq!(outcome, TapOutcome::Selected { position: 3, first: false });
    let fourth = rule.displayed()[3].clone();
    rule.on_candidate(has_appid(fourth)).assert_selected();
    assert!(rule.launched().is_empty());
}

#[test]
fn test_index_tap_shows_page() {
    let mut rule = rule_with_apps(9);
    rule.request(view_request()).unwrap();

    let layout = rule.session().layout().unwrap();
    layout.tap_index(1).unwrap();

    assert_eq!(layout.current_page(), Some(1));
    assert_eq!(layout.indicator().unwrap().current(), Some(1));
}

#[test]
fn test_back_recycles_and_cancels() {
    let mut rule = rule_with_apps(3);
    rule.request(view_request()).unwrap();
    rule.session_mut().tap(1).unwrap();

    rule.session_mut().back();

    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
    assert_eq!(rule.cancels(), ["1200"]);
    assert_eq!(rule.fakes().window.lowered(), 1);
    assert!(rule.session().candidates().is_empty());
    assert_eq!(rule.selection(), Selection::None);
    rule.assert_no_widgets();
}

#[test]
fn test_missing_caller_pid_skips_cancel() {
    let mut rule = rule_with_apps(3);
    rule.request(LaunchRequest::new(VIEW)).unwrap();

    rule.session_mut().back();

    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
    assert!(rule.cancels().is_empty());
}

#[test]
fn test_new_request_replaces_active_session() {
    let mut rule = rule_with_apps(3);
    rule.request(view_request()).unwrap();

    let outcome = rule
        .request(LaunchRequest::new(VIEW).with_caller_pid("1300"))
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Choosing { count: 3 });
    assert_eq!(rule.cancels(), ["1200"]);
    assert_eq!(rule.live_widgets(WidgetKind::Layout), 1);
}

#[test]
fn test_failed_build_recycles_with_cancel() {
    let mut rule = rule_with_apps(6);
    rule.fakes().applier.borrow_mut().fail_kind(WidgetKind::Scroller);

    assert!(rule.request(view_request()).is_err());

    assert_eq!(rule.session().phase(), SessionPhase::Recycled);
    assert_eq!(rule.cancels(), ["1200"]);
    rule.assert_no_widgets();
}

#[test]
fn test_language_change_relabels_cells() {
    let mut rule = SelectorTestRule::new();
    rule.install("mail", "Mail").install("notes", "Notes");
    rule.request(view_request()).unwrap();
    rule.fakes().resolver.rename("mail", "Courrier");
    rule.fakes().resolver.uninstall("notes");

    rule.session_mut().language_changed().unwrap();

    let position = rule.on_candidate(has_name("Courrier")).position();
    rule.on_candidate(has_name("Notes"));
    let cell = rule
        .session()
        .layout()
        .and_then(|layout| layout.partitioner())
        .and_then(|partitioner| partitioner.cell_for(position))
        .unwrap();
    let applier = rule.fakes().applier.borrow();
    assert_eq!(applier.record(cell).unwrap().label.as_deref(), Some("Courrier"));
}
