
use app_selector::prelude::*;
use app_selector::{SelectorLayout, WidgetKind};
use app_selector_testing::Fakes;

const VIEW: &str = "http://tizen.org/appcontrol/operation/view";

const APPS: &[(&str, &str, bool)] = &[
    ("org.example.gallery", "Gallery", true),
    ("org.example.photos", "Photos", false),
    ("org.example.editor", "Image Editor", false),
    ("org.example.viewer", "Viewer", false),
    ("org.example.share", "Share", true),
    ("org.example.notes", "Notes", false),
    ("org.example.mail", "Mail", false),
    ("org.example.cloud", "Cloud Drive", false),
    ("org.example.print", "Print", true),
];

pub(crate) fn create_launcher() -> SelectorLauncher {
    SelectorLauncher::new()
        .with_screen_size(720, 1280)
        .with_scale(1.0)
        .with_rotation(0)
}

pub(crate) fn run() -> Result<()> {
    let fakes = Fakes::new();
    for &(appid, name, preloaded) in APPS {
        fakes
            .resolver
            .install(AppInfo::new(appid, name).preloaded(preloaded));
        fakes.resolver.match_intent(appid);
    }
    fakes.usage.record("org.example.viewer");
    fakes.usage.record("org.example.photos");

    let mut session = create_launcher().build(fakes.services());
    let request = LaunchRequest::new(VIEW)
        .with_uri("file:///opt/usr/media/Images/beach.jpg")
        .with_uri_r_info("file")
        .with_caller_pid("4711");

    match session.handle_request(request)? {
        SessionOutcome::Choosing { count } => println!("{count} applications can open the image"),
        outcome => println!("session ended early: {outcome:?}"),
    }
    print_layout(&session, &fakes);

    let last = session.candidates().len().saturating_sub(1);
    println!("tap #{last}: {:?}", session.tap(last)?);

    if let Some(outcome) = session.rotate(90)? {
        println!("rotated to landscape: {outcome:?}");
    }
    print_layout(&session, &fakes);

    session.always()?;
    let appid = session.confirm_default()?;
    let registrations = fakes.defaults.registrations();
    println!("launched {appid}, {} default registrations", registrations.len());
    for registration in registrations {
        println!("  default: {registration:?}");
    }

    let lower_after = session.settings().lower_timeout;
    let now = fakes.clock.advance(lower_after);
    session.tick(now);
    println!(
        "after {:?}: {:?}, {} widgets left",
        lower_after,
        session.phase(),
        fakes.applier.borrow().len()
    );
    Ok(())
}

fn print_layout(session: &SelectorSession, fakes: &Fakes) {
    let Some(layout) = session.layout() else {
        return;
    };
    println!(
        "{:?}: {} per page, {} pages, showing page {}",
        layout.policy().orientation,
        layout.policy().items_per_page,
        layout.page_count(),
        layout.current_page().unwrap_or(0)
    );
    print_pages(session, layout);
    log::debug!(
        "{} cells, {} index strips live",
        fakes.applier.borrow().live_count(WidgetKind::Cell),
        fakes.applier.borrow().live_count(WidgetKind::Index)
    );
}

fn print_pages(session: &SelectorSession, layout: &SelectorLayout) {
    let Some(partitioner) = layout.partitioner() else {
        return;
    };
    for (index, page) in partitioner.pages().enumerate() {
        let names: Vec<&str> = session
            .candidates()
            .get(page.items())
            .unwrap_or(&[])
            .iter()
            .map(|candidate| candidate.name())
            .collect();
        println!("  page {index}: {}", names.join(", "));
    }
}
