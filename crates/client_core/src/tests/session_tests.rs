use super::*;
use shared::domain::{Cell, HexColor, ScoreEntry};

const OPAQUE_WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 0xff];

fn coord(x: i64, y: i64) -> CellCoord {
    CellCoord::new(x, y).expect("coord")
}

fn cell(x: i64, y: i64, color: &str, owner: &str) -> Cell {
    Cell {
        coord: coord(x, y),
        color: color.parse().expect("color"),
        owner: owner.to_string(),
        updated_at: None,
    }
}

fn click(session: &mut CanvasSession, x: f32, y: f32) -> Option<CellCoord> {
    let point = ScreenPoint::new(x, y);
    session.handle_pointer(PointerEvent::Down(point));
    session.handle_pointer(PointerEvent::Up(point))
}

#[test]
fn starts_blank_with_placeholder_status() {
    let session = CanvasSession::default();
    assert_eq!(session.status(), INITIAL_STATUS);
    assert_eq!(session.selection(), None);
    assert_eq!(session.base_surface().pixel(0, 0), Some(OPAQUE_WHITE));
    assert_eq!(session.overlay_surface().pixel(1499, 799), Some(OPAQUE_WHITE));
}

#[test]
fn click_on_empty_cell_selects_it_and_outlines_overlay() {
    let mut session = CanvasSession::default();
    let _listeners = session.attach_pointer_listeners();

    assert_eq!(click(&mut session, 205.0, 205.0), Some(coord(20, 20)));

    assert_eq!(session.selection(), Some(coord(20, 20)));
    assert_eq!(session.status(), "Clicked Box: (20, 20)");
    assert_eq!(session.overlay_surface().pixel(200, 200), Some(OPAQUE_BLACK));
    assert_eq!(session.overlay_surface().pixel(205, 205), Some(OPAQUE_WHITE));
    assert_eq!(session.base_surface().pixel(200, 200), Some(OPAQUE_WHITE));
}

#[test]
fn click_on_owned_cell_reports_color_and_owner() {
    let mut session = CanvasSession::default();
    let _listeners = session.attach_pointer_listeners();
    session.apply_sync_event(SyncEvent::GridFetched {
        seq: 1,
        cells: vec![cell(3, 4, "#00FF00", "ada")],
    });

    click(&mut session, 35.0, 45.0);

    assert_eq!(session.status(), "Clicked Box: (3, 4), Color: #00ff00, User: ada");
}

#[test]
fn pointer_events_without_listeners_change_nothing() {
    let mut session = CanvasSession::default();
    assert_eq!(click(&mut session, 205.0, 205.0), None);
    assert_eq!(session.selection(), None);
    assert_eq!(session.status(), INITIAL_STATUS);
}

#[test]
fn selection_survives_a_resync() {
    let mut session = CanvasSession::default();
    let _listeners = session.attach_pointer_listeners();
    click(&mut session, 55.0, 55.0);

    session.apply_sync_event(SyncEvent::GridFetched {
        seq: 1,
        cells: vec![cell(5, 5, "#ff0000", "ada")],
    });

    assert_eq!(session.selection(), Some(coord(5, 5)));
    // red fill with the outline still on top
    assert_eq!(session.overlay_surface().pixel(50, 50), Some(OPAQUE_BLACK));
    assert_eq!(
        session.overlay_surface().pixel(55, 55),
        Some([0xff, 0, 0, 0xff])
    );
    assert_eq!(session.base_surface().pixel(50, 50), Some([0xff, 0, 0, 0xff]));
}

#[test]
fn stale_grid_from_an_older_cycle_is_discarded() {
    let mut session = CanvasSession::default();

    assert!(session.apply_sync_event(SyncEvent::GridFetched {
        seq: 2,
        cells: vec![cell(0, 0, "#0000ff", "new")],
    }));
    assert!(!session.apply_sync_event(SyncEvent::GridFetched {
        seq: 1,
        cells: vec![cell(0, 0, "#ff0000", "old")],
    }));

    let kept = session.grid().lookup(coord(0, 0)).expect("cell");
    assert_eq!(kept.owner, "new");
    assert_eq!(kept.color, HexColor::from_rgb(0, 0, 0xff));
}

#[test]
fn scoreboard_tracks_its_own_cycle_order() {
    let mut session = CanvasSession::default();
    let board = |user: &str| {
        Scoreboard::from_entries(vec![ScoreEntry {
            user: user.to_string(),
            score: 1,
        }])
    };

    session.apply_sync_event(SyncEvent::GridFetched {
        seq: 3,
        cells: Vec::new(),
    });
    assert!(session.apply_sync_event(SyncEvent::ScoreboardFetched {
        seq: 1,
        scoreboard: board("ada"),
    }));
    assert!(!session.apply_sync_event(SyncEvent::ScoreboardFetched {
        seq: 1,
        scoreboard: board("bob"),
    }));

    assert_eq!(session.scoreboard().entries()[0].user, "ada");
}

#[test]
fn failed_fetch_keeps_cached_grid() {
    let mut session = CanvasSession::default();
    session.apply_sync_event(SyncEvent::GridFetched {
        seq: 1,
        cells: vec![cell(1, 1, "#123456", "ada")],
    });

    let changed = session.apply_sync_event(SyncEvent::FetchFailed {
        seq: 2,
        family: FetchFamily::Grid,
        error: "http://fake/api/get_pixel returned HTTP 500".to_string(),
    });

    assert!(changed);
    assert_eq!(session.grid().len(), 1);
    assert!(session
        .sync_error(FetchFamily::Grid)
        .is_some_and(|e| e.contains("500")));

    session.apply_sync_event(SyncEvent::GridFetched {
        seq: 3,
        cells: Vec::new(),
    });
    assert_eq!(session.sync_error(FetchFamily::Grid), None);
    assert!(session.grid().is_empty());
}

#[test]
fn scoreboard_failure_outlives_grid_success() {
    let mut session = CanvasSession::default();
    session.apply_sync_event(SyncEvent::FetchFailed {
        seq: 1,
        family: FetchFamily::Scoreboard,
        error: "http://fake/api/get_user_details returned HTTP 503".to_string(),
    });
    session.apply_sync_event(SyncEvent::GridFetched {
        seq: 1,
        cells: vec![cell(1, 1, "#123456", "ada")],
    });

    assert_eq!(session.sync_error(FetchFamily::Grid), None);
    assert!(session
        .sync_error(FetchFamily::Scoreboard)
        .is_some_and(|e| e.contains("503")));

    let repeated = session.apply_sync_event(SyncEvent::FetchFailed {
        seq: 2,
        family: FetchFamily::Scoreboard,
        error: "http://fake/api/get_user_details returned HTTP 503".to_string(),
    });
    assert!(!repeated);

    session.apply_sync_event(SyncEvent::ScoreboardFetched {
        seq: 3,
        scoreboard: Scoreboard::default(),
    });
    assert_eq!(session.sync_error(FetchFamily::Scoreboard), None);
}

#[test]
fn pan_then_click_selects_relative_to_moved_overlay() {
    let mut session = CanvasSession::default();
    let _listeners = session.attach_pointer_listeners();

    session.handle_pointer(PointerEvent::Down(ScreenPoint::new(0.0, 0.0)));
    session.handle_pointer(PointerEvent::Move(ScreenPoint::new(100.0, 0.0)));
    assert_eq!(session.displayed_offset(), PanOffset { top: 0.0, left: 100.0 });
    assert_eq!(session.pan_offset(), PanOffset::default());
    session.handle_pointer(PointerEvent::Up(ScreenPoint::new(100.0, 0.0)));

    assert_eq!(click(&mut session, 105.0, 5.0), Some(coord(0, 0)));
}
