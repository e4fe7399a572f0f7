//! Designer workflow integration tests

use std::sync::Arc;

use parking_lot::Mutex;
use solarkit_core::{AppEvent, EventBus, EventCategory, EventFilter, MapEvent};
use solarkit_designer::{
    CanvasPoint, GeocodeResult, InputEvent, InteractionOutcome, Irradiance, Key, LatLng,
    MapAdapter, MapUpdate, RenderFrame, SolarDesigner, ViewportMap, PLACEHOLDER_PROMPT,
};
use solarkit_settings::DesignerConfig;

fn grid_designer() -> SolarDesigner {
    let mut config = DesignerConfig::default();
    config.panel.width_cm = 100.0;
    config.panel.height_cm = 100.0;
    SolarDesigner::new(config, None, Arc::new(EventBus::new()))
}

fn madrid_designer(map: Arc<ViewportMap>) -> SolarDesigner {
    let mut config = DesignerConfig::default();
    config.map.enabled = true;
    let adapter: Arc<dyn MapAdapter> = map;
    SolarDesigner::new(config, Some(adapter), Arc::new(EventBus::new()))
}

#[test]
fn test_grid_placement_wraps_to_second_row() {
    let mut designer = grid_designer();
    for _ in 0..7 {
        designer.add_panel();
    }

    let panels = designer.store().panels();
    assert_eq!((panels[0].x, panels[0].y), (50.0, 50.0));
    assert_eq!((panels[6].x, panels[6].y), (50.0, 170.0));
}

#[test]
fn test_negative_rate_is_rejected() {
    let mut designer = grid_designer();
    designer.add_panel();
    let before = designer.get_stats();

    assert!(!designer.set_electricity_rate(-5.0));
    assert_eq!(designer.get_stats(), before);
    assert_eq!(before.electricity_rate, 0.25);
}

#[test]
fn test_reset_restarts_ids_at_zero() {
    let mut designer = grid_designer();
    designer.add_panel();
    designer.add_panel();
    designer.add_panel();
    designer.reset_all();

    assert_eq!(designer.get_stats().panel_count, 0);
    assert_eq!(designer.add_panel(), 0);
}

#[test]
fn test_madrid_zoom_20_yields_minimum_size() {
    let map = Arc::new(ViewportMap::new(LatLng::new(40.4168, -3.7038), 20.0));
    let mpp = map.meters_per_pixel().unwrap();
    assert!(mpp > 0.112 && mpp < 0.115);

    let mut designer = madrid_designer(map);
    designer.add_panel();
    let panel = &designer.store().panels()[0];
    assert_eq!((panel.width, panel.height), (15.0, 24.0));
}

#[test]
fn test_full_interaction_session() {
    let mut designer = grid_designer();
    designer.set_area_origin(200.0, 100.0);
    let first = designer.add_panel();
    let second = designer.add_panel();

    // drag the second panel past the right edge
    let grab = CanvasPoint::new(200.0 + 180.0, 100.0 + 60.0);
    assert_eq!(
        designer.handle_input(InputEvent::PointerDown(grab)),
        InteractionOutcome::DragStarted { id: second }
    );
    let outcome = designer.handle_input(InputEvent::PointerMove(CanvasPoint::new(2000.0, 300.0)));
    assert_eq!(
        outcome,
        InteractionOutcome::Moved {
            id: second,
            x: 700.0,
            y: 190.0
        }
    );
    designer.handle_input(InputEvent::PointerUp);
    assert_eq!(
        designer.handle_input(InputEvent::Click(CanvasPoint::new(2000.0, 300.0))),
        InteractionOutcome::None
    );

    // select the first panel and delete it with the keyboard
    designer.handle_input(InputEvent::Click(CanvasPoint::new(260.0, 160.0)));
    assert_eq!(designer.selected_id(), Some(first));
    assert_eq!(
        designer.handle_input(InputEvent::KeyDown(Key::Delete)),
        InteractionOutcome::Deleted { id: first }
    );

    // remaining panel is relabelled 1
    match designer.render() {
        RenderFrame::Panels(elements) => {
            assert_eq!(elements.len(), 1);
            assert_eq!(elements[0].data_panel_id, second);
            assert_eq!(elements[0].label, 1);
            assert_eq!((elements[0].x, elements[0].y), (700.0, 190.0));
        }
        RenderFrame::Placeholder(_) => panic!("expected panels"),
    }

    // double-click removes the last one
    designer.handle_input(InputEvent::DoubleClick(CanvasPoint::new(950.0, 340.0)));
    assert_eq!(
        designer.render(),
        RenderFrame::Placeholder(PLACEHOLDER_PROMPT.to_string())
    );
    assert_eq!(designer.get_stats().annual_savings, 0.0);
}

#[tokio::test]
async fn test_address_search_updates_label_and_energy() {
    let map = Arc::new(
        ViewportMap::new(LatLng::new(40.4168, -3.7038), 20.0)
            .with_place(
                "Plaza Mayor, Madrid",
                GeocodeResult {
                    location: LatLng::new(40.4155, -3.7074),
                    display_address: "Plaza Mayor, 28012 Madrid, Spain".to_string(),
                },
            )
            .with_irradiance(Irradiance {
                annual_kwh_per_kwp: 1650.0,
                monthly_kwh_per_kwp: [137.5; 12],
            }),
    );
    let mut designer = madrid_designer(map.clone());
    designer.add_panel();
    designer.add_panel();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    designer.events().subscribe(
        EventFilter::Categories(vec![EventCategory::Map]),
        move |event| sink.lock().push(event.clone()),
    );

    assert!(designer.search_address("Plaza Mayor, Madrid"));
    while designer.get_stats().annual_energy == 800.0 {
        if designer.next_map_update().await.is_none() {
            break;
        }
    }

    assert_eq!(designer.location_label(), Some("Plaza Mayor, 28012 Madrid, Spain"));
    assert_eq!(map.current_center(), LatLng::new(40.4155, -3.7074));
    // 1650 kWh/kWp * 0.4 kWp * 2 panels
    assert_eq!(designer.get_stats().annual_energy, 1320.0);

    assert!(seen
        .lock()
        .iter()
        .any(|e| matches!(e, AppEvent::Map(MapEvent::LocationChanged { .. }))));
}

#[tokio::test]
async fn test_zoom_in_grows_panels() {
    let map = Arc::new(ViewportMap::new(LatLng::new(40.4168, -3.7038), 20.0));
    let mut designer = madrid_designer(map.clone());
    designer.add_panel();

    map.set_zoom(22.0);
    assert_eq!(designer.next_map_update().await, Some(MapUpdate::ZoomChanged));

    // 0.02842 m/px: 1 m -> 35 px, 1.6 m -> 56 px
    assert_eq!(designer.store().panel_size(), (35.0, 56.0));
    assert_eq!(designer.get_stats().panel_count, 1);
}

#[test]
fn test_stats_payload_serializes() {
    let mut designer = grid_designer();
    designer.add_panel();
    let json = serde_json::to_value(designer.get_stats()).unwrap();
    assert_eq!(json["panel_count"], 1);
    assert_eq!(json["annual_energy"], 400.0);
}
