//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use castbook::browser::{App, MASTHEAD_ID, SEARCH_ID, TABLE_ID};
use castbook::{html, Message, State, TableConfig, TableState, TableView};
use castbook::{Actor, Appearance, Dataset, Movie, CastMember};

fn dataset() -> Dataset {
    let actors = vec![
        Actor::new(1, "Tilda <Swinton>").appearance(Appearance::new("Moonrise Kingdom").year(2012)),
        Actor::new(2, "Owen Wilson")
            .image("/img/owen.jpg")
            .appearance(Appearance::new("Moonrise Kingdom").year(2012)),
    ];
    let movies = vec![Movie::new("Moonrise Kingdom")
        .year(2012)
        .cast(CastMember::new(1, "Tilda <Swinton>").character("Social Services"))
        .cast(CastMember::new(2, "Owen Wilson"))];
    Dataset::new(actors, movies).expect("dataset")
}

fn host_page() {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();
    for (tag, id) in [("div", MASTHEAD_ID), ("input", SEARCH_ID), ("div", TABLE_ID)] {
        if document.get_element_by_id(id).is_none() {
            let el = document.create_element(tag).unwrap();
            el.set_id(id);
            body.append_child(&el).unwrap();
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[wasm_bindgen_test]
fn test_rendered_table_escapes_names() {
    let mut state = TableState::new(TableConfig::default(), "");
    state.update(Message::DatasetLoaded(dataset()));
    state.update(Message::Revealed);
    let markup = html::render_table(&TableView::build(&state));
    assert!(markup.contains("Tilda &lt;Swinton&gt;"));
    assert!(!markup.contains("<Swinton>"));
    assert!(markup.contains("/img/owen.jpg"));
}

#[wasm_bindgen_test]
fn test_view_serializes_in_browser() {
    let state = TableState::new(TableConfig::default(), "");
    let json = serde_json::to_value(TableView::build(&state)).expect("serialize");
    assert_eq!(json["body"]["kind"], "skeleton");
    assert_eq!(json["body"]["columns"], 11);
}

// ============================================================================
// App lifecycle
// ============================================================================

#[wasm_bindgen_test]
fn test_app_mounts_skeleton_and_unmounts() {
    host_page();
    let mut app = App::new(None).expect("app");
    app.mount().expect("mount");

    let document = web_sys::window().unwrap().document().unwrap();
    let table = document.get_element_by_id(TABLE_ID).unwrap();
    assert!(table.inner_html().contains("shimmer"));
    assert_eq!(app.page(), 1);

    app.unmount();
    app.unmount();
}

#[wasm_bindgen_test]
fn test_raw_resize_and_keystrokes_keep_table_dom() {
    host_page();
    let mut app = App::new(None).expect("app");
    app.mount().expect("mount");

    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let table = document.get_element_by_id(TABLE_ID).unwrap();
    table
        .insert_adjacent_html("beforeend", r#"<i id="castbook-marker"></i>"#)
        .unwrap();

    let resize = web_sys::Event::new("resize").unwrap();
    window.dispatch_event(&resize).unwrap();
    let input = web_sys::Event::new("input").unwrap();
    document
        .get_element_by_id(SEARCH_ID)
        .unwrap()
        .dispatch_event(&input)
        .unwrap();

    assert!(document.get_element_by_id("castbook-marker").is_some());
    app.unmount();
}

#[wasm_bindgen_test]
fn test_app_rejects_bad_config() {
    host_page();
    assert!(App::new(Some("page_size = 0".to_string())).is_err());
}
