//! WASM application entry point.

use super::fetch::fetch_dataset;
use super::timers::{Sink, WindowScheduler};
use crate::html::{render_masthead, render_table};
use crate::intent::Intent;
use crate::view::{Redraw, TableView, SEARCH_PLACEHOLDER};
use castbook_core::{Command, Message, Scheduler, State, TableConfig, TableState};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, HtmlInputElement, Window};

/// Element holding the portrait, title and cameo.
pub const MASTHEAD_ID: &str = "castbook-masthead";
/// The search box.
pub const SEARCH_ID: &str = "castbook-search";
/// Element holding the banner, table and pagination.
pub const TABLE_ID: &str = "castbook-table";

struct Inner {
    state: TableState,
    scheduler: WindowScheduler,
    masthead: Element,
    table: Element,
    // Set by the viewport subscription, cleared once the masthead is drawn.
    layout_changed: Rc<Cell<bool>>,
}

impl Inner {
    fn execute(&mut self, cmd: Command<Message>, loads: &mut Vec<(String, String)>) {
        match cmd {
            Command::None => {}
            Command::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd, loads);
                }
            }
            Command::Schedule {
                slot,
                delay,
                message,
            } => {
                self.scheduler.schedule(slot, delay, message);
            }
            Command::Cancel(slot) => self.scheduler.cancel(slot),
            Command::LoadDataset {
                actors_url,
                movies_url,
            } => loads.push((actors_url, movies_url)),
        }
    }

    fn render(&self, redraw: Redraw) {
        if !redraw.any() {
            return;
        }
        let view = TableView::build(&self.state);
        if redraw.masthead {
            self.masthead.set_inner_html(&render_masthead(&view));
            self.layout_changed.set(false);
        }
        if redraw.table {
            self.table.set_inner_html(&render_table(&view));
        }
    }
}

fn dispatch(inner: &Rc<RefCell<Inner>>, msg: Message) {
    let mut loads = Vec::new();
    {
        let mut guard = inner.borrow_mut();
        let table = Redraw::after(&msg, false).table;
        let cmd = guard.state.update(msg);
        guard.execute(cmd, &mut loads);
        if !guard.state.is_torn_down() {
            guard.render(Redraw {
                masthead: guard.layout_changed.get(),
                table,
            });
        }
    }
    for (actors_url, movies_url) in loads {
        spawn_load(Rc::downgrade(inner), actors_url, movies_url);
    }
}

fn spawn_load(inner: Weak<RefCell<Inner>>, actors_url: String, movies_url: String) {
    wasm_bindgen_futures::spawn_local(async move {
        let msg = match fetch_dataset(&actors_url, &movies_url).await {
            Ok(dataset) => Message::DatasetLoaded(dataset),
            Err(err) => {
                web_sys::console::warn_2(&JsValue::from_str("castbook: dataset load failed"), &err);
                let reason = err
                    .dyn_ref::<js_sys::Error>()
                    .map_or_else(|| format!("{err:?}"), |e| String::from(e.message()));
                Message::DatasetFailed(reason)
            }
        };
        if let Some(inner) = inner.upgrade() {
            dispatch(&inner, msg);
        }
    });
}

fn window_width(window: &Window) -> u32 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .map_or(0, |w| w.max(0.0) as u32)
}

fn element(document: &web_sys::Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element '{id}' not found")))
}

/// The actor table, bound to three elements of the host page.
#[wasm_bindgen]
pub struct App {
    window: Window,
    inner: Rc<RefCell<Inner>>,
    search: HtmlInputElement,
    input_callback: Option<Closure<dyn FnMut(Event)>>,
    click_callback: Option<Closure<dyn FnMut(Event)>>,
    resize_callback: Option<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl App {
    /// Create the app. `config_toml` overrides the defaults when given.
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<App, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_toml {
            Some(toml) => TableConfig::from_toml(&toml).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => TableConfig::default(),
        };

        let window = window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let masthead = element(&document, MASTHEAD_ID)?;
        let table = element(&document, TABLE_ID)?;
        let search = element(&document, SEARCH_ID)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| "Search element is not an input")?;
        let user_agent = window.navigator().user_agent().unwrap_or_default();

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<Inner>>| {
            let weak = weak.clone();
            let sink: Sink = Rc::new(move |msg| {
                if let Some(inner) = weak.upgrade() {
                    dispatch(&inner, msg);
                }
            });
            let mut state = TableState::new(config, &user_agent);
            let layout_changed = Rc::new(Cell::new(false));
            let flag = Rc::clone(&layout_changed);
            state.viewport_monitor().subscribe(move |_| flag.set(true));
            RefCell::new(Inner {
                state,
                scheduler: WindowScheduler::new(window.clone(), sink),
                masthead,
                table,
                layout_changed,
            })
        });

        Ok(Self {
            window,
            inner,
            search,
            input_callback: None,
            click_callback: None,
            resize_callback: None,
        })
    }

    /// Bind listeners, measure the viewport and start loading.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        self.search.set_placeholder(SEARCH_PLACEHOLDER);

        let inner = Rc::downgrade(&self.inner);
        let search = self.search.clone();
        let cb = Closure::new(move |_: Event| {
            if let Some(inner) = inner.upgrade() {
                dispatch(&inner, Intent::Search(search.value()).into());
            }
        });
        self.search
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())?;
        self.input_callback = Some(cb);

        let inner = Rc::downgrade(&self.inner);
        let cb = Closure::new(move |e: Event| {
            let Some(control) = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
            else {
                return;
            };
            let action = control.get_attribute("data-action").unwrap_or_default();
            let value = control.get_attribute("data-value");
            let Some(intent) = Intent::from_action(&action, value.as_deref()) else {
                return;
            };
            if let Some(inner) = inner.upgrade() {
                dispatch(&inner, intent.into());
            }
        });
        self.inner
            .borrow()
            .table
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        self.click_callback = Some(cb);

        let inner = Rc::downgrade(&self.inner);
        let window = self.window.clone();
        let cb = Closure::new(move |_: Event| {
            if let Some(inner) = inner.upgrade() {
                dispatch(&inner, Message::Resized(window_width(&window)));
            }
        });
        self.window
            .add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())?;
        self.resize_callback = Some(cb);

        dispatch(&self.inner, Message::Measured(window_width(&self.window)));
        self.inner.borrow().render(Redraw::ALL);
        let init = self.inner.borrow().state.init();
        let mut loads = Vec::new();
        self.inner.borrow_mut().execute(init, &mut loads);
        for (actors_url, movies_url) in loads {
            spawn_load(Rc::downgrade(&self.inner), actors_url, movies_url);
        }
        Ok(())
    }

    /// Cancel timers and unbind listeners. Safe to call twice.
    pub fn unmount(&mut self) {
        if let Some(cb) = self.input_callback.take() {
            let _ = self
                .search
                .remove_event_listener_with_callback("input", cb.as_ref().unchecked_ref());
        }
        if let Some(cb) = self.click_callback.take() {
            let _ = self
                .inner
                .borrow()
                .table
                .remove_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        }
        if let Some(cb) = self.resize_callback.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
        if !self.inner.borrow().state.is_torn_down() {
            dispatch(&self.inner, Message::Teardown);
        }
    }

    /// Current page (1-based).
    pub fn page(&self) -> usize {
        self.inner.borrow().state.current_page()
    }

    /// Page count.
    pub fn total_pages(&self) -> usize {
        self.inner.borrow().state.total_pages()
    }

    /// Device class of the latest viewport snapshot.
    pub fn device(&self) -> String {
        self.inner.borrow().state.viewport().class.to_string()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount();
    }
}
