//! Browser shell: binds the game page, wires listeners and owns the controller.
//!
//! The page must provide `#pinyin-input`, `#char1`, `#char2`, `#lives`, `#score`
//! and `#feedback`; `#skip-btn` is optional. Pages without the pinyin input are
//! left untouched so the same module can be loaded everywhere on the site.

pub mod http;
pub mod timer;

use std::cell::RefCell;

use log::{debug, error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlInputElement, Window, window};

use crate::config::InitialPage;
use crate::controller::render::LivesView;
use crate::controller::{BoxState, GameController, GameView, Request, Scheduled, Slot};
use crate::error::{ControllerError, Result};
use crate::input;

pub const INPUT_ID: &str = "pinyin-input";
pub const CHAR_IDS: [&str; 2] = ["char1", "char2"];
pub const LIVES_ID: &str = "lives";
pub const SCORE_ID: &str = "score";
pub const FEEDBACK_ID: &str = "feedback";
pub const SKIP_ID: &str = "skip-btn";
/// Name of the page-embedded state object on `window`.
pub const INITIAL_STATE_GLOBAL: &str = "initialGameState";

const INCORRECT_CLASS: &str = "incorrect";
const SHOW_CLASS: &str = "show";
const BUSY_CLASS: &str = "busy";

fn dom_ok(result: std::result::Result<(), JsValue>, what: &str) {
    if let Err(err) = result {
        warn!("{what} failed: {err:?}");
    }
}

/// Element handles for the game page.
pub struct DomView {
    window: Window,
    document: Document,
    input: HtmlInputElement,
    chars: [Element; 2],
    lives: Element,
    score: Element,
    feedback: Element,
    skip: Option<Element>,
}

impl DomView {
    /// `Ok(None)` when the page has no pinyin input (not a game page).
    pub fn bind(window: &Window, document: &Document) -> Result<Option<Self>> {
        let Some(input) = document.get_element_by_id(INPUT_ID) else {
            return Ok(None);
        };
        let input: HtmlInputElement = input
            .dyn_into()
            .map_err(|_| ControllerError::Dom(format!("#{INPUT_ID} is not an <input>")))?;
        let required = |id: &'static str| {
            document
                .get_element_by_id(id)
                .ok_or(ControllerError::MissingElement(id))
        };
        Ok(Some(Self {
            window: window.clone(),
            document: document.clone(),
            input,
            chars: [required(CHAR_IDS[0])?, required(CHAR_IDS[1])?],
            lives: required(LIVES_ID)?,
            score: required(SCORE_ID)?,
            feedback: required(FEEDBACK_ID)?,
            skip: document.get_element_by_id(SKIP_ID),
        }))
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    pub fn skip_control(&self) -> Option<&Element> {
        self.skip.as_ref()
    }

    fn char_box(&self, slot: Slot) -> &Element {
        &self.chars[slot.index()]
    }
}

impl GameView for DomView {
    fn set_char_text(&mut self, slot: Slot, text: &str) {
        self.char_box(slot).set_text_content(Some(text));
    }

    fn set_char_state(&mut self, slot: Slot, state: BoxState) {
        let el = self.char_box(slot);
        let flashing = el.class_list().contains(INCORRECT_CLASS);
        el.set_class_name(state.class_name());
        if flashing {
            dom_ok(el.class_list().add_1(INCORRECT_CLASS), "keep incorrect flash");
        }
    }

    fn set_incorrect_flash(&mut self, slot: Slot, on: bool) {
        let result = self
            .char_box(slot)
            .class_list()
            .toggle_with_force(INCORRECT_CLASS, on)
            .map(|_| ());
        dom_ok(result, "toggle incorrect flash");
    }

    fn render_lives(&mut self, lives: &LivesView) {
        self.lives.set_inner_html("");
        for slot in &lives.slots {
            let heart = match self.document.create_element("span") {
                Ok(el) => el,
                Err(err) => {
                    warn!("create heart failed: {err:?}");
                    return;
                }
            };
            heart.set_text_content(Some(slot.symbol()));
            heart.set_class_name(slot.class_name());
            dom_ok(self.lives.append_child(&heart).map(|_| ()), "append heart");
        }
        let result = self
            .lives
            .class_list()
            .toggle_with_force(crate::controller::render::LOW_HEALTH_CLASS, lives.low_health)
            .map(|_| ());
        dom_ok(result, "toggle low-health");
    }

    fn render_score(&mut self, text: &str) {
        self.score.set_text_content(Some(text));
    }

    fn show_feedback(&mut self, text: &str) {
        self.feedback.set_text_content(Some(text));
        dom_ok(self.feedback.class_list().add_1(SHOW_CLASS), "show feedback");
    }

    fn hide_feedback(&mut self) {
        dom_ok(self.feedback.class_list().remove_1(SHOW_CLASS), "hide feedback");
    }

    fn reset_input(&mut self) {
        self.input.set_value("");
        dom_ok(self.input.focus(), "focus input");
    }

    fn set_busy(&mut self, busy: bool) {
        let result = self
            .input
            .class_list()
            .toggle_with_force(BUSY_CLASS, busy)
            .map(|_| ());
        dom_ok(result, "toggle busy");
        if let Some(skip) = &self.skip {
            let result = if busy {
                skip.set_attribute("disabled", "")
            } else {
                skip.remove_attribute("disabled")
            };
            dom_ok(result, "toggle skip");
        }
    }

    fn navigate(&mut self, url: &str) {
        dom_ok(self.window.location().set_href(url), "navigate");
    }
}

thread_local! {
    static CONTROLLER: RefCell<Option<GameController<DomView>>> = const { RefCell::new(None) };
}

fn with_controller<R>(f: impl FnOnce(&mut GameController<DomView>) -> R) -> Option<R> {
    CONTROLLER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub fn is_mounted() -> bool {
    CONTROLLER.with(|cell| cell.borrow().is_some())
}

/// Mount now, or on `DOMContentLoaded` if the document is still loading.
pub fn mount_when_ready() -> Result<()> {
    let win = window().ok_or_else(|| ControllerError::Dom("no window".into()))?;
    let doc = win
        .document()
        .ok_or_else(|| ControllerError::Dom("no document".into()))?;
    if doc.ready_state() == "loading" {
        let callback = Closure::once_into_js(move || {
            if let Err(err) = mount() {
                error!("mount failed: {err}");
            }
        });
        doc.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
        return Ok(());
    }
    mount().map(|_| ())
}

/// Bind the page and start the controller. Returns whether a game page was found.
pub fn mount() -> Result<bool> {
    if is_mounted() {
        return Ok(true);
    }
    let win = window().ok_or_else(|| ControllerError::Dom("no window".into()))?;
    let doc = win
        .document()
        .ok_or_else(|| ControllerError::Dom("no document".into()))?;
    let Some(view) = DomView::bind(&win, &doc)? else {
        debug!("no #{INPUT_ID}; controller stays idle");
        return Ok(false);
    };

    let (config, initial) = read_initial_page(&win)?.into_parts()?;
    let input = view.input().clone();
    let skip = if config.skip_enabled {
        view.skip_control().cloned()
    } else {
        None
    };
    let controller = GameController::new(view, config, initial);
    CONTROLLER.with(|cell| cell.replace(Some(controller)));

    attach_input_listeners(&input)?;
    if let Some(skip) = skip {
        attach_skip_listener(&skip)?;
    }
    debug!("quiz controller mounted");
    Ok(true)
}

fn read_initial_page(win: &Window) -> Result<InitialPage> {
    let value = js_sys::Reflect::get(win, &JsValue::from_str(INITIAL_STATE_GLOBAL))?;
    if value.is_undefined() || value.is_null() {
        warn!("window.{INITIAL_STATE_GLOBAL} missing; using defaults");
        return Ok(InitialPage::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| ControllerError::InvalidConfig(e.to_string()))
}

fn attach_input_listeners(input: &HtmlInputElement) -> Result<()> {
    // Letters-only filter on every edit.
    {
        let field = input.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let raw = field.value();
            let caret = field
                .selection_start()
                .ok()
                .flatten()
                .unwrap_or(raw.encode_utf16().count() as u32);
            let (clean, new_caret) = input::sanitize_with_caret(&raw, caret);
            if clean != raw {
                field.set_value(&clean);
                dom_ok(field.set_selection_range(new_caret, new_caret), "restore caret");
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Enter submits, Escape clears.
    {
        let field = input.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            match evt.key().as_str() {
                "Enter" => {
                    let raw = field.value();
                    if input::submission_text(&raw).is_none() {
                        return;
                    }
                    evt.prevent_default();
                    if let Some(request) = with_controller(|c| c.on_enter(&raw)).flatten() {
                        dispatch(request);
                    }
                }
                "Escape" => field.set_value(""),
                _ => {}
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn attach_skip_listener(skip: &Element) -> Result<()> {
    let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
        evt.prevent_default();
        if let Some(request) = with_controller(|c| c.on_skip()).flatten() {
            dispatch(request);
        }
    }) as Box<dyn FnMut(_)>);
    skip.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Send `request` and feed the outcome back into the controller.
fn dispatch(request: Request) {
    let Some((url, body)) =
        with_controller(|c| (request.url(c.config()).to_string(), request.body()))
    else {
        return;
    };
    spawn_local(async move {
        let outcome = match body {
            Ok(body) => http::post(&url, body).await,
            Err(err) => Err(err),
        };
        let scheduled = with_controller(|c| match outcome {
            Ok(response) => c.handle_response(response),
            Err(err) => c.handle_failure(&err),
        })
        .unwrap_or_default();
        schedule_all(scheduled);
    });
}

fn schedule_all(scheduled: Vec<Scheduled>) {
    for Scheduled { delay_ms, followup } in scheduled {
        let result = timer::set_timeout(delay_ms, move || {
            with_controller(|c| c.run_followup(followup));
        });
        if let Err(err) = result {
            warn!("could not schedule follow-up: {err}");
        }
    }
}
