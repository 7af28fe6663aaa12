//! Browser side of the board: reads the launch fragment, draws the SVG board
//! into the host page, and forwards line clicks to the session.
//!
//! Submodules are pure and run under native `cargo test`; everything in this
//! file touches the DOM and only makes sense inside the mini app.

use gloo::console;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window, window};

use crate::bridge::{HostBridge, TelegramBridge, ThemeParams};
use crate::config::{BoardConfig, Palette};
use crate::error::MoveError;
use crate::session::{BoardSession, load_board};

pub mod layout;
pub mod scene;
pub mod status;

use scene::{BoardScene, SceneOptions};
use status::{StatusMessage, StatusView};

/// Runtime board state for the page lifetime.
struct BoardState {
    doc: Document,
    config: BoardConfig,
    palette: Palette,
    session: BoardSession<TelegramBridge>,
}

thread_local! {
    static BOARD_STATE: std::cell::RefCell<Option<BoardState>> = const { std::cell::RefCell::new(None) };
}

pub fn start_board_mode(config: BoardConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let bridge = TelegramBridge::from_window().map_err(|e| {
        console::error!(format!("mini app bridge unavailable: {e}"));
        write_status(&doc, &config, &StatusView::failed(StatusMessage::LoadFailed));
        JsValue::from_str(&e.to_string())
    })?;
    bridge.ready();
    bridge.expand();

    let theme = bridge.theme_params();
    apply_theme(&doc, &theme, &config);
    let palette = resolve_palette(&win, &doc, &theme, &config);

    // --- Decode -------------------------------------------------------------
    let hash = win.location().hash().unwrap_or_default();
    let state = match load_board(&hash) {
        Ok(state) => state,
        Err(err) => {
            console::error!(format!("failed to load game data: {err}"));
            write_status(&doc, &config, &StatusView::failed(StatusMessage::from(&err)));
            return Ok(());
        }
    };

    let session = BoardSession::new(state, bridge);
    console::log!(format!(
        "board {n}x{n}, room {:?}, viewer {:?}",
        session.state().room_code.as_ref().map(|r| r.as_str()),
        session.viewer().map(|v| v.as_str()),
        n = session.state().grid_size,
    ));

    // --- Render -------------------------------------------------------------
    let svg = board_svg(&doc, &config)?;
    render(&svg, &doc, &config, &palette, &session)?;
    attach_click_handler(&svg)?;

    BOARD_STATE.with(|b| {
        b.replace(Some(BoardState {
            doc,
            config,
            palette,
            session,
        }))
    });
    Ok(())
}

fn board_svg(doc: &Document, config: &BoardConfig) -> Result<Element, JsValue> {
    doc.get_element_by_id(&config.svg_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{} element", config.svg_id)))
}

fn render(
    svg: &Element,
    doc: &Document,
    config: &BoardConfig,
    palette: &Palette,
    session: &BoardSession<TelegramBridge>,
) -> Result<(), JsValue> {
    let scene = BoardScene::build(
        session.state(),
        palette,
        SceneOptions {
            padding: config.padding,
            dot_radius: config.dot_radius,
            box_opacity: config.box_opacity,
            locked: session.is_locked(),
        },
    );
    svg.set_attribute("viewBox", &BoardScene::view_box())?;
    svg.set_inner_html(&scene.to_svg_markup());
    write_status(doc, config, &session.status());
    Ok(())
}

fn write_status(doc: &Document, config: &BoardConfig, view: &StatusView) {
    set_text(doc, &config.status_id, &view.message.to_string());
    if let Some([p1, p2]) = &view.scores {
        set_text(doc, &config.p1_score_id, p1);
        set_text(doc, &config.p2_score_id, p2);
    }
}

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

// --- Interaction ------------------------------------------------------------

fn attach_click_handler(svg: &Element) -> Result<(), JsValue> {
    // One delegated listener; lines are re-created on every render.
    let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
        let Some(index) = clicked_line_index(&evt) else {
            return;
        };
        BOARD_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                on_line_selected(state, index);
            }
        });
    }) as Box<dyn FnMut(_)>);
    svg.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn clicked_line_index(evt: &web_sys::MouseEvent) -> Option<usize> {
    let target: Element = evt.target()?.dyn_into().ok()?;
    let line = target.closest(".line.available").ok()??;
    line.get_attribute("data-index")?.parse().ok()
}

fn on_line_selected(state: &mut BoardState, index: usize) {
    match state.session.handle_selection(index) {
        Ok(intent) => {
            console::log!(format!(
                "sent {:?} line {} for room {}",
                intent.action, intent.index, intent.room_code
            ));
            // Locked scene: no line keeps the `available` class.
            let rendered = board_svg(&state.doc, &state.config).and_then(|svg| {
                render(&svg, &state.doc, &state.config, &state.palette, &state.session)
            });
            if let Err(err) = rendered {
                console::error!("failed to lock board", err);
            }
        }
        // Already sent; the host will reload us with the next board.
        Err(MoveError::Locked) => {}
        Err(err) => console::warn!(format!("move not sent: {err}")),
    }
}

// --- Theme ------------------------------------------------------------------

fn apply_theme(doc: &Document, theme: &ThemeParams, config: &BoardConfig) {
    let Some(root) = doc
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let style = root.style();
    let bg = theme.bg_color.as_deref().unwrap_or(&config.fallback_bg_color);
    let text = theme
        .text_color
        .as_deref()
        .unwrap_or(&config.fallback_text_color);
    let _ = style.set_property("--tg-theme-bg-color", bg);
    let _ = style.set_property("--tg-theme-text-color", text);
    if let Some(hint) = &theme.hint_color {
        let _ = style.set_property("--tg-theme-hint-color", hint);
    }
    if let Some(button) = &theme.button_color {
        let _ = style.set_property("--tg-theme-button-color", button);
    }
    if let Some(button_text) = &theme.button_text_color {
        let _ = style.set_property("--tg-theme-button-text-color", button_text);
    }
}

/// Config colours, overridden by the host page's `--player1-color` /
/// `--player2-color` and the theme text colour when present.
fn resolve_palette(
    win: &Window,
    doc: &Document,
    theme: &ThemeParams,
    config: &BoardConfig,
) -> Palette {
    let mut palette = Palette::from_config(config);
    if let Some(text) = &theme.text_color {
        palette.dot = text.clone();
    }
    let computed = doc
        .document_element()
        .and_then(|root| win.get_computed_style(&root).ok().flatten());
    if let Some(style) = computed {
        let css_var = |name: &str| {
            style
                .get_property_value(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if let Some(c) = css_var("--player1-color") {
            palette.player_one = c;
        }
        if let Some(c) = css_var("--player2-color") {
            palette.player_two = c;
        }
    }
    palette
}
