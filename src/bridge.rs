//! Host mini-app bridge.
//!
//! The board only talks to the host through [`HostBridge`]. In the browser
//! that is [`TelegramBridge`], a thin wrapper over `window.Telegram.WebApp`;
//! tests plug in a recording fake.

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::error::BridgeError;
use crate::state::PlayerId;

/// Colours the host exposes for its current theme. All optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeParams {
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub hint_color: Option<String>,
    pub button_color: Option<String>,
    pub button_text_color: Option<String>,
}

pub trait HostBridge {
    /// Tell the host the view finished loading.
    fn ready(&self);
    /// Ask the host to give the view its full height.
    fn expand(&self);
    /// Deliver a payload to the bot. Fire-and-forget.
    fn send_data(&self, data: &str);
    /// Show a modal notice.
    fn show_alert(&self, message: &str);
    /// Identifier of the user running the mini app, if the host provides one.
    fn current_user_id(&self) -> Option<PlayerId>;
    fn theme_params(&self) -> ThemeParams;
}

/// `window.Telegram.WebApp`.
pub struct TelegramBridge {
    web_app: Object,
}

impl TelegramBridge {
    pub fn from_window() -> Result<Self, BridgeError> {
        let window = web_sys::window().ok_or(BridgeError::NoWindow)?;
        let telegram = get_object(&window, "Telegram").ok_or(BridgeError::Unavailable("Telegram"))?;
        let web_app =
            get_object(&telegram, "WebApp").ok_or(BridgeError::Unavailable("Telegram.WebApp"))?;
        Ok(Self { web_app })
    }

    fn call(&self, method: &str, args: &[JsValue]) {
        let Ok(value) = Reflect::get(&self.web_app, &JsValue::from_str(method)) else {
            return;
        };
        let Ok(func) = value.dyn_into::<Function>() else {
            return;
        };
        let array = js_sys::Array::new();
        for arg in args {
            array.push(arg);
        }
        let _ = func.apply(&self.web_app, &array);
    }
}

impl HostBridge for TelegramBridge {
    fn ready(&self) {
        self.call("ready", &[]);
    }

    fn expand(&self) {
        self.call("expand", &[]);
    }

    fn send_data(&self, data: &str) {
        self.call("sendData", &[JsValue::from_str(data)]);
    }

    fn show_alert(&self, message: &str) {
        self.call("showAlert", &[JsValue::from_str(message)]);
    }

    fn current_user_id(&self) -> Option<PlayerId> {
        let init = get_object(&self.web_app, "initDataUnsafe")?;
        let user = get_object(&init, "user")?;
        let id = Reflect::get(&user, &JsValue::from_str("id")).ok()?;
        js_id(&id)
    }

    fn theme_params(&self) -> ThemeParams {
        let Some(params) = get_object(&self.web_app, "themeParams") else {
            return ThemeParams::default();
        };
        let color = |key: &str| {
            Reflect::get(&params, &JsValue::from_str(key))
                .ok()
                .and_then(|v| v.as_string())
                .filter(|s| !s.trim().is_empty())
        };
        ThemeParams {
            bg_color: color("bg_color"),
            text_color: color("text_color"),
            hint_color: color("hint_color"),
            button_color: color("button_color"),
            button_text_color: color("button_text_color"),
        }
    }
}

fn get_object(target: &JsValue, key: &str) -> Option<Object> {
    let value = Reflect::get(target, &JsValue::from_str(key)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    value.dyn_into::<Object>().ok()
}

/// Host user ids are JS numbers; accept strings too.
fn js_id(value: &JsValue) -> Option<PlayerId> {
    if let Some(n) = value.as_f64() {
        if n.fract() == 0.0 && n.is_finite() {
            return Some(PlayerId::from(n as i64));
        }
        return None;
    }
    value.as_string().map(PlayerId::new).filter(|id| !id.as_str().is_empty())
}
