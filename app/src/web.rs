//! Browser entry point.

use std::cell::RefCell;
use std::rc::Rc;

use glint_core::uniform::{UniformMap, UniformValue};
use glint_vfs::FetchProvider;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::application::{Application, init_logging};
use crate::config::AppConfig;
use crate::error::AppError;

fn page_error(message: &str) -> AppError {
    AppError::Page(message.to_owned())
}

fn to_js(err: AppError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The canvas named `id`, or a new canvas appended to the body.
fn canvas(id: Option<&str>) -> Result<HtmlCanvasElement, AppError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| page_error("no document"))?;

    if let Some(id) = id {
        return document
            .get_element_by_id(id)
            .ok_or_else(|| page_error(&format!("no element with id {id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| page_error(&format!("element {id} is not a canvas")));
    }

    let canvas = document
        .create_element("canvas")
        .map_err(|_| page_error("cannot create canvas"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| page_error("created element is not a canvas"))?;
    document
        .body()
        .ok_or_else(|| page_error("no body"))?
        .append_child(&canvas)
        .map_err(|_| page_error("cannot attach canvas"))?;
    Ok(canvas)
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Draw `app` every animation frame, feeding it `u_time` in seconds.
fn run_frames(app: Rc<Application>) -> Result<(), JsValue> {
    let performance = web_sys::window()
        .and_then(|window| window.performance())
        .ok_or_else(|| JsValue::from_str("no performance timer"))?;

    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    *frame.borrow_mut() = Some(Closure::new(move || {
        let mut uniforms = UniformMap::new();
        uniforms.insert(
            "u_time".into(),
            UniformValue::Float((performance.now() / 1000.0) as f32),
        );
        if let Err(err) = app.render_frame(&uniforms) {
            log::error!("Frame failed, stopping: {err}");
            return;
        }
        if let Some(callback) = next.borrow().as_ref()
            && let Err(err) = request_animation_frame(callback)
        {
            log::error!("requestAnimationFrame failed: {err:?}");
        }
    }));

    if let Some(callback) = frame.borrow().as_ref() {
        request_animation_frame(callback)?;
    }
    Ok(())
}

/// Start the viewer from a TOML configuration document.
///
/// Assets are fetched relative to the page.
#[wasm_bindgen]
pub async fn start(config: String) -> Result<(), JsValue> {
    let config = AppConfig::from_toml_str(&config).map_err(to_js)?;
    init_logging(config.level());

    let canvas = canvas(config.canvas_id.as_deref()).map_err(to_js)?;
    let app = Application::new(config, FetchProvider::new(""), canvas).map_err(to_js)?;
    let model = app.load_model().await.map_err(to_js)?;
    log::info!("Drawing model {}", model.name());

    run_frames(Rc::new(app))
}
