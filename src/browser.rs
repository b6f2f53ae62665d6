use crate::input::channel::{InputEvent, INPUT_EVENT};
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::future::Future;
use wasm_bindgen::closure::{Closure, WasmClosure, WasmClosureFnOnce};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[rustfmt::skip]
use web_sys::{
    CanvasRenderingContext2d,
    CustomEvent,
    CustomEventInit,
    Document,
    Element,
    Event,
    EventTarget,
    HtmlCanvasElement,
    HtmlImageElement,
    KeyboardEvent,
    KeyboardEventInit,
    Response,
    Window,
};

// ==================== Constants ====================
// Constants related to HTML elements
mod html {
    pub const CANVAS_ID: &str = "canvas";
    pub const CONTEXT_2D: &str = "2d";
}

pub type LoopClosure = Closure<dyn FnMut(f64)>;

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

pub fn canvas() -> Result<HtmlCanvasElement> {
    document()?
        .get_element_by_id(html::CANVAS_ID)
        .ok_or_else(|| anyhow!("No Canvas Element found with ID : '{}'", html::CANVAS_ID))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlCanvasElement", element))
}

pub fn context() -> Result<CanvasRenderingContext2d> {
    canvas()?
        .get_context(html::CONTEXT_2D)
        // Result<Option<Object>, JsValue>
        // - JsValue error  -> anyhow
        // - None           -> anyhow
        .map_err(|js_value| anyhow!("Error getting context : {:#?}", js_value))?
        .ok_or_else(|| anyhow!("No 2d context found"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|element| {
            anyhow!(
                "Error converting {:#?} to CanvasRenderingContext2d",
                element
            )
        })
}

pub fn new_image() -> Result<HtmlImageElement> {
    HtmlImageElement::new()
        .map_err(|err| anyhow!("Could not create image element : {:#?}", err))
}

pub fn closure_once<F, T, A, R>(f: F) -> Closure<T>
where
    T: ?Sized + WasmClosure,
    F: 'static + WasmClosureFnOnce<T, A, R> + wasm_bindgen::__rt::marker::MaybeUnwindSafe,
{
    Closure::once(f)
}

pub fn closure_wrap<T: WasmClosure + ?Sized>(data: Box<T>) -> Closure<T> {
    Closure::wrap(data)
}

pub fn create_raf_closure(f: impl FnMut(f64) + 'static) -> LoopClosure {
    closure_wrap(Box::new(f) as Box<dyn FnMut(f64)>)
}

pub fn request_animation_frame(callback: &LoopClosure) -> Result<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame : {:#?}", err))
}

/// Milliseconds since page load
pub fn now() -> Result<f64> {
    Ok(window()?
        .performance()
        .ok_or_else(|| anyhow!("Performance object not found"))?
        .now())
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

pub async fn fetch_json<T>(json_path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let resp_value = fetch_with_str(json_path).await?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|element| anyhow!("error converting [{:#?}] to Response", element))?;
    if !resp.ok() {
        return Err(anyhow!("'{}' answered with status {}", json_path, resp.status()));
    }
    let json = resp
        .json()
        .map_err(|err| anyhow!("Could not get JSON from response [{:#?}]", err))?;

    let json_value = JsFuture::from(json)
        .await
        .map_err(|err| anyhow!("error fetching [{:#?}]", err))?;

    serde_wasm_bindgen::from_value(json_value)
        .map_err(|err| anyhow!("error converting response : {}", err))
}

async fn fetch_with_str(resource: &str) -> Result<JsValue> {
    let resp = window()?.fetch_with_str(resource);

    JsFuture::from(resp)
        .await
        .map_err(|err| anyhow!("error fetching : {:#?}", err))
}

/// Registers `handler` for `event_type` on `target` for the lifetime of the page.
pub fn add_listener<F>(target: &EventTarget, event_type: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = closure_wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Could not listen for '{}' : {:#?}", event_type, err))?;
    // page unload is the only teardown
    closure.forget();
    Ok(())
}

/// All elements matching a CSS selector, in document order
pub fn query_all(selector: &str) -> Result<Vec<Element>> {
    let nodes = document()?
        .query_selector_all(selector)
        .map_err(|err| anyhow!("Invalid selector '{}' : {:#?}", selector, err))?;
    Ok((0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Synthesizes a `keydown` / `keyup` on the window so keyboard readers see
/// on-screen presses exactly like physical ones.
pub fn dispatch_key_event(pressed: bool, code: &str) -> Result<()> {
    let init = KeyboardEventInit::new();
    init.set_code(code);
    init.set_key(code);
    init.set_bubbles(true);
    let event_type = if pressed { "keydown" } else { "keyup" };
    let event = KeyboardEvent::new_with_keyboard_event_init_dict(event_type, &init)
        .map_err(|err| anyhow!("Could not create {} for '{}' : {:#?}", event_type, code, err))?;
    window()?
        .dispatch_event(&event)
        .map_err(|err| anyhow!("Could not dispatch {} : {:#?}", event_type, err))?;
    Ok(())
}

/// Broadcasts `{ key, pressed }` on the custom input channel.
pub fn dispatch_input_event(input: &InputEvent) -> Result<()> {
    let detail = serde_wasm_bindgen::to_value(input)
        .map_err(|err| anyhow!("Could not serialize {:?} : {}", input, err))?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(INPUT_EVENT, &init)
        .map_err(|err| anyhow!("Could not create {} : {:#?}", INPUT_EVENT, err))?;
    window()?
        .dispatch_event(&event)
        .map_err(|err| anyhow!("Could not dispatch {} : {:#?}", INPUT_EVENT, err))?;
    Ok(())
}

pub fn toggle_fullscreen() -> Result<()> {
    let document = document()?;
    if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
        return Ok(());
    }
    document
        .document_element()
        .ok_or_else(|| anyhow!("No document element to make fullscreen"))?
        .request_fullscreen()
        .map_err(|err| anyhow!("Fullscreen request rejected : {:#?}", err))
}
