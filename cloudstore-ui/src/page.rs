//! Page Boot
//!
//! Builds the web-sys services, boots the `cloudstore` [`App`], forwards DOM
//! events into its bus and installs the functions inline handlers call.

use std::rc::Rc;

use cloudstore::platform::{Click, KeyPress, Link, Modifiers, PageEvent, Propagation, TouchPoint};
use cloudstore::{App, Browser, Config, PlatformError, PlatformResult, Services};
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, EventTarget, HtmlAnchorElement, KeyboardEvent, MouseEvent,
    PageTransitionEvent, TouchEvent,
};

use crate::components::LeptosGuidePresenter;
use crate::web::{
    js_error, DeferredPrompt, GlooHttp, WebDom, WebObserver, WebRegistrar, WebScheduler, WebStorage, WebWindow,
};

/// Boot the page components and bind them to the document
pub fn boot(config: Config) -> PlatformResult<()> {
    let window = web_sys::window().ok_or(PlatformError::Unsupported("window"))?;
    let document = window.document().ok_or(PlatformError::Unsupported("document"))?;

    let browser = Browser::new(
        Rc::new(WebDom::new(document.clone())?),
        Rc::new(WebWindow::new(window.clone())),
        Rc::new(WebStorage::new(&window)),
        Rc::new(WebScheduler::new(window.clone())),
    );
    let observer = Rc::new(WebObserver::new());

    let app = App::boot(
        &config,
        Services {
            browser,
            http: Rc::new(GlooHttp),
            observer: observer.clone(),
            registrar: Rc::new(WebRegistrar::new(&window)),
            presenter: Rc::new(LeptosGuidePresenter::new(document.clone())),
            random: Rc::new(js_sys::Math::random),
        },
    );

    let reveal = Rc::clone(&app.reveal);
    observer
        .connect(move |entries| reveal.on_intersections(&entries))
        .map_err(js_error)?;

    bind_events(&app, &window, &document)?;
    export_globals(&app, &window)?;
    replay_ready_state(&app, &window, &document)?;

    tracing::info!("Page bindings installed");
    Ok(())
}

// ============ Event Forwarding ============

fn listen(
    target: &EventTarget,
    name: &str,
    passive: bool,
    handler: impl Fn(&web_sys::Event) + 'static,
) -> PlatformResult<()> {
    let callback = Closure::wrap(Box::new(move |event: web_sys::Event| handler(&event)) as Box<dyn FnMut(web_sys::Event)>);

    let result = if passive {
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            callback.as_ref().unchecked_ref(),
            &options,
        )
    } else {
        target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
    };
    result.map_err(js_error)?;

    // Listeners live for the page
    callback.forget();
    Ok(())
}

/// Forward through the bus, honouring a `PreventDefault` outcome
fn forward(app: &Rc<App>, event: &web_sys::Event, page_event: PageEvent) {
    if app.dispatch(&page_event) == Propagation::PreventDefault {
        event.prevent_default();
    }
}

fn touch_point(event: &web_sys::Event) -> Option<TouchPoint> {
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
    Some(TouchPoint {
        screen_x: f64::from(touch.screen_x()),
        client_y: f64::from(touch.client_y()),
    })
}

fn key_press(event: &web_sys::Event) -> Option<KeyPress> {
    let event = event.dyn_ref::<KeyboardEvent>()?;
    Some(KeyPress::new(&event.key()).with(Modifiers {
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
    }))
}

fn click(event: &web_sys::Event) -> Option<Click> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let modifiers = Modifiers {
        ctrl: mouse.ctrl_key(),
        meta: mouse.meta_key(),
        shift: mouse.shift_key(),
        alt: mouse.alt_key(),
    };

    let anchor = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest("a").ok().flatten());

    let link = anchor.map(|anchor| Link {
        href: anchor
            .has_attribute("href")
            .then(|| anchor.dyn_ref::<HtmlAnchorElement>().map(HtmlAnchorElement::href))
            .flatten(),
        target: anchor.get_attribute("target").unwrap_or_default(),
        download: anchor.has_attribute("download"),
    });

    Some(Click { link, modifiers })
}

fn bind_events(app: &Rc<App>, window: &web_sys::Window, document: &Document) -> PlatformResult<()> {
    let doc: &EventTarget = document.as_ref();
    let win: &EventTarget = window.as_ref();

    let a = Rc::clone(app);
    listen(doc, "touchstart", true, move |e| {
        if let Some(point) = touch_point(e) {
            a.dispatch(&PageEvent::TouchStart(point));
        }
    })?;

    let a = Rc::clone(app);
    listen(doc, "touchmove", true, move |e| {
        if let Some(point) = touch_point(e) {
            a.dispatch(&PageEvent::TouchMove(point));
        }
    })?;

    let a = Rc::clone(app);
    listen(doc, "touchend", true, move |e| {
        if let Some(point) = touch_point(e) {
            a.dispatch(&PageEvent::TouchEnd(point));
        }
    })?;

    let a = Rc::clone(app);
    listen(doc, "keydown", false, move |e| {
        if let Some(key) = key_press(e) {
            forward(&a, e, PageEvent::KeyDown(key));
        }
    })?;

    let a = Rc::clone(app);
    listen(doc, "click", false, move |e| {
        if let Some(click) = click(e) {
            forward(&a, e, PageEvent::Click(click));
        }
    })?;

    let a = Rc::clone(app);
    listen(win, "pageshow", false, move |e| {
        let persisted = e
            .dyn_ref::<PageTransitionEvent>()
            .map(PageTransitionEvent::persisted)
            .unwrap_or(false);
        a.dispatch(&PageEvent::PageShow { persisted });
    })?;

    let a = Rc::clone(app);
    listen(win, "popstate", false, move |_| {
        a.dispatch(&PageEvent::PopState);
    })?;

    let a = Rc::clone(app);
    listen(win, "beforeinstallprompt", false, move |e| {
        let prompt = Rc::new(DeferredPrompt::new(e.clone().into()));
        forward(&a, e, PageEvent::BeforeInstallPrompt(prompt));
    })?;

    let a = Rc::clone(app);
    listen(win, "appinstalled", false, move |_| {
        a.dispatch(&PageEvent::AppInstalled);
    })?;

    Ok(())
}

/// Deliver `DOMContentLoaded`/`load` now if the page is already past them
fn replay_ready_state(app: &Rc<App>, window: &web_sys::Window, document: &Document) -> PlatformResult<()> {
    let state = document.ready_state();

    if state == "loading" {
        let a = Rc::clone(app);
        listen(document.as_ref(), "DOMContentLoaded", false, move |_| {
            a.dispatch(&PageEvent::DomContentLoaded);
        })?;
    } else {
        app.dispatch(&PageEvent::DomContentLoaded);
    }

    if state == "complete" {
        app.dispatch(&PageEvent::Load);
    } else {
        let a = Rc::clone(app);
        listen(window.as_ref(), "load", false, move |_| {
            a.dispatch(&PageEvent::Load);
        })?;
    }

    Ok(())
}

// ============ Global Functions ============

fn set(target: &JsValue, name: &str, value: &JsValue) -> PlatformResult<()> {
    Reflect::set(target, &JsValue::from_str(name), value)
        .map(|_| ())
        .map_err(js_error)
}

fn action(f: impl Fn() + 'static) -> JsValue {
    Closure::wrap(Box::new(f) as Box<dyn Fn()>).into_js_value()
}

fn action1(f: impl Fn(JsValue) + 'static) -> JsValue {
    Closure::wrap(Box::new(f) as Box<dyn Fn(JsValue)>).into_js_value()
}

fn action2(f: impl Fn(JsValue, JsValue) + 'static) -> JsValue {
    Closure::wrap(Box::new(f) as Box<dyn Fn(JsValue, JsValue)>).into_js_value()
}

/// Numeric id from an inline handler argument (`42` or `"42"`)
fn intake_id(value: &JsValue) -> Option<u64> {
    match value.as_f64() {
        Some(n) if n >= 0.0 && n.fract() == 0.0 => Some(n as u64),
        Some(_) => None,
        None => value.as_string()?.trim().parse().ok(),
    }
}

fn export_globals(app: &Rc<App>, window: &web_sys::Window) -> PlatformResult<()> {
    let win: &JsValue = window.as_ref();

    let chrome: JsValue = Object::new().into();
    let a = Rc::clone(app);
    set(&chrome, "openSidebar", &action(move || a.sidebar.open()))?;
    let a = Rc::clone(app);
    set(&chrome, "closeSidebar", &action(move || a.sidebar.close()))?;
    let a = Rc::clone(app);
    set(
        &chrome,
        "handleGlobalSearch",
        &action1(move |event| {
            let key = Reflect::get(&event, &JsValue::from_str("key"))
                .ok()
                .and_then(|key| key.as_string())
                .unwrap_or_default();
            a.search.handle_key(&key);
        }),
    )?;
    let a = Rc::clone(app);
    set(&chrome, "checkUnreadMessages", &action(move || a.check_unread_messages()))?;

    let a = Rc::clone(app);
    let show_toast = action2(move |message, duration| {
        let message = message.as_string().unwrap_or_default();
        let duration = duration.as_f64().filter(|ms| *ms >= 0.0).map(|ms| ms as u32);
        a.toaster.show(&message, duration);
    });
    set(&chrome, "showToast", &show_toast)?;
    set(win, "showToast", &show_toast)?;
    set(win, "cloudstore", &chrome)?;

    let pwa: JsValue = Object::new().into();
    let a = Rc::clone(app);
    let install_app = action(move || a.install_app());
    set(&pwa, "installApp", &install_app)?;
    set(win, "installApp", &install_app)?;
    let a = Rc::clone(app);
    set(&pwa, "showIOSInstallModal", &action(move || a.install.show_ios_install_modal()))?;
    let a = Rc::clone(app);
    set(&pwa, "hideInstallButtons", &action(move || a.install.hide_install_buttons()))?;
    let a = Rc::clone(app);
    let close_banner = action(move || a.install.close_install_banner());
    set(&pwa, "closeInstallBanner", &close_banner)?;
    set(win, "closeInstallBanner", &close_banner)?;
    set(win, "pwa", &pwa)?;

    let a = Rc::clone(app);
    set(
        win,
        "deleteIntake",
        &action1(move |id| match intake_id(&id) {
            Some(id) => a.delete_intake(id),
            None => tracing::warn!(id = ?id, "deleteIntake called without a numeric id"),
        }),
    )?;

    Ok(())
}
