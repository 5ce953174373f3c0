#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the portfolio page.
//!
//! This module binds [`super::runner_core::RunnerCore`] to the live document:
//! it reads the page structure once, forwards browser events to the core and
//! applies the [`HostCommand`]s it produces. Only compiled on `wasm32`
//! targets.
//!
//! Every optional element (nav, cursor blob, hamburger, rotator images) is
//! looked up independently; a missing one disables only its own feature.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use folio_core::chrome::{
    ElementRect, ORIENTATION_SETTLE_DELAY, PARALLAX_MOVEMENT_PX, PARTICLE_END_Y,
    PARTICLE_START_BELOW_PX, Particle, parallax_offset,
};
use folio_core::{FolioConfig, ObserverOptions, SectionId, VisibilityObserver, VisibilitySample};
use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MouseEvent,
    ScrollRestoration, Window,
};
use web_time::Instant;

use super::commands::HostCommand;
use super::runner_core::RunnerCore;

const SECTION_SELECTOR: &str = ".section[id]";
const NAV_LINK_SELECTOR: &str = ".hero-nav-link";
const NAVIGABLE_LINK_SELECTOR: &str = ".hero-nav-link, .nav-menu a";
const ACTIVE_CLASS: &str = "active";
const SCROLL_TOP_SELECTOR: &str = ".scroll-to-top";

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn query_html(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

fn media_matches(window: &Window, query: &str) -> Option<bool> {
    window
        .match_media(query)
        .ok()
        .flatten()
        .map(|list| list.matches())
}

fn inner_height(window: &Window) -> Option<f64> {
    window.inner_height().ok().and_then(|v| v.as_f64())
}

fn inner_width(window: &Window) -> Option<f64> {
    window.inner_width().ok().and_then(|v| v.as_f64())
}

fn set_timeout(window: &Window, delay: Duration, callback: impl FnOnce() + 'static) {
    let callback = Closure::once_into_js(callback);
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let _ = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis);
}

/// A registered DOM listener, detached when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

fn listen(
    listeners: &mut Vec<Listener>,
    target: &EventTarget,
    event: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    let added = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &options,
    );
    if added.is_ok() {
        listeners.push(Listener {
            target: target.clone(),
            event,
            closure,
        });
    }
}

/// Run `f` against the live page if the app has not been dropped.
fn with_page(weak: &Weak<RefCell<Page>>, f: impl FnOnce(&mut Page)) {
    let Some(page) = weak.upgrade() else {
        return;
    };
    let Ok(mut page) = page.try_borrow_mut() else {
        return;
    };
    page.sync_clock();
    f(&mut page);
    page.flush();
}

/// Document handles plus the runner core.
struct Page {
    core: RunnerCore,
    started: Instant,
    window: Window,
    document: Document,
    nav_links: Vec<Element>,
    nav: Option<HtmlElement>,
    blob: Option<HtmlElement>,
    hamburger: Option<Element>,
    nav_menu: Option<Element>,
    scroll_top_button: Option<HtmlElement>,
    particle_layer: Option<Element>,
    rotator_images: Vec<Element>,
    observer: Option<IntersectionObserver>,
    observer_callback: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
}

impl Page {
    fn sync_clock(&mut self) {
        self.core
            .set_time_ms(self.started.elapsed().as_secs_f64() * 1000.0);
    }

    fn flush(&mut self) {
        loop {
            let commands = self.core.take_commands();
            if commands.is_empty() {
                break;
            }
            for command in commands {
                self.apply(command);
            }
        }
    }

    fn apply(&mut self, command: HostCommand) {
        match command {
            HostCommand::SetActiveLink(id) => {
                let href = id.href();
                for link in &self.nav_links {
                    let matches = link.get_attribute("href").as_deref() == Some(href.as_str());
                    set_class(link, ACTIVE_CLASS, matches);
                }
            }
            HostCommand::ScrollToSection(request) => {
                let Some(section) = self.document.get_element_by_id(request.target.as_str())
                else {
                    return;
                };
                let top = section.get_bounding_client_rect().top();
                self.core.begin_scroll(&request, top);
            }
            HostCommand::ScrollWindow { y } => {
                let x = self.window.scroll_x().unwrap_or(0.0);
                self.window.scroll_to_with_x_and_y(x, y);
            }
            HostCommand::PlaceCursor { x, y, opacity } => {
                let Some(blob) = &self.blob else {
                    return;
                };
                set_style(blob, "left", &format!("{x}px"));
                set_style(blob, "top", &format!("{y}px"));
                if let Some(opacity) = opacity {
                    set_style(blob, "opacity", &opacity.to_string());
                }
            }
            HostCommand::SetNavHidden(hidden) => {
                if let Some(nav) = &self.nav {
                    let y = if hidden { "-100px" } else { "0px" };
                    set_style(nav, "transform", &format!("translateY({y})"));
                }
            }
            HostCommand::SetScrollTopVisible(visible) => {
                if let Some(button) = &self.scroll_top_button {
                    set_style(button, "opacity", if visible { "1" } else { "0" });
                    set_style(
                        button,
                        "transform",
                        if visible { "translateY(0)" } else { "translateY(20px)" },
                    );
                }
            }
            HostCommand::SetScrollTopPresent(true) => self.create_scroll_top_button(),
            HostCommand::SetScrollTopPresent(false) => {
                if let Some(button) = self.scroll_top_button.take() {
                    button.remove();
                }
            }
            HostCommand::SpawnParticle(particle) => self.spawn_particle(&particle),
            HostCommand::SetMenuOpen(open) => {
                for el in self.hamburger.iter().chain(self.nav_menu.iter()) {
                    set_class(el, ACTIVE_CLASS, open);
                }
            }
            HostCommand::SwapImage { previous, current } => {
                if let Some(el) = self.rotator_images.get(previous) {
                    set_class(el, ACTIVE_CLASS, false);
                }
                if let Some(el) = self.rotator_images.get(current) {
                    set_class(el, ACTIVE_CLASS, true);
                }
            }
            HostCommand::SetCssVar { name, value } => {
                if let Some(root) = self
                    .document
                    .document_element()
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                {
                    set_style(&root, name, &value);
                }
            }
        }
    }

    fn create_scroll_top_button(&mut self) {
        if self.scroll_top_button.is_some() {
            return;
        }
        let Some(body) = self.document.body() else {
            return;
        };
        let Ok(button) = self.document.create_element("button") else {
            return;
        };
        button.set_class_name("scroll-to-top");
        button.set_text_content(Some("\u{2191}"));
        let _ = button.set_attribute("aria-label", "Scroll to top");
        let Ok(button) = button.dyn_into::<HtmlElement>() else {
            return;
        };
        set_style(&button, "opacity", "0");
        set_style(&button, "transform", "translateY(20px)");
        if body.append_child(&button).is_ok() {
            self.scroll_top_button = Some(button);
        }
    }

    fn ensure_particle_layer(&mut self) -> Option<Element> {
        if let Some(layer) = &self.particle_layer {
            return Some(layer.clone());
        }
        let body = self.document.body()?;
        let layer = self.document.create_element("div").ok()?;
        layer.set_class_name("particles");
        body.append_child(&layer).ok()?;
        self.particle_layer = Some(layer.clone());
        Some(layer)
    }

    /// Animate one particle with CSS transitions: a linear rise with the
    /// opacity climbing until the fade-out, then a fade to zero and removal.
    fn spawn_particle(&mut self, particle: &Particle) {
        let Some(layer) = self.ensure_particle_layer() else {
            return;
        };
        let Some(el) = self
            .document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        el.set_class_name("particle");
        let start_y = inner_height(&self.window).unwrap_or(0.0) + PARTICLE_START_BELOW_PX;
        set_style(
            &el,
            "transform",
            &format!("translate({}px, {start_y}px)", particle.start_x),
        );
        set_style(&el, "opacity", "0");
        if layer.append_child(&el).is_err() {
            return;
        }
        // Commit the start state before the transition is set.
        let _ = el.offset_width();

        let flight = particle.duration.as_secs_f64();
        let fade_at = particle.fade_out_at();
        set_style(
            &el,
            "transition",
            &format!(
                "transform {flight}s linear, opacity {}s linear",
                fade_at.as_secs_f64()
            ),
        );
        set_style(
            &el,
            "transform",
            &format!("translate({}px, {PARTICLE_END_Y}px)", particle.end_x),
        );
        set_style(&el, "opacity", &particle.peak_opacity().to_string());

        let fading = el.clone();
        let fade = particle.fade_out.as_secs_f64();
        set_timeout(&self.window, fade_at, move || {
            set_style(
                &fading,
                "transition",
                &format!("transform {flight}s linear, opacity {fade}s linear"),
            );
            set_style(&fading, "opacity", "0");
        });
        set_timeout(&self.window, particle.duration, move || el.remove());
    }

    fn start_observer(&mut self, options: &ObserverOptions, weak: Weak<RefCell<Page>>) {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let samples: Vec<VisibilitySample> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        VisibilitySample::new(
                            entry.target().id(),
                            entry.intersection_ratio(),
                            entry.is_intersecting(),
                        )
                    })
                    .collect();
                with_page(&weak, |page| {
                    page.core.on_visibility_entries(samples);
                });
            },
        );

        let thresholds = Array::new();
        for t in &options.thresholds {
            thresholds.push(&JsValue::from_f64(*t));
        }
        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin.to_css());
        init.set_threshold(&thresholds);
        let Ok(observer) =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        else {
            console_error("folio: IntersectionObserver unavailable, section tracking is click-only");
            return;
        };
        let mut dom = DomObserver {
            observer,
            document: self.document.clone(),
        };
        dom.observe(&self.core.observed_sections());
        self.observer = Some(dom.observer);
        self.observer_callback = Some(callback);
    }
}

/// Browser intersection observer bound to section elements by id.
struct DomObserver {
    observer: IntersectionObserver,
    document: Document,
}

impl VisibilityObserver for DomObserver {
    fn observe(&mut self, sections: &[SectionId]) {
        for id in sections {
            // Sections without an element are skipped.
            if let Some(el) = self.document.get_element_by_id(id.as_str()) {
                self.observer.observe(&el);
            }
        }
    }
}

/// Page controller exported to JavaScript.
///
/// Keep the instance alive for the lifetime of the page: dropping it
/// disconnects the observer and detaches every listener.
#[wasm_bindgen]
pub struct FolioApp {
    page: Rc<RefCell<Page>>,
    listeners: Vec<Listener>,
    frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    started: bool,
}

impl FolioApp {
    fn build(config: FolioConfig) -> Result<Self, JsValue> {
        install_panic_hook();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let section_ids: Vec<String> = query_all(&document, SECTION_SELECTOR)
            .iter()
            .map(Element::id)
            .collect();
        let core = RunnerCore::new(section_ids, config);

        let page = Page {
            core,
            started: Instant::now(),
            nav_links: query_all(&document, NAV_LINK_SELECTOR),
            nav: query_html(&document, ".nav"),
            blob: document
                .get_element_by_id("blob")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            hamburger: document.query_selector(".hamburger").ok().flatten(),
            nav_menu: document.query_selector(".nav-menu").ok().flatten(),
            scroll_top_button: None,
            particle_layer: None,
            rotator_images: query_all(&document, ".glitch-container .glitch-image"),
            observer: None,
            observer_callback: None,
            window,
            document,
        };
        Ok(Self {
            page: Rc::new(RefCell::new(page)),
            listeners: Vec::new(),
            frame: Rc::new(RefCell::new(None)),
            started: false,
        })
    }

    fn attach_navigation(&mut self, weak: &Weak<RefCell<Page>>) {
        let (links, hamburger) = {
            let page = self.page.borrow();
            (
                query_all(&page.document, NAVIGABLE_LINK_SELECTOR),
                page.hamburger.clone(),
            )
        };
        for link in links {
            let weak = weak.clone();
            listen(&mut self.listeners, &link, "click", false, move |event| {
                let Some(link) = event
                    .current_target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                else {
                    return;
                };
                let href = link.get_attribute("href").unwrap_or_default();
                let in_menu = link.closest(".nav-menu").ok().flatten().is_some();
                with_page(&weak, |page| {
                    if page.core.navigate_href(&href) {
                        event.prevent_default();
                    }
                    if in_menu {
                        page.core.menu_link_followed();
                    }
                });
            });
        }

        let menu_present = self.page.borrow().nav_menu.is_some();
        if let (Some(hamburger), true) = (hamburger, menu_present) {
            let weak = weak.clone();
            listen(&mut self.listeners, &hamburger, "click", false, move |_| {
                with_page(&weak, |page| page.core.toggle_menu());
            });
        }
    }

    fn attach_window(&mut self, weak: &Weak<RefCell<Page>>) {
        let (window, document) = {
            let page = self.page.borrow();
            (page.window.clone(), page.document.clone())
        };

        let w = weak.clone();
        listen(&mut self.listeners, &window, "scroll", true, move |_| {
            with_page(&w, |page| {
                let y = page.window.scroll_y().unwrap_or(0.0);
                page.core.on_scroll(y);
            });
        });

        let w = weak.clone();
        listen(&mut self.listeners, &window, "resize", true, move |_| {
            with_page(&w, |page| {
                if let Some(width) = inner_width(&page.window) {
                    page.core.set_viewport_width(width);
                }
                if let Some(height) = inner_height(&page.window) {
                    page.core.on_resize(height);
                }
            });
        });

        let w = weak.clone();
        let settle_window = window.clone();
        listen(&mut self.listeners, &window, "orientationchange", true, move |_| {
            let w = w.clone();
            set_timeout(&settle_window, ORIENTATION_SETTLE_DELAY, move || {
                with_page(&w, |page| {
                    if let Some(width) = inner_width(&page.window) {
                        page.core.set_viewport_width(width);
                    }
                    if let Some(height) = inner_height(&page.window) {
                        page.core.apply_viewport(height);
                    }
                });
            });
        });

        let w = weak.clone();
        listen(&mut self.listeners, &document, "visibilitychange", false, move |_| {
            with_page(&w, |page| {
                let hidden = page.document.hidden();
                page.core.set_document_hidden(hidden);
            });
        });

        if let Ok(Some(query)) = window.match_media("(prefers-reduced-motion: reduce)") {
            let w = weak.clone();
            listen(&mut self.listeners, &query, "change", false, move |_| {
                with_page(&w, |page| {
                    let reduced =
                        media_matches(&page.window, "(prefers-reduced-motion: reduce)")
                            .unwrap_or(false);
                    page.core.set_reduced_motion(reduced);
                });
            });
        }

        let w = weak.clone();
        listen(&mut self.listeners, &window, "beforeunload", false, move |_| {
            with_page(&w, |page| page.core.reset_scroll_position());
        });

        // The button comes and goes with the viewport width, so its clicks
        // are caught at the document.
        let w = weak.clone();
        listen(&mut self.listeners, &document, "click", false, move |event| {
            let on_button = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(SCROLL_TOP_SELECTOR).ok().flatten())
                .is_some();
            if on_button {
                with_page(&w, |page| page.core.scroll_to_top());
            }
        });
    }

    fn attach_cursor(&mut self, weak: &Weak<RefCell<Page>>) {
        let (window, document, has_blob) = {
            let page = self.page.borrow();
            (page.window.clone(), page.document.clone(), page.blob.is_some())
        };
        let touch_only = media_matches(&window, "(hover: none)").unwrap_or(false);
        if touch_only || !has_blob {
            self.page.borrow_mut().core.disable_cursor();
            return;
        }

        let w = weak.clone();
        listen(&mut self.listeners, &window, "mousemove", true, move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = (f64::from(mouse.client_x()), f64::from(mouse.client_y()));
            with_page(&w, |page| page.core.pointer_moved(x, y));
        });

        for el in query_all(&document, "[data-cursor-hover]") {
            let parallax = el.has_attribute("data-cursor-parallax");
            let w = weak.clone();
            listen(&mut self.listeners, &el, "mouseenter", false, move |_| {
                with_page(&w, |page| page.core.set_hovering(true));
            });
            let w = weak.clone();
            listen(&mut self.listeners, &el, "mouseleave", false, move |event| {
                if parallax {
                    if let Some(el) = event
                        .current_target()
                        .and_then(|t| t.dyn_into::<HtmlElement>().ok())
                    {
                        set_style(&el, "transform", "translate(0px, 0px)");
                    }
                }
                with_page(&w, |page| page.core.set_hovering(false));
            });
            if parallax {
                listen(&mut self.listeners, &el, "mousemove", true, move |event| {
                    let (Some(mouse), Some(el)) = (
                        event.dyn_ref::<MouseEvent>(),
                        event
                            .current_target()
                            .and_then(|t| t.dyn_into::<HtmlElement>().ok()),
                    ) else {
                        return;
                    };
                    let rect = el.get_bounding_client_rect();
                    let (dx, dy) = parallax_offset(
                        ElementRect {
                            left: rect.left(),
                            top: rect.top(),
                            width: rect.width(),
                            height: rect.height(),
                        },
                        f64::from(mouse.client_x()),
                        f64::from(mouse.client_y()),
                        PARALLAX_MOVEMENT_PX,
                    );
                    set_style(&el, "transform", &format!("translate({dx}px, {dy}px)"));
                });
            }
        }
    }

    fn schedule_timers(&self, weak: &Weak<RefCell<Page>>) {
        let page = self.page.borrow();
        for delay in page.core.checkpoint_delays() {
            let w = weak.clone();
            set_timeout(&page.window, delay, move || with_page(&w, |page| page.core.tick()));
        }
        let w = weak.clone();
        set_timeout(&page.window, page.core.observe_delay(), move || {
            with_page(&w, |page| {
                if let Some(options) = page.core.observer_ready() {
                    page.start_observer(&options, w.clone());
                }
            });
        });
    }

    fn start_frame_loop(&self, weak: &Weak<RefCell<Page>>) {
        let handle = Rc::clone(&self.frame);
        let w = weak.clone();
        let window = self.page.borrow().window.clone();
        *self.frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_ts: f64| {
            if w.upgrade().is_none() {
                return;
            }
            with_page(&w, |page| page.core.frame());
            if let Some(callback) = handle.borrow().as_ref() {
                let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
            }
        }));
        let page = self.page.borrow();
        if let Some(callback) = self.frame.borrow().as_ref() {
            let _ = page
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }
}

#[wasm_bindgen]
impl FolioApp {
    /// Read the page structure. Call [`FolioApp::start`] once the DOM is ready.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<FolioApp, JsValue> {
        Self::build(FolioConfig::default())
    }

    /// Wire listeners, activate the default section and start the frame loop.
    /// Subsequent calls are no-ops.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let weak = Rc::downgrade(&self.page);
        {
            let mut page = self.page.borrow_mut();
            if let Ok(history) = page.window.history() {
                let _ = history.set_scroll_restoration(ScrollRestoration::Manual);
            }
            let reduced = media_matches(&page.window, "(prefers-reduced-motion: reduce)")
                .unwrap_or(false);
            page.core.set_reduced_motion(reduced);
            let hidden = page.document.hidden();
            page.core.set_document_hidden(hidden);
            page.sync_clock();
            page.core.reset_scroll_position();
            if let Some(width) = inner_width(&page.window) {
                page.core.set_viewport_width(width);
            }
            if let Some(height) = inner_height(&page.window) {
                page.core.apply_viewport(height);
            }
            let images = page.rotator_images.len();
            if images > 0 {
                page.core.start_rotator(images);
            }
            page.core.start_particles((js_sys::Math::random() * 2f64.powi(53)) as u64);
            page.core.init();
            page.flush();
        }
        self.attach_navigation(&weak);
        self.attach_window(&weak);
        self.attach_cursor(&weak);
        self.schedule_timers(&weak);
        self.start_frame_loop(&weak);
    }

    /// Navigate as if a link with `href` (`#<id>`) was clicked.
    pub fn navigate(&mut self, href: &str) -> bool {
        let weak = Rc::downgrade(&self.page);
        let mut consumed = false;
        with_page(&weak, |page| consumed = page.core.navigate_href(href));
        consumed
    }

    /// Id of the active section, if any.
    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.page
            .borrow()
            .core
            .active()
            .map(|id| id.as_str().to_owned())
    }

    /// Drain structured log lines accumulated since the last call.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let logs = Array::new();
        for line in self.page.borrow_mut().core.take_logs() {
            logs.push(&JsValue::from_str(&line));
        }
        logs
    }
}

#[cfg(feature = "config")]
#[wasm_bindgen]
impl FolioApp {
    /// Build with a TOML or JSON configuration string.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(source: &str) -> Result<FolioApp, JsValue> {
        let parsed = if source.trim_start().starts_with('{') {
            FolioConfig::from_json_str(source)
        } else {
            FolioConfig::from_toml_str(source)
        };
        let config = parsed.map_err(|err| JsValue::from_str(&err.to_string()))?;
        Self::build(config)
    }
}

impl Drop for FolioApp {
    fn drop(&mut self) {
        if let Ok(mut page) = self.page.try_borrow_mut() {
            if let Some(observer) = page.observer.take() {
                observer.disconnect();
            }
        }
        // The frame callback stays allocated: a pending animation frame may
        // still call it, and it stops rescheduling once the page is gone.
    }
}

/// Parse `#<id>` hrefs the same way the click handler does.
#[wasm_bindgen(js_name = sectionFromHref)]
pub fn section_from_href(href: &str) -> Option<String> {
    SectionId::from_href(href).map(|id| id.as_str().to_owned())
}
