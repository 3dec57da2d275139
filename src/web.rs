//! Browser bindings.
//!
//! [`attach_particle_background`] runs a field on a `<canvas>` behind a page
//! section, and [`start_showcase`] wires the whole page: the background plus
//! the controllers from [`crate::showcase`].
//!
//! ```js
//! import init, { start_showcase } from "./pkg/backdrop.js";
//! await init();
//! start_showcase(JSON.stringify({ teaser: [{ source: "a.mp4", title: "A" }] }));
//! ```
//!
//! Every closure handed to the DOM is owned by a Rust value ([`Listener`],
//! [`Observer`], or the frame callback cell) and detached when that value is
//! dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement,
    HtmlMediaElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::frame_loop::{AnimationLoop, FrameHost};
use crate::input::KeyCode;
use crate::showcase::{
    anchor_target, reveal_delay, CounterAnimation, FullscreenToggle, LazyLoad, MediaItem, Navigation,
    ParallaxLayer, PlayButton, PlaybackAction, ShowcaseConfig, TeaserPlaylist, VideoCommand,
    CAROUSEL_PLAY_THRESHOLD, HOVER_PLAYBACK_RATE, LAZY_LOAD_MARGIN, NORMAL_PLAYBACK_RATE,
};
use crate::surface::Surface;
use crate::visuals::Rgba;

/// Canvas the showcase page draws its background on.
const PARTICLE_CANVAS_ID: &str = "particle-canvas";

/// Video cards in the results carousel.
const CAROUSEL_ITEMS: &str = ".results-carousel .item.video-card-enhanced";

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn viewport_size(window: &Window) -> (u32, u32) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w.max(0.0) as u32, h.max(0.0) as u32)
}

fn scroll_smoothly_to(element: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

fn media_in(container: &Element) -> Option<HtmlMediaElement> {
    container
        .query_selector("video")
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlMediaElement>().ok())
}

fn select_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

// ============================================================================
// Canvas surface
// ============================================================================

/// A [`Surface`] over a canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba, glow: f32) {
        let css = color.to_css();
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, std::f64::consts::TAU)
            .is_err()
        {
            return;
        }
        self.ctx.set_shadow_blur(glow as f64);
        self.ctx.set_shadow_color(&css);
        self.ctx.set_fill_style_str(&css);
        self.ctx.fill();
        self.ctx.set_shadow_blur(0.0);
    }
}

// ============================================================================
// DOM plumbing
// ============================================================================

/// An event listener that is removed when dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// An intersection observer that disconnects when dropped.
pub struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Observer {
    /// Observe with a visibility `threshold`; `f` runs once per entry.
    pub fn new(threshold: f64, mut f: impl FnMut(IntersectionObserverEntry) + 'static) -> Result<Self, JsValue> {
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        Self::with_options(&init, move |entry, _| f(entry))
    }

    /// Observe against the viewport grown by `margin` (CSS syntax, e.g.
    /// `"200px"`). `f` also gets the observer so it can unobserve targets.
    pub fn with_root_margin(
        margin: &str,
        f: impl FnMut(IntersectionObserverEntry, &IntersectionObserver) + 'static,
    ) -> Result<Self, JsValue> {
        let init = IntersectionObserverInit::new();
        init.set_root_margin(margin);
        Self::with_options(&init, f)
    }

    fn with_options(
        init: &IntersectionObserverInit,
        mut f: impl FnMut(IntersectionObserverEntry, &IntersectionObserver) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    f(entry, &observer);
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), init)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

// ============================================================================
// Particle background
// ============================================================================

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// [`FrameHost`] over `requestAnimationFrame`.
pub struct RafHost {
    window: Window,
    callback: FrameCallback,
}

impl FrameHost for RafHost {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    }
}

struct Background {
    field: ParticleField<CanvasSurface>,
    frame_loop: AnimationLoop<RafHost>,
}

/// Handle to a running particle background. Dropping it stops the animation
/// and detaches every listener.
#[wasm_bindgen]
pub struct ParticleBackground {
    window: Option<Window>,
    state: Option<Rc<RefCell<Background>>>,
    callback: Option<FrameCallback>,
    observer: Option<Observer>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Whether a canvas was found and the field is running.
    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.state.is_some()
    }

    /// Report visibility by hand, for pages that track it themselves.
    pub fn set_visible(&self, visible: bool) {
        if let Some(state) = &self.state {
            if let Ok(mut bg) = state.try_borrow_mut() {
                let bg = &mut *bg;
                bg.frame_loop.set_visible(visible, &mut bg.field);
            }
        }
    }

    /// Stop the animation and detach from the page.
    pub fn stop(&mut self) {
        self.listeners.clear();
        self.observer = None;
        if let Some(state) = self.state.take() {
            if let Ok(mut bg) = state.try_borrow_mut() {
                if let (Some(handle), Some(window)) = (bg.frame_loop.cancel(), &self.window) {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }
        // The callback captures the state; dropping it breaks the cycle.
        if let Some(callback) = self.callback.take() {
            callback.borrow_mut().take();
        }
    }
}

impl ParticleBackground {
    fn inert() -> Self {
        Self {
            window: None,
            state: None,
            callback: None,
            observer: None,
            listeners: Vec::new(),
        }
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run a particle field on the canvas with id `canvas_id`.
///
/// `config_json` is a JSON [`FieldConfig`]; omitted keys keep their
/// defaults. A missing canvas yields an inactive handle rather than an error.
#[wasm_bindgen]
pub fn attach_particle_background(canvas_id: &str, config_json: Option<String>) -> Result<ParticleBackground, JsValue> {
    init_logging();
    let config = match config_json {
        Some(json) => FieldConfig::from_json(&json).map_err(js_error)?,
        None => FieldConfig::default(),
    };
    attach(canvas_id, config)
}

fn attach(canvas_id: &str, config: FieldConfig) -> Result<ParticleBackground, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let Some(canvas) = document
        .get_element_by_id(canvas_id)
        .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
    else {
        log::warn!("no canvas #{}; particle background disabled", canvas_id);
        return Ok(ParticleBackground::inert());
    };

    let parent = canvas.parent_element();
    let surface = CanvasSurface::new(canvas)?;
    let field = ParticleField::new(Some(surface), config, viewport_size(&window));

    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let state = Rc::new(RefCell::new(Background {
        field,
        frame_loop: AnimationLoop::new(RafHost {
            window: window.clone(),
            callback: callback.clone(),
        }),
    }));

    {
        let state = state.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_time: f64| {
            if let Ok(mut bg) = state.try_borrow_mut() {
                let bg = &mut *bg;
                bg.frame_loop.tick(&mut bg.field);
            }
        }) as Box<dyn FnMut(f64)>));
    }

    let mut listeners = Vec::new();
    {
        let state = state.clone();
        let win = window.clone();
        listeners.push(Listener::new(&window, "resize", move |_| {
            let (w, h) = viewport_size(&win);
            if let Ok(mut bg) = state.try_borrow_mut() {
                bg.field.resize(w, h);
            }
        })?);
    }
    {
        let state = state.clone();
        listeners.push(Listener::new(&window, "mousemove", move |e| {
            let Some(e) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            if let Ok(mut bg) = state.try_borrow_mut() {
                bg.field
                    .set_pointer(Vec2::new(e.client_x() as f32, e.client_y() as f32));
            }
        })?);
    }

    let observer = match parent {
        Some(parent) => {
            let state = state.clone();
            let observer = Observer::new(0.0, move |entry| {
                if let Ok(mut bg) = state.try_borrow_mut() {
                    let bg = &mut *bg;
                    bg.frame_loop.set_visible(entry.is_intersecting(), &mut bg.field);
                }
            })?;
            observer.observe(&parent);
            Some(observer)
        }
        None => None,
    };

    {
        let mut bg = state.borrow_mut();
        let bg = &mut *bg;
        bg.frame_loop.start(&mut bg.field);
        log::info!("particle background running on #{}", canvas_id);
    }

    Ok(ParticleBackground {
        window: Some(window),
        state: Some(state),
        callback: Some(callback),
        observer,
        listeners,
    })
}

// ============================================================================
// Showcase page
// ============================================================================

struct Showcase {
    _background: ParticleBackground,
    _listeners: Vec<Listener>,
    _observers: Vec<Observer>,
}

thread_local! {
    static SHOWCASE: RefCell<Option<Showcase>> = const { RefCell::new(None) };
}

/// Page entry point: particle background, navigation, reveal animations,
/// parallax, statistic counters, the video cards and the teaser playlist.
///
/// Calling it again tears the previous wiring down first.
#[wasm_bindgen]
pub fn start_showcase(config_json: Option<String>) -> Result<(), JsValue> {
    init_logging();
    let config = match config_json {
        Some(json) => ShowcaseConfig::from_json(&json).map_err(js_error)?,
        None => ShowcaseConfig::default(),
    };

    SHOWCASE.with(|s| s.borrow_mut().take());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let background = attach(PARTICLE_CANVAS_ID, config.particles)?;

    let mut listeners = Vec::new();
    let mut observers = Vec::new();

    observers.push(wire_reveal(&window, &document)?);
    observers.push(wire_counters(&window, &document)?);
    listeners.extend(wire_parallax(&window, &document)?);
    listeners.extend(wire_video_hover(&document)?);
    listeners.extend(wire_teaser(&window, &document, config.teaser)?);
    listeners.extend(wire_play_buttons(&document)?);
    observers.push(wire_lazy_videos(&document)?);
    observers.push(wire_carousel_autoplay(&document)?);
    listeners.extend(wire_navigation(&document)?);
    listeners.extend(wire_hero(&document)?);

    log::info!(
        "showcase wired: {} listeners, {} observers",
        listeners.len(),
        observers.len()
    );

    SHOWCASE.with(|s| {
        *s.borrow_mut() = Some(Showcase {
            _background: background,
            _listeners: listeners,
            _observers: observers,
        })
    });
    Ok(())
}

fn wire_reveal(window: &Window, document: &Document) -> Result<Observer, JsValue> {
    let win = window.clone();
    let observer = Observer::new(0.15, move |entry| {
        if !entry.is_intersecting() {
            return;
        }
        let target = entry.target();
        let delay = reveal_delay(target.get_attribute("data-delay").as_deref());
        let reveal = Closure::once_into_js(move || {
            let _ = target.class_list().add_1("animated");
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(reveal.unchecked_ref(), delay as i32);
    })?;
    for el in select_all(document, ".animate-on-scroll, .animate-stagger")? {
        observer.observe(&el);
    }
    Ok(observer)
}

fn wire_counters(window: &Window, document: &Document) -> Result<Observer, JsValue> {
    let started: Rc<RefCell<Vec<Element>>> = Rc::new(RefCell::new(Vec::new()));
    let win = window.clone();
    let observer = Observer::new(0.5, move |entry| {
        let target = entry.target();
        if !entry.is_intersecting() || started.borrow().contains(&target) {
            return;
        }
        let counter = CounterAnimation::new(
            CounterAnimation::parse_target(target.get_attribute("data-target").as_deref()),
            now(&win),
        );
        started.borrow_mut().push(target.clone());
        schedule_counter(win.clone(), target, counter);
    })?;
    for el in select_all(document, ".stat-number")? {
        observer.observe(&el);
    }
    Ok(observer)
}

fn schedule_counter(window: Window, element: Element, counter: CounterAnimation) {
    let win = window.clone();
    let frame = Closure::once_into_js(move |time: f64| {
        element.set_text_content(Some(&counter.value_at(time).to_string()));
        if !counter.is_finished(time) {
            schedule_counter(win, element, counter);
        }
    });
    let _ = window.request_animation_frame(frame.unchecked_ref());
}

struct ParallaxSection {
    section: Element,
    layer: ParallaxLayer,
    background: HtmlElement,
}

fn wire_parallax(window: &Window, document: &Document) -> Result<Option<Listener>, JsValue> {
    let mut sections = Vec::new();
    for section in select_all(document, ".parallax-section")? {
        let layer = ParallaxLayer::from_attr(section.get_attribute("data-parallax-speed").as_deref());
        if let Some(background) = section
            .query_selector(".parallax-bg")?
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            sections.push(ParallaxSection {
                section,
                layer,
                background,
            });
        }
    }
    if sections.is_empty() {
        return Ok(None);
    }

    let sections = Rc::new(sections);
    let ticking = Rc::new(Cell::new(false));
    let win = window.clone();
    let listener = Listener::new(window, "scroll", move |_| {
        if ticking.replace(true) {
            return;
        }
        let (win2, sections, ticking) = (win.clone(), sections.clone(), ticking.clone());
        let update = Closure::once_into_js(move || {
            update_parallax(&win2, &sections);
            ticking.set(false);
        });
        if win.request_animation_frame(update.unchecked_ref()).is_err() {
            ticking.set(false);
        }
    })?;
    Ok(Some(listener))
}

fn update_parallax(window: &Window, sections: &[ParallaxSection]) {
    let scroll_y = window.scroll_y().unwrap_or(0.0) as f32;
    let viewport_height = viewport_size(window).1 as f32;
    for s in sections {
        let rect = s.section.get_bounding_client_rect();
        if let Some(offset) = s
            .layer
            .offset(scroll_y, rect.top() as f32, rect.bottom() as f32, viewport_height)
        {
            let _ = s
                .background
                .style()
                .set_property("transform", &format!("translateY({}px)", offset));
        }
    }
}

fn wire_video_hover(document: &Document) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();
    for card in select_all(document, ".video-card-enhanced")? {
        let Some(video) = media_in(&card) else {
            continue;
        };
        let hovered = video.clone();
        listeners.push(Listener::new(&card, "mouseenter", move |_| {
            hovered.set_playback_rate(HOVER_PLAYBACK_RATE);
        })?);
        listeners.push(Listener::new(&card, "mouseleave", move |_| {
            video.set_playback_rate(NORMAL_PLAYBACK_RATE);
        })?);
    }
    Ok(listeners)
}

/// DOM side of the teaser: the video element, its caption and dots.
#[derive(Clone)]
struct TeaserView {
    document: Document,
    video: HtmlMediaElement,
}

impl TeaserView {
    fn show(&self, index: usize, item: &MediaItem) {
        self.video.set_src(&item.source);
        self.play();
        if let Some(title) = self.document.get_element_by_id("teaser-video-title") {
            title.set_text_content(Some(&item.title));
        }
        if let Ok(dots) = select_all(&self.document, ".teaser-dot") {
            for (i, dot) in dots.iter().enumerate() {
                let _ = dot.class_list().toggle_with_force("active", i == index);
            }
        }
    }

    fn play(&self) {
        // Autoplay may be refused until the user interacts; nothing to do then.
        let _ = self.video.play();
    }

    /// Keyboard navigation only applies while focus is on the teaser.
    fn has_focus(&self) -> bool {
        let Some(active) = self.document.active_element() else {
            return false;
        };
        matches!(active.closest(".teaser-video-wrapper"), Ok(Some(_)))
            || active.class_list().contains("teaser-dot")
            || active.class_list().contains("teaser-nav")
    }
}

fn wire_teaser(window: &Window, document: &Document, items: Vec<MediaItem>) -> Result<Vec<Listener>, JsValue> {
    let Some(video) = document
        .get_element_by_id("teaser")
        .and_then(|e| e.dyn_into::<HtmlMediaElement>().ok())
    else {
        return Ok(Vec::new());
    };
    if items.is_empty() {
        log::debug!("teaser element present but playlist is empty");
        return Ok(Vec::new());
    }

    let playlist = Rc::new(RefCell::new(TeaserPlaylist::new(items)));
    let view = TeaserView {
        document: document.clone(),
        video: video.clone(),
    };

    // Shared by every control: apply a navigation and show the result.
    let navigate = {
        let (playlist, view, win) = (playlist.clone(), view.clone(), window.clone());
        Rc::new(move |nav: Navigation| {
            let mut playlist = playlist.borrow_mut();
            if let Some(item) = playlist.navigate(nav, now(&win)).cloned() {
                view.show(playlist.index(), &item);
            }
        })
    };

    let mut listeners = Vec::new();
    {
        let (playlist, view, win) = (playlist.clone(), view.clone(), window.clone());
        listeners.push(Listener::new(&video, "ended", move |_| {
            let mut playlist = playlist.borrow_mut();
            match playlist.on_ended(now(&win)) {
                PlaybackAction::Advance(index) => {
                    if let Some(item) = playlist.current().cloned() {
                        view.show(index, &item);
                    }
                }
                PlaybackAction::Replay => view.play(),
            }
        })?);
    }

    for (selector, nav) in [(".teaser-nav-prev", Navigation::Previous), (".teaser-nav-next", Navigation::Next)] {
        if let Some(button) = document.query_selector(selector)? {
            let navigate = navigate.clone();
            listeners.push(Listener::new(&button, "click", move |_| navigate(nav))?);
        }
    }

    for (index, dot) in select_all(document, ".teaser-dot")?.into_iter().enumerate() {
        let navigate = navigate.clone();
        listeners.push(Listener::new(&dot, "click", move |_| navigate(Navigation::Jump(index)))?);
    }

    {
        let navigate = navigate.clone();
        listeners.push(Listener::new(document, "keydown", move |e| {
            let Some(e) = e.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if !view.has_focus() {
                return;
            }
            match KeyCode::from_dom_key(&e.key()) {
                KeyCode::Left => navigate(Navigation::Previous),
                KeyCode::Right => navigate(Navigation::Next),
                _ => {}
            }
        })?);
    }

    Ok(listeners)
}

fn wire_play_buttons(document: &Document) -> Result<Vec<Listener>, JsValue> {
    let mut containers = Vec::new();
    if let Some(teaser) = document.query_selector(".teaser-video-wrapper")? {
        containers.push(teaser);
    }
    containers.extend(select_all(document, CAROUSEL_ITEMS)?);

    let mut listeners = Vec::new();
    for container in containers {
        listeners.extend(wire_play_button(document, &container)?);
    }
    Ok(listeners)
}

/// DOM side of a [`PlayButton`].
#[derive(Clone)]
struct PlayButtonView {
    button: Element,
    play_icon: Option<HtmlElement>,
    pause_icon: Option<HtmlElement>,
}

impl PlayButtonView {
    fn render(&self, state: PlayButton) {
        let _ = self.button.class_list().toggle_with_force("paused", state.is_paused());
        let (play, pause) = state.icon_display();
        if let Some(icon) = &self.play_icon {
            let _ = icon.style().set_property("display", play);
        }
        if let Some(icon) = &self.pause_icon {
            let _ = icon.style().set_property("display", pause);
        }
    }
}

fn wire_play_button(document: &Document, container: &Element) -> Result<Vec<Listener>, JsValue> {
    let (Some(video), Some(button)) = (media_in(container), container.query_selector(".custom-play-button")?) else {
        return Ok(Vec::new());
    };
    let icon = |selector: &str| -> Result<Option<HtmlElement>, JsValue> {
        Ok(button.query_selector(selector)?.and_then(|e| e.dyn_into::<HtmlElement>().ok()))
    };
    let view = PlayButtonView {
        play_icon: icon(".play-icon")?,
        pause_icon: icon(".pause-icon")?,
        button: button.clone(),
    };
    let state = Rc::new(Cell::new(PlayButton::new(video.paused())));
    view.render(state.get());

    let mut listeners = Vec::new();
    {
        let (state, view, video) = (state.clone(), view.clone(), video.clone());
        listeners.push(Listener::new(&button, "click", move |e| {
            e.stop_propagation();
            let mut face = state.get();
            match face.click(video.paused()) {
                VideoCommand::Play => {
                    let _ = video.play();
                }
                VideoCommand::Pause => {
                    let _ = video.pause();
                }
            }
            state.set(face);
            view.render(face);
        })?);
    }
    for kind in ["play", "pause"] {
        let (state, view, media) = (state.clone(), view.clone(), video.clone());
        listeners.push(Listener::new(&video, kind, move |_| {
            let mut face = state.get();
            face.sync(media.paused());
            state.set(face);
            view.render(face);
        })?);
    }
    for kind in ["click", "touchend"] {
        let (doc, media) = (document.clone(), video.clone());
        listeners.push(Listener::new(&video, kind, move |e| {
            e.stop_propagation();
            e.prevent_default();
            toggle_fullscreen(&doc, &media);
        })?);
    }
    {
        let doc = document.clone();
        listeners.push(Listener::new(document, "fullscreenchange", move |_| {
            if doc.fullscreen_element().is_none() {
                let _ = video.remove_attribute("controls");
            }
        })?);
    }
    Ok(listeners)
}

fn toggle_fullscreen(document: &Document, video: &HtmlMediaElement) {
    match FullscreenToggle::for_state(document.fullscreen_element().is_some()) {
        FullscreenToggle::Exit => document.exit_fullscreen(),
        FullscreenToggle::Enter => {
            let _ = video.set_attribute("controls", "controls");
            let _ = video.play();
            if let Err(e) = video.request_fullscreen() {
                log::debug!("fullscreen refused: {:?}", e);
            }
        }
    }
}

fn wire_lazy_videos(document: &Document) -> Result<Observer, JsValue> {
    let observer = Observer::with_root_margin(LAZY_LOAD_MARGIN, |entry, observer| {
        let item = entry.target();
        let Some(video) = media_in(&item) else {
            return;
        };
        let source = video.query_selector("source[data-src]").ok().flatten();
        let deferred = source.as_ref().and_then(|s| s.get_attribute("data-src"));
        match LazyLoad::on_intersection(entry.is_intersecting(), deferred.as_deref()) {
            LazyLoad::Wait => {}
            LazyLoad::Load(src) => {
                if let Some(source) = source {
                    let _ = source.set_attribute("src", &src);
                    let _ = source.remove_attribute("data-src");
                    video.load();
                    log::debug!("loading deferred video {}", src);
                }
                observer.unobserve(&item);
            }
            LazyLoad::Done => observer.unobserve(&item),
        }
    })?;
    for item in select_all(document, CAROUSEL_ITEMS)? {
        observer.observe(&item);
    }
    Ok(observer)
}

fn wire_carousel_autoplay(document: &Document) -> Result<Observer, JsValue> {
    let observer = Observer::new(CAROUSEL_PLAY_THRESHOLD, |entry| {
        let Some(video) = media_in(&entry.target()) else {
            return;
        };
        let ratio = if entry.is_intersecting() { entry.intersection_ratio() } else { 0.0 };
        match VideoCommand::for_visibility(ratio) {
            // Refused autoplay leaves the video paused.
            VideoCommand::Play => {
                let _ = video.play();
            }
            VideoCommand::Pause => {
                let _ = video.pause();
            }
        }
    })?;
    for item in select_all(document, CAROUSEL_ITEMS)? {
        observer.observe(&item);
    }
    Ok(observer)
}

/// Navbar burger and in-page anchor links.
fn wire_navigation(document: &Document) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();
    for burger in select_all(document, ".navbar-burger")? {
        let (doc, toggled) = (document.clone(), burger.clone());
        listeners.push(Listener::new(&burger, "click", move |_| {
            let _ = toggled.class_list().toggle("is-active");
            if let Ok(Some(menu)) = doc.query_selector(".navbar-menu") {
                let _ = menu.class_list().toggle("is-active");
            }
        })?);
    }
    for anchor in select_all(document, "a[href^=\"#\"]")? {
        let (doc, link) = (document.clone(), anchor.clone());
        listeners.push(Listener::new(&anchor, "click", move |e| {
            e.prevent_default();
            let href = link.get_attribute("href").unwrap_or_default();
            if let Some(target) = anchor_target(&href).and_then(|id| doc.get_element_by_id(id)) {
                scroll_smoothly_to(&target);
            }
        })?);
    }
    Ok(listeners)
}

/// Hero video fallback and the scroll indicator below it.
fn wire_hero(document: &Document) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();
    if let Some(video) = document
        .query_selector(".hero-video-background")?
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    {
        let hidden = video.clone();
        listeners.push(Listener::new(&video, "error", move |_| {
            log::warn!("hero video failed to load; hiding it");
            let _ = hidden.style().set_property("display", "none");
        })?);
    }

    let Some(indicator) = document.get_element_by_id("scroll-indicator") else {
        return Ok(listeners);
    };
    let next = document
        .get_element_by_id("hero-section")
        .and_then(|hero| hero.next_element_sibling());
    {
        let next = next.clone();
        listeners.push(Listener::new(&indicator, "click", move |_| {
            if let Some(section) = &next {
                scroll_smoothly_to(section);
            }
        })?);
    }
    listeners.push(Listener::new(&indicator, "keydown", move |e| {
        let Some(key) = e.dyn_ref::<KeyboardEvent>().map(|k| KeyCode::from_dom_key(&k.key())) else {
            return;
        };
        if key.is_activation() {
            e.prevent_default();
            if let Some(section) = &next {
                scroll_smoothly_to(section);
            }
        }
    })?);
    Ok(listeners)
}
