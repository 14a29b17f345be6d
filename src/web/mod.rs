//! Browser shell: wires a canvas, the page and the console into a [`Game`]
//! and keeps it running until [`shutdown`].
//!
//! The live game sits in a thread-local so event listeners, the ticker, the
//! frame loop and finished fetches all reach the same instance.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, Window, window};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{Game, GameBuilder};
use crate::geometry::{Point, distance_rule, squareness_score};
use crate::render::default_setup;

mod canvas;
mod host;
mod logger;

pub use canvas::CanvasSurface;
pub use host::BrowserHost;

type BrowserGame = Game<CanvasSurface, BrowserHost>;

thread_local! {
    static GAME: RefCell<Option<BrowserGame>> = const { RefCell::new(None) };
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// Runs `f` on the live game, if any. Returns `None` when no game is running
/// or the game is already borrowed further up the stack.
pub(crate) fn with_game<R>(f: impl FnOnce(&mut BrowserGame) -> R) -> Option<R> {
    GAME.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    })
}

pub fn launch(config: GameConfig) -> Result<(), GameError> {
    logger::init(config.log_level);
    shutdown();

    let win = window().ok_or_else(|| GameError::Init("no window".into()))?;
    let doc = win
        .document()
        .ok_or_else(|| GameError::Init("no document".into()))?;
    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(&config.canvas_id)
        .ok_or_else(|| GameError::Init(format!("no element #{}", config.canvas_id)))?
        .dyn_into()
        .map_err(|_| GameError::Init(format!("#{} is not a canvas", config.canvas_id)))?;

    let tick_ms = config.tick_ms;
    let game = GameBuilder::new(BrowserHost::new(win.clone(), &config))
        .config(config)
        .rule(distance_rule)
        .calc(squareness_score)
        .try_surface(CanvasSurface::acquire(&canvas))
        .setup(default_setup)
        .build()?;
    GAME.with(|cell| cell.replace(Some(game)));

    let runtime = Runtime::start(&win, &canvas, tick_ms).inspect_err(|_| {
        GAME.with(|cell| cell.borrow_mut().take());
    })?;
    RUNTIME.with(|cell| cell.replace(Some(runtime)));
    log::info!("game started");
    Ok(())
}

/// Detaches listeners, stops the ticker and the frame loop, and drops the
/// game. Late fetch completions find no game and are ignored.
pub fn shutdown() {
    let runtime = RUNTIME.with(|cell| cell.borrow_mut().take());
    let game = GAME.with(|cell| cell.borrow_mut().take());
    drop(runtime);
    if game.is_some() {
        log::info!("game stopped");
    }
}

/// Everything scheduled on the page for one game.
struct Runtime {
    window: Window,
    _listeners: Vec<Listener>,
    ticker: Ticker,
    frames: FrameLoop,
}

impl Runtime {
    fn start(win: &Window, canvas: &HtmlCanvasElement, tick_ms: u32) -> Result<Self, GameError> {
        let listeners = vec![
            Listener::attach(canvas, "mousedown", |game, at| game.pointer_down(at))?,
            Listener::attach(canvas, "mousemove", |game, at| game.pointer_move(at))?,
            Listener::attach(canvas, "mouseup", |game, at| game.pointer_up(at))?,
            Listener::attach(canvas, "mouseout", |game, _| game.pointer_out())?,
        ];
        let ticker = Ticker::start(win, tick_ms)?;
        let frames = FrameLoop::start(win);
        Ok(Self {
            window: win.clone(),
            _listeners: listeners,
            ticker,
            frames,
        })
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.ticker.handle);
        self.frames.cancel(&self.window);
    }
}

struct Listener {
    target: HtmlCanvasElement,
    event: &'static str,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

impl Listener {
    fn attach(
        canvas: &HtmlCanvasElement,
        event: &'static str,
        handler: fn(&mut BrowserGame, Point),
    ) -> Result<Self, GameError> {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            // offset coordinates are already canvas-local
            let at = Point::new(f64::from(evt.offset_x()), f64::from(evt.offset_y()));
            with_game(|game| handler(game, at));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: canvas.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
            .ok();
    }
}

/// Feeds elapsed wall-clock time into the game from a `setInterval`.
struct Ticker {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Ticker {
    fn start(win: &Window, tick_ms: u32) -> Result<Self, GameError> {
        let performance = win
            .performance()
            .ok_or_else(|| GameError::Init("no performance clock".into()))?;
        let mut last = performance.now();
        let closure = Closure::wrap(Box::new(move || {
            let now = performance.now();
            let elapsed = now - last;
            last = now;
            with_game(|game| game.advance(elapsed));
        }) as Box<dyn FnMut()>);
        let handle = win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            tick_ms as i32,
        )?;
        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop with a cancel handle.
struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(win: &Window) -> Self {
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();
        let pending = Rc::new(Cell::new(None));
        let next = pending.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
            with_game(|game| game.render_frame());
            if let Some(w) = window() {
                if let Some(cb) = f.borrow().as_ref() {
                    next.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
                }
            }
        }) as Box<dyn FnMut(f64)>));
        if let Some(cb) = g.borrow().as_ref() {
            pending.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }
        Self {
            callback: g,
            pending,
        }
    }

    fn cancel(&self, win: &Window) {
        if let Some(id) = self.pending.take() {
            win.cancel_animation_frame(id).ok();
        }
        // releases the closure, which holds the only other reference to the cell
        self.callback.borrow_mut().take();
    }
}
