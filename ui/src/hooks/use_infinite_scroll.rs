use std::cell::RefCell;
use std::rc::{Rc, Weak};

use feed::{Observation, ScrollTrigger, TriggerConfig};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};
use yew::prelude::*;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;
type SharedTrigger = Rc<RefCell<ScrollTrigger<SentinelObserver>>>;

/// An `IntersectionObserver` watching one sentinel element.
pub struct SentinelObserver {
    observer: IntersectionObserver,
    // Rust owns the closure, JS only holds a pointer to it
    _callback: ObserverCallback,
}

impl SentinelObserver {
    fn observe(
        sentinel: &Element,
        config: &TriggerConfig,
        on_visibility: impl FnMut(bool) + 'static,
    ) -> Result<Self, JsValue> {
        let mut on_visibility = on_visibility;
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let visible = entries.iter().any(|entry| {
                    entry
                        .dyn_into::<IntersectionObserverEntry>()
                        .map(|entry| entry.is_intersecting())
                        .unwrap_or(false)
                });
                on_visibility(visible);
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.threshold));
        options.set_root_margin(&config.root_margin);

        let observer = IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        observer.observe(sentinel);

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Observation for SentinelObserver {
    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

#[derive(Default)]
struct Timers {
    debounce: Option<Timeout>,
    cooldown: Option<Timeout>,
}

/// Call `on_trigger` when the returned sentinel scrolls into view.
///
/// Visibility bursts within `config.debounce` collapse into one call, and
/// no further calls happen until `config.cooldown` has passed. Changing
/// `config` (typically `enabled`) reattaches the observer.
#[hook]
pub fn use_infinite_scroll(
    on_trigger: Callback<()>,
    config: TriggerConfig,
) -> NodeRef {
    let sentinel = use_node_ref();
    let trigger = use_mut_ref(|| ScrollTrigger::new(config.clone()));
    let timers = use_mut_ref(Timers::default);

    // Always call the latest callback without reattaching.
    let latest = use_mut_ref(|| on_trigger.clone());
    *latest.borrow_mut() = on_trigger;

    use_effect_with((sentinel.clone(), config), {
        let trigger = trigger.clone();
        let timers = timers.clone();
        move |(sentinel, config)| {
            {
                let mut scroll = trigger.borrow_mut();
                scroll.set_config(config.clone());

                match sentinel.cast::<Element>() {
                    Some(element) if config.enabled => {
                        let on_visibility = visibility_handler(
                            Rc::downgrade(&trigger),
                            timers.clone(),
                            latest,
                        );
                        match SentinelObserver::observe(
                            &element,
                            config,
                            on_visibility,
                        ) {
                            Ok(observer) => {
                                scroll.attach(move || observer);
                            }
                            Err(e) => tracing::error!(
                                "Failed to observe sentinel: {e:?}"
                            ),
                        }
                    }
                    Some(_) => tracing::debug!("Infinite scroll disabled"),
                    None => tracing::warn!("Sentinel is not mounted"),
                }
            }

            // A running cooldown is left alone so the trigger can finish.
            move || {
                trigger.borrow_mut().detach();
                timers.borrow_mut().debounce = None;
            }
        }
    });

    sentinel
}

fn visibility_handler(
    trigger: Weak<RefCell<ScrollTrigger<SentinelObserver>>>,
    timers: Rc<RefCell<Timers>>,
    latest: Rc<RefCell<Callback<()>>>,
) -> impl FnMut(bool) + 'static {
    move |visible| {
        let Some(shared) = trigger.upgrade() else {
            return;
        };
        let ticket = shared.borrow_mut().on_visibility(visible);
        let Some(ticket) = ticket else {
            return;
        };

        let debounce = millis(shared.borrow().config().debounce);
        let cooldown = millis(shared.borrow().config().cooldown);
        let timers_for_fire = timers.clone();
        let latest = latest.clone();
        // Replacing the pending timeout cancels it.
        timers.borrow_mut().debounce = Some(Timeout::new(debounce, move || {
            let fired = shared.borrow_mut().fire(ticket);
            if !fired {
                return;
            }
            tracing::debug!("Sentinel visible, loading more");
            latest.borrow().emit(());
            timers_for_fire.borrow_mut().cooldown =
                Some(Timeout::new(cooldown, finish_later(&shared)));
        }));
    }
}

fn finish_later(trigger: &SharedTrigger) -> impl FnOnce() + 'static {
    let trigger = Rc::downgrade(trigger);
    move || {
        if let Some(trigger) = trigger.upgrade() {
            trigger.borrow_mut().finish();
        }
    }
}

fn millis(duration: std::time::Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
