//! `setTimeout`-backed [`Scheduler`].

use castbook_core::{Message, Scheduler, TimerSlot, TimerToken};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Receives messages from fired timers.
pub type Sink = Rc<dyn Fn(Message)>;

struct Pending {
    handle: i32,
    // Kept alive until the slot is reused or cancelled.
    _callback: Closure<dyn FnMut()>,
}

/// Window timers, one per [`TimerSlot`].
pub struct WindowScheduler {
    window: Window,
    sink: Sink,
    sequence: u64,
    pending: HashMap<TimerSlot, Pending>,
}

impl WindowScheduler {
    /// Create a scheduler delivering fired messages to `sink`.
    pub fn new(window: Window, sink: Sink) -> Self {
        Self {
            window,
            sink,
            sequence: 0,
            pending: HashMap::new(),
        }
    }
}

impl Scheduler<Message> for WindowScheduler {
    fn schedule(&mut self, slot: TimerSlot, delay: Duration, message: Message) -> TimerToken {
        self.cancel(slot);
        self.sequence += 1;

        let sink = Rc::clone(&self.sink);
        let mut message = Some(message);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(message) = message.take() {
                sink(message);
            }
        });

        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay.as_millis().min(i32::MAX as u128) as i32,
        ) {
            Ok(handle) => {
                self.pending.insert(
                    slot,
                    Pending {
                        handle,
                        _callback: callback,
                    },
                );
            }
            Err(err) => {
                web_sys::console::warn_2(&JsValue::from_str("castbook: setTimeout failed"), &err);
            }
        }

        TimerToken {
            slot,
            sequence: self.sequence,
        }
    }

    fn cancel(&mut self, slot: TimerSlot) {
        if let Some(pending) = self.pending.remove(&slot) {
            self.window.clear_timeout_with_handle(pending.handle);
        }
    }

    fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            self.window.clear_timeout_with_handle(pending.handle);
        }
    }
}

impl Drop for WindowScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
