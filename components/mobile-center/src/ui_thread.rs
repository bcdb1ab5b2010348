/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Posting work to the app's UI thread.
//!
//! App callbacks (for example push notifications received in the foreground)
//! must run on a single thread the app controls, not on whatever thread the
//! event arrived on. [`LooperThread`] provides such a thread when the host does
//! not have its own; [`ImmediateUiThread`] runs tasks inline for hosts that
//! already call us on their main thread.

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::mpsc::{channel, Sender},
    thread::{self, JoinHandle},
};

use parking_lot::Mutex;

use crate::{logging::LOG_TAG, Result};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait UiThread: Send + Sync {
    fn run_on_ui_thread(&self, task: Task);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateUiThread;

impl UiThread for ImmediateUiThread {
    fn run_on_ui_thread(&self, task: Task) {
        task()
    }
}

/// A dedicated thread running posted tasks one at a time, in posting order.
///
/// Dropping the looper lets the thread drain what was already posted and
/// then waits for it to exit.
pub struct LooperThread {
    sender: Mutex<Option<Sender<Task>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl LooperThread {
    pub fn spawn(name: &str) -> Result<Self> {
        let (sender, receiver) = channel::<Task>();
        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                for task in receiver {
                    // A panicking app callback must not take the looper down with it.
                    if catch_unwind(AssertUnwindSafe(task)).is_err() {
                        log::error!(target: LOG_TAG, "A task posted to the UI thread panicked");
                    }
                }
            })?;
        Ok(Self {
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        })
    }
}

impl UiThread for LooperThread {
    fn run_on_ui_thread(&self, task: Task) {
        match self.sender.lock().as_ref() {
            Some(sender) => {
                if sender.send(task).is_err() {
                    log::warn!(target: LOG_TAG, "UI thread has exited, dropping task");
                }
            }
            None => log::warn!(target: LOG_TAG, "UI thread is shutting down, dropping task"),
        }
    }
}

impl Drop for LooperThread {
    fn drop(&mut self) {
        // Closing the channel ends the thread's loop.
        self.sender.lock().take();
        if let Some(handle) = self.handle.lock().take() {
            // The last reference can be dropped by a task running on the looper itself.
            if handle.thread().id() != thread::current().id() && handle.join().is_err() {
                log::error!(target: LOG_TAG, "UI thread exited abnormally");
            }
        }
    }
}
