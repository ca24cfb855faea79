//! Handle → screen map for programs that drive several native windows.

use std::collections::BTreeMap;

use crate::backend::{Backend, WindowHandle};
use crate::canvas::Canvas;
use crate::event::RawEvent;
use crate::screen::Screen;

#[derive(Debug)]
pub struct ScreenRegistry<B: Backend> {
    screens: BTreeMap<WindowHandle, Screen<B>>,
}

impl<B: Backend> Default for ScreenRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> ScreenRegistry<B> {
    pub fn new() -> Self {
        Self {
            screens: BTreeMap::new(),
        }
    }

    /// Register `screen` under its backend handle. A screen already registered
    /// under the same handle is replaced.
    pub fn insert(&mut self, screen: Screen<B>) -> WindowHandle {
        let handle = screen.handle();
        if self.screens.insert(handle, screen).is_some() {
            tracing::warn!(?handle, "replaced screen registered under the same handle");
        }
        handle
    }

    pub fn get(&self, handle: WindowHandle) -> Option<&Screen<B>> {
        self.screens.get(&handle)
    }

    pub fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut Screen<B>> {
        self.screens.get_mut(&handle)
    }

    pub fn remove(&mut self, handle: WindowHandle) -> Option<Screen<B>> {
        self.screens.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = WindowHandle> + '_ {
        self.screens.keys().copied()
    }

    /// Route `event` to the screen owning `handle`.
    pub fn dispatch(&mut self, handle: WindowHandle, event: RawEvent) -> bool {
        match self.screens.get_mut(&handle) {
            Some(screen) => screen.process_event(event),
            None => {
                tracing::debug!(?handle, "dropping event for unknown window");
                false
            }
        }
    }

    /// Render every visible screen, in handle order, into `canvas`.
    pub fn render_all(&mut self, canvas: &mut dyn Canvas) {
        for screen in self.screens.values_mut() {
            screen.render_frame(canvas);
        }
    }
}
