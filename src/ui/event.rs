use crate::view::{ElementId, Viewport};
use smol_str::SmolStr;
use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        alt: false,
        ctrl: false,
        shift: false,
        meta: false,
    };
    pub const SHIFT: KeyModifiers = KeyModifiers {
        shift: true,
        ..KeyModifiers::NONE
    };
    pub const CTRL: KeyModifiers = KeyModifiers {
        ctrl: true,
        ..KeyModifiers::NONE
    };

    /// Word motion and clipboard shortcuts: ctrl, or cmd on macOS hosts.
    pub fn shortcut(self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Character(char),
    Other,
}

/// One discrete event delivered by the host's window layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Quit,
    PointerMoved { x: i32, y: i32 },
    PointerDown { button: MouseButton },
    PointerUp { button: MouseButton },
    Wheel { delta_y: f32 },
    KeyDown { key: Key, modifiers: KeyModifiers },
    TextInput(String),
    FileDropped(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Click,
    HoverEnter,
    HoverLeave,
    FocusChanged,
    TextChanged,
    Submit,
    ValueChanged,
    DropdownChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownChange {
    pub index: usize,
    pub value: SmolStr,
}

/// Disconnect token returned by every subscription. A token for an element that cannot
/// emit the requested event is empty and disconnecting it does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    id: u64,
    source: Option<(ElementId, SignalKind)>,
}

impl Connection {
    pub(crate) fn new(id: u64, element: ElementId, kind: SignalKind) -> Self {
        Self {
            id,
            source: Some((element, kind)),
        }
    }

    pub fn empty() -> Self {
        Self { id: 0, source: None }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    pub fn element(&self) -> Option<ElementId> {
        self.source.map(|(element, _)| element)
    }

    pub fn kind(&self) -> Option<SignalKind> {
        self.source.map(|(_, kind)| kind)
    }
}

pub(crate) fn next_handler_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

type HandlerFn<T> = dyn FnMut(&mut Viewport, ElementId, &T);

pub struct SignalHandler<T: ?Sized> {
    id: u64,
    handler: Rc<RefCell<HandlerFn<T>>>,
}

impl<T: ?Sized> SignalHandler<T> {
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&mut Viewport, ElementId, &T) + 'static,
    {
        Self {
            id: next_handler_id(),
            handler: Rc::new(RefCell::new(handler)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns false when the handler is already running further up the stack.
    pub fn call(&self, viewport: &mut Viewport, element: ElementId, payload: &T) -> bool {
        let Ok(mut handler) = self.handler.try_borrow_mut() else {
            log::warn!("skipping re-entrant handler {} on {:?}", self.id, element);
            return false;
        };
        (&mut *handler)(viewport, element, payload);
        true
    }
}

impl<T: ?Sized> Clone for SignalHandler<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Rc::clone(&self.handler),
        }
    }
}

impl<T: ?Sized> PartialEq for SignalHandler<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: ?Sized> fmt::Debug for SignalHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHandler")
            .field("id", &self.id)
            .finish()
    }
}

/// Ordered subscriber list for one event kind on one element.
pub struct Signal<T: ?Sized> {
    handlers: Vec<SignalHandler<T>>,
}

impl<T: ?Sized> Signal<T> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn connect<F>(&mut self, handler: F) -> u64
    where
        F: FnMut(&mut Viewport, ElementId, &T) + 'static,
    {
        let handler = SignalHandler::new(handler);
        let id = handler.id();
        self.handlers.push(handler);
        id
    }

    pub fn disconnect(&mut self, id: u64) -> bool {
        let Some(index) = self.handlers.iter().position(|h| h.id() == id) else {
            return false;
        };
        self.handlers.remove(index);
        true
    }

    /// Handlers in registration order, detached from the element so they can mutate it.
    pub fn snapshot(&self) -> Vec<SignalHandler<T>> {
        self.handlers.clone()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.handlers.iter()).finish()
    }
}
