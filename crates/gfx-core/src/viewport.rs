//! Viewport sync: keep a displayed surface sized to the host viewport.
//!
//! A `ViewportSync` owns a resize channel registration for as long as it is
//! attached. `attach` subscribes, `detach` unsubscribes, and dropping an
//! attached sync detaches it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Callback invoked with the new viewport size.
pub type ResizeHandler = Box<dyn FnMut(ViewportSize)>;

/// A surface whose displayed size can be set.
///
/// Implementors are shared handles: the resize handler keeps its own clone.
pub trait DisplaySurface: Clone + 'static {
    fn set_display_size(&self, size: ViewportSize);
}

/// Source of resize notifications.
pub trait ResizeChannel {
    type Registration;

    fn current_size(&self) -> ViewportSize;
    fn subscribe(&mut self, handler: ResizeHandler) -> Self::Registration;
    fn unsubscribe(&mut self, registration: Self::Registration);
}

pub struct ViewportSync<C: ResizeChannel, S: DisplaySurface> {
    channel: C,
    surface: S,
    registration: Option<C::Registration>,
}

impl<C: ResizeChannel, S: DisplaySurface> ViewportSync<C, S> {
    /// Create a detached sync.
    pub fn new(channel: C, surface: S) -> Self {
        Self {
            channel,
            surface,
            registration: None,
        }
    }

    /// Start resizing the surface on every viewport resize.
    ///
    /// Does not resize immediately; call `sync_now` for that.
    pub fn attach(&mut self) -> &mut Self {
        if self.registration.is_none() {
            let surface = self.surface.clone();
            let registration = self.channel.subscribe(Box::new(move |size| {
                log::trace!("viewport: resize to {}x{}", size.width, size.height);
                surface.set_display_size(size);
            }));
            self.registration = Some(registration);
            log::debug!("viewport: attached resize handler");
        }
        self
    }

    pub fn detach(&mut self) -> &mut Self {
        if let Some(registration) = self.registration.take() {
            self.channel.unsubscribe(registration);
            log::debug!("viewport: detached resize handler");
        }
        self
    }

    pub fn is_attached(&self) -> bool {
        self.registration.is_some()
    }

    /// Apply the channel's current size to the surface.
    pub fn sync_now(&mut self) -> &mut Self {
        self.surface.set_display_size(self.channel.current_size());
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }
}

impl<C: ResizeChannel, S: DisplaySurface> Drop for ViewportSync<C, S> {
    fn drop(&mut self) {
        self.detach();
    }
}

// ─── Host-driven channel ────────────────────────────────────────────────

/// Registration token handed out by `ResizeHub`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HubRegistration(u64);

/// Resize channel driven by the host: native event loops call `notify`.
///
/// Cloning yields another handle to the same hub.
#[derive(Clone, Default)]
pub struct ResizeHub {
    inner: Rc<RefCell<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    size: ViewportSize,
    next_id: u64,
    handlers: SmallVec<[(u64, ResizeHandler); 2]>,
    dispatching: bool,
    removed_during_dispatch: SmallVec<[u64; 2]>,
    /// Latest size passed to a `notify` made from inside a handler.
    pending: Option<ViewportSize>,
}

impl ResizeHub {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HubInner {
                size,
                ..HubInner::default()
            })),
        }
    }

    /// Record the new size and run every live handler with it.
    ///
    /// A `notify` from inside a handler does not nest: the running
    /// dispatch finishes, then runs another pass with the newest size.
    pub fn notify(&self, size: ViewportSize) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.size = size;
            if inner.dispatching {
                inner.pending = Some(size);
                return;
            }
            inner.dispatching = true;
        }

        let mut size = size;
        loop {
            let mut handlers = std::mem::take(&mut self.inner.borrow_mut().handlers);
            for (_, handler) in handlers.iter_mut() {
                handler(size);
            }

            let mut inner = self.inner.borrow_mut();
            // Handlers subscribed while dispatching run from the next pass.
            let added = std::mem::take(&mut inner.handlers);
            handlers.extend(added);
            let removed = std::mem::take(&mut inner.removed_during_dispatch);
            handlers.retain(|(id, _)| !removed.contains(id));
            inner.handlers = handlers;

            match inner.pending.take() {
                Some(next) => size = next,
                None => {
                    inner.dispatching = false;
                    return;
                }
            }
        }
    }

    pub fn handler_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }
}

impl ResizeChannel for ResizeHub {
    type Registration = HubRegistration;

    fn current_size(&self) -> ViewportSize {
        self.inner.borrow().size
    }

    fn subscribe(&mut self, handler: ResizeHandler) -> HubRegistration {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, handler));
        HubRegistration(id)
    }

    fn unsubscribe(&mut self, registration: HubRegistration) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.handlers.len();
        inner.handlers.retain(|(id, _)| *id != registration.0);
        if inner.handlers.len() == before && inner.dispatching {
            inner.removed_during_dispatch.push(registration.0);
        }
    }
}
