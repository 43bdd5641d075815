use std::time::{Duration, Instant};

use crate::config::ConfigFlags;
use crate::context::{ContextOptions, Notifier};
use crate::error::CaptureError;
use crate::selection::Selection;
use crate::ui::anchor::{AnchorPoint, PanelSize};

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// A span the user has turned into a flashcard.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub selection: Selection,
    pub text: String,
    pub context: Option<String>,
}

/// A normalized selection waiting for the user to confirm it in the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCapture {
    pub selection: Selection,
    pub text: String,
    pub context: Option<String>,
    /// Where the floating panel is drawn
    pub anchor: AnchorPoint,
}

/// The complete capture session state.
///
/// The engine functions stay stateless; everything that outlives a single
/// pointer event lives here.
#[derive(Debug, Clone)]
pub struct Model {
    /// Context extraction tunables
    pub context_options: ContextOptions,
    /// Floating panel size
    pub panel: PanelSize,
    /// Gap kept around the panel
    pub margin: f64,
    pub(super) pending: Option<PendingCapture>,
    pub(super) captures: Vec<Capture>,
    toast: Option<Toast>,
}

impl Model {
    pub fn new(config: &ConfigFlags) -> Self {
        Self {
            context_options: config.context_options(),
            panel: config.panel_size(),
            margin: config.anchor_margin(),
            pending: None,
            captures: Vec::new(),
            toast: None,
        }
    }

    pub const fn pending(&self) -> Option<&PendingCapture> {
        self.pending.as_ref()
    }

    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(&ConfigFlags::default())
    }
}

impl Notifier for Model {
    fn notify(&mut self, problem: &CaptureError) {
        self.show_toast(ToastLevel::Warning, problem.to_string());
    }
}
