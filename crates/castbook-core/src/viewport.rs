//! Viewport classification from window width and user-agent signatures.
//!
//! A device signature in the user agent wins over width: an iPad held in
//! landscape at 1180px is still a tablet. Without a signature the width
//! bucket decides. Before the first measurement the classifier reports
//! [`Viewport::UNMEASURED`], a desktop snapshot with zero width.

use crate::timer::{Debouncer, RESIZE_DEBOUNCE};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

/// Width thresholds in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    /// Smallest tablet width; anything narrower is mobile
    pub tablet_min: u32,
    /// Smallest desktop width
    pub desktop_min: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet_min: 768,
            desktop_min: 1024,
        }
    }
}

impl Breakpoints {
    /// Width bucket for `width`.
    #[must_use]
    pub const fn bucket(&self, width: u32) -> DeviceClass {
        if width < self.tablet_min {
            DeviceClass::Mobile
        } else if width < self.desktop_min {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Screen size class. Exactly one applies at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Phone-sized
    Mobile,
    /// Tablet-sized
    Tablet,
    /// Everything else
    #[default]
    Desktop,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        };
        f.write_str(name)
    }
}

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)Mobile|Android|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
            .expect("mobile user-agent pattern is valid")
    })
}

fn tablet_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)iPad|Tablet").expect("tablet user-agent pattern is valid"))
}

fn android_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)Android").expect("android pattern is valid"))
}

fn is_tablet_agent(user_agent: &str) -> bool {
    if tablet_pattern().is_match(user_agent) {
        return true;
    }
    // Android without a later "Mobile" token is a tablet build.
    android_pattern().find_iter(user_agent).any(|m| {
        !user_agent[m.end()..]
            .to_ascii_lowercase()
            .contains("mobile")
    })
}

/// Device class claimed by a user-agent string, if any.
#[must_use]
pub fn device_signature(user_agent: &str) -> Option<DeviceClass> {
    if is_tablet_agent(user_agent) {
        Some(DeviceClass::Tablet)
    } else if mobile_pattern().is_match(user_agent) {
        Some(DeviceClass::Mobile)
    } else {
        None
    }
}

/// One classification snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Device class
    pub class: DeviceClass,
    /// Measured width in CSS pixels (0 before measurement)
    pub width: u32,
    /// Whether this snapshot came from a real measurement
    pub measured: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::UNMEASURED
    }
}

impl Viewport {
    /// Snapshot used before any measurement is possible.
    pub const UNMEASURED: Self = Self {
        class: DeviceClass::Desktop,
        width: 0,
        measured: false,
    };

    /// Whether this is a mobile snapshot.
    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        matches!(self.class, DeviceClass::Mobile)
    }

    /// Whether this is a tablet snapshot.
    #[must_use]
    pub const fn is_tablet(&self) -> bool {
        matches!(self.class, DeviceClass::Tablet)
    }

    /// Whether this is a desktop snapshot.
    #[must_use]
    pub const fn is_desktop(&self) -> bool {
        matches!(self.class, DeviceClass::Desktop)
    }
}

/// Classifies widths for a fixed user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportClassifier {
    breakpoints: Breakpoints,
    signature: Option<DeviceClass>,
}

impl ViewportClassifier {
    /// Create a classifier; the user agent is matched once, up front.
    #[must_use]
    pub fn new(breakpoints: Breakpoints, user_agent: &str) -> Self {
        Self {
            breakpoints,
            signature: device_signature(user_agent),
        }
    }

    /// Device class claimed by the user agent, if any.
    #[must_use]
    pub const fn signature(&self) -> Option<DeviceClass> {
        self.signature
    }

    /// Classify a measured width.
    #[must_use]
    pub fn classify(&self, width: u32) -> Viewport {
        let class = self
            .signature
            .unwrap_or_else(|| self.breakpoints.bucket(width));
        Viewport {
            class,
            width,
            measured: true,
        }
    }
}

/// Classify a width and user agent in one step.
#[must_use]
pub fn classify(width: u32, user_agent: &str, breakpoints: Breakpoints) -> Viewport {
    ViewportClassifier::new(breakpoints, user_agent).classify(width)
}

type Listener = Box<dyn Fn(&Viewport)>;

/// The single subscription point for viewport snapshots.
///
/// Resize events go through a trailing debounce; the caller schedules a
/// timer carrying the generation from [`ViewportMonitor::resized`] and
/// hands it back to [`ViewportMonitor::settle`] when it fires.
pub struct ViewportMonitor {
    classifier: ViewportClassifier,
    width: Debouncer<u32>,
    current: Viewport,
    listeners: Vec<Listener>,
}

impl fmt::Debug for ViewportMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportMonitor")
            .field("classifier", &self.classifier)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for ViewportMonitor {
    fn default() -> Self {
        Self::new(ViewportClassifier::default(), RESIZE_DEBOUNCE)
    }
}

impl ViewportMonitor {
    /// Create a monitor reporting [`Viewport::UNMEASURED`].
    #[must_use]
    pub fn new(classifier: ViewportClassifier, quiet: Duration) -> Self {
        Self {
            classifier,
            width: Debouncer::new(0, quiet),
            current: Viewport::UNMEASURED,
            listeners: Vec::new(),
        }
    }

    /// Latest snapshot.
    #[must_use]
    pub const fn current(&self) -> Viewport {
        self.current
    }

    /// Resize quiet interval.
    #[must_use]
    pub const fn quiet(&self) -> Duration {
        self.width.quiet()
    }

    /// Register a listener called with every new snapshot.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&Viewport) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Take an immediate measurement (used once at mount).
    pub fn measure(&mut self, width: u32) -> Viewport {
        self.width.reset(width);
        self.publish(self.classifier.classify(width))
    }

    /// Record a resize; returns the generation to settle later.
    pub fn resized(&mut self, width: u32) -> u64 {
        self.width.input(width)
    }

    /// Settle a resize. Stale generations are ignored.
    pub fn settle(&mut self, generation: u64) -> Option<Viewport> {
        if !self.width.settle(generation) {
            return None;
        }
        let width = *self.width.settled();
        Some(self.publish(self.classifier.classify(width)))
    }

    /// Cancel any pending resize and drop all listeners.
    pub fn teardown(&mut self) {
        self.width.cancel();
        self.listeners.clear();
    }

    fn publish(&mut self, snapshot: Viewport) -> Viewport {
        self.current = snapshot;
        for listener in &self.listeners {
            listener(&snapshot);
        }
        snapshot
    }
}

/// Layout decisions that depend on the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutHints {
    /// Show the portrait above the title (phones and tablets)
    pub show_header_portrait: bool,
    /// Show the side cameo (wide desktops only)
    pub show_cameo: bool,
}

impl LayoutHints {
    /// Derive layout hints for a snapshot.
    #[must_use]
    pub const fn for_viewport(viewport: &Viewport, cameo_min_width: u32) -> Self {
        Self {
            show_header_portrait: viewport.is_mobile() || viewport.is_tablet(),
            show_cameo: viewport.is_desktop() && viewport.width > cameo_min_width,
        }
    }
}
