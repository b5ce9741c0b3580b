//! Chat dock layout
//!
//! A user can keep up to four floating chat windows open. Newest docks sit at
//! the front (rightmost on screen); each full dock is shifted left by the width
//! of every expanded dock in front of it, and minimized docks stack as bubbles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_DOCKS: usize = 4;
pub const DEFAULT_DOCK_WIDTH: u32 = 420;
pub const DOCK_GAP: u32 = 20;
pub const DEFAULT_BOTTOM_OFFSET: u32 = 16;
pub const MAX_BOTTOM_OFFSET: u32 = 200;
pub const DEFAULT_DOCK_TITLE: &str = "Chat";

/// Paths where docks are not rendered
const HIDDEN_PREFIXES: &[&str] = &["/login", "/register", "/sell", "/profile/chats/"];

/// One open dock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dock {
    pub id: Uuid,
    pub title: String,
    pub minimized: bool,
}

/// Computed placement of a dock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockLayout {
    pub id: Uuid,
    pub title: String,
    pub index: usize,
    pub minimized: bool,
    pub shift_left: u32,
    pub bubble_index: usize,
    pub bottom_offset: u32,
}

/// Dock window state for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockManager {
    docks: Vec<Dock>,
    #[serde(default)]
    widths: HashMap<Uuid, u32>,
    #[serde(default = "default_bottom_offset")]
    bottom_offset: u32,
}

fn default_bottom_offset() -> u32 {
    DEFAULT_BOTTOM_OFFSET
}

impl Default for DockManager {
    fn default() -> Self {
        Self {
            docks: Vec::new(),
            widths: HashMap::new(),
            bottom_offset: DEFAULT_BOTTOM_OFFSET,
        }
    }
}

impl DockManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn docks(&self) -> &[Dock] {
        &self.docks
    }

    pub fn bottom_offset(&self) -> u32 {
        self.bottom_offset
    }

    /// Open a dock, or restore and raise it if already open
    pub fn open(&mut self, id: Uuid, title: Option<&str>) {
        if let Some(pos) = self.docks.iter().position(|d| d.id == id) {
            let mut existing = self.docks.remove(pos);
            existing.minimized = false;
            self.docks.insert(0, existing);
            return;
        }

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_DOCK_TITLE)
            .to_string();
        self.docks.insert(
            0,
            Dock {
                id,
                title,
                minimized: false,
            },
        );
        self.docks.truncate(MAX_DOCKS);
        self.prune_widths();
    }

    pub fn close(&mut self, id: Uuid) {
        self.docks.retain(|d| d.id != id);
        self.prune_widths();
    }

    pub fn set_minimized(&mut self, id: Uuid, minimized: bool) {
        if let Some(dock) = self.docks.iter_mut().find(|d| d.id == id) {
            dock.minimized = minimized;
        }
    }

    /// Record the rendered width of a dock
    pub fn report_width(&mut self, id: Uuid, width: u32) {
        if self.docks.iter().any(|d| d.id == id) {
            self.widths.insert(id, width);
        }
    }

    /// Navigation closes every dock
    pub fn close_all(&mut self) {
        self.docks.clear();
        self.widths.clear();
    }

    /// Set the distance from the bottom edge, rounded and clamped to 0..=200
    pub fn set_bottom_offset(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.bottom_offset = offset.round().clamp(0.0, f64::from(MAX_BOTTOM_OFFSET)) as u32;
    }

    fn width_of(&self, id: Uuid) -> u32 {
        self.widths
            .get(&id)
            .copied()
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_DOCK_WIDTH)
    }

    fn prune_widths(&mut self) {
        let docks = &self.docks;
        self.widths.retain(|id, _| docks.iter().any(|d| d.id == *id));
    }

    /// Placement of every open dock, front first
    pub fn layout(&self) -> Vec<DockLayout> {
        let mut shift_left = 0;
        let mut bubble_index = 0;
        let mut out = Vec::with_capacity(self.docks.len());

        for (index, dock) in self.docks.iter().enumerate() {
            out.push(DockLayout {
                id: dock.id,
                title: dock.title.clone(),
                index,
                minimized: dock.minimized,
                shift_left,
                bubble_index,
                bottom_offset: self.bottom_offset,
            });
            if dock.minimized {
                bubble_index += 1;
            } else {
                shift_left += self.width_of(dock.id) + DOCK_GAP;
            }
        }
        out
    }

    /// Docks are not shown on auth, sell, and full-page chat routes
    pub fn is_hidden_on(path: &str) -> bool {
        HIDDEN_PREFIXES.iter().any(|p| path.starts_with(p))
    }
}
