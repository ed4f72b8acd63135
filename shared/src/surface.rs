use serde::{Deserialize, Serialize};

/// Position of a region element in document order within the live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    pub key: RegionKey,
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Enter,
    Leave,
    Move,
}

impl PointerKind {
    pub const ALL: [PointerKind; 3] = [PointerKind::Enter, PointerKind::Leave, PointerKind::Move];

    pub fn event_name(self) -> &'static str {
        match self {
            PointerKind::Enter => "mouseenter",
            PointerKind::Leave => "mouseleave",
            PointerKind::Move => "mousemove",
        }
    }
}

/// Pointer position relative to the container, plus the container's size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Emphasis {
    #[default]
    Neutral,
    Emphasized,
    Muted,
}

/// The live document a bind cycle styles and listens on.
///
/// The browser implementation wraps the container element; tests use an
/// in-memory recorder. Listener handles are opaque to the engine and only come
/// back through [`RegionSurface::unlisten`].
pub trait RegionSurface {
    type Listener;

    /// Replace whatever is mounted with `markup`.
    fn inject(&mut self, markup: &str);

    fn clear(&mut self);

    /// Region elements of the mounted document, in document order.
    fn regions(&self) -> Vec<RegionInfo>;

    /// Apply fill, accessible label and the interactive role.
    fn paint(&mut self, region: RegionKey, fill: &str, label: &str);

    fn set_emphasis(&mut self, region: RegionKey, emphasis: Emphasis);

    fn listen(&mut self, region: RegionKey, kind: PointerKind) -> Self::Listener;

    fn unlisten(&mut self, region: RegionKey, kind: PointerKind, listener: Self::Listener);
}
