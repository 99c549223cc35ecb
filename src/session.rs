//! The drawing state machine: tool and color selection, press/drag/release gestures, the text
//! prompt round trip and key commands.
//!
//! Everything here is toolkit-free. The host translates its own events into calls on
//! [`DrawingSession`] with positions already mapped into scene space.

use crate::canvas::PreviewSlot;
use crate::geometry::Point;
use crate::shape::{Color4, Shape, Tool};
use crate::store::AnnotationStore;

// ── Key commands ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
    };
}

/// A raw key press as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyChord {
    pub key: char,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: char, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn ctrl(key: char) -> Self {
        Self::new(key, Modifiers::CTRL)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    SaveToFile,
    CopyToClipboard,
}

impl KeyCommand {
    /// Only plain Ctrl chords map to commands; any extra modifier disqualifies the chord.
    pub fn from_chord(chord: KeyChord) -> Option<KeyCommand> {
        if chord.modifiers != Modifiers::CTRL {
            return None;
        }
        match chord.key.to_ascii_uppercase() {
            'Z' => Some(KeyCommand::Undo),
            'S' => Some(KeyCommand::SaveToFile),
            'C' => Some(KeyCommand::CopyToClipboard),
            _ => None,
        }
    }
}

/// Work the session hands back to the host because it needs external collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorRequest {
    SaveToFile,
    CopyToClipboard,
}

// ── Session ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Dragging,
    /// Waiting for the host's text prompt to resolve.
    Prompting,
}

/// What the host should do after a press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerDown {
    /// A drag started; moves will now produce previews.
    Dragging,
    /// Show the text prompt, then call [`DrawingSession::resolve_text`].
    PromptText(Point),
    /// A prompt is already open; the press was dropped.
    Ignored,
}

#[derive(Clone, Debug)]
struct DragSession {
    tool: Tool,
    anchor: Point,
    preview: PreviewSlot,
}

#[derive(Debug, Default)]
pub struct DrawingSession {
    tool: Tool,
    color: Color4,
    drag: Option<DragSession>,
    pending_text: Option<Point>,
    store: AnnotationStore,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn select_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            tracing::debug!(from = ?self.tool, to = ?tool, "tool selected");
        }
        self.tool = tool;
    }

    pub fn color(&self) -> Color4 {
        self.color
    }

    /// Applies the color dialog's result. `None` means cancelled and keeps the current color.
    pub fn choose_color(&mut self, chosen: Option<Color4>) {
        if let Some(color) = chosen {
            self.color = color;
        }
    }

    pub fn state(&self) -> SessionState {
        if self.pending_text.is_some() {
            SessionState::Prompting
        } else if self.drag.is_some() {
            SessionState::Dragging
        } else {
            SessionState::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pending_text(&self) -> Option<Point> {
        self.pending_text
    }

    /// The live candidate shape, if a drag has produced one.
    pub fn preview(&self) -> Option<&Shape> {
        self.drag.as_ref().and_then(|drag| drag.preview.get())
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn on_pointer_down(&mut self, at: Point) -> PointerDown {
        if self.pending_text.is_some() {
            return PointerDown::Ignored;
        }
        if !self.tool.drags() {
            self.drag = None;
            self.pending_text = Some(at);
            tracing::debug!(x = at.x, y = at.y, "text prompt requested");
            return PointerDown::PromptText(at);
        }
        if self.drag.is_some() {
            tracing::debug!("press during drag, restarting gesture");
        }
        self.drag = Some(DragSession {
            tool: self.tool,
            anchor: at,
            preview: PreviewSlot::default(),
        });
        tracing::debug!(tool = ?self.tool, x = at.x, y = at.y, "drag started");
        PointerDown::Dragging
    }

    /// Rebuilds the preview from the anchor to `at`. Returns the new preview while dragging.
    pub fn on_pointer_move(&mut self, at: Point) -> Option<&Shape> {
        let color = self.color;
        let drag = self.drag.as_mut()?;
        let shape = Shape::from_drag(drag.tool, drag.anchor, at, color)?;
        drag.preview.set(shape);
        drag.preview.get()
    }

    /// Ends the drag, committing the preview if there is one. Returns whether a shape was
    /// committed.
    pub fn on_pointer_up(&mut self) -> bool {
        let Some(mut drag) = self.drag.take() else {
            return false;
        };
        match drag.preview.take() {
            Some(shape) => {
                self.store.commit(shape);
                true
            }
            None => {
                tracing::debug!(tool = ?drag.tool, "released without movement, nothing committed");
                false
            }
        }
    }

    /// Resolves an open text prompt. Cancelled (`None`) or empty text commits nothing.
    pub fn resolve_text(&mut self, text: Option<String>) -> bool {
        let Some(at) = self.pending_text.take() else {
            return false;
        };
        match text {
            Some(text) if !text.is_empty() => {
                self.store.commit(Shape::text(at, text, self.color));
                true
            }
            _ => {
                tracing::debug!("text prompt cancelled or empty");
                false
            }
        }
    }

    pub fn undo_last(&mut self) -> Option<Shape> {
        self.store.undo_last()
    }

    pub fn on_key_command(&mut self, command: KeyCommand) -> Option<EditorRequest> {
        match command {
            KeyCommand::Undo => {
                self.undo_last();
                None
            }
            KeyCommand::SaveToFile => Some(EditorRequest::SaveToFile),
            KeyCommand::CopyToClipboard => Some(EditorRequest::CopyToClipboard),
        }
    }

    /// Interprets a raw chord; chords that are not commands are ignored.
    pub fn on_key_chord(&mut self, chord: KeyChord) -> Option<EditorRequest> {
        KeyCommand::from_chord(chord).and_then(|command| self.on_key_command(command))
    }
}
