//! Thingboard Core Library
//!
//! Platform-agnostic board document and layout engine for the Thingboard
//! dashboard builder: cards, sections, the packing engine, gesture
//! controllers, and persistence.

pub mod autofit;
pub mod board;
pub mod canvas;
pub mod card;
pub mod descriptor;
pub mod drag;
pub mod events;
pub mod geometry;
pub mod input;
pub mod order;
pub mod pack;
pub mod resize;
pub mod section;
pub mod storage;
pub mod wiring;

pub use autofit::AutoFitObserver;
pub use board::BoardDocument;
pub use canvas::Canvas;
pub use card::{Card, CardId, CardKind};
pub use descriptor::{CardDescriptor, SectionDescriptor};
pub use drag::{DragGesture, DragPreview};
pub use events::{CommitEvent, NodeRef};
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use order::OrderStore;
pub use pack::{pack, pack_with_fixed, FixedCard, PackItem, Packing};
pub use resize::{ResizeGesture, ResizeHandle};
pub use section::{Section, SectionId, SectionStyle, StyleColor};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use wiring::{Ticket, Wiring};
