pub mod drag;
pub mod hit;
pub mod input;
pub mod placement;
pub mod registry;
pub mod reorder;
pub mod session;

pub use drag::{DragPayload, DragPhase, DragTracker, ItemOrigin, Rollback, nearest_zone};
pub use input::{ClickTarget, InputEvent};
pub use placement::Canvas;
pub use registry::{DropZone, DropZoneRegistry, ZoneKey};
pub use reorder::RowBoard;
pub use session::{BuilderSession, DropTarget, Mutation};
