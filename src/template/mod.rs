pub mod editor;
pub mod engine;
pub mod error;
pub mod markers;
pub mod models;

pub use editor::{EditorState, FieldUpdate, TemplateEditor};
pub use engine::{apply, render, validate, FormValues};
pub use error::TemplateError;
pub use markers::{find_markers, Marker, NO_DATA};
pub use models::{FieldDescriptor, FieldKind, Template};
