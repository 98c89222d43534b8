pub mod cli;
pub mod document;
pub mod store;
pub mod template;
pub mod ui;
pub mod utils;
pub mod version;

pub use store::TemplateRepository;
pub use template::{FieldDescriptor, FieldKind, Template};
pub use version::VERSION;
