//! Field / group model and the owning [`FormTree`].

pub mod field;
pub mod group;
pub mod path;
pub mod tree;
pub mod value;

pub use field::{accepts_numeric_key, Field};
pub use group::{Control, Group, RepeatedGroup};
pub use path::FieldPath;
pub use tree::FormTree;
pub use value::Value;
