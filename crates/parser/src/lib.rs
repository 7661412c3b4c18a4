//! Design Studio Parser
//!
//! TSX-aware rewriting of generated design files, built on tree-sitter.
//!
//! - `jsx` - Element scanning (`scan_elements`, `collect_ids`)
//! - `injector` - Unique identifier assignment (`inject`, `InjectionResult`)
//! - `slug` - Namespace slugs for generated identifiers

pub mod injector;
pub mod jsx;
pub mod slug;

pub use injector::{inject, InjectionResult};
pub use jsx::{collect_ids, scan_elements, IdAttr, JsxElement};
pub use slug::slugify;
