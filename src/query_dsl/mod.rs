//! Query DSL clause builders.  Each function returns a single clause that can
//! be dropped into a `bool` query.

mod bool;
mod field_exists;
mod range;
mod term;
mod terms;

pub use self::bool::{bool_filter, push_filter};
pub use field_exists::{exists, missing};
pub use range::range_millis;
pub use term::term;
pub use terms::terms;
