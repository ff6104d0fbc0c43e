//! Safe merge helpers for BEM template data.
//!
//! Records are JSON objects, so there is no prototype link a patch could
//! rewrite: a `__proto__` key in untrusted input is stored and read back as
//! an ordinary own entry. Merges never fail on input shape; values that
//! cannot be merged into are replaced by `{}` or `[]`.

mod append;
mod extend;
mod namespace;
mod property;
mod shape;

pub use append::{append, push};
pub use extend::{extend, extend_args};
pub use namespace::{HelperError, HelperFn, HelperNamespace};
pub use property::{
    enumerable_entries, guarded_get, guarded_set, parse_index, MAX_SEQUENCE_HOLE, PROTO_KEY,
};
pub use shape::{is_array, is_plain_object, Shape};
