/*!

Types/type aliases that abstract over the implementing backing type.

A motivating example is the `IString` type, an interned string type. A number of external crates
could provide this functionality. This module redirects to whatever chosen implementation we want.
If we want to later swap `string_cache` for another interning crate, only this module changes.

The `log` module plays the same role for logging: its (crate) public interface consists only of
the macros `critical!`, `error!`, `warning!`, `info!`, `debug!`, and `trace!`. The backing
implementation (currently `tracing`) is encapsulated in the `log` module.

*/

pub mod log;

/// Interned strings used for variable and operator names. Create one with `IString::from(..)`.
pub use string_cache::DefaultAtom as IString;
