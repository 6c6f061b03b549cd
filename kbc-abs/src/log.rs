/*!

A thin facade over `tracing` so the rest of the workspace never names the logging backend
directly. Swapping backends means editing only this file.

*/

pub use tracing::{
  error as critical,
  error,
  warn as warning,
  info,
  debug,
  trace,
  info_span,
  trace_span,
};
