//! Process execution seam used by the tool builders.

/// Recording invoker for unit tests.
#[cfg(test)]
pub(crate) mod fake;
/// [`ToolInvoker`](invoker::ToolInvoker) trait and the `std::process` implementation.
pub mod invoker;
