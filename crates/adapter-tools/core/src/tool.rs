//! The [`Tool`] and [`ToolCodec`] traits.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::fmt::TextFormat;
use futures::future::BoxFuture;

/// A callable unit exposed to agent hosts.
///
/// Tools work on typed inputs only. Turning the caller's JSON into `Input` is the
/// job of a [`ToolCodec`], so business logic never sees a raw argument map.
///
/// ```ignore
/// struct Echo;
///
/// impl Tool for Echo {
///     type Input = String;
///     type Output = String;
///     const NAME: &'static str = "echo";
///     const DESCRIPTION: &'static str = "Echo the input back";
///
///     fn call(&self, input: String, _ctx: &ToolContext)
///         -> BoxFuture<'static, Result<String, ToolError>>
///     {
///         Box::pin(async move { Ok(input) })
///     }
/// }
/// ```
pub trait Tool: Send + Sync + 'static {
    type Input: Send + 'static;
    type Output: TextFormat + Send + 'static;

    /// Name callers use in `tools/call`. Must be unique within a registry.
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>>;
}

/// Decodes the wire arguments of tool `T` into `T::Input`.
///
/// `WireIn` is both what serde parses and what discovery advertises as the input
/// schema. `decode` is where checks serde cannot express live (blank strings and
/// the like); they fail with [`ToolError::InvalidInput`].
///
/// `()` is the pass-through codec for inputs that are already wire types.
pub trait ToolCodec<T: Tool>: Send + Sync + 'static {
    type WireIn: serde::de::DeserializeOwned + schemars::JsonSchema + Send + 'static;

    fn decode(wire: Self::WireIn) -> Result<T::Input, ToolError>;
}

impl<T> ToolCodec<T> for ()
where
    T: Tool,
    T::Input: serde::de::DeserializeOwned + schemars::JsonSchema,
{
    type WireIn = T::Input;

    fn decode(wire: Self::WireIn) -> Result<T::Input, ToolError> {
        Ok(wire)
    }
}
