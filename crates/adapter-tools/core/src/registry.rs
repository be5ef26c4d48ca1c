//! Tool registry: discovery (`list_tools`) and invocation (`invoke`).

use crate::context::ToolContext;
use crate::envelope::{ToolCallRequest, ToolResult};
use crate::error::ToolError;
use crate::fmt::{TextFormat, TextOptions};
use crate::schema::input_schema_object;
use crate::tool::{Tool, ToolCodec};
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Static description of a registered tool, as returned by discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Map<String, Value>,
}

/// A registered tool with its codec, behind one object-safe interface.
pub trait ErasedTool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Map<String, Value>;

    /// Decode `args`, run the tool and render the output.
    fn call_text(
        &self,
        args: Value,
        ctx: &ToolContext,
        text_opts: &TextOptions,
    ) -> BoxFuture<'static, Result<String, ToolError>>;
}

/// Registry of tools for discovery and dispatch.
///
/// Built once at startup and read-only afterwards, so it can be shared behind an
/// `Arc` by concurrent invocations without locking.
pub struct ToolRegistry {
    map: BTreeMap<String, Arc<dyn ErasedTool>>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Registered names in ascending order.
    pub fn list_names(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    /// Discovery: one descriptor per tool, ordered by name.
    ///
    /// Reads only immutable state, so repeated calls return identical sequences.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.map
            .values()
            .map(|t| ToolDescriptor {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ErasedTool>> {
        self.map.get(name)
    }

    /// Dispatch a tool call using JSON arguments, returning the rendered text.
    pub async fn dispatch(
        &self,
        name: &str,
        args: Value,
        ctx: &ToolContext,
        text_opts: &TextOptions,
    ) -> Result<String, ToolError> {
        let entry = self
            .map
            .get(name)
            .ok_or_else(|| ToolError::unknown_tool(name))?;
        entry.call_text(args, ctx, text_opts).await
    }

    /// Invoke a tool and shape the outcome into a [`ToolResult`].
    ///
    /// Returns `Err` only for [`ToolError::UnknownTool`]; argument, refusal and
    /// execution failures all come back as an error envelope.
    pub async fn invoke(
        &self,
        request: ToolCallRequest,
        ctx: &ToolContext,
        text_opts: &TextOptions,
    ) -> Result<ToolResult, ToolError> {
        let ToolCallRequest {
            tool_name,
            arguments,
        } = request;
        match self
            .dispatch(&tool_name, Value::Object(arguments), ctx, text_opts)
            .await
        {
            Err(e) if e.is_protocol() => Err(e),
            outcome => Ok(ToolResult::from_outcome(outcome)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Builder for constructing a [`ToolRegistry`].
#[derive(Default)]
pub struct ToolRegistryBuilder {
    items: Vec<(String, Arc<dyn ErasedTool>)>,
}

impl ToolRegistryBuilder {
    /// Register a tool with its codec.
    ///
    /// Use `()` as the codec when the tool's Input type already implements
    /// serde and schemars traits.
    pub fn register<T, C>(self, tool: T) -> Self
    where
        T: Tool + Clone + 'static,
        C: ToolCodec<T> + 'static,
    {
        self.register_described::<T, C>(tool, T::DESCRIPTION)
    }

    /// Register a tool whose description is computed at startup.
    ///
    /// Useful when the description mentions configured values such as limits.
    pub fn register_described<T, C>(mut self, tool: T, description: impl Into<String>) -> Self
    where
        T: Tool + Clone + 'static,
        C: ToolCodec<T> + 'static,
    {
        struct Impl<T: Tool + Clone, C: ToolCodec<T>> {
            tool: T,
            description: String,
            _codec: PhantomData<C>,
        }

        impl<T: Tool + Clone, C: ToolCodec<T>> ErasedTool for Impl<T, C> {
            fn name(&self) -> &'static str {
                T::NAME
            }

            fn description(&self) -> &str {
                &self.description
            }

            fn input_schema(&self) -> Map<String, Value> {
                input_schema_object::<C::WireIn>()
            }

            fn call_text(
                &self,
                args: Value,
                ctx: &ToolContext,
                text_opts: &TextOptions,
            ) -> BoxFuture<'static, Result<String, ToolError>> {
                let wire_in: Result<C::WireIn, _> = serde_json::from_value(args);
                let text_opts = text_opts.clone();

                match wire_in {
                    Err(e) => Box::pin(async move { Err(ToolError::invalid_input(e)) }),
                    Ok(wire) => match C::decode(wire) {
                        Err(e) => Box::pin(async move { Err(e) }),
                        Ok(native_in) => {
                            let fut = self.tool.call(native_in, ctx);
                            Box::pin(async move {
                                let out = fut.await?;
                                Ok(out.fmt_text(&text_opts))
                            })
                        }
                    },
                }
            }
        }

        let erased: Arc<dyn ErasedTool> = Arc::new(Impl::<T, C> {
            tool,
            description: description.into(),
            _codec: PhantomData,
        });
        self.items.push((T::NAME.to_string(), erased));
        self
    }

    /// Build the registry from registered tools.
    ///
    /// Later registrations with a duplicate name replace earlier ones.
    pub fn finish(self) -> ToolRegistry {
        ToolRegistry {
            map: self.items.into_iter().collect(),
        }
    }
}
