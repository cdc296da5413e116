//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the prompt interpreter and the shape session as MCP tools. The
//! server talks JSON-RPC 2.0 over a line-delimited transport, stdio in the
//! binary and in-memory buffers in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        MCP Server                        │
//! │                                                          │
//! │   ┌─────────────┐    ┌─────────────┐    ┌────────────┐   │
//! │   │  Transport  │───▶│   Server    │───▶│   Shape    │   │
//! │   │   (stdio)   │    │ (lifecycle) │    │  session   │   │
//! │   └─────────────┘    └─────────────┘    └────────────┘   │
//! │          │                  │                  │         │
//! │          ▼                  ▼                  ▼         │
//! │   ┌──────────────────────────────────────────────────┐   │
//! │   │                JSON-RPC Messages                 │   │
//! │   └──────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::{StdioTransport, Transport};
