//! MCP server exposing the prompt interpreter and shape session as tools.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: `initialize` request, then the
//!    `notifications/initialized` notification
//! 2. **Operation**: `tools/list`, `tools/call` and `ping`
//! 3. **Shutdown**: end of input or a termination signal
//!
//! All lengths crossing the tool boundary are in meters, matching the
//! parser's output; labels and previews use millimeters.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};

use crate::cad::{CadHost, RecordingHost};
use crate::config::{Config, RenderConfig, MIN_RENDER_HEIGHT, MIN_RENDER_WIDTH};
use crate::mcp::protocol::{
    parse_message, ErrorCode, IncomingMessage, JsonRpcError, JsonRpcErrorData,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId, MCP_PROTOCOL_VERSION,
    SERVER_NAME,
};
use crate::mcp::transport::Transport;
use crate::prompt::{self, Shape, ShapeKind, UNKNOWN_SHAPE_HELP};
use crate::recipe::recipe_for_parsed;
use crate::render::render_recipe_ascii;
use crate::session::{ShapeSession, DEFAULT_SPHERE_RADIUS};

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client name and version, if sent.
    #[serde(default)]
    pub client_info: Option<Value>,
}

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if passes &T
const fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Creates a successful result holding pretty-printed JSON.
    #[must_use]
    pub fn json(value: &Value) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(format!("Failed to serialise result: {e}")),
        }
    }
}

/// The MCP server.
pub struct McpServer<R, W> {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: Transport<R, W>,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Shapes built so far.
    session: ShapeSession<RecordingHost>,
    /// Preview defaults.
    render: RenderConfig,
}

impl McpServer<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Creates a server on stdin and stdout.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_transport(config, Transport::stdio())
    }
}

impl<R, W> McpServer<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server on an arbitrary transport.
    pub fn with_transport(config: &Config, transport: Transport<R, W>) -> Self {
        let host = RecordingHost::with_template(config.template_path.clone());
        Self {
            state: ServerState::AwaitingInit,
            transport,
            protocol_version: None,
            session: ShapeSession::with_stacking(host, config.session.stack_by_default),
            render: config.render.clone(),
        }
    }

    /// Returns the current server state.
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// The shape session driven by this server.
    pub const fn session(&self) -> &ShapeSession<RecordingHost> {
        &self.session
    }

    /// Consumes the server, returning its transport.
    pub fn into_transport(self) -> Transport<R, W> {
        self.transport
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Serves requests until the input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve(&mut self) -> io::Result<()> {
        loop {
            let line_result = self.transport.read_line().await;
            if self.handle_transport_result(line_result).await? {
                return Ok(());
            }
        }
    }

    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: io::Result<Option<String>>,
    ) -> io::Result<bool> {
        let Some(line) = line_result? else {
            tracing::debug!("Input closed");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        match parse_message(&line) {
            Ok(IncomingMessage::Request(req)) => self.handle_request(&req).await?,
            Ok(IncomingMessage::Notification(notif)) => self.handle_notification(&notif),
            Err(error) => self.transport.write_message(&error).await?,
        }

        Ok(self.state == ServerState::ShuttingDown)
    }

    async fn handle_request(&mut self, req: &JsonRpcRequest) -> io::Result<()> {
        tracing::debug!(id = %req.id, method = %req.method, "Request");
        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            "tools/list" => self.handle_tools_list(req),
            "tools/call" => self.handle_tools_call(req),
            "ping" => Ok(JsonRpcResponse::success(req.id.clone(), json!({}))),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };

        match response {
            Ok(resp) => self.transport.write_message(&resp).await,
            Err(error) => self.transport.write_message(&error).await,
        }
    }

    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            tracing::info!("Client initialised");
            self.state = ServerState::Running;
        }
    }

    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::invalid_request(
                Some(req.id.clone()),
                "Server already initialised",
            ));
        }

        let params: InitializeParams = parse_params(req, "initialize")?;
        tracing::info!(
            client_version = %params.protocol_version,
            client = ?params.client_info,
            "Initialize"
        );

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();
        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;
        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "tools": tool_definitions() }),
        ))
    }

    fn handle_tools_call(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;
        let params: ToolCallParams = parse_params(req, "tool call")?;
        let args = &params.arguments;

        tracing::debug!(tool = %params.name, "Tool call");
        let result = match params.name.as_str() {
            "parse_prompt" => Self::call_parse_prompt(args),
            "create_from_prompt" => self.call_create_from_prompt(args),
            "create_shape" => self.call_create_shape(args),
            "create_sphere" => self.call_create_sphere(args),
            "begin_stack" => {
                self.session.begin_stack();
                self.stack_result("Stacking enabled")
            }
            "reset_stack" => {
                self.session.reset();
                self.stack_result("Stack reset")
            }
            "create_plane" => self.call_create_plane(args),
            "set_height_to_plane" => match self.session.set_height_to_plane() {
                Ok(()) => self.stack_result("Stack height moved to plane"),
                Err(e) => ToolCallResult::error(e.to_string()),
            },
            "render_prompt" => self.call_render_prompt(args),
            "get_session" => self.call_get_session(args),
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        let value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;
        Ok(JsonRpcResponse::success(req.id.clone(), value))
    }

    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state == ServerState::Running {
            Ok(())
        } else {
            Err(JsonRpcError::new(
                Some(id.clone()),
                JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server not initialised"),
            ))
        }
    }

    fn call_parse_prompt(args: &Value) -> ToolCallResult {
        let prompt = match required_str(args, "prompt") {
            Ok(prompt) => prompt,
            Err(e) => return e,
        };
        let Some(parsed) = prompt::parse(prompt) else {
            return ToolCallResult::error(UNKNOWN_SHAPE_HELP);
        };

        let mut value = match serde_json::to_value(parsed) {
            Ok(value) => value,
            Err(e) => return ToolCallResult::error(format!("Failed to serialise shape: {e}")),
        };
        if let Some(obj) = value.as_object_mut() {
            obj.insert("label".into(), json!(recipe_for_parsed(&parsed).label));
        }
        ToolCallResult::json(&value)
    }

    fn call_create_from_prompt(&mut self, args: &Value) -> ToolCallResult {
        let prompt = match required_str(args, "prompt") {
            Ok(prompt) => prompt,
            Err(e) => return e,
        };
        match self.session.process_prompt(prompt) {
            Ok(label) => self.created(&label),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    fn call_create_shape(&mut self, args: &Value) -> ToolCallResult {
        let kind = match required_str(args, "shape_kind") {
            Ok(kind) => kind,
            Err(e) => return e,
        };
        if !ShapeKind::ALL.iter().any(|k| k.as_str() == kind) {
            let known: Vec<_> = ShapeKind::ALL.iter().map(|k| k.as_str()).collect();
            return ToolCallResult::error(format!(
                "Unknown shape_kind '{kind}'. Expected one of: {}",
                known.join(", ")
            ));
        }
        let Some(parameters) = args.get("parameters").filter(|p| p.is_object()) else {
            return ToolCallResult::error("Missing required parameter: parameters (object)");
        };
        let shape: Shape = match serde_json::from_value(json!({
            "shape_kind": kind,
            "parameters": parameters,
        })) {
            Ok(shape) => shape,
            Err(e) => return ToolCallResult::error(format!("Invalid parameters for {kind}: {e}")),
        };
        let is_2d = args.get("is_2d").and_then(Value::as_bool).unwrap_or(false);

        match self.session.create_shape(&shape, is_2d) {
            Ok(label) => self.created(&label),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    fn call_create_sphere(&mut self, args: &Value) -> ToolCallResult {
        let radius = args
            .get("radius")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_SPHERE_RADIUS);
        match self.session.create_sphere(radius) {
            Ok(label) => self.created(&label),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    fn call_create_plane(&mut self, args: &Value) -> ToolCallResult {
        let height = args.get("height").and_then(Value::as_f64);
        match self.session.create_plane(height) {
            Ok(label) => self.created(&label),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn call_render_prompt(&self, args: &Value) -> ToolCallResult {
        let prompt = match required_str(args, "prompt") {
            Ok(prompt) => prompt,
            Err(e) => return e,
        };
        let scale = args
            .get("scale")
            .and_then(Value::as_f64)
            .unwrap_or(self.render.scale);
        let max_width = args
            .get("max_width")
            .and_then(Value::as_u64)
            .map_or(self.render.max_width, |v| v as usize);
        let max_height = args
            .get("max_height")
            .and_then(Value::as_u64)
            .map_or(self.render.max_height, |v| v as usize);

        if !scale.is_finite() || scale <= 0.0 {
            return ToolCallResult::error("scale must be greater than 0");
        }
        if max_width < MIN_RENDER_WIDTH || max_height < MIN_RENDER_HEIGHT {
            return ToolCallResult::error(format!(
                "max_width must be at least {MIN_RENDER_WIDTH} and max_height at least {MIN_RENDER_HEIGHT}"
            ));
        }

        let Some(parsed) = prompt::parse(prompt) else {
            return ToolCallResult::error(UNKNOWN_SHAPE_HELP);
        };
        let recipe = recipe_for_parsed(&parsed);
        ToolCallResult::json(&json!({
            "status": "success",
            "shape_kind": parsed.kind(),
            "label": recipe.label,
            "scale": scale,
            "render": render_recipe_ascii(&recipe, scale, max_width, max_height),
        }))
    }

    fn call_get_session(&self, args: &Value) -> ToolCallResult {
        let include_commands = args
            .get("include_commands")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let host = self.session.host();

        let mut value = json!({
            "stack": self.session.state(),
            "history": self.session.history(),
            "documents_created": host.documents_created(),
            "active_document": host.document(),
            "command_count": host.commands().len(),
        });
        if include_commands {
            value["commands"] = json!(host.commands());
        }
        ToolCallResult::json(&value)
    }

    fn created(&self, label: &str) -> ToolCallResult {
        ToolCallResult::json(&json!({
            "status": "success",
            "label": label,
            "document": self.session.host().document().map(|d| d.id),
            "stack": self.session.state(),
        }))
    }

    fn stack_result(&self, message: &str) -> ToolCallResult {
        ToolCallResult::json(&json!({
            "status": "success",
            "message": message,
            "has_document": self.session.host().has_document(),
            "stack": self.session.state(),
        }))
    }
}

/// Deserialises the request's params, which must be present.
fn parse_params<T: for<'de> Deserialize<'de>>(
    req: &JsonRpcRequest,
    what: &str,
) -> Result<T, JsonRpcError> {
    let params = req.params.as_ref().ok_or_else(|| {
        JsonRpcError::invalid_params(req.id.clone(), format!("Missing {what} params"))
    })?;
    T::deserialize(params).map_err(|e| {
        JsonRpcError::invalid_params(req.id.clone(), format!("Invalid {what} params: {e}"))
    })
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, ToolCallResult> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolCallResult::error(format!("Missing required parameter: {name}")))
}

fn prompt_schema(extra: &Value) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "prompt": {
                "type": "string",
                "description": "Free-text shape description, e.g. \"hexagon 15mm radius 5mm tall\""
            }
        },
        "required": ["prompt"]
    });
    if let (Some(props), Some(extra)) = (schema["properties"].as_object_mut(), extra.as_object()) {
        props.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    schema
}

fn no_arguments() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// Returns the list of available tools.
#[allow(clippy::too_many_lines)]
fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "parse_prompt",
            description: "Interpret a free-text shape description without building anything. \
                 Returns the shape kind, its parameters in meters, the unit inferred for the \
                 prompt, whether a flat 2D sketch was requested and the label the shape would get.",
            input_schema: prompt_schema(&json!({})),
        },
        ToolDefinition {
            name: "create_from_prompt",
            description: "Interpret a free-text shape description and build it. Solids stack on \
                 the previous shape while stacking is enabled; 2D sketches always get a new \
                 document.",
            input_schema: prompt_schema(&json!({})),
        },
        ToolDefinition {
            name: "create_shape",
            description: "Build a shape from explicit parameters (meters). Parameter names per \
                 kind match the output of parse_prompt, e.g. cylinder {radius, height}, \
                 box {width, height, depth}, star {outer, inner, points, height}.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "shape_kind": {
                        "type": "string",
                        "enum": ShapeKind::ALL.iter().map(|k| k.as_str()).collect::<Vec<_>>()
                    },
                    "parameters": {
                        "type": "object",
                        "description": "Shape dimensions in meters"
                    },
                    "is_2d": {
                        "type": "boolean",
                        "description": "Sketch only, for kinds that have a flat form (default false)"
                    }
                },
                "required": ["shape_kind", "parameters"]
            }),
        },
        ToolDefinition {
            name: "create_sphere",
            description: "Build a sphere resting on the current stack height.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "radius": {
                        "type": "number",
                        "description": "Radius in meters (default 0.01)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "begin_stack",
            description: "Enter stacking mode: following solids are built on top of each other \
                 in the current document.",
            input_schema: no_arguments(),
        },
        ToolDefinition {
            name: "reset_stack",
            description: "Leave stacking mode and reset the stack height; the next shape starts \
                 a new document.",
            input_schema: no_arguments(),
        },
        ToolDefinition {
            name: "create_plane",
            description: "Add a reference plane parallel to the front plane and enter stacking \
                 mode. Requires an existing shape.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "height": {
                        "type": "number",
                        "description": "Offset in meters (default: current stack height)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "set_height_to_plane",
            description: "Move the stack height to the most recent plane so the next solid \
                 starts there.",
            input_schema: no_arguments(),
        },
        ToolDefinition {
            name: "render_prompt",
            description: "Preview the sketch profile a prompt would produce as ASCII art.",
            input_schema: prompt_schema(&json!({
                "scale": {
                    "type": "number",
                    "description": "Characters per millimeter"
                },
                "max_width": {
                    "type": "integer",
                    "description": "Maximum width in characters"
                },
                "max_height": {
                    "type": "integer",
                    "description": "Maximum height in lines"
                }
            })),
        },
        ToolDefinition {
            name: "get_session",
            description: "Report the stacking state, the shapes built so far and the active \
                 document.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "include_commands": {
                        "type": "boolean",
                        "description": "Include the full CAD command log (default false)"
                    }
                }
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    type MemoryServer = McpServer<&'static [u8], Vec<u8>>;

    fn running_server() -> MemoryServer {
        let mut server = McpServer::with_transport(
            &Config::default(),
            Transport::new(&b""[..], Vec::new()),
        );
        server.state = ServerState::Running;
        server
    }

    fn call(server: &mut MemoryServer, name: &str, arguments: Value) -> (bool, String) {
        let req = JsonRpcRequest {
            jsonrpc: "2.0".into(),
            id: RequestId::Number(1),
            method: "tools/call".into(),
            params: Some(json!({ "name": name, "arguments": arguments })),
        };
        let result = server.handle_tools_call(&req).unwrap().result;
        let text = result["content"][0]["text"].as_str().unwrap().to_string();
        (result["isError"].as_bool().unwrap_or(false), text)
    }

    #[test]
    fn server_initial_state() {
        let server = McpServer::with_transport(
            &Config::default(),
            Transport::new(&b""[..], Vec::new()),
        );
        assert_eq!(server.state(), ServerState::AwaitingInit);
        assert!(server.protocol_version().is_none());
    }

    #[test]
    fn tool_definitions_valid() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), 10);
        for tool in &tools {
            assert!(!tool.name.is_empty());
            assert!(tool.input_schema.is_object());
        }
        let render = tools.iter().find(|t| t.name == "render_prompt").unwrap();
        assert!(render.input_schema["properties"]["scale"].is_object());
        assert!(render.input_schema["properties"]["prompt"].is_object());
    }

    #[test]
    fn tool_call_result_error() {
        let result = ToolCallResult::error("Something went wrong");
        assert!(result.is_error);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["isError"], true);
        assert!(serde_json::to_value(ToolCallResult::text("ok")).unwrap()["isError"].is_null());
    }

    #[test]
    fn tools_require_running_state() {
        let mut server = running_server();
        server.state = ServerState::Initialising;
        let req = JsonRpcRequest {
            jsonrpc: "2.0".into(),
            id: RequestId::Number(9),
            method: "tools/list".into(),
            params: None,
        };
        assert!(server.handle_tools_list(&req).is_err());
    }

    #[test]
    fn parse_prompt_reports_meters_and_label() {
        let mut server = running_server();
        let (is_error, text) = call(&mut server, "parse_prompt", json!({ "prompt": "cube 2cm" }));
        assert!(!is_error);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["shape_kind"], "cube");
        assert_eq!(value["units"], "cm");
        assert_eq!(value["label"], "Cube (20.0x20.0x20.0mm)");
        assert!((value["parameters"]["size"].as_f64().unwrap() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn unknown_prompt_returns_help() {
        let mut server = running_server();
        let (is_error, text) = call(&mut server, "create_from_prompt", json!({ "prompt": "teapot" }));
        assert!(is_error);
        assert_eq!(text, UNKNOWN_SHAPE_HELP);
    }

    #[test]
    fn create_shape_from_parameters() {
        let mut server = running_server();
        let (is_error, text) = call(
            &mut server,
            "create_shape",
            json!({
                "shape_kind": "washer",
                "parameters": { "outer": 0.03, "inner": 0.01, "height": 0.004 }
            }),
        );
        assert!(!is_error, "{text}");
        assert!(text.contains("Washer (OD=30.0mm, ID=10.0mm)"));

        let (is_error, _) = call(
            &mut server,
            "create_shape",
            json!({ "shape_kind": "washer", "parameters": { "outer": 0.03 } }),
        );
        assert!(is_error);

        let (_, text) = call(
            &mut server,
            "create_shape",
            json!({ "shape_kind": "torus", "parameters": {} }),
        );
        assert!(text.contains("Unknown shape_kind"));
    }

    #[test]
    fn plane_before_shape_fails() {
        let mut server = running_server();
        let (is_error, text) = call(&mut server, "create_plane", json!({}));
        assert!(is_error);
        assert_eq!(text, "Create a shape first, then add a plane");

        let (_, text) = call(&mut server, "set_height_to_plane", json!({}));
        assert_eq!(text, "No active plane - create a plane first");
    }

    #[test]
    fn render_prompt_validates_scale() {
        let mut server = running_server();
        let (is_error, _) = call(
            &mut server,
            "render_prompt",
            json!({ "prompt": "hexagon 10", "scale": 0 }),
        );
        assert!(is_error);

        let (is_error, text) = call(&mut server, "render_prompt", json!({ "prompt": "hexagon 10" }));
        assert!(!is_error);
        assert!(text.contains("Hexagon (r=10.0mm"));
    }

    #[test]
    fn unknown_tool() {
        let mut server = running_server();
        let (is_error, text) = call(&mut server, "draw_teapot", json!({}));
        assert!(is_error);
        assert!(text.contains("draw_teapot"));
    }
}
