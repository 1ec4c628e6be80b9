use crate::config::Config;
use crate::db::Db;
use crate::error::{Result, KinmcpError};
use crate::mcp::tools;
use crate::mcp::types::*;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader as AsyncBufReader};

/// MCP Server implementation
pub struct McpServer {
    db: Db,
    config: Config,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(db: Db, config: Config) -> Self {
        Self { db, config }
    }

    /// Process an MCP JSON-RPC request
    ///
    /// # Returns
    /// * `Ok(Some(response))` - Response to send back to client
    /// * `Ok(None)` - Notification (no response needed)
    pub async fn process_mcp_request(
        &self,
        request: JsonRpcRequest,
        initialized: &mut bool,
    ) -> Result<Option<JsonRpcResponse>> {
        // Notifications carry no id and get no response
        let id = match &request.id {
            Some(id) => id.clone(),
            None => {
                if request.method == "notifications/initialized" {
                    *initialized = true;
                }
                return Ok(None);
            }
        };

        if request.jsonrpc != "2.0" {
            return Ok(Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
                None,
            )));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(&id, &request.params),
            "tools/list" => self.handle_tools_list(&id),
            "tools/call" => self.handle_tools_call(&id, &request.params).await,
            "shutdown" => Ok(JsonRpcResponse::result(id.clone(), Value::Null)),
            _ => Ok(JsonRpcResponse::error(
                id.clone(),
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown method: {}", request.method),
                None,
            )),
        };

        match response {
            Ok(resp) => Ok(Some(resp)),
            Err(e) => {
                log::warn!("Request {} failed: {}", request.method, e);
                let code = match &e {
                    KinmcpError::InvalidInput(_) | KinmcpError::McpProtocol(_) => error_codes::INVALID_PARAMS,
                    _ => error_codes::INTERNAL_ERROR,
                };
                Ok(Some(JsonRpcResponse::error(
                    id,
                    code,
                    e.to_string(),
                    Some(serde_json::json!({ "details": e.to_string() })),
                )))
            }
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout)
    pub async fn run(&self) -> Result<()> {
        let stdin = AsyncBufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        log::info!("kinmcp MCP server v{} starting", env!("CARGO_PKG_VERSION"));
        self.serve(stdin, stdout).await?;
        log::info!("MCP server shutting down");
        Ok(())
    }

    /// Serve newline-delimited JSON-RPC from `reader` until EOF
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        let mut initialized = false;

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await
                .map_err(KinmcpError::Io)?;

            // EOF - client disconnected
            if bytes_read == 0 {
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
                Ok(req) => req,
                Err(e) => {
                    // JSON-RPC wants a null id when the request id can't be read
                    let id = extract_id_from_line(trimmed).unwrap_or(Value::Null);
                    let error_response = JsonRpcResponse::error(
                        id,
                        error_codes::PARSE_ERROR,
                        format!("Parse error: {}", e),
                        None,
                    );
                    send_response(&mut writer, &error_response).await?;
                    continue;
                }
            };

            let was_initialized = initialized;
            if let Some(response) = self.process_mcp_request(request, &mut initialized).await? {
                send_response(&mut writer, &response).await?;
            } else if initialized && !was_initialized {
                log::info!("Client initialized");
            }
        }

        Ok(())
    }

    /// Handle initialize request
    fn handle_initialize(
        &self,
        id: &JsonRpcId,
        params: &Option<Value>,
    ) -> Result<JsonRpcResponse> {
        let params: InitializeParams = serde_json::from_value(
            params.clone().unwrap_or(serde_json::json!({}))
        )
        .map_err(|e| KinmcpError::McpProtocol(format!("Invalid initialize params: {}", e)))?;

        log::debug!("Client requested protocol {}", params.protocol_version);

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: serde_json::json!({
                "tools": {}
            }),
            server_info: ServerInfo {
                name: "kinmcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::result(id.clone(), to_value(&result)?))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: &JsonRpcId) -> Result<JsonRpcResponse> {
        let result = ToolsListResult {
            tools: tools::get_tool_definitions(),
        };
        Ok(JsonRpcResponse::result(id.clone(), to_value(&result)?))
    }

    /// Handle tools/call request
    async fn handle_tools_call(
        &self,
        id: &JsonRpcId,
        params: &Option<Value>,
    ) -> Result<JsonRpcResponse> {
        let params: ToolsCallParams = serde_json::from_value(
            params.clone().ok_or_else(|| {
                KinmcpError::McpProtocol("Missing params for tools/call".to_string())
            })?
        )
        .map_err(|e| KinmcpError::McpProtocol(format!("Invalid tools/call params: {}", e)))?;

        log::debug!("tools/call {}", params.name);

        let result = match params.name.as_str() {
            "kinship_resolve" => tools::handle_resolve(&self.db, &self.config, &params.arguments).await?,
            "kinship_search_people" => {
                tools::handle_search_people(&self.db, &self.config, &params.arguments).await?
            }
            "kinship_stats" => tools::handle_stats(&self.db).await?,
            "kinship_relatives" => {
                tools::handle_relatives(&self.db, &self.config, &params.arguments).await?
            }
            _ => {
                return Ok(JsonRpcResponse::error(
                    id.clone(),
                    error_codes::INVALID_PARAMS,
                    format!("Unknown tool: {}", params.name),
                    None,
                ));
            }
        };

        Ok(JsonRpcResponse::result(id.clone(), to_value(&result)?))
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| KinmcpError::McpProtocol(format!("JSON serialization error: {}", e)))
}

/// Send JSON-RPC response (newline-delimited)
async fn send_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| KinmcpError::McpProtocol(format!("JSON serialization error: {}", e)))?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Extract ID from a malformed JSON line
fn extract_id_from_line(line: &str) -> Option<Value> {
    let id_start = line.find(r#""id":"#)?;
    let id_str = &line[id_start + 5..];
    let id_end = id_str.find(|c: char| c == ',' || c == '}')?;
    let id_val = id_str[..id_end].trim();
    if id_val.len() >= 2 && id_val.starts_with('"') && id_val.ends_with('"') {
        Some(Value::String(id_val[1..id_val.len() - 1].to_string()))
    } else {
        id_val.parse::<i64>().ok().map(|num| Value::Number(num.into()))
    }
}
