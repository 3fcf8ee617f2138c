use crate::engine::camera::Transition;
use crate::engine::events::{ItemsRefreshed, TeardownRequest};
use crate::engine::items::DisplayItem;
use crate::engine::systems::fps_tracking::current_fps;
use crate::engine::systems::scene_tick::ActiveScene;
use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page
/// and the scene. Handles both request-response patterns and notification
/// broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications queued since the last flush.
    pub fn notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    /// Responses queued since the last flush.
    pub fn responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the WebRPC communication layer for iframe-based
/// deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<ItemsRefreshed>()
            .add_event::<TeardownRequest>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages).chain(),
            )
            // Flush after the scene has queued this frame's notifications.
            .add_systems(PostUpdate, send_outgoing_messages);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener)
            .add_systems(Update, detach_message_listener);
    }
}

/// Listener closure kept alive for as long as the scene accepts messages.
#[cfg(target_arch = "wasm32")]
struct MessageListener(Closure<dyn FnMut(MessageEvent)>);

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(world: &mut World) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Only string payloads that look like JSON-RPC are queued.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available"),
    }

    world.insert_resource(MessageQueue(message_queue));
    world.insert_non_send_resource(MessageListener(closure));
}

/// Remove the page listener once the scene is torn down.
#[cfg(target_arch = "wasm32")]
fn detach_message_listener(
    mut requests: EventReader<TeardownRequest>,
    listener: Option<NonSend<MessageListener>>,
    mut commands: Commands,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let Some(listener) = listener else {
        return;
    };
    if let Some(window) = window() {
        if let Err(e) = window
            .remove_event_listener_with_callback("message", listener.0.as_ref().unchecked_ref())
        {
            error!("Failed to remove message listener: {:?}", e);
        }
    }

    commands.remove_resource::<MessageQueue>();
    commands.queue(|world: &mut World| {
        world.remove_non_send_resource::<MessageListener>();
    });
    info!("Message listener detached");
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Everything the RPC methods can touch.
#[derive(SystemParam)]
struct RpcContext<'w> {
    diagnostics: Res<'w, DiagnosticsStore>,
    scene: Option<ResMut<'w, ActiveScene>>,
    refresh: EventWriter<'w, ItemsRefreshed>,
    teardown: EventWriter<'w, TeardownRequest>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut context: RpcContext,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
                rpc_interface.queue_response(RpcResponse {
                    jsonrpc: "2.0".to_string(),
                    result: None,
                    error: Some(RpcError::invalid_request(&parse_error.to_string())),
                    id: None,
                });
            }
        }
    }
}

/// Run one request. Requests without an id are notifications: the method
/// still runs but nothing is sent back.
fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    let id = request.id.clone();

    let result = if request.jsonrpc != "2.0" {
        Err(RpcError::invalid_request("Expected jsonrpc \"2.0\""))
    } else {
        match request.method.as_str() {
            "set_items" => handle_set_items(&request.params, &mut context.refresh),
            "focus_item" => handle_focus_item(&request.params, context.scene.as_deref_mut()),
            "exit_focus" => handle_exit_focus(context.scene.as_deref_mut()),
            "get_status" => handle_get_status(context.scene.as_deref()),
            "get_fps" => handle_get_fps(&context.diagnostics),
            "teardown" => handle_teardown(&mut context.teardown),
            _ => {
                warn!("Unknown RPC method: {}", request.method);
                Err(RpcError {
                    code: -32601,
                    message: "Method not found".to_string(),
                    data: Some(serde_json::json!({"method": request.method})),
                })
            }
        }
    };

    let id = id?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn scene_not_running() -> RpcError {
    RpcError::internal_error("Scene is not running")
}

/// Replace the displayed items. The rebuild happens on the next frame.
fn handle_set_items(
    params: &serde_json::Value,
    refresh: &mut EventWriter<ItemsRefreshed>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SetItemsParams {
        items: Vec<DisplayItem>,
    }

    let parsed = serde_json::from_value::<SetItemsParams>(params.clone())
        .map_err(|e| RpcError::invalid_params(&format!("Expected 'items' array: {e}")))?;
    let received = parsed.items.len();
    refresh.write(ItemsRefreshed(parsed.items));

    Ok(serde_json::json!({
        "success": true,
        "received": received
    }))
}

fn handle_focus_item(
    params: &serde_json::Value,
    scene: Option<&mut ActiveScene>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct FocusParams {
        id: String,
    }

    let parsed = serde_json::from_value::<FocusParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id' parameter"))?;
    let scene = scene.ok_or_else(scene_not_running)?;

    let transition = scene
        .0
        .focus_item(&parsed.id)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown item: {}", parsed.id)))?;

    Ok(serde_json::json!({
        "success": transition != Transition::Rejected,
        "mode": scene.0.camera().mode()
    }))
}

fn handle_exit_focus(scene: Option<&mut ActiveScene>) -> Result<serde_json::Value, RpcError> {
    let scene = scene.ok_or_else(scene_not_running)?;
    let transition = scene.0.request_exit();

    Ok(serde_json::json!({
        "success": transition != Transition::Rejected,
        "mode": scene.0.camera().mode()
    }))
}

fn handle_get_status(scene: Option<&ActiveScene>) -> Result<serde_json::Value, RpcError> {
    let scene = scene.ok_or_else(scene_not_running)?;
    let mut status = serde_json::to_value(scene.0.status())
        .map_err(|e| RpcError::internal_error(&e.to_string()))?;

    if let (Some(map), Some(overlay)) = (status.as_object_mut(), scene.0.overlay()) {
        let overlay =
            serde_json::to_value(overlay).map_err(|e| RpcError::internal_error(&e.to_string()))?;
        map.insert("overlay".to_string(), overlay);
    }
    Ok(status)
}

fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = current_fps(diagnostics).unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

fn handle_teardown(
    teardown: &mut EventWriter<TeardownRequest>,
) -> Result<serde_json::Value, RpcError> {
    teardown.write(TeardownRequest);
    Ok(serde_json::json!({
        "success": true
    }))
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Post a notification straight away, for use before the app exists.
pub fn post_notification(method: &str, params: serde_json::Value) {
    send_message_to_parent(&RpcNotification {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
    });
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_request(message: &str) -> Self {
        Self {
            code: -32600,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
