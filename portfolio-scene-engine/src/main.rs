use portfolio_scene_engine::engine::core::app_setup::create_app;
use portfolio_scene_engine::engine::error::SceneError;
use portfolio_scene_engine::rpc::web_rpc::post_notification;

fn main() {
    let mut app = match create_app() {
        Ok(app) => app,
        Err(err) => {
            report_startup_error(&err);
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

fn report_startup_error(err: &SceneError) {
    post_notification(
        "scene_error",
        serde_json::json!({
            "kind": err.kind(),
            "message": err.to_string(),
        }),
    );

    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&format!("Scene failed to start: {err}").into());

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("Scene failed to start: {err}");
}
