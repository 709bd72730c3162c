//! Request-body and API-arg builders for every outbound route.
//!
//! These are pure functions so the wire shapes can be verified without
//! any network in play.

/// Build a create_folder_v2 request body.
pub fn build_create_folder(path: &str) -> serde_json::Value {
    serde_json::json!({
        "path": path,
        "autorename": false,
    })
}

/// Build a get_metadata request body.
pub fn build_get_metadata(path: &str) -> serde_json::Value {
    serde_json::json!({
        "path": path,
        "include_media_info": false,
        "include_deleted": false,
        "include_has_explicit_shared_members": false,
    })
}

/// Build a list_folder request body.
pub fn build_list_folder(path: &str) -> serde_json::Value {
    // The API wants "" for the root, never "/".
    let path = if path == "/" { "" } else { path };
    serde_json::json!({
        "path": path,
        "recursive": false,
        "include_media_info": false,
        "include_deleted": false,
        "include_has_explicit_shared_members": false,
        "include_mounted_folders": true,
        "include_non_downloadable_files": true,
    })
}

/// Build a list_folder/continue request body.
pub fn build_list_folder_continue(cursor: &str) -> serde_json::Value {
    serde_json::json!({ "cursor": cursor })
}

/// Build a delete_v2 request body.
pub fn build_delete(path: &str) -> serde_json::Value {
    serde_json::json!({ "path": path })
}

/// Build the commit arg for a single-request upload.
pub fn build_upload_arg(path: &str) -> serde_json::Value {
    serde_json::json!({
        "path": path,
        "mode": "overwrite",
        "autorename": false,
        "mute": false,
        "strict_conflict": false,
    })
}

/// Build an upload_session/start arg.
pub fn build_upload_session_start() -> serde_json::Value {
    serde_json::json!({ "close": false })
}

/// Build an upload_session/append_v2 arg for the given session cursor.
pub fn build_upload_session_append(session_id: &str, offset: u64) -> serde_json::Value {
    serde_json::json!({
        "cursor": { "session_id": session_id, "offset": offset },
        "close": false,
    })
}

/// Build an upload_session/finish arg committing the session to `path`.
pub fn build_upload_session_finish(session_id: &str, offset: u64, path: &str) -> serde_json::Value {
    serde_json::json!({
        "cursor": { "session_id": session_id, "offset": offset },
        "commit": {
            "path": path,
            "mode": "overwrite",
            "autorename": false,
            "mute": false,
            "strict_conflict": false,
        },
    })
}

/// Form parameters for the authorization-code → token exchange.
pub fn build_token_exchange_form<'a>(
    app_key: &'a str,
    app_secret: &'a str,
    code: &'a str,
) -> Vec<(&'static str, &'a str)> {
    vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", app_key),
        ("client_secret", app_secret),
    ]
}
