//! Integration tests for the realtime delivery channel.
//!
//! These drive a real listener: the test server runs on a local port and
//! clients connect with tokio-tungstenite, presenting the same bearer
//! token the HTTP surface uses.

mod common;

#[cfg(test)]
mod ws_tests {
    use super::common::*;
    use axum_test::http::HeaderName;
    use axum_test::TestServer;
    use futures_util::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use storefront::core::AppState;
    use storefront::entities::Role;
    use tokio::net::TcpStream;
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

    type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

    /// A server over HTTP transport on a random local port: WebSocket
    /// clients dial the same listener the `server.post(..)` calls use.
    fn spawn_server(state: Arc<AppState>) -> TestServer {
        TestServer::builder()
            .http_transport()
            .build(storefront::create_router(state))
            .expect("test server")
    }

    fn ws_url(server: &TestServer) -> String {
        let url = server.server_url("/ws").expect("server url");
        url.to_string().replacen("http", "ws", 1)
    }

    async fn connect(ws_url: &str, token: &str) -> WsClient {
        let mut request = ws_url.into_client_request().expect("client request");
        request.headers_mut().insert(
            "Authorization",
            format!("Bearer {token}").parse().expect("header value"),
        );
        let (client, _) = tokio_tungstenite::connect_async(request)
            .await
            .expect("websocket connect");
        client
    }

    /// The server registers a connection right after the upgrade; give the
    /// spawned task a moment before relying on fan-out.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    fn send_message_event(body: &str) -> Message {
        Message::Text(
            json!({
                "type": "SendMessage",
                "data": { "body": body }
            })
            .to_string(),
        )
    }

    /// Next JSON event within two seconds, or panic.
    async fn recv_event(client: &mut WsClient) -> Value {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(2), client.next())
                .await
                .expect("timed out waiting for event")
                .expect("stream ended")
                .expect("websocket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).expect("valid JSON event");
            }
        }
    }

    /// Assert nothing arrives on this connection for a short window.
    async fn assert_silent(client: &mut WsClient) {
        let outcome = tokio::time::timeout(Duration::from_millis(300), client.next()).await;
        assert!(outcome.is_err(), "expected no delivery, got {:?}", outcome);
    }

    #[tokio::test]
    async fn send_reaches_admin_group_but_not_the_sender() {
        let state = create_test_state(test_pool().await);
        let admin = seed_user(&state, "support", "Support", Role::Admin).await;
        let customer = seed_user(&state, "alice", "Alice", Role::User).await;
        let server = spawn_server(state.clone());
        let url = ws_url(&server);

        let mut admin_ws = connect(&url, &create_test_jwt(admin.user_id, "support")).await;
        let mut user_ws = connect(&url, &create_test_jwt(customer.user_id, "alice")).await;
        settle().await;

        user_ws.send(send_message_event("Hi")).await.expect("send");

        let event = recv_event(&mut admin_ws).await;
        assert_eq!(event["type"], "MessageCreated");
        assert_eq!(event["data"]["body"], "Hi");
        assert_eq!(event["data"]["conversation_key"], customer.user_id);
        assert_eq!(event["data"]["sender"], "user");

        // the sending connection renders its own optimistic copy
        assert_silent(&mut user_ws).await;

        // the channel is only a notification layer: the store has the row
        let history = state
            .msg
            .find_many_by_conversation(&customer.user_id)
            .await
            .expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].body.as_deref(), Some("Hi"));
    }

    #[tokio::test]
    async fn rapid_sends_deliver_once_each_in_append_order() {
        let state = create_test_state(test_pool().await);
        let admin = seed_user(&state, "support", "Support", Role::Admin).await;
        let customer = seed_user(&state, "bob", "Bob", Role::User).await;
        let server = spawn_server(state.clone());
        let url = ws_url(&server);

        let mut admin_ws = connect(&url, &create_test_jwt(admin.user_id, "support")).await;
        // the same customer from two tabs
        let mut tab_one = connect(&url, &create_test_jwt(customer.user_id, "bob")).await;
        let mut tab_two = connect(&url, &create_test_jwt(customer.user_id, "bob")).await;
        settle().await;

        tab_one.send(send_message_event("first tab")).await.expect("send");
        let first = recv_event(&mut admin_ws).await;
        tab_two.send(send_message_event("second tab")).await.expect("send");
        let second = recv_event(&mut admin_ws).await;

        assert_eq!(first["type"], "MessageCreated");
        assert_eq!(second["type"], "MessageCreated");
        assert_eq!(first["data"]["body"], "first tab");
        assert_eq!(second["data"]["body"], "second tab");

        // delivery follows store-append order
        let first_id = first["data"]["message_id"].as_i64().unwrap();
        let second_id = second["data"]["message_id"].as_i64().unwrap();
        assert!(first_id < second_id, "events out of append order");

        // exactly once to the admin group
        assert_silent(&mut admin_ws).await;

        // each tab sees the other tab's message but never its own
        let on_tab_one = recv_event(&mut tab_one).await;
        assert_eq!(on_tab_one["data"]["body"], "second tab");
        assert_silent(&mut tab_one).await;
        let on_tab_two = recv_event(&mut tab_two).await;
        assert_eq!(on_tab_two["data"]["body"], "first tab");
        assert_silent(&mut tab_two).await;
    }

    #[tokio::test]
    async fn admin_reply_reaches_the_customer_and_other_admins() {
        let state = create_test_state(test_pool().await);
        let admin = seed_user(&state, "support", "Support", Role::Admin).await;
        let second_admin = seed_user(&state, "backup", "Backup", Role::Admin).await;
        let customer = seed_user(&state, "carol", "Carol", Role::User).await;
        let server = spawn_server(state.clone());
        let url = ws_url(&server);

        let mut admin_ws = connect(&url, &create_test_jwt(admin.user_id, "support")).await;
        let mut backup_ws = connect(&url, &create_test_jwt(second_admin.user_id, "backup")).await;
        let mut user_ws = connect(&url, &create_test_jwt(customer.user_id, "carol")).await;
        settle().await;

        admin_ws
            .send(Message::Text(
                json!({
                    "type": "SendMessage",
                    "data": { "conversation_key": customer.user_id, "body": "How can we help?" }
                })
                .to_string(),
            ))
            .await
            .expect("send");

        let to_user = recv_event(&mut user_ws).await;
        assert_eq!(to_user["type"], "MessageCreated");
        assert_eq!(to_user["data"]["sender"], "admin");
        assert_eq!(to_user["data"]["body"], "How can we help?");

        // every other admin connection sees it too; the sender does not
        let to_backup = recv_event(&mut backup_ws).await;
        assert_eq!(to_backup["data"]["body"], "How can we help?");
        assert_silent(&mut admin_ws).await;
    }

    #[tokio::test]
    async fn invalid_payload_returns_error_to_sender_only() {
        let state = create_test_state(test_pool().await);
        let admin = seed_user(&state, "support", "Support", Role::Admin).await;
        let customer = seed_user(&state, "dave", "Dave", Role::User).await;
        let server = spawn_server(state.clone());
        let url = ws_url(&server);

        let mut admin_ws = connect(&url, &create_test_jwt(admin.user_id, "support")).await;
        let mut user_ws = connect(&url, &create_test_jwt(customer.user_id, "dave")).await;
        settle().await;

        // neither body nor attachment
        user_ws
            .send(Message::Text(
                json!({ "type": "SendMessage", "data": {} }).to_string(),
            ))
            .await
            .expect("send");

        let event = recv_event(&mut user_ws).await;
        assert_eq!(event["type"], "Error");
        assert_eq!(event["data"]["code"], 400);

        // nothing was persisted, nothing was fanned out
        assert_silent(&mut admin_ws).await;
        let history = state
            .msg
            .find_many_by_conversation(&customer.user_id)
            .await
            .expect("history");
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn http_append_fans_out_to_connected_peers() {
        let state = create_test_state(test_pool().await);
        let admin = seed_user(&state, "support", "Support", Role::Admin).await;
        let customer = seed_user(&state, "erin", "Erin", Role::User).await;
        let server = spawn_server(state.clone());
        let url = ws_url(&server);

        let mut admin_ws = connect(&url, &create_test_jwt(admin.user_id, "support")).await;
        settle().await;

        // plain HTTP append from a client with no socket open, over the
        // same listener the WebSocket peers are connected to
        let token = create_test_jwt(customer.user_id, "erin");
        server
            .post(&format!("/conversations/{}/messages", customer.user_id))
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {token}"),
            )
            .json(&json!({ "body": "sent over HTTP" }))
            .await
            .assert_status(axum_test::http::StatusCode::CREATED);

        let event = recv_event(&mut admin_ws).await;
        assert_eq!(event["type"], "MessageCreated");
        assert_eq!(event["data"]["body"], "sent over HTTP");
    }
}
