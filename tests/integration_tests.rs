//! Integration tests for the NoPickles client.
//! A throwaway HTTP server on localhost answers each request with a canned
//! response and records what it received.

#[cfg(test)]
mod tests {
    use nopickles::kiosk::CHAT_FAILED_MESSAGE;
    use nopickles::{ChatRequest, Error, Kiosk, OrderClient, SessionId, TerminalView};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    #[derive(Debug)]
    struct Recorded {
        method: String,
        target: String,
        body: String,
    }

    /// Serve one connection per canned response, in order.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Recorded>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut recorded = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                recorded.push(read_request(&mut stream).await);
                let reason = match status {
                    200 => "OK",
                    400 => "Bad Request",
                    404 => "Not Found",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
            recorded
        });
        (format!("http://{addr}/"), handle)
    }

    async fn read_request(stream: &mut TcpStream) -> Recorded {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request headers ended");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request body ended");
            buf.extend_from_slice(&chunk[..n]);
        }
        let mut request_line = head.lines().next().unwrap().split_whitespace();
        Recorded {
            method: request_line.next().unwrap().to_string(),
            target: request_line.next().unwrap().to_string(),
            body: String::from_utf8_lossy(&buf[header_end..header_end + content_length])
                .to_string(),
        }
    }

    #[tokio::test]
    async fn start_session_posts_without_body() {
        let (base_url, server) = serve(vec![(
            200,
            r#"{"session_id":"abc-123","message":"Welcome to NoPickles! What can I get for you today?"}"#,
        )])
        .await;
        let client = OrderClient::new(Some(base_url)).unwrap();

        let start = tokio_test::assert_ok!(client.start_session().await);
        assert_eq!(start.session_id, SessionId::new("abc-123"));

        let recorded = server.await.unwrap();
        assert_eq!(recorded[0].method, "POST");
        assert_eq!(recorded[0].target, "/api/session/start");
        assert!(recorded[0].body.is_empty());
    }

    #[tokio::test]
    async fn chat_sends_session_and_message() {
        let (base_url, server) = serve(vec![(
            200,
            r#"{"message":"Added 2 Cheeseburger to your order.","order":{"session_id":"abc-123","items":[{"menu_item_id":"burger_cheese","name":"Cheeseburger","quantity":2,"price":9.99,"special_instructions":null}],"total":19.98},"suggestions":["How about some fries to go with that?"]}"#,
        )])
        .await;
        let client = OrderClient::new(Some(base_url)).unwrap();

        let request = ChatRequest::new(SessionId::new("abc-123"), "two cheeseburgers");
        let response = tokio_test::assert_ok!(client.chat(&request).await);
        let order = response.order.unwrap();
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.total, 19.98);
        assert_eq!(response.suggestions.len(), 1);

        let recorded = server.await.unwrap();
        assert_eq!(recorded[0].method, "POST");
        assert_eq!(recorded[0].target, "/api/chat");
        let body: serde_json::Value = serde_json::from_str(&recorded[0].body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"session_id": "abc-123", "message": "two cheeseburgers"})
        );
    }

    #[tokio::test]
    async fn complete_order_uses_query_parameter() {
        let (base_url, server) = serve(vec![(
            200,
            r#"{"order_id":"abc-123","items":[],"total":30.0,"status":"confirmed"}"#,
        )])
        .await;
        let client = OrderClient::new(Some(base_url)).unwrap();

        let confirmation =
            tokio_test::assert_ok!(client.complete_order(&SessionId::new("abc-123")).await);
        assert_eq!(confirmation.total, 30.0);

        let recorded = server.await.unwrap();
        assert_eq!(recorded[0].method, "POST");
        assert_eq!(recorded[0].target, "/api/order/complete?session_id=abc-123");
        assert!(recorded[0].body.is_empty());
    }

    #[tokio::test]
    async fn end_session_menu_and_health() {
        let (base_url, server) = serve(vec![
            (200, r#"{"message":"Session ended"}"#),
            (
                200,
                r#"{"categories":["drinks"],"items_by_category":{"drinks":[{"id":"drink_water","name":"Bottled Water","category":"drinks","price":1.99,"description":"Pure spring water","available":true}]}}"#,
            ),
            (200, r#"{"status":"healthy","active_sessions":3}"#),
        ])
        .await;
        let client = OrderClient::new(Some(base_url)).unwrap();

        let ended = tokio_test::assert_ok!(client.end_session(&SessionId::new("abc-123")).await);
        assert_eq!(ended.message, "Session ended");
        let menu = tokio_test::assert_ok!(client.menu().await);
        assert_eq!(menu.sections().next().map(|(_, items)| items.len()), Some(1));
        let health = tokio_test::assert_ok!(client.health().await);
        assert!(health.is_healthy());
        assert_eq!(health.active_sessions, 3);

        let recorded = server.await.unwrap();
        let calls: Vec<_> = recorded
            .iter()
            .map(|r| (r.method.as_str(), r.target.as_str()))
            .collect();
        assert_eq!(
            calls,
            vec![
                ("DELETE", "/api/session/abc-123"),
                ("GET", "/api/menu"),
                ("GET", "/api/health"),
            ]
        );
    }

    #[tokio::test]
    async fn error_statuses_carry_detail() {
        let (base_url, server) = serve(vec![
            (404, r#"{"detail":"Session not found. Please start a new session."}"#),
            (400, r#"{"detail":"Cannot complete an empty order"}"#),
        ])
        .await;
        let client = OrderClient::new(Some(base_url)).unwrap();

        let request = ChatRequest::new(SessionId::new("gone"), "hello");
        let err = client.chat(&request).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Please start a new session"));

        let err = client
            .complete_order(&SessionId::new("empty"))
            .await
            .unwrap_err();
        assert!(err.is_bad_request());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unparseable_body_is_a_serialization_error() {
        let (base_url, server) = serve(vec![(200, "<html>oops</html>")]).await;
        let client = OrderClient::new(Some(base_url)).unwrap();
        let err = client.start_session().await.unwrap_err();
        assert!(err.is_serialization());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_service_is_a_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OrderClient::new(Some(format!("http://{addr}/"))).unwrap();
        let err = client.start_session().await.unwrap_err();
        assert!(matches!(err, Error::Connection { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn kiosk_over_http() {
        let (base_url, server) = serve(vec![
            (
                200,
                r#"{"session_id":"abc-123","message":"Welcome to NoPickles! What can I get for you today?"}"#,
            ),
            (
                200,
                r#"{"message":"Added 2 Burger to your order.","order":{"items":[{"name":"Burger","quantity":2,"price":5.0}],"total":10.0},"suggestions":["Add fries"]}"#,
            ),
            (500, r#"{"detail":"agent crashed"}"#),
        ])
        .await;
        let client = OrderClient::new(Some(base_url)).unwrap();
        let kiosk = Kiosk::new(client, TerminalView::with_writer(Vec::new(), false));

        assert!(kiosk.start_new_session().await.is_applied());
        kiosk.set_input("two burgers").await;
        assert!(kiosk.send_message().await.is_applied());
        assert!(kiosk.checkout_enabled().await);
        assert!(kiosk.click_suggestion(0).await.error().is_some());

        let transcript = kiosk
            .with_view(|view| String::from_utf8(view.get_ref().clone()).unwrap())
            .await;
        assert!(transcript.contains("Your order is empty"));
        assert!(transcript.contains("$10.00"));
        assert!(transcript.contains("[1] Add fries"));
        assert!(transcript.contains("You: Add fries"));
        assert!(transcript.ends_with(&format!("Assistant: {CHAT_FAILED_MESSAGE}\n")));

        let recorded = server.await.unwrap();
        assert_eq!(recorded.len(), 3);
        assert!(recorded[2].body.contains("Add fries"));
    }
}
