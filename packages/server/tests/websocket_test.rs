//! Integration tests for the WebSocket protocol, driving a real in-process server.

mod common;

use common::{assert_silent, connect, next_frame, send, start_test_server};
use serde_json::json;

#[tokio::test]
async fn test_create_join_message_end_flow() {
    // テスト項目: 作成 → 参加 → 送信 → 終了 の一連の流れ
    // given (前提条件):
    let addr = start_test_server().await;
    let (mut alice, _) = connect(addr).await;
    let (mut bob, _) = connect(addr).await;

    // when (操作): Alice がルームを作成
    send(
        &mut alice,
        json!({"action": "CreateRoom", "requestId": 1, "displayName": "Alice"}),
    )
    .await;
    let created = next_frame(&mut alice).await;

    // then (期待する結果):
    assert_eq!(created["type"], "Ok");
    assert_eq!(created["requestId"], 1);
    let passcode = created["result"]["passcode"].as_str().unwrap().to_string();
    assert_eq!(passcode.len(), 8);
    let dashed = format!("{}-{}", &passcode[..4], &passcode[4..]);

    // when (操作): Bob が区切り付きのパスコードで参加
    send(
        &mut bob,
        json!({"action": "JoinRoom", "requestId": 2, "passcode": dashed, "displayName": "Bob"}),
    )
    .await;

    // then (期待する結果): 両者に参加通知と参加者一覧が届き、Bob には返信が届く
    let joined = json!({"type": "UserJoined", "displayName": "Bob", "participants": ["Alice", "Bob"]});
    let presence = json!({"type": "PresenceList", "participants": ["Alice", "Bob"]});
    assert_eq!(next_frame(&mut alice).await, joined);
    assert_eq!(next_frame(&mut alice).await, presence);
    assert_eq!(next_frame(&mut bob).await, joined);
    assert_eq!(next_frame(&mut bob).await, presence);
    assert_eq!(
        next_frame(&mut bob).await,
        json!({"type": "Ok", "requestId": 2, "result": {"isOwner": false, "displayName": "Bob"}})
    );

    // when (操作): Bob がメッセージを送信
    send(
        &mut bob,
        json!({"action": "SendMessage", "requestId": 3, "passcode": passcode, "text": "<b>hi</b>"}),
    )
    .await;

    // then (期待する結果): エスケープされた本文が両者に届く
    for socket in [&mut alice, &mut bob] {
        let received = next_frame(socket).await;
        assert_eq!(received["type"], "ReceiveMessage");
        assert_eq!(received["displayName"], "Bob");
        assert_eq!(received["text"], "&lt;b&gt;hi&lt;/b&gt;");
        let utc = received["utc"].as_str().unwrap();
        assert_eq!(utc.len(), "2023-01-01T00:00:00.000Z".len());
        assert!(utc.ends_with('Z'));
    }
    assert_eq!(
        next_frame(&mut bob).await,
        json!({"type": "Ok", "requestId": 3, "result": null})
    );

    // when (操作): 所有者でない Bob が終了しようとする
    send(&mut bob, json!({"action": "EndRoom", "requestId": 4, "passcode": passcode})).await;

    // then (期待する結果):
    let refused = next_frame(&mut bob).await;
    assert_eq!(refused["type"], "Error");
    assert_eq!(refused["requestId"], 4);
    assert_eq!(refused["code"], "NOT_OWNER");
    assert_silent(&mut alice).await;

    // when (操作): 所有者の Alice が終了
    send(&mut alice, json!({"action": "EndRoom", "requestId": 5, "passcode": passcode})).await;

    // then (期待する結果): 両者に RoomClosed が届き、以後は送信できない
    assert_eq!(next_frame(&mut alice).await, json!({"type": "RoomClosed"}));
    assert_eq!(
        next_frame(&mut alice).await,
        json!({"type": "Ok", "requestId": 5, "result": null})
    );
    assert_eq!(next_frame(&mut bob).await, json!({"type": "RoomClosed"}));

    send(
        &mut bob,
        json!({"action": "SendMessage", "requestId": 6, "passcode": passcode, "text": "anyone?"}),
    )
    .await;
    let after_close = next_frame(&mut bob).await;
    assert_eq!(after_close["code"], "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn test_disconnect_notifies_room() {
    // テスト項目: 切断すると残りの参加者に UserLeft と PresenceList が届く
    // given (前提条件):
    let addr = start_test_server().await;
    let (mut alice, _) = connect(addr).await;
    let (mut bob, _) = connect(addr).await;
    send(
        &mut alice,
        json!({"action": "JoinRoom", "passcode": "24682468", "displayName": "Alice"}),
    )
    .await;
    assert_eq!(next_frame(&mut alice).await["type"], "UserJoined");
    assert_eq!(next_frame(&mut alice).await["type"], "PresenceList");
    let reply = next_frame(&mut alice).await;
    assert_eq!(reply["result"]["isOwner"], true);

    send(
        &mut bob,
        json!({"action": "JoinRoom", "passcode": "24682468", "displayName": "Bob"}),
    )
    .await;
    for _ in 0..2 {
        next_frame(&mut alice).await;
    }

    // when (操作):
    bob.close(None).await.unwrap();

    // then (期待する結果):
    assert_eq!(
        next_frame(&mut alice).await,
        json!({"type": "UserLeft", "displayName": "Bob", "participants": ["Alice"]})
    );
    assert_eq!(
        next_frame(&mut alice).await,
        json!({"type": "PresenceList", "participants": ["Alice"]})
    );
}

#[tokio::test]
async fn test_invalid_frames_and_validation_errors() {
    // テスト項目: 解析できないフレームと検証エラーは呼び出し元にだけ返る
    // given (前提条件):
    let addr = start_test_server().await;
    let (mut socket, _) = connect(addr).await;

    // when (操作) / then (期待する結果):
    send(&mut socket, json!({"action": "Dance"})).await;
    let bad = next_frame(&mut socket).await;
    assert_eq!(bad["type"], "Error");
    assert_eq!(bad["code"], "BAD_REQUEST");

    send(
        &mut socket,
        json!({"action": "JoinRoom", "requestId": 9, "passcode": "123-45678", "displayName": "A"}),
    )
    .await;
    let format_error = next_frame(&mut socket).await;
    assert_eq!(format_error["code"], "INVALID_FORMAT");
    assert_eq!(format_error["requestId"], 9);

    send(
        &mut socket,
        json!({"action": "JoinRoom", "passcode": "12345678", "displayName": "<script>"}),
    )
    .await;
    assert_eq!(next_frame(&mut socket).await["code"], "INVALID_NAME");

    // ハートビートは不正なパスコードでも成功扱い
    send(&mut socket, json!({"action": "Heartbeat", "requestId": 10, "passcode": "nope"})).await;
    assert_eq!(
        next_frame(&mut socket).await,
        json!({"type": "Ok", "requestId": 10, "result": null})
    );
}

#[tokio::test]
async fn test_create_room_rate_limit() {
    // テスト項目: 同じ接続元からのルーム作成は 1 分に 3 回まで
    // given (前提条件):
    let addr = start_test_server().await;
    let (mut socket, connection_id) = connect(addr).await;

    // when (操作):
    for request_id in 0..3 {
        send(&mut socket, json!({"action": "CreateRoom", "requestId": request_id})).await;
        let reply = next_frame(&mut socket).await;
        assert_eq!(reply["type"], "Ok");
    }
    send(&mut socket, json!({"action": "CreateRoom", "requestId": 3})).await;

    // then (期待する結果):
    let limited = next_frame(&mut socket).await;
    assert_eq!(limited["type"], "Error");
    assert_eq!(limited["code"], "RATE_LIMITED");
    assert!(!connection_id.is_empty());
}
