use bytes::Bytes;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use std::sync::{Arc, Mutex};
use vidhost_core::{AppError, ItemMetadata, Visibility};
use vidhost_hosting::{ProgressFn, VideoHost, YoutubeCredentials, YoutubeHost, YoutubeOptions};

fn host_for(server: &ServerGuard, chunk_size: usize) -> YoutubeHost {
    let credentials = YoutubeCredentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        refresh_token: "refresh".to_string(),
    };
    let options = YoutubeOptions {
        api_base_url: format!("{}/youtube/v3", server.url()),
        upload_base_url: format!("{}/upload/youtube/v3", server.url()),
        token_url: format!("{}/token", server.url()),
        upload_chunk_size: chunk_size,
        ..YoutubeOptions::default()
    };
    YoutubeHost::new(credentials, options).unwrap()
}

async fn mock_token(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"access_token":"access","expires_in":3600}"#)
        .create_async()
        .await
}

fn video_json(title: &str, privacy: &str) -> serde_json::Value {
    json!({
        "id": "v1",
        "snippet": {
            "title": title,
            "description": "d",
            "categoryId": "24",
            "publishedAt": "2023-01-01T00:00:00Z",
            "tags": ["keep-me"]
        },
        "status": { "privacyStatus": privacy },
        "contentDetails": { "duration": "PT0S" },
        "fileDetails": { "durationMs": "10000" }
    })
}

async fn mock_video_list(server: &mut ServerGuard, items: serde_json::Value) -> Mock {
    server
        .mock("GET", "/youtube/v3/videos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "v1".into()),
            Matcher::UrlEncoded(
                "part".into(),
                "contentDetails,id,snippet,status,fileDetails".into(),
            ),
        ]))
        .match_header("authorization", "Bearer access")
        .with_status(200)
        .with_body(json!({ "items": items }).to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn create_video_uploads_media_and_refetches_details() {
    let mut server = mockito::Server::new_async().await;
    mock_token(&mut server).await;

    let insert = server
        .mock("POST", "/upload/youtube/v3/videos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("uploadType".into(), "multipart".into()),
            Matcher::UrlEncoded("part".into(), "id,snippet,status,contentDetails".into()),
        ]))
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/related; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""categoryId":"24""#.to_string()),
            Matcher::Regex(r#""privacyStatus":"unlisted""#.to_string()),
            Matcher::Regex("0123456789".to_string()),
        ]))
        .with_status(200)
        .with_body(json!({ "id": "v1" }).to_string())
        .expect(1)
        .create_async()
        .await;
    mock_video_list(&mut server, json!([video_json("t", "unlisted")])).await;

    let progress = Arc::new(Mutex::new(Vec::new()));
    let recorder = progress.clone();
    let on_progress: ProgressFn = Arc::new(move |sent, total| {
        recorder.lock().unwrap().push((sent, total));
    });

    let host = host_for(&server, 4);
    let video = host
        .create_video(
            &ItemMetadata::new("t", "d", Visibility::Unlisted),
            Bytes::from_static(b"0123456789"),
            Some(on_progress),
        )
        .await
        .unwrap();

    insert.assert_async().await;
    assert_eq!(video.id, "v1");
    assert_eq!(video.duration_seconds, 10);
    assert_eq!(video.watch_prefix, "https://www.youtube.com/watch?v=");
    assert_eq!(*progress.lock().unwrap(), vec![(4, 10), (8, 10), (10, 10)]);
}

#[tokio::test]
async fn retrieve_video_with_no_items_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    mock_token(&mut server).await;
    mock_video_list(&mut server, json!([])).await;

    let err = host_for(&server, 1024).retrieve_video("v1").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.request_error().map(|r| r.status_code), Some(404));
}

#[tokio::test]
async fn provider_status_and_message_are_propagated() {
    let mut server = mockito::Server::new_async().await;
    mock_token(&mut server).await;
    server
        .mock("GET", "/youtube/v3/playlists")
        .with_status(403)
        .with_body(
            json!({
                "error": {
                    "code": 403,
                    "message": "The request is not properly authorized to retrieve the specified playlist."
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = host_for(&server, 1024)
        .retrieve_playlist("p1")
        .await
        .unwrap_err();

    let request = err.request_error().expect("request error");
    assert_eq!(request.status_code, 403);
    assert_eq!(
        request.message,
        "The request is not properly authorized to retrieve the specified playlist."
    );
}

#[tokio::test]
async fn update_video_rejects_identity_change_before_any_mutation() {
    let mut server = mockito::Server::new_async().await;
    mock_token(&mut server).await;
    mock_video_list(&mut server, json!([video_json("t", "private")])).await;
    let put = server
        .mock("PUT", "/youtube/v3/videos")
        .expect(0)
        .create_async()
        .await;

    let host = host_for(&server, 1024);
    let mut replacement = host.retrieve_video("v1").await.unwrap();
    replacement.id = "v2".to_string();
    replacement.title = "renamed".to_string();

    let err = host.update_video("v1", &replacement).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    put.assert_async().await;
}

#[tokio::test]
async fn update_video_sends_mutable_fields_and_keeps_the_rest() {
    let mut server = mockito::Server::new_async().await;
    mock_token(&mut server).await;
    mock_video_list(&mut server, json!([video_json("t", "private")])).await;

    let mut updated = video_json("renamed", "public");
    if let Some(fields) = updated.as_object_mut() {
        fields.remove("fileDetails");
    }
    let put = server
        .mock("PUT", "/youtube/v3/videos")
        .match_body(Matcher::PartialJson(json!({
            "id": "v1",
            "snippet": { "title": "renamed", "categoryId": "24", "tags": ["keep-me"] },
            "status": { "privacyStatus": "public" }
        })))
        .with_status(200)
        .with_body(updated.to_string())
        .expect(1)
        .create_async()
        .await;

    let host = host_for(&server, 1024);
    let mut replacement = host.retrieve_video("v1").await.unwrap();
    replacement.title = "renamed".to_string();
    replacement.visibility = Visibility::Public;

    let video = host.update_video("v1", &replacement).await.unwrap();

    put.assert_async().await;
    assert_eq!(video.title, "renamed");
    assert_eq!(video.visibility, Visibility::Public);
    assert_eq!(video.duration_seconds, 10);
    assert_eq!(video.created_at, replacement.created_at);
}

#[tokio::test]
async fn playlist_operations_hit_the_expected_endpoints() {
    let mut server = mockito::Server::new_async().await;
    mock_token(&mut server).await;

    let create = server
        .mock("POST", "/youtube/v3/playlists")
        .match_query(Matcher::UrlEncoded(
            "part".into(),
            "snippet,status,contentDetails".into(),
        ))
        .match_body(Matcher::Json(json!({
            "snippet": { "title": "list", "description": "" },
            "status": { "privacyStatus": "private" }
        })))
        .with_status(200)
        .with_body(
            json!({
                "id": "p1",
                "snippet": { "title": "list", "description": "", "publishedAt": "2023-01-01T00:00:00Z" },
                "status": { "privacyStatus": "private" },
                "contentDetails": { "itemCount": 0 }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let add = server
        .mock("POST", "/youtube/v3/playlistItems")
        .match_body(Matcher::Json(json!({
            "snippet": {
                "playlistId": "p1",
                "resourceId": { "kind": "youtube#video", "videoId": "v1" }
            }
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/youtube/v3/playlists")
        .match_query(Matcher::UrlEncoded("id".into(), "p1".into()))
        .with_status(204)
        .create_async()
        .await;

    let host = host_for(&server, 1024);
    let playlist = host
        .create_playlist(&ItemMetadata::new("list", "", Visibility::Private))
        .await
        .unwrap();
    assert_eq!(playlist.id, "p1");
    assert_eq!(playlist.item_count, 0);

    host.add_video_to_playlist("v1", "p1").await.unwrap();
    host.delete_playlist("p1").await.unwrap();

    create.assert_async().await;
    add.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn set_thumbnail_uploads_image_bytes() {
    let mut server = mockito::Server::new_async().await;
    mock_token(&mut server).await;
    let thumbnail = server
        .mock("POST", "/upload/youtube/v3/thumbnails/set")
        .match_query(Matcher::UrlEncoded("videoId".into(), "v1".into()))
        .match_header("content-type", "image/png")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    host_for(&server, 1024)
        .set_thumbnail("v1", Bytes::from_static(b"\x89PNG\r\n\x1a\n"))
        .await
        .unwrap();

    thumbnail.assert_async().await;
}

#[tokio::test]
async fn delete_missing_video_keeps_404() {
    let mut server = mockito::Server::new_async().await;
    mock_token(&mut server).await;
    server
        .mock("DELETE", "/youtube/v3/videos")
        .with_status(404)
        .with_body(json!({ "error": { "code": 404, "message": "Video not found." } }).to_string())
        .create_async()
        .await;

    let err = host_for(&server, 1024).delete_video("gone").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Video not found.");
}

#[tokio::test]
async fn revoked_refresh_token_is_not_a_provider_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#)
        .create_async()
        .await;
    let list = server
        .mock("GET", "/youtube/v3/videos")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = host_for(&server, 1024).retrieve_video("v1").await.unwrap_err();

    assert!(matches!(err, AppError::Unclassified(_)));
    assert!(err.request_error().is_none());
    assert!(err.to_string().contains("invalid_grant"));
    list.assert_async().await;
}
