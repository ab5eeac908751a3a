use behsanj_core::models::TranscriptionMode;
use behsanj_transcribe::{
    TranscribeError, append_transcript, decode_data_uri, encode_data_uri, transcribe,
};

#[test]
fn append_inserts_a_single_space_when_needed() {
    assert_eq!(append_transcript("", "سلام"), "سلام");
    assert_eq!(append_transcript("متن اول", "متن دوم"), "متن اول متن دوم");
    assert_eq!(append_transcript("متن اول ", "متن دوم"), "متن اول متن دوم");
}

#[test]
fn data_uri_round_trip() {
    let bytes = b"\x1aEsome-webm-bytes";
    let uri = encode_data_uri("audio/webm", bytes);
    assert!(uri.starts_with("data:audio/webm;base64,"));

    let (mime, decoded) = decode_data_uri(&uri).unwrap();
    assert_eq!(mime, "audio/webm");
    assert_eq!(decoded, bytes);
}

#[test]
fn malformed_data_uris_are_rejected() {
    assert!(matches!(
        decode_data_uri("audio/webm;base64,AAAA"),
        Err(TranscribeError::BadDataUri)
    ));
    assert!(matches!(
        decode_data_uri("data:audio/webm"),
        Err(TranscribeError::BadDataUri)
    ));
    assert!(matches!(
        decode_data_uri("data:audio/webm,AAAA"),
        Err(TranscribeError::BadDataUri)
    ));
    assert!(matches!(
        decode_data_uri("data:audio/webm;base64,not-base64!!!"),
        Err(TranscribeError::Decode(_))
    ));
}

#[tokio::test]
async fn browser_mode_never_calls_the_server() {
    let uri = encode_data_uri("audio/webm", b"bytes");
    let err = transcribe("http://127.0.0.1:1", &uri, TranscriptionMode::Browser, &[])
        .await
        .unwrap_err();
    match err {
        TranscribeError::Provider { provider, .. } => assert_eq!(provider, "browser"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let uri = encode_data_uri("audio/webm", b"bytes");
    let err = transcribe(
        "http://127.0.0.1:1",
        &uri,
        TranscriptionMode::Gemini,
        &["key-1".to_string()],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, TranscribeError::Http(_)));
}
