//! Integration tests for the archive pipeline
//!
//! These tests run against in-memory and mocked HTTP retrievers; no live
//! archive service is required.

use archivist::retriever::Retriever;
use archivist::transcript::v2;
use archivist::{
    detect_version, ArchiveError, ArchiverClient, ChannelEntity, HttpRetriever, InMemoryRetriever,
    MapResolver, Message, NoopResolver, Resolvers, RoleEntity, SchemaVersion, Snowflake,
    StoreOptions, Transcript, User, UserEntity, VersionTag,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &[u8; 32] = b"integration-key-0123456789abcdef";

fn conversation(ticket: i32) -> Vec<Message> {
    let mut opener = Message::new(
        1u64,
        500u64,
        User::new(10u64, "customer"),
        format!("ticket {} opened, cc <@&900> in <#501>", ticket),
    );
    opener.attachments.push(json!({"id": "77", "filename": "screenshot.png"}));

    let mut reply = Message::new(2u64, 500u64, User::new(20u64, "support"), "looking now <@10>");
    reply.mentions.push(User::new(10u64, "customer"));
    reply.embeds.push(json!({"title": "Knowledge base", "url": "https://example.com/kb"}));

    vec![opener, reply]
}

fn user(name: &str) -> UserEntity {
    UserEntity {
        username: name.to_string(),
        discriminator: None,
        avatar: None,
        bot: false,
    }
}

#[tokio::test]
async fn test_pipeline_roundtrip_with_resolvers() {
    let retriever = InMemoryRetriever::new();
    let client = ArchiverClient::new(Arc::new(retriever.clone()), KEY).unwrap();

    let users = MapResolver::new()
        .with(10u64, user("customer"))
        .with(20u64, user("support"));
    let channels = MapResolver::new()
        .with(
            500u64,
            ChannelEntity {
                name: "ticket-1".to_string(),
            },
        )
        .with(
            501u64,
            ChannelEntity {
                name: "billing".to_string(),
            },
        );
    let roles = |id: Snowflake| {
        (id == Snowflake(900)).then(|| RoleEntity {
            name: "Support Team".to_string(),
            colour: 0x2ecc71,
        })
    };

    client
        .store(42, 1, conversation(1), &Resolvers::new(&users, &channels, &roles))
        .await
        .unwrap();
    let transcript = client.retrieve(42, 1).await.unwrap();

    assert_eq!(transcript.messages, conversation(1));
    assert_eq!(transcript.entities.users.len(), 2);
    assert_eq!(transcript.entities.channels.len(), 2);
    assert_eq!(transcript.entities.channels[&Snowflake(500)].name, "ticket-1");
    assert_eq!(transcript.entities.channels[&Snowflake(501)].name, "billing");
    assert_eq!(transcript.entities.roles[&Snowflake(900)].colour, 0x2ecc71);
}

#[tokio::test]
async fn test_stored_blob_is_opaque() {
    let retriever = InMemoryRetriever::new();
    let client = ArchiverClient::new(Arc::new(retriever.clone()), KEY).unwrap();
    client
        .store(42, 1, conversation(1), &Resolvers::none())
        .await
        .unwrap();

    let blob = retriever.get_ticket(42, 1).await.unwrap().unwrap();
    assert!(!String::from_utf8_lossy(&blob).contains("customer"));
    assert!(matches!(detect_version(&blob), VersionTag::Unrecognized(_)));
}

#[tokio::test]
async fn test_import_then_retrieve() {
    let client = ArchiverClient::new(Arc::new(InMemoryRetriever::new()), KEY).unwrap();
    let users = MapResolver::new().with(20u64, user("support"));
    let transcript = Transcript::new(
        conversation(3),
        &Resolvers::new(&users, &NoopResolver, &NoopResolver),
    );
    let encoded = v2::serialize_v2(&transcript).unwrap();
    assert_eq!(
        detect_version(&encoded),
        VersionTag::Known(SchemaVersion::V2)
    );

    client.import_encoded_transcript(42, 3, &encoded).await.unwrap();
    assert_eq!(client.retrieve(42, 3).await.unwrap(), transcript);
}

#[tokio::test]
async fn test_legacy_archive_upgraded_on_read() {
    let retriever = InMemoryRetriever::new();
    let client = ArchiverClient::new(Arc::new(retriever.clone()), KEY).unwrap();

    let legacy = serde_json::to_vec(&conversation(4)).unwrap();
    assert_eq!(detect_version(&legacy), VersionTag::Known(SchemaVersion::V1));
    retriever
        .insert_raw(42, 4, client.seal(&legacy).unwrap())
        .await;

    let transcript = client.retrieve(42, 4).await.unwrap();
    assert_eq!(transcript.messages, conversation(4));
    assert!(transcript.entities.is_empty());
}

#[tokio::test]
async fn test_concurrent_stores_and_retrieves() {
    let client = ArchiverClient::new(Arc::new(InMemoryRetriever::new()), KEY).unwrap();

    let stores = (0..16).map(|ticket| {
        let client = client.clone();
        async move {
            client
                .store(7, ticket, conversation(ticket), &Resolvers::none())
                .await
        }
    });
    for result in futures::future::join_all(stores).await {
        result.unwrap();
    }

    let reads = (0..16).map(|ticket| {
        let client = client.clone();
        async move { (ticket, client.retrieve(7, ticket).await) }
    });
    for (ticket, result) in futures::future::join_all(reads).await {
        assert_eq!(result.unwrap().messages, conversation(ticket));
    }
}

struct StalledRetriever;

#[async_trait]
impl Retriever for StalledRetriever {
    async fn get_ticket(&self, _: u64, _: i32) -> anyhow::Result<Option<Vec<u8>>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn store_ticket(&self, _: u64, _: i32, _: Vec<u8>, _: StoreOptions) -> anyhow::Result<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_caller_timeout_cancels_retrieve() {
    let client = ArchiverClient::new(Arc::new(StalledRetriever), KEY).unwrap();
    let outcome = tokio::time::timeout(Duration::from_millis(50), client.retrieve(1, 1)).await;
    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_http_store_then_retrieve() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let retriever =
        HttpRetriever::new(&server.uri(), Duration::from_secs(5), Duration::from_secs(5)).unwrap();
    let client = ArchiverClient::new(Arc::new(retriever), KEY).unwrap();
    client
        .store_with_options(
            42,
            9,
            conversation(9),
            &Resolvers::none(),
            StoreOptions::premium(),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().unwrap().ends_with("&premium"));
    let uploaded = requests[0].body.clone();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(uploaded))
        .mount(&server)
        .await;

    let transcript = client.retrieve(42, 9).await.unwrap();
    assert_eq!(transcript.messages, conversation(9));
}

#[tokio::test]
async fn test_http_expired_archive_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let retriever =
        HttpRetriever::new(&server.uri(), Duration::from_secs(5), Duration::from_secs(5)).unwrap();
    let client = ArchiverClient::new(Arc::new(retriever), KEY).unwrap();

    assert!(matches!(
        client.retrieve(42, 9).await,
        Err(ArchiveError::NotFound {
            guild_id: 42,
            ticket_id: 9
        })
    ));
}

#[tokio::test]
async fn test_http_service_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"message":"maintenance"}"#))
        .mount(&server)
        .await;

    let retriever =
        HttpRetriever::new(&server.uri(), Duration::from_secs(5), Duration::from_secs(5)).unwrap();
    let client = ArchiverClient::new(Arc::new(retriever), KEY).unwrap();

    match client.retrieve(42, 9).await {
        Err(ArchiveError::Transport(e)) => assert!(e.to_string().contains("maintenance")),
        other => panic!("expected Transport, got {:?}", other),
    }
}
