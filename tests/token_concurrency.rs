use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};

use kotiki_api::{middleware::auth::authenticate, services::token::TokenCodec};

const TASKS: i32 = 100;
const PER_TASK: i32 = 100;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_issue_and_verify_no_cross_talk() {
    let codec = Arc::new(TokenCodec::new(b"concurrency-key", 1).unwrap());

    let mut handles = Vec::new();
    for task in 0..TASKS {
        let codec = codec.clone();
        handles.push(tokio::spawn(async move {
            let mut issued = Vec::with_capacity(PER_TASK as usize);
            for i in 0..PER_TASK {
                let subject = task * PER_TASK + i;
                let token = codec.issue(subject).unwrap();
                assert_eq!(codec.verify(&token), Ok(subject));
                issued.push((subject, token));
                tokio::task::yield_now().await;
            }
            issued
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.await.unwrap());
    }
    assert_eq!(all.len(), (TASKS * PER_TASK) as usize);

    // Verify again from different tasks than the ones that issued.
    all.reverse();
    let mut handles = Vec::new();
    for chunk in all.chunks(PER_TASK as usize) {
        let codec = codec.clone();
        let chunk = chunk.to_vec();
        handles.push(tokio::spawn(async move {
            for (subject, token) in chunk {
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
                );
                assert_eq!(authenticate(&headers, &codec), Ok(subject));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}
