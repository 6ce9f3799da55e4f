//! A single encryptor shared across tasks and threads.

mod fixtures;

use std::collections::HashSet;
use std::sync::Arc;

use encryptor::{MessageEncryptor, Value};
use fixtures::random_secret;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_encryptor_across_blocking_tasks() {
    let encryptor = Arc::new(MessageEncryptor::new(random_secret(32)).unwrap());

    let handles: Vec<_> = (0..32i64)
        .map(|i| {
            let encryptor = Arc::clone(&encryptor);
            tokio::task::spawn_blocking(move || {
                let value = Value::record([("task", Value::from(i))]);
                let message = encryptor.encrypt_and_sign(&value).unwrap();
                assert_eq!(encryptor.decrypt_and_verify(&message).unwrap(), value);
                message
            })
        })
        .collect();

    let mut messages = HashSet::new();
    for handle in handles {
        messages.insert(handle.await.unwrap());
    }
    assert_eq!(messages.len(), 32);
}

#[test]
fn shared_encryptor_across_scoped_threads() {
    let encryptor = MessageEncryptor::new(random_secret(32)).unwrap();
    let value = Value::from("same plaintext");

    let messages: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| encryptor.encrypt(&value).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let distinct: HashSet<_> = messages.iter().collect();
    assert_eq!(distinct.len(), messages.len());
    for message in &messages {
        assert_eq!(encryptor.decrypt(message).unwrap(), value);
    }
}
