//! Concurrency tests for value providers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use rewire_application::{FactoryProvider, SingletonProvider};
use rewire_domain::ports::Provider;

#[test]
fn test_singleton_concurrent_callers_share_one_computation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let provider = Arc::new(SingletonProvider::new("slow", move || {
        thread::sleep(Duration::from_millis(20));
        Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
    }));

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let provider = provider.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                provider.get().unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_factory_is_usable_as_trait_object() {
    let provider: Arc<dyn Provider<String>> =
        Arc::new(FactoryProvider::new("greeting", || Ok("hi".to_string())));
    assert_eq!(provider.get().unwrap(), "hi");
}
