use std::collections::HashSet;

use pretty_assertions::assert_eq;
use wayback_engine::TaskQueue;

fn urls(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn draining_moves_every_task_from_pending_to_processed() {
    let seed = urls(&["a", "b", "c"]);
    let queue = TaskQueue::seeded(seed.clone(), 3);
    assert_eq!(queue.total(), 3);

    while let Some(task) = queue.pop() {
        // A popped task is in neither set until the worker resolves it.
        assert_eq!(queue.pending_len() + queue.processed_len(), queue.total() - 1);
        queue.complete(&task.url);
    }

    assert_eq!(queue.pending_len(), 0);
    let processed: HashSet<String> = queue.processed_snapshot().into_iter().collect();
    assert_eq!(processed, seed.into_iter().collect::<HashSet<_>>());
}

#[test]
fn push_unique_is_idempotent() {
    let queue = TaskQueue::new(3);
    assert!(queue.push_unique("a"));
    assert!(!queue.push_unique("a"));
    assert!(queue.push_unique("b"));
    assert!(!queue.push_unique("b"));
    assert_eq!(queue.total(), 2);
    assert_eq!(queue.pending_len(), 2);
}

#[test]
fn processed_urls_are_never_re_added() {
    let queue = TaskQueue::seeded(urls(&["a"]), 3);
    let task = queue.pop().unwrap();
    queue.complete(&task.url);

    assert!(!queue.push_unique("a"));
    assert_eq!(queue.pending_len(), 0);
    assert_eq!(queue.processed_len(), 1);
}

#[test]
fn requeue_returns_the_task_until_the_pass_ceiling() {
    let queue = TaskQueue::seeded(urls(&["a"]), 3);

    let task = queue.pop().unwrap();
    assert!(queue.requeue(task)); // pass 1
    let task = queue.pop().unwrap();
    assert!(queue.requeue(task)); // pass 2
    let task = queue.pop().unwrap();
    assert!(!queue.requeue(task)); // pass 3 hits the ceiling

    assert_eq!(queue.pending_len(), 0);
    assert_eq!(queue.processed_len(), 0);
    assert_eq!(queue.failed_snapshot(), vec!["a".to_string()]);
    // The task moved to failed, it was not lost.
    assert_eq!(queue.total(), 1);
}

#[test]
fn failed_urls_are_never_re_added() {
    let queue = TaskQueue::seeded(urls(&["a"]), 1);
    let task = queue.pop().unwrap();
    assert!(!queue.requeue(task));
    assert!(!queue.push_unique("a"));
    assert_eq!(queue.failed_len(), 1);
}

#[test]
fn retain_drops_pending_tasks_and_shrinks_the_total() {
    let queue = TaskQueue::seeded(urls(&["keep1", "drop1", "keep2", "drop2"]), 3);
    let removed = queue.retain(|url| url.starts_with("keep"));
    assert_eq!(removed, 2);
    assert_eq!(queue.total(), 2);
    assert_eq!(queue.pending_len(), 2);

    let mut remaining = Vec::new();
    while let Some(task) = queue.pop() {
        remaining.push(task.url);
    }
    remaining.sort();
    assert_eq!(remaining, urls(&["keep1", "keep2"]));
}

#[test]
fn progress_counts_processed_against_the_total() {
    let queue = TaskQueue::seeded(urls(&["a", "b"]), 3);
    assert_eq!(queue.progress(), (0, 2));
    let task = queue.pop().unwrap();
    queue.complete(&task.url);
    assert_eq!(queue.progress(), (1, 2));
}
