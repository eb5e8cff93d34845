//! CommandQueue semantics: coalescing, close/wake behavior, ordering.

use std::sync::Arc;
use std::time::Duration;

use glide_core::command::{Command, commands_are_similar};
use glide_core::queue::CommandQueue;
use rstest::rstest;

fn cmd(position_to: u8) -> Command {
    Command::to_position(position_to, 40)
}

#[rstest]
#[case(50, 59, true)]
#[case(50, 60, false)]
#[case(50, 41, true)]
#[case(50, 40, false)]
#[case(0, 9, true)]
#[case(0, 10, false)]
fn similarity_window_boundaries(#[case] first: u8, #[case] second: u8, #[case] coalesced: bool) {
    let queue = CommandQueue::new();
    queue.enqueue_replacing(cmd(first), commands_are_similar);
    queue.enqueue_replacing(cmd(second), commands_are_similar);
    assert_eq!(queue.len(), if coalesced { 1 } else { 2 });
}

#[test]
fn enqueue_replacing_coalesces_similar_commands() {
    let queue = CommandQueue::new();
    queue.enqueue_replacing(cmd(50), commands_are_similar);
    queue.enqueue_replacing(cmd(54), commands_are_similar);
    queue.enqueue_replacing(cmd(58), commands_are_similar);

    // Each new command superseded the previous similar one.
    let pending = queue.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].position_to, 58);
}

#[test]
fn non_similar_commands_survive_in_order() {
    let queue = CommandQueue::new();
    queue.enqueue_replacing(cmd(10), commands_are_similar);
    queue.enqueue_replacing(cmd(50), commands_are_similar);
    queue.enqueue_replacing(cmd(90), commands_are_similar);
    // Similar to the first entry only.
    queue.enqueue_replacing(cmd(12), commands_are_similar);

    let targets: Vec<u8> = queue.pending().iter().map(|c| c.position_to).collect();
    assert_eq!(targets, vec![50, 90, 12]);
}

#[test]
fn replacement_removes_only_the_first_match() {
    let queue = CommandQueue::new();
    // Two entries similar to each other and to the incoming command.
    queue.enqueue(cmd(40));
    queue.enqueue(cmd(44));
    queue.enqueue_replacing(cmd(42), commands_are_similar);

    let targets: Vec<u8> = queue.pending().iter().map(|c| c.position_to).collect();
    assert_eq!(targets, vec![44, 42]);
}

#[test]
fn custom_predicate_overrides_the_default() {
    let queue = CommandQueue::new();
    queue.enqueue(cmd(10));
    queue.enqueue(cmd(90));
    // Everything is similar: the first entry goes, the rest stay.
    queue.enqueue_replacing(cmd(50), |_, _| true);

    let targets: Vec<u8> = queue.pending().iter().map(|c| c.position_to).collect();
    assert_eq!(targets, vec![90, 50]);
}

#[test]
fn dequeue_returns_entries_fifo() {
    let queue = CommandQueue::new();
    queue.enqueue(cmd(1));
    queue.enqueue(cmd(2));
    assert_eq!(queue.dequeue().map(|e| e.command.position_to), Some(1));
    assert_eq!(queue.dequeue().map(|e| e.command.position_to), Some(2));
}

#[test]
fn close_wakes_all_blocked_consumers() {
    let queue = Arc::new(CommandQueue::new());
    let consumers = 8;

    let handles: Vec<_> = (0..consumers)
        .map(|_| {
            let q = Arc::clone(&queue);
            std::thread::spawn(move || q.dequeue())
        })
        .collect();

    // Let every consumer reach its wait before closing.
    std::thread::sleep(Duration::from_millis(50));
    queue.close();

    for handle in handles {
        let result = handle.join().expect("consumer thread panicked");
        assert!(result.is_none(), "waiter should observe None after close");
    }
}

#[test]
fn close_is_idempotent_and_drops_later_enqueues() {
    let queue = CommandQueue::new();
    queue.close();
    queue.close();
    queue.enqueue(cmd(5));
    queue.enqueue_replacing(cmd(6), commands_are_similar);
    assert!(queue.is_empty());
    assert!(queue.dequeue().is_none());
}

#[test]
fn clear_discards_without_closing() {
    let queue = CommandQueue::new();
    queue.enqueue(cmd(1));
    queue.enqueue(cmd(2));
    queue.clear();
    assert!(queue.is_empty());
    assert!(!queue.is_closed());
    queue.enqueue(cmd(3));
    assert_eq!(queue.len(), 1);
}

#[test]
fn enqueue_unblocks_a_waiting_consumer() {
    let queue = Arc::new(CommandQueue::new());
    let q = Arc::clone(&queue);
    let handle = std::thread::spawn(move || q.dequeue());

    std::thread::sleep(Duration::from_millis(20));
    queue.enqueue(cmd(77));

    let entry = handle
        .join()
        .expect("consumer thread panicked")
        .expect("consumer should receive the command");
    assert_eq!(entry.command.position_to, 77);
}
